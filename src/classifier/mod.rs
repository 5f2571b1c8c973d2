//! Labelling of feature tables with a binary PZM classifier.

mod forest;

use anyhow::Context;
use log::info;
use polars::prelude::*;

pub use forest::{
    Node,
    TreeEnsemble,
};

use crate::error::PzmError;
use crate::table::{
    FeatureTable,
    PREDICTION_COL,
};

/// Columns the classifier never sees.
pub const DROP_COLUMNS: [&str; 12] = [
    "chrom",
    "pos",
    "ref",
    "alts",
    "b64encode",
    "filter",
    "any_pub",
    "is_pzm",
    "rpa_ref",
    "rpa_alt",
    "strq",
    "gc",
];

pub const PZM_LABEL: &str = "PZM";
pub const NOT_PZM_LABEL: &str = "Not_PZM";

/// A trained binary classifier over the feature frame.
pub trait Classifier {
    /// One label per row, `1` for PZM and `0` otherwise.
    fn predict(
        &self,
        features: &DataFrame,
    ) -> anyhow::Result<Vec<u8>>;
}

/// The classifier input: `df` without [`DROP_COLUMNS`], every remaining
/// column cast to Float64.
pub fn feature_frame(df: &DataFrame) -> PolarsResult<DataFrame> {
    df.clone()
        .lazy()
        .select([all().exclude(DROP_COLUMNS).cast(DataType::Float64)])
        .collect()
}

/// Runs `classifier` over `table` and returns the table with a `y_predict`
/// column. Labels are `PZM`/`Not_PZM` strings unless `binary_labels` is set,
/// then they are kept as UInt8 `1`/`0`.
pub fn label_variants<C: Classifier + ?Sized>(
    table: &FeatureTable,
    classifier: &C,
    binary_labels: bool,
) -> anyhow::Result<DataFrame> {
    info!("Start predicting classification for {} variants", table.len());
    let features = feature_frame(table.data())?;
    let labels = classifier
        .predict(&features)
        .context("Failed to classify variants")?;

    if labels.len() != table.len() {
        return Err(PzmError::Prediction(format!(
            "expected {} labels, got {}",
            table.len(),
            labels.len()
        ))
        .into());
    }
    if let Some(label) = labels.iter().find(|l| **l > 1) {
        return Err(PzmError::Prediction(format!("label {label} is not binary")).into());
    }

    let column = if binary_labels {
        Column::new(PREDICTION_COL.into(), labels)
    }
    else {
        Column::new(
            PREDICTION_COL.into(),
            labels
                .iter()
                .map(|l| if *l == 1 { PZM_LABEL } else { NOT_PZM_LABEL })
                .collect::<Vec<_>>(),
        )
    };

    let mut labelled = table.data().clone();
    labelled.with_column(column)?;
    info!("Obtained predictions for {} variants", labelled.height());
    Ok(labelled)
}
