use anyhow::Context;
use hashbrown::HashSet;
use itertools::Itertools;
use log::{
    debug,
    info,
};
use polars::prelude::*;

use super::schema::{
    site_metric_columns,
    IdentityColumn,
};
use crate::error::PzmError;

/// What to do with a column whose non-null values are all equal.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum DegeneratePolicy {
    /// Every non-null value becomes 0.0.
    #[default]
    Zero,
    /// Fail with [`PzmError::DegenerateColumn`].
    Error,
}

#[derive(Debug, Clone, Default)]
pub struct NormalizerConfig {
    degenerate: DegeneratePolicy,
    exclude:    Vec<String>,
}

impl NormalizerConfig {
    pub fn with_degenerate_policy(
        mut self,
        policy: DegeneratePolicy,
    ) -> Self {
        self.degenerate = policy;
        self
    }

    /// Additional columns to keep unscaled.
    pub fn with_excluded<S: AsRef<str>>(
        mut self,
        columns: impl IntoIterator<Item = S>,
    ) -> Self {
        self.exclude
            .extend(columns.into_iter().map(|s| s.as_ref().to_lowercase()));
        self
    }

    pub fn degenerate_policy(&self) -> DegeneratePolicy {
        self.degenerate
    }
}

/// Min-max scaler for the numeric feature columns of a feature table.
///
/// Identity columns, boolean columns and outputs of site-level mappers are
/// never scaled. Nulls do not take part in the statistics and stay null.
pub struct TableNormalizer {
    config:   NormalizerConfig,
    excluded: HashSet<String>,
}

impl Default for TableNormalizer {
    fn default() -> Self {
        Self::new(NormalizerConfig::default())
    }
}

impl TableNormalizer {
    pub fn new(config: NormalizerConfig) -> Self {
        let excluded = IdentityColumn::ALL
            .iter()
            .map(|c| c.as_str().to_string())
            .chain(site_metric_columns())
            .chain(config.exclude.iter().cloned())
            .collect();
        Self { config, excluded }
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    pub fn is_excluded(
        &self,
        column: &str,
    ) -> bool {
        self.excluded.contains(column)
    }

    /// Names of the columns [`TableNormalizer::normalize`] rescales.
    pub fn scaled_columns(
        &self,
        df: &DataFrame,
    ) -> Vec<PlSmallStr> {
        df.get_columns()
            .iter()
            .filter(|c| c.dtype().is_integer() || c.dtype().is_float())
            .filter(|c| !self.is_excluded(c.name().as_str()))
            .map(|c| c.name().clone())
            .collect_vec()
    }

    /// Rescales every eligible column to `[0, 1]` in place. Scaled columns
    /// become Float64, row count is unchanged.
    pub fn normalize(
        &self,
        df: &mut DataFrame,
    ) -> anyhow::Result<()> {
        let columns = self.scaled_columns(df);
        let mut n_scaled = 0;

        for name in columns {
            let series = df
                .column(name.as_str())?
                .as_materialized_series()
                .cast(&DataType::Float64)
                .with_context(|| format!("Failed to cast column {name} to Float64"))?;
            let values = series.f64()?;

            if values.null_count() == values.len() {
                debug!("Column {name} has no values, left untouched");
                continue;
            }
            let (Some(min), Some(max)) = (values.min(), values.max()) else { continue };

            let scaled = if max == min {
                match self.config.degenerate {
                    DegeneratePolicy::Zero => {
                        debug!("Column {name} is constant ({min}), mapped to 0");
                        values.apply_values(|_| 0.0)
                    },
                    DegeneratePolicy::Error => {
                        return Err(PzmError::DegenerateColumn(name.to_string()).into())
                    },
                }
            }
            else {
                let range = max - min;
                debug!("Column {name} scaled from [{min}, {max}]");
                values.apply_values(|v| (v - min) / range)
            };

            df.with_column(scaled.into_series().with_name(name))?;
            n_scaled += 1;
        }

        info!("Normalized {n_scaled} feature columns over {} rows", df.height());
        Ok(())
    }
}
