use itertools::Itertools;
use once_cell::sync::Lazy;
use polars::prelude::*;

use crate::data_structs::FeatureKind;
use crate::features::MapperRegistry;

/// Identity columns every feature table starts with.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum IdentityColumn {
    Chrom,
    Pos,
    Ref,
    Alts,
    Fingerprint,
    Filter,
    AnyPub,
    IsPzm,
}

impl IdentityColumn {
    pub const ALL: [IdentityColumn; 8] = [
        Self::Chrom,
        Self::Pos,
        Self::Ref,
        Self::Alts,
        Self::Fingerprint,
        Self::Filter,
        Self::AnyPub,
        Self::IsPzm,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Chrom => "chrom",
            Self::Pos => "pos",
            Self::Ref => "ref",
            Self::Alts => "alts",
            Self::Fingerprint => "b64encode",
            Self::Filter => "filter",
            Self::AnyPub => "any_pub",
            Self::IsPzm => "is_pzm",
        }
    }

    pub const fn dtype(&self) -> DataType {
        match self {
            Self::Chrom | Self::Ref | Self::Alts | Self::Fingerprint | Self::Filter => {
                DataType::String
            },
            Self::Pos => DataType::Int64,
            Self::AnyPub | Self::IsPzm => DataType::Boolean,
        }
    }

    #[inline(always)]
    pub fn col(&self) -> Expr {
        col(self.as_str())
    }

    pub fn has_name(name: &str) -> bool {
        Self::ALL.iter().any(|c| c.as_str() == name)
    }
}

pub const IS_SNV_COL: &str = "is_snv";
pub const PREDICTION_COL: &str = "y_predict";

/// Lower-cased feature table column, the name it has in the mapper registry
/// and its kind.
#[derive(Debug, Clone)]
pub struct FeatureColumn {
    pub name:          String,
    pub registry_name: &'static str,
    pub kind:          FeatureKind,
}

static FEATURE_COLUMNS: Lazy<Vec<FeatureColumn>> = Lazy::new(|| {
    MapperRegistry::global()
        .output_columns()
        .into_iter()
        .map(|(registry_name, kind)| {
            FeatureColumn {
                name: registry_name.to_lowercase(),
                registry_name,
                kind,
            }
        })
        .collect_vec()
});

/// Annotation feature columns in table order.
pub fn feature_columns() -> &'static [FeatureColumn] {
    &FEATURE_COLUMNS
}

/// Lower-cased names of the columns produced by site-level mappers.
pub fn site_metric_columns() -> Vec<String> {
    MapperRegistry::global()
        .site_metric_columns()
        .into_iter()
        .map(str::to_lowercase)
        .collect_vec()
}

/// Full column schema: identity columns, annotation features, `is_snv`.
pub fn table_schema() -> Schema {
    Schema::from_iter(
        IdentityColumn::ALL
            .iter()
            .map(|c| (PlSmallStr::from(c.as_str()), c.dtype()))
            .chain(
                feature_columns()
                    .iter()
                    .map(|c| (PlSmallStr::from(c.name.as_str()), c.kind.dtype())),
            )
            .chain([(PlSmallStr::from(IS_SNV_COL), DataType::Boolean)]),
    )
}
