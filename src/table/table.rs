use anyhow::Context;
use itertools::Itertools;
use log::debug;
use polars::prelude::*;

use super::schema::{
    feature_columns,
    IdentityColumn,
    IS_SNV_COL,
};
use crate::data_structs::{
    FeatureKind,
    FeatureValue,
    VariantRow,
};
use crate::error::PzmError;

/// One row per VCF record, with identity columns, every mapper output
/// (lower-cased) and `is_snv`.
#[derive(Debug, Clone)]
pub struct FeatureTable {
    data: DataFrame,
}

impl From<FeatureTable> for DataFrame {
    fn from(value: FeatureTable) -> Self {
        value.data
    }
}

impl FeatureTable {
    /// Assembles decoded rows into a typed table.
    pub fn try_from_rows(rows: &[VariantRow]) -> anyhow::Result<Self> {
        let mut columns =
            Vec::with_capacity(IdentityColumn::ALL.len() + feature_columns().len() + 1);
        columns.extend(identity_columns(rows));

        for column in feature_columns() {
            let values = rows
                .iter()
                .map(|row| {
                    let value = row
                        .features
                        .get(column.registry_name)
                        .unwrap_or(&FeatureValue::Null);
                    if value.fits(column.kind) {
                        Ok(value)
                    }
                    else {
                        Err(PzmError::MapperTransform {
                            tag:      column.registry_name,
                            location: row.location(),
                            expected: kind_name(column.kind),
                            found:    value.to_string(),
                        })
                    }
                })
                .collect::<Result<Vec<_>, _>>()
                .with_context(|| format!("Failed to assemble column {}", column.name))?;

            let name = PlSmallStr::from(column.name.as_str());
            let series = match column.kind {
                FeatureKind::Bool => {
                    Series::new(name, values.iter().map(|v| v.as_bool()).collect_vec())
                },
                FeatureKind::Int => {
                    Series::new(name, values.iter().map(|v| v.as_i64()).collect_vec())
                },
                FeatureKind::Float => {
                    Series::new(name, values.iter().map(|v| v.as_f64()).collect_vec())
                },
            };
            columns.push(series.into_column());
        }

        columns.push(Column::new(
            IS_SNV_COL.into(),
            rows.iter().map(|r| r.is_snv).collect_vec(),
        ));

        let data = DataFrame::new(columns)?;
        debug!("Assembled feature table with shape {:?}", data.shape());
        Ok(Self { data })
    }

    /// Wraps an existing frame. The frame is expected to follow the table
    /// schema.
    pub fn from_data_frame(data: DataFrame) -> Self {
        Self { data }
    }

    pub fn data(&self) -> &DataFrame {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut DataFrame {
        &mut self.data
    }

    pub fn into_inner(self) -> DataFrame {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.height()
    }

    pub fn is_empty(&self) -> bool {
        self.data.height() == 0
    }
}

fn identity_columns(rows: &[VariantRow]) -> Vec<Column> {
    IdentityColumn::ALL
        .iter()
        .map(|column| {
            let name = PlSmallStr::from(column.as_str());
            match column {
                IdentityColumn::Chrom => {
                    Column::new(name, rows.iter().map(|r| r.chrom.as_str()).collect_vec())
                },
                IdentityColumn::Pos => Column::new(name, rows.iter().map(|r| r.pos).collect_vec()),
                IdentityColumn::Ref => {
                    Column::new(name, rows.iter().map(|r| r.reference.as_str()).collect_vec())
                },
                IdentityColumn::Alts => {
                    Column::new(name, rows.iter().map(|r| r.alts.join(",")).collect_vec())
                },
                IdentityColumn::Fingerprint => {
                    Column::new(
                        name,
                        rows.iter().map(|r| r.fingerprint.as_str()).collect_vec(),
                    )
                },
                IdentityColumn::Filter => {
                    Column::new(name, rows.iter().map(|r| r.filter.as_str()).collect_vec())
                },
                IdentityColumn::AnyPub => {
                    Column::new(name, rows.iter().map(|r| r.any_pub).collect_vec())
                },
                IdentityColumn::IsPzm => {
                    Column::new(name, rows.iter().map(|r| r.is_pzm).collect_vec())
                },
            }
        })
        .collect_vec()
}

fn kind_name(kind: FeatureKind) -> &'static str {
    match kind {
        FeatureKind::Bool => "boolean",
        FeatureKind::Int => "integer",
        FeatureKind::Float => "float",
    }
}
