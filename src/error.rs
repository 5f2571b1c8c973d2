//! Error taxonomy of the feature extraction pipeline.
//!
//! Every variant is fatal for the run it occurs in. Orchestration code
//! returns [`anyhow::Result`] and attaches record coordinates or tag names as
//! context, the typed error stays reachable with
//! `err.downcast_ref::<PzmError>()`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PzmError {
    /// A VCF record lacks one of the coordinate fields every row needs.
    #[error("malformed VCF record at {location}: {reason}")]
    MalformedRecord { location: String, reason: String },

    /// A declared tag carries a value of a shape its transform cannot read.
    #[error(
        "cannot map tag `{tag}` at {location}: expected {expected}, found {found}"
    )]
    MapperTransform {
        tag:      &'static str,
        location: String,
        expected: &'static str,
        found:    String,
    },

    #[error("unknown repeat masker class `{0}`")]
    UnknownLabel(String),

    #[error("value outside of metric domain: {0}")]
    Domain(String),

    #[error("column `{0}` has zero variance and can not be min-max scaled")]
    DegenerateColumn(String),

    #[error("failed to load blacklist regions from {path}: {reason}")]
    BlacklistLoad { path: PathBuf, reason: String },

    #[error("failed to load classifier model from {path}: {reason}")]
    ModelLoad { path: PathBuf, reason: String },

    #[error("classifier failed: {0}")]
    Prediction(String),
}

pub type PzmResult<T> = Result<T, PzmError>;
