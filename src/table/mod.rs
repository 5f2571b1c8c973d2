//! The feature table and the whole-table passes run over it.
//!
//! [`FeatureTable`] is assembled from decoded rows, [`TableNormalizer`]
//! min-max scales its numeric feature columns and [`HardFilter`] removes
//! rows matching the artefact rules.

mod filter;
mod normalize;
pub mod schema;
#[allow(clippy::module_inception)]
mod table;

pub use filter::{
    HardFilter,
    AF_THRESHOLD,
};
pub use normalize::{
    DegeneratePolicy,
    NormalizerConfig,
    TableNormalizer,
};
pub use schema::{
    table_schema,
    IdentityColumn,
    IS_SNV_COL,
    PREDICTION_COL,
};
pub use table::FeatureTable;
