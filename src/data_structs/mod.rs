//! Core data types of the crate: repeat masker classes, raw tag values and
//! decoded feature values, variant rows and genomic intervals used by the
//! blacklist filters.

pub mod coords;
mod enums;
mod row;
mod value;

pub use enums::{
    AnnotationScope,
    FeatureKind,
    RepeatMaskerClass,
};
pub use row::VariantRow;
pub use value::{
    FeatureValue,
    RawValue,
};
