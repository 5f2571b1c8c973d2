//! Mapping of VCF annotations to typed features.
//!
//! [`MapperRegistry`] is the declarative table of INFO and FORMAT tags, each
//! bound to a [`Transform`], its defaults and its output columns.
//! [`VariantDecoder`] applies the registry to records, the [`metrics`]
//! module holds the derived metrics some transforms rely on.

mod decoder;
pub mod metrics;
mod registry;
mod transform;

pub use decoder::{
    is_snv,
    VariantDecoder,
};
pub use registry::{
    AnnotationMapper,
    AnnotationTag,
    MapperRegistry,
};
pub use transform::Transform;
