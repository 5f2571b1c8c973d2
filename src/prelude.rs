pub use crate::classifier::{
    label_variants,
    Classifier,
    TreeEnsemble,
};
pub use crate::data_structs::coords::{
    ContigIntervalMap,
    LabeledInterval,
};
pub use crate::data_structs::{
    FeatureKind,
    FeatureValue,
    RawValue,
    RepeatMaskerClass,
    VariantRow,
};
pub use crate::error::{
    PzmError,
    PzmResult,
};
pub use crate::features::{
    MapperRegistry,
    VariantDecoder,
};
pub use crate::io::{
    prediction_output_path,
    read_blacklist,
    write_csv,
    VariantRecord,
    VcfReader,
};
pub use crate::pipeline::{
    Pipeline,
    PipelineBuilder,
};
pub use crate::table::{
    DegeneratePolicy,
    FeatureTable,
    HardFilter,
    NormalizerConfig,
    TableNormalizer,
};
