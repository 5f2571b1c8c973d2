//! Readers and writers at the edges of the pipeline: VCF input through
//! `noodles`, BED blacklists through `bio` and CSV output through `polars`.

pub mod bed;
pub mod csv;
pub mod vcf;

pub use bed::read_blacklist;
pub use csv::{
    prediction_output_path,
    write_csv,
};
pub use vcf::{
    VariantRecord,
    VcfReader,
};
