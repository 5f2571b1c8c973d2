//! # pzm-tools
//!
//! `pzm-tools` turns somatic variant calls (VCF) into a feature table for a
//! classifier labelling each variant as a post-zygotic mosaic variant (PZM)
//! or not.
//!
//! ## Key Features
//!
//! * **Declarative tag mapping**: INFO and FORMAT annotations are decoded
//!   into typed scalar features by a static registry of mappers
//!   ([`MapperRegistry`]), absent tags fall back to documented defaults.
//! * **Derived metrics**: strand odds ratio from strand bias counts, integer
//!   encoding of repeat masker classes and a base64 fingerprint identifying
//!   a variant across samples and runs.
//! * **Table passes**: min-max normalization of the numeric feature columns
//!   ([`TableNormalizer`]) and rule-based hard filtering ([`HardFilter`])
//!   over a `polars` DataFrame.
//! * **Labelling**: any [`Classifier`] can label the resulting table, a JSON
//!   random forest ([`TreeEnsemble`]) is provided.
//!
//! Number of threads used by `polars` can be configured with the
//! `PZM_NUM_THREADS` environment variable.
//!
//! ## Structure
//!
//! * [`data_structs`]: rows, raw and decoded values, genomic intervals.
//! * [`features`]: the mapper registry, the record decoder and the derived
//!   metrics.
//! * [`io`]: VCF, BED and CSV.
//! * [`table`]: the feature table, normalizer and hard filter.
//! * [`classifier`]: the classifier seam and the labelling step.
//! * [`pipeline`]: the end to end run.
//!
//! ## Usage
//!
//! ```no_run
//! use pzm_tools::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     let pipeline = Pipeline::builder()
//!         .with_blacklist_path(Some("blacklist.bed"))
//!         .build()?;
//!     let table = pipeline.read_vcf("sample.vcf.gz")?;
//!
//!     let model = TreeEnsemble::from_path("model.json")?;
//!     let mut labelled = label_variants(&table, &model, false)?;
//!     write_csv(&mut labelled, prediction_output_path("sample.vcf.gz"))?;
//!     Ok(())
//! }
//! ```
//!
//! [`MapperRegistry`]: features::MapperRegistry
//! [`TableNormalizer`]: table::TableNormalizer
//! [`HardFilter`]: table::HardFilter
//! [`Classifier`]: classifier::Classifier
//! [`TreeEnsemble`]: classifier::TreeEnsemble

#[ctor::ctor]
fn init() {
    if let Ok(n) = std::env::var("PZM_NUM_THREADS") {
        std::env::set_var("POLARS_MAX_THREADS", n)
    }
}

pub mod classifier;
pub mod data_structs;
pub mod error;
pub mod features;
pub mod io;
pub mod pipeline;
pub mod prelude;
pub mod table;
