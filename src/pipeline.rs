use std::path::{
    Path,
    PathBuf,
};

use anyhow::Context;

use crate::data_structs::VariantRow;
use crate::features::VariantDecoder;
use crate::io::{
    read_blacklist,
    VcfReader,
};
use crate::table::{
    DegeneratePolicy,
    FeatureTable,
    HardFilter,
    NormalizerConfig,
    TableNormalizer,
};

/// Configuration of a [`Pipeline`].
///
/// Normalization and hard filtering are enabled by default, the external BED
/// blacklist is optional.
#[derive(Debug, Clone)]
pub struct PipelineBuilder {
    normalize:      bool,
    hard_filter:    bool,
    blacklist_path: Option<PathBuf>,
    normalizer:     NormalizerConfig,
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self {
            normalize:      true,
            hard_filter:    true,
            blacklist_path: None,
            normalizer:     NormalizerConfig::default(),
        }
    }
}

impl PipelineBuilder {
    pub fn with_normalize(
        mut self,
        normalize: bool,
    ) -> Self {
        self.normalize = normalize;
        self
    }

    pub fn with_hard_filter(
        mut self,
        hard_filter: bool,
    ) -> Self {
        self.hard_filter = hard_filter;
        self
    }

    /// BED file of additional regions to drop. Only used with the hard
    /// filter enabled.
    pub fn with_blacklist_path<P: AsRef<Path>>(
        mut self,
        path: Option<P>,
    ) -> Self {
        self.blacklist_path = path.map(|p| p.as_ref().to_path_buf());
        self
    }

    pub fn with_degenerate_policy(
        mut self,
        policy: DegeneratePolicy,
    ) -> Self {
        self.normalizer = self.normalizer.with_degenerate_policy(policy);
        self
    }

    pub fn with_normalizer_config(
        mut self,
        config: NormalizerConfig,
    ) -> Self {
        self.normalizer = config;
        self
    }

    /// Loads the blacklist, if any, and assembles the pipeline.
    pub fn build(self) -> anyhow::Result<Pipeline> {
        let filter = if self.hard_filter {
            let mut filter = HardFilter::new();
            if let Some(path) = self.blacklist_path.as_ref() {
                filter = filter.with_blacklist(read_blacklist(path)?);
            }
            Some(filter)
        }
        else {
            None
        };
        let normalizer = self
            .normalize
            .then(|| TableNormalizer::new(self.normalizer.clone()));

        Ok(Pipeline {
            decoder: VariantDecoder::new(),
            normalizer,
            filter,
        })
    }
}

/// VCF records in, normalized and filtered feature table out.
pub struct Pipeline {
    decoder:    VariantDecoder,
    normalizer: Option<TableNormalizer>,
    filter:     Option<HardFilter>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self {
            decoder:    VariantDecoder::new(),
            normalizer: Some(TableNormalizer::default()),
            filter:     Some(HardFilter::new()),
        }
    }
}

impl Pipeline {
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    /// Reads, decodes, normalizes and filters a whole VCF file.
    pub fn read_vcf<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> anyhow::Result<FeatureTable> {
        let path = path.as_ref();
        let mut reader = VcfReader::from_path(path)?;
        let rows = reader
            .decode_all(&self.decoder)
            .with_context(|| format!("Failed to decode {}", path.display()))?;
        self.process_rows(&rows)
    }

    /// Runs the table passes over already decoded rows.
    ///
    /// Normalization runs first, so the hard filter sees scaled values and
    /// the allele fraction threshold applies to the normalized `af` column.
    pub fn process_rows(
        &self,
        rows: &[VariantRow],
    ) -> anyhow::Result<FeatureTable> {
        let mut table = FeatureTable::try_from_rows(rows)?;

        if let Some(normalizer) = self.normalizer.as_ref() {
            normalizer.normalize(table.data_mut())?;
        }

        if let Some(filter) = self.filter.as_ref() {
            table = FeatureTable::from_data_frame(filter.apply(table.data())?);
        }
        Ok(table)
    }
}
