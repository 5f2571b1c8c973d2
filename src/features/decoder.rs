use anyhow::Context;
use indexmap::IndexMap;
use itertools::Itertools;

use super::metrics::variant_fingerprint;
use super::registry::{
    AnnotationMapper,
    MapperRegistry,
};
use crate::data_structs::{
    AnnotationScope,
    FeatureValue,
    VariantRow,
};
use crate::error::PzmError;
use crate::io::vcf::VariantRecord;

/// Turns VCF records into [`VariantRow`]s using the mapper registry.
#[derive(Debug, Clone, Copy)]
pub struct VariantDecoder {
    registry: &'static MapperRegistry,
}

impl Default for VariantDecoder {
    fn default() -> Self {
        Self {
            registry: MapperRegistry::global(),
        }
    }
}

impl VariantDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registry(&self) -> &'static MapperRegistry {
        self.registry
    }

    /// Decodes one record.
    ///
    /// # Errors
    ///
    /// [`PzmError::MalformedRecord`] when chromosome, position or reference
    /// are missing, [`PzmError::MapperTransform`] when a tag value has an
    /// unexpected shape. Errors of derived metrics carry the tag and record
    /// location as context.
    pub fn decode<R: VariantRecord>(
        &self,
        record: &R,
    ) -> anyhow::Result<VariantRow> {
        let chrom = record.chrom();
        let alts = record.alternates();
        let location = format!(
            "{}:{}",
            chrom,
            record
                .position()
                .map(|p| p.to_string())
                .unwrap_or_else(|| ".".to_string())
        );

        let malformed = |reason: &str| {
            PzmError::MalformedRecord {
                location: location.clone(),
                reason:   reason.to_string(),
            }
        };
        if chrom.is_empty() || chrom == "." {
            return Err(malformed("missing chromosome").into());
        }
        let pos = record
            .position()
            .ok_or_else(|| malformed("missing position"))?;
        let pos = i64::try_from(pos).map_err(|_| malformed("position out of range"))?;
        let reference = record.reference();
        if reference.is_empty() || reference == "." {
            return Err(malformed("missing reference allele").into());
        }

        let mut features = IndexMap::with_capacity(self.registry.info().len() * 2);
        for mapper in self.registry.merged() {
            let values = self
                .apply_mapper(mapper, record, &location)
                .with_context(|| {
                    format!("Failed to decode {} at {}", mapper.key(), location)
                })?;
            features.extend(values);
        }

        let filter = record
            .filters()
            .into_iter()
            .filter(|f| *f != "PASS" && *f != ".")
            .join(";");

        Ok(VariantRow {
            chrom: chrom.to_string(),
            pos,
            reference: reference.to_string(),
            fingerprint: variant_fingerprint(chrom, pos, reference, &alts),
            filter,
            is_snv: is_snv(reference, &alts),
            is_pzm: None,
            any_pub: None,
            alts: alts.into_iter().map(str::to_string).collect(),
            features,
        })
    }

    fn apply_mapper<R: VariantRecord>(
        &self,
        mapper: &AnnotationMapper,
        record: &R,
        location: &str,
    ) -> Result<Vec<(&'static str, FeatureValue)>, PzmError> {
        let raw = match mapper.scope() {
            AnnotationScope::Info => record.info(mapper.key()),
            AnnotationScope::Format => record.sample(mapper.key()),
        };
        let Some(raw) = raw else {
            return Ok(mapper
                .default()
                .iter()
                .map(|(k, v)| (*k, v.clone()))
                .collect());
        };

        let values = mapper
            .transform()
            .apply(mapper.key(), &raw)
            .map_err(|err| {
                match err {
                    PzmError::MapperTransform {
                        tag,
                        expected,
                        found,
                        ..
                    } => {
                        PzmError::MapperTransform {
                            tag,
                            location: location.to_string(),
                            expected,
                            found,
                        }
                    },
                    other => other,
                }
            })?;
        Ok(mapper.output_keys().iter().copied().zip(values).collect())
    }
}

/// Whether the record is a substitution: every alt allele has the length of
/// the reference. Records without alt alleles are not.
pub fn is_snv<S: AsRef<str>>(
    reference: &str,
    alts: &[S],
) -> bool {
    !alts.is_empty() && alts.iter().all(|alt| alt.as_ref().len() == reference.len())
}
