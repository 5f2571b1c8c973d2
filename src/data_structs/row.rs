use indexmap::IndexMap;

use super::FeatureValue;

/// Features of a single VCF record.
///
/// Identity fields are typed, annotation features are kept in registry order
/// under their registry (not yet lower-cased) names.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantRow {
    pub chrom:       String,
    pub pos:         i64,
    pub reference:   String,
    pub alts:        Vec<String>,
    /// Base64 fingerprint of chromosome, position and alleles.
    pub fingerprint: String,
    /// Semicolon-joined failed filters, empty for passing records.
    pub filter:      String,
    pub is_snv:      bool,
    /// Molecular validation label, unset until a validation source exists.
    pub is_pzm:      Option<bool>,
    /// Publication evidence flag, unset until a validation source exists.
    pub any_pub:     Option<bool>,
    pub features:    IndexMap<&'static str, FeatureValue>,
}

impl VariantRow {
    /// Looks up an annotation feature by registry name, ignoring case.
    pub fn feature(
        &self,
        name: &str,
    ) -> Option<&FeatureValue> {
        self.features.get(name).or_else(|| {
            self.features
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v)
        })
    }

    /// `chrom:pos:ref:alts`, used to point at a record in logs and errors.
    pub fn location(&self) -> String {
        format!(
            "{}:{}:{}:{}",
            self.chrom,
            self.pos,
            self.reference,
            self.alts.join(",")
        )
    }
}
