use indexmap::IndexMap;
use itertools::Itertools;
use once_cell::sync::Lazy;

use super::metrics::no_repeat_masker_code;
use super::transform::Transform;
use crate::data_structs::{
    AnnotationScope,
    FeatureKind,
    FeatureValue,
};

/// VCF annotations turned into features.
#[derive(Eq, Hash, PartialEq, Copy, Clone, Debug)]
pub enum AnnotationTag {
    // INFO
    Germq,
    Mbq,
    Mfrl,
    Mmq,
    Mpos,
    Pl,
    Tlod,
    AllCohortAf,
    Ecnt,
    Gc,
    Lcr,
    PassCohortAf,
    Popaf,
    Rmcl,
    Rpa,
    Segdup,
    Simplerep,
    Str,
    Strq,
    Wesreg,
    // FORMAT
    Ad,
    Af,
    Dp,
    Fad,
    Gq,
    Gt,
    Sb,
}

impl AnnotationTag {
    pub const INFO: [AnnotationTag; 20] = [
        Self::Germq,
        Self::Mbq,
        Self::Mfrl,
        Self::Mmq,
        Self::Mpos,
        Self::Pl,
        Self::Tlod,
        Self::AllCohortAf,
        Self::Ecnt,
        Self::Gc,
        Self::Lcr,
        Self::PassCohortAf,
        Self::Popaf,
        Self::Rmcl,
        Self::Rpa,
        Self::Segdup,
        Self::Simplerep,
        Self::Str,
        Self::Strq,
        Self::Wesreg,
    ];

    pub const FORMAT: [AnnotationTag; 7] = [
        Self::Ad,
        Self::Af,
        Self::Dp,
        Self::Fad,
        Self::Gq,
        Self::Gt,
        Self::Sb,
    ];

    /// Tag name as written in the VCF header.
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Germq => "GERMQ",
            Self::Mbq => "MBQ",
            Self::Mfrl => "MFRL",
            Self::Mmq => "MMQ",
            Self::Mpos => "MPOS",
            Self::Pl => "PL",
            Self::Tlod => "TLOD",
            Self::AllCohortAf => "all_cohort_af",
            Self::Ecnt => "ECNT",
            Self::Gc => "GC",
            Self::Lcr => "LCR",
            Self::PassCohortAf => "pass_cohort_AF",
            Self::Popaf => "POPAF",
            Self::Rmcl => "RMCL",
            Self::Rpa => "RPA",
            Self::Segdup => "SEGDUP",
            Self::Simplerep => "SIMPLEREP",
            Self::Str => "STR",
            Self::Strq => "STRQ",
            Self::Wesreg => "WESREG",
            Self::Ad => "AD",
            Self::Af => "AF",
            Self::Dp => "DP",
            Self::Fad => "FAD",
            Self::Gq => "GQ",
            Self::Gt => "GT",
            Self::Sb => "SB",
        }
    }

    pub const fn scope(&self) -> AnnotationScope {
        match self {
            Self::Ad | Self::Af | Self::Dp | Self::Fad | Self::Gq | Self::Gt | Self::Sb => {
                AnnotationScope::Format
            },
            _ => AnnotationScope::Info,
        }
    }

    /// Whether the metric describes the sample rather than the site. Site
    /// metrics are kept unscaled by the normalizer.
    pub const fn is_sample_metric(&self) -> bool {
        match self {
            Self::Germq
            | Self::Mbq
            | Self::Mfrl
            | Self::Mmq
            | Self::Mpos
            | Self::Pl
            | Self::Tlod => true,
            Self::AllCohortAf
            | Self::Ecnt
            | Self::Gc
            | Self::Lcr
            | Self::PassCohortAf
            | Self::Popaf
            | Self::Rmcl
            | Self::Rpa
            | Self::Segdup
            | Self::Simplerep
            | Self::Str
            | Self::Strq
            | Self::Wesreg => false,
            Self::Ad | Self::Af | Self::Dp | Self::Fad | Self::Gq | Self::Gt | Self::Sb => {
                true
            },
        }
    }

    pub const fn transform(&self) -> Transform {
        use FeatureKind::*;
        match self {
            // Phred-scaled quality that alt alleles are not germline variants
            Self::Germq => Transform::Scalar(Int),
            // median base quality, fragment length and mapping quality by allele
            Self::Mbq | Self::Mfrl | Self::Mmq => Transform::RefAlt(Int),
            // median distance from end of read
            Self::Mpos => Transform::First(Int),
            Self::Pl => Transform::Scalar(Int),
            // log10 likelihood ratio of variant existing versus not existing
            Self::Tlod => Transform::First(Float),
            Self::AllCohortAf => Transform::First(Float),
            // number of events in this haplotype
            Self::Ecnt => Transform::Scalar(Int),
            // GC percent in 5-base windows
            Self::Gc => Transform::Max,
            Self::Lcr | Self::Segdup | Self::Simplerep | Self::Str | Self::Wesreg => {
                Transform::Flag
            },
            // frequency of PASS alleles in the cohort run with the same PON
            Self::PassCohortAf => Transform::Scalar(Float),
            // negative log10 population allele frequencies of alt alleles
            Self::Popaf => Transform::First(Float),
            Self::Rmcl => Transform::RepeatMasker,
            // tandem repeat unit count for ref and alt
            Self::Rpa => Transform::RefAlt(Int),
            // quality that STR alt alleles are not polymerase slippage errors
            Self::Strq => Transform::Scalar(Int),
            // allelic depths and fragment counts for ref and alt
            Self::Ad | Self::Fad => Transform::RefAlt(Int),
            Self::Af => Transform::First(Float),
            Self::Dp | Self::Gq => Transform::Scalar(Int),
            Self::Gt => Transform::Phasing,
            Self::Sb => Transform::StrandOddsRatio,
        }
    }

    /// Feature names written by the mapper, in column order.
    pub const fn output_keys(&self) -> &'static [&'static str] {
        match self {
            Self::Germq => &["GERMQ"],
            Self::Mbq => &["MBQ_ref", "MBQ_alt"],
            Self::Mfrl => &["MFRL_ref", "MFRL_alt"],
            Self::Mmq => &["MMQ_ref", "MMQ_alt"],
            Self::Mpos => &["MPOS"],
            Self::Pl => &["PL"],
            Self::Tlod => &["TLOD"],
            Self::AllCohortAf => &["all_cohort_af"],
            Self::Ecnt => &["ECNT"],
            Self::Gc => &["GC"],
            Self::Lcr => &["LCR"],
            Self::PassCohortAf => &["pass_cohort_AF"],
            Self::Popaf => &["POPAF"],
            Self::Rmcl => &["RMCL"],
            Self::Rpa => &["RPA_ref", "RPA_alt"],
            Self::Segdup => &["SEGDUP"],
            Self::Simplerep => &["SIMPLEREP"],
            Self::Str => &["STR"],
            Self::Strq => &["STRQ"],
            Self::Wesreg => &["WESREG"],
            Self::Ad => &["AD_ref", "AD_alt"],
            Self::Af => &["AF"],
            Self::Dp => &["DP"],
            Self::Fad => &["FAD_ref", "FAD_alt"],
            Self::Gq => &["GQ"],
            Self::Gt => &["GT"],
            Self::Sb => &["SOR"],
        }
    }

    /// Value every output takes when the tag is absent.
    pub fn default_value(&self) -> FeatureValue {
        match self.transform() {
            Transform::Flag => FeatureValue::Bool(false),
            Transform::RepeatMasker => FeatureValue::Int(no_repeat_masker_code()),
            _ => FeatureValue::Null,
        }
    }
}

/// A VCF tag bound to its transform, defaults and output columns.
#[derive(Debug, Clone)]
pub struct AnnotationMapper {
    tag:      AnnotationTag,
    default:  IndexMap<&'static str, FeatureValue>,
}

impl From<AnnotationTag> for AnnotationMapper {
    fn from(tag: AnnotationTag) -> Self {
        let default = tag
            .output_keys()
            .iter()
            .map(|key| (*key, tag.default_value()))
            .collect();
        Self { tag, default }
    }
}

impl AnnotationMapper {
    pub fn tag(&self) -> AnnotationTag {
        self.tag
    }

    pub fn key(&self) -> &'static str {
        self.tag.key()
    }

    pub fn scope(&self) -> AnnotationScope {
        self.tag.scope()
    }

    pub fn is_sample_metric(&self) -> bool {
        self.tag.is_sample_metric()
    }

    pub fn transform(&self) -> Transform {
        self.tag.transform()
    }

    pub fn output_keys(&self) -> &'static [&'static str] {
        self.tag.output_keys()
    }

    pub fn output_kind(&self) -> FeatureKind {
        self.transform().output_kind()
    }

    /// Features used when the record does not carry the tag.
    pub fn default(&self) -> &IndexMap<&'static str, FeatureValue> {
        &self.default
    }
}

static REGISTRY: Lazy<MapperRegistry> = Lazy::new(MapperRegistry::build);

/// The INFO and FORMAT mapper tables.
#[derive(Debug)]
pub struct MapperRegistry {
    info:   IndexMap<&'static str, AnnotationMapper>,
    format: IndexMap<&'static str, AnnotationMapper>,
}

impl MapperRegistry {
    /// Process-wide registry, built on first use.
    pub fn global() -> &'static MapperRegistry {
        &REGISTRY
    }

    fn build() -> Self {
        let table = |tags: &[AnnotationTag]| {
            tags.iter()
                .map(|tag| (tag.key(), AnnotationMapper::from(*tag)))
                .collect::<IndexMap<_, _>>()
        };
        let registry = Self {
            info:   table(&AnnotationTag::INFO),
            format: table(&AnnotationTag::FORMAT),
        };
        debug_assert!(
            registry.info.keys().all(|k| !registry.format.contains_key(k)),
            "INFO and FORMAT registries must have disjoint keys"
        );
        registry
    }

    pub fn info(&self) -> &IndexMap<&'static str, AnnotationMapper> {
        &self.info
    }

    pub fn format(&self) -> &IndexMap<&'static str, AnnotationMapper> {
        &self.format
    }

    /// Union of both tables, INFO mappers first.
    pub fn merged(&self) -> impl Iterator<Item = &AnnotationMapper> {
        self.info.values().chain(self.format.values())
    }

    pub fn get(
        &self,
        key: &str,
    ) -> Option<&AnnotationMapper> {
        self.info.get(key).or_else(|| self.format.get(key))
    }

    /// Every output feature name with its kind, in column order.
    pub fn output_columns(&self) -> Vec<(&'static str, FeatureKind)> {
        self.merged()
            .flat_map(|m| m.output_keys().iter().map(move |k| (*k, m.output_kind())))
            .collect_vec()
    }

    /// Outputs of site-level mappers of either table.
    pub fn site_metric_columns(&self) -> Vec<&'static str> {
        self.merged()
            .filter(|m| !m.is_sample_metric())
            .flat_map(|m| m.output_keys().iter().copied())
            .collect_vec()
    }
}
