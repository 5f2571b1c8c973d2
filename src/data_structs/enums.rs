use std::fmt::Display;
use std::str::FromStr;

use polars::prelude::DataType;

use crate::error::PzmError;

/// Repeat Masker class of the repetitive element overlapping a variant.
///
/// The discriminant order is the positional digit used by the repeat masker
/// encoding and must not change, otherwise previously encoded feature tables
/// stop matching.
#[derive(Eq, Hash, PartialEq, Copy, Clone, Debug, PartialOrd, Ord)]
pub enum RepeatMaskerClass {
    Dna,
    DnaUncertain,
    Line,
    Ltr,
    LtrUncertain,
    LowComplexity,
    Rc,
    RcUncertain,
    Rmcl,
    Rna,
    Retroposon,
    Sine,
    SineUncertain,
    Satellite,
    SimpleRepeat,
    Unknown,
    RRna,
    ScRna,
    SnRna,
    SrpRna,
    TRna,
    /// Synthetic label for sites without a repeat masker annotation.
    NoRepeatMasker,
}

impl RepeatMaskerClass {
    pub const ALL: [RepeatMaskerClass; 22] = [
        Self::Dna,
        Self::DnaUncertain,
        Self::Line,
        Self::Ltr,
        Self::LtrUncertain,
        Self::LowComplexity,
        Self::Rc,
        Self::RcUncertain,
        Self::Rmcl,
        Self::Rna,
        Self::Retroposon,
        Self::Sine,
        Self::SineUncertain,
        Self::Satellite,
        Self::SimpleRepeat,
        Self::Unknown,
        Self::RRna,
        Self::ScRna,
        Self::SnRna,
        Self::SrpRna,
        Self::TRna,
        Self::NoRepeatMasker,
    ];

    /// Number of classes, the radix of the positional encoding.
    pub const N_CLASSES: i64 = Self::ALL.len() as i64;

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Dna => "DNA",
            Self::DnaUncertain => "DNA?",
            Self::Line => "LINE",
            Self::Ltr => "LTR",
            Self::LtrUncertain => "LTR?",
            Self::LowComplexity => "Low_complexity",
            Self::Rc => "RC",
            Self::RcUncertain => "RC?",
            Self::Rmcl => "RMCL",
            Self::Rna => "RNA",
            Self::Retroposon => "Retroposon",
            Self::Sine => "SINE",
            Self::SineUncertain => "SINE?",
            Self::Satellite => "Satellite",
            Self::SimpleRepeat => "Simple_repeat",
            Self::Unknown => "Unknown",
            Self::RRna => "rRNA",
            Self::ScRna => "scRNA",
            Self::SnRna => "snRNA",
            Self::SrpRna => "srpRNA",
            Self::TRna => "tRNA",
            Self::NoRepeatMasker => "no_repeat_masker",
        }
    }

    /// Position of the class in [`RepeatMaskerClass::ALL`].
    pub const fn index(&self) -> i64 {
        *self as i64
    }

    pub fn from_index(index: i64) -> Option<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }
}

impl FromStr for RepeatMaskerClass {
    type Err = PzmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|class| class.as_str() == s)
            .copied()
            .ok_or_else(|| PzmError::UnknownLabel(s.to_string()))
    }
}

impl Display for RepeatMaskerClass {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where a VCF annotation lives.
#[derive(Eq, Hash, PartialEq, Copy, Clone, Debug)]
pub enum AnnotationScope {
    /// Site-level `INFO` column.
    Info,
    /// `FORMAT` value of the first sample.
    Format,
}

impl Display for AnnotationScope {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            AnnotationScope::Info => write!(f, "INFO"),
            AnnotationScope::Format => write!(f, "FORMAT"),
        }
    }
}

/// Declared type of a feature column.
#[derive(Eq, Hash, PartialEq, Copy, Clone, Debug)]
pub enum FeatureKind {
    Bool,
    Int,
    Float,
}

impl FeatureKind {
    pub const fn dtype(&self) -> DataType {
        match self {
            FeatureKind::Bool => DataType::Boolean,
            FeatureKind::Int => DataType::Int64,
            FeatureKind::Float => DataType::Float64,
        }
    }
}
