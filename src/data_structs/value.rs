use std::fmt::Display;

use super::FeatureKind;

/// Value of an INFO or FORMAT tag as handed over by the VCF reader.
///
/// Only the shapes the annotation transforms can read are kept. Genotypes
/// arrive rendered as text (e.g. `0|1`).
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// The tag is present but its value is `.`.
    Missing,
    Flag,
    Integer(i64),
    Float(f64),
    String(String),
    IntegerArray(Vec<Option<i64>>),
    FloatArray(Vec<Option<f64>>),
    StringArray(Vec<Option<String>>),
}

impl RawValue {
    /// Short shape description used in transform errors.
    pub fn shape(&self) -> String {
        match self {
            RawValue::Missing => "missing value".to_string(),
            RawValue::Flag => "flag".to_string(),
            RawValue::Integer(v) => format!("integer {v}"),
            RawValue::Float(v) => format!("float {v}"),
            RawValue::String(v) => format!("string {v:?}"),
            RawValue::IntegerArray(v) => format!("integer array of {}", v.len()),
            RawValue::FloatArray(v) => format!("float array of {}", v.len()),
            RawValue::StringArray(v) => format!("string array of {}", v.len()),
        }
    }

    /// Number of elements, scalars count as one.
    pub fn arity(&self) -> usize {
        match self {
            RawValue::Missing | RawValue::Flag => 0,
            RawValue::Integer(_) | RawValue::Float(_) | RawValue::String(_) => 1,
            RawValue::IntegerArray(v) => v.len(),
            RawValue::FloatArray(v) => v.len(),
            RawValue::StringArray(v) => v.len(),
        }
    }

    /// Numeric element at `idx`, scalars only answer to index 0.
    ///
    /// Returns `Ok(None)` for a missing element and `Err(())` when the value
    /// is not numeric or has no such element.
    pub(crate) fn numeric_at(
        &self,
        idx: usize,
    ) -> Result<Option<f64>, ()> {
        match self {
            RawValue::Integer(v) if idx == 0 => Ok(Some(*v as f64)),
            RawValue::Float(v) if idx == 0 => Ok(Some(*v)),
            RawValue::IntegerArray(v) => {
                v.get(idx).map(|x| x.map(|x| x as f64)).ok_or(())
            },
            RawValue::FloatArray(v) => v.get(idx).copied().ok_or(()),
            _ => Err(()),
        }
    }

    /// Integer element at `idx` without going through floats.
    pub(crate) fn integer_at(
        &self,
        idx: usize,
    ) -> Result<Option<i64>, ()> {
        match self {
            RawValue::Integer(v) if idx == 0 => Ok(Some(*v)),
            RawValue::IntegerArray(v) => v.get(idx).copied().ok_or(()),
            _ => self.numeric_at(idx).map(|x| x.map(|x| x.trunc() as i64)),
        }
    }
}

/// One cell of a variant row.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
}

impl FeatureValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FeatureValue::Null)
    }

    /// Whether the value can be stored in a column of `kind`.
    pub fn fits(
        &self,
        kind: FeatureKind,
    ) -> bool {
        matches!(
            (self, kind),
            (FeatureValue::Null, _)
                | (FeatureValue::Bool(_), FeatureKind::Bool)
                | (FeatureValue::Int(_), FeatureKind::Int)
                | (FeatureValue::Float(_), FeatureKind::Float)
        )
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FeatureValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FeatureValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FeatureValue::Float(v) => Some(*v),
            FeatureValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Builds a value of `kind` from an optional float, truncating for
    /// integer columns.
    pub(crate) fn from_numeric(
        value: Option<f64>,
        kind: FeatureKind,
    ) -> Self {
        match (value, kind) {
            (None, _) => FeatureValue::Null,
            (Some(v), FeatureKind::Int) => FeatureValue::Int(v.trunc() as i64),
            (Some(v), FeatureKind::Float) => FeatureValue::Float(v),
            (Some(v), FeatureKind::Bool) => FeatureValue::Bool(v != 0.0),
        }
    }
}

impl Display for FeatureValue {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            FeatureValue::Null => write!(f, "null"),
            FeatureValue::Bool(v) => write!(f, "{v}"),
            FeatureValue::Int(v) => write!(f, "{v}"),
            FeatureValue::Float(v) => write!(f, "{v}"),
        }
    }
}
