use itertools::Itertools;

use super::metrics::{
    encode_repeat_masker_labels,
    strand_odds_ratio,
};
use crate::data_structs::{
    FeatureKind,
    FeatureValue,
    RawValue,
};
use crate::error::{
    PzmError,
    PzmResult,
};

/// How a raw tag value turns into feature values.
///
/// Every variant fixes the arity it reads and the number of features it
/// writes, so a mapper's output keys can be checked against its transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    /// Presence of the tag sets a boolean feature.
    Flag,
    /// A single value, one-element arrays are accepted.
    Scalar(FeatureKind),
    /// First element of an array.
    First(FeatureKind),
    /// First two elements of a per-allele array, ref then alt.
    RefAlt(FeatureKind),
    /// Maximum over all elements.
    Max,
    /// Genotype string, 0 when phased and 1 otherwise.
    Phasing,
    /// Strand odds ratio of a four element strand bias array.
    StrandOddsRatio,
    /// Positional encoding of repeat masker class labels.
    RepeatMasker,
}

impl Transform {
    /// Number of features the transform writes.
    pub const fn n_outputs(&self) -> usize {
        match self {
            Transform::RefAlt(_) => 2,
            _ => 1,
        }
    }

    /// Declared kind of the written features.
    pub const fn output_kind(&self) -> FeatureKind {
        match self {
            Transform::Flag => FeatureKind::Bool,
            Transform::Scalar(kind)
            | Transform::First(kind)
            | Transform::RefAlt(kind) => *kind,
            Transform::Max | Transform::StrandOddsRatio => FeatureKind::Float,
            Transform::Phasing | Transform::RepeatMasker => FeatureKind::Int,
        }
    }

    const fn expected(&self) -> &'static str {
        match self {
            Transform::Flag => "a flag",
            Transform::Scalar(_) => "a single number",
            Transform::First(_) => "a non-empty number array",
            Transform::RefAlt(_) => "a number array with ref and alt values",
            Transform::Max => "a non-empty number array",
            Transform::Phasing => "a genotype string",
            Transform::StrandOddsRatio => "four integer strand bias counts",
            Transform::RepeatMasker => "repeat masker class labels",
        }
    }

    /// Applies the transform to a present tag value.
    ///
    /// Shape mismatches are reported as [`PzmError::MapperTransform`] for
    /// `tag`. A value of `.` yields nulls, except for flags.
    pub fn apply(
        &self,
        tag: &'static str,
        raw: &RawValue,
    ) -> PzmResult<Vec<FeatureValue>> {
        let shape_err = || {
            PzmError::MapperTransform {
                tag,
                location: String::new(),
                expected: self.expected(),
                found: raw.shape(),
            }
        };

        if matches!(raw, RawValue::Missing) {
            return Ok(match self {
                Transform::Flag => vec![FeatureValue::Bool(true)],
                _ => vec![FeatureValue::Null; self.n_outputs()],
            });
        }

        let values = match self {
            Transform::Flag => vec![FeatureValue::Bool(true)],
            Transform::Scalar(kind) => {
                if raw.arity() != 1 {
                    return Err(shape_err());
                }
                vec![self.read_at(raw, 0, *kind).map_err(|_| shape_err())?]
            },
            Transform::First(kind) => {
                vec![self.read_at(raw, 0, *kind).map_err(|_| shape_err())?]
            },
            Transform::RefAlt(kind) => {
                if raw.arity() < 2 {
                    return Err(shape_err());
                }
                vec![
                    self.read_at(raw, 0, *kind).map_err(|_| shape_err())?,
                    self.read_at(raw, 1, *kind).map_err(|_| shape_err())?,
                ]
            },
            Transform::Max => {
                let elements = (0..raw.arity())
                    .map(|i| raw.numeric_at(i))
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|_| shape_err())?;
                if elements.is_empty() {
                    return Err(shape_err());
                }
                let max = elements.into_iter().flatten().reduce(f64::max);
                vec![FeatureValue::from_numeric(max, FeatureKind::Float)]
            },
            Transform::Phasing => {
                match raw {
                    RawValue::String(gt) => {
                        vec![FeatureValue::Int(if gt.contains('|') { 0 } else { 1 })]
                    },
                    _ => return Err(shape_err()),
                }
            },
            Transform::StrandOddsRatio => {
                if raw.arity() != 4 {
                    return Err(shape_err());
                }
                let counts = (0..4)
                    .map(|i| raw.integer_at(i))
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|_| shape_err())?;
                match counts.into_iter().collect::<Option<Vec<_>>>() {
                    Some(counts) => {
                        let sb = [counts[0], counts[1], counts[2], counts[3]];
                        vec![FeatureValue::Float(strand_odds_ratio(sb)?)]
                    },
                    None => vec![FeatureValue::Null],
                }
            },
            Transform::RepeatMasker => {
                let labels = match raw {
                    RawValue::String(s) => s.split(',').map(str::to_string).collect_vec(),
                    RawValue::StringArray(v) => v.iter().flatten().cloned().collect_vec(),
                    _ => return Err(shape_err()),
                };
                if labels.is_empty() {
                    vec![FeatureValue::Null]
                }
                else {
                    vec![FeatureValue::Int(encode_repeat_masker_labels(&labels)?)]
                }
            },
        };
        Ok(values)
    }

    fn read_at(
        &self,
        raw: &RawValue,
        idx: usize,
        kind: FeatureKind,
    ) -> Result<FeatureValue, ()> {
        match kind {
            FeatureKind::Int => {
                raw.integer_at(idx)
                    .map(|v| v.map(FeatureValue::Int).unwrap_or(FeatureValue::Null))
            },
            _ => raw.numeric_at(idx).map(|v| FeatureValue::from_numeric(v, kind)),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::integer(RawValue::Integer(12), FeatureValue::Int(12))]
    #[case::single_element(RawValue::IntegerArray(vec![Some(7)]), FeatureValue::Int(7))]
    #[case::float_truncates(RawValue::Float(3.9), FeatureValue::Int(3))]
    #[case::missing_element(RawValue::IntegerArray(vec![None]), FeatureValue::Null)]
    fn scalar_int(
        #[case] raw: RawValue,
        #[case] expected: FeatureValue,
    ) {
        let out = Transform::Scalar(FeatureKind::Int).apply("DP", &raw).unwrap();
        assert_eq!(out, vec![expected]);
    }

    #[test]
    fn scalar_rejects_arrays() {
        let err = Transform::Scalar(FeatureKind::Int)
            .apply("DP", &RawValue::IntegerArray(vec![Some(1), Some(2)]))
            .unwrap_err();
        assert!(matches!(err, PzmError::MapperTransform { tag: "DP", .. }));
    }

    #[test]
    fn ref_alt_pair() {
        let raw = RawValue::IntegerArray(vec![Some(30), Some(4), Some(1)]);
        let out = Transform::RefAlt(FeatureKind::Int).apply("AD", &raw).unwrap();
        assert_eq!(out, vec![FeatureValue::Int(30), FeatureValue::Int(4)]);

        let err = Transform::RefAlt(FeatureKind::Int)
            .apply("AD", &RawValue::IntegerArray(vec![Some(30)]))
            .unwrap_err();
        assert!(matches!(err, PzmError::MapperTransform { tag: "AD", .. }));
    }

    #[test]
    fn first_and_max() {
        let raw = RawValue::FloatArray(vec![Some(0.25), Some(0.75)]);
        let first = Transform::First(FeatureKind::Float).apply("AF", &raw).unwrap();
        assert_eq!(first, vec![FeatureValue::Float(0.25)]);
        let max = Transform::Max.apply("GC", &raw).unwrap();
        assert_eq!(max, vec![FeatureValue::Float(0.75)]);
    }

    #[rstest]
    #[case("0|1", 0)]
    #[case("0/1", 1)]
    #[case("1", 1)]
    fn phasing(
        #[case] gt: &str,
        #[case] expected: i64,
    ) {
        let out = Transform::Phasing
            .apply("GT", &RawValue::String(gt.to_string()))
            .unwrap();
        assert_eq!(out, vec![FeatureValue::Int(expected)]);
    }

    #[test]
    fn strand_bias() {
        let raw = RawValue::IntegerArray(vec![Some(1), Some(1), Some(1), Some(1)]);
        let out = Transform::StrandOddsRatio.apply("SB", &raw).unwrap();
        assert_approx_eq!(out[0].as_f64().unwrap(), 2f64.ln());

        let err = Transform::StrandOddsRatio
            .apply("SB", &RawValue::IntegerArray(vec![Some(1); 3]))
            .unwrap_err();
        assert!(matches!(err, PzmError::MapperTransform { tag: "SB", .. }));
    }

    #[test]
    fn repeat_masker_labels() {
        let raw = RawValue::StringArray(vec![Some("DNA".into()), Some("LTR".into())]);
        let out = Transform::RepeatMasker.apply("RMCL", &raw).unwrap();
        assert_eq!(out, vec![FeatureValue::Int(66)]);

        let out = Transform::RepeatMasker
            .apply("RMCL", &RawValue::String("LINE".into()))
            .unwrap();
        assert_eq!(out, vec![FeatureValue::Int(2)]);

        let err = Transform::RepeatMasker
            .apply("RMCL", &RawValue::String("Alu".into()))
            .unwrap_err();
        assert!(matches!(err, PzmError::UnknownLabel(_)));
    }

    #[test]
    fn missing_value_gives_nulls_except_flags() {
        assert_eq!(
            Transform::RefAlt(FeatureKind::Int)
                .apply("AD", &RawValue::Missing)
                .unwrap(),
            vec![FeatureValue::Null, FeatureValue::Null]
        );
        assert_eq!(
            Transform::Flag.apply("LCR", &RawValue::Missing).unwrap(),
            vec![FeatureValue::Bool(true)]
        );
    }
}
