//! Derived metrics computed from raw annotation values.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use itertools::Itertools;

use crate::data_structs::RepeatMaskerClass;
use crate::error::{
    PzmError,
    PzmResult,
};

/// Strand odds ratio of a `(ref_fw, ref_rv, alt_fw, alt_rv)` strand bias
/// tuple, with a pseudocount of one added to every count.
pub fn strand_odds_ratio(sb: [i64; 4]) -> PzmResult<f64> {
    let smoothed = sb.map(|count| count + 1);
    if let Some(count) = smoothed.iter().find(|c| **c <= 0) {
        return Err(PzmError::Domain(format!(
            "strand bias counts {:?} contain a non-positive smoothed count {}",
            sb, count
        )));
    }
    let [ref_fw, ref_rv, alt_fw, alt_rv] = smoothed.map(|c| c as f64);

    let symmetrical_ratio =
        (ref_fw * alt_rv) / (alt_fw * ref_rv) + (alt_fw * ref_rv) / (ref_fw * alt_rv);
    let ref_ratio = ref_rv / ref_fw;
    let alt_ratio = alt_fw / alt_rv;
    let sor = symmetrical_ratio.ln() + ref_ratio.ln() - alt_ratio.ln();

    if !sor.is_finite() {
        return Err(PzmError::Domain(format!(
            "strand odds ratio of {:?} is not finite",
            sb
        )));
    }
    Ok(sor)
}

/// Packs an ordered tuple of classes into one integer, least significant
/// digit first, with radix [`RepeatMaskerClass::N_CLASSES`].
pub fn encode_repeat_masker(classes: &[RepeatMaskerClass]) -> PzmResult<i64> {
    classes
        .iter()
        .enumerate()
        .try_fold(0i64, |acc, (i, class)| {
            u32::try_from(i)
                .ok()
                .and_then(|exp| RepeatMaskerClass::N_CLASSES.checked_pow(exp))
                .and_then(|weight| class.index().checked_mul(weight))
                .and_then(|digit| acc.checked_add(digit))
        })
        .ok_or_else(|| {
            PzmError::Domain(format!(
                "{} repeat masker classes do not fit into one encoded value",
                classes.len()
            ))
        })
}

/// Parses labels and packs them, see [`encode_repeat_masker`].
pub fn encode_repeat_masker_labels<S: AsRef<str>>(labels: &[S]) -> PzmResult<i64> {
    let classes = labels
        .iter()
        .map(|label| label.as_ref().parse::<RepeatMaskerClass>())
        .collect::<PzmResult<Vec<_>>>()?;
    encode_repeat_masker(&classes)
}

/// Reverses [`encode_repeat_masker`] for a tuple of `n_labels` classes.
///
/// The length is needed because trailing `DNA` digits (index 0) are not
/// visible in the packed value.
pub fn decode_repeat_masker(
    code: i64,
    n_labels: usize,
) -> PzmResult<Vec<RepeatMaskerClass>> {
    if code < 0 {
        return Err(PzmError::Domain(format!(
            "negative repeat masker code {code}"
        )));
    }
    let mut rest = code;
    let classes = (0..n_labels)
        .map(|_| {
            let digit = rest % RepeatMaskerClass::N_CLASSES;
            rest /= RepeatMaskerClass::N_CLASSES;
            RepeatMaskerClass::from_index(digit)
        })
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| PzmError::Domain(format!("invalid repeat masker code {code}")))?;
    if rest != 0 {
        return Err(PzmError::Domain(format!(
            "repeat masker code {code} holds more than {n_labels} classes"
        )));
    }
    Ok(classes)
}

/// Encoding used when a site has no repeat masker annotation.
pub fn no_repeat_masker_code() -> i64 {
    RepeatMaskerClass::NoRepeatMasker.index()
}

/// Base64 identifier of a variant, stable across samples and runs.
///
/// The chromosome is lower-cased and stripped of `chr` so that `chr1`,
/// `CHR1` and `1` produce the same fingerprint.
pub fn variant_fingerprint<S: AsRef<str>>(
    chrom: &str,
    pos: i64,
    reference: &str,
    alts: &[S],
) -> String {
    let chrom = chrom.to_lowercase().replace("chr", "");
    let id_phrase = [chrom, pos.to_string(), reference.to_string()]
        .into_iter()
        .chain(alts.iter().map(|alt| alt.as_ref().to_string()))
        .join("_");
    BASE64.encode(id_phrase.as_bytes())
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;
    use rstest::rstest;

    use super::*;

    #[test]
    fn sor_without_strand_bias() {
        // all smoothed counts equal: ln(1 + 1) + ln(1) - ln(1)
        assert_approx_eq!(strand_odds_ratio([1, 1, 1, 1]).unwrap(), 2f64.ln());
        assert_approx_eq!(strand_odds_ratio([0, 0, 0, 0]).unwrap(), 2f64.ln());
    }

    #[test]
    fn sor_matches_reference_value() {
        // smoothed (11, 21, 6, 2)
        let expected = ((11f64 * 2.) / (6. * 21.) + (6. * 21.) / (11. * 2.)).ln()
            + (21f64 / 11.).ln()
            - (6f64 / 2.).ln();
        assert_approx_eq!(strand_odds_ratio([10, 20, 5, 1]).unwrap(), expected);
    }

    #[rstest]
    #[case([10, 20, 5, 1])]
    #[case([3, 0, 7, 9])]
    #[case([100, 1, 1, 100])]
    fn sor_is_invariant_to_allele_swap(#[case] sb: [i64; 4]) {
        let [ref_fw, ref_rv, alt_fw, alt_rv] = sb;
        assert_approx_eq!(
            strand_odds_ratio(sb).unwrap(),
            strand_odds_ratio([alt_fw, alt_rv, ref_fw, ref_rv]).unwrap()
        );
    }

    #[test]
    fn sor_rejects_non_positive_counts() {
        assert!(matches!(
            strand_odds_ratio([-1, 2, 3, 4]),
            Err(PzmError::Domain(_))
        ));
    }

    #[test]
    fn repeat_masker_round_trip() {
        let code = encode_repeat_masker_labels(&["LINE"]).unwrap();
        assert_eq!(code, 2);
        assert_eq!(
            decode_repeat_masker(code, 1).unwrap(),
            vec![RepeatMaskerClass::Line]
        );

        let classes = [
            RepeatMaskerClass::SimpleRepeat,
            RepeatMaskerClass::Dna,
            RepeatMaskerClass::TRna,
        ];
        let code = encode_repeat_masker(&classes).unwrap();
        assert_eq!(decode_repeat_masker(code, 3).unwrap(), classes.to_vec());
    }

    #[test]
    fn repeat_masker_encoding_is_order_sensitive() {
        let dna_ltr = encode_repeat_masker_labels(&["DNA", "LTR"]).unwrap();
        let ltr_dna = encode_repeat_masker_labels(&["LTR", "DNA"]).unwrap();
        assert_eq!(dna_ltr, 3 * 22);
        assert_eq!(ltr_dna, 3);
        assert_ne!(dna_ltr, ltr_dna);
    }

    #[test]
    fn repeat_masker_default_code() {
        assert_eq!(
            encode_repeat_masker_labels(&["no_repeat_masker"]).unwrap(),
            no_repeat_masker_code()
        );
        assert_eq!(no_repeat_masker_code(), 21);
    }

    #[test]
    fn repeat_masker_rejects_unknown_labels() {
        assert!(matches!(
            encode_repeat_masker_labels(&["LINE", "Alu"]),
            Err(PzmError::UnknownLabel(label)) if label == "Alu"
        ));
    }

    #[test]
    fn repeat_masker_overflow_is_a_domain_error() {
        let classes = vec![RepeatMaskerClass::NoRepeatMasker; 20];
        assert!(matches!(
            encode_repeat_masker(&classes),
            Err(PzmError::Domain(_))
        ));
    }

    #[rstest]
    #[case("chr1", "CHR1")]
    #[case("1", "chr1")]
    #[case("Chr1", "1")]
    fn fingerprint_ignores_case_and_chr_prefix(
        #[case] left: &str,
        #[case] right: &str,
    ) {
        assert_eq!(
            variant_fingerprint(left, 100, "A", &["T"]),
            variant_fingerprint(right, 100, "A", &["T"])
        );
    }

    #[test]
    fn fingerprint_encodes_underscore_joined_identity() {
        // base64("1_100_A_T_G")
        assert_eq!(
            variant_fingerprint("chr1", 100, "A", &["T", "G"]),
            "MV8xMDBfQV9UX0c="
        );
        assert_ne!(
            variant_fingerprint("chr1", 100, "A", &["T"]),
            variant_fingerprint("chr1", 101, "A", &["T"])
        );
    }
}
