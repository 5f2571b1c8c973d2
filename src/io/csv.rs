use std::fs::File;
use std::path::{
    Path,
    PathBuf,
};

use anyhow::Context;
use log::info;
use polars::prelude::*;

/// `<dir>/predict_<basename>.csv` for a VCF at `vcf_path`.
///
/// A trailing `.gz` is removed before the last extension, so both
/// `sample.vcf` and `sample.vcf.gz` map to `predict_sample.csv`.
pub fn prediction_output_path<P: AsRef<Path>>(vcf_path: P) -> PathBuf {
    let vcf_path = vcf_path.as_ref();
    let mut stem = PathBuf::from(vcf_path.file_name().unwrap_or_default());
    if stem.extension().is_some_and(|ext| ext == "gz") {
        stem.set_extension("");
    }
    stem.set_extension("");
    let file_name = format!("predict_{}.csv", stem.to_string_lossy());
    vcf_path
        .parent()
        .map(|dir| dir.join(&file_name))
        .unwrap_or_else(|| PathBuf::from(&file_name))
}

/// Writes a table as comma separated values with a header line.
pub fn write_csv<P: AsRef<Path>>(
    df: &mut DataFrame,
    path: P,
) -> anyhow::Result<()> {
    let path = path.as_ref();
    let sink =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    CsvWriter::new(sink)
        .include_header(true)
        .with_separator(b',')
        .finish(df)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Wrote {} rows to {}", df.height(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("/data/run1/sample.vcf", "/data/run1/predict_sample.csv")]
    #[case("/data/run1/sample.vcf.gz", "/data/run1/predict_sample.csv")]
    #[case("sample.vcf.gz", "predict_sample.csv")]
    #[case("/data/noext", "/data/predict_noext.csv")]
    fn output_naming(
        #[case] input: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(prediction_output_path(input), PathBuf::from(expected));
    }

    #[test]
    fn writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let mut df = df!(
            "chrom" => ["chr1", "chr2"],
            "pos" => [10i64, 20],
            "y_predict" => ["PZM", "Not_PZM"],
        )
        .unwrap();
        write_csv(&mut df, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "chrom,pos,y_predict");
        assert_eq!(lines[1], "chr1,10,PZM");
        assert_eq!(lines.len(), 3);
    }
}
