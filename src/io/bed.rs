use std::path::Path;

use bio::io::bed;
use log::info;

use crate::data_structs::coords::{
    ContigIntervalMap,
    LabeledInterval,
};
use crate::error::{
    PzmError,
    PzmResult,
};

/// Reads a BED file of blacklist intervals.
///
/// Every line must have the same number of columns. Intervals without a
/// name column are labelled `chrom:start-end`.
///
/// # Errors
///
/// [`PzmError::BlacklistLoad`] when the file can not be opened or a line is
/// not a valid BED record.
pub fn read_blacklist<P: AsRef<Path>>(path: P) -> PzmResult<ContigIntervalMap<String>> {
    let path = path.as_ref();
    let load_err = |reason: String| {
        PzmError::BlacklistLoad {
            path: path.to_path_buf(),
            reason,
        }
    };

    let mut reader = bed::Reader::from_file(path).map_err(|e| load_err(e.to_string()))?;
    let intervals = reader
        .records()
        .enumerate()
        .map(|(idx, record)| {
            let record =
                record.map_err(|e| load_err(format!("record #{}: {}", idx + 1, e)))?;
            if record.start() > record.end() {
                return Err(load_err(format!(
                    "record #{} starts after it ends ({} > {})",
                    idx + 1,
                    record.start(),
                    record.end()
                )));
            }
            Ok(LabeledInterval::from(record))
        })
        .collect::<PzmResult<Vec<_>>>()?;

    let map: ContigIntervalMap<String> = intervals.into_iter().collect();
    info!(
        "Loaded {} blacklist intervals on {} chromosomes from {}",
        map.n_intervals(),
        map.n_chr(),
        path.display()
    );
    Ok(map)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn bed_file(lines: &[&str]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(file, "{line}").unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[test]
    fn reads_labeled_intervals() {
        let file = bed_file(&["chr1\t100\t200\tfirst", "chr7\t0\t50\tthird"]);

        let map = read_blacklist(file.path()).unwrap();
        assert_eq!(map.n_intervals(), 2);
        assert_eq!(map.n_chr(), 2);
        assert_eq!(map.find("chr1", 150, 151), vec![&"first".to_string()]);
        assert!(map.find("chr7", 50, 51).is_empty());
    }

    #[test]
    fn unnamed_intervals_are_labeled_by_location() {
        let file = bed_file(&["chr1\t500\t600", "chr2\t10\t20"]);

        let map = read_blacklist(file.path()).unwrap();
        assert_eq!(map.n_intervals(), 2);
        assert_eq!(map.find("chr1", 550, 551), vec![&"chr1:500-600".to_string()]);
        assert_eq!(map.find("chr2", 10, 11), vec![&"chr2:10-20".to_string()]);
    }

    #[test]
    fn mixed_column_counts_are_a_load_error() {
        let file = bed_file(&["chr1\t100\t200\tfirst", "chr1\t500\t600"]);

        let err = read_blacklist(file.path()).unwrap_err();
        assert!(matches!(err, PzmError::BlacklistLoad { .. }));
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let err = read_blacklist("/nonexistent/blacklist.bed").unwrap_err();
        assert!(matches!(err, PzmError::BlacklistLoad { .. }));
    }

    #[test]
    fn corrupt_record_is_a_load_error() {
        let file = bed_file(&["chr1\tnot_a_number\t200"]);

        let err = read_blacklist(file.path()).unwrap_err();
        assert!(matches!(err, PzmError::BlacklistLoad { .. }));
    }
}
