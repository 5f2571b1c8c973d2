mod interval_map;

pub use interval_map::ContigIntervalMap;

/// Closed genomic interval `[start, end]` on a named chromosome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlacklistRegion {
    chrom: &'static str,
    start: u64,
    end:   u64,
}

impl BlacklistRegion {
    pub const fn new(
        chrom: &'static str,
        start: u64,
        end: u64,
    ) -> Self {
        assert!(start <= end, "Start must not be greater than end");
        Self { chrom, start, end }
    }

    pub fn chrom(&self) -> &'static str {
        self.chrom
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn end(&self) -> u64 {
        self.end
    }

    /// Inclusive on both bounds, chromosome names must match exactly.
    pub fn contains(
        &self,
        chrom: &str,
        pos: u64,
    ) -> bool {
        self.chrom == chrom && self.start <= pos && pos <= self.end
    }
}

/// Regions that produce artefactual calls regardless of the sample: the IGH
/// locus (chr14), IGK (chr2), IGL (chr22) and the MHC (chr6).
pub const STATIC_BLACKLIST: [BlacklistRegion; 4] = [
    BlacklistRegion::new("chr14", 105_586_437, 106_879_844),
    BlacklistRegion::new("chr2", 88_857_361, 90_235_368),
    BlacklistRegion::new("chr22", 22_026_076, 22_922_913),
    BlacklistRegion::new("chr6", 28_510_120, 33_480_577),
];

/// Half-open interval `[start, end)` with a label, as read from BED.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LabeledInterval {
    pub chrom: String,
    pub start: u64,
    pub end:   u64,
    pub label: String,
}

impl LabeledInterval {
    pub fn new(
        chrom: impl Into<String>,
        start: u64,
        end: u64,
        label: impl Into<String>,
    ) -> Self {
        Self {
            chrom: chrom.into(),
            start,
            end,
            label: label.into(),
        }
    }
}

impl From<bio::io::bed::Record> for LabeledInterval {
    fn from(value: bio::io::bed::Record) -> Self {
        let label = value.name().map(str::to_string).unwrap_or_else(|| {
            format!("{}:{}-{}", value.chrom(), value.start(), value.end())
        });
        Self {
            chrom: value.chrom().to_string(),
            start: value.start(),
            end: value.end(),
            label,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_blacklist_bounds_are_inclusive() {
        let igh = STATIC_BLACKLIST[0];
        assert!(igh.contains("chr14", 105_586_437));
        assert!(igh.contains("chr14", 106_879_844));
        assert!(igh.contains("chr14", 105_600_000));
        assert!(!igh.contains("chr14", 105_586_436));
        assert!(!igh.contains("chr14", 106_879_845));
        assert!(!igh.contains("14", 105_600_000));
    }
}
