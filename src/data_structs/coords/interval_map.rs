use hashbrown::HashMap;
use itertools::Itertools;
use rust_lapper::{
    Interval,
    Lapper,
};

use super::LabeledInterval;

pub type PosType = u64;

/// Per-chromosome interval index answering point-overlap queries.
#[derive(Clone, Debug)]
pub struct ContigIntervalMap<V>
where
    V: Sync + Send + Eq + Clone, {
    inner: HashMap<String, Lapper<PosType, V>>,
}

impl<V> Default for ContigIntervalMap<V>
where
    V: Sync + Send + Eq + Clone,
{
    fn default() -> Self {
        Self {
            inner: HashMap::new(),
        }
    }
}

impl FromIterator<LabeledInterval> for ContigIntervalMap<String> {
    fn from_iter<T: IntoIterator<Item = LabeledInterval>>(iter: T) -> Self {
        let multimap = iter
            .into_iter()
            .map(|interval| (interval.chrom.clone(), interval))
            .into_group_map();

        let mut inner = HashMap::with_capacity(multimap.len());
        for (chr, intervals) in multimap.into_iter() {
            let imap = Lapper::new(
                intervals
                    .into_iter()
                    .map(|i| {
                        Interval {
                            start: i.start,
                            stop:  i.end,
                            val:   i.label,
                        }
                    })
                    .collect_vec(),
            );
            inner.insert(chr, imap);
        }

        Self { inner }
    }
}

impl<V> ContigIntervalMap<V>
where
    V: Sync + Send + Eq + Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn n_intervals(&self) -> usize {
        self.inner.values().map(|v| v.len()).sum()
    }

    pub fn n_chr(&self) -> usize {
        self.inner.len()
    }

    pub fn insert(
        &mut self,
        chrom: &str,
        start: PosType,
        end: PosType,
        value: V,
    ) {
        let imap = self
            .inner
            .entry(chrom.to_string())
            .or_insert_with(|| Lapper::new(vec![]));
        imap.insert(Interval {
            start,
            stop: end,
            val: value,
        });
    }

    /// Values of the intervals overlapping `[start, end)` on `chrom`.
    pub fn find(
        &self,
        chrom: &str,
        start: PosType,
        end: PosType,
    ) -> Vec<&V> {
        self.inner
            .get(chrom)
            .map(|imap| imap.find(start, end).map(|e| &e.val).collect_vec())
            .unwrap_or_default()
    }

    /// Intersects point queries `[pos, pos + 1)` with the stored intervals.
    ///
    /// Returns `(query index, overlapping values)` for every query hitting at
    /// least one interval, in query order.
    pub fn overlaps<S: AsRef<str>>(
        &self,
        queries: impl IntoIterator<Item = (S, PosType)>,
    ) -> Vec<(usize, Vec<&V>)> {
        queries
            .into_iter()
            .enumerate()
            .filter_map(|(idx, (chrom, pos))| {
                let hits = self.find(chrom.as_ref(), pos, pos + 1);
                (!hits.is_empty()).then_some((idx, hits))
            })
            .collect_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map() -> ContigIntervalMap<String> {
        [
            LabeledInterval::new("chr1", 100, 200, "a"),
            LabeledInterval::new("chr1", 150, 300, "b"),
            LabeledInterval::new("chr2", 0, 10, "c"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn counts_intervals_per_contig() {
        let map = map();
        assert_eq!(map.n_intervals(), 3);
        assert_eq!(map.n_chr(), 2);
    }

    #[test]
    fn point_queries_use_half_open_bounds() {
        let map = map();
        let hits = map.overlaps([
            ("chr1", 99),
            ("chr1", 100),
            ("chr1", 199),
            ("chr1", 200),
            ("chr1", 300),
            ("chr3", 5),
            ("chr2", 9),
        ]);
        let hit_idx = hits.iter().map(|(i, _)| *i).collect_vec();
        assert_eq!(hit_idx, vec![1, 2, 3, 6]);

        let labels = hits[2].1.iter().map(|s| s.as_str()).sorted().collect_vec();
        assert_eq!(labels, vec!["b"]);
        let labels = hits[1].1.iter().map(|s| s.as_str()).sorted().collect_vec();
        assert_eq!(labels, vec!["a", "b"]);
    }

    #[test]
    fn inserted_intervals_are_searchable() {
        let mut map = ContigIntervalMap::new();
        map.insert("chrX", 5, 6, 1u8);
        assert_eq!(map.find("chrX", 5, 6), vec![&1u8]);
        assert!(map.find("chrX", 6, 7).is_empty());
    }
}
