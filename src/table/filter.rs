use itertools::{
    izip,
    Itertools,
};
use log::{
    debug,
    info,
};
use polars::prelude::*;

use super::schema::IdentityColumn;
use crate::data_structs::coords::{
    ContigIntervalMap,
    STATIC_BLACKLIST,
};

/// Raw allele fraction from which unvalidated variants are considered
/// germline.
pub const AF_THRESHOLD: f64 = 0.3675;

const AF_COL: &str = "af";
const SIMPLEREP_COL: &str = "simplerep";
const SEGDUP_COL: &str = "segdup";

/// Rule-based removal of likely artefacts.
///
/// 1. Rows without a validation label and with `af >= 0.3675`, a simple
///    repeat or a segmental duplication.
/// 2. Rows inside the static blacklist regions.
/// 3. Rows overlapping an optional BED blacklist.
#[derive(Debug, Default)]
pub struct HardFilter {
    blacklist: Option<ContigIntervalMap<String>>,
}

impl HardFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blacklist(
        mut self,
        blacklist: ContigIntervalMap<String>,
    ) -> Self {
        self.blacklist = Some(blacklist);
        self
    }

    pub fn blacklist(&self) -> Option<&ContigIntervalMap<String>> {
        self.blacklist.as_ref()
    }

    /// Computes which rows survive every rule. Nulls in `af`, `simplerep` and
    /// `segdup` count as false.
    pub fn keep_mask(
        &self,
        df: &DataFrame,
    ) -> PolarsResult<BooleanChunked> {
        let chrom = df.column(IdentityColumn::Chrom.as_str())?.str()?;
        let pos = df.column(IdentityColumn::Pos.as_str())?.i64()?;
        let is_pzm = df.column(IdentityColumn::IsPzm.as_str())?.bool()?;
        let af_col = df.column(AF_COL)?.cast(&DataType::Float64)?;
        let af = af_col.f64()?;
        let simplerep = df.column(SIMPLEREP_COL)?.bool()?;
        let segdup = df.column(SEGDUP_COL)?.bool()?;

        let mut keep = izip!(is_pzm, af, simplerep, segdup)
            .map(|(pzm, af, simplerep, segdup)| {
                let suspicious = af.is_some_and(|v| v >= AF_THRESHOLD)
                    || simplerep.unwrap_or(false)
                    || segdup.unwrap_or(false);
                !(pzm.is_none() && suspicious)
            })
            .collect_vec();
        debug!(
            "Cohort rule removes {} rows",
            keep.iter().filter(|k| !**k).count()
        );

        let loci = chrom
            .into_iter()
            .zip(pos)
            .map(|(chrom, pos)| chrom.zip(pos.and_then(|p| u64::try_from(p).ok())))
            .collect_vec();

        for (keep, locus) in keep.iter_mut().zip(loci.iter()) {
            if let Some((chrom, pos)) = locus {
                if STATIC_BLACKLIST.iter().any(|r| r.contains(chrom, *pos)) {
                    *keep = false;
                }
            }
        }

        if let Some(blacklist) = self.blacklist.as_ref() {
            let queries = loci
                .iter()
                .enumerate()
                .filter_map(|(idx, locus)| locus.map(|(c, p)| (idx, c, p)))
                .collect_vec();
            let hits = blacklist.overlaps(queries.iter().map(|(_, c, p)| (*c, *p)));
            debug!("External blacklist overlaps {} rows", hits.len());
            for (query_idx, _) in hits {
                keep[queries[query_idx].0] = false;
            }
        }

        Ok(BooleanChunked::from_slice("keep".into(), &keep))
    }

    /// Removes the rows of `df` failing any rule.
    pub fn apply(
        &self,
        df: &DataFrame,
    ) -> PolarsResult<DataFrame> {
        let mask = self.keep_mask(df)?;
        let filtered = df.filter(&mask)?;
        info!(
            "Hard filter kept {} of {} rows",
            filtered.height(),
            df.height()
        );
        Ok(filtered)
    }
}
