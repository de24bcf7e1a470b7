//! Pairwise comparison of a candidate set and grouping of the matches.

mod union_find;

pub use union_find::DisjointSet;

use log::{info, trace};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{Error, Result};
use crate::processing::{ImageCodec, ScanProgress, SimilarityScorer};
use crate::types::{DuplicateGroup, ScanOutcome, ScanStats};

/// Runs every pairwise comparison over a candidate set and merges matches
///
/// The threshold is used as given; callers clamp it beforehand.
pub struct DuplicateGrouper<C> {
    scorer: SimilarityScorer<C>,
    threshold: f64,
}

impl<C: ImageCodec> DuplicateGrouper<C> {
    pub fn new(scorer: SimilarityScorer<C>, threshold: f64) -> Self {
        Self { scorer, threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Compare every unordered pair of `candidates` once and group the matches
    ///
    /// Pairs are linked when their score meets the threshold; linked pairs are
    /// merged transitively. Members of a group keep candidate order and groups
    /// are ordered by their first member. `progress` receives the outer
    /// (first-of-pair) and inner (second-of-pair) positions; `cancel` is
    /// checked before every comparison.
    pub fn group(
        &self,
        candidates: &BTreeSet<PathBuf>,
        progress: &ScanProgress,
        cancel: &AtomicBool,
    ) -> Result<ScanOutcome> {
        let paths: Vec<&PathBuf> = candidates.iter().collect();
        let count = paths.len();

        let mut links = DisjointSet::new(count);
        let mut stats = ScanStats::default();

        progress.start_outer(count);
        for i in 0..count {
            progress.set_outer(i);

            let remaining = count - i - 1;
            progress.start_inner(remaining);
            for (offset, j) in (i + 1..count).enumerate() {
                if cancel.load(Ordering::Relaxed) {
                    info!("Scan interrupted after {} comparison(s)", stats.compared);
                    return Err(Error::Interrupted);
                }
                progress.set_inner(offset);

                let result = self.scorer.score(paths[i], paths[j]);
                let matched = result.meets(self.threshold);
                stats.record(&result, matched);

                if matched {
                    trace!(
                        "Match {:?}: {} <-> {}",
                        result,
                        paths[i].display(),
                        paths[j].display()
                    );
                    links.union(i, j);
                }
            }
            progress.set_inner(remaining);
        }
        progress.finish();

        let groups: Vec<DuplicateGroup> = links
            .components(2)
            .into_iter()
            .map(|members| {
                DuplicateGroup::new(members.into_iter().map(|k| paths[k].clone()).collect())
            })
            .collect();

        info!(
            "Compared {} pair(s): {} matched, {} skipped, {} decode failure(s), {} group(s)",
            stats.compared,
            stats.matched,
            stats.skipped,
            stats.decode_failures,
            groups.len()
        );

        Ok(ScanOutcome { groups, stats })
    }
}
