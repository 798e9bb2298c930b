//! Running tally of classified emotions across one video.
//!
//! Single-writer by design: only the pipeline driver records into the tally,
//! once per successfully classified face, in frame order. Increments are
//! commutative, so a future sharded driver can keep one tally per worker and
//! `merge` them at the end.

use std::collections::BTreeMap;

use crate::emotion::Emotion;

/// Per-label counts of successful emotion classifications.
///
/// Counts are monotonically non-decreasing across a run. The map is ordered
/// so snapshots and reports are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmotionTally {
    counts: BTreeMap<Emotion, u64>,
}

impl EmotionTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increments the count for `label`, creating the entry at 1 if this is
    /// the first sighting.
    pub fn record(&mut self, label: Emotion) {
        *self.counts.entry(label).or_insert(0) += 1;
    }

    /// Current totals, in label order.
    pub fn snapshot(&self) -> &BTreeMap<Emotion, u64> {
        &self.counts
    }

    /// Total number of recorded classifications.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Whether nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Adds every count from `other` into this tally. Commutative with
    /// `record`, which makes per-worker sharding safe.
    pub fn merge(&mut self, other: &EmotionTally) {
        for (label, count) in &other.counts {
            *self.counts.entry(*label).or_insert(0) += count;
        }
    }
}
