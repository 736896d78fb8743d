//! Failure statistics.
//!
//! Counts failures per `FailureKind`. The scheduler fills it from the values
//! batches return between rounds, so it needs no interior mutability.

use std::collections::HashMap;
use strum::IntoEnumIterator;

use super::types::{FailureKind, FailureReason};

/// Per-kind failure counters for one run.
///
/// Every kind is initialized to zero on creation.
#[derive(Debug, Clone)]
pub struct FailureStats {
    counts: HashMap<FailureKind, usize>,
}

impl Default for FailureStats {
    fn default() -> Self {
        Self::new()
    }
}

impl FailureStats {
    pub fn new() -> Self {
        let counts = FailureKind::iter().map(|kind| (kind, 0)).collect();
        FailureStats { counts }
    }

    /// Records one failed attempt.
    pub fn record(&mut self, reason: &FailureReason) {
        *self.counts.entry(reason.kind()).or_insert(0) += 1;
    }

    pub fn count(&self, kind: FailureKind) -> usize {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Adds another run's counters into this one.
    pub fn merge(&mut self, other: &FailureStats) {
        for (kind, count) in &other.counts {
            *self.counts.entry(*kind).or_insert(0) += count;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_stats_are_zero() {
        let stats = FailureStats::new();
        for kind in FailureKind::iter() {
            assert_eq!(stats.count(kind), 0);
        }
        assert_eq!(stats.total(), 0);
    }

    #[test]
    fn test_record_and_merge() {
        let mut stats = FailureStats::new();
        stats.record(&FailureReason::Timeout);
        stats.record(&FailureReason::HttpStatus(429));
        stats.record(&FailureReason::HttpStatus(500));

        let mut other = FailureStats::new();
        other.record(&FailureReason::Timeout);
        stats.merge(&other);

        assert_eq!(stats.count(FailureKind::Timeout), 2);
        assert_eq!(stats.count(FailureKind::HttpStatus), 2);
        assert_eq!(stats.total(), 4);
    }
}
