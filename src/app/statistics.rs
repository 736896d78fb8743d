//! Final statistics printing.

use log::info;
use strum::IntoEnumIterator;

use crate::error_handling::{FailureKind, FailureStats};

/// Prints failed-attempt counts per kind to the log.
///
/// Counts are attempts, not targets: a target retried over three rounds can
/// contribute three.
pub fn print_failure_statistics(stats: &FailureStats) {
    let total = stats.total();
    if total == 0 {
        return;
    }

    info!("Failed attempts ({} total):", total);
    for kind in FailureKind::iter() {
        let count = stats.count(kind);
        if count > 0 {
            info!("   {}: {}", kind.as_str(), count);
        }
    }
}

/// Prints a one-line summary of a run.
pub fn print_run_summary(total: usize, fetched: usize, failed: usize, elapsed_seconds: f64) {
    info!(
        "✅ Processed {} target{} ({} fetched, {} not fetched) in {:.1}s",
        total,
        if total == 1 { "" } else { "s" },
        fetched,
        failed,
        elapsed_seconds
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handling::FailureReason;

    #[test]
    fn test_print_failure_statistics_no_failures() {
        print_failure_statistics(&FailureStats::new());
    }

    #[test]
    fn test_print_failure_statistics_with_failures() {
        let mut stats = FailureStats::new();
        stats.record(&FailureReason::Timeout);
        stats.record(&FailureReason::HttpStatus(429));
        stats.record(&FailureReason::HttpStatus(503));
        print_failure_statistics(&stats);
        assert_eq!(stats.count(FailureKind::HttpStatus), 2);
    }

    #[test]
    fn test_print_run_summary() {
        print_run_summary(1, 1, 0, 0.5);
        print_run_summary(10, 7, 3, 12.0);
    }
}
