//! Round progress logging.

use log::info;

/// What one scheduler round did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundSummary {
    /// 1-based round number
    pub round: usize,
    /// Targets run this round
    pub attempted: usize,
    pub fetched: usize,
    /// Failures given up on right away (unauthorized, malformed)
    pub terminal: usize,
    /// Failures carried into the next round
    pub retryable: usize,
    /// Consecutive rounds without progress, after this round
    pub stagnation: usize,
}

/// Logs a round summary.
pub fn log_round(summary: &RoundSummary) {
    info!(
        "Round {}: {} attempted, {} fetched, {} failed permanently, {} pending (stagnation {})",
        summary.round,
        summary.attempted,
        summary.fetched,
        summary.terminal,
        summary.retryable,
        summary.stagnation
    );
}

/// Logs overall throughput.
///
/// # Arguments
///
/// * `start_time` - The start time of processing
/// * `completed` - Targets accounted for so far
pub fn log_progress(start_time: std::time::Instant, completed: usize) {
    let elapsed_secs = start_time.elapsed().as_secs_f64();
    let rate = if elapsed_secs > 0.0 {
        completed as f64 / elapsed_secs
    } else {
        0.0
    };
    info!(
        "Processed {} targets in {:.2} seconds (~{:.2} targets/sec)",
        completed, elapsed_secs, rate
    );
}
