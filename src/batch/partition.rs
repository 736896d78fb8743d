//! Splitting targets into batches.

use crate::models::ScrapeTarget;

/// Splits `targets` into consecutive batches of `batch_size`; the last batch
/// may be smaller. A `batch_size` of 0 is treated as 1.
pub fn partition(targets: Vec<ScrapeTarget>, batch_size: usize) -> Vec<Vec<ScrapeTarget>> {
    let batch_size = batch_size.max(1);
    let mut batches = Vec::with_capacity(targets.len().div_ceil(batch_size));
    let mut targets = targets.into_iter().peekable();
    while targets.peek().is_some() {
        batches.push(targets.by_ref().take(batch_size).collect());
    }
    batches
}
