//! Target list input.

use std::path::Path;

use anyhow::{Context, Result};
use log::{info, warn};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::models::ScrapeTarget;

/// Reads targets from a file, or from stdin when `path` is `-`.
///
/// # Errors
///
/// Fails if the file cannot be opened.
pub async fn read_targets(path: &Path) -> Result<Vec<ScrapeTarget>> {
    if path.as_os_str() == "-" {
        info!("Reading targets from stdin");
        return Ok(read_targets_from(BufReader::new(tokio::io::stdin())).await);
    }

    let file = tokio::fs::File::open(path)
        .await
        .with_context(|| format!("Failed to open input file: {}", path.display()))?;
    let targets = read_targets_from(BufReader::new(file)).await;
    info!("Total targets in file: {}", targets.len());
    Ok(targets)
}

/// Parses one target per line. Blank lines and `#` comments are skipped;
/// lines that are not a recognizable target are logged and skipped.
pub async fn read_targets_from<R: AsyncBufRead + Unpin>(reader: R) -> Vec<ScrapeTarget> {
    let mut targets = Vec::new();
    let mut lines = reader.lines();
    let mut line_number = 0usize;

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                warn!("Failed to read line from input: {e}");
                break;
            }
        };
        line_number += 1;

        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        match trimmed.parse::<ScrapeTarget>() {
            Ok(target) => targets.push(target),
            Err(e) => warn!("Skipping line {}: {}", line_number, e),
        }
    }

    targets
}
