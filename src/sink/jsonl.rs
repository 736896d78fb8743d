//! JSON Lines output.
//!
//! One JSON object per line: successful records with their output field
//! names, error records as `{target, error, message}`.

use std::io::{self, BufWriter, ErrorKind, Write};
use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;

use super::ResultSink;
use crate::models::ScrapeResult;

/// Writer wrapper that ignores broken pipe errors, so `ig_harvest ... | head`
/// exits cleanly.
struct IgnoreBrokenPipe<W: Write> {
    inner: W,
}

impl<W: Write> Write for IgnoreBrokenPipe<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf).or_else(|e| {
            if e.kind() == ErrorKind::BrokenPipe {
                Ok(buf.len())
            } else {
                Err(e)
            }
        })
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush().or_else(|e| {
            if e.kind() == ErrorKind::BrokenPipe {
                Ok(())
            } else {
                Err(e)
            }
        })
    }
}

/// Writes results as JSON Lines to a file or stdout.
pub struct JsonlSink {
    writer: Box<dyn Write + Send>,
    written: usize,
}

impl JsonlSink {
    /// Creates (or truncates) `path`.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be created.
    pub async fn create(path: &Path) -> Result<Self> {
        let file = tokio::fs::File::create(path)
            .await
            .with_context(|| format!("Failed to create output file: {}", path.display()))?
            .into_std()
            .await;
        Ok(Self::from_writer(Box::new(BufWriter::new(file))))
    }

    pub fn stdout() -> Self {
        Self::from_writer(Box::new(IgnoreBrokenPipe { inner: io::stdout() }))
    }

    /// File output if a path is given, stdout otherwise.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be created.
    pub async fn from_output(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::create(path).await,
            None => Ok(Self::stdout()),
        }
    }

    pub fn from_writer(writer: Box<dyn Write + Send>) -> Self {
        Self { writer, written: 0 }
    }

    /// Lines written so far.
    pub fn written(&self) -> usize {
        self.written
    }
}

#[async_trait]
impl ResultSink for JsonlSink {
    async fn write_all(&mut self, results: &[ScrapeResult]) -> Result<usize> {
        for result in results {
            serde_json::to_writer(&mut self.writer, result)
                .context("Failed to serialize result")?;
            self.writer
                .write_all(b"\n")
                .context("Failed to write output")?;
        }
        self.written += results.len();
        Ok(results.len())
    }

    async fn finish(&mut self) -> Result<()> {
        self.writer.flush().context("Failed to flush output")
    }
}
