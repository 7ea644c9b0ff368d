//! Streaming processing module for log files
//!
//! Reads a file line by line, groups lines into chunks, maps each chunk on a
//! blocking worker and hands the results back in input order. The skip
//! policy and all counters are applied here, sequentially, so a run always
//! reports the same numbers for the same input.

use super::skip::SkipPolicy;
use super::writer::RecordSink;
use crate::config::ProcessorConfig;
use crate::error::{LineError, LineErrorKind, ProcessorError, Result};
use crate::models::{LogRecord, ProcessingStats};
use crate::parser::map_line;

use futures::stream::{self, TryStreamExt};
use indicatif::ProgressBar;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader, Lines};
use tokio::task;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Lines read from a file, ready to be mapped
#[derive(Debug, Default)]
pub struct LineChunk {
    /// Lines to map with their 1-based line numbers
    pub lines: Vec<(usize, String)>,
    /// Lines read, including ignored ones
    pub lines_read: usize,
    /// Blank and comment lines dropped while reading
    pub lines_ignored: usize,
}

/// Result of mapping one line
#[derive(Debug)]
pub enum LineOutcome {
    Record(LogRecord),
    Rejected { error: LineError, raw: String },
}

/// Map every line of a chunk, preserving order
pub fn map_chunk(chunk: Vec<(usize, String)>) -> Vec<LineOutcome> {
    chunk
        .into_iter()
        .map(|(line_number, raw)| match map_line(&raw, line_number) {
            Ok(record) => LineOutcome::Record(record),
            Err(error) => LineOutcome::Rejected { error, raw },
        })
        .collect()
}

/// Reads a file into [`LineChunk`]s
struct ChunkReader {
    lines: Lines<BufReader<File>>,
    line_number: usize,
    config: ProcessorConfig,
    exhausted: bool,
}

impl ChunkReader {
    async fn open(path: &Path, config: ProcessorConfig) -> Result<Self> {
        let file = File::open(path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ProcessorError::InputNotFound {
                path: path.to_path_buf(),
            },
            _ => ProcessorError::Io(e),
        })?;

        Ok(Self {
            lines: BufReader::new(file).lines(),
            line_number: 0,
            config,
            exhausted: false,
        })
    }

    /// Next chunk of up to `chunk_size` mappable lines, or `None` at end of file
    async fn next_chunk(&mut self) -> Result<Option<LineChunk>> {
        if self.exhausted {
            return Ok(None);
        }

        let mut chunk = LineChunk::default();
        while chunk.lines.len() < self.config.chunk_size {
            let Some(line) = self.lines.next_line().await? else {
                self.exhausted = true;
                break;
            };

            self.line_number += 1;
            chunk.lines_read += 1;

            if self.config.is_ignored_line(&line) {
                chunk.lines_ignored += 1;
            } else {
                chunk.lines.push((self.line_number, line));
            }
        }

        if chunk.lines_read == 0 {
            Ok(None)
        } else {
            Ok(Some(chunk))
        }
    }
}

/// Streaming processor for log files
#[derive(Debug)]
pub struct StreamingProcessor {
    config: ProcessorConfig,
    skip_policy: SkipPolicy,
    cancellation: CancellationToken,
}

impl StreamingProcessor {
    /// Create a new streaming processor
    pub fn new(config: ProcessorConfig, cancellation: CancellationToken) -> Self {
        let skip_policy = SkipPolicy::new(config.max_skipped_lines);
        Self {
            config,
            skip_policy,
            cancellation,
        }
    }

    pub fn skip_policy(&self) -> &SkipPolicy {
        &self.skip_policy
    }

    /// Process one file into `sink`, accumulating into the run's `stats`
    ///
    /// `stats` carries the skip count across files, so the ceiling applies
    /// to the run as a whole. On a fatal rejection the records of the
    /// current chunk are not written.
    pub async fn process_file(
        &self,
        path: &Path,
        sink: &mut dyn RecordSink,
        stats: &mut ProcessingStats,
        progress: &ProgressBar,
    ) -> Result<()> {
        debug!("Processing file: {}", path.display());

        let reader = ChunkReader::open(path, self.config.clone()).await?;
        let chunks = stream::try_unfold(reader, |mut reader| async move {
            let chunk = reader.next_chunk().await?;
            Ok::<_, ProcessorError>(chunk.map(|chunk| (chunk, reader)))
        });

        let mapped = chunks
            .map_ok(|chunk| async move {
                let LineChunk {
                    lines,
                    lines_read,
                    lines_ignored,
                } = chunk;
                let outcomes = task::spawn_blocking(move || map_chunk(lines))
                    .await
                    .map_err(|e| ProcessorError::TaskFailed {
                        reason: format!("line mapping task failed: {e}"),
                    })?;
                Ok::<_, ProcessorError>((outcomes, lines_read, lines_ignored))
            })
            .try_buffered(self.config.workers);
        let mut mapped = std::pin::pin!(mapped);

        while let Some((outcomes, lines_read, lines_ignored)) = mapped.try_next().await? {
            if self.cancellation.is_cancelled() {
                return Err(ProcessorError::Interrupted {
                    reason: format!("cancelled while reading {}", path.display()),
                });
            }

            stats.lines_read += lines_read;
            stats.lines_ignored += lines_ignored;
            progress.inc(lines_read as u64);

            let records = self.apply_skip_policy(path, outcomes, stats)?;
            let written_before = stats.records_written;
            stats.records_written += sink.write_chunk(&records)?;

            self.report_progress(written_before, stats.records_written);
        }

        stats.files_processed += 1;
        debug!(
            "Finished {}: {} lines read, {} skipped so far",
            path.display(),
            stats.lines_read,
            stats.lines_skipped()
        );
        Ok(())
    }

    /// Keep the records of a chunk, counting or escalating each rejection
    fn apply_skip_policy(
        &self,
        path: &Path,
        outcomes: Vec<LineOutcome>,
        stats: &mut ProcessingStats,
    ) -> Result<Vec<LogRecord>> {
        let mut records = Vec::with_capacity(outcomes.len());

        for outcome in outcomes {
            match outcome {
                LineOutcome::Record(record) => records.push(record),
                LineOutcome::Rejected { error, raw } => {
                    if !self.skip_policy.should_skip(&error, &raw, stats.lines_skipped()) {
                        return Err(ProcessorError::SkipLimitExceeded {
                            path: PathBuf::from(path),
                            limit: self.skip_policy.max_skipped_lines,
                            last: error,
                        });
                    }
                    match error.kind() {
                        LineErrorKind::Parse => stats.parse_errors += 1,
                        LineErrorKind::Validation => stats.validation_errors += 1,
                    }
                }
            }
        }

        Ok(records)
    }

    fn report_progress(&self, before: usize, after: usize) {
        let interval = self.config.progress_interval;
        if after / interval > before / interval {
            info!("Processed {} lines . . .", after / interval * interval);
        }
    }
}
