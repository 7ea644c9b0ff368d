//! Batch processing engine.
//!
//! Orchestrates a run over one file or a directory of files: discovery,
//! chunked line mapping under the skip policy, and writing records to a
//! [`RecordSink`].

pub mod discovery;
pub mod skip;
pub mod streaming;
pub mod writer;

#[cfg(test)]
pub mod tests;

use self::{
    discovery::FileDiscovery,
    streaming::StreamingProcessor,
    writer::{ParquetSink, RecordSink},
};

use crate::config::ProcessorConfig;
use crate::error::Result;
use crate::models::{InputSource, ProcessingStats};

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Main processor for converting message logs to Parquet
#[derive(Debug)]
pub struct LogProcessor {
    output_path: PathBuf,
    config: ProcessorConfig,
    file_discovery: FileDiscovery,
    cancellation: CancellationToken,
}

impl LogProcessor {
    /// Create a new processor with default configuration
    pub fn new(input: InputSource, output_path: PathBuf) -> Self {
        Self {
            output_path,
            config: ProcessorConfig::default(),
            file_discovery: FileDiscovery::new(input),
            cancellation: CancellationToken::new(),
        }
    }

    /// Configure the processor
    pub fn with_config(mut self, config: ProcessorConfig) -> Self {
        self.config = config;
        self
    }

    /// Stop between chunks once `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Main processing entry point; writes to the configured Parquet file
    pub async fn process(&mut self) -> Result<ProcessingStats> {
        let mut sink = ParquetSink::new(self.output_path.clone(), self.config.parquet.clone());
        self.process_with_sink(&mut sink).await
    }

    /// Run the pipeline into any sink
    ///
    /// The sink is finished even when the run fails, so records from chunks
    /// completed before the failure remain readable.
    pub async fn process_with_sink(&mut self, sink: &mut dyn RecordSink) -> Result<ProcessingStats> {
        let start_time = Instant::now();
        self.config.validate()?;

        if self.config.show_progress {
            println!("{}", "Starting message log processing".bright_green().bold());
            println!(
                "  {} {}",
                "Input:".bright_cyan(),
                self.file_discovery.source().path().display()
            );
            println!("  {} {}", "Output:".bright_cyan(), self.output_path.display());
        }

        let files = self.file_discovery.discover_files().await?;
        let mut stats = ProcessingStats {
            output_path: self.output_path.clone(),
            ..Default::default()
        };

        if files.is_empty() {
            if self.config.show_progress {
                println!("  {}", "No input files found - nothing to do".bright_yellow());
            }
            stats.processing_time_ms = start_time.elapsed().as_millis();
            return Ok(stats);
        }

        info!("Processing {} file(s)", files.len());

        let progress = self.create_progress_bar();
        let streaming = StreamingProcessor::new(self.config.clone(), self.cancellation.clone());

        let mut outcome = Ok(());
        for file in &files {
            progress.set_message(file_label(file));
            outcome = streaming.process_file(file, sink, &mut stats, &progress).await;
            if outcome.is_err() {
                break;
            }
        }

        match sink.finish() {
            Ok(rows) => {
                if outcome.is_ok() && rows != stats.records_written as u64 {
                    warn!(
                        "Sink reported {} rows but {} records were written",
                        rows, stats.records_written
                    );
                }
            }
            Err(finish_error) => {
                if outcome.is_ok() {
                    outcome = Err(finish_error);
                } else {
                    warn!("Failed to close output after error: {}", finish_error);
                }
            }
        }

        progress.finish_and_clear();
        stats.processing_time_ms = start_time.elapsed().as_millis();
        outcome?;

        info!(
            "Completed: {} records written, {} lines skipped",
            stats.records_written,
            stats.lines_skipped()
        );
        if self.config.show_progress {
            print_summary(&stats);
        }

        Ok(stats)
    }

    fn create_progress_bar(&self) -> ProgressBar {
        if !self.config.show_progress {
            return ProgressBar::hidden();
        }

        let progress = ProgressBar::new_spinner();
        progress.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {pos} lines {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        progress.enable_steady_tick(Duration::from_millis(100));
        progress
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

fn print_summary(stats: &ProcessingStats) {
    println!("\n{}", "Processing Summary".bright_green().bold());
    println!(
        "  {} {}ms",
        "Time elapsed:".bright_cyan(),
        stats.processing_time_ms.to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Files processed:".bright_cyan(),
        stats.files_processed.to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Lines read:".bright_cyan(),
        stats.lines_read.to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Records written:".bright_cyan(),
        stats.records_written.to_string().bright_white().bold()
    );
    if stats.lines_skipped() > 0 {
        println!(
            "  {} {} ({} parse, {} validation)",
            "Lines skipped:".bright_red(),
            stats.lines_skipped().to_string().bright_red().bold(),
            stats.parse_errors,
            stats.validation_errors
        );
    }
    println!(
        "  {} {:.1}%",
        "Success rate:".bright_cyan(),
        stats.success_rate()
    );
}
