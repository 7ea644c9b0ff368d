//! Configuration management and validation.
//!
//! Provides the settings for a processing run: chunking and concurrency,
//! the skip ceiling, which lines of a file are read, and how the Parquet
//! output is written.

use crate::constants::{
    DEFAULT_CHUNK_SIZE, DEFAULT_COMMENT_PREFIXES, DEFAULT_FILE_EXTENSION,
    DEFAULT_MAX_SKIPPED_LINES, DEFAULT_PROGRESS_INTERVAL,
};
use crate::error::{ProcessorError, Result};
use clap::ValueEnum;
use polars::prelude::ParquetCompression;
use serde::{Deserialize, Serialize};

/// Supported compression algorithms for parquet files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum CompressionAlgorithm {
    /// Snappy compression - good balance of speed and compression
    Snappy,
    /// ZSTD compression - better compression ratio, slower
    Zstd,
    /// LZ4 compression - fastest, lower compression ratio
    Lz4,
    /// No compression
    #[value(name = "none")]
    Uncompressed,
}

impl CompressionAlgorithm {
    /// Convert to polars ParquetCompression type
    pub fn to_polars_compression(&self) -> ParquetCompression {
        match self {
            CompressionAlgorithm::Snappy => ParquetCompression::Snappy,
            CompressionAlgorithm::Zstd => ParquetCompression::Zstd(None),
            CompressionAlgorithm::Lz4 => ParquetCompression::Lz4Raw,
            CompressionAlgorithm::Uncompressed => ParquetCompression::Uncompressed,
        }
    }
}

/// Parquet output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParquetSinkConfig {
    pub compression: CompressionAlgorithm,

    /// Write column statistics for query pruning
    pub enable_statistics: bool,

    /// Rows per row group; `None` lets polars decide
    pub row_group_size: Option<usize>,
}

impl Default for ParquetSinkConfig {
    fn default() -> Self {
        Self {
            compression: CompressionAlgorithm::Snappy,
            enable_statistics: true,
            row_group_size: None,
        }
    }
}

/// Settings for one processing run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessorConfig {
    /// Lines mapped per worker task and records per sink write
    pub chunk_size: usize,

    /// Rejected lines tolerated per run before aborting
    pub max_skipped_lines: usize,

    /// Records between progress log messages
    pub progress_interval: usize,

    /// Chunks mapped concurrently
    pub workers: usize,

    /// Extension matched in directory mode, without the dot
    pub file_extension: String,

    /// Lines starting with any of these are ignored
    pub comment_prefixes: Vec<String>,

    /// Ignore lines that are empty or whitespace only
    pub skip_blank_lines: bool,

    /// Show a spinner while reading
    pub show_progress: bool,

    pub parquet: ParquetSinkConfig,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_skipped_lines: DEFAULT_MAX_SKIPPED_LINES,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            workers: num_cpus::get(),
            file_extension: DEFAULT_FILE_EXTENSION.to_string(),
            comment_prefixes: DEFAULT_COMMENT_PREFIXES
                .iter()
                .map(|prefix| prefix.to_string())
                .collect(),
            skip_blank_lines: true,
            show_progress: true,
            parquet: ParquetSinkConfig::default(),
        }
    }
}

impl ProcessorConfig {
    /// Create configuration with custom worker count
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Create configuration with custom chunk size
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Set the skip ceiling
    pub fn with_max_skipped_lines(mut self, max_skipped_lines: usize) -> Self {
        self.max_skipped_lines = max_skipped_lines;
        self
    }

    pub fn with_progress_interval(mut self, progress_interval: usize) -> Self {
        self.progress_interval = progress_interval;
        self
    }

    /// Set the extension matched in directory mode; a leading dot is dropped
    pub fn with_file_extension(mut self, extension: impl Into<String>) -> Self {
        let extension = extension.into();
        self.file_extension = extension.trim_start_matches('.').to_string();
        self
    }

    pub fn with_comment_prefixes(mut self, prefixes: Vec<String>) -> Self {
        self.comment_prefixes = prefixes;
        self
    }

    /// Disable the progress spinner
    pub fn without_progress(mut self) -> Self {
        self.show_progress = false;
        self
    }

    pub fn with_compression(mut self, compression: CompressionAlgorithm) -> Self {
        self.parquet.compression = compression;
        self
    }

    /// Configure parquet output settings
    pub fn with_parquet(mut self, parquet: ParquetSinkConfig) -> Self {
        self.parquet = parquet;
        self
    }

    /// Reject settings that cannot drive a run
    pub fn validate(&self) -> Result<()> {
        let problem = if self.chunk_size == 0 {
            Some("chunk_size must be greater than zero")
        } else if self.workers == 0 {
            Some("workers must be greater than zero")
        } else if self.progress_interval == 0 {
            Some("progress_interval must be greater than zero")
        } else if self.file_extension.is_empty() {
            Some("file_extension must not be empty")
        } else if self.parquet.row_group_size == Some(0) {
            Some("row_group_size must be greater than zero")
        } else {
            None
        };

        match problem {
            Some(message) => Err(ProcessorError::Configuration {
                message: message.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// True when `line` should be counted but not mapped
    pub fn is_ignored_line(&self, line: &str) -> bool {
        (self.skip_blank_lines && line.trim().is_empty())
            || self
                .comment_prefixes
                .iter()
                .any(|prefix| !prefix.is_empty() && line.starts_with(prefix.as_str()))
    }
}
