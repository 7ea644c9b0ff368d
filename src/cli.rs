//! Command-line interface components.

use crate::config::{CompressionAlgorithm, ProcessorConfig};
use crate::constants::{DEFAULT_FILE_EXTENSION, DEFAULT_OUTPUT_FILE};
use crate::error::{ProcessorError, Result};
use crate::models::InputSource;
use clap::{ArgGroup, Parser};
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "msglog")]
#[command(about = "Parse telephony message logs into validated Parquet records")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(group(ArgGroup::new("input").required(true).args(["file", "dir"])))]
pub struct Args {
    /// Single log file to process
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Directory whose log files are all processed
    #[arg(long, value_name = "PATH")]
    pub dir: Option<PathBuf>,

    /// Output Parquet file
    #[arg(short, long, value_name = "PATH", default_value = DEFAULT_OUTPUT_FILE)]
    pub output: PathBuf,

    /// File extension matched with --dir
    #[arg(long, default_value = DEFAULT_FILE_EXTENSION)]
    pub extension: String,

    /// Bad lines tolerated before the run aborts
    #[arg(long)]
    pub max_skips: Option<usize>,

    /// Lines per chunk
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Chunks mapped concurrently (defaults to the number of CPUs)
    #[arg(long)]
    pub workers: Option<usize>,

    /// Parquet compression algorithm
    #[arg(long, value_enum, default_value = "snappy")]
    pub compression: CompressionAlgorithm,

    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: debug, -vv: trace)"
    )]
    pub verbose: u8,

    /// Only show errors; overrides verbose settings
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Args {
    /// The input selected by --file or --dir
    pub fn input_source(&self) -> Result<InputSource> {
        match (&self.file, &self.dir) {
            (Some(file), None) => Ok(InputSource::File(file.clone())),
            (None, Some(dir)) => Ok(InputSource::Directory {
                path: dir.clone(),
                extension: self.extension.trim_start_matches('.').to_string(),
            }),
            _ => Err(ProcessorError::Configuration {
                message: "exactly one of --file or --dir is required".to_string(),
            }),
        }
    }

    /// Build the run configuration, with flags overriding defaults
    pub fn to_config(&self) -> ProcessorConfig {
        let mut config = ProcessorConfig::default()
            .with_file_extension(self.extension.as_str())
            .with_compression(self.compression);

        if let Some(max_skips) = self.max_skips {
            config = config.with_max_skipped_lines(max_skips);
        }
        if let Some(chunk_size) = self.chunk_size {
            config = config.with_chunk_size(chunk_size);
        }
        if let Some(workers) = self.workers {
            config = config.with_workers(workers);
        }
        if !self.show_progress() {
            config = config.without_progress();
        }

        debug!("Run configuration: {:?}", config);
        config
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "info",
                1 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check if we should show progress output (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}

/// Set up structured logging based on CLI arguments
pub fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("msglog_processor={}", log_level)));

    if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    debug!("Logging initialized at level: {}", log_level);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> std::result::Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("msglog").chain(args.iter().copied()))
    }

    #[test]
    fn test_file_mode() {
        let args = parse(&["--file", "messages.csv"]).unwrap();

        assert_eq!(
            args.input_source().unwrap(),
            InputSource::File(PathBuf::from("messages.csv"))
        );
        assert_eq!(args.output, PathBuf::from("log_data.parquet"));
    }

    #[test]
    fn test_dir_mode_uses_extension() {
        let args = parse(&["--dir", "logs", "--extension", ".log"]).unwrap();

        assert_eq!(
            args.input_source().unwrap(),
            InputSource::Directory {
                path: PathBuf::from("logs"),
                extension: "log".to_string(),
            }
        );
        assert_eq!(args.to_config().file_extension, "log");
    }

    #[test]
    fn test_input_is_required_and_exclusive() {
        assert!(parse(&[]).is_err());
        assert!(parse(&["--file", "a.csv", "--dir", "logs"]).is_err());
    }

    #[test]
    fn test_overrides_reach_config() {
        let args = parse(&[
            "--file",
            "a.csv",
            "--max-skips",
            "3",
            "--chunk-size",
            "10",
            "--workers",
            "2",
            "--compression",
            "none",
            "-q",
        ])
        .unwrap();
        let config = args.to_config();

        assert_eq!(config.max_skipped_lines, 3);
        assert_eq!(config.chunk_size, 10);
        assert_eq!(config.workers, 2);
        assert_eq!(config.parquet.compression, CompressionAlgorithm::Uncompressed);
        assert!(!config.show_progress);
    }

    #[test]
    fn test_log_levels() {
        assert_eq!(parse(&["--file", "a"]).unwrap().get_log_level(), "info");
        assert_eq!(parse(&["--file", "a", "-vv"]).unwrap().get_log_level(), "trace");
        assert_eq!(parse(&["--file", "a", "-q"]).unwrap().get_log_level(), "error");
        assert!(parse(&["--file", "a", "-q", "-v"]).is_err());
    }
}
