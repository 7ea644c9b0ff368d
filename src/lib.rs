//! Message Log Processor Library
//!
//! A Rust library for converting telephony message logs into validated,
//! typed records and writing them to Apache Parquet files.
//!
//! This library provides tools for:
//! - Positional extraction of the message id and London-time timestamp
//! - Tokenizing the `key=value` section with one level of `{...}` nesting
//! - Mapping and validating records, including the derived message cost
//! - Processing files or directories in ordered, concurrent chunks
//! - Tolerating a bounded number of bad lines per run
//!
//! ```
//! use msglog_processor::map_line;
//!
//! let line = "b1c76ea92a0ccb8f44c2230846a50fa4 :: 08/04/2017 13:47:23 (023),account-id=20fe9c40a0d2b1eb070723e6fa169d9c,gateway-id=a78dec0c5254e20a2dae44c76bd0ec18,country=JO,status=submitted,price={message-price=0.0624015},cost={transit-cost=0.02, route-cost=0.12}";
//! let record = map_line(line, 1).unwrap();
//! assert_eq!(record.country.as_deref(), Some("JO"));
//! assert_eq!(record.cost().unwrap().to_string(), "0.14");
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod parser;
pub mod processor;

// Re-export commonly used types
pub use config::{CompressionAlgorithm, ParquetSinkConfig, ProcessorConfig};
pub use error::{FieldViolation, LineError, LineErrorKind, ProcessorError, Result};
pub use models::{CostError, InputSource, LogRecord, ProcessingStats};
pub use parser::{FieldMap, map_line, parse_key_values};
pub use processor::LogProcessor;
pub use processor::skip::SkipPolicy;
pub use processor::writer::{MemorySink, ParquetSink, RecordSink};
