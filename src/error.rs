//! Error handling for message log processing.
//!
//! [`LineError`] is what the parsing core returns for a single line: either the
//! line is syntactically malformed ([`LineError::Parse`]) or it parsed but a
//! required field is missing or out of range ([`LineError::Validation`]).
//! [`ProcessorError`] covers everything around the core: input discovery, I/O,
//! the Parquet sink and the skip ceiling.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Which of the two per-line failure kinds occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineErrorKind {
    Parse,
    Validation,
}

/// One violated field constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Failure to turn one input line into a valid record
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LineError {
    /// The line does not follow the expected layout or encoding
    #[error("ParseError at line {line_number}: {message}")]
    Parse {
        line_number: usize,
        message: String,
        field: Option<String>,
        input: Option<String>,
    },

    /// The line parsed but one or more fields are missing or invalid
    #[error("ValidationError at line {line_number}: {}", join_violations(.violations))]
    Validation {
        line_number: usize,
        violations: Vec<FieldViolation>,
    },
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl LineError {
    /// Create a parse error with no field attached
    pub fn parse(line_number: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line_number,
            message: message.into(),
            field: None,
            input: None,
        }
    }

    /// Create a parse error for a specific field and its raw value
    pub fn parse_field(
        line_number: usize,
        field: impl Into<String>,
        input: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Parse {
            line_number,
            message: message.into(),
            field: Some(field.into()),
            input: Some(input.into()),
        }
    }

    /// Create a validation error from the collected violations
    pub fn validation(line_number: usize, violations: Vec<FieldViolation>) -> Self {
        Self::Validation {
            line_number,
            violations,
        }
    }

    pub fn kind(&self) -> LineErrorKind {
        match self {
            Self::Parse { .. } => LineErrorKind::Parse,
            Self::Validation { .. } => LineErrorKind::Validation,
        }
    }

    pub fn line_number(&self) -> usize {
        match self {
            Self::Parse { line_number, .. } | Self::Validation { line_number, .. } => *line_number,
        }
    }

    /// The offending field; for validation errors the first violation in check order
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Parse { field, .. } => field.as_deref(),
            Self::Validation { violations, .. } => violations.first().map(|v| v.field),
        }
    }

    /// Raw fragment that failed to parse, when one was captured
    pub fn input(&self) -> Option<&str> {
        match self {
            Self::Parse { input, .. } => input.as_deref(),
            Self::Validation { .. } => None,
        }
    }

    pub fn violations(&self) -> &[FieldViolation] {
        match self {
            Self::Parse { .. } => &[],
            Self::Validation { violations, .. } => violations,
        }
    }

    pub fn is_parse(&self) -> bool {
        self.kind() == LineErrorKind::Parse
    }

    pub fn is_validation(&self) -> bool {
        self.kind() == LineErrorKind::Validation
    }
}

/// Errors raised by the batch pipeline around the parsing core
#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Input not found at path: {path}")]
    InputNotFound { path: PathBuf },

    #[error("Invalid input {path}: {reason}")]
    InvalidInput { path: PathBuf, reason: String },

    #[error("Exceeded skip count of {limit} in {path} - fatal failure! Last error: {last}")]
    SkipLimitExceeded {
        path: PathBuf,
        limit: usize,
        last: LineError,
    },

    #[error("Failed to write records to {path}: {reason}")]
    WriteFailed { path: PathBuf, reason: String },

    #[error("Background task failed: {reason}")]
    TaskFailed { reason: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Processing interrupted: {reason}")]
    Interrupted { reason: String },
}

pub type Result<T> = std::result::Result<T, ProcessorError>;
