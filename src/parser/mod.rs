//! Line parsing core.
//!
//! Turns a single log line into a validated [`LogRecord`](crate::models::LogRecord)
//! using positional extraction for the message id and timestamp, a tokenizer
//! for the key/value section, and a mapper that types and validates the
//! result. Everything here is synchronous and free of I/O.

pub mod extractor;
pub mod mapper;
pub mod tokenizer;
pub mod validation;

#[cfg(test)]
mod tests;

pub use extractor::{extract_message_id, extract_remainder, extract_timestamp};
pub use mapper::{map_fields, map_line, parse_decimal};
pub use tokenizer::{FieldMap, parse_key_values, parse_key_values_into};
pub use validation::validate_record;
