//! Application constants for the message log processor
//!
//! This module contains the positional layout of a log line, the field keys
//! produced by the tokenizer, validation lengths, and the defaults used by the
//! batch pipeline. Every offset used by the extractor is derived here and
//! nowhere else.

use chrono_tz::Tz;

// =============================================================================
// Line Layout
// =============================================================================

/// Length of the message identifier at the start of every line
pub const MESSAGE_ID_LEN: usize = 32;

/// Literal separating the message identifier from the timestamp
pub const MESSAGE_ID_SEPARATOR: &str = " :: ";

/// Byte offset where the message identifier starts
pub const MESSAGE_ID_START: usize = 0;

/// Byte offset where the message identifier ends (exclusive)
pub const MESSAGE_ID_END: usize = MESSAGE_ID_START + MESSAGE_ID_LEN;

/// Byte offset where the timestamp starts
pub const TIMESTAMP_START: usize = MESSAGE_ID_END + MESSAGE_ID_SEPARATOR.len();

/// Length of a timestamp such as `08/04/2017 13:47:23 (023)`
pub const TIMESTAMP_LEN: usize = 25;

/// Byte offset where the timestamp ends (exclusive)
pub const TIMESTAMP_END: usize = TIMESTAMP_START + TIMESTAMP_LEN;

/// Byte offset of the key/value section; one delimiter follows the timestamp
pub const REMAINDER_START: usize = TIMESTAMP_END + 1;

/// chrono pattern equivalent to `MM/dd/yyyy HH:mm:ss (SSS)`
pub const TIMESTAMP_FORMAT: &str = "%m/%d/%Y %H:%M:%S (%3f)";

/// Zone the logs are written in; timestamps carry no offset of their own
pub const LOG_TIMEZONE: Tz = chrono_tz::Europe::London;

// =============================================================================
// Key/Value Grammar
// =============================================================================

/// Separator between a key and its value
pub const KV_SEPARATOR: char = '=';

/// Separator between key/value tokens
pub const TOKEN_SEPARATOR: char = ',';

/// Opens a nested group
pub const NESTED_OPEN: char = '{';

/// Closes a nested group
pub const NESTED_CLOSE: char = '}';

/// Joins a nested group's key to the keys inside it
pub const KEY_PATH_SEPARATOR: &str = ".";

/// Keys produced by the tokenizer for the fields we map
pub mod keys {
    pub const ACCOUNT_ID: &str = "account-id";
    pub const GATEWAY_ID: &str = "gateway-id";
    pub const COUNTRY: &str = "country";
    pub const STATUS: &str = "status";
    pub const MESSAGE_PRICE: &str = "price.message-price";
    pub const TRANSIT_COST: &str = "cost.transit-cost";
    pub const ROUTE_COST: &str = "cost.route-cost";
}

// =============================================================================
// Validation
// =============================================================================

/// Expected length of an account identifier
pub const ACCOUNT_ID_LEN: usize = 32;

/// Expected length of a gateway identifier
pub const GATEWAY_ID_LEN: usize = 32;

/// Expected length of a country code
pub const COUNTRY_LEN: usize = 2;

/// Field names used in validation and parse errors
pub mod fields {
    pub const MESSAGE_ID: &str = "message_id";
    pub const TIMESTAMP: &str = "timestamp";
    pub const ACCOUNT_ID: &str = "account_id";
    pub const GATEWAY_ID: &str = "gateway_id";
    pub const COUNTRY: &str = "country";
    pub const STATUS: &str = "status";
    pub const PRICE: &str = "price";
    pub const TRANSIT_COST: &str = "transit_cost";
    pub const ROUTE_COST: &str = "route_cost";
    pub const COST: &str = "cost";
}

// =============================================================================
// Batch Pipeline Defaults
// =============================================================================

/// Records per chunk handed to the sink
pub const DEFAULT_CHUNK_SIZE: usize = 5_000;

/// Malformed lines tolerated before a run is aborted
pub const DEFAULT_MAX_SKIPPED_LINES: usize = 10_000;

/// Records between progress log messages
pub const DEFAULT_PROGRESS_INTERVAL: usize = 25_000;

/// Extension matched when reading a directory
pub const DEFAULT_FILE_EXTENSION: &str = "csv";

/// Lines starting with one of these are ignored
pub const DEFAULT_COMMENT_PREFIXES: &[&str] = &["#"];

/// Output file used when none is given
pub const DEFAULT_OUTPUT_FILE: &str = "log_data.parquet";

/// Digits of the Parquet decimal columns
pub const DECIMAL_PRECISION: usize = 38;

/// Fractional digits kept for money columns; finer values are rounded
pub const DECIMAL_SCALE: u32 = 10;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets_follow_canonical_samples() {
        assert_eq!("9d311564aec493f23347e848439584e0".len(), MESSAGE_ID_LEN);
        assert_eq!("08/04/2017 13:47:23 (149)".len(), TIMESTAMP_LEN);
        assert_eq!("7fd1846ebb16c328008b702c77c46b1c".len(), ACCOUNT_ID_LEN);
        assert_eq!("f89ac9a1257a10942ee8a938432eaa6f".len(), GATEWAY_ID_LEN);
        assert_eq!("UK".len(), COUNTRY_LEN);
    }

    #[test]
    fn test_derived_offsets() {
        assert_eq!(MESSAGE_ID_END, 32);
        assert_eq!(TIMESTAMP_START, 36);
        assert_eq!(TIMESTAMP_END, 61);
        assert_eq!(REMAINDER_START, 62);
    }
}
