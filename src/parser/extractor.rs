//! Positional extraction of the line prefix
//!
//! A line starts with a fixed-width message id, the literal `" :: "`, and a
//! fixed-width timestamp. Those two fields are sliced out by offset rather than
//! scanned for, so the offsets in [`crate::constants`] must match the data.

use crate::constants::{
    LOG_TIMEZONE, MESSAGE_ID_END, MESSAGE_ID_SEPARATOR, MESSAGE_ID_START, REMAINDER_START,
    TIMESTAMP_END, TIMESTAMP_FORMAT, TIMESTAMP_START,
};
use crate::error::LineError;
use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};

/// Return the message id at the start of the line
///
/// The separator must sit exactly where a full-length id would end, which
/// rejects both short/long ids and a wrong or missing separator.
pub fn extract_message_id(line: &str, line_number: usize) -> Result<&str, LineError> {
    match line.get(MESSAGE_ID_END..TIMESTAMP_START) {
        Some(separator) if separator == MESSAGE_ID_SEPARATOR => {
            // The separator check puts a char boundary at MESSAGE_ID_END.
            Ok(&line[MESSAGE_ID_START..MESSAGE_ID_END])
        }
        _ => Err(LineError::parse(
            line_number,
            "messageId does not match expected length / is not first field in record",
        )),
    }
}

/// Parse the timestamp that follows the separator
///
/// The text is London wall-clock time. An ambiguous time at the end of summer
/// time resolves to the earlier instant; a time inside the spring gap is
/// moved forward by the length of the gap.
pub fn extract_timestamp(line: &str, line_number: usize) -> Result<DateTime<Utc>, LineError> {
    let failed = || {
        LineError::parse(
            line_number,
            "failed to extract timestamp; expected 'MM/dd/yyyy HH:mm:ss (SSS)'",
        )
    };

    let raw = line.get(TIMESTAMP_START..TIMESTAMP_END).ok_or_else(failed)?;
    let naive = NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).map_err(|_| failed())?;

    let local = match LOG_TIMEZONE.from_local_datetime(&naive).earliest() {
        Some(local) => local,
        None => LOG_TIMEZONE
            .from_local_datetime(&(naive + Duration::hours(1)))
            .earliest()
            .ok_or_else(failed)?,
    };

    Ok(local.with_timezone(&Utc))
}

/// Return the key/value section after the timestamp and its delimiter
pub fn extract_remainder(line: &str, line_number: usize) -> Result<&str, LineError> {
    line.get(REMAINDER_START..).ok_or_else(|| {
        LineError::parse(
            line_number,
            "line ends before the key/value section",
        )
    })
}
