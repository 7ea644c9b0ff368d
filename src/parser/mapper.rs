//! Line to record mapping
//!
//! [`map_line`] is the per-line entry point of the parser. It fails fast on
//! the first parse error, then validates the finished record as a whole.

use super::extractor::{extract_message_id, extract_remainder, extract_timestamp};
use super::tokenizer::{FieldMap, parse_key_values};
use super::validation::validate_record;
use crate::constants::keys;
use crate::error::LineError;
use crate::models::LogRecord;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Turn one log line into a validated record
///
/// `line_number` is 1-based and is only used for error reporting.
pub fn map_line(line: &str, line_number: usize) -> Result<LogRecord, LineError> {
    let mut record = LogRecord::new();

    record.message_id = Some(extract_message_id(line, line_number)?.to_string());
    record.timestamp = Some(extract_timestamp(line, line_number)?);

    let fields = parse_key_values(extract_remainder(line, line_number)?, line_number)?;
    map_fields(&mut record, &fields, line_number)?;

    validate_record(&record, line_number)?;
    Ok(record)
}

/// Copy known keys from `fields` onto `record`
///
/// Absent keys leave the field untouched. Unknown keys are ignored.
pub fn map_fields(
    record: &mut LogRecord,
    fields: &FieldMap,
    line_number: usize,
) -> Result<(), LineError> {
    let text = |key: &str| fields.get(key).cloned();

    if let Some(value) = text(keys::ACCOUNT_ID) {
        record.account_id = Some(value);
    }
    if let Some(value) = text(keys::GATEWAY_ID) {
        record.gateway_id = Some(value);
    }
    if let Some(value) = text(keys::COUNTRY) {
        record.country = Some(value);
    }
    if let Some(value) = text(keys::STATUS) {
        record.status = Some(value);
    }

    if let Some(price) = decimal_field(fields, keys::MESSAGE_PRICE, line_number)? {
        record.price = Some(price);
    }
    if let Some(cost) = decimal_field(fields, keys::TRANSIT_COST, line_number)? {
        record.set_transit_cost(Some(cost));
    }
    if let Some(cost) = decimal_field(fields, keys::ROUTE_COST, line_number)? {
        record.set_route_cost(Some(cost));
    }

    Ok(())
}

fn decimal_field(
    fields: &FieldMap,
    key: &str,
    line_number: usize,
) -> Result<Option<Decimal>, LineError> {
    fields
        .get(key)
        .map(|raw| {
            parse_decimal(raw).ok_or_else(|| {
                LineError::parse_field(
                    line_number,
                    key,
                    raw.as_str(),
                    format!("Invalid format while parsing value for field {key}"),
                )
            })
        })
        .transpose()
}

/// Parse a decimal in plain or scientific notation, ignoring surrounding whitespace
///
/// Digit separators are rejected even though `Decimal` would accept them.
pub fn parse_decimal(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.contains('_') {
        return None;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}
