//! Field validation for mapped records
//!
//! Each check returns the violation it found, if any. [`validate_record`] runs
//! all of them in a fixed order and reports every violation at once.

use crate::constants::{ACCOUNT_ID_LEN, COUNTRY_LEN, GATEWAY_ID_LEN, MESSAGE_ID_LEN, fields};
use crate::error::{FieldViolation, LineError};
use crate::models::LogRecord;
use rust_decimal::Decimal;

type Check = fn(&LogRecord) -> Option<FieldViolation>;

/// Checks in reporting order
const CHECKS: &[Check] = &[
    check_message_id,
    check_account_id,
    check_gateway_id,
    check_country,
    check_status,
    check_timestamp,
    check_price,
    check_cost,
];

/// Run every check and fail with all violations found
pub fn validate_record(record: &LogRecord, line_number: usize) -> Result<(), LineError> {
    let violations = collect_violations(record);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(LineError::validation(line_number, violations))
    }
}

/// Every violation in `record`, in check order
pub fn collect_violations(record: &LogRecord) -> Vec<FieldViolation> {
    CHECKS.iter().filter_map(|check| check(record)).collect()
}

fn check_fixed_length(
    field: &'static str,
    value: Option<&str>,
    expected: usize,
) -> Option<FieldViolation> {
    match value {
        None | Some("") => Some(FieldViolation::new(field, "must be set")),
        Some(value) => {
            let actual = value.chars().count();
            (actual != expected).then(|| {
                FieldViolation::new(
                    field,
                    format!("expected {expected} characters, found {actual}"),
                )
            })
        }
    }
}

pub fn check_message_id(record: &LogRecord) -> Option<FieldViolation> {
    check_fixed_length(fields::MESSAGE_ID, record.message_id.as_deref(), MESSAGE_ID_LEN)
}

pub fn check_account_id(record: &LogRecord) -> Option<FieldViolation> {
    check_fixed_length(fields::ACCOUNT_ID, record.account_id.as_deref(), ACCOUNT_ID_LEN)
}

pub fn check_gateway_id(record: &LogRecord) -> Option<FieldViolation> {
    check_fixed_length(fields::GATEWAY_ID, record.gateway_id.as_deref(), GATEWAY_ID_LEN)
}

pub fn check_country(record: &LogRecord) -> Option<FieldViolation> {
    check_fixed_length(fields::COUNTRY, record.country.as_deref(), COUNTRY_LEN)
}

pub fn check_status(record: &LogRecord) -> Option<FieldViolation> {
    match record.status.as_deref() {
        None | Some("") => Some(FieldViolation::new(fields::STATUS, "must be set")),
        Some(_) => None,
    }
}

pub fn check_timestamp(record: &LogRecord) -> Option<FieldViolation> {
    record
        .timestamp
        .is_none()
        .then(|| FieldViolation::new(fields::TIMESTAMP, "must be set"))
}

pub fn check_price(record: &LogRecord) -> Option<FieldViolation> {
    match record.price {
        None => Some(FieldViolation::new(fields::PRICE, "must be set")),
        Some(price) if price < Decimal::ZERO => Some(FieldViolation::new(
            fields::PRICE,
            format!("must not be negative, found {price}"),
        )),
        Some(_) => None,
    }
}

/// Cost is derived; it is valid when both components are present and their sum fits
pub fn check_cost(record: &LogRecord) -> Option<FieldViolation> {
    record
        .cost()
        .err()
        .map(|err| FieldViolation::new(fields::COST, err.to_string()))
}
