//! Lines that must be rejected, and how

use super::VALID_LINE;
use crate::constants::{fields, keys};
use crate::error::LineErrorKind;
use crate::parser::map_line;

fn kind_of(line: &str) -> LineErrorKind {
    map_line(line, 1).unwrap_err().kind()
}

#[test]
fn test_prefix_failures_are_parse_errors() {
    let short_id = VALID_LINE.replacen("b1c76ea92a0ccb8f44c2230846a50fa4", "b1c76ea92a0ccb8f44c2230846a5", 1);
    let bad_date = VALID_LINE.replacen("08/04/2017", "08/04G/2017", 1);

    assert_eq!(kind_of(&short_id), LineErrorKind::Parse);
    assert_eq!(kind_of(&VALID_LINE.replacen(" :: ", " ;; ", 1)), LineErrorKind::Parse);
    assert_eq!(kind_of(&bad_date), LineErrorKind::Parse);
    assert_eq!(kind_of(""), LineErrorKind::Parse);
}

#[test]
fn test_truncated_line_is_parse_error() {
    let truncated = &VALID_LINE[..VALID_LINE.find("cost={").unwrap() + 10];
    let err = map_line(truncated, 42).unwrap_err();

    assert!(err.is_parse());
    assert_eq!(err.line_number(), 42);
    assert_eq!(err.field(), Some("cost"));
}

#[test]
fn test_double_nesting_is_parse_error() {
    let line = VALID_LINE.replacen("{message-price=0.0624015}", "{message-price={amount=0.06}}", 1);
    assert_eq!(kind_of(&line), LineErrorKind::Parse);
}

#[test]
fn test_bad_transit_cost_names_key() {
    let line = VALID_LINE.replacen("transit-cost=0.02", "transit-cost=two cents", 1);
    let err = map_line(&line, 1).unwrap_err();

    assert_eq!(err.field(), Some(keys::TRANSIT_COST));
    assert_eq!(err.input(), Some("two cents"));
}

#[test]
fn test_missing_fields_are_validation_errors() {
    let line = VALID_LINE
        .replacen("account-id=20fe9c40a0d2b1eb070723e6fa169d9c,", "", 1)
        .replacen("status=submitted,", "", 1);
    let err = map_line(&line, 1).unwrap_err();
    let reported: Vec<_> = err.violations().iter().map(|v| v.field).collect();

    assert!(err.is_validation());
    assert_eq!(reported, vec![fields::ACCOUNT_ID, fields::STATUS]);
}

#[test]
fn test_missing_route_cost_fails_cost_check() {
    let line = VALID_LINE.replacen(", route-cost=0.12", "", 1);
    let err = map_line(&line, 1).unwrap_err();

    assert!(err.is_validation());
    assert_eq!(err.field(), Some(fields::COST));
}

#[test]
fn test_long_country_is_validation_error() {
    let line = VALID_LINE.replacen("country=JO", "country=JOR", 1);
    let err = map_line(&line, 1).unwrap_err();
    assert_eq!(err.field(), Some(fields::COUNTRY));
}
