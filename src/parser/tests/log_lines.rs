//! Well-formed log lines

use super::VALID_LINE;
use crate::parser::map_line;
use rust_decimal::Decimal;
use std::str::FromStr;

const SAMPLE_LINES: &[&str] = &[
    "9d311564aec493f23347e848439584e0 :: 08/04/2017 13:47:23 (149),account-id=7fd1846ebb16c328008b702c77c46b1c,gateway-id=f89ac9a1257a10942ee8a938432eaa6f,country=UK,status=delivered,price={message-price=0.0321},cost={transit-cost=0.005, route-cost=0.011}",
    "0a1b2c3d4e5f60718293a4b5c6d7e8f9 :: 12/31/2017 23:59:59 (999),account-id=20fe9c40a0d2b1eb070723e6fa169d9c,gateway-id=a78dec0c5254e20a2dae44c76bd0ec18,country=US,status=failed,price={message-price=0},cost={transit-cost=0, route-cost=0}",
    VALID_LINE,
];

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

#[test]
fn test_sample_lines_map() {
    for (index, line) in SAMPLE_LINES.iter().enumerate() {
        let record = map_line(line, index + 1).unwrap();
        assert!(record.cost().is_ok());
    }
}

#[test]
fn test_end_to_end_values() {
    let record = map_line(VALID_LINE, 1).unwrap();

    assert_eq!(record.country.as_deref(), Some("JO"));
    assert_eq!(record.cost().unwrap(), dec("0.14"));
    assert_eq!(
        record.timestamp.unwrap().to_rfc3339(),
        "2017-08-04T12:47:23.023+00:00"
    );
}

#[test]
fn test_key_order_does_not_matter() {
    let line = "b1c76ea92a0ccb8f44c2230846a50fa4 :: 08/04/2017 13:47:23 (023),cost={route-cost=0.12, transit-cost=0.02},status=submitted,price={message-price=0.0624015},country=JO,gateway-id=a78dec0c5254e20a2dae44c76bd0ec18,account-id=20fe9c40a0d2b1eb070723e6fa169d9c";
    let reordered = map_line(line, 1).unwrap();
    let canonical = map_line(VALID_LINE, 1).unwrap();

    assert_eq!(reordered, canonical);
}

#[test]
fn test_unknown_keys_are_ignored() {
    let line = format!("{VALID_LINE},network={{mcc=416, mnc=77}},client-ref=abc");
    let record = map_line(&line, 1).unwrap();
    assert_eq!(record.status.as_deref(), Some("submitted"));
}

#[test]
fn test_scientific_notation_price() {
    let line = VALID_LINE.replacen("message-price=0.0624015", "message-price=6.24015E-2", 1);
    let record = map_line(&line, 1).unwrap();
    assert_eq!(record.price, Some(dec("0.0624015")));
}

#[test]
fn test_repeated_key_keeps_last_value() {
    let line = format!("{VALID_LINE},country=UK");
    let record = map_line(&line, 1).unwrap();
    assert_eq!(record.country.as_deref(), Some("UK"));
}
