//! Tokenizer for the key/value section of a log line
//!
//! The section is a comma-separated list of `key=value` pairs where a value
//! may itself be a brace-delimited group of pairs:
//!
//! ```text
//! account-id=20fe...,country=JO,price={message-price=0.06},cost={transit-cost=0.02, route-cost=0.12}
//! ```
//!
//! Groups are flattened into dotted keys (`cost.route-cost`). Only one level
//! of nesting exists; a `{` inside a group is rejected.

use crate::constants::{KEY_PATH_SEPARATOR, KV_SEPARATOR, NESTED_CLOSE, NESTED_OPEN, TOKEN_SEPARATOR};
use crate::error::LineError;
use std::collections::HashMap;

/// Flattened key path to raw value
pub type FieldMap = HashMap<String, String>;

/// Parse a key/value section into a fresh map
pub fn parse_key_values(input: &str, line_number: usize) -> Result<FieldMap, LineError> {
    let mut fields = FieldMap::new();
    parse_key_values_into(input, line_number, &mut fields, None)?;
    Ok(fields)
}

/// Parse `input` into `fields`, prefixing every key with `prefix` when given
///
/// `prefix` is only set for the contents of a nested group. Top-level keys
/// are stored verbatim; keys inside a group are trimmed since groups put a
/// space after each comma. A repeated key overwrites the earlier value.
pub fn parse_key_values_into(
    input: &str,
    line_number: usize,
    fields: &mut FieldMap,
    prefix: Option<&str>,
) -> Result<(), LineError> {
    let end = input.len();
    let mut pos = 0;

    while pos < end {
        let kv_sep = input[pos..]
            .find(KV_SEPARATOR)
            .map(|i| pos + i)
            .ok_or_else(|| {
                LineError::parse_field(
                    line_number,
                    key_path(prefix, input[pos..].trim()),
                    &input[pos..],
                    "expected '=' after key",
                )
            })?;
        let key = &input[pos..kv_sep];
        let value_start = kv_sep + KV_SEPARATOR.len_utf8();

        if input[value_start..].starts_with(NESTED_OPEN) {
            if prefix.is_some() {
                return Err(LineError::parse_field(
                    line_number,
                    key_path(prefix, key.trim()),
                    &input[pos..],
                    "nested groups may only be one level deep",
                ));
            }

            let group_start = value_start + NESTED_OPEN.len_utf8();
            let group_end = input[group_start..]
                .find(NESTED_CLOSE)
                .map(|i| group_start + i)
                .ok_or_else(|| {
                    LineError::parse_field(
                        line_number,
                        key,
                        &input[pos..],
                        "unterminated nested group",
                    )
                })?;

            parse_key_values_into(
                &input[group_start..group_end],
                line_number,
                fields,
                Some(key),
            )?;

            pos = group_end + NESTED_CLOSE.len_utf8();
            if input[pos..].starts_with(TOKEN_SEPARATOR) {
                pos += TOKEN_SEPARATOR.len_utf8();
            }
        } else {
            let (value, next) = match input[value_start..].find(TOKEN_SEPARATOR) {
                Some(i) => (
                    &input[value_start..value_start + i],
                    value_start + i + TOKEN_SEPARATOR.len_utf8(),
                ),
                None => (&input[value_start..], end),
            };

            let key = match prefix {
                Some(prefix) => key_path(Some(prefix), key.trim()),
                None => key.to_string(),
            };
            fields.insert(key, value.to_string());
            pos = next;
        }
    }

    Ok(())
}

fn key_path(prefix: Option<&str>, key: &str) -> String {
    match prefix {
        Some(prefix) => format!("{prefix}{KEY_PATH_SEPARATOR}{key}"),
        None => key.to_string(),
    }
}
