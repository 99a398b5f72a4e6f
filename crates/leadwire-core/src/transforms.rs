//! Named transform functions for the lead mapping table.
//!
//! Each transform is a standalone pure function registered against its
//! target field, so every one is independently unit-testable. Transforms
//! return `Value::Null` to omit their field and an error only for values of
//! the wrong shape.

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde_json::{json, Value};

use crate::{error::MappingError, path::resolve_path};

/// Rendered in summary lines whose source field is absent.
const PLACEHOLDER: &str = "—";

/// Offset of the CRM's local time from UTC, in seconds.
const LOCAL_OFFSET_SECS: i32 = 3 * 3600;

/// Trims surrounding whitespace from the client name.
pub fn client_name(raw: &Value, _document: &Value) -> Result<Value, MappingError> {
    match raw {
        Value::Null => Ok(Value::Null),
        Value::String(s) => Ok(Value::String(s.trim().to_string())),
        _ => Err(MappingError::unexpected_type("string")),
    }
}

/// Converts a free-form phone number into the CRM's phone-entry list.
///
/// Strips every non-digit character, normalizes a leading `8` on 11-digit
/// numbers to `7`, and wraps the result as
/// `[{"VALUE": digits, "VALUE_TYPE": "WORK"}]`.
pub fn phone_entries(raw: &Value, _document: &Value) -> Result<Value, MappingError> {
    match raw {
        Value::Null => Ok(Value::Null),
        Value::String(s) => {
            let digits = normalize_phone(s);
            if digits.is_empty() {
                Ok(Value::Null)
            } else {
                Ok(json!([{"VALUE": digits, "VALUE_TYPE": "WORK"}]))
            }
        },
        _ => Err(MappingError::unexpected_type("string")),
    }
}

/// Assembles the multi-line call summary stored in the lead's comments.
///
/// Pulls scattered fields out of the whole document; every absent sub-field
/// renders as a literal placeholder instead of being dropped, so the summary
/// always has the same shape.
pub fn call_summary(_raw: &Value, document: &Value) -> Result<Value, MappingError> {
    let caller = resolve_path(document, "contact.phone")
        .and_then(Value::as_str)
        .map(normalize_phone)
        .filter(|digits| !digits.is_empty());

    let received = resolve_path(document, "call.started_at")
        .and_then(Value::as_str)
        .and_then(format_local_timestamp);

    let duration = resolve_path(document, "call.duration")
        .and_then(as_seconds)
        .map(format_duration);

    let agent =
        resolve_path(document, "call.agent.name").and_then(Value::as_str).map(str::to_string);

    let tags = resolve_path(document, "call.tags")
        .and_then(Value::as_array)
        .map(|items| {
            items.iter().filter_map(Value::as_str).collect::<Vec<_>>().join(", ")
        })
        .filter(|joined| !joined.is_empty());

    let summary = [
        format!("Caller: {}", caller.as_deref().unwrap_or(PLACEHOLDER)),
        format!("Received: {} (UTC+3)", received.as_deref().unwrap_or(PLACEHOLDER)),
        format!("Duration: {}", duration.as_deref().unwrap_or(PLACEHOLDER)),
        format!("Agent: {}", agent.as_deref().unwrap_or(PLACEHOLDER)),
        format!("Tags: {}", tags.as_deref().unwrap_or(PLACEHOLDER)),
    ]
    .join("\n");

    Ok(Value::String(summary))
}

/// Strips non-digits and normalizes the Russian trunk prefix `8` to `7`.
pub(crate) fn normalize_phone(input: &str) -> String {
    let digits: String = input.chars().filter(char::is_ascii_digit).collect();
    if digits.len() == 11 && digits.starts_with('8') {
        format!("7{}", &digits[1..])
    } else {
        digits
    }
}

/// Renders a duration in seconds as `M:SS`.
fn format_duration(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Parses a vendor timestamp and renders it in local (UTC+3) time as
/// `DD.MM.YYYY HH:MM`.
///
/// Accepts RFC 3339 and the vendor's `"YYYY-MM-DD HH:MM:SS"` form, which is
/// interpreted as UTC. Unparseable input yields `None` and falls back to the
/// placeholder.
fn format_local_timestamp(input: &str) -> Option<String> {
    let offset = FixedOffset::east_opt(LOCAL_OFFSET_SECS)?;

    let utc = DateTime::parse_from_rfc3339(input)
        .map(|dt| dt.to_utc())
        .or_else(|_| {
            NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M:%S").map(|naive| naive.and_utc())
        })
        .ok()?;

    Some(utc.with_timezone(&offset).format("%d.%m.%Y %H:%M").to_string())
}

/// Reads a duration that arrives either as a number or a numeric string.
fn as_seconds(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
