use serde_json::Value;
use thiserror::Error;

use crate::message::ChatRequest;

pub const MIN_AGE: i64 = 1;
pub const MAX_AGE: i64 = 18;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("No message provided.")]
    MissingMessage,
    #[error("Invalid age provided.")]
    InvalidAge,
    #[error("Please enter an age between 1 and 18.")]
    AgeOutOfRange,
}

/// Turns an untyped chat payload into a `ChatRequest`.
///
/// Anything that is not a JSON object is handled as an empty mapping, so a
/// missing body fails on the message check like an empty one would.
pub fn validate(raw: &Value) -> Result<ChatRequest, ValidationError> {
    let message = raw
        .get("message")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .ok_or(ValidationError::MissingMessage)?;

    let age = raw
        .get("age")
        .and_then(integer_value)
        .ok_or(ValidationError::InvalidAge)?;

    if !(MIN_AGE..=MAX_AGE).contains(&age) {
        return Err(ValidationError::AgeOutOfRange);
    }

    Ok(ChatRequest {
        message: message.to_string(),
        age: age as u8,
    })
}

// Integers that don't fit in i64 saturate; they're out of range either way.
fn integer_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i)
            } else if n.is_u64() {
                Some(i64::MAX)
            } else {
                n.as_f64()
                    .filter(|f| f.is_finite() && f.fract() == 0.0)
                    .map(|f| f as i64)
            }
        }
        Value::String(s) => parse_integer_str(s.trim()),
        _ => None,
    }
}

fn parse_integer_str(s: &str) -> Option<i64> {
    let (negative, digits) = match s.as_bytes().first()? {
        b'-' => (true, &s[1..]),
        b'+' => (false, &s[1..]),
        _ => (false, s),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match s.parse::<i64>() {
        Ok(i) => Some(i),
        Err(_) if negative => Some(i64::MIN),
        Err(_) => Some(i64::MAX),
    }
}
