//! Scalar type casting with explicit failure.
//!
//! Each cast returns `None` when the input cannot be read as the target type,
//! instead of silently producing zero or an empty string.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::fmt;

/// Target type of a cast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CastType {
    /// Text.
    String,
    /// Boolean.
    Bool,
    /// Signed integer.
    Int,
    /// Floating point number.
    Float,
}

impl fmt::Display for CastType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::String => "string",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
        };
        write!(f, "{name}")
    }
}

/// Casts `value` to `target`.
#[must_use]
pub fn cast(value: &Value, target: CastType) -> Option<Value> {
    match target {
        CastType::String => to_string(value).map(Value::String),
        CastType::Bool => to_bool(value).map(Value::Bool),
        CastType::Int => to_int(value).map(|i| Value::Number(i.into())),
        CastType::Float => to_float(value).and_then(Number::from_f64).map(Value::Number),
    }
}

/// Reads a scalar as text. Lists, maps and null do not convert.
#[must_use]
pub fn to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("1".to_string()),
        Value::Bool(false) => Some(String::new()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Reads a boolean the way HTML forms spell them.
///
/// `1 true on yes` are true, `0 false off no` and the empty string are false,
/// case-insensitively; anything else does not convert.
#[must_use]
pub fn to_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_f64() {
            Some(f) if f == 1.0 => Some(true),
            Some(f) if f == 0.0 => Some(false),
            _ => None,
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "on" | "yes" => Some(true),
            "0" | "false" | "off" | "no" | "" => Some(false),
            _ => None,
        },
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Reads an integer. Floats convert only when they have no fractional part.
#[must_use]
pub fn to_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < 9.0e15)
                .map(|f| f as i64)
        }),
        Value::String(s) => parse_int(s.trim()),
        Value::Bool(b) => Some(i64::from(*b)),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Reads a finite floating point number.
#[must_use]
pub fn to_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_float(s.trim()),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Parses an optionally signed run of ASCII digits.
#[must_use]
pub fn parse_int(s: &str) -> Option<i64> {
    let digits = s.strip_prefix(['+', '-']).unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Parses a decimal number, rejecting `inf`, `NaN` and hex-ish spellings.
#[must_use]
pub fn parse_float(s: &str) -> Option<f64> {
    let looks_numeric = !s.is_empty()
        && s.bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'))
        && s.bytes().any(|b| b.is_ascii_digit());
    if !looks_numeric {
        return None;
    }
    s.parse::<f64>().ok().filter(|f| f.is_finite())
}

/// True when the value is a number or a string that parses as one.
#[must_use]
pub fn is_numeric(value: &Value) -> bool {
    match value {
        Value::Number(_) => true,
        Value::String(s) => parse_float(s.trim()).is_some(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_to_string() {
        assert_eq!(to_string(&json!("abc")), Some("abc".to_string()));
        assert_eq!(to_string(&json!(12)), Some("12".to_string()));
        assert_eq!(to_string(&json!(true)), Some("1".to_string()));
        assert_eq!(to_string(&json!([1])), None);
        assert_eq!(to_string(&json!(null)), None);
    }

    #[test]
    fn test_to_bool() {
        assert_eq!(to_bool(&json!("yes")), Some(true));
        assert_eq!(to_bool(&json!("On")), Some(true));
        assert_eq!(to_bool(&json!("off")), Some(false));
        assert_eq!(to_bool(&json!("")), Some(false));
        assert_eq!(to_bool(&json!(1)), Some(true));
        assert_eq!(to_bool(&json!(2)), None);
        assert_eq!(to_bool(&json!("maybe")), None);
    }

    #[test]
    fn test_to_int() {
        assert_eq!(to_int(&json!("0034")), Some(34));
        assert_eq!(to_int(&json!("-7")), Some(-7));
        assert_eq!(to_int(&json!(" 12 ")), Some(12));
        assert_eq!(to_int(&json!(3.0)), Some(3));
        assert_eq!(to_int(&json!(3.5)), None);
        assert_eq!(to_int(&json!("12abc")), None);
        assert_eq!(to_int(&json!("1.5")), None);
        assert_eq!(to_int(&json!("")), None);
        assert_eq!(to_int(&json!("-")), None);
    }

    #[test]
    fn test_to_float() {
        assert_eq!(to_float(&json!("1.5")), Some(1.5));
        assert_eq!(to_float(&json!("1e3")), Some(1000.0));
        assert_eq!(to_float(&json!("inf")), None);
        assert_eq!(to_float(&json!("NaN")), None);
        assert_eq!(to_float(&json!("abc")), None);
    }

    #[test]
    fn test_cast() {
        assert_eq!(cast(&json!("42"), CastType::Int), Some(json!(42)));
        assert_eq!(cast(&json!("2.5"), CastType::Float), Some(json!(2.5)));
        assert_eq!(cast(&json!(7), CastType::String), Some(json!("7")));
        assert_eq!(cast(&json!("no"), CastType::Bool), Some(json!(false)));
        assert_eq!(cast(&json!({"a": 1}), CastType::String), None);
    }

    #[test]
    fn test_is_numeric() {
        assert!(is_numeric(&json!(5)));
        assert!(is_numeric(&json!("5.25")));
        assert!(!is_numeric(&json!("five")));
        assert!(!is_numeric(&json!(["5"])));
    }
}
