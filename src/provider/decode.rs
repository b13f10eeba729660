//! Lenient field decoders for the provider's tabular JSON.
//!
//! The provider mixes numbers, numeric strings, empty strings and 0/1 flags in
//! the same columns depending on the report, so every typed record decodes
//! through these helpers instead of trusting the JSON type.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Integer column. `""`, `null` and unparseable text become `0`; fractional
/// numbers are rounded.
pub(crate) fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_to_i64(&Value::deserialize(deserializer)?))
}

/// Text column that may arrive as a number (authority ranks, IPs). Numbers are
/// kept in their JSON spelling so non-numeric sentinels survive untouched.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

/// Flag column: `true`, non-zero numbers and `"1"`/`"true"` are set.
pub(crate) fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => matches!(s.trim(), "1" | "true" | "True" | "TRUE"),
        _ => false,
    })
}

pub(crate) fn value_to_i64(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.round() as i64))
            .unwrap_or(0),
        Value::String(s) => parse_int_prefix(s.trim()),
        Value::Bool(b) => i64::from(*b),
        _ => 0,
    }
}

/// Parses a leading integer the way the provider's web UI does (`"42.7"` -> 42,
/// `"12abc"` -> 12, `"abc"` -> 0).
fn parse_int_prefix(s: &str) -> i64 {
    let end = s
        .char_indices()
        .take_while(|(i, c)| c.is_ascii_digit() || (*i == 0 && (*c == '-' || *c == '+')))
        .map(|(i, c)| i + c.len_utf8())
        .last()
        .unwrap_or(0);
    s[..end].parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Row {
        #[serde(default, deserialize_with = "lenient_i64")]
        value: i64,
        #[serde(default, deserialize_with = "lenient_string")]
        rank: String,
        #[serde(default, deserialize_with = "lenient_bool")]
        flag: bool,
    }

    fn row(json: &str) -> Row {
        serde_json::from_str(json).expect("test row should decode")
    }

    #[test]
    fn test_empty_topic_value_is_zero() {
        assert_eq!(row(r#"{"value": ""}"#).value, 0);
    }

    #[test]
    fn test_numeric_strings_and_numbers() {
        assert_eq!(row(r#"{"value": "37"}"#).value, 37);
        assert_eq!(row(r#"{"value": 37}"#).value, 37);
        assert_eq!(row(r#"{"value": 36.6}"#).value, 37);
        assert_eq!(row(r#"{"value": "12abc"}"#).value, 12);
        assert_eq!(row(r#"{"value": "abc"}"#).value, 0);
        assert_eq!(row(r#"{"value": "-5"}"#).value, -5);
        assert_eq!(row(r#"{"value": null}"#).value, 0);
        assert_eq!(row(r#"{}"#).value, 0);
    }

    #[test]
    fn test_rank_is_preserved_as_text() {
        assert_eq!(row(r#"{"rank": 1234}"#).rank, "1234");
        assert_eq!(row(r#"{"rank": -1}"#).rank, "-1");
        assert_eq!(row(r#"{"rank": "N/A"}"#).rank, "N/A");
        assert_eq!(row(r#"{"rank": null}"#).rank, "");
    }

    #[test]
    fn test_flags() {
        assert!(row(r#"{"flag": 1}"#).flag);
        assert!(row(r#"{"flag": true}"#).flag);
        assert!(row(r#"{"flag": "1"}"#).flag);
        assert!(!row(r#"{"flag": 0}"#).flag);
        assert!(!row(r#"{"flag": ""}"#).flag);
        assert!(!row(r#"{}"#).flag);
    }
}
