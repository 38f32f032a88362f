//! Numeric identifiers.
//!
//! Stored ids are integers, but older documents and HTTP callers may send
//! them as numeric strings. Everything is normalised to [`Id`] on the way in.

use serde::{de, Deserialize, Deserializer};
use serde_json::Value;

pub type Id = u64;

/// Parse a path segment or query value. Surrounding whitespace is ignored.
pub fn parse_id(raw: &str) -> Option<Id> {
    raw.trim().parse::<Id>().ok()
}

/// Accept a JSON integer, an integral float, or a numeric string.
pub fn id_from_value(value: &Value) -> Option<Id> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && *f >= 0.0).map(|f| f as Id)),
        Value::String(s) => parse_id(s),
        _ => None,
    }
}

pub fn deserialize_id<'de, D>(deserializer: D) -> Result<Id, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    id_from_value(&value).ok_or_else(|| de::Error::custom(format!("invalid id: {value}")))
}

pub fn deserialize_opt_id<'de, D>(deserializer: D) -> Result<Option<Id>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Null => Ok(None),
        other => id_from_value(&other)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("invalid id: {other}"))),
    }
}

/// `max(ids) + 1`, or 1 for an empty collection. `None` when `max` is
/// already `Id::MAX`.
pub fn next_after<I>(ids: I) -> Option<Id>
where
    I: IntoIterator<Item = Id>,
{
    ids.into_iter().max().unwrap_or(0).checked_add(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_numbers_and_numeric_strings() {
        assert_eq!(id_from_value(&json!(7)), Some(7));
        assert_eq!(id_from_value(&json!(7.0)), Some(7));
        assert_eq!(id_from_value(&json!("12")), Some(12));
        assert_eq!(id_from_value(&json!(" 3 ")), Some(3));
    }

    #[test]
    fn rejects_non_ids() {
        assert_eq!(id_from_value(&json!(-1)), None);
        assert_eq!(id_from_value(&json!(1.5)), None);
        assert_eq!(id_from_value(&json!("abc")), None);
        assert_eq!(id_from_value(&json!(null)), None);
        assert_eq!(parse_id("p_1"), None);
    }

    #[test]
    fn next_after_starts_at_one() {
        assert_eq!(next_after(Vec::<Id>::new()), Some(1));
        assert_eq!(next_after([3, 9, 4]), Some(10));
        assert_eq!(next_after([Id::MAX]), None);
    }
}
