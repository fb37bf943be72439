//! Scalar cell values carried by tree nodes

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single field value of a node.
///
/// Ids compare by exact value and type: `Integer(1)` is not `Text("1")`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl FieldValue {
    /// `Null` is treated like a missing field everywhere.
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Interpret command-line text: integer, then float, then plain text.
    pub fn parse_loose(raw: &str) -> Self {
        let trimmed = raw.trim();
        if let Ok(i) = trimmed.parse::<i64>() {
            return FieldValue::Integer(i);
        }
        if let Ok(f) = trimmed.parse::<f64>() {
            if f.is_finite() {
                return FieldValue::Float(f);
            }
        }
        match trimmed {
            "true" => FieldValue::Bool(true),
            "false" => FieldValue::Bool(false),
            "null" => FieldValue::Null,
            _ => FieldValue::Text(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(i) => Some(*i as f64),
            FieldValue::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => write!(f, "null"),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Integer(i) => write!(f, "{}", i),
            FieldValue::Float(v) => write!(f, "{}", v),
            FieldValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Integer(value.into())
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("42", FieldValue::Integer(42))]
    #[case("-3", FieldValue::Integer(-3))]
    #[case("7664.13", FieldValue::Float(7664.13))]
    #[case("1-2", FieldValue::Text("1-2".into()))]
    #[case("true", FieldValue::Bool(true))]
    #[case("Category A", FieldValue::Text("Category A".into()))]
    fn given_raw_text_when_parse_loose_then_returns_typed_value(
        #[case] raw: &str,
        #[case] expected: FieldValue,
    ) {
        assert_eq!(FieldValue::parse_loose(raw), expected);
    }

    #[test]
    fn given_json_scalars_when_deserializing_then_picks_narrowest_variant() {
        let values: Vec<FieldValue> =
            serde_json::from_str(r#"[null, true, 500, 6922.44, "Lags"]"#).unwrap();
        assert_eq!(
            values,
            vec![
                FieldValue::Null,
                FieldValue::Bool(true),
                FieldValue::Integer(500),
                FieldValue::Float(6922.44),
                FieldValue::Text("Lags".into()),
            ]
        );
    }

    #[test]
    fn given_integer_and_text_ids_when_comparing_then_not_equal() {
        assert_ne!(FieldValue::from(1), FieldValue::from("1"));
    }
}
