use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::fmt;

/// Possible values that can be stored in a factor-table cell.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum FieldValue {
    /// String value
    String(String),
    /// Integer value
    Integer(i64),
    /// Floating point value
    Float(f64),
    /// Null value (empty cell)
    Null,
}

impl FieldValue {
    /// Convenience accessor returning an `f64` representation if this value is numeric.
    /// Returns `None` when the variant is not `Integer` or `Float`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(i) => Some(*i as f64),
            FieldValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns `true` when the value is `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }
}

// -------------------------------------------------------------------------------------------------
// Conversions between internal `FieldValue` and `serde_json::Value`.
// These let the export layer reuse the same data structures without hand-written
// mapping code at every call site.
// -------------------------------------------------------------------------------------------------

impl From<FieldValue> for serde_json::Value {
    fn from(value: FieldValue) -> Self {
        match value {
            FieldValue::String(s) => Self::String(s),
            FieldValue::Integer(i) => Self::Number(serde_json::Number::from(i)),
            FieldValue::Float(f) => serde_json::Number::from_f64(f).map_or(Self::Null, Self::Number),
            FieldValue::Null => Self::Null,
        }
    }
}

impl From<&FieldValue> for serde_json::Value {
    fn from(value: &FieldValue) -> Self {
        match value {
            FieldValue::String(s) => Self::String(s.clone()),
            FieldValue::Integer(i) => Self::Number(serde_json::Number::from(*i)),
            FieldValue::Float(f) => {
                serde_json::Number::from_f64(*f).map_or(Self::Null, Self::Number)
            }
            FieldValue::Null => Self::Null,
        }
    }
}

impl TryFrom<&serde_json::Value> for FieldValue {
    type Error = anyhow::Error;

    fn try_from(value: &serde_json::Value) -> Result<Self, Self::Error> {
        Ok(match value {
            serde_json::Value::String(s) => Self::String(s.clone()),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Integer(i)
                } else if let Some(f) = n.as_f64() {
                    Self::Float(f)
                } else {
                    return Err(anyhow!("Unsupported number value: {}", n));
                }
            }
            serde_json::Value::Null => Self::Null,
            other => return Err(anyhow!("Unsupported cell value: {}", other)),
        })
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(s) => write!(f, "{}", s),
            FieldValue::Integer(i) => write!(f, "{}", i),
            FieldValue::Float(x) => write!(f, "{}", x),
            // Null renders as an empty cell, matching how it was read.
            FieldValue::Null => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn as_f64_covers_numeric_variants() {
        assert_eq!(FieldValue::Integer(42).as_f64(), Some(42.0));
        assert_eq!(FieldValue::Float(1.5).as_f64(), Some(1.5));
        assert_eq!(FieldValue::String("1.5".to_string()).as_f64(), None);
        assert_eq!(FieldValue::Null.as_f64(), None);
    }

    #[test]
    fn json_round_trip_preserves_variants() {
        let values = vec![
            FieldValue::String("Entity A".to_string()),
            FieldValue::Integer(100),
            FieldValue::Float(0.25),
            FieldValue::Null,
        ];
        for value in values {
            let json: serde_json::Value = (&value).into();
            let back = FieldValue::try_from(&json).unwrap();
            assert_eq!(back, value);
        }
    }

    #[test]
    fn display_renders_null_as_empty() {
        assert_eq!(FieldValue::Null.to_string(), "");
        assert_eq!(FieldValue::Integer(7).to_string(), "7");
        assert_eq!(FieldValue::String("abc".to_string()).to_string(), "abc");
    }
}
