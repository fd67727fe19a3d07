use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// Boundary representation of a field value.
///
/// Every field reads and writes this type on its `value` / `set_value` pair,
/// and the form collects it into the map handed to whatever persists the
/// form. Picker options serialize into one of the primitive variants.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExternalValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ExternalKind {
    Null,
    Bool,
    Int,
    Float,
    Text,
}

impl Display for ExternalKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ExternalKind::Null => "null",
            ExternalKind::Bool => "bool",
            ExternalKind::Int => "int",
            ExternalKind::Float => "float",
            ExternalKind::Text => "text",
        })
    }
}

impl ExternalValue {
    pub fn kind(&self) -> ExternalKind {
        match self {
            ExternalValue::Null => ExternalKind::Null,
            ExternalValue::Bool(_) => ExternalKind::Bool,
            ExternalValue::Int(_) => ExternalKind::Int,
            ExternalValue::Float(_) => ExternalKind::Float,
            ExternalValue::Text(_) => ExternalKind::Text,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ExternalValue::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ExternalValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            ExternalValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            ExternalValue::Float(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ExternalValue::Text(value) => Some(value),
            _ => None,
        }
    }

    /// Converts a JSON scalar. Arrays and objects have no external
    /// representation and yield `None`.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(ExternalValue::Null),
            Value::Bool(value) => Some(ExternalValue::Bool(*value)),
            Value::Number(number) => Some(match number.as_i64() {
                Some(int) => ExternalValue::Int(int),
                None => ExternalValue::Float(number.as_f64()?),
            }),
            Value::String(text) => Some(ExternalValue::Text(text.clone())),
            Value::Array(_) | Value::Object(_) => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            ExternalValue::Null => Value::Null,
            ExternalValue::Bool(value) => Value::Bool(*value),
            ExternalValue::Int(value) => Value::Number(Number::from(*value)),
            ExternalValue::Float(value) => Number::from_f64(*value)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            ExternalValue::Text(value) => Value::String(value.clone()),
        }
    }
}

impl From<bool> for ExternalValue {
    fn from(value: bool) -> Self {
        ExternalValue::Bool(value)
    }
}

impl From<i64> for ExternalValue {
    fn from(value: i64) -> Self {
        ExternalValue::Int(value)
    }
}

impl From<i32> for ExternalValue {
    fn from(value: i32) -> Self {
        ExternalValue::Int(i64::from(value))
    }
}

impl From<f64> for ExternalValue {
    fn from(value: f64) -> Self {
        ExternalValue::Float(value)
    }
}

impl From<String> for ExternalValue {
    fn from(value: String) -> Self {
        ExternalValue::Text(value)
    }
}

impl From<&str> for ExternalValue {
    fn from(value: &str) -> Self {
        ExternalValue::Text(value.to_string())
    }
}

impl<T> From<Option<T>> for ExternalValue
where
    T: Into<ExternalValue>,
{
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(ExternalValue::Null)
    }
}

impl From<ExternalValue> for Value {
    fn from(value: ExternalValue) -> Self {
        value.to_json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_scalars_map_to_variants() {
        assert_eq!(ExternalValue::from_json(&json!(null)), Some(ExternalValue::Null));
        assert_eq!(
            ExternalValue::from_json(&json!(1700000000)),
            Some(ExternalValue::Int(1_700_000_000))
        );
        assert_eq!(
            ExternalValue::from_json(&json!(1.5)),
            Some(ExternalValue::Float(1.5))
        );
        assert_eq!(
            ExternalValue::from_json(&json!("abc")),
            Some(ExternalValue::Text("abc".to_string()))
        );
        assert_eq!(ExternalValue::from_json(&json!([1, 2])), None);
        assert_eq!(ExternalValue::from_json(&json!({"a": 1})), None);
    }

    #[test]
    fn untagged_serde_uses_plain_json_shapes() {
        let values = vec![
            ExternalValue::Null,
            ExternalValue::Bool(true),
            ExternalValue::Int(7),
            ExternalValue::Text("x".into()),
        ];
        let encoded = serde_json::to_string(&values).expect("serialize values");
        assert_eq!(encoded, r#"[null,true,7,"x"]"#);
        let decoded: Vec<ExternalValue> = serde_json::from_str(&encoded).expect("decode values");
        assert_eq!(decoded, values);
    }

    #[test]
    fn optional_values_convert_to_null() {
        assert_eq!(ExternalValue::from(None::<i64>), ExternalValue::Null);
        assert_eq!(ExternalValue::from(Some("a")), ExternalValue::Text("a".into()));
        assert_eq!(ExternalValue::Int(3).kind(), ExternalKind::Int);
        assert_eq!(ExternalValue::Float(f64::NAN).to_json(), Value::Null);
    }

    #[test]
    fn accessors_only_match_their_variant() {
        assert!(ExternalValue::Null.is_null());
        assert!(!ExternalValue::Int(0).is_null());

        assert_eq!(ExternalValue::Bool(true).as_bool(), Some(true));
        assert_eq!(ExternalValue::Int(1).as_bool(), None);

        assert_eq!(ExternalValue::Int(42).as_int(), Some(42));
        assert_eq!(ExternalValue::Float(42.0).as_int(), None);

        assert_eq!(ExternalValue::Float(0.5).as_float(), Some(0.5));
        assert_eq!(ExternalValue::Int(1).as_float(), None);

        assert_eq!(ExternalValue::Text("red".into()).as_text(), Some("red"));
        assert_eq!(ExternalValue::Null.as_text(), None);
    }
}
