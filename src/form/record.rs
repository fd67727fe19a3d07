use std::collections::BTreeMap;

use super::controller::Form;
use crate::value::ExternalValue;

/// Rust type that can travel through a form as an external value.
///
/// Decoding follows the fields' lenient policy: a value of the wrong shape
/// is logged and replaced with the type's empty value.
pub trait FieldValue: Sized {
    fn to_external(&self) -> ExternalValue;
    fn from_external(value: &ExternalValue) -> Self;
}

/// Record that maps onto a form by field name, usually through
/// `#[derive(FormRecord)]`.
pub trait FormRecord: Sized {
    fn to_values(&self) -> BTreeMap<String, ExternalValue>;
    fn from_values(values: &BTreeMap<String, ExternalValue>) -> Self;
}

impl FieldValue for bool {
    fn to_external(&self) -> ExternalValue {
        ExternalValue::Bool(*self)
    }

    fn from_external(value: &ExternalValue) -> Self {
        match value {
            ExternalValue::Bool(value) => *value,
            ExternalValue::Null => false,
            other => {
                tracing::warn!(kind = %other.kind(), "cannot decode bool record value");
                false
            }
        }
    }
}

impl FieldValue for String {
    fn to_external(&self) -> ExternalValue {
        ExternalValue::Text(self.clone())
    }

    fn from_external(value: &ExternalValue) -> Self {
        match value {
            ExternalValue::Text(value) => value.clone(),
            ExternalValue::Null => String::new(),
            other => {
                tracing::warn!(kind = %other.kind(), "cannot decode text record value");
                String::new()
            }
        }
    }
}

impl FieldValue for i64 {
    fn to_external(&self) -> ExternalValue {
        ExternalValue::Int(*self)
    }

    fn from_external(value: &ExternalValue) -> Self {
        match value {
            ExternalValue::Int(value) => *value,
            ExternalValue::Null => 0,
            other => {
                tracing::warn!(kind = %other.kind(), "cannot decode int record value");
                0
            }
        }
    }
}

impl FieldValue for Option<i64> {
    fn to_external(&self) -> ExternalValue {
        (*self).into()
    }

    fn from_external(value: &ExternalValue) -> Self {
        match value {
            ExternalValue::Int(value) => Some(*value),
            ExternalValue::Null => None,
            other => {
                tracing::warn!(kind = %other.kind(), "cannot decode optional int record value");
                None
            }
        }
    }
}

impl FieldValue for Option<String> {
    fn to_external(&self) -> ExternalValue {
        self.clone().into()
    }

    fn from_external(value: &ExternalValue) -> Self {
        match value {
            ExternalValue::Text(value) => Some(value.clone()),
            ExternalValue::Null => None,
            other => {
                tracing::warn!(kind = %other.kind(), "cannot decode optional text record value");
                None
            }
        }
    }
}

impl Form {
    pub fn load_record<R>(&self, record: &R)
    where
        R: FormRecord,
    {
        self.set_values(record.to_values());
    }

    /// Builds a record from the current values. Record keys without a
    /// matching field decode from null.
    pub fn read_record<R>(&self) -> R
    where
        R: FormRecord,
    {
        R::from_values(&self.values())
    }
}
