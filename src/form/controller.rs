use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

use serde_json::Value;

use crate::fields::{
    CheckboxField, DateField, Field, FieldHandle, FieldKind, PickerControl, TextField,
};
use crate::notify::ChangeListener;
use crate::value::ExternalValue;

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum FormError {
    UnknownField(String),
    FieldKindMismatch {
        name: String,
        expected: FieldKind,
        actual: FieldKind,
    },
}

impl Display for FormError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FormError::UnknownField(name) => write!(f, "form has no field '{name}'"),
            FormError::FieldKindMismatch {
                name,
                expected,
                actual,
            } => write!(f, "field '{name}' is a {actual} field, expected {expected}"),
        }
    }
}

impl std::error::Error for FormError {}

pub type FormResult<T> = Result<T, FormError>;

/// Named collection of fields.
///
/// Adding a field under an existing name replaces it. Bulk operations visit
/// fields in name order.
#[derive(Clone, Default)]
pub struct Form {
    pub(super) fields: BTreeMap<String, FieldHandle>,
}

impl Form {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_field(&mut self, name: impl Into<String>, field: impl Into<FieldHandle>) {
        self.fields.insert(name.into(), field.into());
    }

    pub fn field(&self, name: &str) -> FormResult<&FieldHandle> {
        self.fields
            .get(name)
            .ok_or_else(|| FormError::UnknownField(name.to_string()))
    }

    pub fn checkbox(&self, name: &str) -> FormResult<CheckboxField> {
        match self.field(name)? {
            FieldHandle::Checkbox(field) => Ok(field.clone()),
            other => Err(mismatch(name, FieldKind::Checkbox, other)),
        }
    }

    pub fn text(&self, name: &str) -> FormResult<TextField> {
        match self.field(name)? {
            FieldHandle::Text(field) => Ok(field.clone()),
            other => Err(mismatch(name, FieldKind::Text, other)),
        }
    }

    pub fn date(&self, name: &str) -> FormResult<DateField> {
        match self.field(name)? {
            FieldHandle::Date(field) => Ok(field.clone()),
            other => Err(mismatch(name, FieldKind::Date, other)),
        }
    }

    pub fn picker(&self, name: &str) -> FormResult<Arc<dyn PickerControl>> {
        match self.field(name)? {
            FieldHandle::Picker(field) => Ok(field.clone()),
            other => Err(mismatch(name, FieldKind::Picker, other)),
        }
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn value(&self, name: &str) -> Option<ExternalValue> {
        match self.fields.get(name) {
            Some(field) => Some(field.as_field().value()),
            None => {
                tracing::warn!(field = %name, "form has no such field");
                None
            }
        }
    }

    pub fn values(&self) -> BTreeMap<String, ExternalValue> {
        self.fields
            .iter()
            .map(|(name, field)| (name.clone(), field.as_field().value()))
            .collect()
    }

    pub fn set_values<I, K>(&self, values: I)
    where
        I: IntoIterator<Item = (K, ExternalValue)>,
        K: AsRef<str>,
    {
        for (name, value) in values {
            let name = name.as_ref();
            match self.fields.get(name) {
                Some(field) => field.as_field().set_value(value),
                None => tracing::warn!(field = %name, "skipping value for unknown field"),
            }
        }
    }

    /// Applies a JSON object of values. Entries that are not JSON scalars
    /// are skipped.
    pub fn set_values_json(&self, values: &Value) {
        let Some(entries) = values.as_object() else {
            tracing::warn!("form values payload is not an object");
            return;
        };
        let parsed = entries.iter().filter_map(|(name, raw)| {
            let value = ExternalValue::from_json(raw);
            if value.is_none() {
                tracing::warn!(field = %name, "skipping non-scalar form value");
            }
            value.map(|value| (name.as_str(), value))
        });
        self.set_values(parsed);
    }

    /// Registers one shared listener on every field currently in the form.
    pub fn on_any_change(&self, listener: impl Fn() + Send + Sync + 'static) {
        let listener: ChangeListener = Arc::new(listener);
        for field in self.fields.values() {
            field.as_field().on_change().add_shared(listener.clone());
        }
    }

    pub fn errors(&self) -> BTreeMap<String, String> {
        self.fields
            .iter()
            .filter_map(|(name, field)| field.as_field().error().map(|error| (name.clone(), error)))
            .collect()
    }

    pub fn is_valid(&self) -> bool {
        self.fields
            .values()
            .all(|field| field.as_field().error().is_none())
    }

    pub fn clear_errors(&self) {
        for field in self.fields.values() {
            field.as_field().set_error(None);
        }
    }

    pub fn set_disabled(&self, disabled: bool) {
        for field in self.fields.values() {
            field.as_field().set_disabled(disabled);
        }
    }
}

fn mismatch(name: &str, expected: FieldKind, actual: &FieldHandle) -> FormError {
    FormError::FieldKindMismatch {
        name: name.to_string(),
        expected,
        actual: actual.kind(),
    }
}
