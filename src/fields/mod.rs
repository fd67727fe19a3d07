mod checkbox;
mod date;
mod picker;
mod text;

use std::fmt::{Display, Formatter};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::notify::ChangeNotifier;
use crate::value::ExternalValue;

pub use checkbox::CheckboxField;
pub use date::DateField;
pub use picker::{IntOption, PickerControl, PickerField, PickerOption, TextOption};
pub use text::TextField;

/// Contract every form field exposes to a form and to view bindings.
pub trait Field: Send + Sync {
    fn kind(&self) -> FieldKind;
    fn value(&self) -> ExternalValue;
    /// Adopts an external value. Unparsable input is logged and replaced by
    /// the field's default, it never fails.
    fn set_value(&self, value: ExternalValue);
    fn error(&self) -> Option<String>;
    fn set_error(&self, error: Option<String>);
    fn is_disabled(&self) -> bool;
    fn set_disabled(&self, disabled: bool);
    fn on_change(&self) -> &ChangeNotifier;
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FieldKind {
    Checkbox,
    Text,
    Date,
    Picker,
}

impl Display for FieldKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            FieldKind::Checkbox => "checkbox",
            FieldKind::Text => "text",
            FieldKind::Date => "date",
            FieldKind::Picker => "picker",
        })
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum FieldError {
    EmptySelection,
}

impl Display for FieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldError::EmptySelection => f.write_str("picker selection must not be empty"),
        }
    }
}

impl std::error::Error for FieldError {}

/// Tagged field reference stored by a form.
///
/// Pickers are type-erased behind `PickerControl` so a form can hold pickers
/// over different option types.
#[derive(Clone)]
pub enum FieldHandle {
    Checkbox(CheckboxField),
    Text(TextField),
    Date(DateField),
    Picker(Arc<dyn PickerControl>),
}

impl FieldHandle {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldHandle::Checkbox(_) => FieldKind::Checkbox,
            FieldHandle::Text(_) => FieldKind::Text,
            FieldHandle::Date(_) => FieldKind::Date,
            FieldHandle::Picker(_) => FieldKind::Picker,
        }
    }

    pub fn as_field(&self) -> &dyn Field {
        match self {
            FieldHandle::Checkbox(field) => field,
            FieldHandle::Text(field) => field,
            FieldHandle::Date(field) => field,
            FieldHandle::Picker(field) => field.as_field(),
        }
    }
}

impl From<CheckboxField> for FieldHandle {
    fn from(field: CheckboxField) -> Self {
        FieldHandle::Checkbox(field)
    }
}

impl From<TextField> for FieldHandle {
    fn from(field: TextField) -> Self {
        FieldHandle::Text(field)
    }
}

impl From<DateField> for FieldHandle {
    fn from(field: DateField) -> Self {
        FieldHandle::Date(field)
    }
}

impl<O> From<PickerField<O>> for FieldHandle
where
    O: PickerOption,
{
    fn from(field: PickerField<O>) -> Self {
        FieldHandle::Picker(Arc::new(field))
    }
}

// Field state writes are plain assignments, so a poisoned lock still guards
// consistent data.
pub(crate) fn read_state<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    match lock.read() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

pub(crate) fn write_state<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    match lock.write() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
