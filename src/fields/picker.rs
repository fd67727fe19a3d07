use std::sync::{Arc, RwLock};

use super::{Field, FieldError, FieldKind, read_state, write_state};
use crate::notify::ChangeNotifier;
use crate::value::ExternalValue;

/// Selectable entry of a picker.
pub trait PickerOption: Clone + Send + Sync + 'static {
    fn title(&self) -> &str;
    fn serialize(&self) -> ExternalValue;

    fn matches(&self, value: &ExternalValue) -> bool {
        self.serialize() == *value
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IntOption {
    pub title: String,
    pub value: i64,
}

impl IntOption {
    pub fn new(title: impl Into<String>, value: i64) -> Self {
        Self {
            title: title.into(),
            value,
        }
    }
}

impl PickerOption for IntOption {
    fn title(&self) -> &str {
        &self.title
    }

    fn serialize(&self) -> ExternalValue {
        ExternalValue::Int(self.value)
    }

    fn matches(&self, value: &ExternalValue) -> bool {
        match value {
            ExternalValue::Int(candidate) => *candidate == self.value,
            other => {
                tracing::debug!(kind = %other.kind(), "int option cannot compare value");
                false
            }
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TextOption {
    pub title: String,
    pub value: String,
}

impl TextOption {
    pub fn new(title: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            value: value.into(),
        }
    }
}

impl PickerOption for TextOption {
    fn title(&self) -> &str {
        &self.title
    }

    fn serialize(&self) -> ExternalValue {
        ExternalValue::Text(self.value.clone())
    }
}

/// Picker operations that do not depend on the option type, so a view
/// layer can render any picker held by a form.
pub trait PickerControl: Field {
    fn titles(&self) -> Vec<String>;
    fn selected_index(&self) -> usize;
    /// User selection. Returns `false` when disabled or out of range.
    fn select_index(&self, index: usize) -> bool;
    fn as_field(&self) -> &dyn Field;
}

#[derive(Debug, Default)]
struct PickerState {
    index: usize,
    error: Option<String>,
    disabled: bool,
}

/// Field whose value is one option of a fixed, non-empty selection.
#[derive(Clone)]
pub struct PickerField<O>
where
    O: PickerOption,
{
    selection: Arc<[O]>,
    null_value: Option<ExternalValue>,
    state: Arc<RwLock<PickerState>>,
    on_change: ChangeNotifier,
}

impl<O> PickerField<O>
where
    O: PickerOption,
{
    pub fn new(selection: Vec<O>) -> Result<Self, FieldError> {
        if selection.is_empty() {
            return Err(FieldError::EmptySelection);
        }
        Ok(Self {
            selection: selection.into(),
            null_value: None,
            state: Arc::new(RwLock::new(PickerState::default())),
            on_change: ChangeNotifier::new(),
        })
    }

    /// Marks the option matching `value` as "no selection" for external
    /// exchange.
    pub fn null_value(mut self, value: impl Into<ExternalValue>) -> Self {
        self.null_value = Some(value.into());
        self
    }

    pub fn selection(&self) -> &[O] {
        &self.selection
    }

    pub fn selected(&self) -> &O {
        let index = read_state(&self.state).index;
        &self.selection[index]
    }

    fn assign(&self, index: usize) {
        {
            let mut state = write_state(&self.state);
            state.index = index;
            state.error = None;
        }
        self.on_change.trigger();
    }
}

impl<O> Field for PickerField<O>
where
    O: PickerOption,
{
    fn kind(&self) -> FieldKind {
        FieldKind::Picker
    }

    fn value(&self) -> ExternalValue {
        let selected = self.selected();
        match &self.null_value {
            Some(null_value) if selected.matches(null_value) => ExternalValue::Null,
            _ => selected.serialize(),
        }
    }

    fn set_value(&self, value: ExternalValue) {
        let target = match value {
            ExternalValue::Null => match &self.null_value {
                Some(null_value) => null_value.clone(),
                None => {
                    tracing::warn!("picker has no null value, selecting first option");
                    write_state(&self.state).index = 0;
                    return;
                }
            },
            other => other,
        };

        match self.selection.iter().position(|option| option.matches(&target)) {
            Some(index) => self.assign(index),
            None => {
                tracing::warn!(value = ?target, "value not found in picker selection");
                self.assign(0);
            }
        }
    }

    fn error(&self) -> Option<String> {
        read_state(&self.state).error.clone()
    }

    fn set_error(&self, error: Option<String>) {
        write_state(&self.state).error = error;
    }

    fn is_disabled(&self) -> bool {
        read_state(&self.state).disabled
    }

    fn set_disabled(&self, disabled: bool) {
        write_state(&self.state).disabled = disabled;
    }

    fn on_change(&self) -> &ChangeNotifier {
        &self.on_change
    }
}

impl<O> PickerControl for PickerField<O>
where
    O: PickerOption,
{
    fn titles(&self) -> Vec<String> {
        self.selection
            .iter()
            .map(|option| option.title().to_string())
            .collect()
    }

    fn selected_index(&self) -> usize {
        read_state(&self.state).index
    }

    fn select_index(&self, index: usize) -> bool {
        if self.is_disabled() || index >= self.selection.len() {
            return false;
        }
        self.assign(index);
        true
    }

    fn as_field(&self) -> &dyn Field {
        self
    }
}
