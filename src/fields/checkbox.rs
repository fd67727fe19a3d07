use std::sync::{Arc, RwLock};

use super::{Field, FieldKind, read_state, write_state};
use crate::notify::ChangeNotifier;
use crate::value::ExternalValue;

#[derive(Debug, Default)]
struct CheckboxState {
    checked: bool,
    error: Option<String>,
    disabled: bool,
}

/// Boolean field. Every assignment notifies, including one that keeps the
/// current value.
#[derive(Clone, Default)]
pub struct CheckboxField {
    state: Arc<RwLock<CheckboxState>>,
    on_change: ChangeNotifier,
}

impl CheckboxField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn checked(&self) -> bool {
        read_state(&self.state).checked
    }

    /// User input. Ignored while the field is disabled.
    pub fn set_checked(&self, checked: bool) -> bool {
        if self.is_disabled() {
            return false;
        }
        self.assign(checked);
        true
    }

    pub fn toggle(&self) -> bool {
        let next = !self.checked();
        self.set_checked(next)
    }

    fn assign(&self, checked: bool) {
        {
            let mut state = write_state(&self.state);
            state.checked = checked;
            state.error = None;
        }
        self.on_change.trigger();
    }
}

impl Field for CheckboxField {
    fn kind(&self) -> FieldKind {
        FieldKind::Checkbox
    }

    fn value(&self) -> ExternalValue {
        ExternalValue::Bool(self.checked())
    }

    fn set_value(&self, value: ExternalValue) {
        let checked = match value {
            ExternalValue::Null => false,
            ExternalValue::Bool(checked) => checked,
            other => {
                tracing::warn!(kind = %other.kind(), "checkbox cannot parse value");
                false
            }
        };
        self.assign(checked);
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
