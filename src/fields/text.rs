use std::sync::{Arc, RwLock};

use super::{Field, FieldKind, read_state, write_state};
use crate::notify::ChangeNotifier;
use crate::value::ExternalValue;

#[derive(Debug, Default)]
struct TextState {
    text: String,
    last_notified: String,
    error: Option<String>,
    disabled: bool,
}

/// String field. Listeners fire only when the text differs from the value
/// they were last notified with.
#[derive(Clone, Default)]
pub struct TextField {
    state: Arc<RwLock<TextState>>,
    on_change: ChangeNotifier,
}

impl TextField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> String {
        read_state(&self.state).text.clone()
    }

    /// User input. Ignored while the field is disabled.
    pub fn input(&self, text: impl Into<String>) -> bool {
        if self.is_disabled() {
            return false;
        }
        self.assign(text.into());
        true
    }

    fn assign(&self, text: String) {
        let changed = {
            let mut state = write_state(&self.state);
            state.error = None;
            let changed = state.last_notified != text;
            if changed {
                state.last_notified.clone_from(&text);
            }
            state.text = text;
            changed
        };
        if changed {
            self.on_change.trigger();
        }
    }
}

impl Field for TextField {
    fn kind(&self) -> FieldKind {
        FieldKind::Text
    }

    fn value(&self) -> ExternalValue {
        ExternalValue::Text(self.text())
    }

    fn set_value(&self, value: ExternalValue) {
        let text = match value {
            ExternalValue::Null => String::new(),
            ExternalValue::Text(text) => text,
            other => {
                tracing::warn!(kind = %other.kind(), "text field cannot parse value");
                String::new()
            }
        };
        self.assign(text);
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counted(field: &TextField) -> Arc<AtomicUsize> {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        field.on_change().add(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        calls
    }

    #[test]
    fn repeated_value_notifies_once() {
        let field = TextField::new();
        let calls = counted(&field);

        field.set_value("x".into());
        field.set_value("x".into());
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        field.set_value("y".into());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn initial_empty_text_counts_as_notified() {
        let field = TextField::new();
        let calls = counted(&field);
        field.set_value(ExternalValue::Null);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(field.value(), ExternalValue::Text(String::new()));
    }

    #[test]
    fn non_text_values_fall_back_to_empty() {
        let field = TextField::new();
        field.set_value("kept".into());
        field.set_value(ExternalValue::Int(42));
        assert_eq!(field.text(), "");
    }

    #[test]
    fn every_assignment_clears_error() {
        let field = TextField::new();
        field.set_value("same".into());
        field.set_error(Some("Too short".into()));

        field.set_value("same".into());
        assert_eq!(field.error(), None);
    }

    #[test]
    fn disabled_field_rejects_input() {
        let field = TextField::new();
        field.set_disabled(true);
        assert!(!field.input("typed"));
        assert_eq!(field.text(), "");

        field.set_disabled(false);
        assert!(field.input("typed"));
        assert_eq!(field.text(), "typed");
    }
}
