use serde_json::Value;

use super::controller::Form;
use crate::fields::{Field, FieldHandle};

impl Form {
    /// Applies a server validation response of the shape
    /// `{"fields": {"<name>": {"valid": bool, "errors": [string]}}}`.
    ///
    /// Valid entries clear the field error, invalid ones set the error
    /// messages joined by single spaces. Malformed entries and unknown names
    /// are logged and skipped without affecting the rest of the batch.
    pub fn set_validator_info(&self, payload: &Value) {
        let Some(entries) = payload.get("fields").and_then(Value::as_object) else {
            tracing::warn!("cannot parse validator info, missing `fields` object");
            return;
        };

        for (name, entry) in entries {
            let Some(field) = self.fields.get(name) else {
                tracing::warn!(field = %name, "validator info names a field not in the form");
                continue;
            };
            apply_validator_entry(name, field, entry);
        }
    }
}

fn apply_validator_entry(name: &str, field: &FieldHandle, entry: &Value) {
    let Some(valid) = entry.get("valid").and_then(Value::as_bool) else {
        tracing::warn!(field = %name, "cannot parse field validator, missing `valid` flag");
        return;
    };

    if valid {
        field.as_field().set_error(None);
        return;
    }

    let Some(errors) = entry.get("errors").and_then(Value::as_array) else {
        tracing::warn!(field = %name, "cannot parse field validator, missing `errors` list");
        return;
    };

    let mut parts = Vec::with_capacity(errors.len());
    for error in errors {
        match error.as_str() {
            Some(message) => parts.push(message),
            None => tracing::warn!(field = %name, "ignoring non-string validator error"),
        }
    }
    field.as_field().set_error(Some(parts.join(" ")));
}
