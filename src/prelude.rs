pub use crate::date::{DateConfig, DateMode, TimeZoneSetting};
pub use crate::feedback::{FeedbackOptions, FeedbackSnapshot, MessageCenter};
pub use crate::fields::{
    CheckboxField, DateField, Field, FieldHandle, FieldKind, IntOption, PickerControl,
    PickerField, PickerOption, TextField, TextOption,
};
pub use crate::form::{FieldValue, Form, FormError, FormRecord, FormResult};
pub use crate::notify::ChangeNotifier;
pub use crate::value::ExternalValue;
