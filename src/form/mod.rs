mod controller;
mod record;
mod validation;


pub use calmform_derive::FormRecord;
pub use controller::{Form, FormError, FormResult};
pub use record::{FieldValue, FormRecord};
