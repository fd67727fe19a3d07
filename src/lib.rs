extern crate self as calmform;

pub mod date;
pub mod feedback;
pub mod fields;
pub mod form;
pub mod notify;
pub mod prelude;
pub mod value;

pub use form::{Form, FormError, FormResult};
pub use value::ExternalValue;
