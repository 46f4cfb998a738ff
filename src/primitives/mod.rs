//! Per-type coercers and the constraints applied after coercion.

mod boolean;
mod number;
mod string;

use serde_json::Value;

use crate::error::SieveError;

pub use boolean::BooleanField;
pub use number::{Bounds, IntegerField, NumberField};
pub use string::StringField;

pub(crate) use number::format_number;

/// One step of the field pipeline: coerce a slot's value, then check it.
///
/// `value` is `None` when the slot is absent from the document. On success
/// the cleaned value is returned, or `None` when the slot must be dropped
/// from the output altogether.
pub trait Clean {
    fn clean(&self, value: Option<&Value>) -> Result<Option<Value>, SieveError>;
}

pub(crate) fn cannot_be(value: &Value) -> SieveError {
    SieveError::invalid_type(
        format!("cannot be {}", crate::error::value_type_name(value)),
        Some(value),
    )
}

pub(crate) fn non_finite(value: Option<&Value>) -> SieveError {
    SieveError::invalid_type("cannot be Infinity, -Infinity, or NaN", value)
}
