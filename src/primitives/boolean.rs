use serde_json::Value;

use super::{cannot_be, Clean};
use crate::error::SieveError;

/// Definition of a `boolean` field. Created via [`docsieve::boolean()`](crate::boolean).
///
/// Accepted coercions:
/// - Strings: `"true"`, `"1"` → `true`; `"false"`, `"0"`, `""` → `false`
/// - Numbers: `1` → `true`; `0` → `false`
/// - Absent → `false`
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanField;

impl BooleanField {
    pub fn new() -> Self {
        Self
    }

    pub fn coerce(value: Option<&Value>) -> Result<bool, SieveError> {
        let Some(value) = value else {
            return Ok(false);
        };
        match value {
            Value::Bool(b) => Ok(*b),
            Value::String(s) => match s.as_str() {
                "true" | "1" => Ok(true),
                "false" | "0" | "" => Ok(false),
                _ => Err(SieveError::invalid_type(
                    r#"must be "true", "1", "false", "0", or "" for string conversion"#,
                    Some(value),
                )),
            },
            Value::Number(n) => match n.as_f64() {
                Some(f) if f == 1.0 => Ok(true),
                Some(f) if f == 0.0 => Ok(false),
                _ => Err(SieveError::invalid_type(
                    "must be 1 or 0 for number conversion",
                    Some(value),
                )),
            },
            other => Err(cannot_be(other)),
        }
    }
}

impl Clean for BooleanField {
    fn clean(&self, value: Option<&Value>) -> Result<Option<Value>, SieveError> {
        Self::coerce(value).map(|b| Some(Value::Bool(b)))
    }
}
