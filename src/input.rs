use serde_json::Value;

use crate::error::SieveError;
use crate::schema::Schema;

/// Sources a declarative [`Schema`] can be loaded from.
///
/// Implemented for JSON text (`&str`, `String`), raw bytes (`&[u8]`),
/// file paths (`Path`, `PathBuf`, requires the `std` feature), and
/// `serde_json::Value`. Object key order is kept as definition order.
///
/// # Example
/// ```
/// use docsieve::SchemaInput;
///
/// let schema = r#"{
///     "anyString": {"type": "string"},
///     "ar.x": {"type": "integer"},
///     "omitEmptyString": {"type": "string", "omitEmpty": true}
/// }"#
/// .to_schema()
/// .unwrap();
/// assert_eq!(schema.paths(), ["anyString", "ar.x", "omitEmptyString"]);
/// ```
pub trait SchemaInput {
    fn to_schema(&self) -> Result<Schema, SieveError>;
}

impl SchemaInput for Value {
    fn to_schema(&self) -> Result<Schema, SieveError> {
        Schema::from_value(self)
    }
}

impl SchemaInput for str {
    fn to_schema(&self) -> Result<Schema, SieveError> {
        let value: Value = serde_json::from_str(self)
            .map_err(|e| SieveError::schema(format!("invalid schema JSON: {}", e)))?;
        Schema::from_value(&value)
    }
}

impl SchemaInput for String {
    fn to_schema(&self) -> Result<Schema, SieveError> {
        self.as_str().to_schema()
    }
}

impl SchemaInput for [u8] {
    fn to_schema(&self) -> Result<Schema, SieveError> {
        let value: Value = serde_json::from_slice(self)
            .map_err(|e| SieveError::schema(format!("invalid schema JSON: {}", e)))?;
        Schema::from_value(&value)
    }
}

#[cfg(feature = "std")]
impl SchemaInput for std::path::Path {
    fn to_schema(&self) -> Result<Schema, SieveError> {
        let content = std::fs::read_to_string(self).map_err(|e| {
            SieveError::schema(format!(
                "failed to read schema file {}: {}",
                self.display(),
                e
            ))
        })?;
        content.as_str().to_schema()
    }
}

#[cfg(feature = "std")]
impl SchemaInput for std::path::PathBuf {
    fn to_schema(&self) -> Result<Schema, SieveError> {
        self.as_path().to_schema()
    }
}

/// Load and compile a schema in one step.
///
/// ```
/// let validator = docsieve::compile_from(r#"{"n": {"type": "number", "gt": 0}}"#).unwrap();
/// assert!(validator.is_valid(&serde_json::json!({"n": "3"})));
/// ```
pub fn compile_from<I: SchemaInput + ?Sized>(input: &I) -> Result<crate::Validator, SieveError> {
    crate::compile(input.to_schema()?)
}
