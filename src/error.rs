use std::fmt;

/// A segment in a field path.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub enum PathSegment {
    /// Object field name.
    Field(String),
    /// Array index.
    Index(usize),
}

/// Render a path as `prop` or `prop[0].subprop`.
pub fn format_path(path: &[PathSegment]) -> String {
    let mut out = String::new();
    for segment in path {
        match segment {
            PathSegment::Field(name) => {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(name);
            }
            PathSegment::Index(idx) => {
                out.push('[');
                out.push_str(&idx.to_string());
                out.push(']');
            }
        }
    }
    out
}

/// What went wrong.
///
/// Every kind means the document was rejected, except [`ErrorKind::Schema`],
/// which points at a bug in the schema itself.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub enum ErrorKind {
    /// The schema is malformed: bad field path, unknown type, bad constraint.
    Schema,
    /// The value's runtime type cannot be converted to the declared type.
    Type,
    /// A coerced value failed a constraint (pattern, range, must be an object).
    Validation,
    /// A field declared as an array of objects is present but is not an array.
    SchemaMismatch,
    /// The document carries keys no field path claims.
    UnexpectedProperty { keys: Vec<String> },
}

impl ErrorKind {
    /// Stable string key for this error kind. Useful for error mapping.
    pub fn key(&self) -> &'static str {
        match self {
            ErrorKind::Schema => "schema",
            ErrorKind::Type => "invalid_type",
            ErrorKind::Validation => "invalid_value",
            ErrorKind::SchemaMismatch => "schema_mismatch",
            ErrorKind::UnexpectedProperty { .. } => "unexpected_property",
        }
    }
}

/// The single error produced by a failed compile or validation.
///
/// Validation is fail-fast: the first failing field aborts the document,
/// so there is never more than one of these per call.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct SieveError {
    pub kind: ErrorKind,
    pub message: String,
    pub path: Vec<PathSegment>,
    /// The value that was received (if available).
    pub received: Option<serde_json::Value>,
}

impl SieveError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            path: vec![],
            received: None,
        }
    }

    pub fn schema(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Schema, message)
    }

    /// A coercion failure. `received` is `None` when the value was absent.
    pub fn invalid_type(message: impl Into<String>, received: Option<&serde_json::Value>) -> Self {
        Self::new(ErrorKind::Type, message).with_received(received)
    }

    pub fn validation(message: impl Into<String>, received: Option<&serde_json::Value>) -> Self {
        Self::new(ErrorKind::Validation, message).with_received(received)
    }

    pub fn schema_mismatch(message: impl Into<String>, received: &serde_json::Value) -> Self {
        Self::new(ErrorKind::SchemaMismatch, message).with_received(Some(received))
    }

    /// Rejection for keys that no field path claimed.
    pub fn unexpected(keys: Vec<String>) -> Self {
        let message = if keys.len() > 1 {
            format!("unexpected properties: {}", keys.join(", "))
        } else {
            format!("unexpected property: {}", keys.join(""))
        };
        Self::new(ErrorKind::UnexpectedProperty { keys }, message)
    }

    fn with_received(mut self, received: Option<&serde_json::Value>) -> Self {
        self.received = received.map(truncate_value);
        self
    }

    /// Replace a recorded received value with the one the caller sent.
    pub(crate) fn received_from(self, original: Option<&serde_json::Value>) -> Self {
        if self.received.is_some() {
            self.with_received(original)
        } else {
            self
        }
    }

    /// Set the field path this error is reported against.
    pub fn at(mut self, path: Vec<PathSegment>) -> Self {
        self.path = path;
        self
    }

    /// The rendered field path, empty for document-level errors.
    pub fn path_string(&self) -> String {
        format_path(&self.path)
    }

    pub fn is_schema_error(&self) -> bool {
        self.kind == ErrorKind::Schema
    }
}

impl fmt::Display for SieveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.path.is_empty() {
            write!(f, "{} ", format_path(&self.path))?;
        }
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for SieveError {}

/// Returns the JSON type name for a value.
#[doc(hidden)]
pub fn value_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Format a JSON value for display in logs (short form).
pub fn format_value_short(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => "null".to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::String(s) => {
            if s.chars().count() > 50 {
                let head: String = s.chars().take(47).collect();
                format!("\"{}...\"", head)
            } else {
                format!("\"{}\"", s)
            }
        }
        serde_json::Value::Array(arr) => format!("Array(len={})", arr.len()),
        serde_json::Value::Object(obj) => format!("Object(keys={})", obj.len()),
    }
}

/// Truncate large values to avoid storing huge payloads in errors.
fn truncate_value(value: &serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::String(s) if s.chars().count() > 100 => {
            let head: String = s.chars().take(97).collect();
            serde_json::Value::String(format!("{}...", head))
        }
        serde_json::Value::Array(arr) if arr.len() > 5 => {
            let mut truncated: Vec<serde_json::Value> = arr[..5].to_vec();
            truncated.push(serde_json::Value::String(format!(
                "... ({} more)",
                arr.len() - 5
            )));
            serde_json::Value::Array(truncated)
        }
        serde_json::Value::Object(obj) if obj.len() > 5 => serde_json::Value::String(format!(
            "Object(keys={})",
            obj.len()
        )),
        _ => value.clone(),
    }
}
