//! # docsieve: strict, coercing validation for loosely-typed JSON documents
//!
//! `docsieve` compiles a declarative field schema into a reusable validator.
//! Each call takes an untrusted document, coerces every declared field to its
//! declared type, checks its constraints, and rejects any key the schema does
//! not claim. The result is a new, cleaned document; the input is never
//! modified.
//!
//! ## Quick Start
//!
//! ```rust
//! use serde_json::json;
//!
//! let validator = docsieve::compile(docsieve::schema! {
//!     "name" => docsieve::string().pattern(".").unwrap(),
//!     "age" => docsieve::integer().gte(0.0),
//!     "admin" => docsieve::boolean(),
//!     "tags.label" => docsieve::string(),
//! })
//! .unwrap();
//!
//! let clean = validator
//!     .validate(&json!({"name": "Alex", "age": "41.5", "tags": [{"label": 1}]}))
//!     .unwrap();
//! assert_eq!(
//!     serde_json::Value::Object(clean),
//!     json!({"name": "Alex", "age": 42, "tags": [{"label": "1"}], "admin": false})
//! );
//!
//! let err = validator.validate(&json!({"name": ""})).unwrap_err();
//! assert_eq!(err.to_string(), "name must match /./");
//! ```
//!
//! ## Field paths
//!
//! A schema key is either `name`, a top-level field, or `name.sub`, a field
//! required on every element of the top-level array of objects `name`.
//! Anything deeper is rejected when the schema is compiled.

mod document;
pub mod error;
pub mod format;
pub mod input;
mod macros;
pub mod path;
pub mod primitives;
pub mod schema;
pub mod validator;

// Re-export serde_json for callers building documents
#[doc(hidden)]
pub use serde_json;

// Re-export regex_lite so patterns can be built without a direct dependency
pub use regex_lite;

pub use error::{ErrorKind, PathSegment, SieveError};
pub use input::{compile_from, SchemaInput};
pub use path::FieldPath;
pub use schema::{FieldDef, FieldType, Schema};
pub use validator::{compile, Validator};

// ---------------------------------------------------------------------------
// Convenience constructors
// ---------------------------------------------------------------------------

/// Create a `string` field definition.
pub fn string() -> primitives::StringField {
    primitives::StringField::new()
}

/// Create a `number` field definition (any finite `f64`).
pub fn number() -> primitives::NumberField {
    primitives::NumberField::new()
}

/// Create an `integer` field definition (rounded, ties up).
pub fn integer() -> primitives::IntegerField {
    primitives::IntegerField::new()
}

/// Create a `boolean` field definition.
pub fn boolean() -> primitives::BooleanField {
    primitives::BooleanField::new()
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Common imports for working with `docsieve`.
pub mod prelude {
    pub use crate::error::{ErrorKind, PathSegment, SieveError};
    pub use crate::input::SchemaInput;
    pub use crate::primitives::{BooleanField, Bounds, Clean, IntegerField, NumberField, StringField};
    pub use crate::schema::{FieldDef, FieldType, Schema};
    pub use crate::validator::{compile, Validator};
}
