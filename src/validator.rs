use serde_json::{Map, Value};

use crate::document::{array_slots, flatten};
use crate::error::{value_type_name, PathSegment, SieveError};
use crate::path::FieldPath;
use crate::primitives::Clean;
use crate::schema::{FieldDef, Schema};

struct CompiledField {
    raw: String,
    path: FieldPath,
    def: FieldDef,
}

/// A compiled schema, reusable across any number of documents.
///
/// Immutable once built; every call allocates its own working copy, so a
/// single `Validator` can be shared between threads without locking.
///
/// # Example
/// ```
/// use docsieve::Schema;
/// use serde_json::json;
///
/// let validator = docsieve::compile(
///     Schema::new()
///         .field("name", docsieve::string())
///         .field("items.qty", docsieve::integer()),
/// )
/// .unwrap();
///
/// let clean = validator
///     .validate(&json!({"name": 7, "items": [{"qty": "2"}, {"qty": 4.5}]}))
///     .unwrap();
/// assert_eq!(clean["name"], json!("7"));
/// assert_eq!(clean["items"], json!([{"qty": 2}, {"qty": 5}]));
///
/// let err = validator.validate(&json!({"name": "x", "extra": 1})).unwrap_err();
/// assert_eq!(err.to_string(), "unexpected property: extra");
/// ```
pub struct Validator {
    fields: Vec<CompiledField>,
}

/// Compile `schema` into a [`Validator`].
///
/// Every field path and constraint is checked here, so a malformed schema
/// fails once, up front, with an [`ErrorKind::Schema`](crate::ErrorKind::Schema)
/// error.
pub fn compile(schema: Schema) -> Result<Validator, SieveError> {
    Validator::new(schema)
}

impl Validator {
    pub fn new(schema: Schema) -> Result<Self, SieveError> {
        let mut fields = Vec::with_capacity(schema.len());
        for (raw, def) in schema.iter() {
            let path = FieldPath::parse(raw)?;
            def.ensure_valid()
                .map_err(|e| e.at(vec![PathSegment::Field(raw.to_string())]))?;
            fields.push(CompiledField {
                raw: raw.to_string(),
                path,
                def: def.clone(),
            });
        }

        tracing::debug!(fields = fields.len(), "compiled document schema");
        Ok(Self { fields })
    }

    /// Field paths in the order they are processed.
    pub fn field_paths(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.raw.as_str())
    }

    /// Validate a document, which must be a JSON object.
    ///
    /// Returns the cleaned copy; `doc` itself is never modified.
    pub fn validate(&self, doc: &Value) -> Result<Map<String, Value>, SieveError> {
        match doc {
            Value::Object(map) => self.validate_map(map),
            other => {
                let err = SieveError::invalid_type(
                    format!("document cannot be {}", value_type_name(other)),
                    Some(other),
                );
                tracing::debug!(kind = err.kind.key(), "document rejected");
                Err(err)
            }
        }
    }

    pub fn validate_map(&self, doc: &Map<String, Value>) -> Result<Map<String, Value>, SieveError> {
        self.run(doc).map_err(|err| {
            tracing::debug!(
                kind = err.kind.key(),
                path = %err.path_string(),
                "document rejected"
            );
            err
        })
    }

    /// Shorthand for `validate(doc).is_ok()`.
    pub fn is_valid(&self, doc: &Value) -> bool {
        self.validate(doc).is_ok()
    }

    fn run(&self, doc: &Map<String, Value>) -> Result<Map<String, Value>, SieveError> {
        let (mut copy, mut remaining) = flatten(doc);

        for field in &self.fields {
            remaining.claim(&field.raw);
            match &field.path.subprop {
                None => clean_scalar(&mut copy, doc.get(&field.path.prop), field)?,
                Some(subprop) => clean_elements(&mut copy, field, subprop)?,
            }
        }

        let leftovers = remaining.into_leftovers();
        if !leftovers.is_empty() {
            return Err(SieveError::unexpected(leftovers));
        }

        tracing::trace!(fields = copy.len(), "document accepted");
        Ok(copy)
    }
}

/// `original` is the input document's value, reported on errors because
/// the working copy has already nulled non-object array elements.
fn clean_scalar(
    copy: &mut Map<String, Value>,
    original: Option<&Value>,
    field: &CompiledField,
) -> Result<(), SieveError> {
    let prop = &field.path.prop;
    let cleaned = field
        .def
        .clean(copy.get(prop))
        .map_err(|e| e.received_from(original).at(field.path.segments(None)))?;
    match cleaned {
        Some(value) => {
            copy.insert(prop.clone(), value);
        }
        None => {
            copy.shift_remove(prop);
        }
    }
    Ok(())
}

fn clean_elements(
    copy: &mut Map<String, Value>,
    field: &CompiledField,
    subprop: &str,
) -> Result<(), SieveError> {
    let elements = array_slots(copy, &field.path.prop)?;
    for (i, element) in elements.iter_mut().enumerate() {
        let Value::Object(sub) = element else {
            return Err(
                SieveError::validation("must be an object", None).at(field.path.segments(Some(i)))
            );
        };
        let cleaned = field
            .def
            .clean(sub.get(subprop))
            .map_err(|e| e.at(field.path.segments(Some(i))))?;
        match cleaned {
            Some(value) => {
                sub.insert(subprop.to_string(), value);
            }
            None => {
                sub.shift_remove(subprop);
            }
        }
    }
    Ok(())
}

impl std::fmt::Debug for Validator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Validator")
            .field("fields", &self.field_paths().collect::<Vec<_>>())
            .finish()
    }
}
