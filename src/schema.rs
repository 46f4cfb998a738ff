use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{PathSegment, SieveError};
use crate::primitives::{Bounds, BooleanField, Clean, IntegerField, NumberField, StringField};

/// The four declarable field types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    String,
    Number,
    Integer,
    Boolean,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Integer => "integer",
            FieldType::Boolean => "boolean",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = SieveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(FieldType::String),
            "number" => Ok(FieldType::Number),
            "integer" => Ok(FieldType::Integer),
            "boolean" => Ok(FieldType::Boolean),
            other => Err(SieveError::schema(format!("unknown field type: {}", other))),
        }
    }
}

/// A field definition: the declared type together with its constraints.
///
/// Constraints only exist on the variants they apply to, so a pattern on a
/// number field cannot be expressed.
#[derive(Debug, Clone)]
pub enum FieldDef {
    String(StringField),
    Number(NumberField),
    Integer(IntegerField),
    Boolean(BooleanField),
}

impl FieldDef {
    pub fn field_type(&self) -> FieldType {
        match self {
            FieldDef::String(_) => FieldType::String,
            FieldDef::Number(_) => FieldType::Number,
            FieldDef::Integer(_) => FieldType::Integer,
            FieldDef::Boolean(_) => FieldType::Boolean,
        }
    }

    /// Bounds that cannot be checked against (NaN, infinities) are schema bugs.
    pub(crate) fn ensure_valid(&self) -> Result<(), SieveError> {
        match self {
            FieldDef::Number(f) => f.bounds().ensure_finite(),
            FieldDef::Integer(f) => f.bounds().ensure_finite(),
            FieldDef::String(_) | FieldDef::Boolean(_) => Ok(()),
        }
    }
}

impl Clean for FieldDef {
    fn clean(&self, value: Option<&Value>) -> Result<Option<Value>, SieveError> {
        match self {
            FieldDef::String(f) => f.clean(value),
            FieldDef::Number(f) => f.clean(value),
            FieldDef::Integer(f) => f.clean(value),
            FieldDef::Boolean(f) => f.clean(value),
        }
    }
}

impl From<StringField> for FieldDef {
    fn from(f: StringField) -> Self {
        FieldDef::String(f)
    }
}

impl From<NumberField> for FieldDef {
    fn from(f: NumberField) -> Self {
        FieldDef::Number(f)
    }
}

impl From<IntegerField> for FieldDef {
    fn from(f: IntegerField) -> Self {
        FieldDef::Integer(f)
    }
}

impl From<BooleanField> for FieldDef {
    fn from(f: BooleanField) -> Self {
        FieldDef::Boolean(f)
    }
}

impl From<FieldType> for FieldDef {
    fn from(t: FieldType) -> Self {
        match t {
            FieldType::String => StringField::new().into(),
            FieldType::Number => NumberField::new().into(),
            FieldType::Integer => IntegerField::new().into(),
            FieldType::Boolean => BooleanField::new().into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Declarative (JSON) field definitions
// ---------------------------------------------------------------------------

/// Wire shape of a field definition, e.g.
/// `{"type": "number", "gt": 0, "lte": 1}`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct RawFieldDef {
    #[serde(rename = "type")]
    kind: String,
    #[serde(rename = "match")]
    pattern: Option<String>,
    omit_empty: Option<bool>,
    gt: Option<f64>,
    gte: Option<f64>,
    lt: Option<f64>,
    lte: Option<f64>,
}

impl RawFieldDef {
    fn bounds(&self) -> Bounds {
        Bounds {
            gt: self.gt,
            gte: self.gte,
            lt: self.lt,
            lte: self.lte,
        }
    }

    fn misplaced(&self, kind: FieldType) -> Option<&'static str> {
        let string_only = [
            ("match", self.pattern.is_some()),
            ("omitEmpty", self.omit_empty.is_some()),
        ];
        let numeric_only = [
            ("gt", self.gt.is_some()),
            ("gte", self.gte.is_some()),
            ("lt", self.lt.is_some()),
            ("lte", self.lte.is_some()),
        ];
        let forbidden: Vec<(&'static str, bool)> = match kind {
            FieldType::String => numeric_only.to_vec(),
            FieldType::Number | FieldType::Integer => string_only.to_vec(),
            FieldType::Boolean => string_only.iter().chain(&numeric_only).copied().collect(),
        };
        forbidden
            .into_iter()
            .find_map(|(name, set)| set.then_some(name))
    }
}

impl TryFrom<RawFieldDef> for FieldDef {
    type Error = SieveError;

    fn try_from(raw: RawFieldDef) -> Result<Self, Self::Error> {
        let kind: FieldType = raw.kind.parse()?;
        if let Some(name) = raw.misplaced(kind) {
            return Err(SieveError::schema(format!(
                "{} is not allowed on {} fields",
                name, kind
            )));
        }

        let def = match kind {
            FieldType::String => {
                let mut field = StringField::new();
                if let Some(source) = &raw.pattern {
                    field = field.pattern(source)?;
                }
                if raw.omit_empty == Some(true) {
                    field = field.omit_empty();
                }
                FieldDef::String(field)
            }
            FieldType::Number => {
                let b = raw.bounds();
                let field = apply(NumberField::new(), b.gt, NumberField::gt);
                let field = apply(field, b.gte, NumberField::gte);
                let field = apply(field, b.lt, NumberField::lt);
                FieldDef::Number(apply(field, b.lte, NumberField::lte))
            }
            FieldType::Integer => {
                let b = raw.bounds();
                let field = apply(IntegerField::new(), b.gt, IntegerField::gt);
                let field = apply(field, b.gte, IntegerField::gte);
                let field = apply(field, b.lt, IntegerField::lt);
                FieldDef::Integer(apply(field, b.lte, IntegerField::lte))
            }
            FieldType::Boolean => FieldDef::Boolean(BooleanField::new()),
        };
        Ok(def)
    }
}

fn apply<F>(field: F, bound: Option<f64>, set: fn(F, f64) -> F) -> F {
    match bound {
        Some(b) => set(field, b),
        None => field,
    }
}

/// Parse one declarative field definition.
pub fn field_from_value(value: &Value) -> Result<FieldDef, SieveError> {
    let raw = RawFieldDef::deserialize(value)
        .map_err(|e| SieveError::schema(format!("invalid field definition: {}", e)))?;
    FieldDef::try_from(raw)
}

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

/// An ordered mapping from field path to [`FieldDef`].
///
/// Paths are checked when the schema is compiled, not when they are added.
///
/// # Example
/// ```
/// use docsieve::Schema;
///
/// let schema = Schema::new()
///     .field("name", docsieve::string().omit_empty())
///     .field("items.qty", docsieve::integer().gte(1.0));
/// assert_eq!(schema.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<(String, FieldDef)>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field. Redefining an existing path replaces it in place.
    pub fn field(mut self, path: impl Into<String>, def: impl Into<FieldDef>) -> Self {
        self.insert(path, def);
        self
    }

    pub fn insert(&mut self, path: impl Into<String>, def: impl Into<FieldDef>) {
        let path = path.into();
        let def = def.into();
        match self.fields.iter_mut().find(|(p, _)| *p == path) {
            Some(slot) => slot.1 = def,
            None => self.fields.push((path, def)),
        }
    }

    pub fn get(&self, path: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|(p, _)| p == path).map(|(_, d)| d)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field paths in definition order.
    pub fn paths(&self) -> Vec<&str> {
        self.fields.iter().map(|(p, _)| p.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldDef)> {
        self.fields.iter().map(|(p, d)| (p.as_str(), d))
    }

    /// Build a schema from a JSON object of declarative field definitions.
    ///
    /// ```
    /// use docsieve::Schema;
    /// use serde_json::json;
    ///
    /// let schema = Schema::from_value(&json!({
    ///     "nonemptyString": {"type": "string", "match": "."},
    ///     "rangeNumber": {"type": "number", "gt": 0, "lte": 1},
    /// })).unwrap();
    /// assert_eq!(schema.paths(), ["nonemptyString", "rangeNumber"]);
    /// ```
    pub fn from_value(value: &Value) -> Result<Self, SieveError> {
        let obj = value.as_object().ok_or_else(|| {
            SieveError::schema(format!(
                "schema must be an object, received {}",
                crate::error::value_type_name(value)
            ))
        })?;

        let mut schema = Schema::new();
        for (path, def) in obj {
            let def = field_from_value(def)
                .map_err(|e| e.at(vec![PathSegment::Field(path.clone())]))?;
            schema.insert(path.clone(), def);
        }
        Ok(schema)
    }
}

impl<P: Into<String>, D: Into<FieldDef>> FromIterator<(P, D)> for Schema {
    fn from_iter<I: IntoIterator<Item = (P, D)>>(iter: I) -> Self {
        let mut schema = Schema::new();
        for (path, def) in iter {
            schema.insert(path, def);
        }
        schema
    }
}

impl<'a> IntoIterator for &'a Schema {
    type Item = (&'a str, &'a FieldDef);
    type IntoIter = Box<dyn Iterator<Item = (&'a str, &'a FieldDef)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}
