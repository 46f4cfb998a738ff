use regex_lite::Regex;
use serde_json::Value;

use super::{cannot_be, format_number, non_finite, Clean};
use crate::error::SieveError;

/// Definition of a `string` field. Created via [`docsieve::string()`](crate::string).
///
/// Strings pass through, finite numbers become their decimal form, booleans
/// become `"true"`/`"false"`, and an absent value becomes `""`.
///
/// # Example
/// ```
/// use docsieve::prelude::*;
/// use serde_json::json;
///
/// let name = docsieve::string().pattern("^[a-z]+$").unwrap();
/// assert_eq!(name.clean(Some(&json!("abc"))).unwrap(), Some(json!("abc")));
/// assert!(name.clean(Some(&json!("ABC"))).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct StringField {
    pattern: Option<Regex>,
    omit_empty: bool,
}

impl StringField {
    pub fn new() -> Self {
        Self::default()
    }

    /// The coerced string must match `re` (anywhere, unless anchored).
    pub fn matches(mut self, re: Regex) -> Self {
        self.pattern = Some(re);
        self
    }

    /// Compile `source` and require the coerced string to match it.
    pub fn pattern(self, source: &str) -> Result<Self, SieveError> {
        let re = Regex::new(source)
            .map_err(|e| SieveError::schema(format!("invalid pattern /{}/: {}", source, e)))?;
        Ok(self.matches(re))
    }

    /// Drop the field from the output when the coerced string is empty.
    pub fn omit_empty(mut self) -> Self {
        self.omit_empty = true;
        self
    }

    pub fn regex(&self) -> Option<&Regex> {
        self.pattern.as_ref()
    }

    pub fn omits_empty(&self) -> bool {
        self.omit_empty
    }

    /// Convert any input to a string, without running constraints.
    pub fn coerce(value: Option<&Value>) -> Result<String, SieveError> {
        let Some(value) = value else {
            return Ok(String::new());
        };
        match value {
            Value::String(s) => Ok(s.clone()),
            Value::Bool(b) => Ok(b.to_string()),
            Value::Number(n) => {
                if n.is_i64() || n.is_u64() {
                    return Ok(n.to_string());
                }
                match n.as_f64() {
                    Some(f) if f.is_finite() => Ok(format_number(f)),
                    _ => Err(non_finite(Some(value))),
                }
            }
            other => Err(cannot_be(other)),
        }
    }
}

impl Clean for StringField {
    fn clean(&self, value: Option<&Value>) -> Result<Option<Value>, SieveError> {
        let s = Self::coerce(value)?;

        if let Some(re) = &self.pattern {
            if !re.is_match(&s) {
                return Err(SieveError::validation(
                    format!("must match /{}/", re.as_str()),
                    value,
                ));
            }
        }

        if self.omit_empty && s.is_empty() {
            return Ok(None);
        }

        Ok(Some(Value::String(s)))
    }
}
