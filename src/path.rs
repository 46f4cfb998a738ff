use std::fmt;

use crate::error::{PathSegment, SieveError};

/// A parsed schema key: `prop` or `prop.subprop`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    pub prop: String,
    /// Set when the path addresses a field inside every element of the
    /// array-of-objects field `prop`.
    pub subprop: Option<String>,
}

/// `[A-Za-z0-9_]+`
fn is_word(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

impl FieldPath {
    /// Parse a field path, rejecting anything but `word` or `word.word`.
    ///
    /// ```
    /// use docsieve::FieldPath;
    ///
    /// let path = FieldPath::parse("items.qty").unwrap();
    /// assert_eq!(path.prop, "items");
    /// assert_eq!(path.subprop.as_deref(), Some("qty"));
    /// assert!(FieldPath::parse("a.b.c").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, SieveError> {
        let invalid = || SieveError::schema(format!("invalid property name: {}", raw));
        let (prop, subprop) = match raw.split_once('.') {
            Some((prop, sub)) => (prop, Some(sub)),
            None => (raw, None),
        };
        if !is_word(prop) || !subprop.map_or(true, is_word) {
            return Err(invalid());
        }
        Ok(Self {
            prop: prop.to_string(),
            subprop: subprop.map(str::to_string),
        })
    }

    /// Error path for this field; `index` is the array element for subfields.
    pub(crate) fn segments(&self, index: Option<usize>) -> Vec<PathSegment> {
        let mut path = vec![PathSegment::Field(self.prop.clone())];
        if let Some(sub) = &self.subprop {
            if let Some(i) = index {
                path.push(PathSegment::Index(i));
            }
            path.push(PathSegment::Field(sub.clone()));
        }
        path
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.subprop {
            Some(sub) => write!(f, "{}.{}", self.prop, sub),
            None => write!(f, "{}", self.prop),
        }
    }
}
