//! Working copy construction and whitelist bookkeeping.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::error::{PathSegment, SieveError};

/// Keys seen in the input that no schema field has claimed yet.
///
/// Remembers first-seen order so leftovers are reported the way they
/// appear in the document.
#[derive(Debug, Default)]
pub(crate) struct RemainingKeys {
    seen: HashMap<String, usize>,
}

impl RemainingKeys {
    pub(crate) fn insert(&mut self, key: String) {
        let next = self.seen.len();
        self.seen.entry(key).or_insert(next);
    }

    /// Exact-match removal: claiming `ar.x` leaves `ar` alone and vice versa.
    pub(crate) fn claim(&mut self, path: &str) {
        self.seen.remove(path);
    }

    pub(crate) fn into_leftovers(self) -> Vec<String> {
        let mut left: Vec<(String, usize)> = self.seen.into_iter().collect();
        left.sort_by_key(|(_, order)| *order);
        left.into_iter().map(|(key, _)| key).collect()
    }
}

/// Build the working copy of `doc` and seed the remaining-keys set.
///
/// Array values are split into per-element shallow copies: object elements
/// keep their own keys (each recorded as `key.subkey`), anything else
/// becomes `null` and records nothing. Other values are copied as-is and
/// recorded under their own key.
pub(crate) fn flatten(doc: &Map<String, Value>) -> (Map<String, Value>, RemainingKeys) {
    let mut copy = Map::with_capacity(doc.len());
    let mut remaining = RemainingKeys::default();

    for (key, value) in doc {
        match value {
            Value::Array(items) => {
                let elements = items
                    .iter()
                    .map(|item| match item {
                        Value::Object(sub) => {
                            for subkey in sub.keys() {
                                remaining.insert(format!("{}.{}", key, subkey));
                            }
                            Value::Object(sub.clone())
                        }
                        _ => Value::Null,
                    })
                    .collect();
                copy.insert(key.clone(), Value::Array(elements));
            }
            other => {
                copy.insert(key.clone(), other.clone());
                remaining.insert(key.clone());
            }
        }
    }

    (copy, remaining)
}

/// Locate the array holding the elements of an array-of-objects field,
/// creating it empty when the document did not carry it.
pub(crate) fn array_slots<'a>(
    copy: &'a mut Map<String, Value>,
    prop: &str,
) -> Result<&'a mut Vec<Value>, SieveError> {
    let slot = copy
        .entry(prop.to_string())
        .or_insert_with(|| Value::Array(vec![]));
    match slot {
        Value::Array(items) => Ok(items),
        other => Err(SieveError::schema_mismatch(
            "must be an array of objects",
            other,
        )
        .at(vec![PathSegment::Field(prop.to_string())])),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("fixture must be an object"),
        }
    }

    #[test]
    fn flatten_records_scalars_and_subkeys() {
        let doc = object(json!({"a": 1, "ar": [{"x": 1, "y": 2}, {"x": 3}]}));
        let (copy, remaining) = flatten(&doc);
        assert_eq!(Value::Object(copy), json!({"a": 1, "ar": [{"x": 1, "y": 2}, {"x": 3}]}));
        assert_eq!(remaining.into_leftovers(), ["a", "ar.x", "ar.y"]);
    }

    #[test]
    fn flatten_nulls_non_object_elements() {
        let doc = object(json!({"ar": [1, null, "s", [1], {"k": true}]}));
        let (copy, remaining) = flatten(&doc);
        assert_eq!(copy["ar"], json!([null, null, null, null, {"k": true}]));
        assert_eq!(remaining.into_leftovers(), ["ar.k"]);
    }

    #[test]
    fn claim_is_exact_match() {
        let doc = object(json!({"ar": [{"x": 1}], "b": 2}));
        let (_, mut remaining) = flatten(&doc);
        remaining.claim("ar");
        remaining.claim("b.x");
        assert_eq!(remaining.into_leftovers(), ["ar.x", "b"]);
    }

    #[test]
    fn array_slots_creates_missing_array() {
        let mut copy = Map::new();
        assert!(array_slots(&mut copy, "items").unwrap().is_empty());
        assert_eq!(copy["items"], json!([]));
    }

    #[test]
    fn array_slots_rejects_scalars() {
        let mut copy = object(json!({"items": "nope"}));
        let err = array_slots(&mut copy, "items").unwrap_err();
        assert_eq!(err.to_string(), "items must be an array of objects");
    }
}
