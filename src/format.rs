use crate::error::{format_value_short, ErrorKind, SieveError};

/// Format a [`SieveError`] into a human-readable report.
///
/// # Example output
/// ```text
/// ✖ must be greater than 0
///   → at rangeNumber, received 0
/// ```
///
/// ```
/// use docsieve::format::prettify_error;
/// use serde_json::json;
///
/// let v = docsieve::compile(docsieve::schema! { "n" => docsieve::number().gt(0.0) }).unwrap();
/// let err = v.validate(&json!({"n": 0})).unwrap_err();
/// assert_eq!(prettify_error(&err), "✖ must be greater than 0\n  → at n, received 0");
/// ```
pub fn prettify_error(error: &SieveError) -> String {
    let mut lines = vec![format!("✖ {}", error.message)];

    let mut parts = Vec::new();
    if !error.path.is_empty() {
        parts.push(format!("at {}", error.path_string()));
    }
    if let Some(val) = &error.received {
        parts.push(format!("received {}", format_value_short(val)));
    }
    if let ErrorKind::UnexpectedProperty { keys } = &error.kind {
        for key in keys {
            lines.push(format!("  → {}", key));
        }
    } else if !parts.is_empty() {
        lines.push(format!("  → {}", parts.join(", ")));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn lists_each_unexpected_key() {
        let err = SieveError::unexpected(vec!["b".into(), "ar.z".into()]);
        assert_eq!(
            prettify_error(&err),
            "✖ unexpected properties: b, ar.z\n  → b\n  → ar.z"
        );
    }

    #[test]
    fn pathless_error_is_a_single_line() {
        let err = SieveError::invalid_type("document cannot be array", Some(&json!([])));
        assert_eq!(
            prettify_error(&err),
            "✖ document cannot be array\n  → received Array(len=0)"
        );
    }
}
