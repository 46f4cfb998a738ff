/// Build a [`Schema`](crate::Schema) from `path => definition` pairs.
///
/// Definitions are anything convertible into a [`FieldDef`](crate::FieldDef):
/// the builders from [`docsieve::string()`](crate::string) and friends, or a
/// bare [`FieldType`](crate::FieldType).
///
/// # Example
///
/// ```
/// use docsieve::FieldType;
///
/// let schema = docsieve::schema! {
///     "anyString" => FieldType::String,
///     "rangeNumber" => docsieve::number().gt(0.0).lte(1.0),
///     "ar.x" => docsieve::integer(),
///     "omitEmptyString" => docsieve::string().omit_empty(),
/// };
///
/// let validator = docsieve::compile(schema).unwrap();
/// let clean = validator
///     .validate(&serde_json::json!({"rangeNumber": 0.5}))
///     .unwrap();
/// assert_eq!(clean["anyString"], "");
/// assert_eq!(clean["ar"], serde_json::json!([]));
/// assert!(clean.get("omitEmptyString").is_none());
/// ```
#[macro_export]
macro_rules! schema {
    ($($path:expr => $def:expr),* $(,)?) => {{
        let schema = $crate::Schema::new();
        $( let schema = schema.field($path, $def); )*
        schema
    }};
}
