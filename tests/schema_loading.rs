use docsieve::prelude::*;
use serde_json::{json, Value};

const BASIC: &str = r#"{
    "anyString": {"type": "string"},
    "nonemptyString": {"type": "string", "match": "."},
    "anyNumber": {"type": "number"},
    "rangeNumber": {"type": "number", "gt": 0, "lte": 1},
    "ar.x": {"type": "integer"},
    "omitEmptyString": {"type": "string", "omitEmpty": true}
}"#;

#[test]
fn loads_schema_from_json_text() {
    let v = docsieve::compile_from(BASIC).unwrap();
    let out = v
        .validate(&json!({"nonemptyString": "a", "rangeNumber": 0.5}))
        .unwrap();
    assert_eq!(
        Value::Object(out),
        json!({
            "nonemptyString": "a",
            "rangeNumber": 0.5,
            "anyString": "",
            "anyNumber": 0,
            "ar": [],
        })
    );
}

#[test]
fn json_schema_keeps_declaration_order() {
    let schema = BASIC.to_schema().unwrap();
    assert_eq!(
        schema.paths(),
        [
            "anyString",
            "nonemptyString",
            "anyNumber",
            "rangeNumber",
            "ar.x",
            "omitEmptyString"
        ]
    );
}

#[test]
fn loads_schema_from_bytes_and_value() {
    let from_bytes = BASIC.as_bytes().to_schema().unwrap();
    let from_value = serde_json::from_str::<Value>(BASIC)
        .unwrap()
        .to_schema()
        .unwrap();
    assert_eq!(from_bytes.paths(), from_value.paths());
    assert_eq!(
        from_value.get("rangeNumber").unwrap().field_type(),
        FieldType::Number
    );
}

#[test]
fn loads_schema_from_file() {
    let path = std::env::temp_dir().join(format!("docsieve-schema-{}.json", std::process::id()));
    std::fs::write(&path, BASIC).unwrap();
    let schema = path.to_schema();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(schema.unwrap().len(), 6);
}

#[test]
fn missing_file_is_schema_error() {
    let path = std::path::Path::new("/definitely/not/here/schema.json");
    let err = path.to_schema().unwrap_err();
    assert!(err.is_schema_error());
    assert!(err.message.starts_with("failed to read schema file"));
}

#[test]
fn malformed_json_is_schema_error() {
    let err = "{not json".to_schema().unwrap_err();
    assert!(err.is_schema_error());
    assert!(err.message.starts_with("invalid schema JSON"));
}

#[test]
fn schema_must_be_an_object() {
    let err = json!(["a"]).to_schema().unwrap_err();
    assert_eq!(err.message, "schema must be an object, received array");
}

#[test]
fn unknown_type_names_the_field() {
    let err = r#"{"when": {"type": "date"}}"#.to_schema().unwrap_err();
    assert!(err.is_schema_error());
    assert_eq!(err.to_string(), "when unknown field type: date");
}

#[test]
fn misplaced_constraint_names_the_field() {
    let err = r#"{"flag": {"type": "boolean", "gt": 1}}"#
        .to_schema()
        .unwrap_err();
    assert_eq!(err.to_string(), "flag gt is not allowed on boolean fields");
}

#[test]
fn bad_pattern_is_schema_error() {
    let err = r#"{"s": {"type": "string", "match": "[a-"}}"#
        .to_schema()
        .unwrap_err();
    assert!(err.is_schema_error());
    assert!(err.message.starts_with("invalid pattern /[a-/"));
}

#[test]
fn omit_empty_false_is_accepted() {
    let v = docsieve::compile_from(r#"{"s": {"type": "string", "omitEmpty": false}}"#).unwrap();
    assert_eq!(v.validate(&json!({})).unwrap()["s"], json!(""));
}

// === Eager compilation ===

#[test]
fn invalid_paths_fail_at_compile_time() {
    for raw in ["a.b.c", "a-b", "", "x.", ".y", "sp ace"] {
        let err = docsieve::compile(Schema::new().field(raw, docsieve::string())).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Schema, "{raw}");
        assert_eq!(err.to_string(), format!("invalid property name: {raw}"));
    }
}

#[test]
fn invalid_path_in_json_fails_at_compile_time() {
    let err = docsieve::compile_from(r#"{"a.b.c": {"type": "string"}}"#).unwrap_err();
    assert_eq!(err.to_string(), "invalid property name: a.b.c");
}

#[test]
fn non_finite_bounds_fail_at_compile_time() {
    let err = docsieve::compile(Schema::new().field("n", docsieve::number().gt(f64::NAN)))
        .unwrap_err();
    assert!(err.is_schema_error());
    assert_eq!(err.to_string(), "n gt bound must be a finite number, got NaN");

    let err = docsieve::compile(Schema::new().field("i", docsieve::integer().lte(f64::INFINITY)))
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "i lte bound must be a finite number, got Infinity"
    );
}

#[test]
fn builder_and_json_schemas_agree() {
    let built = docsieve::compile(docsieve::schema! {
        "anyString" => docsieve::string(),
        "nonemptyString" => docsieve::string().pattern(".").unwrap(),
        "anyNumber" => docsieve::number(),
        "rangeNumber" => docsieve::number().gt(0.0).lte(1.0),
        "ar.x" => docsieve::integer(),
        "omitEmptyString" => docsieve::string().omit_empty(),
    })
    .unwrap();
    let loaded = docsieve::compile_from(BASIC).unwrap();

    for doc in [
        json!({"nonemptyString": "a", "rangeNumber": 0.5}),
        json!({"nonemptyString": "", "rangeNumber": 0.5}),
        json!({"nonemptyString": "a", "rangeNumber": 0}),
        json!({"nonemptyString": "a", "rangeNumber": 0.5, "oddProp": 1}),
        json!({"nonemptyString": "a", "rangeNumber": 0.5, "ar": [{"x": "4.5"}]}),
    ] {
        assert_eq!(built.validate(&doc), loaded.validate(&doc), "{doc}");
    }
}

#[test]
fn field_type_parses_names() {
    assert_eq!("integer".parse::<FieldType>().unwrap(), FieldType::Integer);
    assert!("float".parse::<FieldType>().unwrap_err().is_schema_error());
    assert_eq!(FieldType::Boolean.to_string(), "boolean");
}

#[test]
fn schema_collects_from_pairs() {
    let schema: Schema = [("a", FieldType::String), ("b.c", FieldType::Integer)]
        .into_iter()
        .collect();
    assert_eq!(schema.paths(), ["a", "b.c"]);
    assert!(docsieve::compile(schema).is_ok());
}

#[test]
fn json_string_field_exposes_its_constraints() {
    let schema = r#"{
        "code": {"type": "string", "match": "^[A-Z]{3}$", "omitEmpty": true},
        "note": {"type": "string"}
    }"#
    .to_schema()
    .unwrap();

    let Some(FieldDef::String(code)) = schema.get("code") else {
        panic!("code should be a string field");
    };
    assert_eq!(code.regex().map(|re| re.as_str()), Some("^[A-Z]{3}$"));
    assert!(code.omits_empty());

    let Some(FieldDef::String(note)) = schema.get("note") else {
        panic!("note should be a string field");
    };
    assert!(note.regex().is_none());
    assert!(!note.omits_empty());
}

#[test]
fn schema_iterates_by_reference_in_order() {
    let schema = BASIC.to_schema().unwrap();
    let mut seen = Vec::new();
    for (path, def) in &schema {
        seen.push((path.to_string(), def.field_type()));
    }
    assert_eq!(seen.len(), schema.len());
    assert_eq!(seen[0].0, schema.paths()[0]);
    assert!(seen.contains(&("ar.x".to_string(), FieldType::Integer)));
}
