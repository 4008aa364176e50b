use serde_json::json;
use std::fs;
use std::path::Path;
use std::time::Duration;
use workflow_migrate::error::{CodecError, DecodeError};
use workflow_migrate::legacy::loader::{decode_legacy_document, decode_legacy_yaml, load_legacy_document};
use workflow_migrate::values::{CodecRegistry, VariableValue};

#[test]
fn test_load_json_fixture() {
    let registry = CodecRegistry::standard();
    let document = load_legacy_document(Path::new("fixtures/export.NightlyReport.0f9c2a.json"), &registry)
        .expect("Failed to load fixture");

    assert_eq!(document.id, "0f9c2a-old");
    assert_eq!(document.version, 3);
    assert_eq!(document.activities.len(), 6);
    assert_eq!(document.connections.len(), 5);
    assert!(document.is_singleton);
    assert!(!document.is_disabled);

    let start = document.start_activity().expect("Start activity missing");
    assert_eq!(start.id, "start-1");

    let mail = &document.activities[3];
    assert_eq!(mail.name(), Some("mail"));
    assert_eq!(mail.display_name.as_deref(), Some("Mail the report"));
    assert_eq!((mail.left, mail.top), (0, 320));
    let keys: Vec<&str> = mail.state.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["name", "to", "body", "retries"]);

    assert_eq!(
        document.variables["retryDelay"].value,
        VariableValue::Duration(Duration::from_secs(300))
    );
    assert_eq!(document.variables["region"].value, VariableValue::from("eu-west"));
    assert_eq!(
        document.variables["recipients"].value,
        VariableValue::Structured(json!(["ops@example.com", "sales@example.com"]))
    );
}

#[test]
fn test_load_yaml_fixture() {
    let registry = CodecRegistry::standard();
    let document = load_legacy_document(Path::new("fixtures/export.Onboarding.77be01.yaml"), &registry)
        .expect("Failed to load fixture");

    assert_eq!(document.name.as_deref(), Some("onboarding"));
    assert_eq!(document.activities.len(), 2);
    assert_eq!(document.activities[1].state["textExpression"]["syntax"], json!("Liquid"));
    assert!(document.variables.is_empty());
}

#[test]
fn test_missing_collections_default_to_empty() {
    let document = decode_legacy_document(r#"{ "id": "bare" }"#, &CodecRegistry::default()).unwrap();

    assert_eq!(document.id, "bare");
    assert!(document.activities.is_empty());
    assert!(document.connections.is_empty());
    assert!(document.variables.is_empty());
    assert_eq!(document.name, None);
}

#[test]
fn test_null_variables_are_accepted() {
    let document =
        decode_legacy_document(r#"{ "id": "x", "variables": null }"#, &CodecRegistry::default()).unwrap();
    assert!(document.variables.is_empty());
}

#[test]
fn test_null_activity_state_is_empty() {
    let raw = r#"{ "id": "x", "activities": [ { "id": "s", "type": "Start", "state": null } ] }"#;
    let document = decode_legacy_document(raw, &CodecRegistry::default()).unwrap();
    assert!(document.activities[0].state.is_empty());

    let yaml = "id: x\nactivities:\n  - id: s\n    type: Start\n    state:\n";
    let document = decode_legacy_yaml(yaml, &CodecRegistry::default()).unwrap();
    assert!(document.activities[0].state.is_empty());
}

#[test]
fn test_malformed_json_is_a_decode_error() {
    let err = decode_legacy_document("{ not json", &CodecRegistry::default()).unwrap_err();
    assert!(matches!(err, DecodeError::Json(_)));

    let err = decode_legacy_document(r#"{ "activities": 5 }"#, &CodecRegistry::default()).unwrap_err();
    assert!(matches!(err, DecodeError::Json(_)));
}

#[test]
fn test_bad_variable_value_names_the_variable() {
    let raw = r#"{ "id": "x", "variables": { "delay": { "value": { "$type": "TimeSpan", "value": "later" } } } }"#;
    let err = decode_legacy_document(raw, &CodecRegistry::standard()).unwrap_err();

    match err {
        DecodeError::Variable { name, source } => {
            assert_eq!(name, "delay");
            assert_eq!(source, CodecError::InvalidDuration("later".into()));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_missing_file_reports_path() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let missing = temp_dir.path().join("absent.json");

    let err = load_legacy_document(&missing, &CodecRegistry::default()).unwrap_err();
    assert!(format!("{:#}", err).contains("absent.json"));

    let broken = temp_dir.path().join("broken.json");
    fs::write(&broken, "\"just text\"").expect("Failed to write temp file");
    let err = load_legacy_document(&broken, &CodecRegistry::default()).unwrap_err();
    assert!(err.to_string().contains("broken.json"));
}
