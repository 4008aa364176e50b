use serde_json::{Value, json};
use std::time::Duration;
use workflow_migrate::error::{CodecError, ConfigurationError};
use workflow_migrate::values::builtin::DurationCodec;
use workflow_migrate::values::{CodecRegistry, ValueCodec, ValueKind, VariableValue};

/// Codec that accepts everything and tags its output with its own name.
#[derive(Debug)]
struct TaggingCodec {
    name: &'static str,
    priority: i32,
}

impl ValueCodec for TaggingCodec {
    fn name(&self) -> &str {
        self.name
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn can_encode(&self, _value: &VariableValue, _kind: ValueKind) -> bool {
        true
    }

    fn can_decode(&self, _token: &Value, _kind: ValueKind) -> bool {
        true
    }

    fn decode(&self, _token: &Value, _kind: ValueKind) -> Result<VariableValue, CodecError> {
        Ok(VariableValue::Text(self.name.to_string()))
    }

    fn encode(&self, _value: &VariableValue, _kind: ValueKind) -> Result<Value, CodecError> {
        Ok(json!(self.name))
    }
}

#[test]
fn test_highest_priority_codec_is_selected() {
    let mut builder = CodecRegistry::builder();
    builder
        .register(Box::new(TaggingCodec { name: "low", priority: 5 }))
        .register(Box::new(TaggingCodec { name: "high", priority: 10 }));
    let registry = builder.build();

    for _ in 0..3 {
        assert_eq!(registry.select_encoder(&VariableValue::Null, ValueKind::Null).name(), "high");
        assert_eq!(registry.select_decoder(&json!(1), ValueKind::Any).name(), "high");
    }
    assert_eq!(registry.encode(&VariableValue::from("x")).unwrap(), json!("high"));
    assert_eq!(registry.names(), vec!["high", "low"]);
}

#[test]
fn test_priority_ties_resolve_by_registration_order() {
    let mut builder = CodecRegistry::builder();
    builder
        .register(Box::new(TaggingCodec { name: "first", priority: 1 }))
        .register(Box::new(TaggingCodec { name: "second", priority: 1 }));
    let registry = builder.build();

    assert_eq!(registry.select_decoder(&json!("x"), ValueKind::Any).name(), "first");
}

#[test]
fn test_default_codec_handles_unmatched_values() {
    let registry = CodecRegistry::default();
    assert!(registry.is_empty());

    let token = json!({ "nested": [1, 2, 3] });
    assert_eq!(registry.select_decoder(&token, ValueKind::Any).name(), "default");
    let decoded = registry.decode(&token, ValueKind::Any).unwrap();
    assert_eq!(decoded, VariableValue::Structured(token.clone()));
    assert_eq!(registry.encode(&decoded).unwrap(), token);

    assert_eq!(registry.decode(&json!("text"), ValueKind::Any).unwrap(), VariableValue::from("text"));
    assert_eq!(registry.decode(&json!(42), ValueKind::Any).unwrap(), VariableValue::from(42i64));
    assert_eq!(registry.decode(&Value::Null, ValueKind::Any).unwrap(), VariableValue::Null);
}

#[test]
fn test_predicates_gate_selection() {
    let registry = CodecRegistry::standard();

    let duration = VariableValue::Duration(Duration::from_secs(300));
    assert_eq!(registry.select_encoder(&duration, ValueKind::Duration).name(), "duration");
    assert_eq!(registry.select_encoder(&VariableValue::from(true), ValueKind::Bool).name(), "default");

    let typed = json!({ "$type": "Money", "amount": 5 });
    assert_eq!(registry.select_decoder(&typed, ValueKind::Any).name(), "typed");

    let span = json!({ "$type": "System.TimeSpan, System.Private.CoreLib", "value": "00:05:00" });
    assert_eq!(registry.select_decoder(&span, ValueKind::Any).name(), "duration");
    assert_eq!(registry.decode(&span, ValueKind::Any).unwrap(), duration);
}

#[test]
fn test_duration_codec_round_trip() {
    let registry = CodecRegistry::standard();
    let value = VariableValue::Duration(Duration::from_secs(90_061));

    let encoded = registry.encode(&value).unwrap();
    assert_eq!(encoded, json!({ "$type": "Duration", "value": "1.01:01:01" }));
    assert_eq!(registry.decode(&encoded, ValueKind::Any).unwrap(), value);
}

#[test]
fn test_duration_hint_decodes_plain_text() {
    let codec = DurationCodec;
    assert!(codec.can_decode(&json!("00:00:30"), ValueKind::Duration));
    assert!(!codec.can_decode(&json!("00:00:30"), ValueKind::Any));
    assert_eq!(
        codec.decode(&json!("00:00:30"), ValueKind::Duration).unwrap(),
        VariableValue::Duration(Duration::from_secs(30))
    );
}

#[test]
fn test_malformed_duration_is_a_codec_error() {
    let registry = CodecRegistry::standard();
    let token = json!({ "$type": "TimeSpan", "value": "soon" });
    assert_eq!(
        registry.decode(&token, ValueKind::Any).unwrap_err(),
        CodecError::InvalidDuration("soon".into())
    );
}

#[test]
fn test_oversized_duration_is_a_codec_error() {
    let registry = CodecRegistry::standard();
    let text = "1000000000000000000.00:00:00";
    let token = json!({ "$type": "TimeSpan", "value": text });
    assert_eq!(
        registry.decode(&token, ValueKind::Any).unwrap_err(),
        CodecError::InvalidDuration(text.into())
    );

    let max_seconds = json!({ "$type": "TimeSpan", "value": format!("{}.23:59:59", u64::MAX / 86_400) });
    assert!(registry.decode(&max_seconds, ValueKind::Any).is_err());
}

#[test]
fn test_registry_from_names() {
    let registry = CodecRegistry::from_names(&["typed", "duration"]).unwrap();
    assert_eq!(registry.names(), vec!["duration", "typed"]);

    let err = CodecRegistry::from_names(&["typed", "nodatime"]).unwrap_err();
    assert_eq!(err, ConfigurationError::UnknownCodec("nodatime".into()));
}

#[test]
fn test_failing_factory_is_a_configuration_error() {
    let mut builder = CodecRegistry::builder();
    let err = builder
        .register_with("broken", || Err("missing time zone database".to_string()))
        .unwrap_err();

    assert_eq!(
        err,
        ConfigurationError::CodecConstruction {
            name: "broken".into(),
            reason: "missing time zone database".into(),
        }
    );
    assert!(builder.build().is_empty());
}
