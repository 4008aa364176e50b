use crate::error::{CodecError, ConfigurationError};
use crate::values::{ValueCodec, ValueKind, VariableValue};
use serde_json::{Map, Value};
use std::time::Duration;

/// Field that carries the type name of a self-describing value.
pub const TYPE_TAG: &str = "$type";

const DURATION_TYPE_NAMES: &[&str] = &["Duration", "TimeSpan", "System.TimeSpan", "NodaTime.Duration"];

pub fn codec_by_name(name: &str) -> Result<Box<dyn ValueCodec>, ConfigurationError> {
    match name {
        "typed" => Ok(Box::new(TypedCodec)),
        "duration" => Ok(Box::new(DurationCodec)),
        other => Err(ConfigurationError::UnknownCodec(other.to_string())),
    }
}

/// Structural fallback: JSON in, JSON out, no type-specific behavior.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultCodec;

impl ValueCodec for DefaultCodec {
    fn name(&self) -> &str {
        "default"
    }

    fn priority(&self) -> i32 {
        i32::MIN
    }

    fn can_encode(&self, _value: &VariableValue, _kind: ValueKind) -> bool {
        true
    }

    fn can_decode(&self, _token: &Value, _kind: ValueKind) -> bool {
        true
    }

    fn decode(&self, token: &Value, _kind: ValueKind) -> Result<VariableValue, CodecError> {
        Ok(match token {
            Value::Null => VariableValue::Null,
            Value::Bool(b) => VariableValue::Bool(*b),
            Value::Number(n) => VariableValue::Number(n.clone()),
            Value::String(s) => VariableValue::Text(s.clone()),
            Value::Array(_) | Value::Object(_) => VariableValue::Structured(token.clone()),
        })
    }

    fn encode(&self, value: &VariableValue, _kind: ValueKind) -> Result<Value, CodecError> {
        Ok(match value {
            VariableValue::Null => Value::Null,
            VariableValue::Bool(b) => Value::Bool(*b),
            VariableValue::Number(n) => Value::Number(n.clone()),
            VariableValue::Text(s) => Value::String(s.clone()),
            VariableValue::Duration(d) => Value::String(format_time_span(*d)),
            VariableValue::Structured(v) => v.clone(),
            VariableValue::Typed { type_name, payload } => typed_envelope(type_name, payload),
        })
    }
}

/// Values persisted with a `$type` tag.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypedCodec;

impl ValueCodec for TypedCodec {
    fn name(&self) -> &str {
        "typed"
    }

    fn priority(&self) -> i32 {
        0
    }

    fn can_encode(&self, value: &VariableValue, _kind: ValueKind) -> bool {
        matches!(value, VariableValue::Typed { .. })
    }

    fn can_decode(&self, token: &Value, _kind: ValueKind) -> bool {
        type_tag(token).is_some()
    }

    fn decode(&self, token: &Value, _kind: ValueKind) -> Result<VariableValue, CodecError> {
        let obj = token
            .as_object()
            .ok_or_else(|| CodecError::MalformedEnvelope(token.to_string()))?;
        let type_name = type_tag(token)
            .ok_or_else(|| CodecError::MalformedEnvelope(token.to_string()))?
            .to_string();

        Ok(VariableValue::Typed {
            type_name,
            payload: envelope_payload(obj),
        })
    }

    fn encode(&self, value: &VariableValue, kind: ValueKind) -> Result<Value, CodecError> {
        match value {
            VariableValue::Typed { type_name, payload } => Ok(typed_envelope(type_name, payload)),
            _ => Err(CodecError::Unsupported {
                codec: self.name().to_string(),
                kind,
            }),
        }
    }
}

/// Time spans, persisted as `{"$type": "Duration", "value": "[d.]hh:mm:ss[.fffffff]"}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DurationCodec;

impl ValueCodec for DurationCodec {
    fn name(&self) -> &str {
        "duration"
    }

    fn priority(&self) -> i32 {
        10
    }

    fn can_encode(&self, value: &VariableValue, _kind: ValueKind) -> bool {
        matches!(value, VariableValue::Duration(_))
    }

    fn can_decode(&self, token: &Value, kind: ValueKind) -> bool {
        if kind == ValueKind::Duration && token.is_string() {
            return true;
        }
        let is_duration_tag = type_tag(token)
            .map(|tag| DURATION_TYPE_NAMES.contains(&short_type_name(tag)))
            .unwrap_or(false);
        is_duration_tag && token.get("value").is_some_and(Value::is_string)
    }

    fn decode(&self, token: &Value, _kind: ValueKind) -> Result<VariableValue, CodecError> {
        let text = match token {
            Value::String(s) => s.as_str(),
            _ => token
                .get("value")
                .and_then(Value::as_str)
                .ok_or_else(|| CodecError::InvalidDuration(token.to_string()))?,
        };
        parse_time_span(text).map(VariableValue::Duration)
    }

    fn encode(&self, value: &VariableValue, kind: ValueKind) -> Result<Value, CodecError> {
        match value {
            VariableValue::Duration(d) => {
                let mut obj = Map::new();
                obj.insert(TYPE_TAG.to_string(), Value::String("Duration".to_string()));
                obj.insert("value".to_string(), Value::String(format_time_span(*d)));
                Ok(Value::Object(obj))
            }
            _ => Err(CodecError::Unsupported {
                codec: self.name().to_string(),
                kind,
            }),
        }
    }
}

fn type_tag(token: &Value) -> Option<&str> {
    token.get(TYPE_TAG).and_then(Value::as_str)
}

/// `"System.TimeSpan, System.Private.CoreLib"` -> `"System.TimeSpan"`
fn short_type_name(tag: &str) -> &str {
    tag.split(',').next().unwrap_or(tag).trim()
}

fn envelope_payload(obj: &Map<String, Value>) -> Value {
    if obj.len() == 2 {
        if let Some(value) = obj.get("value") {
            if !value.is_object() {
                return value.clone();
            }
        }
    }
    let rest: Map<String, Value> = obj
        .iter()
        .filter(|(key, _)| key.as_str() != TYPE_TAG)
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    Value::Object(rest)
}

/// Object payloads carry the tag inline, anything else is wrapped under `value`.
fn typed_envelope(type_name: &str, payload: &Value) -> Value {
    let mut obj = Map::new();
    obj.insert(TYPE_TAG.to_string(), Value::String(type_name.to_string()));
    match payload {
        Value::Object(fields) => {
            for (key, value) in fields {
                obj.insert(key.clone(), value.clone());
            }
        }
        other => {
            obj.insert("value".to_string(), other.clone());
        }
    }
    Value::Object(obj)
}

pub fn format_time_span(duration: Duration) -> String {
    let total = duration.as_secs();
    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;
    let seconds = total % 60;
    let ticks = duration.subsec_nanos() / 100;

    let mut out = if days > 0 {
        format!("{days}.{hours:02}:{minutes:02}:{seconds:02}")
    } else {
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    };
    if ticks > 0 {
        out.push_str(&format!(".{ticks:07}"));
    }
    out
}

pub fn parse_time_span(text: &str) -> Result<Duration, CodecError> {
    let invalid = || CodecError::InvalidDuration(text.to_string());
    let number = |part: &str| -> Result<u64, CodecError> {
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        part.parse().map_err(|_| invalid())
    };

    let parts: Vec<&str> = text.trim().split(':').collect();
    let [head, minutes, seconds] = parts[..] else {
        return Err(invalid());
    };

    let (days, hours) = match head.split_once('.') {
        Some((days, hours)) => (number(days)?, number(hours)?),
        None => (0, number(head)?),
    };
    let minutes = number(minutes)?;
    let (seconds, fraction) = match seconds.split_once('.') {
        Some((seconds, fraction)) => (number(seconds)?, Some(fraction)),
        None => (number(seconds)?, None),
    };
    if hours > 23 || minutes > 59 || seconds > 59 {
        return Err(invalid());
    }

    let nanos = match fraction {
        Some(digits) if digits.len() <= 7 => {
            let ticks = number(digits)? as u32;
            ticks * 10u32.pow(7 - digits.len() as u32) * 100
        }
        Some(_) => return Err(invalid()),
        None => 0,
    };

    let total = days
        .checked_mul(86_400)
        .and_then(|secs| secs.checked_add(hours * 3_600 + minutes * 60 + seconds))
        .ok_or_else(invalid)?;
    Ok(Duration::new(total, nanos))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn time_span_text_round_trips() {
        for text in ["00:00:05", "01:30:00", "2.03:04:05", "00:00:01.5000000"] {
            let parsed = parse_time_span(text).unwrap();
            assert_eq!(format_time_span(parsed), text);
        }
        assert_eq!(parse_time_span("00:00:01.5").unwrap(), Duration::from_millis(1500));
    }

    #[test]
    fn time_span_rejects_garbage() {
        for text in ["", "5", "00:61:00", "aa:bb:cc", "00:00:00.12345678", "-01:00:00"] {
            assert!(parse_time_span(text).is_err(), "{text} should be rejected");
        }
    }

    #[test]
    fn time_span_day_counts_at_the_limit() {
        let max_days = u64::MAX / 86_400;
        let largest = format!("{max_days}.00:00:00");
        assert_eq!(parse_time_span(&largest).unwrap(), Duration::from_secs(max_days * 86_400));

        for text in [
            "1000000000000000000.00:00:00".to_string(),
            format!("{}.00:00:00", max_days + 1),
            format!("{max_days}.23:59:59"),
            format!("{}.00:00:00", u64::MAX),
            "99999999999999999999.00:00:00".to_string(),
        ] {
            assert_eq!(
                parse_time_span(&text).unwrap_err(),
                CodecError::InvalidDuration(text.clone())
            );
        }
    }

    #[test]
    fn typed_payload_prefers_value_field_for_scalars() {
        let token = json!({ "$type": "Money", "value": 12 });
        let decoded = TypedCodec.decode(&token, ValueKind::Any).unwrap();
        assert_eq!(
            decoded,
            VariableValue::Typed { type_name: "Money".into(), payload: json!(12) }
        );
        assert_eq!(TypedCodec.encode(&decoded, ValueKind::Typed).unwrap(), token);
    }

    #[test]
    fn typed_payload_keeps_inline_fields() {
        let token = json!({ "$type": "Address", "city": "Oslo", "zip": "0150" });
        let decoded = TypedCodec.decode(&token, ValueKind::Any).unwrap();
        assert_eq!(
            decoded,
            VariableValue::Typed {
                type_name: "Address".into(),
                payload: json!({ "city": "Oslo", "zip": "0150" }),
            }
        );
        assert_eq!(TypedCodec.encode(&decoded, ValueKind::Typed).unwrap(), token);
    }

    #[test]
    fn unknown_codec_name_is_a_configuration_error() {
        assert_eq!(
            codec_by_name("noda").unwrap_err(),
            ConfigurationError::UnknownCodec("noda".into())
        );
    }
}
