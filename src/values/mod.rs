pub mod builtin;
pub mod registry;

use crate::error::{CodecError, DecodeError, EncodeError};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::time::Duration;

pub use registry::{CodecRegistry, CodecRegistryBuilder};

/// Runtime value of a workflow variable.
///
/// Persisted documents carry no static type for these, so every read and
/// write goes through a [`CodecRegistry`].
#[derive(Debug, Clone, PartialEq, Default)]
pub enum VariableValue {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    Text(String),
    Duration(Duration),
    /// Arrays and objects with no type tag.
    Structured(Value),
    /// A value whose persisted form named its own type (`$type`).
    Typed { type_name: String, payload: Value },
}

/// Type hint handed to codecs. `Any` means the caller has no expectation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Any,
    Null,
    Bool,
    Number,
    Text,
    Duration,
    Structured,
    Typed,
}

impl VariableValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            VariableValue::Null => ValueKind::Null,
            VariableValue::Bool(_) => ValueKind::Bool,
            VariableValue::Number(_) => ValueKind::Number,
            VariableValue::Text(_) => ValueKind::Text,
            VariableValue::Duration(_) => ValueKind::Duration,
            VariableValue::Structured(_) => ValueKind::Structured,
            VariableValue::Typed { .. } => ValueKind::Typed,
        }
    }
}

impl From<&str> for VariableValue {
    fn from(value: &str) -> Self {
        VariableValue::Text(value.to_string())
    }
}

impl From<bool> for VariableValue {
    fn from(value: bool) -> Self {
        VariableValue::Bool(value)
    }
}

impl From<i64> for VariableValue {
    fn from(value: i64) -> Self {
        VariableValue::Number(value.into())
    }
}

/// Encoder/decoder strategy for variable values.
///
/// The registry asks every codec, highest priority first, whether it accepts
/// a value (`can_encode`) or a persisted token (`can_decode`) and hands the
/// work to the first one that does.
pub trait ValueCodec: Send + Sync + Debug {
    fn name(&self) -> &str;
    fn priority(&self) -> i32;
    fn can_encode(&self, value: &VariableValue, kind: ValueKind) -> bool;
    fn can_decode(&self, token: &Value, kind: ValueKind) -> bool;
    fn decode(&self, token: &Value, kind: ValueKind) -> Result<VariableValue, CodecError>;
    fn encode(&self, value: &VariableValue, kind: ValueKind) -> Result<Value, CodecError>;
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Variable {
    pub value: VariableValue,
    pub syntax: Option<String>,
    pub expression: Option<String>,
}

impl Variable {
    pub fn new(value: impl Into<VariableValue>) -> Self {
        Self {
            value: value.into(),
            syntax: None,
            expression: None,
        }
    }
}

pub type Variables = BTreeMap<String, Variable>;

/// Persisted shape of a variable, before its value has been through a codec.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawVariable {
    #[serde(default)]
    pub value: Value,
    #[serde(default)]
    pub syntax: Option<String>,
    #[serde(default)]
    pub expression: Option<String>,
}

pub(crate) fn decode_variables(
    raw: BTreeMap<String, RawVariable>,
    registry: &CodecRegistry,
) -> Result<Variables, DecodeError> {
    let mut variables = Variables::new();
    for (name, variable) in raw {
        let value = registry
            .decode(&variable.value, ValueKind::Any)
            .map_err(|source| DecodeError::Variable {
                name: name.clone(),
                source,
            })?;
        variables.insert(
            name,
            Variable {
                value,
                syntax: variable.syntax,
                expression: variable.expression,
            },
        );
    }
    Ok(variables)
}

pub(crate) fn encode_variables(
    variables: &Variables,
    registry: &CodecRegistry,
) -> Result<BTreeMap<String, RawVariable>, EncodeError> {
    let mut raw = BTreeMap::new();
    for (name, variable) in variables {
        let value = registry
            .encode(&variable.value)
            .map_err(|source| EncodeError::Variable {
                name: name.clone(),
                source,
            })?;
        raw.insert(
            name.clone(),
            RawVariable {
                value,
                syntax: variable.syntax.clone(),
                expression: variable.expression.clone(),
            },
        );
    }
    Ok(raw)
}
