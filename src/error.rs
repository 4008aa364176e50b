use crate::values::ValueKind;
use thiserror::Error;

/// Errors raised by a single value codec while converting a variable value.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CodecError {
    #[error("Codec '{codec}' cannot handle a value of kind {kind:?}")]
    Unsupported { codec: String, kind: ValueKind },

    #[error("Invalid time span '{0}'")]
    InvalidDuration(String),

    #[error("Malformed typed value: {0}")]
    MalformedEnvelope(String),
}

/// Errors raised while building a codec registry. These are fatal at startup.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("Unknown value codec '{0}'")]
    UnknownCodec(String),

    #[error("Value codec '{name}' could not be constructed: {reason}")]
    CodecConstruction { name: String, reason: String },
}

/// The input text is not a well-formed legacy document.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Failed to parse legacy document JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse legacy document YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Variable '{name}' could not be decoded: {source}")]
    Variable {
        name: String,
        #[source]
        source: CodecError,
    },
}

/// The legacy document cannot be transformed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    #[error("Workflow '{workflow_id}' has no activity of type 'Start'")]
    MissingStartActivity { workflow_id: String },
}

/// The target document cannot be written out.
#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("Failed to serialize target document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Variable '{name}' could not be encoded: {source}")]
    Variable {
        name: String,
        #[source]
        source: CodecError,
    },
}
