use crate::error::DecodeError;
use crate::legacy::{LegacyActivity, LegacyConnection, LegacyDocument};
use crate::values::{CodecRegistry, RawVariable, decode_variables};
use anyhow::{Context as AnyhowContext, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Wire shape of a legacy document; variable values are still raw JSON here.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLegacyDocument {
    #[serde(default)]
    id: String,
    #[serde(default)]
    definition_id: String,
    #[serde(default)]
    version: i32,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    activities: Vec<LegacyActivity>,
    #[serde(default)]
    connections: Vec<LegacyConnection>,
    #[serde(default)]
    variables: Option<BTreeMap<String, RawVariable>>,
    #[serde(default)]
    is_singleton: bool,
    #[serde(default)]
    is_disabled: bool,
    #[serde(default)]
    is_published: bool,
    #[serde(default)]
    is_latest: bool,
}

impl RawLegacyDocument {
    fn resolve(self, registry: &CodecRegistry) -> Result<LegacyDocument, DecodeError> {
        let variables = decode_variables(self.variables.unwrap_or_default(), registry)?;
        Ok(LegacyDocument {
            id: self.id,
            definition_id: self.definition_id,
            version: self.version,
            name: self.name,
            description: self.description,
            activities: self.activities,
            connections: self.connections,
            variables,
            is_singleton: self.is_singleton,
            is_disabled: self.is_disabled,
            is_published: self.is_published,
            is_latest: self.is_latest,
        })
    }
}

pub fn decode_legacy_document(raw: &str, registry: &CodecRegistry) -> Result<LegacyDocument, DecodeError> {
    let document: RawLegacyDocument = serde_json::from_str(raw)?;
    document.resolve(registry)
}

pub fn decode_legacy_yaml(raw: &str, registry: &CodecRegistry) -> Result<LegacyDocument, DecodeError> {
    let document: RawLegacyDocument = serde_yaml::from_str(raw)?;
    document.resolve(registry)
}

/// Reads and decodes a legacy document, choosing YAML for `.yaml`/`.yml` files
/// and JSON for everything else.
pub fn load_legacy_document(file_path: &Path, registry: &CodecRegistry) -> Result<LegacyDocument> {
    let content = fs::read_to_string(file_path)
        .with_context(|| format!("Failed to read legacy document from {}", file_path.display()))?;

    let document = if is_yaml(file_path) {
        decode_legacy_yaml(&content, registry)
    } else {
        decode_legacy_document(&content, registry)
    }
    .with_context(|| format!("Failed to decode legacy document from {}", file_path.display()))?;

    Ok(document)
}

pub(crate) fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml") | Some("yml")
    )
}
