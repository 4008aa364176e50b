use crate::error::{DecodeError, EncodeError};
use crate::target::{TargetActivity, TargetConnection, TargetDocument};
use crate::values::{CodecRegistry, RawVariable, decode_variables, encode_variables};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Wire shape of a target document. Field order here is the output key order.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TargetDocumentWire {
    id: String,
    definition_id: String,
    version: i32,
    name: Option<String>,
    description: Option<String>,
    is_singleton: bool,
    is_published: bool,
    is_latest: bool,
    activities: Vec<TargetActivity>,
    connections: Vec<TargetConnection>,
    #[serde(default)]
    variables: BTreeMap<String, RawVariable>,
}

/// Serializes a target document as indented JSON.
pub fn encode_target_document(document: &TargetDocument, registry: &CodecRegistry) -> Result<String, EncodeError> {
    let wire = TargetDocumentWire {
        id: document.id.clone(),
        definition_id: document.definition_id.clone(),
        version: document.version,
        name: document.name.clone(),
        description: document.description.clone(),
        is_singleton: document.is_singleton,
        is_published: document.is_published,
        is_latest: document.is_latest,
        activities: document.activities.clone(),
        connections: document.connections.clone(),
        variables: encode_variables(&document.variables, registry)?,
    };
    Ok(serde_json::to_string_pretty(&wire)?)
}

pub fn decode_target_document(raw: &str, registry: &CodecRegistry) -> Result<TargetDocument, DecodeError> {
    let wire: TargetDocumentWire = serde_json::from_str(raw)?;
    Ok(TargetDocument {
        id: wire.id,
        definition_id: wire.definition_id,
        version: wire.version,
        name: wire.name,
        description: wire.description,
        is_singleton: wire.is_singleton,
        is_published: wire.is_published,
        is_latest: wire.is_latest,
        activities: wire.activities,
        connections: wire.connections,
        variables: decode_variables(wire.variables, registry)?,
    })
}
