pub mod builder;
pub mod loader;

use crate::values::Variables;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Activity type that marks a legacy workflow's entry point.
pub const START_ACTIVITY_TYPE: &str = "Start";

/// A workflow definition in the legacy schema.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LegacyDocument {
    pub id: String,
    pub definition_id: String,
    pub version: i32,
    pub name: Option<String>,
    pub description: Option<String>,
    pub activities: Vec<LegacyActivity>,
    pub connections: Vec<LegacyConnection>,
    pub variables: Variables,
    pub is_singleton: bool,
    pub is_disabled: bool,
    pub is_published: bool,
    pub is_latest: bool,
}

impl LegacyDocument {
    /// The first `Start` activity in document order, if any.
    pub fn start_activity(&self) -> Option<&LegacyActivity> {
        self.activities.iter().find(|a| a.is_start())
    }
}

/// A legacy activity: a type name plus a free-form state blob.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyActivity {
    pub id: String,
    #[serde(rename = "type")]
    pub activity_type: String,
    #[serde(default, deserialize_with = "null_as_empty_state")]
    pub state: Map<String, Value>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub left: i32,
    #[serde(default)]
    pub top: i32,
}

impl LegacyActivity {
    pub fn is_start(&self) -> bool {
        self.activity_type == START_ACTIVITY_TYPE
    }

    /// Legacy activities keep their name inside the state blob.
    pub fn name(&self) -> Option<&str> {
        self.state.get("name").and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyConnection {
    pub source_activity_id: String,
    pub destination_activity_id: String,
    #[serde(default)]
    pub outcome: Option<String>,
}

/// Some exports write `"state": null` for activities without settings.
fn null_as_empty_state<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default())
}
