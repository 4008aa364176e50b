pub mod writer;

use crate::values::Variables;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Syntax tag for expressions that are plain text.
pub const LITERAL_SYNTAX: &str = "Literal";
/// Syntax tag for expressions that hold serialized JSON.
pub const JSON_SYNTAX: &str = "Json";

/// A workflow definition in the target schema.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TargetDocument {
    pub id: String,
    pub definition_id: String,
    pub version: i32,
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_singleton: bool,
    pub is_published: bool,
    pub is_latest: bool,
    pub activities: Vec<TargetActivity>,
    pub connections: Vec<TargetConnection>,
    pub variables: Variables,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetActivity {
    pub activity_id: String,
    #[serde(rename = "type")]
    pub activity_type: String,
    pub name: Option<String>,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub properties: Vec<TargetProperty>,
}

impl TargetActivity {
    pub fn property(&self, name: &str) -> Option<&TargetProperty> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// A named property holding one expression per syntax tag.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetProperty {
    pub name: String,
    pub expressions: BTreeMap<String, String>,
}

impl TargetProperty {
    pub fn single(name: impl Into<String>, syntax: impl Into<String>, expression: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            expressions: BTreeMap::from([(syntax.into(), expression.into())]),
        }
    }

    pub fn expression(&self, syntax: &str) -> Option<&str> {
        self.expressions.get(syntax).map(String::as_str)
    }

    /// First entry of the expression map.
    pub fn first_expression(&self) -> Option<&str> {
        self.expressions.values().next().map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetConnection {
    pub source_activity_id: String,
    pub target_activity_id: String,
    pub outcome: Option<String>,
}
