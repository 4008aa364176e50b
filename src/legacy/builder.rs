use crate::legacy::{LegacyActivity, LegacyConnection, LegacyDocument, START_ACTIVITY_TYPE};
use crate::values::{Variable, VariableValue, Variables};
use serde_json::{Map, Value, json};

/// Fluent construction of legacy documents, mostly for tests and fixtures.
pub struct LegacyDocumentBuilder {
    id: String,
    name: Option<String>,
    description: Option<String>,
    version: i32,
    variables: Variables,
    pub activities: Vec<LegacyActivity>,
    connections: Vec<LegacyConnection>,
    is_singleton: bool,
    is_published: bool,
    is_latest: bool,
}

impl LegacyDocumentBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            name: Some(id.to_string()),
            description: None,
            version: 1,
            variables: Variables::new(),
            activities: Vec::new(),
            connections: Vec::new(),
            is_singleton: false,
            is_published: true,
            is_latest: true,
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn version(mut self, version: i32) -> Self {
        self.version = version;
        self
    }

    pub fn singleton(mut self, is_singleton: bool) -> Self {
        self.is_singleton = is_singleton;
        self
    }

    pub fn var(mut self, key: &str, value: impl Into<VariableValue>) -> Self {
        self.variables.insert(key.to_string(), Variable::new(value));
        self
    }

    pub fn start(mut self, id: &str) -> Self {
        self.activities.push(LegacyActivity {
            id: id.to_string(),
            activity_type: START_ACTIVITY_TYPE.to_string(),
            ..Default::default()
        });
        self
    }

    pub fn activity(self, id: &str, activity_type: &str) -> ActivityBuilder {
        ActivityBuilder {
            document_builder: self,
            activity: LegacyActivity {
                id: id.to_string(),
                activity_type: activity_type.to_string(),
                ..Default::default()
            },
        }
    }

    pub fn connect(mut self, source: &str, destination: &str, outcome: &str) -> Self {
        self.connections.push(LegacyConnection {
            source_activity_id: source.to_string(),
            destination_activity_id: destination.to_string(),
            outcome: Some(outcome.to_string()),
        });
        self
    }

    pub fn build(self) -> LegacyDocument {
        LegacyDocument {
            definition_id: self.id.clone(),
            id: self.id,
            version: self.version,
            name: self.name,
            description: self.description,
            activities: self.activities,
            connections: self.connections,
            variables: self.variables,
            is_singleton: self.is_singleton,
            is_disabled: false,
            is_published: self.is_published,
            is_latest: self.is_latest,
        }
    }
}

pub struct ActivityBuilder {
    document_builder: LegacyDocumentBuilder,
    activity: LegacyActivity,
}

impl ActivityBuilder {
    /// Plain state entry, e.g. `.state("branches", json!(["a", "b"]))`.
    pub fn state(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.activity.state.insert(key.to_string(), value.into());
        self
    }

    /// Typed-expression state entry: `{ "syntax": .., "expression": .. }`.
    pub fn expression(mut self, key: &str, syntax: &str, expression: &str) -> Self {
        self.activity.state.insert(
            key.to_string(),
            json!({ "syntax": syntax, "expression": expression }),
        );
        self
    }

    pub fn display_name(mut self, display_name: &str) -> Self {
        self.activity.display_name = Some(display_name.to_string());
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.activity.description = Some(description.to_string());
        self
    }

    pub fn position(mut self, left: i32, top: i32) -> Self {
        self.activity.left = left;
        self.activity.top = top;
        self
    }

    pub fn build(mut self) -> LegacyDocumentBuilder {
        self.document_builder.activities.push(self.activity);
        self.document_builder
    }
}

impl LegacyActivity {
    /// Standalone activity with the given state, for unit-level checks.
    pub fn with_state(id: &str, activity_type: &str, state: Map<String, Value>) -> Self {
        Self {
            id: id.to_string(),
            activity_type: activity_type.to_string(),
            state,
            ..Default::default()
        }
    }
}
