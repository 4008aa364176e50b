use crate::error::TransformError;
use crate::legacy::{LegacyActivity, LegacyConnection, LegacyDocument};
use crate::migrate::metadata::backfill_metadata;
use crate::migrate::properties::extract_properties;
use crate::migrate::type_map::TypeMap;
use crate::target::{TargetActivity, TargetConnection, TargetDocument};
use tracing::{debug, warn};

/// Identity the host assigns to a migrated document, independent of its content.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DocumentOverrides {
    pub id: String,
    /// `None` keeps the legacy document's own name.
    pub name: Option<String>,
}

impl DocumentOverrides {
    pub fn new(id: &str, name: Option<&str>) -> Self {
        Self {
            id: id.to_string(),
            name: name.map(str::to_string),
        }
    }
}

/// Converts legacy documents into target documents.
#[derive(Debug, Clone, Default)]
pub struct Migrator {
    type_map: TypeMap,
}

impl Migrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type_map(type_map: TypeMap) -> Self {
        Self { type_map }
    }

    pub fn type_map(&self) -> &TypeMap {
        &self.type_map
    }

    /// Migrates one document. The first `Start` activity in document order is
    /// the entry point; it and its outgoing connections are dropped.
    pub fn migrate(
        &self,
        document: LegacyDocument,
        overrides: &DocumentOverrides,
    ) -> Result<TargetDocument, TransformError> {
        let start_index = document
            .activities
            .iter()
            .position(LegacyActivity::is_start)
            .ok_or_else(|| TransformError::MissingStartActivity {
                workflow_id: document.id.clone(),
            })?;
        let start_id = document.activities[start_index].id.clone();

        let start_count = document.activities.iter().filter(|a| a.is_start()).count();
        if start_count > 1 {
            warn!(
                workflow_id = %document.id,
                start_activity = %start_id,
                ignored = start_count - 1,
                "Multiple Start activities, only the first is treated as the entry point"
            );
        }

        let LegacyDocument {
            version,
            name,
            description,
            activities,
            connections,
            variables,
            is_singleton,
            is_published,
            is_latest,
            ..
        } = document;

        let activities: Vec<TargetActivity> = activities
            .into_iter()
            .enumerate()
            .filter(|(idx, _)| *idx != start_index)
            .map(|(_, activity)| self.convert_activity(activity))
            .collect();

        let connections: Vec<TargetConnection> = connections
            .into_iter()
            .filter(|c| c.source_activity_id != start_id)
            .map(convert_connection)
            .collect();

        debug!(
            workflow_id = %overrides.id,
            activities = activities.len(),
            connections = connections.len(),
            "Migrated workflow definition"
        );

        Ok(TargetDocument {
            id: overrides.id.clone(),
            definition_id: overrides.id.clone(),
            version,
            name: overrides.name.clone().or(name),
            description,
            is_singleton,
            is_published,
            is_latest,
            activities,
            connections,
            variables,
        })
    }

    fn convert_activity(&self, activity: LegacyActivity) -> TargetActivity {
        let converted = TargetActivity {
            activity_type: self.type_map.remap(&activity.activity_type).to_string(),
            name: activity.name().map(str::to_string),
            display_name: activity.display_name.clone(),
            description: activity.description.clone(),
            properties: extract_properties(&activity.state),
            activity_id: activity.id,
        };
        backfill_metadata(converted)
    }
}

fn convert_connection(connection: LegacyConnection) -> TargetConnection {
    TargetConnection {
        source_activity_id: connection.source_activity_id,
        target_activity_id: connection.destination_activity_id,
        outcome: connection.outcome,
    }
}

/// Migrates a document with the built-in type renames.
pub fn transform_document(
    document: LegacyDocument,
    override_id: &str,
    override_name: Option<&str>,
) -> Result<TargetDocument, TransformError> {
    Migrator::new().migrate(document, &DocumentOverrides::new(override_id, override_name))
}
