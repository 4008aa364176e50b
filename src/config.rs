use crate::error::ConfigurationError;
use crate::migrate::{Migrator, TypeMap};
use crate::values::CodecRegistry;
use anyhow::{Context as AnyhowContext, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Settings for a migration run, usually read from a YAML file and then
/// overridden by command-line flags.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MigrationConfig {
    pub input_dir: Option<PathBuf>,
    /// Defaults to `<input_dir>/out`.
    pub output_dir: Option<PathBuf>,
    /// File extensions picked up from the input directory.
    pub extensions: Vec<String>,
    pub concurrency: Option<usize>,
    /// Extra legacy -> target activity type renames.
    pub type_map: BTreeMap<String, String>,
    /// Value codecs to register, by name.
    pub codecs: Vec<String>,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            input_dir: None,
            output_dir: None,
            extensions: vec!["json".to_string()],
            concurrency: None,
            type_map: BTreeMap::new(),
            codecs: vec!["typed".to_string(), "duration".to_string()],
        }
    }
}

impl MigrationConfig {
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config = serde_yaml::from_str(content).context("Failed to parse migration config")?;
        Ok(config)
    }

    pub fn load(file_path: &Path) -> Result<Self> {
        let content = fs::read_to_string(file_path)
            .with_context(|| format!("Failed to read config file from {}", file_path.display()))?;
        Self::from_yaml(&content).with_context(|| format!("Invalid config file {}", file_path.display()))
    }

    pub fn output_dir_for(&self, input_dir: &Path) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| input_dir.join("out"))
    }

    /// Builds the codec registry. Fails on the first codec that cannot be
    /// constructed; nothing should be migrated in that case.
    pub fn build_registry(&self) -> Result<CodecRegistry, ConfigurationError> {
        CodecRegistry::from_names(&self.codecs)
    }

    pub fn build_migrator(&self) -> Migrator {
        let mut type_map = TypeMap::new();
        type_map.extend(self.type_map.iter());
        Migrator::with_type_map(type_map)
    }
}
