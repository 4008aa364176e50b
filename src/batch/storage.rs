use anyhow::{Context as AnyhowContext, Result};
use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tokio::fs;

// --- Interfaces ---

/// Where legacy documents come from. Documents are addressed by file name.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Names of every document to migrate, in processing order.
    async fn list(&self) -> Result<Vec<String>>;
    async fn read(&self, name: &str) -> Result<String>;
}

/// Where migrated documents go.
#[async_trait]
pub trait DocumentSink: Send + Sync {
    async fn write(&self, name: &str, content: &str) -> Result<()>;
}

// --- Directory Implementations ---

pub struct DirectorySource {
    dir: PathBuf,
    extensions: Vec<String>,
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>, extensions: Vec<String>) -> Self {
        Self {
            dir: dir.into(),
            extensions,
        }
    }

    fn accepts(&self, name: &str) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        match name.rsplit_once('.') {
            Some((_, ext)) => self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)),
            None => false,
        }
    }
}

#[async_trait]
impl DocumentSource for DirectorySource {
    async fn list(&self) -> Result<Vec<String>> {
        let mut entries = fs::read_dir(&self.dir)
            .await
            .with_context(|| format!("Failed to list input directory {}", self.dir.display()))?;

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if self.accepts(name) {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    async fn read(&self, name: &str) -> Result<String> {
        let path = self.dir.join(name);
        fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))
    }
}

/// Writes each document to a temporary file first and renames it into place,
/// so a failed write never leaves a truncated document behind.
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl DocumentSink for DirectorySink {
    async fn write(&self, name: &str, content: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("Failed to create output directory {}", self.dir.display()))?;

        let target = self.dir.join(name);
        let staging = self.dir.join(format!(".{}.tmp", name));
        fs::write(&staging, content)
            .await
            .with_context(|| format!("Failed to write {}", staging.display()))?;
        if let Err(e) = fs::rename(&staging, &target).await {
            let _ = fs::remove_file(&staging).await;
            return Err(e).with_context(|| format!("Failed to move output into {}", target.display()));
        }
        Ok(())
    }
}

// --- In-Memory Implementations ---

#[derive(Default)]
pub struct InMemorySource {
    documents: BTreeMap<String, String>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, name: &str, content: &str) -> Self {
        self.documents.insert(name.to_string(), content.to_string());
        self
    }
}

#[async_trait]
impl DocumentSource for InMemorySource {
    async fn list(&self) -> Result<Vec<String>> {
        Ok(self.documents.keys().cloned().collect())
    }

    async fn read(&self, name: &str) -> Result<String> {
        self.documents
            .get(name)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Document not found: {}", name))
    }
}

#[derive(Default)]
pub struct InMemorySink {
    documents: DashMap<String, String>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<String> {
        self.documents.get(name).map(|doc| doc.value().clone())
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[async_trait]
impl DocumentSink for InMemorySink {
    async fn write(&self, name: &str, content: &str) -> Result<()> {
        self.documents.insert(name.to_string(), content.to_string());
        Ok(())
    }
}
