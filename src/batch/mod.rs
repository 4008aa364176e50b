pub mod naming;
pub mod storage;

use crate::legacy::loader::{decode_legacy_document, decode_legacy_yaml, is_yaml};
use crate::migrate::{DocumentOverrides, Migrator};
use crate::target::writer::encode_target_document;
use crate::values::CodecRegistry;
use anyhow::{Context as AnyhowContext, Result, anyhow};
use naming::{output_file_name, overrides_from_file_name};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use storage::{DocumentSink, DocumentSource};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info};

/// Decodes, migrates and re-encodes one document held in memory.
pub fn migrate_text(
    raw: &str,
    file_name: &str,
    overrides: &DocumentOverrides,
    migrator: &Migrator,
    registry: &CodecRegistry,
) -> Result<String> {
    let legacy = if is_yaml(Path::new(file_name)) {
        decode_legacy_yaml(raw, registry)
    } else {
        decode_legacy_document(raw, registry)
    }
    .with_context(|| format!("Failed to decode {}", file_name))?;

    let target = migrator
        .migrate(legacy, overrides)
        .with_context(|| format!("Failed to migrate {}", file_name))?;

    let encoded = encode_target_document(&target, registry)
        .with_context(|| format!("Failed to encode {}", file_name))?;
    Ok(encoded)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentFailure {
    pub name: String,
    pub error: String,
}

/// Outcome of a batch run. Both lists are sorted by document name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub migrated: Vec<String>,
    pub failed: Vec<DocumentFailure>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.migrated.len() + self.failed.len()
    }
}

/// Runs the migration over every document of a source.
///
/// Documents are independent: one failing to read, decode, migrate or write
/// is recorded in the report and the rest of the batch carries on.
pub struct BatchRunner {
    migrator: Arc<Migrator>,
    registry: Arc<CodecRegistry>,
    concurrency: usize,
}

impl BatchRunner {
    pub fn new(migrator: Migrator, registry: Arc<CodecRegistry>) -> Self {
        Self {
            migrator: Arc::new(migrator),
            registry,
            concurrency: default_concurrency(),
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub async fn run(
        &self,
        source: Arc<dyn DocumentSource>,
        sink: Arc<dyn DocumentSink>,
    ) -> Result<BatchReport> {
        let started = Instant::now();
        let names = source.list().await?;
        info!(documents = names.len(), concurrency = self.concurrency, "Starting migration batch");

        let permits = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = JoinSet::new();

        for name in names {
            let source = source.clone();
            let sink = sink.clone();
            let migrator = self.migrator.clone();
            let registry = self.registry.clone();
            let permits = permits.clone();

            tasks.spawn(async move {
                let outcome = match permits.acquire_owned().await {
                    Ok(_permit) => {
                        let task_name = name.clone();
                        tokio::spawn(async move {
                            migrate_one(&task_name, source, sink, migrator, registry).await
                        })
                        .await
                        .unwrap_or_else(|e| Err(anyhow!("Migration task failed: {}", e)))
                    }
                    Err(e) => Err(anyhow!("Migration task could not start: {}", e)),
                };
                (name, outcome)
            });
        }

        let mut report = BatchReport::default();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((name, Ok(output))) => {
                    info!(file = %name, output = %output, "Migrated");
                    report.migrated.push(name);
                }
                Ok((name, Err(e))) => {
                    error!(file = %name, error = ?e, "Migration failed");
                    report.failed.push(DocumentFailure {
                        name,
                        error: format!("{:#}", e),
                    });
                }
                Err(e) => error!(error = %e, "Migration task panicked"),
            }
        }

        report.migrated.sort();
        report.failed.sort_by(|a, b| a.name.cmp(&b.name));
        info!(
            migrated = report.migrated.len(),
            failed = report.failed.len(),
            elapsed = ?started.elapsed(),
            "Migration batch finished"
        );
        Ok(report)
    }
}

async fn migrate_one(
    name: &str,
    source: Arc<dyn DocumentSource>,
    sink: Arc<dyn DocumentSink>,
    migrator: Arc<Migrator>,
    registry: Arc<CodecRegistry>,
) -> Result<String> {
    let overrides = overrides_from_file_name(name)
        .ok_or_else(|| anyhow!("Cannot derive a workflow id from file name '{}'", name))?;
    let raw = source.read(name).await?;

    let file_name = name.to_string();
    let encoded = tokio::task::spawn_blocking(move || {
        migrate_text(&raw, &file_name, &overrides, &migrator, &registry)
    })
    .await
    .map_err(|e| anyhow!("Migration of {} panicked: {}", name, e))??;

    let output = output_file_name(name);
    sink.write(&output, &encoded).await?;
    Ok(output)
}

fn default_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
