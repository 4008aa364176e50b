use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};
use workflow_migrate::batch::BatchRunner;
use workflow_migrate::batch::naming::overrides_from_file_name;
use workflow_migrate::batch::storage::{DirectorySink, DirectorySource};
use workflow_migrate::batch::migrate_text;
use workflow_migrate::config::MigrationConfig;
use workflow_migrate::migrate::DocumentOverrides;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a YAML migration config
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Migrate every legacy workflow definition in a directory
    Run {
        /// Directory containing legacy workflow definitions
        #[arg(long, short)]
        input: Option<PathBuf>,

        /// Output directory (defaults to <input>/out)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Maximum number of documents migrated at once
        #[arg(long)]
        concurrency: Option<usize>,
    },

    /// Migrate a single legacy workflow definition and print it
    Convert {
        /// Path to the legacy workflow definition
        #[arg(long, short)]
        file: PathBuf,

        /// Workflow id (defaults to the last segment of the file name)
        #[arg(long)]
        id: Option<String>,

        /// Workflow name (defaults to the second segment of the file name)
        #[arg(long)]
        name: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => MigrationConfig::load(path)?,
        None => MigrationConfig::default(),
    };

    // Codec registry problems are fatal before any document is touched.
    let registry = Arc::new(config.build_registry()?);
    let migrator = config.build_migrator();

    match cli.command {
        Commands::Run { input, output, concurrency } => {
            let input = input
                .or_else(|| config.input_dir.clone())
                .ok_or_else(|| anyhow!("No input directory given (use --input or input_dir in the config)"))?;
            let output = output.unwrap_or_else(|| config.output_dir_for(&input));
            let concurrency = concurrency.or(config.concurrency);

            info!("Migrating workflows from {} into {}", input.display(), output.display());
            let source = Arc::new(DirectorySource::new(&input, config.extensions.clone()));
            let sink = Arc::new(DirectorySink::new(&output));

            let mut runner = BatchRunner::new(migrator, registry);
            if let Some(n) = concurrency {
                runner = runner.with_concurrency(n);
            }
            let report = runner.run(source, sink).await?;

            if !report.is_success() {
                for failure in &report.failed {
                    error!(file = %failure.name, "{}", failure.error);
                }
                return Err(anyhow!(
                    "{} of {} documents failed to migrate",
                    report.failed.len(),
                    report.total()
                ));
            }
            info!("Migrated {} documents.", report.migrated.len());
        }

        Commands::Convert { file, id, name } => {
            let file_name = file_name_of(&file)?;
            let derived = overrides_from_file_name(&file_name).unwrap_or_default();
            let overrides = DocumentOverrides {
                id: id.unwrap_or(derived.id),
                name: name.or(derived.name),
            };
            if overrides.id.is_empty() {
                return Err(anyhow!("Cannot derive a workflow id from {}, pass --id", file.display()));
            }

            let raw = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let encoded = migrate_text(&raw, &file_name, &overrides, &migrator, &registry)?;
            println!("{}", encoded);
        }
    }

    Ok(())
}

fn file_name_of(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .ok_or_else(|| anyhow!("Invalid file path: {}", path.display()))
}
