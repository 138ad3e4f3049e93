mod cli;
mod metrics;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cropstat_core::{
    load_config, load_config_from_env, validate_config, Catalog, Config, FixedDelay,
    FsArtifactStore, IngestOrchestrator, JsonStateStore, LogFormat, OrchestratorConfig,
    QuickStatsClient, RunSummary, SanitizedConfig, SqliteStateStore, StateBackend, StateStore,
    StateTracker,
};

use cli::Cli;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        // Config errors happen before logging is set up.
        let _ = tracing_subscriber::fmt().try_init();
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match cli.config_path() {
        Some(path) => load_config(&path)
            .with_context(|| format!("Failed to load config from {:?}", path))?,
        None => load_config_from_env().context("Failed to load config from environment")?,
    };

    init_logging(&config);

    // Validate before anything touches the network or the data directories
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    let sanitized = SanitizedConfig::from(&config);
    info!(
        "Config: {}",
        serde_json::to_string(&sanitized).unwrap_or_default()
    );

    let phases = cli.phases();

    if cli.dry_run {
        return dry_run(&config);
    }

    if phases.ingest {
        run_ingest(&config).await?;
    }

    if phases.transform {
        run_transforms();
    }

    Ok(())
}

fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    let registry = tracing_subscriber::registry().with(filter);

    match config.logging.format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

fn load_catalog(config: &Config) -> Result<Catalog> {
    let catalog = match &config.ingest.catalog_path {
        Some(path) => Catalog::from_path(path)
            .with_context(|| format!("Failed to load catalog from {:?}", path))?,
        None => Catalog::builtin().context("Built-in catalog is invalid")?,
    };
    info!("Catalog: {} datasets", catalog.len());
    Ok(catalog)
}

/// Dry runs open the state read-only so they never create or touch it.
fn create_state_store(config: &Config, read_only: bool) -> Result<Arc<dyn StateStore>> {
    let store: Arc<dyn StateStore> = match config.state.backend {
        StateBackend::Json => {
            info!("State store: JSON files in {:?}", config.state.dir);
            Arc::new(JsonStateStore::new(&config.state.dir))
        }
        StateBackend::Sqlite => {
            info!("State store: SQLite at {:?}", config.state.sqlite_path);
            let path = &config.state.sqlite_path;
            let store = if read_only {
                SqliteStateStore::open_read_only(path)
            } else {
                SqliteStateStore::new(path)
            };
            Arc::new(store.context("Failed to open state database")?)
        }
    };
    Ok(store)
}

fn create_orchestrator(config: &Config, read_only: bool) -> Result<IngestOrchestrator> {
    let orchestrator_config = OrchestratorConfig::from(config);

    let client = QuickStatsClient::new(&config.api).context("Failed to create API client")?;
    let artifacts = FsArtifactStore::new(&config.storage.raw_dir)
        .with_compression_level(config.storage.compression_level);
    let tracker = StateTracker::new(
        create_state_store(config, read_only)?,
        &orchestrator_config.source_name,
    );
    let pacer = FixedDelay(orchestrator_config.delay());

    Ok(IngestOrchestrator::new(
        orchestrator_config,
        Arc::new(client),
        Arc::new(artifacts),
        tracker,
        Arc::new(pacer),
    ))
}

fn dry_run(config: &Config) -> Result<()> {
    let catalog = load_catalog(config)?;
    let orchestrator = create_orchestrator(config, true)?;
    let planned = orchestrator
        .preview(&catalog)
        .context("Failed to load completion state")?;

    let done = planned.iter().filter(|p| p.completed).count();
    for job in &planned {
        let mark = if job.completed { "done" } else { "pending" };
        println!("{:<8} {:<48} {} ({})", mark, job.job_id, job.display_name, job.window);
    }
    println!(
        "{} jobs planned, {} complete, {} pending",
        planned.len(),
        done,
        planned.len() - done
    );
    Ok(())
}

async fn run_ingest(config: &Config) -> Result<()> {
    let catalog = load_catalog(config)?;
    let orchestrator = create_orchestrator(config, false)?;

    let result = orchestrator.run(&catalog).await;

    metrics::record_run(result.as_ref().ok());
    if let Some(path) = &config.metrics.textfile_path {
        if let Err(e) = metrics::write_textfile(path) {
            warn!("{:#}", e);
        }
    }

    let summary = result.context("Ingestion failed")?;
    log_summary(&summary);
    Ok(())
}

fn log_summary(summary: &RunSummary) {
    if summary.nothing_to_do() {
        return;
    }
    info!(
        "Run complete: {} jobs ({} stored, {} empty), {} records, {} bytes in {}s",
        summary.completed,
        summary.artifacts,
        summary.empty,
        summary.records,
        summary.bytes_written,
        summary.elapsed().num_seconds()
    );
}

fn run_transforms() {
    info!("Transforms not yet implemented");
}
