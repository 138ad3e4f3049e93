//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

/// Default config file, used when present and no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Resumable ingestion of USDA NASS QuickStats datasets.
#[derive(Debug, Parser)]
#[command(name = "cropstat")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the TOML config file.
    #[arg(long, short, env = "CROPSTAT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Run ingestion only; skip transforms.
    #[arg(long, conflicts_with = "transform_only")]
    pub ingest_only: bool,

    /// Run transforms only; skip ingestion.
    #[arg(long)]
    pub transform_only: bool,

    /// Print the job plan with completion marks and exit. No requests are
    /// made and no state is written.
    #[arg(long, conflicts_with = "transform_only")]
    pub dry_run: bool,
}

/// Which phases a run executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Phases {
    pub ingest: bool,
    pub transform: bool,
}

impl Cli {
    pub fn phases(&self) -> Phases {
        Phases {
            ingest: !self.transform_only,
            transform: !self.ingest_only && !self.dry_run,
        }
    }

    /// Explicit config path, or the default file if it exists.
    pub fn config_path(&self) -> Option<PathBuf> {
        match &self.config {
            Some(path) => Some(path.clone()),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                default.exists().then_some(default)
            }
        }
    }
}
