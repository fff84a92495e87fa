//! # kiosk-sync
//!
//! CLI tool for watching and debugging the kiosk live view.
//!
//! ## Commands
//!
//! - `watch`: Follow the live view and print every change
//! - `snapshot`: Run the startup reads once and print the seeded view
//! - `decode`: Replay a recorded event stream through the decoder
//!
//! ## Example
//!
//! ```bash
//! # Follow a kiosk on the local network
//! kiosk-sync --base-url http://frame.local:8000/api watch
//!
//! # What would the kiosk show right after boot?
//! kiosk-sync snapshot
//!
//! # Check a captured stream (curl -N .../events > capture.txt)
//! kiosk-sync decode capture.txt
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use kiosk_client::KioskConfig;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{decode, snapshot, watch};

/// Config file picked up from the working directory when `--config` is absent.
const DEFAULT_CONFIG: &str = "kiosk.toml";

/// CLI tool for watching and debugging the kiosk live view.
#[derive(Parser, Debug)]
#[command(name = "kiosk-sync")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Configuration file (default: ./kiosk.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Base address of the kiosk API, overriding the config file
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Log filter, e.g. `debug` or `kiosk_client=trace` (overrides RUST_LOG)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Follow the live view and print every change
    Watch,

    /// Run the startup reads once and print the seeded view
    Snapshot,

    /// Replay a recorded event stream and show how each event is handled
    Decode {
        /// File containing a raw `text/event-stream` body
        file: PathBuf,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    match cli.command {
        Commands::Watch => {
            let config = load_config(cli.config.as_deref(), cli.base_url.as_deref())?;
            watch::run(&config).await?;
        }
        Commands::Snapshot => {
            let config = load_config(cli.config.as_deref(), cli.base_url.as_deref())?;
            snapshot::run(&config).await?;
        }
        Commands::Decode { file } => {
            decode::run(&file).await?;
        }
    }

    Ok(())
}

fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| "kiosk=info".into()),
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

/// Where the configuration comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ConfigSource {
    /// `--config <path>`
    Flag(PathBuf),
    /// `./kiosk.toml`
    WorkingDir,
    /// Built-in defaults
    Defaults,
}

impl ConfigSource {
    fn pick(path: Option<&Path>, default_exists: bool) -> Self {
        match path {
            Some(path) => ConfigSource::Flag(path.to_path_buf()),
            None if default_exists => ConfigSource::WorkingDir,
            None => ConfigSource::Defaults,
        }
    }
}

/// Resolve configuration: explicit file, then ./kiosk.toml, then defaults;
/// `--base-url` wins over all of them.
fn load_config(path: Option<&Path>, base_url: Option<&str>) -> Result<KioskConfig> {
    let source = ConfigSource::pick(path, Path::new(DEFAULT_CONFIG).exists());
    let config = match &source {
        ConfigSource::Flag(path) => {
            tracing::info!(path = %path.display(), "loading config from --config");
            KioskConfig::from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?
        }
        ConfigSource::WorkingDir => {
            tracing::info!("loading config from ./{}", DEFAULT_CONFIG);
            KioskConfig::from_file(Path::new(DEFAULT_CONFIG))
                .context("Failed to load ./kiosk.toml")?
        }
        ConfigSource::Defaults => {
            tracing::info!("no config file, using defaults");
            KioskConfig::default()
        }
    };

    let config = match base_url {
        Some(url) => config.with_base_url(url),
        None => config,
    };

    if !config.server.base_url.starts_with("http://")
        && !config.server.base_url.starts_with("https://")
    {
        anyhow::bail!(
            "base address must be an absolute http(s) URL, got {:?}",
            config.server.base_url
        );
    }

    Ok(config)
}
