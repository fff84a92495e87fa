//! Configuration loading for the kiosk client.
//!
//! Configuration is loaded from a TOML file (default: `kiosk.toml`). Every
//! section and field is optional; an empty file yields [`KioskConfig::default`].

use kiosk_core::BackoffPolicy;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration for the kiosk client.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct KioskConfig {
    /// Server address configuration.
    pub server: ServerConfig,
    /// Reconnect backoff configuration.
    pub reconnect: ReconnectConfig,
    /// On-screen overlay timing.
    pub display: DisplayConfig,
    /// Startup snapshot reads.
    pub snapshot: SnapshotConfig,
}

/// Server address configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base address of the kiosk API (default: http://127.0.0.1:8000/api).
    pub base_url: String,
    /// Timeout for establishing the push stream's TCP connection, in
    /// milliseconds (default: 10000).
    pub connect_timeout_ms: u64,
}

/// Reconnect backoff configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReconnectConfig {
    /// First reconnect delay in milliseconds (default: 250).
    pub base_ms: u64,
    /// Maximum reconnect delay in milliseconds (default: 5000).
    pub cap_ms: u64,
    /// Highest backoff exponent (default: 5).
    pub max_exponent: u32,
}

/// On-screen overlay timing.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// How long the volume toast stays up after the latest change (default: 1200).
    pub volume_toast_ms: u64,
    /// How long a reaction stays up (default: 4000).
    pub reaction_toast_ms: u64,
}

/// Startup snapshot reads.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SnapshotConfig {
    /// Per-read timeout in milliseconds (default: 3000).
    pub timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000/api".to_string(),
            connect_timeout_ms: 10_000,
        }
    }
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        let policy = BackoffPolicy::default();
        Self {
            base_ms: policy.base.as_millis() as u64,
            cap_ms: policy.cap.as_millis() as u64,
            max_exponent: policy.max_exponent,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            volume_toast_ms: 1200,
            reaction_toast_ms: 4000,
        }
    }
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self { timeout_ms: 3000 }
    }
}

impl KioskConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Override the base address.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.server.base_url = base_url.to_string();
        self
    }

    /// `{base}/events`
    pub fn events_url(&self) -> String {
        join(&self.server.base_url, "events")
    }

    /// Address of a path below the base.
    pub fn endpoint(&self, path: &str) -> String {
        join(&self.server.base_url, path)
    }
}

impl ReconnectConfig {
    /// The backoff policy these settings describe.
    pub fn policy(&self) -> BackoffPolicy {
        BackoffPolicy::new(
            Duration::from_millis(self.base_ms),
            Duration::from_millis(self.cap_ms),
            self.max_exponent,
        )
    }
}

impl DisplayConfig {
    /// Volume toast display duration.
    pub fn volume_toast(&self) -> Duration {
        Duration::from_millis(self.volume_toast_ms)
    }

    /// Reaction toast display duration.
    pub fn reaction_toast(&self) -> Duration {
        Duration::from_millis(self.reaction_toast_ms)
    }
}

pub(crate) fn join(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Failed to parse configuration file.
    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying TOML parse error.
        source: toml::de::Error,
    },
}
