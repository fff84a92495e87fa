//! Startup snapshot reads.
//!
//! On start the kiosk issues three independent point-in-time reads (call
//! state, picture metadata, volume). Each read is best effort: a failure is
//! logged and replaced by a safe default, and never blocks the other reads
//! or the push stream.
//!
//! | Read               | Path           | Default on failure     |
//! |--------------------|----------------|------------------------|
//! | [`SnapshotRead::CallState`]   | `call/state`   | idle, no session       |
//! | [`SnapshotRead::PictureMeta`] | `picture/meta` | `/placeholder.svg`     |
//! | [`SnapshotRead::Volume`]      | `volume`       | 50 %, unmuted          |

mod http;
mod mock;

pub use http::HttpSnapshotSource;
pub use mock::MockSnapshotSource;

use async_trait::async_trait;
use kiosk_core::{KioskView, DEFAULT_PHOTO_URL, DEFAULT_VOLUME};
use kiosk_types::{CallPayload, PictureMeta, VolumeStatus};
use std::fmt;
use thiserror::Error;

/// Snapshot read errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    /// Network failure or timeout.
    #[error("unavailable: {0}")]
    Unavailable(String),

    /// Server answered with a non-success status.
    #[error("unexpected status {0}")]
    Status(u16),

    /// Body did not match the expected shape.
    #[error("invalid body: {0}")]
    Decode(String),
}

/// The three startup reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnapshotRead {
    /// `GET {base}/call/state`
    CallState,
    /// `GET {base}/picture/meta`
    PictureMeta,
    /// `GET {base}/volume`
    Volume,
}

impl SnapshotRead {
    /// Path below the base address.
    pub fn path(&self) -> &'static str {
        match self {
            SnapshotRead::CallState => "call/state",
            SnapshotRead::PictureMeta => "picture/meta",
            SnapshotRead::Volume => "volume",
        }
    }
}

impl fmt::Display for SnapshotRead {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Source of point-in-time reads.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Current call state.
    async fn call_state(&self) -> Result<CallPayload, SnapshotError>;

    /// Metadata of the current picture.
    async fn picture_meta(&self) -> Result<PictureMeta, SnapshotError>;

    /// Current output volume.
    async fn volume(&self) -> Result<VolumeStatus, SnapshotError>;
}

/// Read the call state, falling back to idle.
pub async fn read_call<S: SnapshotSource + ?Sized>(source: &S) -> CallPayload {
    source
        .call_state()
        .await
        .unwrap_or_else(|e| substitute(SnapshotRead::CallState, &e, CallPayload::idle()))
}

/// Read the picture address, falling back to the placeholder.
pub async fn read_picture<S: SnapshotSource + ?Sized>(source: &S) -> String {
    match source.picture_meta().await {
        Ok(meta) => meta.url,
        Err(e) => substitute(SnapshotRead::PictureMeta, &e, DEFAULT_PHOTO_URL.to_string()),
    }
}

/// Read the volume, falling back to the default level.
pub async fn read_volume<S: SnapshotSource + ?Sized>(source: &S) -> VolumeStatus {
    source
        .volume()
        .await
        .unwrap_or_else(|e| substitute(SnapshotRead::Volume, &e, DEFAULT_VOLUME))
}

fn substitute<T>(read: SnapshotRead, error: &SnapshotError, default: T) -> T {
    tracing::warn!(read = %read, error = %error, "snapshot read failed, using default");
    default
}

/// Result of all three startup reads, defaults already substituted.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Call state.
    pub call: CallPayload,
    /// Picture address, without cache-buster.
    pub picture_url: String,
    /// Output volume.
    pub volume: VolumeStatus,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            call: CallPayload::idle(),
            picture_url: DEFAULT_PHOTO_URL.to_string(),
            volume: DEFAULT_VOLUME,
        }
    }
}

impl Snapshot {
    /// Run the three reads concurrently and wait for all of them.
    pub async fn fetch<S: SnapshotSource + ?Sized>(source: &S) -> Self {
        let (call, picture_url, volume) =
            tokio::join!(read_call(source), read_picture(source), read_volume(source));
        Self {
            call,
            picture_url,
            volume,
        }
    }

    /// Seed a view with these values. The volume is recorded without
    /// showing the toast.
    pub fn seed(&self, view: &mut KioskView, stamp: u64) {
        view.apply_call(&self.call);
        view.apply_picture(&self.picture_url, stamp);
        view.seed_volume(self.volume);
    }
}
