//! Snapshot reads over plain HTTP GETs.

use super::{SnapshotError, SnapshotRead, SnapshotSource};
use crate::config::{join, KioskConfig};
use async_trait::async_trait;
use kiosk_types::{CallPayload, PictureMeta, VolumeStatus};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Snapshot source backed by the kiosk API.
#[derive(Debug, Clone)]
pub struct HttpSnapshotSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSnapshotSource {
    /// Create a source for `base_url` where every read gives up after `timeout`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, SnapshotError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SnapshotError::Unavailable(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }

    /// Create a source from the `[server]` and `[snapshot]` sections.
    pub fn from_config(config: &KioskConfig) -> Result<Self, SnapshotError> {
        Self::new(
            &config.server.base_url,
            Duration::from_millis(config.snapshot.timeout_ms),
        )
    }

    async fn get<T: DeserializeOwned>(&self, read: SnapshotRead) -> Result<T, SnapshotError> {
        let url = join(&self.base_url, read.path());
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SnapshotError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SnapshotError::Status(status.as_u16()));
        }

        response.json::<T>().await.map_err(|e| {
            if e.is_decode() {
                SnapshotError::Decode(e.to_string())
            } else {
                SnapshotError::Unavailable(e.to_string())
            }
        })
    }
}

#[async_trait]
impl SnapshotSource for HttpSnapshotSource {
    async fn call_state(&self) -> Result<CallPayload, SnapshotError> {
        self.get(SnapshotRead::CallState).await
    }

    async fn picture_meta(&self) -> Result<PictureMeta, SnapshotError> {
        self.get(SnapshotRead::PictureMeta).await
    }

    async fn volume(&self) -> Result<VolumeStatus, SnapshotError> {
        self.get(SnapshotRead::Volume).await
    }
}
