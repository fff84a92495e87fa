//! Mock snapshot source for testing.
//!
//! Reads that were never scripted fail with [`SnapshotError::Unavailable`],
//! so an empty mock behaves like an unreachable server.

use super::{SnapshotError, SnapshotRead, SnapshotSource};
use async_trait::async_trait;
use kiosk_types::{CallPayload, PictureMeta, VolumeStatus};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Mock snapshot source for testing.
///
/// Clones share state. Each read can be given a value, an error and a delay
/// (measured on tokio's clock, so paused-time tests control it).
#[derive(Debug, Default, Clone)]
pub struct MockSnapshotSource {
    inner: Arc<Mutex<MockSnapshotInner>>,
}

#[derive(Debug, Default)]
struct MockSnapshotInner {
    call: Option<CallPayload>,
    picture: Option<PictureMeta>,
    volume: Option<VolumeStatus>,
    errors: HashMap<SnapshotRead, SnapshotError>,
    delays: HashMap<SnapshotRead, Duration>,
    reads: Vec<SnapshotRead>,
}

impl MockSnapshotSource {
    /// Create a mock where every read fails.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer the call-state read with `payload`.
    pub fn set_call(&self, payload: CallPayload) {
        let mut inner = self.inner.lock().unwrap();
        inner.call = Some(payload);
        inner.errors.remove(&SnapshotRead::CallState);
    }

    /// Answer the picture-meta read with `meta`.
    pub fn set_picture(&self, meta: PictureMeta) {
        let mut inner = self.inner.lock().unwrap();
        inner.picture = Some(meta);
        inner.errors.remove(&SnapshotRead::PictureMeta);
    }

    /// Answer the volume read with `status`.
    pub fn set_volume(&self, status: VolumeStatus) {
        let mut inner = self.inner.lock().unwrap();
        inner.volume = Some(status);
        inner.errors.remove(&SnapshotRead::Volume);
    }

    /// Make `read` fail with `error`.
    pub fn fail(&self, read: SnapshotRead, error: SnapshotError) {
        let mut inner = self.inner.lock().unwrap();
        inner.errors.insert(read, error);
    }

    /// Hold `read` for `delay` before answering.
    pub fn delay(&self, read: SnapshotRead, delay: Duration) {
        let mut inner = self.inner.lock().unwrap();
        inner.delays.insert(read, delay);
    }

    /// Reads served so far, in completion order.
    pub fn reads(&self) -> Vec<SnapshotRead> {
        let inner = self.inner.lock().unwrap();
        inner.reads.clone()
    }

    async fn answer<T>(
        &self,
        read: SnapshotRead,
        pick: impl Fn(&MockSnapshotInner) -> Option<T>,
    ) -> Result<T, SnapshotError> {
        let delay = {
            let inner = self.inner.lock().unwrap();
            inner.delays.get(&read).copied()
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut inner = self.inner.lock().unwrap();
        inner.reads.push(read);
        if let Some(error) = inner.errors.get(&read) {
            return Err(error.clone());
        }
        pick(&inner).ok_or_else(|| SnapshotError::Unavailable("no response scripted".into()))
    }
}

#[async_trait]
impl SnapshotSource for MockSnapshotSource {
    async fn call_state(&self) -> Result<CallPayload, SnapshotError> {
        self.answer(SnapshotRead::CallState, |inner| inner.call.clone())
            .await
    }

    async fn picture_meta(&self) -> Result<PictureMeta, SnapshotError> {
        self.answer(SnapshotRead::PictureMeta, |inner| inner.picture.clone())
            .await
    }

    async fn volume(&self) -> Result<VolumeStatus, SnapshotError> {
        self.answer(SnapshotRead::Volume, |inner| inner.volume).await
    }
}
