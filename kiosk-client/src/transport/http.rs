//! HTTP `text/event-stream` transport.

use super::{Transport, TransportError};
use async_trait::async_trait;
use kiosk_core::{EventStreamDecoder, SseEvent};
use reqwest::header::{ACCEPT, CACHE_CONTROL, CONTENT_TYPE};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;

const EVENT_STREAM: &str = "text/event-stream";

/// Server-push transport over a long-lived HTTP GET.
///
/// A connection counts as open only once the server answered with a 2xx
/// status and a `text/event-stream` body; anything else is a failed attempt.
#[derive(Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    inner: Mutex<StreamInner>,
    connected: AtomicBool,
}

#[derive(Debug, Default)]
struct StreamInner {
    response: Option<reqwest::Response>,
    decoder: EventStreamDecoder,
    ready: VecDeque<SseEvent>,
}

impl HttpTransport {
    /// Create a transport with the given TCP connect timeout.
    ///
    /// No overall request timeout is set; the stream is meant to stay open.
    pub fn new(connect_timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;
        Ok(Self::with_client(client))
    }

    /// Create a transport around an existing client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            inner: Mutex::new(StreamInner::default()),
            connected: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn connect(&self, url: &str) -> Result<(), TransportError> {
        let mut inner = self.inner.lock().await;
        inner.response = None;
        self.connected.store(false, Ordering::SeqCst);

        let response = self
            .client
            .get(url)
            .header(ACCEPT, EVENT_STREAM)
            .header(CACHE_CONTROL, "no-cache")
            .send()
            .await
            .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::ConnectionFailed(format!(
                "unexpected status {status}"
            )));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        if !content_type.starts_with(EVENT_STREAM) {
            return Err(TransportError::ConnectionFailed(format!(
                "unexpected content type {content_type:?}"
            )));
        }

        inner.decoder.reset();
        inner.ready.clear();
        inner.response = Some(response);
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn recv(&self) -> Result<SseEvent, TransportError> {
        let mut inner = self.inner.lock().await;
        loop {
            if let Some(event) = inner.ready.pop_front() {
                return Ok(event);
            }

            let chunk = match inner.response.as_mut() {
                Some(response) => response.chunk().await,
                None => return Err(TransportError::NotConnected),
            };

            match chunk {
                Ok(Some(bytes)) => {
                    let events = inner.decoder.feed(&bytes);
                    inner.ready.extend(events);
                }
                Ok(None) => {
                    inner.response = None;
                    self.connected.store(false, Ordering::SeqCst);
                    return Err(TransportError::ConnectionClosed);
                }
                Err(e) => {
                    inner.response = None;
                    self.connected.store(false, Ordering::SeqCst);
                    return Err(TransportError::ReceiveFailed(e.to_string()));
                }
            }
        }
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn close(&self) -> Result<(), TransportError> {
        let mut inner = self.inner.lock().await;
        // dropping the response closes the underlying connection
        inner.response = None;
        inner.ready.clear();
        self.connected.store(false, Ordering::SeqCst);
        Ok(())
    }
}
