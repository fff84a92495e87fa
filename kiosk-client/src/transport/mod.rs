//! Transport abstraction for the push stream.
//!
//! This module provides a pluggable transport layer that abstracts the
//! underlying server-push connection (HTTP `text/event-stream`, mock for
//! testing).
//!
//! # Design
//!
//! The transport trait is async and connection-oriented:
//! - `connect()` opens the stream; returning `Ok` means the link is healthy
//! - `recv()` yields the next dispatched event, in wire order
//! - `close()` drops the stream
//!
//! Transports do not retry and do not parse message bodies; both belong to
//! [`PushEventClient`](crate::PushEventClient).
//!
//! # Example
//!
//! ```ignore
//! let transport = MockTransport::new();
//! transport.connect("http://kiosk/api/events").await?;
//! let event = transport.recv().await?;
//! ```

mod http;
mod mock;

pub use http::HttpTransport;
pub use mock::MockTransport;

use async_trait::async_trait;
use kiosk_core::SseEvent;
use thiserror::Error;

/// Transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Not connected.
    #[error("not connected")]
    NotConnected,

    /// Stream ended.
    #[error("connection closed")]
    ConnectionClosed,

    /// Receive failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(String),
}

/// Transport trait for a single server-push stream.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Open the stream at `url`.
    async fn connect(&self, url: &str) -> Result<(), TransportError>;

    /// Receive the next dispatched event.
    ///
    /// Waits until an event is available or the stream fails.
    async fn recv(&self) -> Result<SseEvent, TransportError>;

    /// Check if a stream is currently open.
    fn is_connected(&self) -> bool;

    /// Close the stream. Closing an already-closed transport is not an error.
    async fn close(&self) -> Result<(), TransportError>;
}
