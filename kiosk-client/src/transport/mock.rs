//! Mock transport for testing.
//!
//! Scripts connection outcomes and stream contents, and records every
//! connect attempt (address and time) for verification.

use super::{Transport, TransportError};
use async_trait::async_trait;
use kiosk_core::SseEvent;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;
use tokio::time::Instant;

/// Something a live mock stream can produce.
#[derive(Debug, Clone)]
enum Frame {
    Event(SseEvent),
    Drop(String),
}

/// Mock transport for testing.
///
/// Clones share state, so a test can keep one handle while the client owns
/// another. A live stream with nothing queued waits (like an idle server)
/// until a frame is pushed or the stream is closed.
#[derive(Debug, Default, Clone)]
pub struct MockTransport {
    inner: Arc<Mutex<MockTransportInner>>,
    wake: Arc<Notify>,
}

#[derive(Debug, Default)]
struct MockTransportInner {
    connected: bool,
    attempts: Vec<(String, Instant)>,
    close_count: usize,
    connect_failures: VecDeque<String>,
    scripted_streams: VecDeque<Vec<Frame>>,
    live: VecDeque<Frame>,
}

impl MockTransport {
    /// Create a new mock transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cause the next connect() to fail with the given error.
    ///
    /// Calls accumulate: three calls fail the next three attempts.
    pub fn fail_next_connect(&self, error: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.connect_failures.push_back(error.to_string());
    }

    /// Queue message bodies for the next successful connection to deliver
    /// as soon as it opens.
    pub fn script_stream(&self, messages: &[&str]) {
        let frames = messages
            .iter()
            .map(|m| Frame::Event(SseEvent::message(*m)))
            .collect();
        let mut inner = self.inner.lock().unwrap();
        inner.scripted_streams.push_back(frames);
    }

    /// Deliver a message body on the live stream.
    pub fn push_message(&self, data: &str) {
        self.push_event(SseEvent::message(data));
    }

    /// Deliver an arbitrary event on the live stream.
    pub fn push_event(&self, event: SseEvent) {
        self.push_frame(Frame::Event(event));
    }

    /// Make the live stream fail after the frames already queued.
    pub fn drop_stream(&self, reason: &str) {
        self.push_frame(Frame::Drop(reason.to_string()));
    }

    /// Addresses of all connect attempts, successful or not.
    pub fn connect_attempts(&self) -> Vec<String> {
        let inner = self.inner.lock().unwrap();
        inner.attempts.iter().map(|(url, _)| url.clone()).collect()
    }

    /// Times of all connect attempts.
    pub fn attempt_times(&self) -> Vec<Instant> {
        let inner = self.inner.lock().unwrap();
        inner.attempts.iter().map(|(_, at)| *at).collect()
    }

    /// Number of close() calls.
    pub fn close_count(&self) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.close_count
    }

    fn push_frame(&self, frame: Frame) {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.live.push_back(frame);
        }
        self.wake.notify_waiters();
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn connect(&self, url: &str) -> Result<(), TransportError> {
        let mut inner = self.inner.lock().unwrap();
        inner.attempts.push((url.to_string(), Instant::now()));

        if let Some(error) = inner.connect_failures.pop_front() {
            return Err(TransportError::ConnectionFailed(error));
        }

        inner.connected = true;
        let frames = inner.scripted_streams.pop_front().unwrap_or_default();
        inner.live = frames.into();
        Ok(())
    }

    async fn recv(&self) -> Result<SseEvent, TransportError> {
        loop {
            // registered before checking, so a push between check and await is not lost
            let woken = self.wake.notified();
            {
                let mut inner = self.inner.lock().unwrap();
                if !inner.connected {
                    return Err(TransportError::NotConnected);
                }
                match inner.live.pop_front() {
                    Some(Frame::Event(event)) => return Ok(event),
                    Some(Frame::Drop(reason)) => {
                        inner.connected = false;
                        inner.live.clear();
                        return Err(TransportError::ReceiveFailed(reason));
                    }
                    None => {}
                }
            }
            woken.await;
        }
    }

    fn is_connected(&self) -> bool {
        let inner = self.inner.lock().unwrap();
        inner.connected
    }

    async fn close(&self) -> Result<(), TransportError> {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.connected = false;
            inner.live.clear();
            inner.close_count += 1;
        }
        self.wake.notify_waiters();
        Ok(())
    }
}
