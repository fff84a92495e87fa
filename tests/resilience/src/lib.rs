//! # resilience-tests
//!
//! Resilience testing harness for the kiosk sync layer.
//!
//! This crate runs the real HTTP transport and snapshot reads against a
//! local fixture server that can misbehave on demand:
//! - Dropping every open event stream
//! - Rejecting stream requests (error status, wrong content type)
//! - Sending bodies that are not valid push messages
//! - Failing or garbling snapshot reads

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod fixture;

pub mod scenarios;

use kiosk_client::KioskConfig;
use std::time::Duration;

/// Poll `condition` every 10 ms until it holds or `timeout` elapses.
///
/// Returns whether the condition was met.
pub async fn eventually(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if condition() {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

/// Client configuration for `base_url` with a short backoff so reconnect
/// scenarios finish quickly.
pub fn fast_config(base_url: &str) -> KioskConfig {
    let mut config = KioskConfig::default().with_base_url(base_url);
    config.reconnect.base_ms = 20;
    config.reconnect.cap_ms = 200;
    config.server.connect_timeout_ms = 1_000;
    config.snapshot.timeout_ms = 1_000;
    config
}
