//! Resilience scenarios for the kiosk sync layer.
//!
//! Every scenario runs against a [`FixtureServer`](crate::fixture::FixtureServer)
//! on a loopback port with the real HTTP transport and snapshot client.
//!
//! - `reconnect` - Push stream drops, refusals and garbage
//! - `snapshot` - Startup reads against failing endpoints
//! - `session` - The full kiosk session end to end

pub mod reconnect;
pub mod session;
pub mod snapshot;
