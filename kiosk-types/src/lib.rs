//! # kiosk-types
//!
//! Wire format types for the kiosk synchronization layer.
//!
//! This crate provides the foundational types used across all kiosk crates:
//! - [`CallState`], [`CallSession`], [`CallPayload`] - Call-signalling state
//! - [`PushMsg`] - Messages delivered over the server-push stream
//! - [`VolumeStatus`], [`PictureMeta`] - Snapshot read bodies
//! - [`WireError`] - Decode failures

#![warn(missing_docs)]
#![warn(clippy::all)]

mod call;
mod error;
mod messages;
mod snapshot;

pub use call::{CallId, CallPayload, CallSession, CallState};
pub use error::WireError;
pub use messages::{PictureUpdate, PushEvent, PushMsg, Reaction};
pub use snapshot::{PictureMeta, VolumeStatus, MAX_VOLUME_LEVEL};
