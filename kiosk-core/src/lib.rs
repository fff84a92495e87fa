//! # kiosk-core
//!
//! Pure logic for the kiosk sync layer (no I/O, instant tests).
//!
//! This crate implements the state machines and projections behind the
//! kiosk's live view without any network access or timers, enabling fast
//! unit tests.
//!
//! ## Design Philosophy
//!
//! All modules in this crate are **pure** - they take input and produce output
//! without side effects:
//! - [`reconcile`] maps a call payload to the UI projections
//! - [`ConnectionState`] decides when to connect, close and back off
//! - [`EventStreamDecoder`] turns raw `text/event-stream` bytes into events
//! - [`KioskView`] folds snapshot reads and push messages into one view
//!
//! The actual I/O (HTTP, sleeping) is performed by `kiosk-client`, which
//! interprets the actions produced here.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backoff;
pub mod reconcile;
pub mod sse;
pub mod state;
pub mod view;

pub use backoff::BackoffPolicy;
pub use reconcile::{reconcile, CallMode, Mode};
pub use sse::{EventStreamDecoder, SseEvent, MAX_EVENT_SIZE};
pub use state::{Action, ConnectionState, Event, LinkEvent};
pub use view::{
    cache_busted, CallOutcome, KioskView, ToastKind, ToastTicket, DEFAULT_PHOTO_URL, DEFAULT_VOLUME,
};
