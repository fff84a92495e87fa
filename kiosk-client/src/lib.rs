//! # kiosk-client
//!
//! Real-time sync layer for the picture-frame kiosk.
//!
//! This is the library the rendering layer links against to get one
//! authoritative, continuously updated view of what the kiosk should show.
//!
//! ## Features
//!
//! - **Self-healing push stream**: one `text/event-stream` connection,
//!   re-established with capped exponential backoff (250 ms doubling up to 5 s)
//! - **Best-effort snapshot**: startup reads for call state, picture and
//!   volume, each falling back to a safe default
//! - **Transport Abstraction**: Pluggable transport layer (HTTP, mock)
//! - **Pure State Machine**: Uses kiosk-core for side-effect-free logic
//!
//! ## Example
//!
//! ```ignore
//! use kiosk_client::{HttpSnapshotSource, HttpTransport, Kiosk, KioskConfig};
//!
//! let config = KioskConfig::from_file("kiosk.toml".as_ref())?;
//! let transport = HttpTransport::new(Duration::from_millis(config.server.connect_timeout_ms))?;
//! let source = HttpSnapshotSource::from_config(&config)?;
//!
//! let kiosk = Kiosk::start(&config, transport, source);
//! let mut view = kiosk.view();
//! while view.changed().await.is_ok() {
//!     render(&view.borrow());
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod events;
pub mod kiosk;
pub mod snapshot;
pub mod transport;

pub use config::{ConfigError, DisplayConfig, KioskConfig, ReconnectConfig, ServerConfig, SnapshotConfig};
pub use events::PushEventClient;
pub use kiosk::Kiosk;
pub use snapshot::{
    read_call, read_picture, read_volume, HttpSnapshotSource, MockSnapshotSource, Snapshot,
    SnapshotError, SnapshotRead, SnapshotSource,
};
pub use transport::{HttpTransport, MockTransport, Transport, TransportError};
