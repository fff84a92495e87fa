//! Error types for kiosk wire decoding.

use thiserror::Error;

/// Errors that can occur while decoding kiosk wire messages.
#[derive(Debug, Error)]
pub enum WireError {
    /// The body was not valid JSON, or not a JSON object with an `event` field.
    #[error("malformed message: {0}")]
    Malformed(#[source] serde_json::Error),

    /// The `event` discriminant names no known variant.
    #[error("unknown event: {0}")]
    UnknownEvent(String),

    /// The discriminant was valid but `data` did not match its shape.
    #[error("invalid {event} payload: {source}")]
    InvalidPayload {
        /// The event whose payload failed to decode.
        event: &'static str,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// Encoding a message to JSON failed.
    #[error("encoding failed: {0}")]
    Encode(#[source] serde_json::Error),
}
