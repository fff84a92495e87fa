//! Push messages delivered over the event stream.
//!
//! Every message body is a JSON object `{"event": <name>, "data": <payload>}`.
//! Decoding reads the `event` discriminant first and only then interprets
//! `data` against the shape that event requires.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{CallPayload, VolumeStatus, WireError};

/// All possible push messages.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum PushMsg {
    /// Output volume changed.
    Volume(VolumeStatus),
    /// A new picture is available.
    Picture(PictureUpdate),
    /// Call-signalling transition.
    Call(CallPayload),
    /// A reaction sent from the remote page.
    Reaction(Reaction),
}

impl PushMsg {
    /// Decode a message body.
    ///
    /// Fails with [`WireError::UnknownEvent`] for discriminants outside the
    /// four known events, and with [`WireError::InvalidPayload`] when the
    /// discriminant is known but `data` has the wrong shape.
    pub fn from_json(text: &str) -> Result<Self, WireError> {
        let envelope: Envelope = serde_json::from_str(text).map_err(WireError::Malformed)?;
        let event = PushEvent::from_name(&envelope.event)
            .ok_or_else(|| WireError::UnknownEvent(envelope.event.clone()))?;

        let data = envelope.data;
        let decoded = match event {
            PushEvent::Volume => serde_json::from_value(data).map(PushMsg::Volume),
            PushEvent::Picture => serde_json::from_value(data).map(PushMsg::Picture),
            PushEvent::Call => serde_json::from_value(data).map(PushMsg::Call),
            PushEvent::Reaction => serde_json::from_value(data).map(PushMsg::Reaction),
        };
        decoded.map_err(|source| WireError::InvalidPayload {
            event: event.as_str(),
            source,
        })
    }

    /// Encode to a JSON message body.
    pub fn to_json(&self) -> Result<String, WireError> {
        serde_json::to_string(self).map_err(WireError::Encode)
    }

    /// Discriminant of this message.
    pub fn event(&self) -> PushEvent {
        match self {
            PushMsg::Volume(_) => PushEvent::Volume,
            PushMsg::Picture(_) => PushEvent::Picture,
            PushMsg::Call(_) => PushEvent::Call,
            PushMsg::Reaction(_) => PushEvent::Reaction,
        }
    }
}

/// Discriminant values of [`PushMsg`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PushEvent {
    /// `volume`
    Volume,
    /// `picture`
    Picture,
    /// `call`
    Call,
    /// `reaction`
    Reaction,
}

impl PushEvent {
    /// Look up a discriminant by its wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "volume" => Some(PushEvent::Volume),
            "picture" => Some(PushEvent::Picture),
            "call" => Some(PushEvent::Call),
            "reaction" => Some(PushEvent::Reaction),
            _ => None,
        }
    }

    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            PushEvent::Volume => "volume",
            PushEvent::Picture => "picture",
            PushEvent::Call => "call",
            PushEvent::Reaction => "reaction",
        }
    }
}

impl fmt::Display for PushEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A new picture to display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PictureUpdate {
    /// Address of the picture, usually server-relative (`/pics/current.jpg`).
    pub url: String,
}

/// A short reaction message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
    /// Text to show, typically an emoji.
    pub message: String,
}

#[derive(Deserialize)]
struct Envelope {
    event: String,
    #[serde(default)]
    data: serde_json::Value,
}
