//! Call-signalling types.
//!
//! The server owns call sessions; the kiosk only ever observes them. A
//! [`CallPayload`] is what both `GET /call/state` and the `call` push event
//! carry, so it is decoded the same way on both paths.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Lifecycle state of a call as reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallState {
    /// No call.
    Idle,
    /// This kiosk is calling out and waiting for the peer.
    OutgoingRinging,
    /// A peer is calling this kiosk.
    IncomingRinging,
    /// Accepted, media not yet flowing.
    Connecting,
    /// Call in progress.
    InCall,
    /// Call just finished.
    Ended,
}

impl CallState {
    /// Every state, in lifecycle order.
    pub const ALL: [CallState; 6] = [
        CallState::Idle,
        CallState::OutgoingRinging,
        CallState::IncomingRinging,
        CallState::Connecting,
        CallState::InCall,
        CallState::Ended,
    ];

    /// Wire name of this state.
    pub fn as_str(&self) -> &'static str {
        match self {
            CallState::Idle => "idle",
            CallState::OutgoingRinging => "outgoing_ringing",
            CallState::IncomingRinging => "incoming_ringing",
            CallState::Connecting => "connecting",
            CallState::InCall => "in_call",
            CallState::Ended => "ended",
        }
    }

    /// True for `idle` and `ended`, which both mean "no call" to the UI.
    pub fn is_no_call(&self) -> bool {
        matches!(self, CallState::Idle | CallState::Ended)
    }

    /// True for the two states that show a ringing overlay.
    pub fn is_ringing(&self) -> bool {
        matches!(self, CallState::OutgoingRinging | CallState::IncomingRinging)
    }
}

impl fmt::Display for CallState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque server-assigned call identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallId(String);

impl CallId {
    /// Wrap a server-provided identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as sent on the wire.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A call session as held by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallSession {
    /// Server-assigned identifier.
    pub call_id: CallId,
    /// State of this session.
    pub state: CallState,
    /// Creation time, seconds since the Unix epoch.
    pub created_at: f64,
}

/// Call state as delivered by the snapshot read or a `call` push event.
///
/// On the wire this is `{state, call, reason?, ended_call_id?}` where `call`
/// is null exactly when `state` is `idle`. Decoding rejects any other
/// combination, so holders of a `CallPayload` never see a half-formed value.
#[derive(Debug, Clone, PartialEq)]
pub enum CallPayload {
    /// No session exists.
    Idle {
        /// Why the previous session went away (`declined`, `ended`, `reset`).
        reason: Option<String>,
        /// Which session just ended, if any.
        ended_call_id: Option<CallId>,
    },
    /// A session exists in a state other than `idle`.
    Active {
        /// Reported state. Never [`CallState::Idle`].
        state: CallState,
        /// The session itself.
        call: CallSession,
        /// Optional human-readable reason.
        reason: Option<String>,
        /// Optional id of a session that ended concurrently.
        ended_call_id: Option<CallId>,
    },
}

impl CallPayload {
    /// Idle payload with no diagnostics; the snapshot default.
    pub fn idle() -> Self {
        CallPayload::Idle {
            reason: None,
            ended_call_id: None,
        }
    }

    /// Payload for an existing session, reporting the session's own state.
    ///
    /// Returns `None` if the session claims to be idle.
    pub fn active(call: CallSession) -> Option<Self> {
        if call.state == CallState::Idle {
            return None;
        }
        Some(CallPayload::Active {
            state: call.state,
            call,
            reason: None,
            ended_call_id: None,
        })
    }

    /// The discriminant state.
    pub fn state(&self) -> CallState {
        match self {
            CallPayload::Idle { .. } => CallState::Idle,
            CallPayload::Active { state, .. } => *state,
        }
    }

    /// The session, if one exists.
    pub fn session(&self) -> Option<&CallSession> {
        match self {
            CallPayload::Idle { .. } => None,
            CallPayload::Active { call, .. } => Some(call),
        }
    }

    /// Optional reason string.
    pub fn reason(&self) -> Option<&str> {
        match self {
            CallPayload::Idle { reason, .. } | CallPayload::Active { reason, .. } => {
                reason.as_deref()
            }
        }
    }

    /// Optional id of the session that just ended.
    pub fn ended_call_id(&self) -> Option<&CallId> {
        match self {
            CallPayload::Idle { ended_call_id, .. }
            | CallPayload::Active { ended_call_id, .. } => ended_call_id.as_ref(),
        }
    }

    fn to_raw(&self) -> RawCallPayload {
        match self {
            CallPayload::Idle {
                reason,
                ended_call_id,
            } => RawCallPayload {
                state: CallState::Idle,
                call: None,
                reason: reason.clone(),
                ended_call_id: ended_call_id.clone(),
            },
            CallPayload::Active {
                state,
                call,
                reason,
                ended_call_id,
            } => RawCallPayload {
                state: *state,
                call: Some(call.clone()),
                reason: reason.clone(),
                ended_call_id: ended_call_id.clone(),
            },
        }
    }

    fn from_raw(raw: RawCallPayload) -> Result<Self, String> {
        match (raw.state, raw.call) {
            (CallState::Idle, None) => Ok(CallPayload::Idle {
                reason: raw.reason,
                ended_call_id: raw.ended_call_id,
            }),
            (CallState::Idle, Some(_)) => Err("idle call payload must not carry a call".into()),
            (state, Some(call)) => Ok(CallPayload::Active {
                state,
                call,
                reason: raw.reason,
                ended_call_id: raw.ended_call_id,
            }),
            (state, None) => Err(format!("call payload in state {state} requires a call")),
        }
    }
}

/// Flat wire shape; only used for (de)serialization.
#[derive(Serialize, Deserialize)]
struct RawCallPayload {
    state: CallState,
    #[serde(default)]
    call: Option<CallSession>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ended_call_id: Option<CallId>,
}

impl Serialize for CallPayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_raw().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CallPayload {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawCallPayload::deserialize(deserializer)?;
        CallPayload::from_raw(raw).map_err(serde::de::Error::custom)
    }
}
