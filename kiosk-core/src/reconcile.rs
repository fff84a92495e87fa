//! Call state reconciliation.
//!
//! [`reconcile`] is the only way a [`CallMode`] comes into existence. It is
//! applied to every call payload, whether it came from the startup snapshot
//! or a push event, and its result overwrites whatever was shown before.
//!
//! Call payloads carry no sequence number, so the view is last-write-wins:
//! a stale payload that arrives late (a slow snapshot, or a push delayed by a
//! reconnect gap) replaces a newer one.

use kiosk_types::{CallPayload, CallState};
use std::fmt;

/// Which surface the kiosk shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// The current photo.
    Picture,
    /// The call surface.
    Call,
    /// Call-ended screen. Never produced by [`reconcile`].
    Ended,
    /// Setup instructions. Never produced by [`reconcile`].
    Instructions,
}

impl Mode {
    /// Lower-case name, as the rendering layer spells it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Picture => "picture",
            Mode::Call => "call",
            Mode::Ended => "ended",
            Mode::Instructions => "instructions",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which ringing overlay to mount over the call surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallMode {
    /// "Calling..." overlay; this kiosk placed the call.
    Caller,
    /// "Incoming call" overlay; a peer is calling.
    Callee,
}

impl CallMode {
    /// Lower-case name, as the rendering layer spells it.
    pub fn as_str(&self) -> &'static str {
        match self {
            CallMode::Caller => "caller",
            CallMode::Callee => "callee",
        }
    }
}

impl fmt::Display for CallMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a call payload to `(Mode, CallMode)`.
///
/// Total over [`CallState`] and free of hidden state: the same payload always
/// yields the same projection.
pub fn reconcile(payload: &CallPayload) -> (Mode, Option<CallMode>) {
    project(payload.state())
}

fn project(state: CallState) -> (Mode, Option<CallMode>) {
    match state {
        CallState::Idle | CallState::Ended => (Mode::Picture, None),
        CallState::OutgoingRinging => (Mode::Call, Some(CallMode::Caller)),
        CallState::IncomingRinging => (Mode::Call, Some(CallMode::Callee)),
        CallState::Connecting | CallState::InCall => (Mode::Call, None),
    }
}
