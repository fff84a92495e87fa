//! Push connection state machine.
//!
//! This module provides a pure, side-effect-free state machine for the
//! lifecycle of the single server-push connection. The state machine takes
//! events as input and produces a new state plus a list of actions to execute.
//!
//! The actual I/O (opening the stream, sleeping, closing) is performed by
//! kiosk-client, not by this module.

use std::time::Duration;

use crate::BackoffPolicy;

/// Connection state machine - NO I/O, just state transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    /// Not started yet.
    Idle,
    /// Opening the stream.
    Connecting {
        /// Consecutive failures since the last successful open.
        attempt: u32,
    },
    /// Stream is open and delivering messages.
    Open,
    /// Disrupted, waiting for the reconnect timer.
    Waiting {
        /// Consecutive failures since the last successful open.
        attempt: u32,
        /// Delay the pending timer was scheduled with.
        delay: Duration,
    },
    /// Torn down. Terminal.
    Stopped,
}

impl ConnectionState {
    /// Create a new state machine in the Idle state.
    pub fn new() -> Self {
        Self::Idle
    }

    /// Process an event and return the new state plus actions to execute.
    ///
    /// This is a pure function - no side effects. The caller is responsible
    /// for executing the returned actions in order.
    pub fn on_event(self, event: Event, policy: &BackoffPolicy) -> (Self, Vec<Action>) {
        match (self, event) {
            // Stopped absorbs everything, including late timers and frames
            (Self::Stopped, _) => (Self::Stopped, vec![]),

            (_, Event::StopRequested) => (Self::Stopped, stop_actions()),

            // From Idle
            (Self::Idle, Event::StartRequested) => {
                (Self::Connecting { attempt: 0 }, vec![Action::Connect])
            }

            // From Connecting
            (Self::Connecting { .. }, Event::Opened) => (
                Self::Open,
                vec![Action::EmitEvent(LinkEvent::Opened)],
            ),
            (Self::Connecting { attempt }, Event::Failed { error }) => {
                disrupted(attempt, error, policy)
            }

            // From Open
            (Self::Open, Event::Closed { reason }) => disrupted(0, reason, policy),

            // From Waiting
            (Self::Waiting { attempt, .. }, Event::RetryTimerFired) => {
                (Self::Connecting { attempt }, vec![Action::Connect])
            }

            // Invalid transitions - stay in current state
            (state, _) => (state, vec![]),
        }
    }

    /// Check if the stream is open.
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }

    /// Check if torn down.
    pub fn is_stopped(&self) -> bool {
        matches!(self, Self::Stopped)
    }

    /// Consecutive failures since the last successful open.
    pub fn attempt(&self) -> u32 {
        match self {
            Self::Connecting { attempt } | Self::Waiting { attempt, .. } => *attempt,
            Self::Idle | Self::Open | Self::Stopped => 0,
        }
    }
}

impl Default for ConnectionState {
    fn default() -> Self {
        Self::new()
    }
}

/// Close the broken stream first, then schedule the next attempt.
fn disrupted(attempt: u32, reason: String, policy: &BackoffPolicy) -> (ConnectionState, Vec<Action>) {
    let delay = policy.delay(attempt);
    let next = policy.next_attempt(attempt);
    (
        ConnectionState::Waiting {
            attempt: next,
            delay,
        },
        vec![
            Action::Close,
            Action::EmitEvent(LinkEvent::Disrupted {
                reason,
                attempt: next,
            }),
            Action::StartReconnectTimer { delay },
        ],
    )
}

fn stop_actions() -> Vec<Action> {
    vec![
        Action::CancelReconnect,
        Action::Close,
        Action::EmitEvent(LinkEvent::Stopped),
    ]
}

/// Events that can occur in the connection lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Owner asked the client to start.
    StartRequested,
    /// The stream opened successfully.
    Opened,
    /// Opening the stream failed.
    Failed {
        /// Error message describing the failure.
        error: String,
    },
    /// An open stream errored or reached its end.
    Closed {
        /// Reason for the close.
        reason: String,
    },
    /// Reconnect timer fired.
    RetryTimerFired,
    /// Owner asked the client to stop.
    StopRequested,
}

/// Actions to be executed by kiosk-client.
///
/// These are instructions, not side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Open a new stream.
    Connect,
    /// Close the current stream, if any.
    Close,
    /// Start a timer for reconnection.
    StartReconnectTimer {
        /// Delay before attempting reconnection.
        delay: Duration,
    },
    /// Cancel any pending reconnect timer.
    CancelReconnect,
    /// Report a lifecycle change to the owner.
    EmitEvent(LinkEvent),
}

/// Lifecycle changes reported to the owner (for logging; never shown on screen).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkEvent {
    /// Stream opened; backoff reset.
    Opened,
    /// Stream failed or closed; a reconnect is scheduled.
    Disrupted {
        /// Why.
        reason: String,
        /// Attempt counter after this failure.
        attempt: u32,
    },
    /// Torn down by the owner.
    Stopped,
}
