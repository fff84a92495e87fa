//! PushEventClient - the self-healing push stream.
//!
//! # Architecture
//!
//! The client owns one background task. The task feeds connection events
//! into the pure state machine from kiosk-core and interprets the actions it
//! returns, performing the actual I/O via the Transport trait.
//!
//! ```text
//! Transport → PushEventClient task → handler(PushMsg)
//!                   ↓
//!              kiosk-core (ConnectionState, BackoffPolicy)
//! ```
//!
//! Every suspension point (connecting, waiting for the next event, waiting
//! out a backoff delay) races against the stop signal, and the signal is
//! checked again right before the handler runs. Once [`PushEventClient::stop`]
//! returns, the task has exited and the handler has been dropped.
//!
//! # Example
//!
//! ```ignore
//! use kiosk_client::{HttpTransport, PushEventClient};
//! use kiosk_core::BackoffPolicy;
//!
//! let transport = HttpTransport::new(Duration::from_secs(10))?;
//! let client = PushEventClient::start(
//!     "http://127.0.0.1:8000/api/events",
//!     BackoffPolicy::default(),
//!     transport,
//!     |msg| println!("{msg:?}"),
//! );
//! // ...
//! client.stop().await;
//! ```

use kiosk_core::{Action, BackoffPolicy, ConnectionState, Event, LinkEvent, SseEvent};
use kiosk_types::PushMsg;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::transport::Transport;

/// Handle to a running push stream.
///
/// Dropping the handle without calling [`stop`](Self::stop) also stops the
/// stream, but without waiting for the task to finish.
#[derive(Debug)]
pub struct PushEventClient {
    stop: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl PushEventClient {
    /// Start streaming from `url`.
    ///
    /// `handler` is invoked once per successfully parsed message, in arrival
    /// order, from the client's own task. Must be called within a tokio
    /// runtime.
    pub fn start<T, F>(url: impl Into<String>, policy: BackoffPolicy, transport: T, handler: F) -> Self
    where
        T: Transport + 'static,
        F: FnMut(PushMsg) + Send + 'static,
    {
        let (stop, stop_rx) = watch::channel(false);
        let driver = Driver {
            url: url.into(),
            policy,
            transport,
            handler,
            stop: stop_rx,
            state: ConnectionState::new(),
        };
        let task = tokio::spawn(driver.run());
        Self { stop, task }
    }

    /// Tear the stream down and wait for the task to exit.
    ///
    /// Cancels a pending reconnect and closes the open stream. No handler
    /// call happens after this returns.
    pub async fn stop(self) {
        // Err only if the task already exited and dropped its receiver
        let _ = self.stop.send(true);
        if let Err(e) = self.task.await {
            tracing::warn!(error = %e, "push task ended abnormally");
        }
    }
}

struct Driver<T, F> {
    url: String,
    policy: BackoffPolicy,
    transport: T,
    handler: F,
    stop: watch::Receiver<bool>,
    state: ConnectionState,
}

impl<T, F> Driver<T, F>
where
    T: Transport,
    F: FnMut(PushMsg),
{
    async fn run(mut self) {
        let mut event = Event::StartRequested;
        loop {
            let (state, actions) = self.state.clone().on_event(event, &self.policy);
            self.state = state;

            let mut next = None;
            for action in actions {
                if let Some(follow_up) = self.execute(action).await {
                    next = Some(follow_up);
                }
            }

            event = match next {
                Some(follow_up) => follow_up,
                None if self.state.is_open() => self.pump().await,
                None => break,
            };
        }
    }

    /// Perform one action; returns the event its outcome produced, if any.
    async fn execute(&mut self, action: Action) -> Option<Event> {
        match action {
            Action::Connect => {
                tracing::debug!(url = %self.url, attempt = self.state.attempt(), "opening push stream");
                let outcome = tokio::select! {
                    biased;
                    _ = stop_requested(&mut self.stop) => return Some(Event::StopRequested),
                    outcome = self.transport.connect(&self.url) => outcome,
                };
                Some(match outcome {
                    Ok(()) => Event::Opened,
                    Err(e) => Event::Failed {
                        error: e.to_string(),
                    },
                })
            }
            Action::Close => {
                if let Err(e) = self.transport.close().await {
                    tracing::debug!(error = %e, "closing push stream failed");
                }
                None
            }
            Action::StartReconnectTimer { delay } => {
                tracing::debug!(delay_ms = delay.as_millis() as u64, "reconnect scheduled");
                tokio::select! {
                    biased;
                    _ = stop_requested(&mut self.stop) => Some(Event::StopRequested),
                    _ = tokio::time::sleep(delay) => Some(Event::RetryTimerFired),
                }
            }
            // the timer is the sleep above; leaving that select dropped it
            Action::CancelReconnect => None,
            Action::EmitEvent(link) => {
                log_link_event(&self.url, &link);
                None
            }
        }
    }

    /// Deliver messages until the stream fails or a stop is requested.
    async fn pump(&mut self) -> Event {
        loop {
            let received = tokio::select! {
                biased;
                _ = stop_requested(&mut self.stop) => return Event::StopRequested,
                received = self.transport.recv() => received,
            };
            match received {
                Ok(frame) => self.deliver(frame),
                Err(e) => {
                    return Event::Closed {
                        reason: e.to_string(),
                    }
                }
            }
        }
    }

    fn deliver(&mut self, frame: SseEvent) {
        if !frame.is_message() {
            tracing::debug!(event = ?frame.event, "ignoring typed event");
            return;
        }
        match PushMsg::from_json(&frame.data) {
            Ok(msg) => {
                if *self.stop.borrow() {
                    return;
                }
                (self.handler)(msg);
            }
            Err(e) => tracing::debug!(error = %e, "dropping malformed push message"),
        }
    }
}

/// Resolves once a stop was requested or the owning handle went away.
async fn stop_requested(stop: &mut watch::Receiver<bool>) {
    // a closed channel means the handle was dropped; treat that as stop
    let _ = stop.wait_for(|stopped| *stopped).await;
}

fn log_link_event(url: &str, link: &LinkEvent) {
    match link {
        LinkEvent::Opened => tracing::info!(url, "push stream opened"),
        LinkEvent::Disrupted { reason, attempt } => {
            tracing::warn!(url, %reason, attempt, "push stream disrupted")
        }
        LinkEvent::Stopped => tracing::info!(url, "push stream stopped"),
    }
}
