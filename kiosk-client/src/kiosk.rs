//! Kiosk - the live view session.
//!
//! [`Kiosk`] ties the pieces together: it seeds a [`KioskView`] from the
//! startup snapshot, keeps it current from the push stream, and dismisses
//! toasts when their display time runs out. The rendering layer only ever
//! reads the view through a `watch` channel.
//!
//! Snapshot reads and the push stream start together. Each snapshot read is
//! applied as soon as it resolves, so a slow read can overwrite a newer push
//! event (call payloads carry no sequence number).
//!
//! ```text
//! SnapshotSource ──┐
//!                  ├──> ViewDispatcher ──> watch<KioskView> ──> renderer
//! PushEventClient ─┘          │
//!                       toast timers
//! ```

use kiosk_core::{KioskView, ToastKind, ToastTicket};
use kiosk_types::PushMsg;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::config::{DisplayConfig, KioskConfig};
use crate::events::PushEventClient;
use crate::snapshot::{read_call, read_picture, read_volume, SnapshotSource};
use crate::transport::Transport;

/// A running kiosk session.
#[derive(Debug)]
pub struct Kiosk {
    view: Arc<watch::Sender<KioskView>>,
    stop: watch::Sender<bool>,
    events: PushEventClient,
    seeding: JoinHandle<()>,
}

impl Kiosk {
    /// Start the snapshot reads and the push stream.
    ///
    /// Must be called within a tokio runtime.
    pub fn start<T, S>(config: &KioskConfig, transport: T, source: S) -> Self
    where
        T: Transport + 'static,
        S: SnapshotSource + 'static,
    {
        let (view, _) = watch::channel(KioskView::new());
        let view = Arc::new(view);
        let (stop, stop_rx) = watch::channel(false);
        let dispatcher = ViewDispatcher {
            view: Arc::clone(&view),
            display: config.display.clone(),
            stop: stop_rx,
        };

        tracing::info!(base_url = %config.server.base_url, "starting kiosk session");
        let seeding = tokio::spawn(seed(dispatcher.clone(), source));

        let events = PushEventClient::start(
            config.events_url(),
            config.reconnect.policy(),
            transport,
            move |msg| dispatcher.push(&msg),
        );

        Self {
            view,
            stop,
            events,
            seeding,
        }
    }

    /// Subscribe to view changes.
    pub fn view(&self) -> watch::Receiver<KioskView> {
        self.view.subscribe()
    }

    /// Copy of the current view.
    pub fn current(&self) -> KioskView {
        self.view.borrow().clone()
    }

    /// Stop the push stream, abandon outstanding snapshot reads and toast
    /// timers. The view no longer changes once this returns.
    pub async fn stop(self) {
        // receivers live in the dispatcher, which the push task holds until it exits
        let _ = self.stop.send(true);
        // writers check the flag under the view lock; taking it once waits
        // out a write that started before the flag flipped
        self.view.send_if_modified(|_| false);
        self.events.stop().await;
        if let Err(e) = self.seeding.await {
            tracing::warn!(error = %e, "snapshot task ended abnormally");
        }
        tracing::info!("kiosk session stopped");
    }
}

/// Folds inputs into the shared view and runs toast timers.
#[derive(Debug, Clone)]
struct ViewDispatcher {
    view: Arc<watch::Sender<KioskView>>,
    display: DisplayConfig,
    stop: watch::Receiver<bool>,
}

impl ViewDispatcher {
    /// Apply `change` unless the session is stopped. Subscribers are only
    /// notified when `change` reports a modification.
    fn modify(&self, change: impl FnOnce(&mut KioskView) -> bool) -> bool {
        self.view
            .send_if_modified(|view| !*self.stop.borrow() && change(view))
    }

    fn push(&self, msg: &PushMsg) {
        tracing::debug!(event = %msg.event(), "applying push message");
        let mut ticket = None;
        self.modify(|view| {
            ticket = view.apply(msg, stamp());
            true
        });
        if let Some(ticket) = ticket {
            self.schedule_dismiss(ticket);
        }
    }

    fn update(&self, apply: impl FnOnce(&mut KioskView)) {
        self.modify(|view| {
            apply(view);
            true
        });
    }

    fn schedule_dismiss(&self, ticket: ToastTicket) {
        let after = match ticket.kind {
            ToastKind::Volume => self.display.volume_toast(),
            ToastKind::Reaction => self.display.reaction_toast(),
        };
        let dispatcher = self.clone();
        let mut stop = self.stop.clone();
        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = stop.wait_for(|stopped| *stopped) => {}
                _ = tokio::time::sleep(after) => {
                    // a newer showing of the same toast turns this into a no-op
                    dispatcher.modify(|view| view.dismiss(ticket));
                }
            }
        });
    }
}

/// Apply each snapshot read as soon as it resolves.
async fn seed<S: SnapshotSource>(dispatcher: ViewDispatcher, source: S) {
    let mut stop = dispatcher.stop.clone();
    let reads = async {
        tokio::join!(
            async {
                let payload = read_call(&source).await;
                dispatcher.update(|view| view.apply_call(&payload));
            },
            async {
                let url = read_picture(&source).await;
                dispatcher.update(|view| view.apply_picture(&url, stamp()));
            },
            async {
                let volume = read_volume(&source).await;
                dispatcher.update(|view| view.seed_volume(volume));
            },
        );
    };
    tokio::select! {
        biased;
        _ = stop.wait_for(|stopped| *stopped) => {}
        _ = reads => tracing::debug!("snapshot applied"),
    }
}

/// Cache-buster for picture addresses: wall-clock milliseconds.
fn stamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
