//! The kiosk's live view.
//!
//! [`KioskView`] is the single piece of state the rendering layer reads. Both
//! the startup snapshot and push messages are folded into it here; call data
//! always goes through [`reconcile`], the other domains are direct
//! projections.
//!
//! Transient overlays (volume toast, reaction toast) are dismissed by
//! [`ToastTicket`]s: every show bumps a generation counter, and a dismissal
//! only takes effect if its ticket still matches. A fresh volume event
//! therefore restarts the countdown instead of inheriting the old one.

use kiosk_types::{CallId, CallPayload, CallState, PushMsg, VolumeStatus};

use crate::reconcile::{reconcile, CallMode, Mode};

/// Picture shown until the server provides one.
pub const DEFAULT_PHOTO_URL: &str = "/placeholder.svg";

/// Volume shown until the server provides one.
pub const DEFAULT_VOLUME: VolumeStatus = VolumeStatus {
    volume_percent: 50,
    muted: false,
};

/// Append a cache-defeating `t=<stamp>` query parameter to `url`.
pub fn cache_busted(url: &str, stamp: u64) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}t={stamp}")
}

/// Which transient overlay a ticket belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToastKind {
    /// Volume indicator.
    Volume,
    /// Reaction notification.
    Reaction,
}

/// Handle for dismissing one showing of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToastTicket {
    /// Which toast.
    pub kind: ToastKind,
    generation: u64,
}

/// The most recent reason/ended-call pair the server reported.
///
/// Kept for diagnostics only; it never influences which surface is shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallOutcome {
    /// Server-provided reason (`declined`, `ended`, `reset`, ...).
    pub reason: Option<String>,
    /// Session that ended.
    pub ended_call_id: Option<CallId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Toast {
    generation: u64,
    visible: bool,
}

impl Toast {
    fn show(&mut self) -> u64 {
        self.generation += 1;
        self.visible = true;
        self.generation
    }

    fn dismiss(&mut self, generation: u64) -> bool {
        if self.visible && self.generation == generation {
            self.visible = false;
            return true;
        }
        false
    }
}

/// Everything the rendering layer needs to paint the kiosk.
#[derive(Debug, Clone, PartialEq)]
pub struct KioskView {
    mode: Mode,
    call_mode: Option<CallMode>,
    call_state: CallState,
    photo_url: String,
    volume: VolumeStatus,
    volume_toast: Toast,
    reaction: Option<String>,
    reaction_toast: Toast,
    last_outcome: Option<CallOutcome>,
}

impl Default for KioskView {
    fn default() -> Self {
        Self::new()
    }
}

impl KioskView {
    /// View shown before any snapshot read or push message lands.
    pub fn new() -> Self {
        Self {
            mode: Mode::Picture,
            call_mode: None,
            call_state: CallState::Idle,
            photo_url: DEFAULT_PHOTO_URL.to_string(),
            volume: DEFAULT_VOLUME,
            volume_toast: Toast::default(),
            reaction: None,
            reaction_toast: Toast::default(),
            last_outcome: None,
        }
    }

    /// Current surface.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Current ringing overlay, if any.
    pub fn call_mode(&self) -> Option<CallMode> {
        self.call_mode
    }

    /// Last call state applied.
    pub fn call_state(&self) -> CallState {
        self.call_state
    }

    /// Address of the photo to display (already cache-busted).
    pub fn photo_url(&self) -> &str {
        &self.photo_url
    }

    /// Last volume applied.
    pub fn volume(&self) -> VolumeStatus {
        self.volume
    }

    /// Whether the volume toast is showing.
    pub fn volume_visible(&self) -> bool {
        self.volume_toast.visible
    }

    /// Reaction text currently showing, if any.
    pub fn reaction(&self) -> Option<&str> {
        if self.reaction_toast.visible {
            self.reaction.as_deref()
        } else {
            None
        }
    }

    /// Diagnostics from the last call payload that carried any.
    pub fn last_outcome(&self) -> Option<&CallOutcome> {
        self.last_outcome.as_ref()
    }

    /// Fold one push message into the view.
    ///
    /// `stamp` is the cache-buster used for pictures (typically the current
    /// time in milliseconds). Returns a ticket when the message showed a
    /// toast that must later be dismissed.
    pub fn apply(&mut self, msg: &PushMsg, stamp: u64) -> Option<ToastTicket> {
        match msg {
            PushMsg::Volume(status) => Some(self.apply_volume(*status)),
            PushMsg::Picture(update) => {
                self.apply_picture(&update.url, stamp);
                None
            }
            PushMsg::Call(payload) => {
                self.apply_call(payload);
                None
            }
            PushMsg::Reaction(reaction) => Some(self.apply_reaction(&reaction.message)),
        }
    }

    /// Overwrite call projections with the reconciled payload.
    pub fn apply_call(&mut self, payload: &CallPayload) {
        let (mode, call_mode) = reconcile(payload);
        self.mode = mode;
        self.call_mode = call_mode;
        self.call_state = payload.state();

        if payload.reason().is_some() || payload.ended_call_id().is_some() {
            self.last_outcome = Some(CallOutcome {
                reason: payload.reason().map(str::to_string),
                ended_call_id: payload.ended_call_id().cloned(),
            });
        }
    }

    /// Show a new picture. Does not leave the call surface.
    pub fn apply_picture(&mut self, url: &str, stamp: u64) {
        self.photo_url = cache_busted(url, stamp);
        if self.mode != Mode::Call {
            self.mode = Mode::Picture;
        }
    }

    /// Show a volume change and (re)start the toast.
    pub fn apply_volume(&mut self, status: VolumeStatus) -> ToastTicket {
        self.volume = status;
        ToastTicket {
            kind: ToastKind::Volume,
            generation: self.volume_toast.show(),
        }
    }

    /// Record the volume without flashing the toast (startup seed).
    pub fn seed_volume(&mut self, status: VolumeStatus) {
        self.volume = status;
    }

    /// Show a reaction notification.
    pub fn apply_reaction(&mut self, message: &str) -> ToastTicket {
        self.reaction = Some(message.to_string());
        ToastTicket {
            kind: ToastKind::Reaction,
            generation: self.reaction_toast.show(),
        }
    }

    /// Hide a toast if `ticket` is still the latest showing of it.
    ///
    /// Returns true if the view changed.
    pub fn dismiss(&mut self, ticket: ToastTicket) -> bool {
        match ticket.kind {
            ToastKind::Volume => self.volume_toast.dismiss(ticket.generation),
            ToastKind::Reaction => {
                let hidden = self.reaction_toast.dismiss(ticket.generation);
                if hidden {
                    self.reaction = None;
                }
                hidden
            }
        }
    }
}
