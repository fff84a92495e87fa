//! CLI command implementations.

pub mod decode;
pub mod snapshot;
pub mod watch;

use kiosk_core::KioskView;
use kiosk_types::MAX_VOLUME_LEVEL;

/// One-line summary of a view, as printed by `watch` and `snapshot`.
pub fn describe(view: &KioskView) -> String {
    let call_mode = view.call_mode().map_or("-", |m| m.as_str());
    let mut line = format!(
        "mode={} call_mode={} call_state={} photo={} volume={}/{}{}",
        view.mode(),
        call_mode,
        view.call_state(),
        view.photo_url(),
        view.volume().level(),
        MAX_VOLUME_LEVEL,
        if view.volume().muted { " (muted)" } else { "" },
    );
    if view.volume_visible() {
        line.push_str(" [volume toast]");
    }
    if let Some(reaction) = view.reaction() {
        line.push_str(&format!(" [reaction {reaction}]"));
    }
    if let Some(outcome) = view.last_outcome() {
        let reason = outcome.reason.as_deref().unwrap_or("-");
        match &outcome.ended_call_id {
            Some(id) => line.push_str(&format!(" last_outcome={reason}({id})")),
            None => line.push_str(&format!(" last_outcome={reason}")),
        }
    }
    line
}
