//! Replay a recorded event stream.
//!
//! Feeds the file through the same decoder and message parser the push
//! client uses, and reports what would have reached the handler.

use anyhow::{Context, Result};
use kiosk_core::{EventStreamDecoder, SseEvent};
use kiosk_types::PushMsg;
use std::path::Path;

/// What the push client does with one dispatched event.
#[derive(Debug)]
pub enum Outcome {
    /// Parsed and handed to the handler.
    Delivered(PushMsg),
    /// Carried an `event:` type other than `message`.
    Ignored(String),
    /// Body failed to parse.
    Dropped(String),
}

/// Decode a whole recorded body.
pub fn decode(body: &[u8]) -> Vec<Outcome> {
    let mut decoder = EventStreamDecoder::new();
    decoder.feed(body).into_iter().map(classify).collect()
}

fn classify(event: SseEvent) -> Outcome {
    if !event.is_message() {
        return Outcome::Ignored(event.event.unwrap_or_default());
    }
    match PushMsg::from_json(&event.data) {
        Ok(msg) => Outcome::Delivered(msg),
        Err(e) => Outcome::Dropped(e.to_string()),
    }
}

/// Run the decode command.
pub async fn run(path: &Path) -> Result<()> {
    let body = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let outcomes = decode(&body);
    let mut delivered = 0;
    for (i, outcome) in outcomes.iter().enumerate() {
        match outcome {
            Outcome::Delivered(msg) => {
                delivered += 1;
                println!("[{i}] {}: {msg:?}", msg.event());
            }
            Outcome::Ignored(kind) => println!("[{i}] ignored (event: {kind})"),
            Outcome::Dropped(reason) => println!("[{i}] dropped: {reason}"),
        }
    }

    println!();
    println!("{delivered} of {} events delivered", outcomes.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAPTURE: &str = ": ping\n\n\
data: {\"event\":\"volume\",\"data\":{\"volume_percent\":30,\"muted\":false}}\n\n\
event: status\ndata: {}\n\n\
data: {\"event\":\"fireworks\",\"data\":{}}\n\n\
data: {\"event\":\"call\",\"data\":{\"state\":\"idle\",\"call\":null,\"reason\":\"declined\"}}\n\n";

    #[test]
    fn classifies_each_event() {
        let outcomes = decode(CAPTURE.as_bytes());
        assert_eq!(outcomes.len(), 4);
        assert!(matches!(&outcomes[0], Outcome::Delivered(PushMsg::Volume(v)) if v.volume_percent == 30));
        assert!(matches!(&outcomes[1], Outcome::Ignored(kind) if kind == "status"));
        assert!(matches!(&outcomes[2], Outcome::Dropped(_)));
        assert!(matches!(&outcomes[3], Outcome::Delivered(PushMsg::Call(p)) if p.reason() == Some("declined")));
    }

    #[test]
    fn trailing_partial_event_not_dispatched() {
        let outcomes = decode(b"data: {\"event\":\"reaction\",\"data\":{\"message\":\"x\"}}\n");
        assert!(outcomes.is_empty());
    }
}
