//! Full session scenarios: snapshot seeding plus push stream over HTTP.

#[cfg(test)]
mod tests {
    use crate::fixture::{FixtureServer, Reply};
    use crate::{eventually, fast_config};
    use kiosk_client::{HttpSnapshotSource, HttpTransport, Kiosk};
    use kiosk_core::{CallMode, Mode};
    use serde_json::json;
    use std::time::Duration;

    const WAIT: Duration = Duration::from_secs(5);

    fn call(state: &str) -> serde_json::Value {
        if state == "idle" {
            return json!({"event": "call", "data": {"state": "idle", "call": null, "reason": "ended"}});
        }
        json!({"event": "call", "data": {
            "state": state,
            "call": {"call_id": "c-21", "state": state, "created_at": 1705000000.0},
        }})
    }

    async fn start(server: &FixtureServer) -> Kiosk {
        let config = fast_config(&server.base_url());
        let transport = HttpTransport::new(Duration::from_secs(1)).unwrap();
        let source = HttpSnapshotSource::from_config(&config).unwrap();
        Kiosk::start(&config, transport, source)
    }

    /// Snapshot idle, then a call rings in, connects and ends.
    #[tokio::test]
    async fn call_lifecycle_end_to_end() {
        let server = FixtureServer::start().await.unwrap();
        let kiosk = start(&server).await;

        assert!(eventually(WAIT, || kiosk.current().photo_url().starts_with("/pics/current.jpg?t=")).await);
        assert!(eventually(WAIT, || server.open_streams() == 1).await);
        let view = kiosk.current();
        assert_eq!((view.mode(), view.call_mode()), (Mode::Picture, None));

        server.send_json(call("incoming_ringing"));
        assert!(eventually(WAIT, || kiosk.current().call_mode() == Some(CallMode::Callee)).await);
        assert_eq!(kiosk.current().mode(), Mode::Call);

        server.send_json(call("in_call"));
        assert!(eventually(WAIT, || kiosk.current().call_mode().is_none()).await);
        assert_eq!(kiosk.current().mode(), Mode::Call);

        server.send_json(call("idle"));
        assert!(eventually(WAIT, || kiosk.current().mode() == Mode::Picture).await);
        let view = kiosk.current();
        assert_eq!(view.call_mode(), None);
        assert_eq!(view.last_outcome().and_then(|o| o.reason.as_deref()), Some("ended"));

        kiosk.stop().await;
    }

    /// The session keeps working across a server restart, and snapshot
    /// failures do not hold up the stream.
    #[tokio::test]
    async fn session_survives_drop_and_failed_snapshot() {
        let server = FixtureServer::start().await.unwrap();
        server.set_call(Reply::Status(500));
        server.set_volume(Reply::Status(500));
        let kiosk = start(&server).await;

        assert!(eventually(WAIT, || server.open_streams() == 1).await);
        server.drop_streams();
        assert!(eventually(WAIT, || server.event_requests() >= 2 && server.open_streams() == 1).await);

        server.send_json(json!({"event": "volume", "data": {"volume_percent": 20, "muted": false}}));
        assert!(eventually(WAIT, || kiosk.current().volume().volume_percent == 20).await);
        assert!(kiosk.current().volume_visible());

        kiosk.stop().await;
    }
}
