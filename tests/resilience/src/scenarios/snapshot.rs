//! Snapshot scenarios: startup reads against healthy, failing and garbled
//! endpoints.

#[cfg(test)]
mod tests {
    use crate::fast_config;
    use crate::fixture::{FixtureServer, Reply};
    use kiosk_client::{HttpSnapshotSource, Snapshot, SnapshotError, SnapshotSource};
    use kiosk_types::{CallPayload, CallState};
    use serde_json::json;
    use std::time::Duration;

    fn source(server: &FixtureServer) -> HttpSnapshotSource {
        HttpSnapshotSource::from_config(&fast_config(&server.base_url())).unwrap()
    }

    /// Healthy endpoints are read as-is.
    #[tokio::test]
    async fn reads_server_values() {
        let server = FixtureServer::start().await.unwrap();
        server.set_call(Reply::Json(json!({
            "state": "outgoing_ringing",
            "call": {"call_id": "c-12", "state": "outgoing_ringing", "created_at": 1705000000.0},
        })));
        server.set_volume(Reply::Json(json!({"volume_percent": 90, "muted": true})));

        let snapshot = Snapshot::fetch(&source(&server)).await;
        assert_eq!(snapshot.call.state(), CallState::OutgoingRinging);
        assert_eq!(snapshot.call.session().unwrap().call_id.as_str(), "c-12");
        assert_eq!(snapshot.picture_url, "/pics/current.jpg");
        assert_eq!(snapshot.volume.volume_percent, 90);
        assert!(snapshot.volume.muted);
    }

    /// Every endpoint failing yields the documented defaults.
    #[tokio::test]
    async fn error_statuses_fall_back_to_defaults() {
        let server = FixtureServer::start().await.unwrap();
        server.set_call(Reply::Status(500));
        server.set_picture(Reply::Status(404));
        server.set_volume(Reply::Status(502));

        let source = source(&server);
        assert_eq!(source.volume().await, Err(SnapshotError::Status(502)));

        let snapshot = Snapshot::fetch(&source).await;
        assert_eq!(snapshot, Snapshot::default());
    }

    /// A body of the wrong shape is a decode failure, replaced by the default.
    #[tokio::test]
    async fn malformed_body_falls_back() {
        let server = FixtureServer::start().await.unwrap();
        server.set_call(Reply::Json(json!({"state": "in_call", "call": null})));

        let source = source(&server);
        assert!(matches!(source.call_state().await, Err(SnapshotError::Decode(_))));

        let snapshot = Snapshot::fetch(&source).await;
        assert_eq!(snapshot.call, CallPayload::idle());
        assert_eq!(snapshot.picture_url, "/pics/current.jpg");
    }

    /// No server at all: every read defaults and none of them hangs.
    #[tokio::test]
    async fn unreachable_server_defaults() {
        let server = FixtureServer::start().await.unwrap();
        let base_url = server.base_url();
        drop(server);
        tokio::time::sleep(Duration::from_millis(50)).await;

        let source = HttpSnapshotSource::from_config(&fast_config(&base_url)).unwrap();
        let snapshot = tokio::time::timeout(Duration::from_secs(5), Snapshot::fetch(&source))
            .await
            .expect("snapshot reads hung");
        assert_eq!(snapshot, Snapshot::default());
    }
}
