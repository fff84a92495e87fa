//! Push stream scenarios: the client must stay attached through server
//! restarts, refusals and bad payloads.

#[cfg(test)]
mod tests {
    use crate::fixture::{EventsReply, FixtureServer};
    use crate::{eventually, fast_config};
    use kiosk_client::{HttpTransport, PushEventClient};
    use kiosk_types::PushMsg;
    use serde_json::json;
    use std::time::Duration;
    use tokio::sync::mpsc;
    use tokio::time::timeout;

    const WAIT: Duration = Duration::from_secs(5);

    fn volume(percent: u8) -> serde_json::Value {
        json!({"event": "volume", "data": {"volume_percent": percent, "muted": false}})
    }

    fn start_client(server: &FixtureServer) -> (PushEventClient, mpsc::UnboundedReceiver<PushMsg>) {
        let config = fast_config(&server.base_url());
        let transport = HttpTransport::new(Duration::from_secs(1)).unwrap();
        let (tx, rx) = mpsc::unbounded_channel();
        let client = PushEventClient::start(
            config.events_url(),
            config.reconnect.policy(),
            transport,
            move |msg| {
                let _ = tx.send(msg);
            },
        );
        (client, rx)
    }

    async fn next(rx: &mut mpsc::UnboundedReceiver<PushMsg>) -> PushMsg {
        timeout(WAIT, rx.recv())
            .await
            .expect("timed out waiting for a message")
            .expect("handler dropped")
    }

    // ========================================================================
    // Delivery over a real stream
    // ========================================================================

    /// Messages sent by the server arrive in order.
    #[tokio::test]
    async fn stream_delivers_in_order() {
        let server = FixtureServer::start().await.unwrap();
        let (client, mut rx) = start_client(&server);
        assert!(eventually(WAIT, || server.open_streams() == 1).await);

        server.send_json(volume(10));
        server.send_json(json!({"event": "reaction", "data": {"message": "🙂"}}));
        server.send_json(json!({"event": "picture", "data": {"url": "/pics/b.jpg"}}));

        assert!(matches!(next(&mut rx).await, PushMsg::Volume(v) if v.volume_percent == 10));
        assert!(matches!(next(&mut rx).await, PushMsg::Reaction(r) if r.message == "🙂"));
        assert!(matches!(next(&mut rx).await, PushMsg::Picture(p) if p.url == "/pics/b.jpg"));
        client.stop().await;
    }

    /// Garbage, unknown events and typed events are skipped without
    /// disturbing the stream.
    #[tokio::test]
    async fn garbage_does_not_break_stream() {
        let server = FixtureServer::start().await.unwrap();
        let (client, mut rx) = start_client(&server);
        assert!(eventually(WAIT, || server.open_streams() == 1).await);

        server.send("{{{ definitely not json");
        server.send_json(json!({"event": "brightness", "data": {"level": 3}}));
        server.send_json(json!({"event": "call", "data": {"state": "in_call", "call": null}}));
        server.send_typed("status", &volume(99).to_string());
        server.send_json(volume(33));

        assert!(matches!(next(&mut rx).await, PushMsg::Volume(v) if v.volume_percent == 33));
        assert_eq!(server.event_requests(), 1);
        client.stop().await;
    }

    // ========================================================================
    // Disruption and recovery
    // ========================================================================

    /// A server-side close is followed by a fresh request and delivery resumes.
    #[tokio::test]
    async fn reconnects_after_server_drop() {
        let server = FixtureServer::start().await.unwrap();
        let (client, mut rx) = start_client(&server);
        assert!(eventually(WAIT, || server.open_streams() == 1).await);

        server.drop_streams();
        assert!(eventually(WAIT, || server.event_requests() >= 2 && server.open_streams() == 1).await);

        server.send_json(volume(61));
        assert!(matches!(next(&mut rx).await, PushMsg::Volume(v) if v.volume_percent == 61));
        client.stop().await;
    }

    /// Error statuses count as failed attempts; the client keeps retrying
    /// until the server recovers.
    #[tokio::test]
    async fn retries_through_error_statuses() {
        let server = FixtureServer::start().await.unwrap();
        server.set_events_reply(EventsReply::Status(503));
        let (client, mut rx) = start_client(&server);

        assert!(eventually(WAIT, || server.event_requests() >= 3).await);
        assert_eq!(server.open_streams(), 0);

        server.set_events_reply(EventsReply::Stream);
        assert!(eventually(WAIT, || server.open_streams() == 1).await);

        server.send_json(volume(5));
        assert!(matches!(next(&mut rx).await, PushMsg::Volume(v) if v.volume_percent == 5));
        client.stop().await;
    }

    /// A 200 that is not an event stream is a failed attempt too.
    #[tokio::test]
    async fn wrong_content_type_is_not_open() {
        let server = FixtureServer::start().await.unwrap();
        server.set_events_reply(EventsReply::PlainText);
        let (client, mut rx) = start_client(&server);

        assert!(eventually(WAIT, || server.event_requests() >= 3).await);
        client.stop().await;
        assert!(rx.recv().await.is_none());
    }

    // ========================================================================
    // Teardown
    // ========================================================================

    /// Nothing reaches the handler after stop, even with the server still
    /// sending.
    #[tokio::test]
    async fn silent_after_stop() {
        let server = FixtureServer::start().await.unwrap();
        let (client, mut rx) = start_client(&server);
        assert!(eventually(WAIT, || server.open_streams() == 1).await);

        client.stop().await;
        server.send_json(volume(77));
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(rx.recv().await.is_none());
        let requests = server.event_requests();
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(server.event_requests(), requests);
    }
}
