//! Local kiosk API fixture.
//!
//! Serves `/api/events` as a `text/event-stream` plus the three snapshot
//! endpoints, all scriptable from the test. Binds `127.0.0.1:0`, so tests
//! can run in parallel.

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use futures_util::stream;
use serde_json::Value;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

/// How the server answers `GET /api/events`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventsReply {
    /// Open an event stream.
    Stream,
    /// Refuse with this status.
    Status(u16),
    /// Answer 200 with a `text/plain` body.
    PlainText,
}

/// How the server answers one snapshot endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// 200 with this JSON body.
    Json(Value),
    /// Empty body with this status.
    Status(u16),
}

#[derive(Debug)]
struct FixtureState {
    events_reply: Mutex<EventsReply>,
    streams: Mutex<Vec<mpsc::UnboundedSender<Event>>>,
    event_requests: AtomicUsize,
    call: Mutex<Reply>,
    picture: Mutex<Reply>,
    volume: Mutex<Reply>,
}

/// A running fixture server. Shuts down when dropped.
#[derive(Debug)]
pub struct FixtureServer {
    addr: SocketAddr,
    state: Arc<FixtureState>,
    shutdown: Option<oneshot::Sender<()>>,
    join: Option<JoinHandle<()>>,
}

impl FixtureServer {
    /// Start a server with an idle call, a picture and 50 % volume.
    pub async fn start() -> std::io::Result<Self> {
        let state = Arc::new(FixtureState {
            events_reply: Mutex::new(EventsReply::Stream),
            streams: Mutex::new(Vec::new()),
            event_requests: AtomicUsize::new(0),
            call: Mutex::new(Reply::Json(serde_json::json!({
                "state": "idle",
                "call": null,
            }))),
            picture: Mutex::new(Reply::Json(serde_json::json!({
                "filename": "current.jpg",
                "content_type": "image/jpeg",
                "updated_at": 1_705_000_000.0,
                "url": "/pics/current.jpg",
            }))),
            volume: Mutex::new(Reply::Json(serde_json::json!({
                "volume_percent": 50,
                "muted": false,
            }))),
        });

        let app = Router::new()
            .route("/api/events", get(events))
            .route("/api/call/state", get(call_state))
            .route("/api/picture/meta", get(picture_meta))
            .route("/api/volume", get(volume))
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let join = tokio::spawn(async move {
            let server = axum::serve(listener, app).with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            });
            if let Err(e) = server.await {
                tracing::warn!(error = %e, "fixture server failed");
            }
        });

        Ok(Self {
            addr,
            state,
            shutdown: Some(shutdown_tx),
            join: Some(join),
        })
    }

    /// Base address to configure the client with.
    pub fn base_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    /// Address of the event stream.
    pub fn events_url(&self) -> String {
        format!("{}/events", self.base_url())
    }

    /// Change how future event stream requests are answered.
    pub fn set_events_reply(&self, reply: EventsReply) {
        *self.state.events_reply.lock().unwrap() = reply;
    }

    /// Number of `GET /api/events` requests received.
    pub fn event_requests(&self) -> usize {
        self.state.event_requests.load(Ordering::SeqCst)
    }

    /// Number of event streams still attached to a client.
    pub fn open_streams(&self) -> usize {
        let mut streams = self.state.streams.lock().unwrap();
        streams.retain(|tx| !tx.is_closed());
        streams.len()
    }

    /// Send an untyped event with `data` to every open stream.
    pub fn send(&self, data: &str) {
        self.broadcast(|| Event::default().data(data));
    }

    /// Send a push message to every open stream.
    pub fn send_json(&self, message: Value) {
        self.send(&message.to_string());
    }

    /// Send a typed event (`event: <name>`) to every open stream.
    pub fn send_typed(&self, name: &str, data: &str) {
        self.broadcast(|| Event::default().event(name).data(data));
    }

    /// End every open stream, as a server restart would.
    pub fn drop_streams(&self) {
        self.state.streams.lock().unwrap().clear();
    }

    /// Script `GET /api/call/state`.
    pub fn set_call(&self, reply: Reply) {
        *self.state.call.lock().unwrap() = reply;
    }

    /// Script `GET /api/picture/meta`.
    pub fn set_picture(&self, reply: Reply) {
        *self.state.picture.lock().unwrap() = reply;
    }

    /// Script `GET /api/volume`.
    pub fn set_volume(&self, reply: Reply) {
        *self.state.volume.lock().unwrap() = reply;
    }

    fn broadcast(&self, make: impl Fn() -> Event) {
        let mut streams = self.state.streams.lock().unwrap();
        streams.retain(|tx| tx.send(make()).is_ok());
    }
}

impl Drop for FixtureServer {
    fn drop(&mut self) {
        self.drop_streams();
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(join) = self.join.take() {
            join.abort();
        }
    }
}

async fn events(State(state): State<Arc<FixtureState>>) -> Response {
    state.event_requests.fetch_add(1, Ordering::SeqCst);

    let reply = *state.events_reply.lock().unwrap();
    match reply {
        EventsReply::Stream => {}
        EventsReply::Status(code) => {
            return StatusCode::from_u16(code)
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
                .into_response()
        }
        EventsReply::PlainText => {
            return ([(header::CONTENT_TYPE, "text/plain")], "not a stream").into_response()
        }
    }

    let (tx, rx) = mpsc::unbounded_channel();
    state.streams.lock().unwrap().push(tx);

    let body = stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|event| (Ok::<_, Infallible>(event), rx))
    });
    Sse::new(body)
        .keep_alive(
            KeepAlive::new()
                .interval(Duration::from_secs(20))
                .text("ping"),
        )
        .into_response()
}

async fn call_state(State(state): State<Arc<FixtureState>>) -> Response {
    let reply = state.call.lock().unwrap().clone();
    respond(reply)
}

async fn picture_meta(State(state): State<Arc<FixtureState>>) -> Response {
    let reply = state.picture.lock().unwrap().clone();
    respond(reply)
}

async fn volume(State(state): State<Arc<FixtureState>>) -> Response {
    let reply = state.volume.lock().unwrap().clone();
    respond(reply)
}

fn respond(reply: Reply) -> Response {
    match reply {
        Reply::Json(body) => Json(body).into_response(),
        Reply::Status(code) => StatusCode::from_u16(code)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            .into_response(),
    }
}
