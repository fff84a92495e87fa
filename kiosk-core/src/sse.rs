//! Incremental decoder for `text/event-stream` bodies.
//!
//! Bytes arrive in arbitrary chunks; the decoder buffers partial lines and
//! yields complete events as blank lines dispatch them. Line splitting works
//! on bytes, so a chunk boundary inside a multi-byte UTF-8 sequence is fine.
//!
//! Field handling:
//! - `data:` lines accumulate, joined with `\n`
//! - `event:` sets the type of the pending event
//! - `id:` is remembered and attached to later events
//! - `retry:` and unknown fields are ignored
//! - lines starting with `:` are comments (keep-alive pings)
//!
//! A line or event larger than [`MAX_EVENT_SIZE`] is discarded up to the
//! next blank line; the stream itself stays usable.

/// Upper bound on buffered bytes for one pending event, partial line included.
pub const MAX_EVENT_SIZE: usize = 1024 * 1024;

/// One dispatched event.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SseEvent {
    /// Value of the `event:` field, if any.
    pub event: Option<String>,
    /// Joined `data:` lines.
    pub data: String,
    /// Last `id:` seen on the stream.
    pub id: Option<String>,
}

impl SseEvent {
    /// An untyped event carrying `data`.
    pub fn message(data: impl Into<String>) -> Self {
        Self {
            event: None,
            data: data.into(),
            id: None,
        }
    }

    /// True for events a plain `onmessage` listener would receive: no
    /// `event:` field, or `event: message`.
    pub fn is_message(&self) -> bool {
        matches!(self.event.as_deref(), None | Some("message"))
    }
}

/// Streaming decoder state.
#[derive(Debug, Default)]
pub struct EventStreamDecoder {
    line: Vec<u8>,
    after_cr: bool,
    started: bool,
    event_type: String,
    data: String,
    last_id: Option<String>,
    /// Drop bytes until the current line ends.
    skip_line: bool,
    /// Drop lines until the current event ends.
    skip_event: bool,
}

impl EventStreamDecoder {
    /// Create a decoder for a fresh stream.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next chunk of the body; returns events completed by it.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        let mut out = Vec::new();
        for &byte in chunk {
            if self.after_cr {
                self.after_cr = false;
                if byte == b'\n' {
                    continue;
                }
            }
            match byte {
                b'\r' => {
                    self.after_cr = true;
                    self.end_line(&mut out);
                }
                b'\n' => self.end_line(&mut out),
                _ if self.skip_line => {}
                _ if self.line.len() + self.data.len() >= MAX_EVENT_SIZE => self.overflow(true),
                _ => self.line.push(byte),
            }
        }
        out
    }

    /// Forget all buffered state; used when a new stream starts.
    ///
    /// An event left incomplete by the old stream is discarded.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn end_line(&mut self, out: &mut Vec<SseEvent>) {
        if self.skip_line {
            self.skip_line = false;
            return;
        }
        let raw = std::mem::take(&mut self.line);
        if self.skip_event {
            self.skip_event = !raw.is_empty();
            return;
        }
        let mut text = String::from_utf8_lossy(&raw).into_owned();
        if !self.started {
            self.started = true;
            if let Some(stripped) = text.strip_prefix('\u{feff}') {
                text = stripped.to_string();
            }
        }
        self.process_line(&text, out);
    }

    fn process_line(&mut self, line: &str, out: &mut Vec<SseEvent>) {
        if line.is_empty() {
            self.dispatch(out);
            return;
        }
        if line.starts_with(':') {
            return;
        }

        let (field, value) = match line.find(':') {
            Some(i) => {
                let value = &line[i + 1..];
                (&line[..i], value.strip_prefix(' ').unwrap_or(value))
            }
            None => (line, ""),
        };

        match field {
            "event" => self.event_type = value.to_string(),
            "data" => {
                if self.data.len() + value.len() >= MAX_EVENT_SIZE {
                    self.overflow(false);
                    return;
                }
                self.data.push_str(value);
                self.data.push('\n');
            }
            "id" => {
                if !value.contains('\0') {
                    self.last_id = Some(value.to_string());
                }
            }
            _ => {}
        }
    }

    /// Throw away the pending event. `mid_line` also drops the rest of the
    /// line being read.
    fn overflow(&mut self, mid_line: bool) {
        self.line = Vec::new();
        self.data = String::new();
        self.event_type.clear();
        self.skip_line = mid_line;
        self.skip_event = true;
    }

    fn dispatch(&mut self, out: &mut Vec<SseEvent>) {
        let event_type = std::mem::take(&mut self.event_type);
        if self.data.is_empty() {
            return;
        }
        let mut data = std::mem::take(&mut self.data);
        if data.ends_with('\n') {
            data.pop();
        }
        out.push(SseEvent {
            event: (!event_type.is_empty()).then_some(event_type),
            data,
            id: self.last_id.clone(),
        });
    }
}
