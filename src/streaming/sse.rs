//! Incremental Server-Sent Events parser.
//!
//! Consumes raw byte chunks as they arrive off the socket and yields
//! completed events at each blank-line dispatch. Implements the SSE
//! line grammar: `event:`, `data:`, `id:`, `retry:` fields, a single
//! leading space trimmed after the colon, multi-`data:` accumulation
//! joined with newlines, `:`-prefixed comment lines ignored, and CRLF
//! tolerated.

/// One dispatched server-sent event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SseEvent {
    /// The event name; `"message"` when the stream never set one.
    pub event: String,
    /// Accumulated data lines, joined with `\n`.
    pub data: String,
    /// Last `id:` seen for this event, when any.
    pub id: Option<String>,
    /// Last `retry:` hint seen, milliseconds.
    pub retry: Option<u64>,
}

/// Streaming parser state. Feed it chunks; collect events.
#[derive(Debug, Default)]
pub struct SseParser {
    line_buffer: String,
    event_type: Option<String>,
    data: Vec<String>,
    id: Option<String>,
    retry: Option<u64>,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk of bytes; returns every event completed by it.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        self.line_buffer.push_str(&String::from_utf8_lossy(chunk));

        let mut events = Vec::new();
        while let Some(newline) = self.line_buffer.find('\n') {
            let mut line: String = self.line_buffer.drain(..=newline).collect();
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }

            if let Some(event) = self.consume_line(&line) {
                events.push(event);
            }
        }
        events
    }

    fn consume_line(&mut self, line: &str) -> Option<SseEvent> {
        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            // Comment line.
            return None;
        }

        let (field, value) = match line.find(':') {
            Some(colon) => {
                let value = &line[colon + 1..];
                (&line[..colon], value.strip_prefix(' ').unwrap_or(value))
            }
            None => (line, ""),
        };

        match field {
            "event" => self.event_type = Some(value.to_string()),
            "data" => self.data.push(value.to_string()),
            "id" => self.id = Some(value.to_string()),
            "retry" => self.retry = value.parse().ok(),
            _ => {}
        }
        None
    }

    // Blank line: dispatch the accumulated event, if it carries data.
    fn dispatch(&mut self) -> Option<SseEvent> {
        let event_type = self.event_type.take();
        let data = std::mem::take(&mut self.data);

        if data.is_empty() {
            return None;
        }

        Some(SseEvent {
            event: event_type.unwrap_or_else(|| String::from("message")),
            data: data.join("\n"),
            id: self.id.clone(),
            retry: self.retry,
        })
    }
}
