//! Transport workers: one WebSocket and one SSE implementation, plus
//! the reconnect loop that drives whichever the session started.

use crate::endpoints::{accounts, markets, websocket};
use crate::json_builder::JsonBuilder;
use crate::streaming::sse::{SseEvent, SseParser};
use crate::streaming::{
    create_session, ConnectionState, Shared, StreamKind, MAX_RECONNECT_DELAY,
};
use crate::Error;
use futures::{SinkExt, StreamExt};
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

pub(crate) type WsWriter =
    futures::stream::SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;

/// Drive the transport until stopped, gave up, or told not to retry.
pub(crate) async fn run(shared: Arc<Shared>, kind: StreamKind) {
    let cancel = shared.cancel_token();
    let mut attempts: u32 = 0;

    loop {
        let connected = AtomicBool::new(false);

        let result = if kind.is_websocket() {
            websocket_once(&shared, kind, &connected).await
        } else {
            sse_once(&shared, kind, &connected).await
        };

        if cancel.is_cancelled() {
            // `stop` owns the terminal state transition.
            return;
        }

        if let Err(e) = &result {
            shared.notify_status(&e.to_string());
        }
        if connected.load(Ordering::SeqCst) {
            attempts = 0;
        }

        let policy = shared.policy();
        if !policy.enabled {
            shared.set_state(ConnectionState::Disconnected);
            return;
        }

        attempts += 1;
        if attempts > policy.max_attempts {
            shared.set_state(ConnectionState::Error);
            let exhausted = Error::ReconnectExhausted {
                attempts: policy.max_attempts,
            };
            shared.notify_status(&exhausted.to_string());
            return;
        }

        shared.set_state(ConnectionState::Reconnecting);
        let delay = backoff_delay(policy.base_delay, attempts);
        tracing::info!(attempt = attempts, delay_ms = delay.as_millis() as u64, "reconnecting");
        shared.notify_status(&format!(
            "reconnection attempt #{attempts} in {}ms",
            delay.as_millis()
        ));

        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = tokio::time::sleep(delay) => {}
        }

        if shared.ticket_expired() {
            match create_session(&shared.client, kind).await {
                Ok(ticket) => shared.store_ticket(ticket),
                Err(e) => {
                    shared.notify_status(&format!("failed to refresh session: {e}"));
                    continue;
                }
            }
        }
    }
}

/// `base * 2^(attempt-1)`, ±25% jitter, capped at 30 seconds.
pub(crate) fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    let shift = attempt.saturating_sub(1).min(16);
    let exponential = base.saturating_mul(1u32 << shift);

    let jitter = rand::thread_rng().gen_range(-0.25..=0.25);
    let jittered = exponential.mul_f64(1.0 + jitter);

    jittered.min(MAX_RECONNECT_DELAY)
}

/// The initial frame announcing the session and its symbol set.
pub(crate) fn session_frame(session_id: &str, symbols: &[String]) -> String {
    let mut builder = JsonBuilder::new();
    builder.begin_object().field_str("sessionid", session_id);
    if !symbols.is_empty() {
        builder.field_array("symbols");
        for symbol in symbols {
            builder.element_str(symbol);
        }
        builder.end_array();
    }
    builder.end_object();
    builder.finish()
}

/// A subscribe/unsubscribe mutation frame.
pub(crate) fn action_frame(action: &str, symbols: &[String]) -> String {
    let mut builder = JsonBuilder::new();
    builder.begin_object().field_str("action", action).field_array("symbols");
    for symbol in symbols {
        builder.element_str(symbol);
    }
    builder.end_array().end_object();
    builder.finish()
}

pub(crate) async fn send_text(writer: &mut WsWriter, frame: String) -> Result<(), Error> {
    writer.send(Message::Text(frame.into())).await?;
    Ok(())
}

async fn websocket_once(
    shared: &Arc<Shared>,
    kind: StreamKind,
    connected: &AtomicBool,
) -> Result<(), Error> {
    let cancel = shared.cancel_token();

    let path = if kind.is_market() {
        websocket::MARKETS
    } else {
        websocket::ACCOUNTS
    };
    let url = format!("{}{path}", shared.client.ws_url());

    let mut request = url
        .into_client_request()
        .map_err(|e| Error::Stream(format!("invalid websocket url: {e}")))?;
    if let Some(token) = shared.client.access_token() {
        let value = format!("Bearer {token}")
            .parse()
            .map_err(|_| Error::Stream("access token is not a valid header value".into()))?;
        request.headers_mut().insert("Authorization", value);
    }

    let (stream, _response) = tokio::select! {
        _ = cancel.cancelled() => return Ok(()),
        connection = connect_async(request) => connection?,
    };
    let (mut write, mut read) = stream.split();

    let session_id = shared
        .ticket_id()
        .ok_or_else(|| Error::Session("no session ticket".into()))?;
    let frame = session_frame(&session_id, &shared.symbols_snapshot());
    write.send(Message::Text(frame.into())).await?;

    *shared.ws_writer.lock().await = Some(write);
    shared.set_state(ConnectionState::Connected);
    connected.store(true, Ordering::SeqCst);

    let result = loop {
        tokio::select! {
            _ = cancel.cancelled() => break Ok(()),
            message = read.next() => match message {
                Some(Ok(Message::Text(text))) => shared.dispatch_text(text.as_ref()),
                Some(Ok(Message::Ping(payload))) => {
                    let mut writer = shared.ws_writer.lock().await;
                    if let Some(writer) = writer.as_mut() {
                        let _ = writer.send(Message::Pong(payload)).await;
                    }
                }
                Some(Ok(Message::Close(_))) => {
                    break Err(Error::Stream("websocket closed by server".into()));
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => break Err(Error::WebSocket(e)),
                None => break Err(Error::Stream("websocket stream ended".into())),
            }
        }
    };

    if let Some(mut writer) = shared.ws_writer.lock().await.take() {
        let _ = writer.send(Message::Close(None)).await;
    }

    result
}

async fn sse_once(
    shared: &Arc<Shared>,
    kind: StreamKind,
    connected: &AtomicBool,
) -> Result<(), Error> {
    let cancel = shared.cancel_token();

    let session_id = shared
        .ticket_id()
        .ok_or_else(|| Error::Session("no session ticket".into()))?;
    let bound = if kind.is_market() {
        markets::events::stream(&session_id)?
    } else {
        accounts::events_stream(&session_id)?
    };

    let mut query = Vec::new();
    if kind.is_market() {
        let symbols = shared.symbols_snapshot();
        if !symbols.is_empty() {
            query.push(("symbols".to_string(), symbols.join(",")));
        }
    }

    let mut response = tokio::select! {
        _ = cancel.cancelled() => return Ok(()),
        response = shared.client.open_event_stream(&bound, &query) => response?,
    };

    shared.set_state(ConnectionState::Connected);
    connected.store(true, Ordering::SeqCst);

    let mut parser = SseParser::new();
    loop {
        tokio::select! {
            _ = cancel.cancelled() => return Ok(()),
            chunk = response.chunk() => match chunk {
                Ok(Some(bytes)) => {
                    for event in parser.push(&bytes) {
                        handle_sse_event(shared, event);
                    }
                }
                Ok(None) => return Err(Error::Stream("event stream ended".into())),
                Err(e) => return Err(Error::Request(e)),
            }
        }
    }
}

fn handle_sse_event(shared: &Arc<Shared>, event: SseEvent) {
    match event.event.as_str() {
        // Keepalives are consumed silently.
        "heartbeat" => {}
        // The server may rotate the ticket mid-stream.
        "session" => {
            if let Ok(frame) = serde_json::from_str::<serde_json::Value>(&event.data) {
                if let Some(session_id) = frame.get("sessionid").and_then(|v| v.as_str()) {
                    shared.store_ticket(crate::streaming::SessionTicket {
                        id: session_id.to_string(),
                        created_at: Instant::now(),
                    });
                    tracing::debug!("session ticket refreshed by server");
                }
            }
        }
        _ => shared.dispatch_text(&event.data),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::streaming::StreamingDataType;
    use serde_json::Value;
    use std::sync::Mutex;

    #[test]
    fn backoff_doubles_with_bounded_jitter() {
        let base = Duration::from_millis(100);
        for attempt in 1..=3u32 {
            let expected = 100u64 * (1 << (attempt - 1));
            let low = (expected as f64 * 0.75) as u128;
            let high = (expected as f64 * 1.25) as u128 + 1;
            for _ in 0..32 {
                let delay = backoff_delay(base, attempt).as_millis();
                assert!(
                    (low..=high).contains(&delay),
                    "attempt {attempt}: {delay}ms outside [{low}, {high}]"
                );
            }
        }
    }

    #[test]
    fn backoff_caps_at_thirty_seconds() {
        let delay = backoff_delay(Duration::from_secs(1), 12);
        assert!(delay <= MAX_RECONNECT_DELAY);
    }

    #[test]
    fn session_frame_layout() {
        let frame = session_frame("abc123def456ghi789", &["AAPL".into(), "MSFT".into()]);
        assert_eq!(
            frame,
            r#"{"sessionid":"abc123def456ghi789","symbols":["AAPL","MSFT"]}"#
        );

        let bare = session_frame("abc123def456ghi789", &[]);
        assert_eq!(bare, r#"{"sessionid":"abc123def456ghi789"}"#);
    }

    #[test]
    fn action_frame_layout() {
        let frame = action_frame("subscribe", &["TLT".into()]);
        assert_eq!(frame, r#"{"action":"subscribe","symbols":["TLT"]}"#);
        let frame = action_frame("unsubscribe", &["TLT".into(), "SPY".into()]);
        assert_eq!(frame, r#"{"action":"unsubscribe","symbols":["TLT","SPY"]}"#);
    }

    fn shared_with_sink() -> (Arc<Shared>, Arc<Mutex<Vec<Value>>>) {
        let client = crate::ClientBuilder::new().testing_url("http://127.0.0.1:1").build().unwrap();
        let shared = Arc::new(Shared::new(client));
        let sink: Arc<Mutex<Vec<Value>>> = Arc::new(Mutex::new(Vec::new()));
        let sink_clone = Arc::clone(&sink);
        shared.set_data_callback(Arc::new(move |frame| {
            sink_clone.lock().unwrap().push(frame);
        }));
        (shared, sink)
    }

    #[test]
    fn heartbeats_are_consumed_and_data_flows() {
        let (shared, sink) = shared_with_sink();

        let mut parser = SseParser::new();
        let chunk = b"event: heartbeat\ndata: {}\n\nevent: message\ndata: {\"type\":\"quote\",\"symbol\":\"SPY\",\"bid\":1.0,\"ask\":1.01}\n\n";
        for event in parser.push(chunk) {
            handle_sse_event(&shared, event);
        }

        let delivered = sink.lock().unwrap();
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0]["symbol"], "SPY");
        assert_eq!(
            StreamingDataType::classify(&delivered[0]),
            StreamingDataType::Quote
        );
    }

    #[test]
    fn reconnect_frame_reflects_mutations_made_while_down() {
        // The set a reconnect replays is whatever the user-visible set
        // is at connect time, including add/remove issued while the
        // transport was down.
        let (shared, _sink) = shared_with_sink();
        {
            let mut set = shared.symbols.lock().unwrap();
            *set = vec!["SPY".to_string(), "AAPL".to_string()];
        }
        {
            let mut set = shared.symbols.lock().unwrap();
            set.retain(|s| s != "AAPL");
            set.push("QQQ".to_string());
        }

        let frame = session_frame("abc123def456ghi789", &shared.symbols_snapshot());
        assert_eq!(
            frame,
            r#"{"sessionid":"abc123def456ghi789","symbols":["SPY","QQQ"]}"#
        );
    }

    #[test]
    fn session_events_refresh_the_ticket() {
        let (shared, sink) = shared_with_sink();
        assert!(shared.ticket_expired());

        let mut parser = SseParser::new();
        let chunk = b"event: session\ndata: {\"sessionid\":\"fresh_ticket_0123456789\"}\n\n";
        for event in parser.push(chunk) {
            handle_sse_event(&shared, event);
        }

        assert_eq!(shared.ticket_id().as_deref(), Some("fresh_ticket_0123456789"));
        assert!(!shared.ticket_expired());
        assert!(sink.lock().unwrap().is_empty());
    }
}
