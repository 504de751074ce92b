//! Streaming market and account events over WebSocket or SSE.
//!
//! A [`StreamingSession`] drives exactly one stream at a time: it
//! creates a short-lived session ticket over HTTP, spawns a transport
//! worker, routes decoded frames to the data callback (subject to the
//! data-type filter), and reconnects with jittered exponential backoff
//! when the transport drops. Frames are delivered in server order, and
//! no internal lock is held while a user callback runs.
//!
//! Callbacks run on the worker task and must be thread-safe. Do not
//! re-enter the session (`stop`, `add_symbols`, ...) from inside a
//! callback; hand work off to a channel instead.
//!
//! # Example
//! ---
//! ```ignore
//! let mut session = StreamingSession::new(client);
//! session
//!     .start_market_websocket(
//!         &["AAPL", "SPY"],
//!         |frame| println!("frame: {frame}"),
//!         |status| eprintln!("status: {status}"),
//!     )
//!     .await?;
//!
//! session.add_symbols(&["MSFT"]).await?;
//! // ... later
//! session.stop().await;
//! ```

pub mod events;
pub mod sse;
pub(crate) mod worker;

pub use events::{
    StreamingDataType, StreamingOrderStatus, StreamingQuote, StreamingSummary, StreamingTrade,
};
pub use sse::{SseEvent, SseParser};

use crate::endpoints::{accounts, markets};
use crate::validation::validate_session_id;
use crate::{Client, Error};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Callback receiving each decoded frame that passes the filter.
pub type DataCallback = Arc<dyn Fn(Value) + Send + Sync>;

/// Callback receiving state transitions and error descriptions.
///
/// This is observability, not just errors: every connection-state
/// change is reported here in human-readable form.
pub type StatusCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// Where a streaming session is in its lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Reconnecting,
    Error,
    Closed,
}

impl ConnectionState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Disconnected => "Disconnected",
            Self::Connecting => "Connecting",
            Self::Connected => "Connected",
            Self::Reconnecting => "Reconnecting",
            Self::Error => "Error",
            Self::Closed => "Closed",
        }
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reconnection behavior of a session.
#[derive(Clone, Copy, Debug)]
pub struct ReconnectPolicy {
    pub enabled: bool,
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            max_attempts: 10,
            base_delay: Duration::from_secs(1),
        }
    }
}

// The broker documents a longer ticket lifetime; 5 minutes is a
// conservative refresh interval, not a contract.
pub(crate) const SESSION_REFRESH_INTERVAL: Duration = Duration::from_secs(5 * 60);
pub(crate) const MAX_RECONNECT_DELAY: Duration = Duration::from_secs(30);

/// A short-lived session ticket authorizing a streaming connection.
#[derive(Clone, Debug)]
pub(crate) struct SessionTicket {
    pub id: String,
    pub created_at: Instant,
}

impl SessionTicket {
    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() >= SESSION_REFRESH_INTERVAL
    }
}

/// Which transport and event source a session is running.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum StreamKind {
    MarketHttp,
    MarketWebSocket,
    AccountHttp,
    AccountWebSocket,
}

impl StreamKind {
    pub fn is_market(self) -> bool {
        matches!(self, Self::MarketHttp | Self::MarketWebSocket)
    }

    pub fn is_websocket(self) -> bool {
        matches!(self, Self::MarketWebSocket | Self::AccountWebSocket)
    }
}

pub(crate) struct Shared {
    pub client: Client,
    state_tx: watch::Sender<ConnectionState>,
    symbols: Mutex<Vec<String>>,
    filter: Mutex<Option<Vec<StreamingDataType>>>,
    pub ticket: Mutex<Option<SessionTicket>>,
    policy: Mutex<ReconnectPolicy>,
    data_cb: Mutex<Option<DataCallback>>,
    status_cb: Mutex<Option<StatusCallback>>,
    pub ws_writer: tokio::sync::Mutex<Option<worker::WsWriter>>,
    cancel: Mutex<CancellationToken>,
}

impl Shared {
    fn new(client: Client) -> Self {
        let (state_tx, _) = watch::channel(ConnectionState::Disconnected);
        Self {
            client,
            state_tx,
            symbols: Mutex::new(Vec::new()),
            filter: Mutex::new(None),
            ticket: Mutex::new(None),
            policy: Mutex::new(ReconnectPolicy::default()),
            data_cb: Mutex::new(None),
            status_cb: Mutex::new(None),
            ws_writer: tokio::sync::Mutex::new(None),
            cancel: Mutex::new(CancellationToken::new()),
        }
    }

    pub fn state(&self) -> ConnectionState {
        *self.state_tx.borrow()
    }

    pub fn set_state(&self, state: ConnectionState) {
        let previous = self.state_tx.send_replace(state);
        if previous != state {
            self.notify_status(&format!("Connection state changed to: {state}"));
        }
    }

    pub fn notify_status(&self, message: &str) {
        let callback = self.status_cb.lock().expect("status callback poisoned").clone();
        if let Some(callback) = callback {
            callback(message);
        }
    }

    pub fn policy(&self) -> ReconnectPolicy {
        *self.policy.lock().expect("policy poisoned")
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.lock().expect("cancel token poisoned").clone()
    }

    pub fn symbols_snapshot(&self) -> Vec<String> {
        self.symbols.lock().expect("symbols poisoned").clone()
    }

    pub fn ticket_id(&self) -> Option<String> {
        self.ticket
            .lock()
            .expect("ticket poisoned")
            .as_ref()
            .map(|ticket| ticket.id.clone())
    }

    pub fn ticket_expired(&self) -> bool {
        self.ticket
            .lock()
            .expect("ticket poisoned")
            .as_ref()
            .map(SessionTicket::is_expired)
            .unwrap_or(true)
    }

    pub fn store_ticket(&self, ticket: SessionTicket) {
        *self.ticket.lock().expect("ticket poisoned") = Some(ticket);
    }

    pub fn set_data_callback(&self, callback: DataCallback) {
        *self.data_cb.lock().expect("data callback poisoned") = Some(callback);
    }

    /// Parse a frame and hand it to the data callback, subject to the
    /// filter. Parse failures are reported and the frame dropped; they
    /// never tear down the connection.
    pub fn dispatch_text(&self, text: &str) {
        let frame: Value = match serde_json::from_str(text) {
            Ok(frame) => frame,
            Err(e) => {
                self.notify_status(&format!("dropping malformed frame: {e}"));
                return;
            }
        };
        self.dispatch_frame(frame);
    }

    pub fn dispatch_frame(&self, frame: Value) {
        let data_type = StreamingDataType::classify(&frame);

        // Snapshot filter and callback so neither lock is held while
        // the user callback runs.
        let passes = {
            let filter = self.filter.lock().expect("filter poisoned");
            match filter.as_ref() {
                Some(types) => types.contains(&data_type),
                None => true,
            }
        };
        if !passes {
            return;
        }

        let callback = self.data_cb.lock().expect("data callback poisoned").clone();
        if let Some(callback) = callback {
            callback(frame);
        }
    }
}

/// Create a session ticket for the given stream family.
pub(crate) async fn create_session(client: &Client, kind: StreamKind) -> Result<SessionTicket, Error> {
    let endpoint = if kind.is_market() {
        markets::events::SESSION
    } else {
        accounts::EVENTS_SESSION
    };

    let value = client.send(&endpoint.bind(), &[], &[]).await?;
    let session_id = value
        .get("stream")
        .and_then(|stream| stream.get("sessionid"))
        .and_then(Value::as_str)
        .ok_or_else(|| Error::Session("no sessionid in session response".into()))?;

    let session_id = validate_session_id(session_id)?;
    Ok(SessionTicket {
        id: session_id.to_string(),
        created_at: Instant::now(),
    })
}

/// A streaming subscription manager bound to one connection at a time.
pub struct StreamingSession {
    shared: Arc<Shared>,
    worker: Option<JoinHandle<()>>,
}

impl StreamingSession {
    /// Create an idle session that will authenticate through `client`.
    pub fn new(client: Client) -> Self {
        Self {
            shared: Arc::new(Shared::new(client)),
            worker: None,
        }
    }

    /// Stream market events for `symbols` over SSE.
    pub async fn start_market_http(
        &mut self,
        symbols: &[&str],
        on_data: impl Fn(Value) + Send + Sync + 'static,
        on_status: impl Fn(&str) + Send + Sync + 'static,
    ) -> Result<(), Error> {
        self.start(StreamKind::MarketHttp, symbols, Arc::new(on_data), Arc::new(on_status))
            .await
    }

    /// Stream market events for `symbols` over WebSocket.
    pub async fn start_market_websocket(
        &mut self,
        symbols: &[&str],
        on_data: impl Fn(Value) + Send + Sync + 'static,
        on_status: impl Fn(&str) + Send + Sync + 'static,
    ) -> Result<(), Error> {
        self.start(StreamKind::MarketWebSocket, symbols, Arc::new(on_data), Arc::new(on_status))
            .await
    }

    /// Stream account events (order status, fills, journal entries)
    /// over SSE.
    pub async fn start_account_http(
        &mut self,
        on_data: impl Fn(Value) + Send + Sync + 'static,
        on_status: impl Fn(&str) + Send + Sync + 'static,
    ) -> Result<(), Error> {
        self.start(StreamKind::AccountHttp, &[], Arc::new(on_data), Arc::new(on_status))
            .await
    }

    /// Stream account events over WebSocket.
    pub async fn start_account_websocket(
        &mut self,
        on_data: impl Fn(Value) + Send + Sync + 'static,
        on_status: impl Fn(&str) + Send + Sync + 'static,
    ) -> Result<(), Error> {
        self.start(StreamKind::AccountWebSocket, &[], Arc::new(on_data), Arc::new(on_status))
            .await
    }

    async fn start(
        &mut self,
        kind: StreamKind,
        symbols: &[&str],
        on_data: DataCallback,
        on_status: StatusCallback,
    ) -> Result<(), Error> {
        if self.worker.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return Err(Error::Stream("a stream is already active on this session".into()));
        }

        {
            let mut data_cb = self.shared.data_cb.lock().expect("data callback poisoned");
            *data_cb = Some(on_data);
            let mut status_cb = self.shared.status_cb.lock().expect("status callback poisoned");
            *status_cb = Some(on_status);
            let mut set = self.shared.symbols.lock().expect("symbols poisoned");
            *set = symbols.iter().map(|s| s.to_string()).collect();
            // Fresh cancellation scope for this run.
            *self.shared.cancel.lock().expect("cancel token poisoned") = CancellationToken::new();
        }

        self.shared.set_state(ConnectionState::Connecting);

        let ticket = match create_session(&self.shared.client, kind).await {
            Ok(ticket) => ticket,
            Err(e) => {
                self.shared.set_state(ConnectionState::Error);
                self.shared.notify_status(&format!("failed to create session: {e}"));
                return Err(e);
            }
        };
        self.shared.store_ticket(ticket);

        let shared = Arc::clone(&self.shared);
        self.worker = Some(tokio::spawn(worker::run(shared, kind)));
        Ok(())
    }

    /// Stop streaming. Idempotent: cancels the reconnect wait, closes
    /// the transport, joins the worker, and drops callback references.
    pub async fn stop(&mut self) {
        self.shared.cancel_token().cancel();
        self.shared.set_state(ConnectionState::Closed);

        if let Some(handle) = self.worker.take() {
            let _ = handle.await;
        }

        *self.shared.ws_writer.lock().await = None;
        self.shared.set_state(ConnectionState::Disconnected);

        let mut data_cb = self.shared.data_cb.lock().expect("data callback poisoned");
        *data_cb = None;
        let mut status_cb = self.shared.status_cb.lock().expect("status callback poisoned");
        *status_cb = None;
    }

    /// Subscribe additional symbols on the live stream.
    ///
    /// The set mutates atomically and is re-sent verbatim after a
    /// reconnect, so symbols added while Reconnecting are not lost.
    pub async fn add_symbols(&self, symbols: &[&str]) -> Result<(), Error> {
        if symbols.is_empty() {
            return Ok(());
        }

        let added: Vec<String> = {
            let mut set = self.shared.symbols.lock().expect("symbols poisoned");
            let mut added = Vec::new();
            for symbol in symbols {
                if !set.iter().any(|existing| existing == symbol) {
                    set.push(symbol.to_string());
                    added.push(symbol.to_string());
                }
            }
            added
        };

        if added.is_empty() {
            return Ok(());
        }
        self.send_action("subscribe", &added).await
    }

    /// Unsubscribe symbols from the live stream.
    pub async fn remove_symbols(&self, symbols: &[&str]) -> Result<(), Error> {
        if symbols.is_empty() {
            return Ok(());
        }

        let removed: Vec<String> = {
            let mut set = self.shared.symbols.lock().expect("symbols poisoned");
            let mut removed = Vec::new();
            set.retain(|existing| {
                if symbols.iter().any(|symbol| symbol == existing) {
                    removed.push(existing.clone());
                    false
                } else {
                    true
                }
            });
            removed
        };

        if removed.is_empty() {
            return Ok(());
        }
        self.send_action("unsubscribe", &removed).await
    }

    async fn send_action(&self, action: &str, symbols: &[String]) -> Result<(), Error> {
        let mut writer = self.shared.ws_writer.lock().await;
        if let Some(writer) = writer.as_mut() {
            worker::send_text(writer, worker::action_frame(action, symbols)).await?;
        }
        // On SSE (or while reconnecting) there is no mutation channel;
        // the updated set applies at the next (re)connect.
        Ok(())
    }

    /// Restrict delivery to the given data types.
    pub fn set_data_filter(&self, types: &[StreamingDataType]) {
        let mut filter = self.shared.filter.lock().expect("filter poisoned");
        *filter = Some(types.to_vec());
    }

    /// Deliver every data type again.
    pub fn clear_data_filter(&self) {
        let mut filter = self.shared.filter.lock().expect("filter poisoned");
        *filter = None;
    }

    /// The current connection state.
    pub fn connection_state(&self) -> ConnectionState {
        self.shared.state()
    }

    /// A receiver that observes every connection-state change.
    pub fn state_changes(&self) -> watch::Receiver<ConnectionState> {
        self.shared.state_tx.subscribe()
    }

    /// Whether a stream is active (in any non-terminal state).
    pub fn is_streaming(&self) -> bool {
        !matches!(
            self.connection_state(),
            ConnectionState::Disconnected | ConnectionState::Closed
        )
    }

    /// The symbols currently subscribed.
    pub fn symbols(&self) -> Vec<String> {
        self.shared.symbols_snapshot()
    }

    /// Enable or disable automatic reconnection.
    pub fn set_reconnect_enabled(&self, enabled: bool) {
        self.shared.policy.lock().expect("policy poisoned").enabled = enabled;
    }

    /// Cap the number of consecutive reconnection attempts.
    pub fn set_max_reconnect_attempts(&self, attempts: u32) {
        self.shared.policy.lock().expect("policy poisoned").max_attempts = attempts;
    }

    /// Set the base delay for the exponential backoff.
    pub fn set_reconnect_delay(&self, delay: Duration) {
        self.shared.policy.lock().expect("policy poisoned").base_delay = delay;
    }
}

impl Drop for StreamingSession {
    fn drop(&mut self) {
        self.shared.cancel_token().cancel();
        if let Some(handle) = self.worker.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn shared_with_sink() -> (Arc<Shared>, Arc<Mutex<Vec<Value>>>) {
        let client = crate::ClientBuilder::new().testing_url("http://127.0.0.1:1").build().unwrap();
        let shared = Arc::new(Shared::new(client));
        let sink: Arc<Mutex<Vec<Value>>> = Arc::new(Mutex::new(Vec::new()));

        let sink_clone = Arc::clone(&sink);
        *shared.data_cb.lock().unwrap() = Some(Arc::new(move |frame| {
            sink_clone.lock().unwrap().push(frame);
        }));
        (shared, sink)
    }

    #[test]
    fn frames_deliver_in_order_after_filtering() {
        let (shared, sink) = shared_with_sink();
        *shared.filter.lock().unwrap() =
            Some(vec![StreamingDataType::Quote, StreamingDataType::Trade]);

        let frames = [
            r#"{"type":"quote","symbol":"SPY","bid":1.0}"#,
            r#"{"type":"summary","symbol":"SPY","open":1.0}"#,
            r#"{"type":"trade","symbol":"SPY","price":1.0,"size":10}"#,
            r#"{"type":"quote","symbol":"QQQ","bid":2.0}"#,
        ];
        for frame in frames {
            shared.dispatch_text(frame);
        }

        let delivered = sink.lock().unwrap();
        let symbols: Vec<(String, String)> = delivered
            .iter()
            .map(|f| {
                (
                    f["type"].as_str().unwrap().to_string(),
                    f["symbol"].as_str().unwrap().to_string(),
                )
            })
            .collect();
        assert_eq!(
            symbols,
            vec![
                ("quote".to_string(), "SPY".to_string()),
                ("trade".to_string(), "SPY".to_string()),
                ("quote".to_string(), "QQQ".to_string()),
            ]
        );
    }

    #[test]
    fn malformed_frames_report_and_drop() {
        let (shared, sink) = shared_with_sink();
        let reports = Arc::new(AtomicUsize::new(0));
        let reports_clone = Arc::clone(&reports);
        *shared.status_cb.lock().unwrap() = Some(Arc::new(move |_| {
            reports_clone.fetch_add(1, Ordering::SeqCst);
        }));

        shared.dispatch_text("{not json");
        shared.dispatch_text(r#"{"type":"quote","symbol":"SPY"}"#);

        assert_eq!(reports.load(Ordering::SeqCst), 1);
        assert_eq!(sink.lock().unwrap().len(), 1);
    }

    #[test]
    fn state_transitions_notify_status_callback() {
        let (shared, _sink) = shared_with_sink();
        let messages: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let messages_clone = Arc::clone(&messages);
        *shared.status_cb.lock().unwrap() = Some(Arc::new(move |msg| {
            messages_clone.lock().unwrap().push(msg.to_string());
        }));

        shared.set_state(ConnectionState::Connecting);
        shared.set_state(ConnectionState::Connecting); // no-op, unchanged
        shared.set_state(ConnectionState::Connected);

        let messages = messages.lock().unwrap();
        assert_eq!(
            *messages,
            [
                "Connection state changed to: Connecting",
                "Connection state changed to: Connected"
            ]
        );
    }

    #[test]
    fn ticket_expiry_window() {
        let fresh = SessionTicket {
            id: "c8a4f84c123456789".into(),
            created_at: Instant::now(),
        };
        assert!(!fresh.is_expired());

        let stale = SessionTicket {
            id: "c8a4f84c123456789".into(),
            created_at: Instant::now() - Duration::from_secs(6 * 60),
        };
        assert!(stale.is_expired());
    }
}
