use mockito::{Matcher, Server};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tradier::streaming::{ConnectionState, StreamingSession};
use tradier::ClientBuilder;

async fn wait_for<F: Fn() -> bool>(condition: F, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    condition()
}

#[test]
/// An SSE market stream creates a session ticket, consumes heartbeats
/// silently, and delivers data frames in order.
fn test_sse_market_stream_mocked() {
    let mut server = Server::new();

    let session_mock = server
        .mock("POST", "/v1/markets/events/session")
        .with_status(200)
        .with_body(r#"{"stream":{"sessionid":"c8a4f84c66d1459f8043f913a2e23d9b","url":"https://stream.tradier.com/v1/markets/events"}}"#)
        .expect(1)
        .create();

    let stream_mock = server
        .mock("GET", "/v1/markets/events/c8a4f84c66d1459f8043f913a2e23d9b")
        .match_query(Matcher::UrlEncoded("symbols".into(), "SPY".into()))
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_chunked_body(|writer| {
            writer.write_all(b"event: heartbeat\ndata: {}\n\n")?;
            writer.write_all(
                b"event: message\ndata: {\"type\":\"quote\",\"symbol\":\"SPY\",\"bid\":1.0,\"ask\":1.01}\n\n",
            )?;
            writer.write_all(
                b"event: message\ndata: {\"type\":\"trade\",\"symbol\":\"SPY\",\"price\":1.0,\"size\":100}\n\n",
            )?;
            Ok(())
        })
        .create();

    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async {
        let client = ClientBuilder::new()
            .access_token("T123")
            .testing_url(&server.url())
            .build()
            .unwrap();

        let frames: Arc<Mutex<Vec<serde_json::Value>>> = Arc::new(Mutex::new(Vec::new()));
        let frames_clone = Arc::clone(&frames);

        let mut session = StreamingSession::new(client);
        session.set_reconnect_enabled(false);
        session
            .start_market_http(
                &["SPY"],
                move |frame| frames_clone.lock().unwrap().push(frame),
                |_status| {},
            )
            .await
            .unwrap();

        let got_both = wait_for(|| frames.lock().unwrap().len() >= 2, Duration::from_secs(5)).await;
        assert!(got_both, "expected two data frames");

        let frames = frames.lock().unwrap();
        assert_eq!(frames[0]["type"], "quote");
        assert_eq!(frames[0]["symbol"], "SPY");
        assert_eq!(frames[1]["type"], "trade");

        drop(frames);
        session.stop().await;
        assert_eq!(session.connection_state(), ConnectionState::Disconnected);
    });

    session_mock.assert();
    stream_mock.assert();
}

#[test]
/// With reconnection capped and a transport that always fails, the
/// session makes at most N+1 connection attempts, backs off between
/// them, and lands in `Error`.
fn test_reconnect_gives_up_mocked() {
    let mut server = Server::new();

    let session_mock = server
        .mock("POST", "/v1/markets/events/session")
        .with_status(200)
        .with_body(r#"{"stream":{"sessionid":"c8a4f84c66d1459f8043f913a2e23d9b"}}"#)
        .create();

    // Every stream connect fails immediately.
    let stream_mock = server
        .mock("GET", "/v1/markets/events/c8a4f84c66d1459f8043f913a2e23d9b")
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body("stream unavailable")
        .expect(4)
        .create();

    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async {
        let client = ClientBuilder::new()
            .access_token("T123")
            .testing_url(&server.url())
            .build()
            .unwrap();

        let reconnect_notices = Arc::new(AtomicUsize::new(0));
        let notices_clone = Arc::clone(&reconnect_notices);

        let mut session = StreamingSession::new(client);
        session.set_max_reconnect_attempts(3);
        session.set_reconnect_delay(Duration::from_millis(50));

        let started = Instant::now();
        session
            .start_market_http(
                &["SPY"],
                |_frame| {},
                move |status| {
                    if status.contains("reconnection attempt") {
                        notices_clone.fetch_add(1, Ordering::SeqCst);
                    }
                },
            )
            .await
            .unwrap();

        let gave_up = wait_for(
            || session.connection_state() == ConnectionState::Error,
            Duration::from_secs(10),
        )
        .await;
        assert!(gave_up, "expected the session to give up in Error state");

        // Three backoff waits: ~50 + 100 + 200ms, ±25% jitter each.
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(200), "elapsed {elapsed:?}");
        assert_eq!(reconnect_notices.load(Ordering::SeqCst), 3);

        session.stop().await;
    });

    session_mock.assert();
    // Initial attempt + 3 retries.
    stream_mock.assert();
}

#[test]
/// A failed session-creation request surfaces as an error and pushes
/// the session into the Error state without spawning a worker.
fn test_session_creation_failure_mocked() {
    let mut server = Server::new();
    let session_mock = server
        .mock("POST", "/v1/markets/events/session")
        .with_status(503)
        .with_body("service unavailable")
        .create();

    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async {
        let client = ClientBuilder::new()
            .access_token("T123")
            .testing_url(&server.url())
            .build()
            .unwrap();

        let mut session = StreamingSession::new(client);
        let result = session.start_market_http(&["SPY"], |_| {}, |_| {}).await;
        assert!(result.is_err());
        assert_eq!(session.connection_state(), ConnectionState::Error);
    });

    session_mock.assert();
}

#[test]
/// Symbol mutations are atomic and survive into the set that a
/// reconnect would replay.
fn test_symbol_set_mutations() {
    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async {
        let client = ClientBuilder::new()
            .access_token("T123")
            .testing_url("http://127.0.0.1:1")
            .build()
            .unwrap();

        let session = StreamingSession::new(client);
        // No transport yet: mutations only touch the set.
        session.add_symbols(&["SPY", "AAPL"]).await.unwrap();
        session.add_symbols(&["AAPL", "QQQ"]).await.unwrap();
        assert_eq!(session.symbols(), vec!["SPY", "AAPL", "QQQ"]);

        session.remove_symbols(&["AAPL", "MISSING"]).await.unwrap();
        assert_eq!(session.symbols(), vec!["SPY", "QQQ"]);
    });
}

#[test]
/// `stop` is idempotent and leaves the session reusable state-wise.
fn test_stop_is_idempotent() {
    let mut server = Server::new();
    let _session_mock = server
        .mock("POST", "/v1/markets/events/session")
        .with_status(200)
        .with_body(r#"{"stream":{"sessionid":"c8a4f84c66d1459f8043f913a2e23d9b"}}"#)
        .create();
    let _stream_mock = server
        .mock("GET", Matcher::Regex("/v1/markets/events/.*".into()))
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_chunked_body(|writer| {
            writer.write_all(b"event: heartbeat\ndata: {}\n\n")?;
            std::thread::sleep(std::time::Duration::from_millis(500));
            Ok(())
        })
        .create();

    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async {
        let client = ClientBuilder::new()
            .access_token("T123")
            .testing_url(&server.url())
            .build()
            .unwrap();

        let mut session = StreamingSession::new(client);
        session
            .start_market_http(&["SPY"], |_| {}, |_| {})
            .await
            .unwrap();

        session.stop().await;
        assert_eq!(session.connection_state(), ConnectionState::Disconnected);

        // A second stop is a no-op.
        session.stop().await;
        assert_eq!(session.connection_state(), ConnectionState::Disconnected);
        assert!(!session.is_streaming());
    });
}
