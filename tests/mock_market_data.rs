use mockito::{Matcher, Server};
use tradier::{ClientBuilder, Error};

#[test]
/// This test ensures quote fetching hits the right endpoint with the
/// right auth header and parses the response.
fn test_get_quotes_mocked() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/v1/markets/quotes")
        .match_query(Matcher::UrlEncoded("symbols".into(), "AAPL,MSFT".into()))
        .match_header("authorization", "Bearer T123")
        .with_status(200)
        .with_body(
            r#"{"quotes":{"quote":{"symbol":"AAPL","description":"Apple Inc","exch":"Q","type":"stock","last":150.35,"change":1.25,"change_percentage":0.84,"volume":52164407,"average_volume":58044012,"last_volume":100,"trade_date":1709303400000,"open":149.50,"high":151.20,"low":149.10,"close":150.35,"prevclose":149.10,"week_52_high":199.62,"week_52_low":124.17,"bid":150.30,"bidsize":4,"bidexch":"Q","bid_date":1709303400000,"ask":150.40,"asksize":2,"askexch":"Q","ask_date":1709303400000}}}"#,
        )
        .expect(1)
        .create();

    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async {
        let client = ClientBuilder::new()
            .access_token("T123")
            .testing_url(&server.url())
            .build()
            .unwrap();

        let quotes = client.get_quotes(&["AAPL", "MSFT"], false).await.unwrap();
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].symbol, "AAPL");
        assert_eq!(quotes[0].last, 150.35);
        assert_eq!(quotes[0].bid, 150.30);
    });

    mock.assert();
}

#[test]
/// Greeks come back on option quotes when requested.
fn test_get_option_quotes_with_greeks_mocked() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/v1/markets/quotes")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("symbols".into(), "AAPL240315C00150000".into()),
            Matcher::UrlEncoded("greeks".into(), "true".into()),
        ]))
        .with_status(200)
        .with_body(
            r#"{"quotes":{"quote":{"symbol":"AAPL240315C00150000","type":"option","last":5.25,"strike":150.0,"option_type":"call","root_symbol":"AAPL","expiration_date":"2024-03-15","open_interest":4521,"greeks":{"delta":0.52,"gamma":0.04,"theta":-0.08,"vega":0.11,"rho":0.03,"phi":-0.02,"bid_iv":0.24,"mid_iv":0.25,"ask_iv":0.26,"smv_vol":0.25,"updated_at":"2024-03-01 14:30:00"}}}}"#,
        )
        .create();

    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async {
        let client = ClientBuilder::new()
            .access_token("T123")
            .testing_url(&server.url())
            .build()
            .unwrap();

        let quotes = client
            .get_quotes(&["AAPL240315C00150000"], true)
            .await
            .unwrap();
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].strike, Some(150.0));
        let greeks = quotes[0].greeks.as_ref().unwrap();
        assert_eq!(greeks.delta, 0.52);
    });

    mock.assert();
}

#[test]
/// The market clock parses and classifies the session state.
fn test_get_clock_mocked() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/v1/markets/clock")
        .with_status(200)
        .with_body(
            r#"{"clock":{"date":"2024-03-01","description":"Market is open from 09:30 to 16:00","state":"open","timestamp":1709303400,"next_change":"16:00","next_state":"postmarket"}}"#,
        )
        .create();

    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async {
        let client = ClientBuilder::new()
            .access_token("T123")
            .testing_url(&server.url())
            .build()
            .unwrap();

        let clock = client.get_clock().await.unwrap();
        assert!(clock.is_open());
        assert_eq!(clock.next_state, "postmarket");
    });

    mock.assert();
}

#[test]
/// Historical bars decode from the history envelope.
fn test_get_history_mocked() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/v1/markets/history")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("symbol".into(), "MSFT".into()),
            Matcher::UrlEncoded("interval".into(), "daily".into()),
        ]))
        .with_status(200)
        .with_body(
            r#"{"history":{"day":[{"date":"2024-02-28","open":408.01,"high":410.20,"low":405.80,"close":407.48,"volume":18201156},{"date":"2024-02-29","open":407.70,"high":414.20,"low":405.92,"close":413.64,"volume":23942812}]}}"#,
        )
        .create();

    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async {
        let client = ClientBuilder::new()
            .access_token("T123")
            .testing_url(&server.url())
            .build()
            .unwrap();

        let bars = client.get_history("MSFT", "daily", None, None).await.unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[1].close, 413.64);
    });

    mock.assert();
}

#[test]
/// Option expirations tolerate the bare-array envelope.
fn test_get_option_expirations_mocked() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/v1/markets/options/expirations")
        .match_query(Matcher::UrlEncoded("symbol".into(), "SPY".into()))
        .with_status(200)
        .with_body(r#"{"expirations":{"date":["2024-03-15","2024-03-22","2024-04-19"]}}"#)
        .create();

    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async {
        let client = ClientBuilder::new()
            .access_token("T123")
            .testing_url(&server.url())
            .build()
            .unwrap();

        let dates = client.get_option_expirations("SPY", false).await.unwrap();
        assert_eq!(dates.len(), 3);
        assert_eq!(dates[0], "2024-03-15");
    });

    mock.assert();
}

#[test]
/// An exhausted server-reported budget gates the next request locally:
/// it fails with a rate-limit error and performs no I/O.
fn test_rate_limit_gate_mocked() {
    let mut server = Server::new();
    let expiry = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs()
        + 30;
    let mock = server
        .mock("GET", "/v1/markets/quotes")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("X-Ratelimit-Available", "0")
        .with_header("X-Ratelimit-Used", "120")
        .with_header("X-Ratelimit-Expiry", &expiry.to_string())
        .with_body(r#"{"quotes":{"quote":{"symbol":"AAPL","last":150.35}}}"#)
        .expect(1)
        .create();

    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async {
        let client = ClientBuilder::new()
            .access_token("T123")
            .testing_url(&server.url())
            .build()
            .unwrap();

        // First request goes through and records the exhausted budget.
        let quotes = client.get_quotes(&["AAPL"], false).await.unwrap();
        assert_eq!(quotes.len(), 1);
        assert!(client.is_rate_limited("/v1/markets/quotes"));

        // Second request is gated before any I/O.
        match client.get_quotes(&["AAPL"], false).await {
            Err(Error::RateLimited { endpoint_group, resets_in, .. }) => {
                assert_eq!(endpoint_group, "/v1/markets/quotes");
                assert!(resets_in.as_secs() <= 30);
            }
            other => panic!("expected RateLimited, got {other:?}"),
        }

        // Other endpoint groups are unaffected.
        assert!(!client.is_rate_limited("/v1/markets/clock"));
    });

    // Exactly one request reached the server.
    mock.assert();
}

#[test]
/// The blocking adapter drives the async core to completion on its own
/// runtime.
fn test_blocking_client_mocked() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/v1/markets/quotes")
        .match_query(Matcher::UrlEncoded("symbols".into(), "TLT".into()))
        .with_status(200)
        .with_body(r#"{"quotes":{"quote":{"symbol":"TLT","last":92.70,"bid":92.67,"ask":92.73}}}"#)
        .create();

    let client = ClientBuilder::new()
        .access_token("T123")
        .testing_url(&server.url())
        .build()
        .unwrap();
    let blocking = tradier::blocking::BlockingClient::new(client).unwrap();

    let quotes = blocking.get_quotes(&["TLT"], false).unwrap();
    assert_eq!(quotes.len(), 1);
    assert_eq!(quotes[0].symbol, "TLT");
    assert_eq!(quotes[0].last, 92.70);

    mock.assert();
}

#[test]
/// Invalid symbols are rejected before any request is dispatched.
fn test_invalid_symbol_never_dispatches() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/v1/markets/history")
        .match_query(Matcher::Any)
        .expect(0)
        .create();

    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async {
        let client = ClientBuilder::new()
            .access_token("T123")
            .testing_url(&server.url())
            .build()
            .unwrap();

        let result = client.get_history("not a symbol", "daily", None, None).await;
        assert!(matches!(result, Err(Error::InvalidPathSegment { .. })));
    });

    mock.assert();
}
