use mockito::{Matcher, Server};
use tradier::execution::{
    EquityOrderBuilder, OrderRequest, OrderSide, OrderType, OtocoOrder,
};
use tradier::validation::OrderValidator;
use tradier::{ClientBuilder, Error, ErrorCategory};

#[test]
/// Placing an equity limit order sends the right form body and parses
/// the acknowledgment.
fn test_place_equity_order_mocked() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/v1/accounts/VA12345678/orders")
        .match_header("content-type", "application/x-www-form-urlencoded")
        .match_header("authorization", "Bearer T123")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("class".into(), "equity".into()),
            Matcher::UrlEncoded("symbol".into(), "AAPL".into()),
            Matcher::UrlEncoded("side".into(), "buy".into()),
            Matcher::UrlEncoded("quantity".into(), "100".into()),
            Matcher::UrlEncoded("type".into(), "limit".into()),
            Matcher::UrlEncoded("duration".into(), "day".into()),
            Matcher::UrlEncoded("price".into(), "150.35".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"order":{"id":228175,"status":"ok","partner_id":"tag-1"}}"#)
        .expect(1)
        .create();

    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async {
        let client = ClientBuilder::new()
            .access_token("T123")
            .testing_url(&server.url())
            .build()
            .unwrap();

        let order = OrderRequest::Equity(
            EquityOrderBuilder::new()
                .symbol("AAPL")
                .side(OrderSide::Buy)
                .quantity(100)
                .order_type(OrderType::Limit)
                .price(150.35)
                .build()
                .unwrap(),
        );

        let ack = client.place_order("VA12345678", &order).await.unwrap();
        assert_eq!(ack.id, 228175);
        assert_eq!(ack.status, "ok");
    });

    mock.assert();
}

#[test]
/// An order that fails validation reports the issue and never reaches
/// the wire.
fn test_invalid_order_never_dispatches() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/v1/accounts/VA12345678/orders")
        .expect(0)
        .create();

    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async {
        let client = ClientBuilder::new()
            .access_token("T123")
            .testing_url(&server.url())
            .build()
            .unwrap();

        // Empty symbol: exactly one Error issue on `symbol`.
        let order = OrderRequest::Equity(
            EquityOrderBuilder::new()
                .symbol("")
                .side(OrderSide::Buy)
                .quantity(100)
                .order_type(OrderType::Market)
                .build()
                .unwrap(),
        );

        match client.place_order("VA12345678", &order).await {
            Err(Error::Validation(report)) => {
                assert!(!report.ok());
                let symbol_errors: Vec<_> = report
                    .issues
                    .iter()
                    .filter(|issue| {
                        issue.field == "symbol" && issue.severity >= tradier::Severity::Error
                    })
                    .collect();
                assert_eq!(symbol_errors.len(), 1);
            }
            other => panic!("expected Validation error, got {other:?}"),
        }
    });

    mock.assert();
}

#[test]
/// Broker rejections inside a 200 body surface as taxonomy-backed API
/// errors with recovery guidance.
fn test_broker_rejection_mocked() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/v1/accounts/VA12345678/orders")
        .with_status(200)
        .with_body(r#"{"errors":{"error":"InitialMargin"}}"#)
        .create();

    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async {
        let client = ClientBuilder::new()
            .access_token("T123")
            .testing_url(&server.url())
            .build()
            .unwrap();

        let order = OrderRequest::Equity(
            EquityOrderBuilder::new()
                .symbol("AAPL")
                .side(OrderSide::Buy)
                .quantity(100)
                .order_type(OrderType::Market)
                .build()
                .unwrap(),
        );

        match client.place_order("VA12345678", &order).await {
            Err(Error::Api(ctx)) => {
                assert_eq!(ctx.info().category, ErrorCategory::Margin);
                assert!(!ctx.info().retryable);
                assert!(ctx.detailed_message().contains("Account ID: VA12345678"));
                assert!(ctx.recovery_guidance().contains("Reduce order size"));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    });

    mock.assert();
}

#[test]
/// Bracket orders serialize three indexed components and their risk
/// profile computes from the prices.
fn test_place_bracket_order_mocked() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/v1/accounts/VA12345678/orders")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("class".into(), "otoco".into()),
            Matcher::UrlEncoded("symbol[0]".into(), "AAPL".into()),
            Matcher::UrlEncoded("price[0]".into(), "150.00".into()),
            Matcher::UrlEncoded("side[1]".into(), "sell".into()),
            Matcher::UrlEncoded("price[1]".into(), "160.00".into()),
            Matcher::UrlEncoded("side[2]".into(), "sell".into()),
            Matcher::UrlEncoded("stop[2]".into(), "140.00".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"order":{"id":228180,"status":"ok"}}"#)
        .create();

    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async {
        let client = ClientBuilder::new()
            .access_token("T123")
            .testing_url(&server.url())
            .build()
            .unwrap();

        let bracket = OtocoOrder::buy_with_bracket("AAPL", 100, 150.00, 160.00, 140.00);

        // Primary buy 100 @ 150, profit 160, stop 140.
        let analysis = OrderValidator::analyze_otoco(&bracket);
        assert_eq!(analysis.max_profit, 1000.00);
        assert_eq!(analysis.max_loss, 1000.00);
        assert_eq!(analysis.risk_reward, 1.0);

        let ack = client
            .place_order("VA12345678", &OrderRequest::Otoco(bracket))
            .await
            .unwrap();
        assert_eq!(ack.id, 228180);
    });

    mock.assert();
}

#[test]
/// Cancel goes out as DELETE against the validated order path.
fn test_cancel_order_mocked() {
    let mut server = Server::new();
    let mock = server
        .mock("DELETE", "/v1/accounts/VA12345678/orders/22817512")
        .with_status(200)
        .with_body(r#"{"order":{"id":22817512,"status":"ok"}}"#)
        .create();

    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async {
        let client = ClientBuilder::new()
            .access_token("T123")
            .testing_url(&server.url())
            .build()
            .unwrap();

        let ack = client.cancel_order("VA12345678", "22817512").await.unwrap();
        assert_eq!(ack.id, 22817512);
        assert_eq!(ack.status, "ok");

        // Order ids are numeric-only; anything else fails pre-dispatch.
        let result = client.cancel_order("VA12345678", "DROP TABLE").await;
        assert!(matches!(result, Err(Error::InvalidPathSegment { .. })));
    });

    mock.assert();
}

#[test]
/// Preview carries the preview flag and parses the costing.
fn test_preview_order_mocked() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/v1/accounts/VA12345678/orders")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("preview".into(), "true".into()),
            Matcher::UrlEncoded("class".into(), "equity".into()),
        ]))
        .with_status(200)
        .with_body(
            r#"{"order":{"result":"ok","commission":0.0,"cost":15035.00,"fees":0.02,"symbol":"AAPL","quantity":100.0,"side":"buy","type":"limit","duration":"day","price":150.35,"strategy_type":"equity","day_trades":0,"buying_power":48214.16,"change":15035.00,"amount":15035.00}}"#,
        )
        .create();

    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async {
        let client = ClientBuilder::new()
            .access_token("T123")
            .testing_url(&server.url())
            .build()
            .unwrap();

        let order = OrderRequest::Equity(
            EquityOrderBuilder::new()
                .symbol("AAPL")
                .side(OrderSide::Buy)
                .quantity(100)
                .order_type(OrderType::Limit)
                .price(150.35)
                .build()
                .unwrap(),
        );

        let preview = client.preview_order("VA12345678", &order).await.unwrap();
        assert_eq!(preview.result, "ok");
        assert_eq!(preview.cost, 15035.00);
        assert_eq!(preview.order_type, OrderType::Limit);
    });

    mock.assert();
}
