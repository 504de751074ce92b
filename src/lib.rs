//! # Tradier Rust Client
//!
//! Ergonomic async Rust client for the Tradier brokerage API.
//!
//! ## Features
//!
//! - Accounts: profile, balances, positions, history, gain/loss
//! - Market data: quotes (with greeks), clock, calendar, history,
//!   time & sales, option chains, search, fundamentals (beta)
//! - Trading: equity, option, multileg, combo, OTO, OCO, bracket
//!   (OTOCO), and categorized spread orders, with pre-flight
//!   validation and bracket risk analysis
//! - Streaming: market and account events over WebSocket or SSE, with
//!   dynamic subscriptions, data-type filtering, and automatic
//!   reconnection
//!
//! ## Usage
//!
//! Fetch a couple of quotes and stream live ones:
//! ```ignore
//! use tradier::{ClientBuilder, Environment, Error};
//! use tradier::streaming::StreamingSession;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Error> {
//!     let client = ClientBuilder::new()
//!         .access_token("YOUR_ACCESS_TOKEN")
//!         .environment(Environment::Production)
//!         .build()?;
//!
//!     let quotes = client.get_quotes(&["AAPL", "MSFT"], false).await?;
//!     for quote in &quotes {
//!         println!("{}: {}", quote.symbol, quote.last);
//!     }
//!
//!     let mut session = StreamingSession::new(client);
//!     session
//!         .start_market_websocket(
//!             &["AAPL", "MSFT"],
//!             |frame| println!("{frame}"),
//!             |status| eprintln!("{status}"),
//!         )
//!         .await?;
//!
//!     tokio::time::sleep(std::time::Duration::from_secs(30)).await;
//!     session.stop().await;
//!     Ok(())
//! }
//! ```
//!
//! Place a validated bracket order:
//! ```ignore
//! use tradier::execution::{OrderRequest, OtocoOrder};
//!
//! let bracket = OrderRequest::Otoco(OtocoOrder::buy_with_bracket(
//!     "AAPL", 100, 150.00, 160.00, 140.00,
//! ));
//! let ack = client.place_order("YOUR_ACCOUNT_ID", &bracket).await?;
//! println!("order id: {}", ack.id);
//! ```

pub mod accounting;
pub mod blocking;
pub mod encode;
pub mod endpoints;
pub mod json_builder;
pub mod market_data;
pub mod responses;
pub mod streaming;
pub mod validation;

pub mod client;
pub use client::{Client, ClientBuilder, Environment, RateLimit};

pub mod error;
pub use error::Error;

pub mod error_codes;
pub use error_codes::{ApiErrorContext, ErrorCategory, ErrorSeverity, RetryBehavior, TradierErrorCode};

pub mod execution;
pub use execution::{OrderClass, OrderDuration, OrderRequest, OrderSide, OrderStatus, OrderType};

pub mod token;
pub use token::AccessToken;

pub use accounting::{AccountBalances, Order, Position, UserProfile};
pub use market_data::{MarketClock, Quote};
pub use streaming::{ConnectionState, StreamingDataType, StreamingSession};
pub use validation::{Issue, Severity, ValidationLevel, ValidationReport};
