//! Blocking companions to the async surface.
//!
//! The crate's core is async-only; these wrappers own a small runtime
//! on one dedicated worker thread and drive the async methods to completion,
//! so synchronous applications can use the client without touching
//! tokio. Every method is a mechanical forward.
//!
//! Do not use these from inside an async context; call the async
//! methods directly there.

use crate::accounting::{AccountBalances, AccountHistory, GainLoss, Order, Position, UserProfile};
use crate::execution::{OrderAck, OrderModification, OrderPreview, OrderRequest};
use crate::market_data::{
    CompanySearch, HistoricalBar, MarketClock, MarketDay, OptionChain, Quote, SymbolLookup,
    TimeSale,
};
use crate::streaming::{StreamingDataType, StreamingSession};
use crate::token::AccessToken;
use crate::{Client, Error};
use serde_json::Value;
use std::sync::Arc;
use tokio::runtime::{Builder, Runtime};

/// A blocking facade over [`Client`].
pub struct BlockingClient {
    inner: Client,
    runtime: Arc<Runtime>,
}

impl BlockingClient {
    /// Wrap an async client in a blocking facade.
    pub fn new(client: Client) -> Result<Self, Error> {
        // One dedicated worker thread keeps spawned stream workers
        // running while the caller is not blocked on a call.
        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .map_err(|e| Error::Stream(format!("failed to build runtime: {e}")))?;
        Ok(Self {
            inner: client,
            runtime: Arc::new(runtime),
        })
    }

    /// The wrapped async client.
    pub fn inner(&self) -> &Client {
        &self.inner
    }

    pub fn get_user_profile(&self) -> Result<UserProfile, Error> {
        self.runtime.block_on(self.inner.get_user_profile())
    }

    pub fn get_balances(&self, account_id: &str) -> Result<AccountBalances, Error> {
        self.runtime.block_on(self.inner.get_balances(account_id))
    }

    pub fn get_positions(&self, account_id: &str) -> Result<Vec<Position>, Error> {
        self.runtime.block_on(self.inner.get_positions(account_id))
    }

    pub fn get_account_history(
        &self,
        account_id: &str,
        page: Option<u32>,
        limit: Option<u32>,
    ) -> Result<AccountHistory, Error> {
        self.runtime
            .block_on(self.inner.get_account_history(account_id, page, limit))
    }

    pub fn get_gain_loss(
        &self,
        account_id: &str,
        page: Option<u32>,
        limit: Option<u32>,
    ) -> Result<GainLoss, Error> {
        self.runtime
            .block_on(self.inner.get_gain_loss(account_id, page, limit))
    }

    pub fn get_orders(&self, account_id: &str, include_tags: bool) -> Result<Vec<Order>, Error> {
        self.runtime
            .block_on(self.inner.get_orders(account_id, include_tags))
    }

    pub fn get_order(&self, account_id: &str, order_id: &str) -> Result<Order, Error> {
        self.runtime.block_on(self.inner.get_order(account_id, order_id))
    }

    pub fn place_order(&self, account_id: &str, order: &OrderRequest) -> Result<OrderAck, Error> {
        self.runtime.block_on(self.inner.place_order(account_id, order))
    }

    pub fn preview_order(
        &self,
        account_id: &str,
        order: &OrderRequest,
    ) -> Result<OrderPreview, Error> {
        self.runtime.block_on(self.inner.preview_order(account_id, order))
    }

    pub fn modify_order(
        &self,
        account_id: &str,
        order_id: &str,
        modification: &OrderModification,
    ) -> Result<OrderAck, Error> {
        self.runtime
            .block_on(self.inner.modify_order(account_id, order_id, modification))
    }

    pub fn cancel_order(&self, account_id: &str, order_id: &str) -> Result<OrderAck, Error> {
        self.runtime.block_on(self.inner.cancel_order(account_id, order_id))
    }

    pub fn get_quotes(&self, symbols: &[&str], greeks: bool) -> Result<Vec<Quote>, Error> {
        self.runtime.block_on(self.inner.get_quotes(symbols, greeks))
    }

    pub fn get_quote(&self, symbol: &str) -> Result<Quote, Error> {
        self.runtime.block_on(self.inner.get_quote(symbol))
    }

    pub fn get_clock(&self) -> Result<MarketClock, Error> {
        self.runtime.block_on(self.inner.get_clock())
    }

    pub fn get_calendar(
        &self,
        month: Option<u8>,
        year: Option<u16>,
    ) -> Result<Vec<MarketDay>, Error> {
        self.runtime.block_on(self.inner.get_calendar(month, year))
    }

    pub fn get_history(
        &self,
        symbol: &str,
        interval: &str,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<Vec<HistoricalBar>, Error> {
        self.runtime
            .block_on(self.inner.get_history(symbol, interval, start, end))
    }

    pub fn get_time_sales(
        &self,
        symbol: &str,
        interval: &str,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<Vec<TimeSale>, Error> {
        self.runtime
            .block_on(self.inner.get_time_sales(symbol, interval, start, end))
    }

    pub fn get_option_chain(
        &self,
        symbol: &str,
        expiration: &str,
        greeks: bool,
    ) -> Result<OptionChain, Error> {
        self.runtime
            .block_on(self.inner.get_option_chain(symbol, expiration, greeks))
    }

    pub fn get_option_expirations(
        &self,
        symbol: &str,
        include_all_roots: bool,
    ) -> Result<Vec<String>, Error> {
        self.runtime
            .block_on(self.inner.get_option_expirations(symbol, include_all_roots))
    }

    pub fn get_option_strikes(&self, symbol: &str, expiration: &str) -> Result<Vec<f64>, Error> {
        self.runtime
            .block_on(self.inner.get_option_strikes(symbol, expiration))
    }

    pub fn search_companies(
        &self,
        query: &str,
        include_indexes: bool,
    ) -> Result<Vec<CompanySearch>, Error> {
        self.runtime
            .block_on(self.inner.search_companies(query, include_indexes))
    }

    pub fn lookup_symbols(&self, query: &str, types: &[&str]) -> Result<Vec<SymbolLookup>, Error> {
        self.runtime.block_on(self.inner.lookup_symbols(query, types))
    }

    pub fn create_access_token(&self, code: &str, redirect_uri: &str) -> Result<AccessToken, Error> {
        self.runtime
            .block_on(self.inner.create_access_token(code, redirect_uri))
    }

    pub fn refresh_access_token(&self, refresh_token: &str) -> Result<AccessToken, Error> {
        self.runtime
            .block_on(self.inner.refresh_access_token(refresh_token))
    }

    /// Create a blocking streaming session sharing this runtime.
    pub fn streaming_session(&self) -> BlockingStreamingSession {
        BlockingStreamingSession {
            inner: StreamingSession::new(self.inner.clone()),
            runtime: Arc::clone(&self.runtime),
        }
    }
}

/// A blocking facade over [`StreamingSession`].
///
/// The worker still runs on the shared runtime; only the control
/// surface blocks.
pub struct BlockingStreamingSession {
    inner: StreamingSession,
    runtime: Arc<Runtime>,
}

impl BlockingStreamingSession {
    pub fn start_market_http(
        &mut self,
        symbols: &[&str],
        on_data: impl Fn(Value) + Send + Sync + 'static,
        on_status: impl Fn(&str) + Send + Sync + 'static,
    ) -> Result<(), Error> {
        let runtime = Arc::clone(&self.runtime);
        runtime.block_on(self.inner.start_market_http(symbols, on_data, on_status))
    }

    pub fn start_market_websocket(
        &mut self,
        symbols: &[&str],
        on_data: impl Fn(Value) + Send + Sync + 'static,
        on_status: impl Fn(&str) + Send + Sync + 'static,
    ) -> Result<(), Error> {
        let runtime = Arc::clone(&self.runtime);
        runtime.block_on(self.inner.start_market_websocket(symbols, on_data, on_status))
    }

    pub fn start_account_http(
        &mut self,
        on_data: impl Fn(Value) + Send + Sync + 'static,
        on_status: impl Fn(&str) + Send + Sync + 'static,
    ) -> Result<(), Error> {
        let runtime = Arc::clone(&self.runtime);
        runtime.block_on(self.inner.start_account_http(on_data, on_status))
    }

    pub fn start_account_websocket(
        &mut self,
        on_data: impl Fn(Value) + Send + Sync + 'static,
        on_status: impl Fn(&str) + Send + Sync + 'static,
    ) -> Result<(), Error> {
        let runtime = Arc::clone(&self.runtime);
        runtime.block_on(self.inner.start_account_websocket(on_data, on_status))
    }

    pub fn stop(&mut self) {
        let runtime = Arc::clone(&self.runtime);
        runtime.block_on(self.inner.stop());
    }

    pub fn add_symbols(&self, symbols: &[&str]) -> Result<(), Error> {
        self.runtime.block_on(self.inner.add_symbols(symbols))
    }

    pub fn remove_symbols(&self, symbols: &[&str]) -> Result<(), Error> {
        self.runtime.block_on(self.inner.remove_symbols(symbols))
    }

    pub fn set_data_filter(&self, types: &[StreamingDataType]) {
        self.inner.set_data_filter(types);
    }

    pub fn clear_data_filter(&self) {
        self.inner.clear_data_filter();
    }

    pub fn connection_state(&self) -> crate::streaming::ConnectionState {
        self.inner.connection_state()
    }
}
