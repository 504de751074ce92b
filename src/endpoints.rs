//! Compile-time catalog of every endpoint the client talks to.
//!
//! Each entry fixes the path template, HTTP method, authentication
//! requirement, and per-second rate budget. Parameterized endpoints
//! expose typed constructors that validate every interpolated segment
//! before composing the final path, so an invalid account or order id
//! never reaches the wire. Rate-limit records are keyed by the template,
//! not the bound path, so all orders for all accounts share one budget.

use crate::validation::{validate_account_id, validate_order_id, validate_session_id};
use crate::Error;

/// Production REST host.
pub const PRODUCTION_BASE: &str = "https://api.tradier.com";
/// Sandbox REST host.
pub const SANDBOX_BASE: &str = "https://sandbox.tradier.com";
/// Production streaming host.
pub const PRODUCTION_WS: &str = "wss://ws.tradier.com";
/// Sandbox streaming host.
pub const SANDBOX_WS: &str = "wss://sandbox-ws.tradier.com";

/// HTTP method an endpoint is called with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

/// What `Authorization` header an endpoint requires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthRequirement {
    /// No authentication.
    None,
    /// `Basic base64(client_id:client_secret)`; only the token exchange.
    Basic,
    /// `Bearer <token>`; everything else.
    Bearer,
}

/// One immutable catalog entry.
#[derive(Clone, Copy, Debug)]
pub struct Endpoint {
    /// Path template; `{name}` placeholders mark parameterized segments.
    pub template: &'static str,
    pub method: Method,
    pub auth: AuthRequirement,
    /// Requests per second the server budgets for this endpoint group.
    pub rate_budget: u32,
}

/// An endpoint with its placeholders filled in and validated.
#[derive(Clone, Debug)]
pub struct BoundEndpoint {
    pub endpoint: Endpoint,
    pub path: String,
}

impl Endpoint {
    const fn new(template: &'static str, method: Method, auth: AuthRequirement, rate_budget: u32) -> Self {
        Self {
            template,
            method,
            auth,
            rate_budget,
        }
    }

    /// Bind an endpoint that has no placeholders.
    pub fn bind(self) -> BoundEndpoint {
        BoundEndpoint {
            path: self.template.to_string(),
            endpoint: self,
        }
    }
}

pub mod authentication {
    use super::*;

    pub const OAUTH_AUTHORIZE: Endpoint =
        Endpoint::new("/oauth/authorize", Method::Get, AuthRequirement::None, 60);
    pub const OAUTH_ACCESS_TOKEN: Endpoint =
        Endpoint::new("/oauth/accesstoken", Method::Post, AuthRequirement::Basic, 60);
}

pub mod user {
    use super::*;

    pub const PROFILE: Endpoint =
        Endpoint::new("/v1/user/profile", Method::Get, AuthRequirement::Bearer, 60);
}

pub mod accounts {
    use super::*;

    pub const BALANCES: Endpoint = Endpoint::new(
        "/v1/accounts/{account_id}/balances",
        Method::Get,
        AuthRequirement::Bearer,
        120,
    );
    pub const POSITIONS: Endpoint = Endpoint::new(
        "/v1/accounts/{account_id}/positions",
        Method::Get,
        AuthRequirement::Bearer,
        120,
    );
    pub const HISTORY: Endpoint = Endpoint::new(
        "/v1/accounts/{account_id}/history",
        Method::Get,
        AuthRequirement::Bearer,
        120,
    );
    pub const GAIN_LOSS: Endpoint = Endpoint::new(
        "/v1/accounts/{account_id}/gainloss",
        Method::Get,
        AuthRequirement::Bearer,
        120,
    );
    pub const ORDERS: Endpoint = Endpoint::new(
        "/v1/accounts/{account_id}/orders",
        Method::Get,
        AuthRequirement::Bearer,
        180,
    );
    pub const CREATE_ORDER: Endpoint = Endpoint::new(
        "/v1/accounts/{account_id}/orders",
        Method::Post,
        AuthRequirement::Bearer,
        180,
    );
    pub const ORDER: Endpoint = Endpoint::new(
        "/v1/accounts/{account_id}/orders/{order_id}",
        Method::Get,
        AuthRequirement::Bearer,
        180,
    );
    pub const MODIFY_ORDER: Endpoint = Endpoint::new(
        "/v1/accounts/{account_id}/orders/{order_id}",
        Method::Put,
        AuthRequirement::Bearer,
        180,
    );
    pub const CANCEL_ORDER: Endpoint = Endpoint::new(
        "/v1/accounts/{account_id}/orders/{order_id}",
        Method::Delete,
        AuthRequirement::Bearer,
        180,
    );
    pub const EVENTS_SESSION: Endpoint = Endpoint::new(
        "/v1/accounts/events/session",
        Method::Post,
        AuthRequirement::Bearer,
        5,
    );
    pub const EVENTS_STREAM: Endpoint = Endpoint::new(
        "/v1/accounts/events/{session_id}",
        Method::Get,
        AuthRequirement::Bearer,
        1,
    );

    /// Bind the account SSE stream endpoint for a validated ticket.
    pub fn events_stream(session_id: &str) -> Result<BoundEndpoint, Error> {
        let session_id = validate_session_id(session_id)?;
        Ok(BoundEndpoint {
            endpoint: EVENTS_STREAM,
            path: format!("/v1/accounts/events/{session_id}"),
        })
    }

    pub fn balances(account_id: &str) -> Result<BoundEndpoint, Error> {
        bind_account(BALANCES, account_id, "balances")
    }

    pub fn positions(account_id: &str) -> Result<BoundEndpoint, Error> {
        bind_account(POSITIONS, account_id, "positions")
    }

    pub fn history(account_id: &str) -> Result<BoundEndpoint, Error> {
        bind_account(HISTORY, account_id, "history")
    }

    pub fn gain_loss(account_id: &str) -> Result<BoundEndpoint, Error> {
        bind_account(GAIN_LOSS, account_id, "gainloss")
    }

    pub fn orders(account_id: &str) -> Result<BoundEndpoint, Error> {
        bind_account(ORDERS, account_id, "orders")
    }

    pub fn create_order(account_id: &str) -> Result<BoundEndpoint, Error> {
        bind_account(CREATE_ORDER, account_id, "orders")
    }

    pub fn order(account_id: &str, order_id: &str) -> Result<BoundEndpoint, Error> {
        bind_order(ORDER, account_id, order_id)
    }

    pub fn modify_order(account_id: &str, order_id: &str) -> Result<BoundEndpoint, Error> {
        bind_order(MODIFY_ORDER, account_id, order_id)
    }

    pub fn cancel_order(account_id: &str, order_id: &str) -> Result<BoundEndpoint, Error> {
        bind_order(CANCEL_ORDER, account_id, order_id)
    }

    fn bind_account(endpoint: Endpoint, account_id: &str, tail: &str) -> Result<BoundEndpoint, Error> {
        let account_id = validate_account_id(account_id)?;
        Ok(BoundEndpoint {
            endpoint,
            path: format!("/v1/accounts/{account_id}/{tail}"),
        })
    }

    fn bind_order(endpoint: Endpoint, account_id: &str, order_id: &str) -> Result<BoundEndpoint, Error> {
        let account_id = validate_account_id(account_id)?;
        let order_id = validate_order_id(order_id)?;
        Ok(BoundEndpoint {
            endpoint,
            path: format!("/v1/accounts/{account_id}/orders/{order_id}"),
        })
    }
}

pub mod markets {
    use super::*;

    pub const QUOTES: Endpoint =
        Endpoint::new("/v1/markets/quotes", Method::Get, AuthRequirement::Bearer, 120);
    pub const CLOCK: Endpoint =
        Endpoint::new("/v1/markets/clock", Method::Get, AuthRequirement::Bearer, 60);
    pub const CALENDAR: Endpoint =
        Endpoint::new("/v1/markets/calendar", Method::Get, AuthRequirement::Bearer, 60);
    pub const SEARCH: Endpoint =
        Endpoint::new("/v1/markets/search", Method::Get, AuthRequirement::Bearer, 60);
    pub const LOOKUP: Endpoint =
        Endpoint::new("/v1/markets/lookup", Method::Get, AuthRequirement::Bearer, 60);
    pub const HISTORY: Endpoint =
        Endpoint::new("/v1/markets/history", Method::Get, AuthRequirement::Bearer, 120);
    pub const TIME_SALES: Endpoint =
        Endpoint::new("/v1/markets/timesales", Method::Get, AuthRequirement::Bearer, 120);

    pub mod options {
        use super::*;

        pub const CHAINS: Endpoint = Endpoint::new(
            "/v1/markets/options/chains",
            Method::Get,
            AuthRequirement::Bearer,
            60,
        );
        pub const EXPIRATIONS: Endpoint = Endpoint::new(
            "/v1/markets/options/expirations",
            Method::Get,
            AuthRequirement::Bearer,
            60,
        );
        pub const STRIKES: Endpoint = Endpoint::new(
            "/v1/markets/options/strikes",
            Method::Get,
            AuthRequirement::Bearer,
            60,
        );
    }

    pub mod events {
        use super::*;

        pub const SESSION: Endpoint = Endpoint::new(
            "/v1/markets/events/session",
            Method::Post,
            AuthRequirement::Bearer,
            5,
        );
        pub const STREAM: Endpoint = Endpoint::new(
            "/v1/markets/events/{session_id}",
            Method::Get,
            AuthRequirement::Bearer,
            1,
        );

        /// Bind the SSE stream endpoint for a validated session ticket.
        pub fn stream(session_id: &str) -> Result<BoundEndpoint, Error> {
            let session_id = validate_session_id(session_id)?;
            Ok(BoundEndpoint {
                endpoint: STREAM,
                path: format!("/v1/markets/events/{session_id}"),
            })
        }
    }
}

pub mod fundamentals {
    use super::*;

    pub const COMPANY: Endpoint = Endpoint::new(
        "/beta/markets/fundamentals/company",
        Method::Get,
        AuthRequirement::Bearer,
        30,
    );
    pub const RATIOS: Endpoint = Endpoint::new(
        "/beta/markets/fundamentals/ratios",
        Method::Get,
        AuthRequirement::Bearer,
        30,
    );
    pub const FINANCIALS: Endpoint = Endpoint::new(
        "/beta/markets/fundamentals/financials",
        Method::Get,
        AuthRequirement::Bearer,
        30,
    );
    pub const PRICE_STATS: Endpoint = Endpoint::new(
        "/beta/markets/fundamentals/price_stats",
        Method::Get,
        AuthRequirement::Bearer,
        30,
    );
    pub const CORPORATE_CALENDAR: Endpoint = Endpoint::new(
        "/beta/markets/fundamentals/corporate_calendar",
        Method::Get,
        AuthRequirement::Bearer,
        30,
    );
    pub const DIVIDEND: Endpoint = Endpoint::new(
        "/beta/markets/fundamentals/dividend",
        Method::Get,
        AuthRequirement::Bearer,
        30,
    );
}

pub mod websocket {
    /// Market event stream path on the WS host.
    pub const MARKETS: &str = "/v1/markets/events";
    /// Account event stream path on the WS host.
    pub const ACCOUNTS: &str = "/v1/accounts/events";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bound_paths_embed_validated_segments() {
        let bound = accounts::balances("VA12345678").unwrap();
        assert_eq!(bound.path, "/v1/accounts/VA12345678/balances");
        assert_eq!(bound.endpoint.template, "/v1/accounts/{account_id}/balances");
        assert_eq!(bound.endpoint.rate_budget, 120);
    }

    #[test]
    fn invalid_segments_refuse_to_bind() {
        assert!(accounts::balances("nope").is_err());
        assert!(accounts::order("VA12345678", "not-numeric").is_err());
        assert!(markets::events::stream("short").is_err());
    }

    #[test]
    fn order_endpoints_share_one_template_group() {
        let get = accounts::orders("VA12345678").unwrap();
        let create = accounts::create_order("VA12345678").unwrap();
        assert_eq!(get.endpoint.template, create.endpoint.template);
        assert_eq!(create.endpoint.method, Method::Post);
    }

    #[test]
    fn session_endpoints_have_tight_budgets() {
        assert_eq!(markets::events::SESSION.rate_budget, 5);
        assert_eq!(markets::events::STREAM.rate_budget, 1);
        assert_eq!(accounts::EVENTS_SESSION.rate_budget, 5);
    }

    #[test]
    fn auth_requirements() {
        assert_eq!(authentication::OAUTH_ACCESS_TOKEN.auth, AuthRequirement::Basic);
        assert_eq!(user::PROFILE.auth, AuthRequirement::Bearer);
        assert_eq!(authentication::OAUTH_AUTHORIZE.auth, AuthRequirement::None);
    }
}
