use crate::error_codes::ApiErrorContext;
use crate::validation::ValidationReport;

/// Tradier API Client Error
#[derive(Debug)]
pub enum Error {
    /// Network/TLS/transport failure from the underlying HTTP client.
    Request(reqwest::Error),

    /// The server answered with a non-2xx status; carries the status code
    /// and the raw response body.
    HttpStatus(u16, String),

    /// A response body (or stream frame) failed to parse as JSON.
    Json(serde_json::Error),

    /// The endpoint's rate budget is exhausted. Raised locally, before
    /// any I/O, when the last server-reported record still gates the
    /// endpoint group.
    RateLimited {
        endpoint_group: String,
        available: u32,
        resets_in: std::time::Duration,
    },

    /// No credentials configured, or the server rejected them.
    Unauthorized(String),

    /// A path segment or order request failed pre-flight validation.
    Validation(ValidationReport),

    /// A path parameter did not match the format the broker accepts.
    InvalidPathSegment {
        kind: &'static str,
        value: String,
    },

    /// A broker-reported error code, enriched with taxonomy context.
    Api(ApiErrorContext),

    /// The streaming session could not be established or was torn down.
    Stream(String),

    /// The session ticket could not be created or refreshed.
    Session(String),

    /// All reconnection attempts were exhausted.
    ReconnectExhausted { attempts: u32 },

    /// Websocket transport failure.
    WebSocket(tokio_tungstenite::tungstenite::Error),

    /// A URL could not be assembled from base + endpoint + query.
    Url(url::ParseError),

    // Builder misuse: required fields left unset.
    SymbolNotSet,
    QuantityNotSet,
    SideNotSet,
    OrderTypeNotSet,
    LegsNotSet,
    SpreadTypeNotSet,
    ComponentNotSet(&'static str),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Request(e) => write!(f, "request failed: {e}"),
            Self::HttpStatus(status, body) => {
                write!(f, "HTTP {status}: {body}")
            }
            Self::Json(e) => write!(f, "invalid JSON: {e}"),
            Self::RateLimited {
                endpoint_group,
                available,
                resets_in,
            } => write!(
                f,
                "rate limited on `{endpoint_group}` ({available} available, resets in {}s)",
                resets_in.as_secs()
            ),
            Self::Unauthorized(msg) => write!(f, "unauthorized: {msg}"),
            Self::Validation(report) => {
                write!(f, "validation failed: {}", report.summary())
            }
            Self::InvalidPathSegment { kind, value } => {
                write!(f, "invalid {kind}: `{value}`")
            }
            Self::Api(ctx) => write!(f, "{}", ctx.short_message()),
            Self::Stream(msg) => write!(f, "stream error: {msg}"),
            Self::Session(msg) => write!(f, "session error: {msg}"),
            Self::ReconnectExhausted { attempts } => {
                write!(f, "gave up reconnecting after {attempts} attempts")
            }
            Self::WebSocket(e) => write!(f, "websocket error: {e}"),
            Self::Url(e) => write!(f, "invalid url: {e}"),
            Self::SymbolNotSet => write!(f, "`symbol` is required to build this order"),
            Self::QuantityNotSet => write!(f, "`quantity` is required to build this order"),
            Self::SideNotSet => write!(f, "`side` is required to build this order"),
            Self::OrderTypeNotSet => write!(f, "`type` is required to build this order"),
            Self::LegsNotSet => write!(f, "at least one leg is required to build this order"),
            Self::SpreadTypeNotSet => write!(f, "`spread_type` is required to build this order"),
            Self::ComponentNotSet(which) => {
                write!(f, "`{which}` component is required to build this order")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Request(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::WebSocket(e) => Some(e),
            Self::Url(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Error {
        Error::Request(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        Error::Json(err)
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for Error {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Error {
        Error::WebSocket(err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Error {
        Error::Url(err)
    }
}

impl Error {
    /// Whether the taxonomy marks this error as retryable.
    ///
    /// Only broker-reported codes and rate limits carry retry advice;
    /// everything else is `false`.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Api(ctx) => ctx.info().retryable,
            Self::RateLimited { .. } => true,
            _ => false,
        }
    }
}
