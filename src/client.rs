use crate::encode::{base64_encode, form_encode};
use crate::endpoints::{self, AuthRequirement, BoundEndpoint, Method};
use crate::Error;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Which Tradier deployment the client talks to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Production,
    Sandbox,
}

impl Environment {
    /// REST base URL for the environment.
    pub fn base_url(self) -> &'static str {
        match self {
            Self::Production => endpoints::PRODUCTION_BASE,
            Self::Sandbox => endpoints::SANDBOX_BASE,
        }
    }

    /// WebSocket host for the environment.
    pub fn ws_url(self) -> &'static str {
        match self {
            Self::Production => endpoints::PRODUCTION_WS,
            Self::Sandbox => endpoints::SANDBOX_WS,
        }
    }
}

/// The server-reported request budget for one endpoint group.
///
/// Updated only from response headers; the client never recomputes
/// budgets locally. After `expiry` the record is stale and stops gating.
#[derive(Clone, Copy, Debug)]
pub struct RateLimit {
    pub available: u32,
    pub used: u32,
    pub expiry: SystemTime,
}

impl RateLimit {
    /// Whether this record currently blocks requests.
    pub fn is_exhausted(&self, now: SystemTime) -> bool {
        self.available == 0 && now < self.expiry
    }
}

#[derive(Clone, Debug)]
/// Tradier API Client
///
/// Owns the TLS transport, the credentials, and the rate-limit table.
/// Cloning is cheap and clones share the rate-limit table, so one
/// process-wide budget view survives handing clones to worker tasks.
pub struct Client {
    /// The HTTP client for sending requests.
    http_client: reqwest::Client,

    /// Bearer token for account/market/beta endpoints.
    access_token: Option<String>,

    /// Client id for HTTP Basic on the token exchange.
    client_id: Option<String>,

    /// Client secret for HTTP Basic on the token exchange.
    client_secret: Option<String>,

    /// The base url used for all endpoints.
    ///
    /// NOTE: Leave this default unless you specifically want a custom
    /// address for testing or mocking purposes.
    pub base_url: String,

    /// The websocket host streams connect to.
    ws_url: String,

    /// Per-request timeout. Defaults to 30 seconds.
    timeout: Duration,

    rate_limits: Arc<Mutex<HashMap<&'static str, RateLimit>>>,
}

impl Client {
    /// The configured per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Clone this client with a different per-request timeout.
    ///
    /// Clones share the rate-limit table, so overriding the timeout for
    /// one call does not fork budget accounting.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        let mut client = self.clone();
        client.timeout = timeout;
        client
    }

    /// The bearer token, when one is configured.
    pub(crate) fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    /// The websocket host for this client's environment.
    pub(crate) fn ws_url(&self) -> &str {
        &self.ws_url
    }

    /// The OAuth client id, when credentials are configured.
    pub(crate) fn oauth_client_id(&self) -> Option<&str> {
        self.client_id.as_deref()
    }

    /// The last server-reported rate-limit record for an endpoint group.
    pub fn rate_limit(&self, endpoint_group: &str) -> Option<RateLimit> {
        self.rate_limits
            .lock()
            .expect("rate limit table poisoned")
            .get(endpoint_group)
            .copied()
    }

    /// Whether the endpoint group is currently gated locally.
    pub fn is_rate_limited(&self, endpoint_group: &str) -> bool {
        self.rate_limit(endpoint_group)
            .map(|record| record.is_exhausted(SystemTime::now()))
            .unwrap_or(false)
    }

    /// Send a request to a bound endpoint.
    ///
    /// `query` lands in the URL for every method; `form` is encoded as
    /// an `application/x-www-form-urlencoded` body for POST and PUT.
    /// On 2xx the body parses as JSON and the root element is returned.
    pub(crate) async fn send(
        &self,
        bound: &BoundEndpoint,
        query: &[(String, String)],
        form: &[(String, String)],
    ) -> Result<Value, Error> {
        self.check_rate_limit(bound)?;

        let url = self.build_url(&bound.path, query);
        tracing::debug!(
            method = bound.endpoint.method.as_str(),
            path = %bound.path,
            "dispatching request"
        );

        let mut request = match bound.endpoint.method {
            Method::Get => self.http_client.get(&url),
            Method::Post => self.http_client.post(&url),
            Method::Put => self.http_client.put(&url),
            Method::Delete => self.http_client.delete(&url),
        }
        .timeout(self.timeout)
        .header(reqwest::header::ACCEPT, "application/json");

        request = self.authorize(request, bound.endpoint.auth)?;

        if matches!(bound.endpoint.method, Method::Post | Method::Put) {
            let body = form_encode(form.iter().map(|(k, v)| (k.as_str(), v.as_str())));
            request = request
                .header(reqwest::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(body);
        }

        let response = request.send().await?;
        self.record_rate_limit(bound, response.headers());

        let status = response.status();
        let body = response.text().await?;

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(Error::Unauthorized(body));
        }
        if !status.is_success() {
            return Err(Error::HttpStatus(status.as_u16(), body));
        }

        if body.trim().is_empty() {
            Ok(Value::Null)
        } else {
            Ok(serde_json::from_str(&body)?)
        }
    }

    /// Open a streaming GET against a bound endpoint, requesting
    /// `text/event-stream`, and hand back the raw response for
    /// incremental reads.
    pub(crate) async fn open_event_stream(
        &self,
        bound: &BoundEndpoint,
        query: &[(String, String)],
    ) -> Result<reqwest::Response, Error> {
        let url = self.build_url(&bound.path, query);

        let mut request = self
            .http_client
            .get(&url)
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .header(reqwest::header::CACHE_CONTROL, "no-cache");
        request = self.authorize(request, bound.endpoint.auth)?;

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Stream(format!(
                "stream request failed with status {status}: {body}"
            )));
        }

        Ok(response)
    }

    fn authorize(
        &self,
        request: reqwest::RequestBuilder,
        auth: AuthRequirement,
    ) -> Result<reqwest::RequestBuilder, Error> {
        match auth {
            AuthRequirement::None => Ok(request),
            AuthRequirement::Bearer => {
                let token = self
                    .access_token
                    .as_ref()
                    .ok_or_else(|| Error::Unauthorized("no access token configured".into()))?;
                Ok(request.header(reqwest::header::AUTHORIZATION, format!("Bearer {token}")))
            }
            AuthRequirement::Basic => {
                let (id, secret) = match (&self.client_id, &self.client_secret) {
                    (Some(id), Some(secret)) => (id, secret),
                    _ => {
                        return Err(Error::Unauthorized(
                            "no client credentials configured".into(),
                        ))
                    }
                };
                let encoded = base64_encode(format!("{id}:{secret}").as_bytes());
                Ok(request.header(reqwest::header::AUTHORIZATION, format!("Basic {encoded}")))
            }
        }
    }

    fn build_url(&self, path: &str, query: &[(String, String)]) -> String {
        if query.is_empty() {
            format!("{}{path}", self.base_url)
        } else {
            let qs = form_encode(query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
            format!("{}{path}?{qs}", self.base_url)
        }
    }

    // Local gate: if the last record for this group is exhausted and
    // unexpired, fail without transmitting.
    fn check_rate_limit(&self, bound: &BoundEndpoint) -> Result<(), Error> {
        let table = self.rate_limits.lock().expect("rate limit table poisoned");
        if let Some(record) = table.get(bound.endpoint.template) {
            let now = SystemTime::now();
            if record.is_exhausted(now) {
                let resets_in = record.expiry.duration_since(now).unwrap_or_default();
                return Err(Error::RateLimited {
                    endpoint_group: bound.endpoint.template.to_string(),
                    available: record.available,
                    resets_in,
                });
            }
        }
        Ok(())
    }

    fn record_rate_limit(&self, bound: &BoundEndpoint, headers: &reqwest::header::HeaderMap) {
        let header_u64 = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok())
        };

        let (available, used, expiry) = match (
            header_u64("X-Ratelimit-Available"),
            header_u64("X-Ratelimit-Used"),
            header_u64("X-Ratelimit-Expiry"),
        ) {
            (Some(available), Some(used), Some(expiry)) => (available, used, expiry),
            _ => return,
        };

        let record = RateLimit {
            available: available as u32,
            used: used as u32,
            expiry: UNIX_EPOCH + Duration::from_secs(expiry),
        };

        tracing::debug!(
            group = bound.endpoint.template,
            available = record.available,
            used = record.used,
            "rate limit updated"
        );

        self.rate_limits
            .lock()
            .expect("rate limit table poisoned")
            .insert(bound.endpoint.template, record);
    }
}

#[derive(Debug, Default)]
/// Builder for `Client`
pub struct ClientBuilder;

#[derive(Debug, Default)]
/// First step to building a `Client`.
pub struct Step1;
#[derive(Debug, Default)]
/// Second step to building a `Client`.
pub struct Step2;
#[derive(Debug, Default)]
/// Third step to building a `Client`.
pub struct Step3;

#[derive(Debug, Default)]
/// Phantom type for compile-time enforcement on the order of builder
/// steps used.
pub struct ClientBuilderStep<CurrentStep> {
    _current_step: CurrentStep,
    http_client: Option<reqwest::Client>,
    access_token: Option<String>,
    client_id: Option<String>,
    client_secret: Option<String>,
    environment: Environment,
    timeout: Duration,
    testing_url: Option<String>,
}

impl ClientBuilder {
    #[allow(clippy::new_ret_no_self)]
    /// Instantiate a new instance of `ClientBuilder`.
    pub fn new() -> ClientBuilderStep<Step1> {
        ClientBuilderStep {
            _current_step: Step1,
            http_client: Some(reqwest::Client::new()),
            timeout: Duration::from_secs(30),
            ..Default::default()
        }
    }
}

impl ClientBuilderStep<Step1> {
    /// Set the bearer access token used on account/market endpoints.
    pub fn access_token(self, token: &str) -> ClientBuilderStep<Step2> {
        ClientBuilderStep {
            _current_step: Step2,
            http_client: self.http_client,
            access_token: Some(token.into()),
            client_id: self.client_id,
            client_secret: self.client_secret,
            environment: self.environment,
            timeout: self.timeout,
            testing_url: self.testing_url,
        }
    }

    /// Set the client id/secret used for HTTP Basic on the OAuth
    /// token-exchange endpoint.
    pub fn credentials(self, client_id: &str, client_secret: &str) -> ClientBuilderStep<Step2> {
        ClientBuilderStep {
            _current_step: Step2,
            http_client: self.http_client,
            access_token: self.access_token,
            client_id: Some(client_id.into()),
            client_secret: Some(client_secret.into()),
            environment: self.environment,
            timeout: self.timeout,
            testing_url: self.testing_url,
        }
    }

    /// Set the testing url for the client to use for sending ALL
    /// requests to your test/mock server instead of the Tradier API.
    ///
    /// NOTE: This should ONLY be set for testing and mocking purposes.
    pub fn testing_url(self, url: &str) -> ClientBuilderStep<Step3> {
        ClientBuilderStep {
            _current_step: Step3,
            http_client: self.http_client,
            access_token: Some(String::from("NO_ACCESS_TOKEN_IN_TEST_MODE")),
            client_id: self.client_id,
            client_secret: self.client_secret,
            environment: self.environment,
            timeout: self.timeout,
            testing_url: Some(url.into()),
        }
    }
}

impl ClientBuilderStep<Step2> {
    /// Layer client credentials on top of a bearer token (or vice
    /// versa) so one client can serve both auth schemes.
    pub fn credentials(mut self, client_id: &str, client_secret: &str) -> Self {
        self.client_id = Some(client_id.into());
        self.client_secret = Some(client_secret.into());
        self
    }

    /// Set the bearer access token.
    pub fn access_token(mut self, token: &str) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Select the deployment to talk to.
    pub fn environment(self, environment: Environment) -> ClientBuilderStep<Step3> {
        ClientBuilderStep {
            _current_step: Step3,
            http_client: self.http_client,
            access_token: self.access_token,
            client_id: self.client_id,
            client_secret: self.client_secret,
            environment,
            timeout: self.timeout,
            testing_url: self.testing_url,
        }
    }

    /// Route ALL requests to a test/mock server.
    pub fn testing_url(self, url: &str) -> ClientBuilderStep<Step3> {
        ClientBuilderStep {
            _current_step: Step3,
            http_client: self.http_client,
            access_token: self
                .access_token
                .or_else(|| Some(String::from("NO_ACCESS_TOKEN_IN_TEST_MODE"))),
            client_id: self.client_id,
            client_secret: self.client_secret,
            environment: self.environment,
            timeout: self.timeout,
            testing_url: Some(url.into()),
        }
    }

    /// Finish building with the default production environment.
    pub fn build(self) -> Result<Client, Error> {
        self.environment(Environment::Production).build()
    }
}

impl ClientBuilderStep<Step3> {
    /// Override the default 30 second per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Finish building into a `Client`.
    pub fn build(self) -> Result<Client, Error> {
        // Panic safe due to the compile-time enforced step order.
        let http_client = self.http_client.unwrap();

        let (base_url, ws_url) = match &self.testing_url {
            Some(url) => (url.clone(), url.replace("http", "ws")),
            None => (
                self.environment.base_url().to_string(),
                self.environment.ws_url().to_string(),
            ),
        };

        Ok(Client {
            http_client,
            access_token: self.access_token,
            client_id: self.client_id,
            client_secret: self.client_secret,
            base_url,
            ws_url,
            timeout: self.timeout,
            rate_limits: Arc::new(Mutex::new(HashMap::new())),
        })
    }
}
