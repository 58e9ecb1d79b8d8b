//! HTTP client wrapper for the Huobi REST API
//!
//! [`Client`] owns the HTTP connection pool, the configured [`ClientOptions`] and the
//! order event channel. Endpoint methods live in the `market` and `exchange`
//! modules as `impl Client` blocks; they all go through [`Client::get`] and
//! [`Client::post`], which sign the request when needed and unwrap the envelope.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::Utc;
use reqwest::{Client as ReqwestClient, Method, Url};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::auth::{encode_query, Credentials};
use crate::error::{Error, Result};
use crate::types::{OrderType, V1Response, V2Response};

/// Base URLs for the Huobi API
pub const DEFAULT_REST_URL: &str = "https://api.huobi.pro";
pub const AWS_REST_URL: &str = "https://api-aws.huobi.pro";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const ORDER_EVENT_CAPACITY: usize = 64;

/// Environment presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApiEnvironment {
    /// Public endpoints at `api.huobi.pro`
    #[default]
    Default,
    /// Endpoints optimized for clients hosted on AWS
    Aws,
}

impl ApiEnvironment {
    fn host(&self) -> &'static str {
        match self {
            ApiEnvironment::Default => "api.huobi.pro",
            ApiEnvironment::Aws => "api-aws.huobi.pro",
        }
    }

    /// REST base URL
    pub fn rest_url(&self) -> &'static str {
        match self {
            ApiEnvironment::Default => DEFAULT_REST_URL,
            ApiEnvironment::Aws => AWS_REST_URL,
        }
    }

    /// Market data WebSocket URL
    pub fn ws_url(&self) -> String {
        format!("wss://{}/ws", self.host())
    }

    /// Authenticated (account and order) WebSocket URL
    pub fn ws_auth_url(&self) -> String {
        format!("wss://{}/ws/v2", self.host())
    }

    /// Market-by-price feed URL
    pub fn ws_mbp_url(&self) -> String {
        format!("wss://{}/feed", self.host())
    }
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub base_url: String,
    pub credentials: Option<Credentials>,
    /// Sign public endpoints too when credentials are present
    pub sign_public_requests: bool,
    pub timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_REST_URL.to_string(),
            credentials: None,
            sign_public_requests: false,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientOptions {
    /// Options for one of the preset environments
    pub fn for_environment(environment: ApiEnvironment) -> Self {
        Self {
            base_url: environment.rest_url().to_string(),
            ..Default::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn with_sign_public_requests(mut self, sign: bool) -> Self {
        self.sign_public_requests = sign;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read options from the environment
    ///
    /// Recognized variables: `HUOBI_API_KEY` and `HUOBI_API_SECRET` (both needed for
    /// credentials), `HUOBI_REST_URL` and `HUOBI_SIGN_PUBLIC` (`1`/`true`).
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut options = Self::default();
        if let Some(url) = lookup("HUOBI_REST_URL").filter(|u| !u.is_empty()) {
            options.base_url = url;
        }
        if let (Some(key), Some(secret)) = (lookup("HUOBI_API_KEY"), lookup("HUOBI_API_SECRET")) {
            if !key.is_empty() && !secret.is_empty() {
                options.credentials = Some(Credentials::new(key, secret));
            }
        }
        options.sign_public_requests = lookup("HUOBI_SIGN_PUBLIC")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);
        options
    }
}

/// Order lifecycle events emitted by the client after a successful call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum OrderEvent {
    Placed {
        order_id: i64,
        symbol: String,
        order_type: OrderType,
        amount: Decimal,
        price: Option<Decimal>,
    },
    Canceled {
        order_id: Option<i64>,
        client_order_id: Option<String>,
    },
}

/// Huobi API client
#[derive(Debug, Clone)]
pub struct Client {
    http: ReqwestClient,
    options: ClientOptions,
    events: broadcast::Sender<OrderEvent>,
}

impl Client {
    /// Create a new client from options
    pub fn new(options: ClientOptions) -> Result<Self> {
        let http = ReqwestClient::builder()
            .timeout(options.timeout)
            .build()
            .map_err(Error::Http)?;
        let (events, _) = broadcast::channel(ORDER_EVENT_CAPACITY);

        Ok(Self {
            http,
            options,
            events,
        })
    }

    /// Create a client without credentials
    pub fn public() -> Result<Self> {
        Self::new(ClientOptions::default())
    }

    /// Create a client for private endpoints
    pub fn with_credentials(api_key: impl Into<String>, api_secret: impl Into<String>) -> Result<Self> {
        Self::new(ClientOptions::default().with_credentials(Credentials::new(api_key, api_secret)))
    }

    /// Replace the credentials used for signing
    pub fn set_credentials(&mut self, credentials: Credentials) {
        self.options.credentials = Some(credentials);
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    pub fn base_url(&self) -> &str {
        self.options.base_url.trim_end_matches('/')
    }

    /// Whether private endpoints can be called
    pub fn has_credentials(&self) -> bool {
        self.options.credentials.is_some()
    }

    /// Get the underlying HTTP client
    pub fn http(&self) -> &ReqwestClient {
        &self.http
    }

    /// Receive order placed/canceled events
    ///
    /// Events are only delivered to receivers that exist when they are sent.
    pub fn subscribe_order_events(&self) -> broadcast::Receiver<OrderEvent> {
        self.events.subscribe()
    }

    pub(crate) fn emit(&self, event: OrderEvent) {
        info!(?event, "order event");
        // no receivers is fine
        let _ = self.events.send(event);
    }

    /// Build an endpoint URL; `version` of `None` is used by the market endpoints
    pub fn url(&self, version: Option<u8>, endpoint: &str) -> String {
        match version {
            Some(v) => format!("{}/v{}/{}", self.base_url(), v, endpoint),
            None => format!("{}/{}", self.base_url(), endpoint),
        }
    }

    /// Send a GET request; every parameter goes in the query
    pub async fn get<R: DeserializeOwned>(&self, url: &str, query: Query, signed: bool) -> Result<R> {
        self.execute(Method::GET, url, query.0, None, signed).await
    }

    /// Send a POST request with a JSON body; only the auth parameters go in the query
    pub async fn post<R: DeserializeOwned>(&self, url: &str, body: Body, signed: bool) -> Result<R> {
        self.execute(Method::POST, url, BTreeMap::new(), Some(body.into_value()), signed)
            .await
    }

    pub(crate) async fn get_v1<T: DeserializeOwned>(&self, url: &str, query: Query, signed: bool) -> Result<T> {
        let response: V1Response<T> = self.get(url, query, signed).await?;
        response.into_data().inspect_err(log_api_error)
    }

    pub(crate) async fn get_v2<T: DeserializeOwned>(&self, url: &str, query: Query, signed: bool) -> Result<T> {
        let response: V2Response<T> = self.get(url, query, signed).await?;
        response.into_data().inspect_err(log_api_error)
    }

    pub(crate) async fn post_v1<T: DeserializeOwned>(&self, url: &str, body: Body, signed: bool) -> Result<T> {
        let response: V1Response<T> = self.post(url, body, signed).await?;
        response.into_data().inspect_err(log_api_error)
    }

    pub(crate) async fn post_v2<T: DeserializeOwned>(&self, url: &str, body: Body, signed: bool) -> Result<T> {
        let response: V2Response<T> = self.post(url, body, signed).await?;
        response.into_data().inspect_err(log_api_error)
    }

    async fn execute<R: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        mut params: BTreeMap<String, String>,
        body: Option<Value>,
        signed: bool,
    ) -> Result<R> {
        let mut url = Url::parse(url)
            .map_err(|e| Error::InvalidParameter(format!("invalid url {url}: {e}")))?;

        let credentials = match (&self.options.credentials, signed) {
            (Some(credentials), true) => Some(credentials),
            (None, true) => {
                return Err(Error::Auth(
                    "no credentials configured for private endpoint".to_string(),
                ))
            }
            (Some(credentials), false) if self.options.sign_public_requests => Some(credentials),
            _ => None,
        };

        if let Some(credentials) = credentials {
            let host = url
                .host_str()
                .ok_or_else(|| Error::InvalidParameter(format!("url has no host: {url}")))?
                .to_string();
            let path = url.path().to_string();
            credentials.sign_params(method.as_str(), &host, &path, &mut params, Utc::now());
        }

        if params.is_empty() {
            url.set_query(None);
        } else {
            url.set_query(Some(&encode_query(&params)));
        }

        debug!(
            method = %method,
            endpoint = url.path(),
            signed = credentials.is_some(),
            "sending request"
        );

        let mut request = self.http.request(method, url);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.map_err(Error::Http)?;
        let status = response.status();
        let text = response.text().await.map_err(Error::Http)?;

        if !status.is_success() {
            let error = error_from_body(status.as_u16(), text);
            log_api_error(&error);
            return Err(error);
        }

        serde_json::from_str(&text).map_err(Error::Json)
    }
}

fn log_api_error(error: &Error) {
    warn!(%error, "request rejected");
}

/// Exchange error fields of either envelope shape
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(rename = "err-code")]
    err_code: Option<String>,
    #[serde(rename = "err-msg")]
    err_msg: Option<String>,
    code: Option<Value>,
    message: Option<String>,
}

fn error_from_body(status: u16, body: String) -> Error {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(&body) {
        if let Some(code) = parsed.err_code {
            return Error::api(code, parsed.err_msg.unwrap_or_default());
        }
        if let Some(code) = parsed.code {
            let code = match code {
                Value::String(s) => s,
                other => other.to_string(),
            };
            return Error::api(code, parsed.message.unwrap_or_default());
        }
    }
    Error::Status { status, body }
}

/// Query parameters of a GET request, kept sorted for signing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query(BTreeMap<String, String>);

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl ToString) -> Self {
        self.0.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_opt<V: ToString>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.with(key, value),
            None => self,
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// JSON body of a POST request
///
/// Scalars are sent as strings, which every POST endpoint accepts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Body(Map<String, Value>);

impl Body {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl ToString) -> Self {
        self.0.insert(key.to_string(), Value::String(value.to_string()));
        self
    }

    pub fn with_opt<V: ToString>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.with(key, value),
            None => self,
        }
    }

    /// Insert a value that is not sent as a string (numbers, arrays)
    pub fn with_value(mut self, key: &str, value: Value) -> Self {
        self.0.insert(key.to_string(), value);
        self
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}
