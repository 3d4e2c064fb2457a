//! The injected HTTP transport seam and its reqwest implementation.
//!
//! The service façade never talks to the network directly; it hands a
//! [`TransportRequest`] to whatever [`Transport`] it was constructed with
//! and interprets the status and body that come back. Tests inject
//! [`crate::test_support::StaticTransport`] instead of [`HttpTransport`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use thiserror::Error;
use url::Url;

/// Default user agent for Overpass requests.
pub const DEFAULT_USER_AGENT: &str = "overpass-client/0.1";

/// The `Accept` header value sent with every request.
pub const ACCEPT_JSON: &str = "application/json";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// A single outbound request: the query text POSTed to the endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportRequest {
    /// Endpoint URL.
    pub url: Url,
    /// Request body, already wrapped in the protocol envelope.
    pub body: String,
    /// Value for the `Accept` header. The façade always sends
    /// [`ACCEPT_JSON`]; implementations must set the header as given.
    pub accept: String,
}

impl TransportRequest {
    /// Build a request for `url` carrying `body`, accepting JSON.
    pub fn new(url: Url, body: String) -> Self {
        Self {
            url,
            body,
            accept: ACCEPT_JSON.to_owned(),
        }
    }
}

/// The raw outcome of a transport exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body bytes.
    pub body: Vec<u8>,
}

/// A transport-level failure: nothing usable came back at all.
///
/// Carries the failing URL and a message rather than the underlying error
/// value so service errors stay comparable in tests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("request to {url} failed: {message}")]
pub struct TransportError {
    /// Fully qualified request URL.
    pub url: String,
    /// Description of the underlying failure.
    pub message: String,
}

/// Performs one request and delivers its status and body, or fails.
#[async_trait(?Send)]
pub trait Transport {
    /// POST the request body and return the raw response.
    ///
    /// Implementations must send the request's `accept` value as the
    /// `Accept` header.
    async fn send(&self, request: &TransportRequest) -> Result<TransportResponse, TransportError>;
}

/// Errors from building an [`HttpTransport`].
#[derive(Debug, Error)]
pub enum TransportBuildError {
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Configuration for [`HttpTransport`].
#[derive(Debug, Clone)]
pub struct HttpTransportConfig {
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl HttpTransportConfig {
    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// reqwest-backed [`Transport`].
#[derive(Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build a transport with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new() -> Result<Self, TransportBuildError> {
        Self::with_config(HttpTransportConfig::default())
    }

    /// Build a transport with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn with_config(config: HttpTransportConfig) -> Result<Self, TransportBuildError> {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait(?Send)]
impl Transport for HttpTransport {
    async fn send(&self, request: &TransportRequest) -> Result<TransportResponse, TransportError> {
        let response = self
            .client
            .post(request.url.clone())
            .header(ACCEPT, request.accept.as_str())
            .body(request.body.clone())
            .send()
            .await
            .map_err(|err| convert_reqwest_error(err, &request.url))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|err| convert_reqwest_error(err, &request.url))?
            .to_vec();
        Ok(TransportResponse { status, body })
    }
}

fn convert_reqwest_error(err: reqwest::Error, url: &Url) -> TransportError {
    TransportError {
        url: url.to_string(),
        message: err.to_string(),
    }
}
