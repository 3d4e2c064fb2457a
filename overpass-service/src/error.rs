//! The closed error set returned by the service façade.

use thiserror::Error;

use crate::transport::TransportError;

/// Errors from issuing a query through [`crate::OverpassService`].
///
/// Decode failures inside response parsing collapse to [`Unknown`] at this
/// boundary; the underlying detail is logged before being discarded.
///
/// [`Unknown`]: ServiceError::Unknown
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// The service rejected the query text (HTTP 400). Carries the original
    /// query for diagnostics.
    #[error("the service rejected the query as malformed: {0}")]
    Syntax(String),
    /// The client is being rate limited (HTTP 429).
    #[error("the service is rate limiting this client")]
    RateLimited,
    /// The upstream data source timed out (HTTP 504).
    #[error("the upstream data source is overloaded")]
    UpstreamOverload,
    /// Any other status, or a response body that failed to decode.
    #[error("the request failed for an unknown reason")]
    Unknown,
    /// The transport itself failed; the underlying error is wrapped, never
    /// swallowed.
    #[error(transparent)]
    Client(#[from] TransportError),
}
