//! The service façade: envelope formatting, status mapping, decode hand-off.

use log::{debug, warn};
use overpass_core::{BoundingBox, Correlation, Response, Tag, node_query, way_query};
use url::Url;

use crate::error::ServiceError;
use crate::transport::{Transport, TransportRequest};

/// A client for one Overpass-style endpoint.
///
/// The transport is injected so the façade stays a pure mapping from query
/// text to [`Response`] or [`ServiceError`]; retries, timeouts, and
/// concurrency policy belong to the transport or the caller.
///
/// # Examples
///
/// ```no_run
/// use overpass_core::{BoundingBox, Tag};
/// use overpass_service::{HttpTransport, OverpassService};
/// use url::Url;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let url = Url::parse("https://overpass-api.de/api/interpreter")?;
/// let service = OverpassService::new(url, HttpTransport::new()?);
///
/// let bbox = BoundingBox::new(51.25, -0.5, 51.75, 0.25);
/// let pubs = service
///     .query_points(&bbox, &[Tag::has_value("amenity", "pub")])
///     .await?;
/// println!("{} pubs found", pubs.nodes().len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct OverpassService<T> {
    base_url: Url,
    transport: T,
    correlation: Correlation,
}

impl<T: Transport> OverpassService<T> {
    /// Create a service for `base_url` with lenient correlation.
    pub fn new(base_url: Url, transport: T) -> Self {
        Self {
            base_url,
            transport,
            correlation: Correlation::default(),
        }
    }

    /// Select the correlation mode applied to decoded responses.
    #[must_use]
    pub fn with_correlation(mut self, correlation: Correlation) -> Self {
        self.correlation = correlation;
        self
    }

    /// Query point features inside `bbox` matching every tag filter.
    ///
    /// # Errors
    ///
    /// See [`ServiceError`].
    pub async fn query_points(
        &self,
        bbox: &BoundingBox,
        tags: &[Tag],
    ) -> Result<Response, ServiceError> {
        self.query(&node_query(bbox, tags)).await
    }

    /// Query line features inside `bbox` matching every tag filter.
    ///
    /// The built query also fetches the nodes each matched way references,
    /// so correlation can resolve them.
    ///
    /// # Errors
    ///
    /// See [`ServiceError`].
    pub async fn query_ways(
        &self,
        bbox: &BoundingBox,
        tags: &[Tag],
    ) -> Result<Response, ServiceError> {
        self.query(&way_query(bbox, tags)).await
    }

    /// Issue an already-built query and decode the response.
    ///
    /// # Errors
    ///
    /// Returns the mapped status error, a wrapped transport failure, or
    /// [`ServiceError::Unknown`] when the body fails to decode.
    pub async fn query(&self, query: &str) -> Result<Response, ServiceError> {
        let body = self.data(query).await?;
        Response::from_json(&body, self.correlation).map_err(|err| {
            warn!("discarding response decode failure: {err}");
            ServiceError::Unknown
        })
    }

    /// Issue an already-built query and return the untyped parsed body.
    ///
    /// This is the escape hatch for callers needing fields outside the
    /// modelled schema.
    ///
    /// # Errors
    ///
    /// Returns the mapped status error, a wrapped transport failure, or
    /// [`ServiceError::Unknown`] when the body is not JSON.
    pub async fn raw(&self, query: &str) -> Result<serde_json::Value, ServiceError> {
        let body = self.data(query).await?;
        serde_json::from_slice(&body).map_err(|err| {
            warn!("discarding raw parse failure: {err}");
            ServiceError::Unknown
        })
    }

    /// Send the wrapped query and map the transport outcome.
    async fn data(&self, query: &str) -> Result<Vec<u8>, ServiceError> {
        let request = TransportRequest::new(self.base_url.clone(), format_body(query));
        debug!("posting overpass query to {}", self.base_url);

        let response = self
            .transport
            .send(&request)
            .await
            .map_err(ServiceError::Client)?;

        match response.status {
            200 => Ok(response.body),
            400 => Err(ServiceError::Syntax(query.to_owned())),
            429 => Err(ServiceError::RateLimited),
            504 => Err(ServiceError::UpstreamOverload),
            status => {
                warn!("unexpected status {status} from overpass endpoint");
                Err(ServiceError::Unknown)
            }
        }
    }
}

/// Wrap a query in the protocol envelope.
///
/// A `;` separator is inserted only when the query does not already end
/// with one.
fn format_body(query: &str) -> String {
    if query.ends_with(';') {
        format!("[out:json];{query}out;")
    } else {
        format!("[out:json];{query};out;")
    }
}
