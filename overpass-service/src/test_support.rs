//! Test utilities for the service façade.
//!
//! This module provides [`StaticTransport`], a deterministic test double for
//! [`Transport`] that returns pre-configured outcomes and records every
//! request, so tests can verify behaviour without a running Overpass
//! endpoint.

use std::cell::RefCell;

use async_trait::async_trait;

use crate::transport::{Transport, TransportError, TransportRequest, TransportResponse};

/// Stub [`Transport`] for testing.
///
/// # Example
///
/// ```
/// use overpass_service::test_support::StaticTransport;
/// use overpass_service::OverpassService;
/// use url::Url;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let transport = StaticTransport::with_response(429, "too many requests");
/// let url = Url::parse("https://example.com/")?;
/// let service = OverpassService::new(url, transport);
///
/// assert!(service.query("a query").await.is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct StaticTransport {
    reply: StaticReply,
    requests: RefCell<Vec<TransportRequest>>,
}

#[derive(Debug, Clone)]
enum StaticReply {
    Response(TransportResponse),
    Error(TransportError),
}

impl StaticTransport {
    /// Create a transport that answers every request with `status` and
    /// `body`.
    #[must_use]
    pub fn with_response(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            reply: StaticReply::Response(TransportResponse {
                status,
                body: body.into(),
            }),
            requests: RefCell::new(Vec::new()),
        }
    }

    /// Create a transport that fails every request with `error`.
    #[must_use]
    pub fn with_error(error: TransportError) -> Self {
        Self {
            reply: StaticReply::Error(error),
            requests: RefCell::new(Vec::new()),
        }
    }

    /// The requests sent so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests.borrow().clone()
    }
}

#[async_trait(?Send)]
impl Transport for StaticTransport {
    async fn send(&self, request: &TransportRequest) -> Result<TransportResponse, TransportError> {
        self.requests.borrow_mut().push(request.clone());
        match &self.reply {
            StaticReply::Response(response) => Ok(response.clone()),
            StaticReply::Error(error) => Err(error.clone()),
        }
    }
}
