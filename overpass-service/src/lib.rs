//! HTTP service layer for the Overpass client.
//!
//! This crate wraps queries built by `overpass-core` in the service's
//! protocol envelope, issues them over an injected [`Transport`], and maps
//! transport outcomes to the closed [`ServiceError`] set. The core decoders
//! do the rest; everything here is boundary plumbing.

#![forbid(unsafe_code)]

mod error;
mod service;
mod transport;

#[doc(hidden)]
pub mod test_support;

pub use error::ServiceError;
pub use service::OverpassService;
pub use transport::{
    ACCEPT_JSON, DEFAULT_USER_AGENT, HttpTransport, HttpTransportConfig, Transport,
    TransportBuildError, TransportError, TransportRequest, TransportResponse,
};
