//! Facade crate for the Overpass client.
//!
//! This crate re-exports the core query and decoding types and exposes the
//! HTTP service layer behind a feature flag.

#![forbid(unsafe_code)]

pub use overpass_core::{
    BoundingBox, Correlation, DecodeError, Element, ElementKind, Location, Node, QueryError,
    Response, Tag, UnresolvedNode, Way, build_query, node_query, way_query,
};

#[cfg(feature = "service")]
pub use overpass_service::{
    ACCEPT_JSON, HttpTransport, HttpTransportConfig, OverpassService, ServiceError, Transport,
    TransportBuildError, TransportError, TransportRequest, TransportResponse,
};
