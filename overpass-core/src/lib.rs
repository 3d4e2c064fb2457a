//! Core types for querying an Overpass-style map data service.
//!
//! This crate holds the pure, synchronous half of the client: the tag-filter
//! grammar and query builder that compile structured criteria into Overpass
//! QL, and the decoders that turn a response payload back into typed nodes
//! and ways with cross-references resolved. The HTTP half lives in
//! `overpass-service`.

#![forbid(unsafe_code)]

mod bbox;
mod element;
mod query;
mod response;
mod tag;

pub use bbox::BoundingBox;
pub use element::{Element, Location, Node, UnresolvedNode, Way};
pub use query::{ElementKind, QueryError, build_query, node_query, way_query};
pub use response::{Correlation, DecodeError, Response};
pub use tag::Tag;
