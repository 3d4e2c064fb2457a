//! Assembly of complete Overpass queries from a bounding box and tag filters.
//!
//! Compiled tag fragments are sorted lexicographically before concatenation
//! so the output is deterministic regardless of the order in which callers
//! supply their filters.

use std::fmt;

use thiserror::Error;

use crate::{BoundingBox, Tag};

/// The element kinds the query language distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// A point feature.
    Node,
    /// An ordered sequence of node references.
    Way,
    /// A composite feature. Not supported by this client.
    Relation,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = match self {
            ElementKind::Node => "node",
            ElementKind::Way => "way",
            ElementKind::Relation => "relation",
        };
        f.write_str(keyword)
    }
}

/// Errors from [`build_query`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueryError {
    /// The requested element kind has no query support.
    ///
    /// Requesting a relation query is a caller bug rather than a runtime
    /// condition; the builder refuses rather than emitting a malformed
    /// fragment.
    #[error("queries for `{0}` elements are not supported")]
    UnsupportedElementKind(ElementKind),
}

/// Build a query for the given element kind.
///
/// # Errors
///
/// Returns [`QueryError::UnsupportedElementKind`] for kinds other than
/// [`ElementKind::Node`] and [`ElementKind::Way`].
pub fn build_query(
    kind: ElementKind,
    bbox: &BoundingBox,
    tags: &[Tag],
) -> Result<String, QueryError> {
    match kind {
        ElementKind::Node => Ok(node_query(bbox, tags)),
        ElementKind::Way => Ok(way_query(bbox, tags)),
        ElementKind::Relation => Err(QueryError::UnsupportedElementKind(kind)),
    }
}

/// Build a query matching point features inside `bbox`.
///
/// An empty tag slice matches every node in the box.
///
/// # Examples
/// ```
/// use overpass_core::{BoundingBox, Tag, node_query};
///
/// let bbox = BoundingBox::new(1.5, 1.75, 2.5, 2.75);
/// let tags = [Tag::has_key("hello"), Tag::has_value("good", "bye")];
/// assert_eq!(
///     node_query(&bbox, &tags),
///     r#"node["good"="bye"]["hello"](1.5, 1.75, 2.5, 2.75);"#,
/// );
/// ```
pub fn node_query(bbox: &BoundingBox, tags: &[Tag]) -> String {
    format!("node{}{};", sorted_fragments(tags), bbox.fragment())
}

/// Build a query matching line features inside `bbox`.
///
/// The `(._;>;);` suffix makes the service return every node referenced by
/// the matched ways, which response correlation depends on.
pub fn way_query(bbox: &BoundingBox, tags: &[Tag]) -> String {
    format!("way{}{};(._;>;);", sorted_fragments(tags), bbox.fragment())
}

fn sorted_fragments(tags: &[Tag]) -> String {
    let mut fragments: Vec<String> = tags.iter().map(Tag::fragment).collect();
    fragments.sort();
    fragments.concat()
}
