//! Response envelope decoding and way→node correlation.
//!
//! Decoding is a single pass over the envelope and element stream followed
//! by one correlation pass that resolves each way's node references against
//! the nodes collected from the same response. A malformed envelope field or
//! element fails the whole decode; there is no partial assembly.

use serde::Deserialize;
use thiserror::Error;
use time::OffsetDateTime;

use crate::element::{Element, Node, UnresolvedNode, Way};

/// How correlation treats a node reference with no matching node.
///
/// Both behaviours have historical precedent, so the choice is explicit
/// configuration rather than a default buried in the decoder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Correlation {
    /// Skip unresolved references; a way's resolved sequence may be shorter
    /// than its id sequence. Each skip is logged at `warn`.
    #[default]
    Lenient,
    /// Fail the whole decode on the first unresolved reference.
    Strict,
}

/// Errors from decoding a response payload.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The envelope or an element record was malformed.
    #[error("malformed overpass response: {0}")]
    Json(#[from] serde_json::Error),
    /// Strict correlation found a dangling node reference.
    #[error(transparent)]
    UnresolvedNode(#[from] UnresolvedNode),
}

/// The version field arrives as a string or a bare number.
///
/// Numeric forms are normalised by their textual representation, with
/// integral values forced to one decimal so `1` reads `"1.0"`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawVersion {
    Text(String),
    Number(f64),
}

impl RawVersion {
    fn normalise(self) -> String {
        match self {
            RawVersion::Text(text) => text,
            RawVersion::Number(number) if number.fract() == 0.0 => format!("{number:.1}"),
            RawVersion::Number(number) => number.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct Osm3s {
    #[serde(with = "time::serde::rfc3339")]
    timestamp_osm_base: OffsetDateTime,
    copyright: String,
}

#[derive(Deserialize)]
struct RawResponse {
    version: RawVersion,
    generator: String,
    osm3s: Osm3s,
    elements: Vec<Element>,
}

/// A decoded and correlated query response.
///
/// Element order is canonicalised at construction: nodes first in their
/// input order, then ways in theirs, with every way's node references
/// already resolved. The combined element list is computed eagerly since the
/// derivation is cheap and deterministic.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// Response format version, normalised to a string.
    pub version: String,
    /// Name of the generating software.
    pub generator: String,
    /// Base-data timestamp of the answering database, UTC.
    pub timestamp: OffsetDateTime,
    /// Attribution string.
    pub copyright: String,
    nodes: Vec<Node>,
    ways: Vec<Way>,
    elements: Vec<Element>,
}

impl Response {
    /// Assemble a response from decoded envelope fields and elements.
    ///
    /// Elements are partitioned into nodes and ways preserving relative
    /// order, then each way is correlated against the node pool according to
    /// `mode`.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::UnresolvedNode`] when `mode` is
    /// [`Correlation::Strict`] and a way references a node missing from the
    /// response.
    pub fn new(
        version: String,
        generator: String,
        timestamp: OffsetDateTime,
        copyright: String,
        elements: Vec<Element>,
        mode: Correlation,
    ) -> Result<Self, DecodeError> {
        let mut nodes = Vec::new();
        let mut ways = Vec::new();
        for element in elements {
            match element {
                Element::Node(node) => nodes.push(node),
                Element::Way(way) => ways.push(way),
            }
        }

        for way in &mut ways {
            match mode {
                Correlation::Lenient => way.resolve(&nodes),
                Correlation::Strict => way.resolve_strict(&nodes)?,
            }
        }

        let combined = nodes
            .iter()
            .cloned()
            .map(Element::Node)
            .chain(ways.iter().cloned().map(Element::Way))
            .collect();

        Ok(Self {
            version,
            generator,
            timestamp,
            copyright,
            nodes,
            ways,
            elements: combined,
        })
    }

    /// Decode a response from raw JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::Json`] for a malformed envelope or element and
    /// [`DecodeError::UnresolvedNode`] under strict correlation.
    pub fn from_json(data: &[u8], mode: Correlation) -> Result<Self, DecodeError> {
        let raw: RawResponse = serde_json::from_slice(data)?;
        Self::new(
            raw.version.normalise(),
            raw.generator,
            raw.osm3s.timestamp_osm_base,
            raw.osm3s.copyright,
            raw.elements,
            mode,
        )
    }

    /// The decoded point features, in input order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// The decoded line features, correlated, in input order.
    pub fn ways(&self) -> &[Way] {
        &self.ways
    }

    /// All elements, nodes first then ways.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }
}
