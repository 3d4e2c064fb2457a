//! Decoded map features and the polymorphic element decoder.
//!
//! Overpass responses carry a heterogeneous `elements` array discriminated
//! by a `type` field. Only nodes and ways are modelled; a `relation` record
//! fails decoding rather than misparsing, and that failure invalidates the
//! whole response.

use std::collections::HashMap;

use geo::Coord;
use log::warn;
use serde::de::{self, Deserializer};
use serde::Deserialize;
use thiserror::Error;

/// A point on the globe in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Location {
    /// Latitude in degrees.
    #[serde(rename = "lat")]
    pub latitude: f64,
    /// Longitude in degrees.
    #[serde(rename = "lon")]
    pub longitude: f64,
}

impl From<Location> for Coord<f64> {
    fn from(location: Location) -> Self {
        Coord {
            x: location.longitude,
            y: location.latitude,
        }
    }
}

impl From<Coord<f64>> for Location {
    fn from(coord: Coord<f64>) -> Self {
        Location {
            latitude: coord.y,
            longitude: coord.x,
        }
    }
}

/// A point feature with free-form key/value tags.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Unique identifier within a response.
    pub id: u64,
    /// Geographic position.
    pub location: Location,
    /// OpenStreetMap-style attribute tags.
    pub tags: HashMap<String, String>,
}

impl Node {
    /// Construct a node with the provided tags.
    pub fn new(id: u64, location: Location, tags: HashMap<String, String>) -> Self {
        Self { id, location, tags }
    }

    /// Construct a node without tags.
    pub fn with_empty_tags(id: u64, location: Location) -> Self {
        Self::new(id, location, HashMap::new())
    }
}

/// A line or polygon feature built from node references.
///
/// `node_ids` is the ordered reference sequence as sent by the service; it
/// may repeat ids (closed polygons do). The resolved [`nodes`](Way::nodes)
/// sequence stays empty until correlation runs against the response's node
/// pool.
#[derive(Debug, Clone, PartialEq)]
pub struct Way {
    /// Unique identifier within a response.
    pub id: u64,
    /// Ordered node references, duplicates included.
    pub node_ids: Vec<u64>,
    /// OpenStreetMap-style attribute tags.
    pub tags: HashMap<String, String>,
    nodes: Vec<Node>,
}

/// A node reference that the strict correlation mode could not resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("way {way} references node {node} which is not present in the response")]
pub struct UnresolvedNode {
    /// Identifier of the referencing way.
    pub way: u64,
    /// The node id that was not found.
    pub node: u64,
}

impl Way {
    /// Construct a way from its node-id sequence, with no resolved nodes.
    pub fn new(id: u64, node_ids: Vec<u64>, tags: HashMap<String, String>) -> Self {
        Self {
            id,
            node_ids,
            tags,
            nodes: Vec::new(),
        }
    }

    /// Construct a way directly from resolved nodes.
    ///
    /// The id sequence is derived from the nodes, so the way is already
    /// correlated.
    pub fn with_nodes(id: u64, nodes: Vec<Node>, tags: HashMap<String, String>) -> Self {
        Self {
            id,
            node_ids: nodes.iter().map(|node| node.id).collect(),
            tags,
            nodes,
        }
    }

    /// The resolved node sequence, in id-sequence order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Resolve node references against `pool`, skipping missing ids.
    ///
    /// Resolution order follows `node_ids`, not the pool; repeated ids
    /// resolve repeatedly. Ids absent from the pool are logged and skipped,
    /// so the resolved sequence may be shorter than the id sequence.
    pub fn resolve(&mut self, pool: &[Node]) {
        self.nodes.clear();
        for &id in &self.node_ids {
            if let Some(node) = pool.iter().find(|node| node.id == id) {
                self.nodes.push(node.clone());
            } else {
                warn!("way {} references missing node {id}", self.id);
            }
        }
    }

    /// Resolve node references against `pool`, failing on the first missing
    /// id.
    ///
    /// # Errors
    ///
    /// Returns [`UnresolvedNode`] naming the offending reference; the
    /// resolved sequence is left empty in that case.
    pub fn resolve_strict(&mut self, pool: &[Node]) -> Result<(), UnresolvedNode> {
        self.nodes.clear();
        for &id in &self.node_ids {
            let node = pool
                .iter()
                .find(|node| node.id == id)
                .ok_or(UnresolvedNode { way: self.id, node: id })?;
            self.nodes.push(node.clone());
        }
        Ok(())
    }
}

/// One record of the heterogeneous element stream.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    /// A point feature.
    Node(Node),
    /// A line or polygon feature.
    Way(Way),
}

impl Element {
    /// The contained node, if this element is one.
    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Element::Node(node) => Some(node),
            Element::Way(_) => None,
        }
    }

    /// The contained way, if this element is one.
    pub fn as_way(&self) -> Option<&Way> {
        match self {
            Element::Way(way) => Some(way),
            Element::Node(_) => None,
        }
    }
}

/// Field-level view of an element record before validation.
///
/// Tag values are typed as strings outright: a nested structure or number in
/// `tags` is a decode error, never silently stringified.
#[derive(Deserialize)]
struct RawElement {
    #[serde(rename = "type")]
    kind: String,
    id: u64,
    lat: Option<f64>,
    lon: Option<f64>,
    tags: Option<HashMap<String, String>>,
    nodes: Option<Vec<u64>>,
}

impl<'de> Deserialize<'de> for Element {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawElement::deserialize(deserializer)?;
        let tags = raw.tags.unwrap_or_default();
        match raw.kind.as_str() {
            "node" => {
                let latitude = raw.lat.ok_or_else(|| de::Error::missing_field("lat"))?;
                let longitude = raw.lon.ok_or_else(|| de::Error::missing_field("lon"))?;
                Ok(Element::Node(Node::new(
                    raw.id,
                    Location {
                        latitude,
                        longitude,
                    },
                    tags,
                )))
            }
            "way" => {
                let node_ids = raw.nodes.ok_or_else(|| de::Error::missing_field("nodes"))?;
                Ok(Element::Way(Way::new(raw.id, node_ids, tags)))
            }
            other => Err(de::Error::unknown_variant(other, &["node", "way"])),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn sample_tags() -> HashMap<String, String> {
        HashMap::from([
            ("a".to_owned(), "tag".to_owned()),
            ("other".to_owned(), "tag".to_owned()),
        ])
    }

    #[rstest]
    fn decodes_a_bare_location() {
        let location: Location =
            serde_json::from_str(r#"{"lat": 6.5, "lon": 7.5}"#).expect("should decode");
        assert_eq!(
            location,
            Location {
                latitude: 6.5,
                longitude: 7.5,
            },
        );
    }

    #[rstest]
    fn decodes_a_node_record() {
        let json = r#"{
            "type": "node",
            "id": 34,
            "lat": 7.125,
            "lon": 8.75,
            "tags": {"a": "tag", "other": "tag"}
        }"#;

        let element: Element = serde_json::from_str(json).expect("should decode");

        let expected = Node::new(
            34,
            Location {
                latitude: 7.125,
                longitude: 8.75,
            },
            sample_tags(),
        );
        assert_eq!(element, Element::Node(expected));
    }

    #[rstest]
    fn a_node_without_tags_gets_an_empty_map() {
        let json = r#"{"type": "node", "id": 34, "lat": 7.125, "lon": 8.75}"#;

        let element: Element = serde_json::from_str(json).expect("should decode");

        let node = element.as_node().expect("should be a node");
        assert!(node.tags.is_empty());
    }

    #[rstest]
    fn decodes_a_way_record() {
        let json = r#"{
            "type": "way",
            "id": 35,
            "tags": {"a": "tag", "other": "tag"},
            "nodes": [21, 22, 23, 24, 21]
        }"#;

        let element: Element = serde_json::from_str(json).expect("should decode");

        let way = element.as_way().expect("should be a way");
        assert_eq!(way.id, 35);
        assert_eq!(way.node_ids, vec![21, 22, 23, 24, 21]);
        assert_eq!(way.tags, sample_tags());
        assert!(way.nodes().is_empty());
    }

    #[rstest]
    #[case::missing_lat(r#"{"type": "node", "id": 1, "lon": 8.75}"#)]
    #[case::missing_lon(r#"{"type": "node", "id": 1, "lat": 7.125}"#)]
    #[case::missing_id(r#"{"type": "node", "lat": 7.125, "lon": 8.75}"#)]
    #[case::way_without_nodes(r#"{"type": "way", "id": 1}"#)]
    #[case::relation(r#"{"type": "relation", "id": 1, "members": []}"#)]
    #[case::nested_tag_value(
        r#"{"type": "node", "id": 1, "lat": 0.5, "lon": 0.5, "tags": {"a": {"b": "c"}}}"#
    )]
    #[case::numeric_tag_value(
        r#"{"type": "node", "id": 1, "lat": 0.5, "lon": 0.5, "tags": {"a": 7}}"#
    )]
    fn malformed_records_fail_to_decode(#[case] json: &str) {
        assert!(serde_json::from_str::<Element>(json).is_err());
    }

    #[rstest]
    fn resolve_follows_id_sequence_order() {
        let pool: Vec<Node> = [21, 20, 24, 22, 23]
            .into_iter()
            .map(|id| {
                Node::with_empty_tags(
                    id,
                    Location {
                        latitude: 0.0,
                        longitude: 0.0,
                    },
                )
            })
            .collect();
        let mut way = Way::new(35, vec![21, 22, 23, 24, 21], HashMap::new());

        way.resolve(&pool);

        let resolved: Vec<u64> = way.nodes().iter().map(|node| node.id).collect();
        assert_eq!(resolved, vec![21, 22, 23, 24, 21]);
    }

    #[rstest]
    fn resolve_skips_missing_ids() {
        let pool = vec![Node::with_empty_tags(
            21,
            Location {
                latitude: 0.0,
                longitude: 0.0,
            },
        )];
        let mut way = Way::new(35, vec![21, 22, 23, 24, 21], HashMap::new());

        way.resolve(&pool);

        let resolved: Vec<u64> = way.nodes().iter().map(|node| node.id).collect();
        assert_eq!(resolved, vec![21, 21]);
    }

    #[rstest]
    fn resolve_strict_fails_on_missing_ids() {
        let pool = vec![Node::with_empty_tags(
            21,
            Location {
                latitude: 0.0,
                longitude: 0.0,
            },
        )];
        let mut way = Way::new(35, vec![21, 22, 23], HashMap::new());

        let err = way.resolve_strict(&pool).expect_err("should fail");

        assert_eq!(err, UnresolvedNode { way: 35, node: 22 });
    }

    #[rstest]
    fn with_nodes_derives_the_id_sequence() {
        let nodes = vec![
            Node::with_empty_tags(
                1,
                Location {
                    latitude: 0.5,
                    longitude: 0.5,
                },
            ),
            Node::with_empty_tags(
                2,
                Location {
                    latitude: 0.25,
                    longitude: 0.25,
                },
            ),
        ];

        let way = Way::with_nodes(9, nodes.clone(), HashMap::new());

        assert_eq!(way.node_ids, vec![1, 2]);
        assert_eq!(way.nodes(), nodes.as_slice());
    }
}
