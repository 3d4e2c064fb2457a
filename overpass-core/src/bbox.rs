//! The geographic rectangle bounding a query region.

use geo::{Coord, Rect};

/// A geographic query rectangle in WGS84 degrees.
///
/// Fields are kept in Overpass order (south, west, north, east) and are not
/// normalised; an inverted box is passed through to the service as given.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Southern latitude bound.
    pub south: f64,
    /// Western longitude bound.
    pub west: f64,
    /// Northern latitude bound.
    pub north: f64,
    /// Eastern longitude bound.
    pub east: f64,
}

impl BoundingBox {
    /// Construct a bounding box from its four ordered bounds.
    pub const fn new(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self {
            south,
            west,
            north,
            east,
        }
    }

    /// Render the trailing bounding-box fragment of a query.
    ///
    /// # Examples
    /// ```
    /// use overpass_core::BoundingBox;
    ///
    /// let bbox = BoundingBox::new(1.5, 1.75, 2.5, 2.75);
    /// assert_eq!(bbox.fragment(), "(1.5, 1.75, 2.5, 2.75)");
    /// ```
    pub fn fragment(&self) -> String {
        format!("({}, {}, {}, {})", self.south, self.west, self.north, self.east)
    }
}

impl From<Rect<f64>> for BoundingBox {
    fn from(rect: Rect<f64>) -> Self {
        Self::new(rect.min().y, rect.min().x, rect.max().y, rect.max().x)
    }
}

impl From<BoundingBox> for Rect<f64> {
    fn from(bbox: BoundingBox) -> Self {
        Rect::new(
            Coord {
                x: bbox.west,
                y: bbox.south,
            },
            Coord {
                x: bbox.east,
                y: bbox.north,
            },
        )
    }
}
