//! Axis aligned bounding boxes of geometries.

use serde::{Deserialize, Serialize};

use crate::coord::Coord;

/// 2d bounding box.
///
/// The default value (all zeros) is what an empty geometry reports.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Minimum X.
    pub min_x: f64,
    /// Maximum X.
    pub max_x: f64,
    /// Minimum Y.
    pub min_y: f64,
    /// Maximum Y.
    pub max_y: f64,
}

impl Envelope {
    /// Creates a new envelope.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    /// Width of the envelope.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the envelope.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Area of the envelope.
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Smallest envelope containing both `self` and `other`.
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            max_x: self.max_x.max(other.max_x),
            min_y: self.min_y.min(other.min_y),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Whether the coordinate lies inside the envelope or on its boundary.
    pub fn contains(&self, coord: &Coord) -> bool {
        self.min_x <= coord.x
            && self.max_x >= coord.x
            && self.min_y <= coord.y
            && self.max_y >= coord.y
    }

    /// Whether the two envelopes have at least one common point.
    pub fn intersects(&self, other: &Self) -> bool {
        self.min_x <= other.max_x
            && self.max_x >= other.min_x
            && self.min_y <= other.max_y
            && self.max_y >= other.min_y
    }
}

/// 3d bounding box.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Envelope3D {
    /// Minimum X.
    pub min_x: f64,
    /// Maximum X.
    pub max_x: f64,
    /// Minimum Y.
    pub min_y: f64,
    /// Maximum Y.
    pub max_y: f64,
    /// Minimum Z.
    pub min_z: f64,
    /// Maximum Z.
    pub max_z: f64,
}

impl Envelope3D {
    /// Envelope of a single coordinate.
    pub fn from_coord(c: &Coord) -> Self {
        Self {
            min_x: c.x,
            max_x: c.x,
            min_y: c.y,
            max_y: c.y,
            min_z: c.z,
            max_z: c.z,
        }
    }

    /// Envelope of the coordinates, or `None` if the iterator is empty.
    pub fn from_coords<'a>(mut coords: impl Iterator<Item = &'a Coord>) -> Option<Self> {
        let first = coords.next()?;
        Some(coords.fold(Self::from_coord(first), |env, c| {
            env.merge(&Self::from_coord(c))
        }))
    }

    /// Union of the envelopes, or `None` if the iterator is empty.
    pub fn merge_all(envelopes: impl IntoIterator<Item = Envelope3D>) -> Option<Self> {
        envelopes.into_iter().reduce(|a, b| a.merge(&b))
    }

    /// Smallest envelope containing both `self` and `other`.
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            max_x: self.max_x.max(other.max_x),
            min_y: self.min_y.min(other.min_y),
            max_y: self.max_y.max(other.max_y),
            min_z: self.min_z.min(other.min_z),
            max_z: self.max_z.max(other.max_z),
        }
    }

    /// Drops the Z range.
    pub fn to_2d(&self) -> Envelope {
        Envelope::new(self.min_x, self.min_y, self.max_x, self.max_y)
    }
}
