use serde::{Deserialize, Serialize};

/// A coordinate triple.
///
/// `z` is only meaningful when the geometry holding the coordinate is 3D. Two-dimensional geometries keep `z` at
/// zero.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    /// X (easting, longitude).
    pub x: f64,
    /// Y (northing, latitude).
    pub y: f64,
    /// Z (elevation).
    pub z: f64,
}

impl Coord {
    /// Creates a 2d coordinate (`z` is set to zero).
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }

    /// Creates a 3d coordinate.
    pub const fn new_3d(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance between the coordinates in the XY plane.
    pub fn distance_2d(&self, other: &Coord) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Exact equality of X and Y.
    pub fn equals_2d(&self, other: &Coord) -> bool {
        self.x == other.x && self.y == other.y
    }

    /// Returns the coordinate with X and Y swapped.
    pub fn swapped(&self) -> Self {
        Self {
            x: self.y,
            y: self.x,
            z: self.z,
        }
    }

    pub(crate) fn flattened(&self) -> Self {
        Self::new(self.x, self.y)
    }
}

impl From<(f64, f64)> for Coord {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl From<(f64, f64, f64)> for Coord {
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        Self::new_3d(x, y, z)
    }
}

impl From<[f64; 2]> for Coord {
    fn from([x, y]: [f64; 2]) -> Self {
        Self::new(x, y)
    }
}

impl From<[f64; 3]> for Coord {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::new_3d(x, y, z)
    }
}
