//! Coordinate transformations applied to geometries in place.
//!
//! Projection math is not part of this crate. Callers plug their own transformation in by implementing
//! [`CoordinateTransform`], or by passing a closure.

use crate::coord::Coord;
use crate::error::{GeometryError, Result};
use crate::spatial_ref::SpatialRef;

/// Transformation of a single coordinate.
pub trait CoordinateTransform {
    /// Transforms the coordinate, or returns `None` if the coordinate cannot be transformed.
    fn transform(&self, coord: Coord) -> Option<Coord>;

    /// Spatial reference of the transformed coordinates. When set, it is assigned to the geometry after a successful
    /// transformation.
    fn target_spatial_ref(&self) -> Option<SpatialRef> {
        None
    }
}

impl<F> CoordinateTransform for F
where
    F: Fn(Coord) -> Option<Coord>,
{
    fn transform(&self, coord: Coord) -> Option<Coord> {
        self(coord)
    }
}

/// Transformation that returns every coordinate unchanged, relabeling it with the target reference.
#[derive(Debug, Clone, Default)]
pub struct IdentityTransform {
    target: Option<SpatialRef>,
}

impl IdentityTransform {
    /// Creates a new identity transform with the given target reference.
    pub fn new(target: Option<SpatialRef>) -> Self {
        Self { target }
    }
}

impl CoordinateTransform for IdentityTransform {
    fn transform(&self, coord: Coord) -> Option<Coord> {
        Some(coord)
    }

    fn target_spatial_ref(&self) -> Option<SpatialRef> {
        self.target.clone()
    }
}

/// Shifts every coordinate by a constant offset.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct OffsetTransform {
    /// Offset along X.
    pub dx: f64,
    /// Offset along Y.
    pub dy: f64,
    /// Offset along Z.
    pub dz: f64,
}

impl OffsetTransform {
    /// Creates a new offset transform.
    pub fn new(dx: f64, dy: f64, dz: f64) -> Self {
        Self { dx, dy, dz }
    }
}

impl CoordinateTransform for OffsetTransform {
    fn transform(&self, coord: Coord) -> Option<Coord> {
        Some(Coord::new_3d(
            coord.x + self.dx,
            coord.y + self.dy,
            coord.z + self.dz,
        ))
    }
}

/// Transforms one coordinate. For 2d geometries the resulting Z is dropped.
pub(crate) fn transform_coord(
    coord: Coord,
    is_3d: bool,
    transform: &(impl CoordinateTransform + ?Sized),
) -> Result<Coord> {
    let transformed = transform.transform(coord).ok_or_else(|| {
        GeometryError::TransformFailed(format!(
            "coordinate ({}, {}) cannot be transformed",
            coord.x, coord.y
        ))
    })?;

    Ok(if is_3d {
        transformed
    } else {
        transformed.flattened()
    })
}

/// Transforms all the coordinates, failing on the first one that cannot be transformed.
pub(crate) fn transform_coords(
    coords: &[Coord],
    is_3d: bool,
    transform: &(impl CoordinateTransform + ?Sized),
) -> Result<Vec<Coord>> {
    coords
        .iter()
        .map(|c| transform_coord(*c, is_3d, transform))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closure_transform() {
        let t = |c: Coord| (c.x >= 0.0).then(|| Coord::new(c.x * 2.0, c.y));
        assert_eq!(
            transform_coords(&[Coord::new(1.0, 1.0), Coord::new(2.0, 3.0)], false, &t).unwrap(),
            vec![Coord::new(2.0, 1.0), Coord::new(4.0, 3.0)]
        );
        assert_eq!(
            transform_coords(&[Coord::new(1.0, 1.0), Coord::new(-2.0, 3.0)], false, &t)
                .unwrap_err()
                .kind(),
            crate::error::ErrorKind::TransformFailed
        );
    }

    #[test]
    fn offset_keeps_2d_flat() {
        let t = OffsetTransform::new(1.0, 2.0, 3.0);
        assert_eq!(
            transform_coord(Coord::new(0.0, 0.0), false, &t).unwrap(),
            Coord::new(1.0, 2.0)
        );
        assert_eq!(
            transform_coord(Coord::new(0.0, 0.0), true, &t).unwrap(),
            Coord::new_3d(1.0, 2.0, 3.0)
        );
    }
}
