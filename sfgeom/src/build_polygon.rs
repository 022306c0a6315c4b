//! Assembly of a polygon from an unordered set of edges.
//!
//! Edges are chained greedily: every ring starts with the first unused edge and grows by appending the unused edge
//! whose start or end point is closest to the open end of the ring. This is a heuristic. It does not check that the
//! rings are simple or that holes are inside the exterior: the ring with the largest bounding box becomes the
//! exterior and all other rings become holes.

use serde::{Deserialize, Serialize};

use crate::coord::Coord;
use crate::envelope::Envelope3D;
use crate::error::{GeometryError, Result};
use crate::geometry::{Geom, Geometry};
use crate::line_string::LineString;
use crate::linear_ring::LinearRing;
use crate::polygon::Polygon;

/// Options of [`build_polygon_from_edges`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct BuildPolygonOptions {
    /// Maximum distance between two end points that are considered the same. With `0` points must be equal.
    pub tolerance: f64,
    /// Whether rings that are closed within the tolerance are closed exactly by repeating their first point.
    pub auto_close: bool,
}

/// Ring that could not be closed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnclosedRing {
    /// Index of the ring in the resulting polygon (`0` is the exterior).
    pub ring_index: usize,
    /// Distance between the first and the last point of the ring.
    pub gap: f64,
}

/// Result of the polygon assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonBuild {
    /// Assembled polygon, including the rings that could not be closed.
    pub polygon: Polygon,
    /// Rings whose ends are farther apart than the tolerance.
    pub unclosed_rings: Vec<UnclosedRing>,
}

impl PolygonBuild {
    /// Whether every ring was closed.
    pub fn is_closed(&self) -> bool {
        self.unclosed_rings.is_empty()
    }
}

/// Assembles a polygon from the edges of a geometry.
///
/// The geometry must be a line string, a multi line string, or a geometry collection that contains only line
/// strings. Other geometries give [`GeometryError::UnsupportedGeometryType`].
pub fn build_polygon_from_geometry(
    geom: &Geom,
    options: &BuildPolygonOptions,
) -> Result<PolygonBuild> {
    match geom {
        Geom::LineString(line) => Ok(build_polygon_from_edges([line], options)),
        Geom::MultiLineString(lines) => Ok(build_polygon_from_edges(lines, options)),
        Geom::GeometryCollection(collection) => {
            let edges = collection
                .iter()
                .map(|member| {
                    member.as_line_string().ok_or_else(|| {
                        GeometryError::UnsupportedGeometryType(format!(
                            "polygon edges must be line strings, found {}",
                            member.geometry_name()
                        ))
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(build_polygon_from_edges(edges, options))
        }
        other => Err(GeometryError::UnsupportedGeometryType(format!(
            "cannot build a polygon from {}",
            other.geometry_name()
        ))),
    }
}

/// Assembles a polygon from an unordered set of edges.
///
/// Empty edges are skipped. Rings that cannot be closed are kept in the polygon and listed in
/// [`PolygonBuild::unclosed_rings`].
pub fn build_polygon_from_edges<'a>(
    edges: impl IntoIterator<Item = &'a LineString>,
    options: &BuildPolygonOptions,
) -> PolygonBuild {
    let edges: Vec<&LineString> = edges
        .into_iter()
        .filter(|edge| {
            if edge.is_empty() {
                log::trace!("Skipping empty edge");
            }
            !edge.is_empty()
        })
        .collect();

    let is_3d = edges.iter().any(|edge| edge.is_3d());
    let mut used = vec![false; edges.len()];
    let mut rings = vec![];

    while let Some(seed) = used.iter().position(|u| !u) {
        used[seed] = true;
        let mut points = edges[seed].points().to_vec();

        while !is_exactly_closed(&points) {
            let Some(end) = points.last().copied() else {
                break;
            };
            let Some(found) = closest_edge(&edges, &used, end, options.tolerance) else {
                break;
            };

            used[found.index] = true;
            append_edge(&mut points, edges[found.index].points(), found.reversed);
        }

        let ordinal = rings.len();
        let closed = match (points.first(), points.last()) {
            (Some(first), Some(last)) => {
                if is_same_point(first, last, options.tolerance) {
                    if options.auto_close && !first.equals_2d(last) {
                        points.push(*first);
                    }
                    None
                } else {
                    let gap = first.distance_2d(last);
                    log::debug!("Ring {ordinal} is not closed, the gap between its ends is {gap}");
                    Some(gap)
                }
            }
            _ => None,
        };

        let ring = if is_3d {
            LinearRing::new_3d(points)
        } else {
            LinearRing::new(points)
        };
        rings.push((ring, closed));
    }

    if let Some(exterior) = largest_ring(&rings) {
        let ring = rings.remove(exterior);
        rings.insert(0, ring);
    }

    let unclosed_rings: Vec<UnclosedRing> = rings
        .iter()
        .enumerate()
        .filter_map(|(ring_index, (_, gap))| gap.map(|gap| UnclosedRing { ring_index, gap }))
        .collect();

    if !unclosed_rings.is_empty() {
        log::warn!(
            "{} of {} rings could not be closed",
            unclosed_rings.len(),
            rings.len()
        );
    }

    PolygonBuild {
        polygon: Polygon::from_rings(rings.into_iter().map(|(ring, _)| ring).collect()),
        unclosed_rings,
    }
}

struct EdgeMatch {
    index: usize,
    reversed: bool,
}

fn is_exactly_closed(points: &[Coord]) -> bool {
    match (points.first(), points.last()) {
        (Some(first), Some(last)) => first.equals_2d(last),
        _ => false,
    }
}

fn is_same_point(a: &Coord, b: &Coord, tolerance: f64) -> bool {
    if tolerance == 0.0 {
        a.equals_2d(b)
    } else {
        a.distance_2d(b) < tolerance
    }
}

/// Finds the unused edge with an end point closest to `end`. With zero tolerance the first edge with an equal end
/// point is taken, reversed if its last point matches.
fn closest_edge(
    edges: &[&LineString],
    used: &[bool],
    end: Coord,
    tolerance: f64,
) -> Option<EdgeMatch> {
    let mut best: Option<EdgeMatch> = None;
    let mut best_distance = tolerance;

    for (index, edge) in edges.iter().enumerate() {
        if used[index] {
            continue;
        }

        let (Some(start), Some(last)) = (edge.start_point(), edge.end_point()) else {
            continue;
        };

        if tolerance == 0.0 {
            // the end point wins when both ends touch the ring
            if last.equals_2d(&end) {
                return Some(EdgeMatch {
                    index,
                    reversed: true,
                });
            }
            if start.equals_2d(&end) {
                return Some(EdgeMatch {
                    index,
                    reversed: false,
                });
            }
            continue;
        }

        for (candidate, reversed) in [(start, false), (last, true)] {
            let distance = candidate.distance_2d(&end);
            if distance < best_distance {
                best_distance = distance;
                best = Some(EdgeMatch { index, reversed });
            }
        }
    }

    best
}

/// Appends the points of an edge to the ring, leaving out the first one which coincides with the ring end.
fn append_edge(points: &mut Vec<Coord>, edge: &[Coord], reversed: bool) {
    if reversed {
        points.extend(edge.iter().rev().skip(1));
    } else {
        points.extend(edge.iter().skip(1));
    }
}

fn largest_ring(rings: &[(LinearRing, Option<f64>)]) -> Option<usize> {
    let mut largest = None;
    let mut largest_area = f64::NEG_INFINITY;
    for (index, (ring, _)) in rings.iter().enumerate() {
        let area = ring
            .bounding_box()
            .map(|env: Envelope3D| env.to_2d().area())
            .unwrap_or(0.0);
        if area > largest_area {
            largest_area = area;
            largest = Some(index);
        }
    }

    largest
}
