//! Point-in-polygon membership on the XY footprint, plus an optional
//! preflight check of zone geometry.
//!
//! Membership uses `geo`'s `Contains` (OGC semantics): a point on the
//! boundary is *not* contained. This holds for every vertex and edge, so
//! samples lying exactly on a zone outline are consistently reported as
//! outside.

use geo::algorithm::line_intersection::{LineIntersection, line_intersection};
use geo::{Contains, Coord, Line, LineString, Point, Polygon};
use serde::{Deserialize, Serialize};

use crate::vector::{cross, dot, length, unit, vector};
use crate::{ZONE_VERTEX_COUNT, ZoneDefinition};

/// Whether `point` lies strictly inside the polygon described by `vertices`.
///
/// The ring is closed implicitly. Fewer than three vertices never contain anything.
///
/// # Example
/// ```
/// use zonematch::contains;
///
/// let square = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];
/// assert!(contains((0.5, 0.5), &square));
/// assert!(!contains((2.0, 2.0), &square));
/// ```
pub fn contains(point: (f64, f64), vertices: &[(f64, f64)]) -> bool {
    if vertices.len() < 3 {
        return false;
    }
    let polygon = Polygon::new(LineString::from(vertices.to_vec()), vec![]);
    polygon.contains(&Point::new(point.0, point.1))
}

/// Membership of an XY position in a zone footprint.
pub fn zone_contains(zone: &ZoneDefinition, point: (f64, f64)) -> bool {
    contains(point, &zone.footprint())
}

/// A geometry problem found by [`validate_zone`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ZoneIssue {
    /// Edge `edge` (0-based) has coincident endpoints
    DegenerateEdge { edge: usize },
    /// The fourth vertex is off the plane of the first three by `deviation`
    NonCoplanar { deviation: f64 },
    /// Edges `first` and `second` cross or overlap in the XY footprint
    SelfIntersecting { first: usize, second: usize },
}

/// Preflight check of a zone's geometry.
///
/// Not part of the analysis path: analysis tolerates any vertex layout and
/// only fails on degenerate edges when it reaches them. Callers that want to
/// reject bad geometry up front run this first.
pub fn validate_zone(zone: &ZoneDefinition, coplanar_tolerance: f64) -> Vec<ZoneIssue> {
    let mut issues = Vec::new();
    let edges = zone.edges();

    for (i, (start, end)) in edges.iter().enumerate() {
        if start == end {
            issues.push(ZoneIssue::DegenerateEdge { edge: i });
        }
    }

    if let Some(deviation) = plane_deviation(zone) {
        if deviation > coplanar_tolerance {
            issues.push(ZoneIssue::NonCoplanar { deviation });
        }
    }

    let lines: Vec<Option<Line<f64>>> = edges
        .iter()
        .map(|(s, e)| {
            let (a, b) = (s.xy(), e.xy());
            (a != b).then(|| Line::new(Coord { x: a.0, y: a.1 }, Coord { x: b.0, y: b.1 }))
        })
        .collect();

    for first in 0..ZONE_VERTEX_COUNT {
        for second in (first + 1)..ZONE_VERTEX_COUNT {
            let (Some(a), Some(b)) = (lines[first], lines[second]) else {
                continue;
            };
            let adjacent = second == first + 1 || (first == 0 && second == ZONE_VERTEX_COUNT - 1);
            let crossing = match line_intersection(a, b) {
                None => false,
                // Neighbouring edges always share a vertex
                Some(LineIntersection::SinglePoint { .. }) => !adjacent,
                Some(LineIntersection::Collinear { .. }) => true,
            };
            if crossing {
                issues.push(ZoneIssue::SelfIntersecting { first, second });
            }
        }
    }

    issues
}

/// Distance of the fourth vertex from the plane through the first three.
/// `None` when the first three are collinear.
fn plane_deviation(zone: &ZoneDefinition) -> Option<f64> {
    let [v1, v2, v3, v4] = zone.vertices.map(|v| v.to_array());
    let normal = cross(vector(v1, v2), vector(v1, v3));
    if length(normal) == 0.0 {
        return None;
    }
    let n = unit(normal).ok()?;
    Some(dot(n, vector(v1, v4)).abs())
}
