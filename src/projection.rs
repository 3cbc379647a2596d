//! Point-to-segment projection.
//!
//! Finds the point on a zone edge closest to a sample and the distance to it.
//! The projection parameter is computed in two steps (scale the point vector
//! by `1/len`, then dot with the unit edge vector) rather than as
//! `dot(edge, point) / len²`; the two differ in floating-point rounding and
//! results must stay reproducible across runs and implementations.

use serde::{Deserialize, Serialize};

use crate::vector::{add, distance, dot, length, scale, unit, vector};
use crate::{Point3D, Result, ZoneMatchError};

/// Closest point on one zone edge.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EdgeProjection {
    /// Distance from the sample to `nearest_point` (always >= 0)
    pub distance: f64,
    /// Point on the closed segment nearest to the sample
    pub nearest_point: Point3D,
}

/// Project `point` onto the segment `[seg_start, seg_end]`.
///
/// Points beyond either end snap to that endpoint.
///
/// # Errors
/// [`ZoneMatchError::DegenerateSegment`] when the endpoints coincide.
///
/// # Example
/// ```
/// use zonematch::{Point3D, project};
///
/// let p = project(
///     Point3D::new(1.0, 2.0, 0.0),
///     Point3D::new(0.0, 0.0, 0.0),
///     Point3D::new(4.0, 0.0, 0.0),
/// ).unwrap();
/// assert_eq!(p.nearest_point, Point3D::new(1.0, 0.0, 0.0));
/// assert_eq!(p.distance, 2.0);
/// ```
pub fn project(point: Point3D, seg_start: Point3D, seg_end: Point3D) -> Result<EdgeProjection> {
    let start = seg_start.to_array();
    let line_vec = vector(start, seg_end.to_array());
    let pnt_vec = vector(start, point.to_array());

    let line_len = length(line_vec);
    if line_len == 0.0 {
        return Err(ZoneMatchError::DegenerateSegment {
            start: seg_start,
            end: seg_end,
        });
    }

    let line_unitvec = unit(line_vec)?;
    let pnt_vec_scaled = scale(pnt_vec, 1.0 / line_len);
    let t = dot(line_unitvec, pnt_vec_scaled).clamp(0.0, 1.0);

    // Both vectors are anchored at seg_start
    let nearest = scale(line_vec, t);
    let dist = distance(nearest, pnt_vec);

    Ok(EdgeProjection {
        distance: dist,
        nearest_point: Point3D::from_array(add(nearest, start)),
    })
}
