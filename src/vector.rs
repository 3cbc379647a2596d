//! 3D vector primitives on `[f64; 3]`.

use crate::{Result, ZoneMatchError};

pub type Vector3 = [f64; 3];

pub fn dot(v: Vector3, w: Vector3) -> f64 {
    v[0] * w[0] + v[1] * w[1] + v[2] * w[2]
}

pub fn length(v: Vector3) -> f64 {
    dot(v, v).sqrt()
}

/// Vector from `b` to `e`.
pub fn vector(b: Vector3, e: Vector3) -> Vector3 {
    [e[0] - b[0], e[1] - b[1], e[2] - b[2]]
}

/// Unit vector in the direction of `v`.
///
/// Fails with [`ZoneMatchError::DegenerateVector`] when `v` has zero length.
pub fn unit(v: Vector3) -> Result<Vector3> {
    let mag = length(v);
    if mag == 0.0 {
        return Err(ZoneMatchError::DegenerateVector);
    }
    Ok([v[0] / mag, v[1] / mag, v[2] / mag])
}

pub fn scale(v: Vector3, s: f64) -> Vector3 {
    [v[0] * s, v[1] * s, v[2] * s]
}

pub fn add(v: Vector3, w: Vector3) -> Vector3 {
    [v[0] + w[0], v[1] + w[1], v[2] + w[2]]
}

pub fn subtract(v: Vector3, w: Vector3) -> Vector3 {
    [v[0] - w[0], v[1] - w[1], v[2] - w[2]]
}

pub fn cross(v: Vector3, w: Vector3) -> Vector3 {
    [
        v[1] * w[2] - v[2] * w[1],
        v[2] * w[0] - v[0] * w[2],
        v[0] * w[1] - v[1] * w[0],
    ]
}

/// Euclidean distance between two points.
pub fn distance(p: Vector3, q: Vector3) -> f64 {
    length(vector(p, q))
}
