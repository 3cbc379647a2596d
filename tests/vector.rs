//! Tests for vector module

use zonematch::ZoneMatchError;
use zonematch::vector::*;

fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}

#[test]
fn test_dot_and_length() {
    assert_eq!(dot([1.0, 2.0, 3.0], [4.0, -5.0, 6.0]), 12.0);
    assert_eq!(length([3.0, 4.0, 0.0]), 5.0);
    assert_eq!(length([0.0, 0.0, 0.0]), 0.0);
}

#[test]
fn test_vector_points_from_begin_to_end() {
    assert_eq!(vector([1.0, 1.0, 1.0], [4.0, 5.0, 1.0]), [3.0, 4.0, 0.0]);
}

#[test]
fn test_unit_has_length_one() {
    let u = unit([3.0, 4.0, 12.0]).unwrap();
    assert!(approx_eq(length(u), 1.0, 1e-12));
    assert!(approx_eq(u[0], 3.0 / 13.0, 1e-12));
}

#[test]
fn test_unit_of_zero_vector_fails() {
    assert!(matches!(
        unit([0.0, 0.0, 0.0]),
        Err(ZoneMatchError::DegenerateVector)
    ));
}

#[test]
fn test_scale_add_distance() {
    assert_eq!(scale([1.0, -2.0, 0.5], 2.0), [2.0, -4.0, 1.0]);
    assert_eq!(add([1.0, 2.0, 3.0], [1.0, 1.0, 1.0]), [2.0, 3.0, 4.0]);
    assert_eq!(distance([0.0, 0.0, 0.0], [2.0, 3.0, 6.0]), 7.0);
}
