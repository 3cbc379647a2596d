//! Tests for footprint membership and zone preflight checks

use zonematch::membership::zone_contains;
use zonematch::{Point3D, ZoneDefinition, ZoneIssue, contains, validate_zone};

const UNIT_SQUARE: [(f64, f64); 4] = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];

fn zone(points: [(f64, f64, f64); 4]) -> ZoneDefinition {
    ZoneDefinition::new(
        "Generic Models",
        Some("bench"),
        points.map(|(x, y, z)| Point3D::new(x, y, z)),
    )
}

#[test]
fn test_unit_square_inside_and_outside() {
    assert!(contains((0.5, 0.5), &UNIT_SQUARE));
    assert!(!contains((2.0, 2.0), &UNIT_SQUARE));
    assert!(!contains((-0.1, 0.5), &UNIT_SQUARE));
}

#[test]
fn test_boundary_is_outside() {
    assert!(!contains((0.0, 0.5), &UNIT_SQUARE));
    assert!(!contains((0.5, 1.0), &UNIT_SQUARE));
    assert!(!contains((1.0, 1.0), &UNIT_SQUARE));
    assert!(!contains((0.0, 0.0), &UNIT_SQUARE));
}

#[test]
fn test_vertex_order_does_not_matter() {
    let clockwise = [(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)];
    assert!(contains((0.25, 0.75), &clockwise));
}

#[test]
fn test_concave_quad() {
    // Reflex vertex at (2, 1)
    let notched = [(0.0, 0.0), (4.0, 0.0), (2.0, 1.0), (0.0, 4.0)];
    assert!(contains((1.0, 0.5), &notched));
    assert!(contains((1.0, 2.0), &notched));
    assert!(!contains((3.0, 1.0), &notched));
}

#[test]
fn test_too_few_vertices() {
    assert!(!contains((0.0, 0.0), &[]));
    assert!(!contains((0.5, 0.0), &[(0.0, 0.0), (1.0, 0.0)]));
}

#[test]
fn test_zone_contains_ignores_elevation() {
    let z = zone([
        (0.0, 0.0, 3.0),
        (4.0, 0.0, 3.0),
        (4.0, 4.0, 3.0),
        (0.0, 4.0, 3.0),
    ]);
    assert!(zone_contains(&z, (2.0, 2.0)));
}

#[test]
fn test_validate_clean_zone() {
    let z = zone([
        (0.0, 0.0, 0.0),
        (4.0, 0.0, 0.0),
        (4.0, 4.0, 0.0),
        (0.0, 4.0, 0.0),
    ]);
    assert!(validate_zone(&z, 1e-6).is_empty());
}

#[test]
fn test_validate_degenerate_edge() {
    let z = zone([
        (0.0, 0.0, 0.0),
        (0.0, 0.0, 0.0),
        (4.0, 4.0, 0.0),
        (0.0, 4.0, 0.0),
    ]);
    let issues = validate_zone(&z, 1e-6);
    assert!(issues.contains(&ZoneIssue::DegenerateEdge { edge: 0 }));
}

#[test]
fn test_validate_non_coplanar() {
    let z = zone([
        (0.0, 0.0, 0.0),
        (4.0, 0.0, 0.0),
        (4.0, 4.0, 0.0),
        (0.0, 4.0, 0.5),
    ]);
    let issues = validate_zone(&z, 0.01);
    assert!(issues
        .iter()
        .any(|i| matches!(i, ZoneIssue::NonCoplanar { deviation } if (*deviation - 0.5).abs() < 1e-9)));
    assert!(validate_zone(&z, 1.0).is_empty());
}

#[test]
fn test_validate_bow_tie() {
    let z = zone([
        (0.0, 0.0, 0.0),
        (4.0, 4.0, 0.0),
        (4.0, 0.0, 0.0),
        (0.0, 4.0, 0.0),
    ]);
    let issues = validate_zone(&z, 1e-6);
    assert!(issues.contains(&ZoneIssue::SelfIntersecting { first: 0, second: 2 }));
}
