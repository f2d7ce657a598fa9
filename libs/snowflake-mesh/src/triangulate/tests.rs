//! # Tests for Polygon Triangulation

use super::*;
use approx::assert_relative_eq;

fn polygon(points: &[(f64, f64)]) -> Vec<DVec2> {
    points.iter().map(|&(x, y)| DVec2::new(x, y)).collect()
}

fn outline(points: &[(f64, f64)]) -> Outline {
    Outline::new(polygon(points))
}

fn plain() -> PolygonTriangulator {
    PolygonTriangulator::new(&TriangulationConfig {
        quality: false,
        ..TriangulationConfig::default()
    })
}

fn refined() -> PolygonTriangulator {
    PolygonTriangulator::new(&TriangulationConfig::default())
}

const SQUARE: [(f64, f64); 4] = [(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)];
const L_SHAPE: [(f64, f64); 6] = [
    (0.0, 0.0),
    (6.0, 0.0),
    (6.0, 2.0),
    (2.0, 2.0),
    (2.0, 6.0),
    (0.0, 6.0),
];

fn has_edge(triangulation: &Triangulation, a: usize, b: usize) -> bool {
    triangulation.triangles().iter().any(|t| {
        let t: Vec<usize> = t.iter().map(|&i| i as usize).collect();
        t.contains(&a) && t.contains(&b)
    })
}

// =============================================================================
// SEGMENT TESTS
// =============================================================================

#[test]
fn test_segments_form_one_cycle() {
    let edges = segments(7);
    assert_eq!(edges.len(), 7);
    assert_eq!(edges.last(), Some(&[6, 0]));

    // Every index starts exactly one edge and ends exactly one edge
    let mut starts = vec![0; 7];
    let mut ends = vec![0; 7];
    for [a, b] in &edges {
        starts[*a] += 1;
        ends[*b] += 1;
    }
    assert!(starts.iter().all(|&c| c == 1));
    assert!(ends.iter().all(|&c| c == 1));

    // Walking from 0 visits every vertex before returning
    let mut current = 0;
    for _ in 0..7 {
        current = edges[current][1];
    }
    assert_eq!(current, 0);
}

#[test]
fn test_segments_of_short_outline_are_empty() {
    assert!(segments(0).is_empty());
    assert!(segments(1).is_empty());
}

// =============================================================================
// VALIDATION TESTS
// =============================================================================

#[test]
fn test_square_is_simple() {
    assert!(validate_simple_polygon(&polygon(&SQUARE)).is_ok());
    assert!(validate_simple_polygon(&polygon(&L_SHAPE)).is_ok());
}

#[test]
fn test_bowtie_reports_crossing_edges() {
    let bowtie = polygon(&[(0.0, 0.0), (4.0, 4.0), (4.0, 0.0), (0.0, 2.0)]);
    match validate_simple_polygon(&bowtie) {
        Err(MeshError::SelfIntersection { first, second }) => {
            assert_eq!((first, second), (0, 2));
        }
        other => panic!("expected SelfIntersection, got {other:?}"),
    }
}

#[test]
fn test_fold_back_is_an_intersection() {
    let spike = polygon(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (4.0, 2.0), (0.0, 4.0)]);
    match validate_simple_polygon(&spike) {
        Err(MeshError::SelfIntersection { first, second }) => {
            assert_eq!((first, second), (1, 2));
        }
        other => panic!("expected SelfIntersection, got {other:?}"),
    }
}

#[test]
fn test_degenerate_polygons() {
    let two = polygon(&[(0.0, 0.0), (1.0, 0.0)]);
    let flat = polygon(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]);
    let repeated = polygon(&[(0.0, 0.0), (1.0, 0.0), (1.0, 0.0), (0.0, 1.0)]);
    for case in [two, flat, repeated] {
        assert!(matches!(
            validate_simple_polygon(&case),
            Err(MeshError::DegeneratePolygon { .. })
        ));
    }
}

#[test]
fn test_segments_intersect_cases() {
    let p = |x, y| DVec2::new(x, y);
    // Shared endpoint
    assert!(segments_intersect(p(0.0, 0.0), p(1.0, 0.0), p(1.0, 0.0), p(1.0, 1.0)));
    // Parallel and apart
    assert!(!segments_intersect(p(0.0, 0.0), p(1.0, 0.0), p(0.0, 1.0), p(1.0, 1.0)));
    // Collinear overlap
    assert!(segments_intersect(p(0.0, 0.0), p(2.0, 0.0), p(1.0, 0.0), p(3.0, 0.0)));
    // Collinear but disjoint
    assert!(!segments_intersect(p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0), p(3.0, 0.0)));
}

// =============================================================================
// TRIANGULATION TESTS
// =============================================================================

#[test]
fn test_square_without_refinement() {
    let result = plain().triangulate(&outline(&SQUARE)).unwrap();
    assert_eq!(result.vertices().len(), 4);
    assert_eq!(result.triangles().len(), 2);
    assert_eq!(result.steiner_count(), 0);
    assert_relative_eq!(result.area(), 4.0, epsilon = 1e-12);
}

#[test]
fn test_clockwise_outline_gives_ccw_triangles() {
    let mut points = SQUARE.to_vec();
    points.reverse();
    let result = plain().triangulate(&outline(&points)).unwrap();
    for &[a, b, c] in result.triangles() {
        let (a, b, c) = (
            result.vertices()[a as usize],
            result.vertices()[b as usize],
            result.vertices()[c as usize],
        );
        assert!((b - a).perp_dot(c - a) > 0.0);
    }
    assert_relative_eq!(result.area(), 4.0, epsilon = 1e-12);
}

#[test]
fn test_concave_area_matches_polygon() {
    let shape = outline(&L_SHAPE);
    let result = plain().triangulate(&shape).unwrap();
    assert_eq!(result.triangles().len(), L_SHAPE.len() - 2);
    assert_relative_eq!(result.area(), shape.signed_area(), epsilon = 1e-9);
    assert_relative_eq!(result.area(), 20.0, epsilon = 1e-9);
}

#[test]
fn test_refinement_keeps_outline_and_area() {
    let shape = outline(&L_SHAPE);
    let result = refined().triangulate(&shape).unwrap();

    assert_eq!(result.outline_len(), L_SHAPE.len());
    assert_eq!(&result.vertices()[..L_SHAPE.len()], shape.vertices());
    assert_relative_eq!(result.area(), 20.0, epsilon = 1e-9);

    for [a, b] in segments(shape.len()) {
        assert!(has_edge(&result, a, b), "boundary edge ({a}, {b}) missing");
    }
}

#[test]
fn test_refinement_budget_reports_incomplete() {
    let sliver = outline(&[(0.0, 0.0), (100.0, 0.0), (50.0, 0.5)]);
    assert!(plain().triangulate(&sliver).unwrap().is_refinement_complete());

    let capped = PolygonTriangulator::new(&TriangulationConfig {
        min_angle_deg: 30.0,
        max_steiner_points: 1,
        ..TriangulationConfig::default()
    });
    let result = capped.triangulate(&sliver).unwrap();
    assert!(!result.is_refinement_complete());
    assert_relative_eq!(result.area(), 25.0, epsilon = 1e-9);
}

#[test]
fn test_indices_within_bounds() {
    let result = refined().triangulate(&outline(&L_SHAPE)).unwrap();
    let count = result.vertices().len() as u32;
    assert!(result.triangles().iter().flatten().all(|&i| i < count));
}

#[test]
fn test_self_intersecting_outline_is_rejected() {
    let bowtie = outline(&[(0.0, 0.0), (4.0, 4.0), (4.0, 0.0), (0.0, 2.0)]);
    let result = plain().triangulate(&bowtie);
    assert!(matches!(result, Err(MeshError::SelfIntersection { .. })));
}

#[test]
fn test_duplicate_vertex_without_validation() {
    let triangulator = PolygonTriangulator::new(&TriangulationConfig {
        quality: false,
        validate_simple: false,
        ..TriangulationConfig::default()
    });
    let shape = outline(&[
        (0.0, 0.0),
        (4.0, 0.0),
        (4.0, 4.0),
        (0.0, 4.0),
        (4.0, 0.0),
        (2.0, -2.0),
    ]);
    let result = triangulator.triangulate(&shape);
    assert!(matches!(result, Err(MeshError::DegeneratePolygon { .. })));
}

#[test]
fn test_too_few_vertices() {
    let result = plain().triangulate(&outline(&[(0.0, 0.0), (1.0, 1.0)]));
    assert!(matches!(result, Err(MeshError::DegeneratePolygon { .. })));
}
