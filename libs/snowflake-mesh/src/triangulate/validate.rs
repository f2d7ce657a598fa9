//! Simple-polygon checks run before triangulation.
//!
//! Orientation tests use `robust::orient2d`, so the verdict is exact for
//! every finite input.

use config::constants::{approx_zero, MIN_TRIANGLE_AREA};
use glam::DVec2;
use robust::{orient2d, Coord};

use crate::error::{MeshError, MeshResult};

#[inline]
fn coord(v: DVec2) -> Coord<f64> {
    Coord { x: v.x, y: v.y }
}

/// Sign of the turn a → b → c: 1 for counter-clockwise, -1 for clockwise,
/// 0 for collinear.
#[inline]
fn orientation(a: DVec2, b: DVec2, c: DVec2) -> i8 {
    let det = orient2d(coord(a), coord(b), coord(c));
    if det > 0.0 {
        1
    } else if det < 0.0 {
        -1
    } else {
        0
    }
}

/// For collinear points, whether `p` lies within the bounding box of a–b.
#[inline]
fn within_box(a: DVec2, b: DVec2, p: DVec2) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

/// Returns true if the closed segments p1–p2 and q1–q2 share any point.
pub fn segments_intersect(p1: DVec2, p2: DVec2, q1: DVec2, q2: DVec2) -> bool {
    let d1 = orientation(p1, p2, q1);
    let d2 = orientation(p1, p2, q2);
    let d3 = orientation(q1, q2, p1);
    let d4 = orientation(q1, q2, p2);

    if d1 * d2 < 0 && d3 * d4 < 0 {
        return true;
    }

    (d1 == 0 && within_box(p1, p2, q1))
        || (d2 == 0 && within_box(p1, p2, q2))
        || (d3 == 0 && within_box(q1, q2, p1))
        || (d4 == 0 && within_box(q1, q2, p2))
}

/// Checks that the closed polygon through `vertices` is simple.
///
/// # Errors
///
/// - [`MeshError::DegeneratePolygon`] for fewer than 3 vertices, a zero-length
///   edge, or zero enclosed area
/// - [`MeshError::SelfIntersection`] naming the first pair of edges (by start
///   index) that cross, touch, or fold back onto each other
pub fn validate_simple_polygon(vertices: &[DVec2]) -> MeshResult<()> {
    let n = vertices.len();
    if n < 3 {
        return Err(MeshError::degenerate(format!(
            "polygon has {n} vertices, at least 3 required"
        )));
    }
    if let Some(i) = vertices.iter().position(|v| !v.is_finite()) {
        return Err(MeshError::degenerate(format!(
            "vertex {i} is not finite: {:?}",
            vertices[i]
        )));
    }

    let edge = |i: usize| (vertices[i], vertices[(i + 1) % n]);

    for i in 0..n {
        let (a, b) = edge(i);
        if approx_zero(a.distance(b)) {
            return Err(MeshError::degenerate(format!(
                "edge {i} has zero length at {a:?}"
            )));
        }
    }

    let twice_area: f64 = (0..n)
        .map(|i| {
            let (a, b) = edge(i);
            a.perp_dot(b)
        })
        .sum();
    if twice_area.abs() * 0.5 < MIN_TRIANGLE_AREA {
        return Err(MeshError::degenerate("polygon encloses no area"));
    }

    // Adjacent edges only share their joint; a collinear turn back is an overlap
    for i in 0..n {
        let j = (i + 1) % n;
        let (a, b) = edge(i);
        let (_, c) = edge(j);
        if orientation(a, b, c) == 0 && (a - b).dot(c - b) > 0.0 {
            return Err(MeshError::SelfIntersection {
                first: i.min(j),
                second: i.max(j),
            });
        }
    }

    for i in 0..n {
        let (p1, p2) = edge(i);
        for j in (i + 2)..n {
            if i == 0 && j == n - 1 {
                continue;
            }
            let (q1, q2) = edge(j);
            if segments_intersect(p1, p2, q1, q2) {
                return Err(MeshError::SelfIntersection { first: i, second: j });
            }
        }
    }

    Ok(())
}
