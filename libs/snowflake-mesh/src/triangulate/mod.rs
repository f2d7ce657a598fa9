//! # Polygon Triangulation
//!
//! Constrained Delaunay triangulation of a closed outline, backed by `spade`.
//!
//! ## Contract
//!
//! - Every outline edge is kept as a constraint and never split
//! - Outline vertices keep their indices; Steiner points follow them
//! - Only faces inside the outline are returned, wound counter-clockwise
//!
//! With quality refinement enabled, interior Steiner points are inserted
//! until every triangle meets the configured minimum angle or the point
//! budget is spent.

mod validate;

#[cfg(test)]
mod tests;

pub use validate::{segments_intersect, validate_simple_polygon};

use std::collections::HashSet;

use config::settings::TriangulationConfig;
use glam::DVec2;
use spade::handles::{FixedFaceHandle, FixedVertexHandle, InnerTag};
use spade::{
    AngleLimit, ConstrainedDelaunayTriangulation, Point2, RefinementParameters,
    Triangulation as _,
};
use tracing::{debug, info, instrument, warn};

use crate::error::{MeshError, MeshResult};
use crate::symmetry::Outline;

type Cdt = ConstrainedDelaunayTriangulation<Point2<f64>>;

/// Boundary edge as a pair of outline indices.
pub type Segment = [usize; 2];

/// Closed cycle of boundary edges over `len` outline vertices.
///
/// Edges are `(i, i + 1)` followed by the closing edge `(len - 1, 0)`.
/// Fewer than two vertices cannot form a cycle and yield no edges.
///
/// # Example
///
/// ```rust
/// use snowflake_mesh::triangulate::segments;
///
/// assert_eq!(segments(3), vec![[0, 1], [1, 2], [2, 0]]);
/// ```
pub fn segments(len: usize) -> Vec<Segment> {
    if len < 2 {
        return Vec::new();
    }
    (0..len).map(|i| [i, (i + 1) % len]).collect()
}

// =============================================================================
// TRIANGULATION
// =============================================================================

/// 2D vertices and counter-clockwise triangles covering the outline interior.
#[derive(Debug, Clone, PartialEq)]
pub struct Triangulation {
    vertices: Vec<DVec2>,
    triangles: Vec<[u32; 3]>,
    outline_len: usize,
    refinement_complete: bool,
}

impl Triangulation {
    /// Creates a triangulation from raw parts.
    ///
    /// The first `outline_len` vertices must be the outline in order.
    pub fn new(vertices: Vec<DVec2>, triangles: Vec<[u32; 3]>, outline_len: usize) -> Self {
        Self {
            vertices,
            triangles,
            outline_len,
            refinement_complete: true,
        }
    }

    #[inline]
    pub fn vertices(&self) -> &[DVec2] {
        &self.vertices
    }

    #[inline]
    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    /// Number of leading vertices that belong to the outline.
    #[inline]
    pub fn outline_len(&self) -> usize {
        self.outline_len
    }

    /// Interior points added by refinement.
    pub fn steiner_count(&self) -> usize {
        self.vertices.len() - self.outline_len
    }

    /// False when refinement stopped at the Steiner point budget.
    pub fn is_refinement_complete(&self) -> bool {
        self.refinement_complete
    }

    /// Total area of all triangles.
    pub fn area(&self) -> f64 {
        self.triangles
            .iter()
            .map(|&[a, b, c]| {
                let a = self.vertices[a as usize];
                let b = self.vertices[b as usize];
                let c = self.vertices[c as usize];
                0.5 * (b - a).perp_dot(c - a)
            })
            .sum()
    }
}

// =============================================================================
// TRIANGULATOR
// =============================================================================

/// Triangulates outlines with their edges as constraints.
#[derive(Debug, Clone)]
pub struct PolygonTriangulator {
    quality: bool,
    min_angle_deg: f64,
    max_steiner_points: usize,
    validate_simple: bool,
}

impl PolygonTriangulator {
    pub fn new(config: &TriangulationConfig) -> Self {
        Self {
            quality: config.quality,
            min_angle_deg: config.min_angle_deg,
            max_steiner_points: config.max_steiner_points,
            validate_simple: config.validate_simple,
        }
    }

    /// Triangulates the interior of `outline`.
    ///
    /// # Errors
    ///
    /// - [`MeshError::DegeneratePolygon`] for short, flat or duplicate-vertex outlines
    /// - [`MeshError::SelfIntersection`] when validation finds crossing edges
    /// - [`MeshError::TriangulationFailed`] when the constraints cannot be inserted
    #[instrument(skip_all, fields(vertices = outline.len(), quality = self.quality))]
    pub fn triangulate(&self, outline: &Outline) -> MeshResult<Triangulation> {
        let points = outline.vertices();
        if points.len() < 3 {
            return Err(MeshError::degenerate(format!(
                "outline has {} vertices, at least 3 required",
                points.len()
            )));
        }
        if self.validate_simple {
            validate_simple_polygon(points)?;
            debug!("Outline is a simple polygon");
        }

        let mut cdt = Cdt::new();
        let handles = insert_outline(&mut cdt, points)?;

        for [from, to] in segments(points.len()) {
            if !cdt.can_add_constraint(handles[from], handles[to]) {
                return Err(MeshError::triangulation_failed(format!(
                    "boundary edge ({from}, {to}) crosses another boundary edge"
                )));
            }
            cdt.add_constraint(handles[from], handles[to]);
        }
        debug!(constraints = cdt.num_constraints(), "Inserted boundary constraints");

        let (angle, budget) = if self.quality {
            (self.min_angle_deg, self.max_steiner_points)
        } else {
            (0.0, 0)
        };
        let parameters = RefinementParameters::<f64>::new()
            .keep_constraint_edges()
            .exclude_outer_faces(true)
            .with_angle_limit(AngleLimit::from_deg(angle))
            .with_max_additional_vertices(budget);
        let result = cdt.refine(parameters);
        let complete = !self.quality || result.refinement_complete;
        if !complete {
            warn!(
                budget = self.max_steiner_points,
                "Quality refinement stopped at the Steiner point budget"
            );
        }

        let triangulation = collect(
            &cdt,
            &result.excluded_faces.iter().copied().collect(),
            points.len(),
            complete,
        );
        if triangulation.triangles.is_empty() {
            return Err(MeshError::triangulation_failed(
                "no triangle lies inside the outline",
            ));
        }

        info!(
            triangles = triangulation.triangles.len(),
            steiner = triangulation.steiner_count(),
            "Triangulated outline"
        );
        Ok(triangulation)
    }
}

/// Inserts the outline in order so vertex handle `i` is outline vertex `i`.
fn insert_outline(cdt: &mut Cdt, points: &[DVec2]) -> MeshResult<Vec<FixedVertexHandle>> {
    let mut handles = Vec::with_capacity(points.len());
    for (i, p) in points.iter().enumerate() {
        let handle = cdt
            .insert(Point2::new(p.x, p.y))
            .map_err(|e| {
                MeshError::triangulation_failed(format!("vertex {i} at {p:?}: {e:?}"))
            })?;
        if handle.index() != i {
            return Err(MeshError::degenerate(format!(
                "vertex {i} at {p:?} duplicates vertex {}",
                handle.index()
            )));
        }
        handles.push(handle);
    }
    Ok(handles)
}

fn collect(
    cdt: &Cdt,
    excluded: &HashSet<FixedFaceHandle<InnerTag>>,
    outline_len: usize,
    refinement_complete: bool,
) -> Triangulation {
    let vertices: Vec<DVec2> = cdt
        .vertices()
        .map(|v| {
            let p = v.position();
            DVec2::new(p.x, p.y)
        })
        .collect();

    let triangles: Vec<[u32; 3]> = cdt
        .inner_faces()
        .filter(|face| !excluded.contains(&face.fix()))
        .map(|face| face.vertices().map(|v| v.fix().index() as u32))
        .collect();

    Triangulation {
        vertices,
        triangles,
        outline_len,
        refinement_complete,
    }
}
