//! # Prism Extrusion
//!
//! Lifts a 2D triangulation into a closed 3D slab.
//!
//! ## Vertex Layout
//!
//! | Block  | Indices          | Position                               |
//! |--------|------------------|----------------------------------------|
//! | front  | `0..N`           | `shrink · xy`, `z = +(h + noise[k])`   |
//! | back   | `N..2N`          | `shrink · xy`, `z = -(h + noise[k])`   |
//! | middle | `2N..2N + m`     | outline `xy`, `z = 0` (optional)       |
//!
//! `N` counts all triangulation vertices, `m` only the outline. The front
//! and back faces share their noise so the slab is symmetric about `z = 0`.
//!
//! Side walls join consecutive outline vertices, including the seam from the
//! last vertex back to the first, with two triangles per edge and band.
//! Their winding follows the outline orientation so every face points away
//! from the solid.

use config::constants::MAX_VERTICES;
use config::settings::{ExtrusionConfig, NoiseConfig};
use glam::DVec3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use tracing::{debug, info, instrument};

use crate::error::{MeshError, MeshResult};
use crate::mesh::Mesh;
use crate::symmetry::Outline;
use crate::triangulate::Triangulation;


/// Builds the 3D mesh from a triangulated outline.
#[derive(Debug, Clone)]
pub struct PrismExtruder {
    half_thickness: f64,
    shrink: f64,
    noise: Option<NoiseConfig>,
    middle_ring: bool,
}

impl PrismExtruder {
    pub fn new(config: &ExtrusionConfig) -> Self {
        Self {
            half_thickness: config.half_thickness,
            shrink: config.shrink,
            noise: config.noise,
            middle_ring: config.middle_ring,
        }
    }

    /// Per-vertex z jitter, reproducible for a fixed seed.
    ///
    /// Returns zeros when noise is disabled.
    ///
    /// # Errors
    ///
    /// [`MeshError::InvalidInput`] if the noise scale is negative or not finite.
    pub fn noise_offsets(&self, count: usize) -> MeshResult<Vec<f64>> {
        let Some(noise) = self.noise else {
            return Ok(vec![0.0; count]);
        };
        // Normal::new accepts a negative deviation, so the sign is checked here
        if !(noise.scale.is_finite() && noise.scale >= 0.0) {
            return Err(MeshError::invalid_input(format!(
                "noise scale must be finite and non-negative, got {}",
                noise.scale
            )));
        }
        let normal = Normal::new(0.0, noise.scale).map_err(|e| {
            MeshError::invalid_input(format!("noise scale {}: {e}", noise.scale))
        })?;
        let mut rng = StdRng::seed_from_u64(noise.seed);
        Ok((0..count).map(|_| normal.sample(&mut rng)).collect())
    }

    /// Number of side-wall triangles for an outline of `ring` vertices.
    pub fn side_face_count(&self, ring: usize) -> usize {
        if self.middle_ring {
            4 * ring
        } else {
            2 * ring
        }
    }

    /// Extrudes `triangulation`, walling it along `outline`.
    ///
    /// # Errors
    ///
    /// [`MeshError::InvalidInput`] if the triangulation was not built from
    /// `outline`, the mesh would be too large, or the noise is invalid.
    #[instrument(skip_all, fields(
        vertices = triangulation.vertices().len(),
        triangles = triangulation.triangles().len(),
        middle_ring = self.middle_ring,
    ))]
    pub fn extrude(&self, triangulation: &Triangulation, outline: &Outline) -> MeshResult<Mesh> {
        let planar = triangulation.vertices();
        let n = planar.len();
        let m = outline.len();

        if triangulation.outline_len() != m || m > n {
            return Err(MeshError::invalid_input(format!(
                "triangulation has {} outline vertices, outline has {m}",
                triangulation.outline_len()
            )));
        }
        if m < 3 {
            return Err(MeshError::invalid_input(format!(
                "side walls need at least 3 outline vertices, got {m}"
            )));
        }
        let total = 2 * n + if self.middle_ring { m } else { 0 };
        if total > MAX_VERTICES {
            return Err(MeshError::invalid_input(format!(
                "mesh would have {total} vertices, limit is {MAX_VERTICES}"
            )));
        }

        let noise = self.noise_offsets(n)?;
        let faces = 2 * triangulation.triangles().len() + self.side_face_count(m);
        let mut mesh = Mesh::with_capacity(total, faces);

        for (p, dz) in planar.iter().zip(&noise) {
            let xy = *p * self.shrink;
            mesh.add_vertex(DVec3::new(xy.x, xy.y, self.half_thickness + dz));
        }
        for (p, dz) in planar.iter().zip(&noise) {
            let xy = *p * self.shrink;
            mesh.add_vertex(DVec3::new(xy.x, xy.y, -(self.half_thickness + dz)));
        }
        if self.middle_ring {
            for p in outline.vertices() {
                mesh.add_vertex(p.extend(0.0));
            }
        }

        let back = n as u32;
        for &[a, b, c] in triangulation.triangles() {
            mesh.add_triangle(a, b, c);
        }
        for &[a, b, c] in triangulation.triangles() {
            mesh.add_triangle(b + back, a + back, c + back);
        }

        let ccw = outline.is_ccw();
        debug!(ccw, ring = m, "Stitching side walls");
        if self.middle_ring {
            let middle = 2 * n as u32;
            push_band(&mut mesh, 0, middle, m as u32, ccw);
            push_band(&mut mesh, middle, back, m as u32, ccw);
        } else {
            push_band(&mut mesh, 0, back, m as u32, ccw);
        }

        info!(
            vertices = mesh.vertex_count(),
            faces = mesh.triangle_count(),
            "Extruded prism"
        );
        Ok(mesh)
    }
}

/// Two triangles per outline edge between ring `upper` and ring `lower`.
///
/// Index `ring` wraps to 0, so the seam is always closed.
fn push_band(mesh: &mut Mesh, upper: u32, lower: u32, ring: u32, ccw: bool) {
    for i in 0..ring {
        let j = (i + 1) % ring;
        let (ui, uj, li, lj) = (upper + i, upper + j, lower + i, lower + j);
        if ccw {
            mesh.add_triangle(ui, li, lj);
            mesh.add_triangle(ui, lj, uj);
        } else {
            mesh.add_triangle(ui, lj, li);
            mesh.add_triangle(ui, uj, lj);
        }
    }
}
