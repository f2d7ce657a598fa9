//! # Symmetry Expansion
//!
//! Turns one traced arm into the full closed outline.
//!
//! ## Steps
//!
//! 1. Mirror the arm across the row/column diagonal and prepend it, giving
//!    one lobe from tip to tip
//! 2. Trim and subsample the lobe
//! 3. Move the rotation centre to the origin and undo the lattice shear
//! 4. Append `n` copies rotated by `-2π·i/n`
//! 5. Drop repeated vertices, keeping the first occurrence
//!
//! Vertices are `DVec2 { x: row, y: column }` throughout.

use std::collections::HashSet;
use std::f64::consts::TAU;

use config::settings::SymmetryConfig;
use glam::{DMat2, DVec2, IVec2};
use tracing::{debug, info, instrument};

use crate::error::{MeshError, MeshResult};
use crate::trace::Arm;

#[cfg(test)]
mod tests;

// =============================================================================
// OUTLINE
// =============================================================================

/// Closed polygon boundary. The last vertex connects back to the first.
#[derive(Debug, Clone, PartialEq)]
pub struct Outline {
    vertices: Vec<DVec2>,
}

impl Outline {
    /// Wraps vertices that are already ordered and duplicate free.
    pub fn new(vertices: Vec<DVec2>) -> Self {
        Self { vertices }
    }

    #[inline]
    pub fn vertices(&self) -> &[DVec2] {
        &self.vertices
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Shoelace area; positive when the vertices run counter-clockwise.
    ///
    /// # Example
    ///
    /// ```rust
    /// use glam::DVec2;
    /// use snowflake_mesh::symmetry::Outline;
    ///
    /// let square = Outline::new(vec![
    ///     DVec2::new(0.0, 0.0),
    ///     DVec2::new(2.0, 0.0),
    ///     DVec2::new(2.0, 2.0),
    ///     DVec2::new(0.0, 2.0),
    /// ]);
    /// assert_eq!(square.signed_area(), 4.0);
    /// ```
    pub fn signed_area(&self) -> f64 {
        let n = self.vertices.len();
        let twice: f64 = (0..n)
            .map(|i| {
                let a = self.vertices[i];
                let b = self.vertices[(i + 1) % n];
                a.perp_dot(b)
            })
            .sum();
        twice * 0.5
    }

    /// Returns true for counter-clockwise winding.
    pub fn is_ccw(&self) -> bool {
        self.signed_area() > 0.0
    }

    pub fn into_vertices(self) -> Vec<DVec2> {
        self.vertices
    }
}

// =============================================================================
// LOBE CONSTRUCTION
// =============================================================================

/// Reverses the arm and swaps each vertex's row and column.
///
/// Applying it twice returns the original arm.
pub fn mirror_arm(arm: &[IVec2]) -> Vec<IVec2> {
    arm.iter().rev().map(|v| IVec2::new(v.y, v.x)).collect()
}

/// Mirrored arm followed by the arm itself.
pub fn build_lobe(arm: &[IVec2]) -> Vec<IVec2> {
    let mut lobe = mirror_arm(arm);
    lobe.extend_from_slice(arm);
    lobe
}

/// Drops `trim_end` vertices from the end, then keeps every `stride`-th.
///
/// The first vertex always survives. A zero stride is treated as one.
///
/// # Example
///
/// ```rust
/// use snowflake_mesh::symmetry::subsample;
///
/// let kept = subsample(&[0, 1, 2, 3, 4, 5, 6, 7, 8, 9], 2, 5);
/// assert_eq!(kept, vec![0, 2, 4]);
/// ```
pub fn subsample<T: Copy>(vertices: &[T], stride: usize, trim_end: usize) -> Vec<T> {
    let end = vertices.len().saturating_sub(trim_end);
    vertices[..end].iter().copied().step_by(stride.max(1)).collect()
}

/// Unit shear taking orthonormal coordinates onto the sampling lattice.
///
/// Its inverse maps sampled lattice vertices back to the plane.
pub fn shear_matrix(angle_deg: f64) -> DMat2 {
    DMat2::from_cols(DVec2::X, DVec2::new(angle_deg.to_radians().cos(), 1.0))
}

/// Recentres lattice vertices on `center` and removes the lattice shear.
pub fn shear_correct(lobe: &[IVec2], center: DVec2, angle_deg: Option<f64>) -> Vec<DVec2> {
    let unshear = angle_deg.map_or(DMat2::IDENTITY, |a| shear_matrix(a).inverse());
    lobe.iter()
        .map(|v| unshear * (v.as_dvec2() - center))
        .collect()
}

/// Concatenates `dendrites` copies of the lobe, copy `i` rotated by
/// `-2π·i/dendrites` about the origin.
pub fn replicate(lobe: &[DVec2], dendrites: u32) -> Vec<DVec2> {
    let step = -TAU / f64::from(dendrites.max(1));
    let mut out = Vec::with_capacity(lobe.len() * dendrites as usize);
    for i in 0..dendrites {
        let rotation = DMat2::from_angle(step * f64::from(i));
        out.extend(lobe.iter().map(|&v| rotation * v));
    }
    out
}

// =============================================================================
// DEDUPLICATION
// =============================================================================

fn dedup_key(v: DVec2, quantum: Option<f64>) -> [i64; 2] {
    match quantum {
        Some(q) => [(v.x / q).round() as i64, (v.y / q).round() as i64],
        // +0.0 and -0.0 compare equal as numbers, so they share a key
        None => [(v.x + 0.0).to_bits() as i64, (v.y + 0.0).to_bits() as i64],
    }
}

/// Removes every vertex whose key was already seen, preserving order.
///
/// With `Some(quantum)` vertices are keyed by their coordinates rounded to
/// that grid, merging copies that differ only by rotation round-off. With
/// `None` only bit-identical coordinates merge. Keys assume finite input.
///
/// # Example
///
/// ```rust
/// use glam::DVec2;
/// use snowflake_mesh::symmetry::dedupe;
///
/// let noisy = vec![DVec2::new(4.0, 0.0), DVec2::new(4.0, 2.4e-16)];
/// assert_eq!(dedupe(&noisy, Some(1e-6)).len(), 1);
/// assert_eq!(dedupe(&noisy, None).len(), 2);
/// ```
pub fn dedupe(vertices: &[DVec2], quantum: Option<f64>) -> Vec<DVec2> {
    let mut seen = HashSet::with_capacity(vertices.len());
    vertices
        .iter()
        .copied()
        .filter(|&v| seen.insert(dedup_key(v, quantum)))
        .collect()
}

// =============================================================================
// EXPANDER
// =============================================================================

/// Builds the full outline from one arm.
#[derive(Debug, Clone)]
pub struct SymmetryExpander {
    dendrites: u32,
    stride: usize,
    trim_end: usize,
    shear_angle_deg: Option<f64>,
    center: DVec2,
    quantum: Option<f64>,
}

impl SymmetryExpander {
    pub fn new(config: &SymmetryConfig) -> Self {
        Self {
            dendrites: config.dendrites,
            stride: config.stride,
            trim_end: config.trim_end,
            shear_angle_deg: config.shear_angle_deg,
            center: DVec2::from_array(config.center),
            quantum: config.dedup_quantum,
        }
    }

    /// Uses a different rotational order.
    pub fn with_dendrites(mut self, dendrites: u32) -> Self {
        self.dendrites = dendrites;
        self
    }

    pub fn dendrites(&self) -> u32 {
        self.dendrites
    }

    /// The lobe after mirroring, subsampling and shear correction.
    pub fn lobe(&self, arm: &Arm) -> Vec<DVec2> {
        let lobe = build_lobe(arm.vertices());
        let kept = subsample(&lobe, self.stride, self.trim_end);
        debug!(
            lobe = lobe.len(),
            kept = kept.len(),
            stride = self.stride,
            "Subsampled lobe"
        );
        shear_correct(&kept, self.center, self.shear_angle_deg)
    }

    /// Expands `arm` into the closed outline.
    ///
    /// # Errors
    ///
    /// - [`MeshError::InvalidInput`] for an empty arm, zero dendrites, or a
    ///   centre or shear angle that makes a vertex non-finite
    /// - [`MeshError::DegeneratePolygon`] if fewer than 3 distinct vertices remain
    #[instrument(skip_all, fields(dendrites = self.dendrites, arm = arm.len()))]
    pub fn expand(&self, arm: &Arm) -> MeshResult<Outline> {
        if arm.is_empty() {
            return Err(MeshError::invalid_input("cannot expand an empty arm"));
        }
        if self.dendrites == 0 {
            return Err(MeshError::invalid_input("dendrite count must be positive"));
        }

        let lobe = self.lobe(arm);
        if let Some(i) = lobe.iter().position(|v| !v.is_finite()) {
            return Err(MeshError::invalid_input(format!(
                "lobe vertex {i} is not finite: {:?}",
                lobe[i]
            )));
        }
        let replicated = replicate(&lobe, self.dendrites);
        let vertices = dedupe(&replicated, self.quantum);
        debug!(
            replicated = replicated.len(),
            removed = replicated.len() - vertices.len(),
            "Deduplicated outline"
        );

        if vertices.len() < 3 {
            return Err(MeshError::degenerate(format!(
                "outline has {} distinct vertices, at least 3 required",
                vertices.len()
            )));
        }

        let outline = Outline::new(vertices);
        info!(
            vertices = outline.len(),
            area = outline.signed_area(),
            "Expanded outline"
        );
        Ok(outline)
    }
}
