//! # Boundary Extraction
//!
//! Converts a scalar field into a boundary mask.
//!
//! ## Algorithm
//!
//! 1. Binarize: samples strictly above the threshold become 1, others 0
//! 2. Correlate the binary field with a 3×3 discrete Laplacian
//! 3. Mark cells whose response is strictly positive
//!
//! With a sum-to-zero kernel and a negative centre, the response is zero in
//! uniform regions and negative on inside cells next to the edge, so only
//! outside cells touching a 0/1 transition are marked.

use config::settings::{BoundaryConfig, ConvolutionMode};
use ndarray::Array2;
use tracing::{debug, info, instrument};

use crate::field::{boundary_cell_count, BoundaryMask, ScalarField};

/// Extracts the level-set edge of a scalar field.
#[derive(Debug, Clone)]
pub struct BoundaryExtractor {
    threshold: f64,
    kernel: [[f64; 3]; 3],
    mode: ConvolutionMode,
}

impl BoundaryExtractor {
    /// Creates an extractor from the boundary section of the configuration.
    pub fn new(config: &BoundaryConfig) -> Self {
        Self {
            threshold: config.threshold,
            kernel: config.kernel,
            mode: config.mode,
        }
    }

    /// Maps samples above the threshold to 1.0 and everything else to 0.0.
    pub fn binarize(&self, field: &ScalarField) -> Array2<f64> {
        field.mapv(|v| if v > self.threshold { 1.0 } else { 0.0 })
    }

    /// Laplacian response of a binarized field.
    pub fn response(&self, binary: &Array2<f64>) -> Array2<f64> {
        correlate3(binary, &self.kernel, self.mode)
    }

    /// Computes the boundary mask of `field`.
    ///
    /// Total over its input: a field that is uniformly inside or outside
    /// yields an empty mask, which the tracer rejects when looking for a seed.
    ///
    /// # Example
    ///
    /// ```rust
    /// use config::settings::BoundaryConfig;
    /// use snowflake_mesh::boundary::BoundaryExtractor;
    /// use snowflake_mesh::field::ScalarField;
    ///
    /// let field = ScalarField::zeros((8, 8));
    /// let mask = BoundaryExtractor::new(&BoundaryConfig::default()).extract(&field);
    /// assert!(!mask.iter().any(|&on| on));
    /// ```
    #[instrument(skip_all, fields(rows = field.nrows(), cols = field.ncols()))]
    pub fn extract(&self, field: &ScalarField) -> BoundaryMask {
        let binary = self.binarize(field);
        let inside = binary.iter().filter(|&&v| v > 0.0).count();
        debug!(inside, threshold = self.threshold, "Binarized field");

        let mask = self.response(&binary).mapv(|r| r > 0.0);
        info!(
            boundary_cells = boundary_cell_count(&mask),
            rows = mask.nrows(),
            cols = mask.ncols(),
            mode = ?self.mode,
            "Extracted boundary mask"
        );
        mask
    }
}

/// Correlates `input` with a 3×3 kernel.
///
/// Cells outside the input read as zero. In [`ConvolutionMode::Same`] the
/// output has the input's extent and cell (r, c) is centred on input (r, c);
/// in [`ConvolutionMode::Full`] the output grows by two in each dimension and
/// cell (r, c) is centred on input (r - 1, c - 1). For point-symmetric kernels
/// such as the Laplacians in `config::constants` this equals convolution.
pub fn correlate3(input: &Array2<f64>, kernel: &[[f64; 3]; 3], mode: ConvolutionMode) -> Array2<f64> {
    let (rows, cols) = input.dim();
    let (pad, out_rows, out_cols) = match mode {
        ConvolutionMode::Same => (1usize, rows, cols),
        ConvolutionMode::Full => (2usize, rows + 2, cols + 2),
    };
    if rows == 0 || cols == 0 {
        return Array2::zeros((out_rows, out_cols));
    }

    Array2::from_shape_fn((out_rows, out_cols), |(r, c)| {
        let mut sum = 0.0;
        for (a, kernel_row) in kernel.iter().enumerate() {
            // Source row is r + a - pad; skip rows above or below the input
            let Some(src_r) = (r + a).checked_sub(pad) else {
                continue;
            };
            if src_r >= rows {
                continue;
            }
            for (b, &weight) in kernel_row.iter().enumerate() {
                if weight == 0.0 {
                    continue;
                }
                let Some(src_c) = (c + b).checked_sub(pad) else {
                    continue;
                };
                if src_c < cols {
                    sum += weight * input[[src_r, src_c]];
                }
            }
        }
        sum
    })
}

#[cfg(test)]
mod tests;
