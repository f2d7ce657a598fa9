//! Neighbour masks bounding a single tracing step.

use config::settings::MaskShape;
use glam::IVec2;

use crate::error::{MeshError, MeshResult};

/// Set of displacements a tracing step may take, in row-major mask order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceMask {
    radius: i32,
    offsets: Vec<IVec2>,
}

impl TraceMask {
    /// Builds a mask from rows of 0/1 flags.
    ///
    /// The mask must be an odd square with the centre excluded.
    ///
    /// # Example
    ///
    /// ```rust
    /// use snowflake_mesh::trace::TraceMask;
    ///
    /// let mask = TraceMask::from_rows(&[vec![0, 1, 0], vec![1, 0, 1], vec![0, 1, 0]]).unwrap();
    /// assert_eq!(mask.radius(), 1);
    /// assert_eq!(mask.offsets().len(), 4);
    /// ```
    pub fn from_rows(rows: &[Vec<u8>]) -> MeshResult<Self> {
        let size = rows.len();
        if size < 3 || size % 2 == 0 || rows.iter().any(|row| row.len() != size) {
            return Err(MeshError::invalid_input(format!(
                "trace mask must be an odd square of side >= 3, got {size} rows"
            )));
        }
        let radius = (size / 2) as i32;

        let offsets: Vec<IVec2> = rows
            .iter()
            .enumerate()
            .flat_map(|(r, row)| {
                row.iter()
                    .enumerate()
                    .filter(|(_, flag)| **flag != 0)
                    .map(move |(c, _)| IVec2::new(r as i32 - radius, c as i32 - radius))
            })
            .collect();

        if offsets.contains(&IVec2::ZERO) {
            return Err(MeshError::invalid_input(
                "trace mask must exclude its centre",
            ));
        }
        if offsets.is_empty() {
            return Err(MeshError::invalid_input("trace mask allows no displacement"));
        }

        Ok(Self { radius, offsets })
    }

    /// Builds the mask named by the configuration.
    pub fn from_shape(shape: &MaskShape) -> MeshResult<Self> {
        Self::from_rows(&shape.rows())
    }

    /// Half the side length of the mask.
    pub fn radius(&self) -> i32 {
        self.radius
    }

    /// Allowed displacements, row-major.
    pub fn offsets(&self) -> &[IVec2] {
        &self.offsets
    }
}
