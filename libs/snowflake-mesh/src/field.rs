//! # Lattice Fields
//!
//! Scalar input samples and the boolean boundary mask derived from them.
//! Both are row-major `ndarray` grids indexed by (row, column); a lattice
//! vertex `IVec2 { x: row, y: column }` addresses one cell.

use glam::IVec2;
use ndarray::Array2;

use crate::error::{MeshError, MeshResult};

/// 2D grid of intensity samples. Grid index is the coordinate.
pub type ScalarField = Array2<f64>;

/// 2D grid marking cells on the level-set edge of the field.
pub type BoundaryMask = Array2<bool>;

/// Builds a field from equally long rows.
///
/// # Example
///
/// ```rust
/// use snowflake_mesh::field::field_from_rows;
///
/// let field = field_from_rows(vec![vec![0.0, 2.0], vec![2.0, 2.0]]).unwrap();
/// assert_eq!(field.dim(), (2, 2));
/// ```
pub fn field_from_rows(rows: Vec<Vec<f64>>) -> MeshResult<ScalarField> {
    let height = rows.len();
    let width = rows.first().map_or(0, Vec::len);
    if let Some(bad) = rows.iter().position(|row| row.len() != width) {
        return Err(MeshError::invalid_input(format!(
            "field row {bad} has {} samples, expected {width}",
            rows[bad].len()
        )));
    }
    let data: Vec<f64> = rows.into_iter().flatten().collect();
    Array2::from_shape_vec((height, width), data)
        .map_err(|e| MeshError::invalid_input(format!("field shape: {e}")))
}

/// Returns true if `cell` lies inside the mask and is marked.
///
/// Cells outside the grid read as false so neighbourhoods may overhang the
/// border.
#[inline]
pub fn is_boundary(mask: &BoundaryMask, cell: IVec2) -> bool {
    if cell.x < 0 || cell.y < 0 {
        return false;
    }
    mask.get((cell.x as usize, cell.y as usize))
        .copied()
        .unwrap_or(false)
}

/// First marked cell in row-major scan order.
pub fn find_seed(mask: &BoundaryMask) -> Option<IVec2> {
    mask.indexed_iter()
        .find(|(_, on)| **on)
        .map(|((row, col), _)| IVec2::new(row as i32, col as i32))
}

/// Number of marked cells.
pub fn boundary_cell_count(mask: &BoundaryMask) -> usize {
    mask.iter().filter(|&&on| on).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_field_from_rows_rejects_ragged() {
        let result = field_from_rows(vec![vec![1.0, 2.0], vec![3.0]]);
        assert!(matches!(result, Err(MeshError::InvalidInput { .. })));
    }

    #[test]
    fn test_find_seed_is_row_major() {
        let mask = array![
            [false, false, false],
            [false, false, true],
            [true, false, false],
        ];
        assert_eq!(find_seed(&mask), Some(IVec2::new(1, 2)));
    }

    #[test]
    fn test_find_seed_empty() {
        let mask = BoundaryMask::from_elem((4, 4), false);
        assert_eq!(find_seed(&mask), None);
    }

    #[test]
    fn test_is_boundary_out_of_range_is_false() {
        let mask = BoundaryMask::from_elem((2, 2), true);
        assert!(is_boundary(&mask, IVec2::new(1, 1)));
        assert!(!is_boundary(&mask, IVec2::new(-1, 0)));
        assert!(!is_boundary(&mask, IVec2::new(0, 2)));
    }

    #[test]
    fn test_boundary_cell_count() {
        let mask = array![[true, false], [true, true]];
        assert_eq!(boundary_cell_count(&mask), 3);
    }
}
