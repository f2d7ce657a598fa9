//! # Boundary Extraction Tests

use super::*;
use crate::field::find_seed;
use glam::IVec2;

/// 7×7 field with a 3×3 block of value 2.0 at rows/cols 2..=4.
fn block_field() -> ScalarField {
    ScalarField::from_shape_fn((7, 7), |(r, c)| {
        if (2..=4).contains(&r) && (2..=4).contains(&c) {
            2.0
        } else {
            0.0
        }
    })
}

#[test]
fn test_binarize_is_strict() {
    let extractor = BoundaryExtractor::new(&BoundaryConfig::default());
    let field = ScalarField::from_shape_vec((1, 3), vec![0.5, 1.0, 1.5]).unwrap();
    let binary = extractor.binarize(&field);
    assert_eq!(binary.as_slice().unwrap(), &[0.0, 0.0, 1.0]);
}

#[test]
fn test_block_boundary_marks_outside_neighbours_only() {
    let extractor = BoundaryExtractor::new(&BoundaryConfig::default());
    let mask = extractor.extract(&block_field());
    assert_eq!(mask.dim(), (7, 7));

    // Interior and inside-edge cells are never marked
    assert!(!mask[[3, 3]]);
    assert!(!mask[[2, 2]]);
    assert!(!mask[[4, 4]]);

    // Outside cells adjacent under the hexagonal stencil
    assert!(mask[[1, 1]]);
    assert!(mask[[1, 2]]);
    assert!(mask[[1, 4]]);
    assert!(mask[[5, 5]]);
    assert!(mask[[3, 1]]);
    assert!(mask[[3, 5]]);

    // Corners not on the stencil and far cells stay clear
    assert!(!mask[[1, 5]]);
    assert!(!mask[[5, 1]]);
    assert!(!mask[[0, 0]]);
}

#[test]
fn test_block_seed_is_top_left_boundary_cell() {
    let extractor = BoundaryExtractor::new(&BoundaryConfig::default());
    let mask = extractor.extract(&block_field());
    assert_eq!(find_seed(&mask), Some(IVec2::new(1, 1)));
}

#[test]
fn test_uniform_fields_have_empty_boundary() {
    let extractor = BoundaryExtractor::new(&BoundaryConfig::default());
    for value in [0.0, 5.0] {
        let field = ScalarField::from_elem((6, 6), value);
        let mask = extractor.extract(&field);
        assert!(mask.iter().all(|&on| !on), "value {value} produced a boundary");
    }
}

#[test]
fn test_full_mode_shifts_by_kernel_radius() {
    let same = BoundaryExtractor::new(&BoundaryConfig::default()).extract(&block_field());
    let full = BoundaryExtractor::new(&BoundaryConfig {
        mode: ConvolutionMode::Full,
        ..Default::default()
    })
    .extract(&block_field());

    assert_eq!(full.dim(), (9, 9));
    for ((r, c), &on) in same.indexed_iter() {
        assert_eq!(full[[r + 1, c + 1]], on, "mismatch at ({r}, {c})");
    }
    for i in 0..9 {
        assert!(!full[[0, i]] && !full[[8, i]] && !full[[i, 0]] && !full[[i, 8]]);
    }
}

#[test]
fn test_correlate3_sums_kernel_weights() {
    let input = Array2::from_elem((3, 3), 1.0);
    let kernel = [[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]];
    let out = correlate3(&input, &kernel, ConvolutionMode::Same);
    assert_eq!(out[[1, 1]], 45.0);
    // Top-left corner only sees the lower-right 2×2 of the kernel
    assert_eq!(out[[0, 0]], 5.0 + 6.0 + 8.0 + 9.0);
}

#[test]
fn test_correlate3_empty_input() {
    let input = Array2::<f64>::zeros((0, 0));
    assert_eq!(correlate3(&input, &[[0.0; 3]; 3], ConvolutionMode::Same).dim(), (0, 0));
    assert_eq!(correlate3(&input, &[[0.0; 3]; 3], ConvolutionMode::Full).dim(), (2, 2));
}
