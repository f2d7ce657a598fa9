//! # Tests for Symmetry Expansion

use super::*;
use crate::trace::Termination;
use approx::assert_relative_eq;

fn ring_config() -> SymmetryConfig {
    SymmetryConfig {
        dendrites: 4,
        stride: 1,
        trim_end: 0,
        shear_angle_deg: None,
        center: [6.0, 6.0],
        ..SymmetryConfig::default()
    }
}

fn ring_arm() -> Arm {
    Arm::new(
        vec![IVec2::new(2, 2), IVec2::new(2, 4), IVec2::new(2, 6)],
        Termination::BudgetExhausted,
    )
}

// =============================================================================
// LOBE TESTS
// =============================================================================

#[test]
fn test_mirror_is_an_involution() {
    let arm = vec![IVec2::new(1, 7), IVec2::new(3, 8), IVec2::new(4, 10), IVec2::new(6, 9)];
    assert_eq!(mirror_arm(&mirror_arm(&arm)), arm);
}

#[test]
fn test_mirror_reverses_and_swaps() {
    let arm = vec![IVec2::new(1, 2), IVec2::new(3, 4)];
    assert_eq!(mirror_arm(&arm), vec![IVec2::new(4, 3), IVec2::new(2, 1)]);
}

#[test]
fn test_lobe_puts_mirror_first() {
    let arm = vec![IVec2::new(1, 2), IVec2::new(3, 4)];
    assert_eq!(
        build_lobe(&arm),
        vec![
            IVec2::new(4, 3),
            IVec2::new(2, 1),
            IVec2::new(1, 2),
            IVec2::new(3, 4),
        ]
    );
}

#[test]
fn test_subsample_without_trim_keeps_everything() {
    assert_eq!(subsample(&[1, 2, 3], 1, 0), vec![1, 2, 3]);
}

#[test]
fn test_subsample_keeps_first_vertex() {
    assert_eq!(subsample(&[1, 2, 3], 10, 0), vec![1]);
    assert!(subsample(&[1, 2, 3], 2, 3).is_empty());
}

#[test]
fn test_shear_correct_identity_without_angle() {
    let out = shear_correct(&[IVec2::new(7, 3)], DVec2::new(5.0, 5.0), None);
    assert_eq!(out, vec![DVec2::new(2.0, -2.0)]);
}

#[test]
fn test_shear_correct_undoes_sixty_degree_shear() {
    let out = shear_correct(&[IVec2::new(2, 4)], DVec2::ZERO, Some(60.0));
    assert_relative_eq!(out[0].x, 0.0, epsilon = 1e-12);
    assert_relative_eq!(out[0].y, 4.0, epsilon = 1e-12);

    // Shearing the corrected point reproduces the lattice coordinate
    let back = shear_matrix(60.0) * out[0];
    assert_relative_eq!(back.x, 2.0, epsilon = 1e-12);
    assert_relative_eq!(back.y, 4.0, epsilon = 1e-12);
}

#[test]
fn test_replicate_rotates_clockwise() {
    let out = replicate(&[DVec2::new(1.0, 0.0)], 4);
    assert_eq!(out.len(), 4);
    assert_relative_eq!(out[1].x, 0.0, epsilon = 1e-12);
    assert_relative_eq!(out[1].y, -1.0, epsilon = 1e-12);
    assert_relative_eq!(out[2].x, -1.0, epsilon = 1e-12);
}

// =============================================================================
// DEDUPLICATION TESTS
// =============================================================================

#[test]
fn test_dedupe_keeps_first_occurrence_in_order() {
    let vertices = vec![
        DVec2::new(1.0, 0.0),
        DVec2::new(2.0, 0.0),
        DVec2::new(1.0, 0.0),
        DVec2::new(3.0, 0.0),
    ];
    assert_eq!(
        dedupe(&vertices, None),
        vec![DVec2::new(1.0, 0.0), DVec2::new(2.0, 0.0), DVec2::new(3.0, 0.0)]
    );
}

#[test]
fn test_dedupe_is_idempotent() {
    let lobe = vec![DVec2::new(3.0, 1.0), DVec2::new(2.0, 2.0), DVec2::new(1.0, 3.0)];
    let once = dedupe(&replicate(&lobe, 5), Some(1e-6));
    let twice = dedupe(&once, Some(1e-6));
    assert_eq!(once, twice);
}

#[test]
fn test_dedupe_signed_zero_is_one_point() {
    let vertices = vec![DVec2::new(0.0, 1.0), DVec2::new(-0.0, 1.0)];
    assert_eq!(dedupe(&vertices, None).len(), 1);
}

#[test]
fn test_six_fold_seam_vertices_merge() {
    let tip = DVec2::new(10.0, 0.0);
    let lobe = vec![
        tip,
        DVec2::new(9.0, -4.0),
        DMat2::from_angle(-TAU / 6.0) * tip,
    ];
    let replicated = replicate(&lobe, 6);
    assert_eq!(replicated.len(), 18);

    // Each lobe's last vertex coincides with the next lobe's first
    let outline = dedupe(&replicated, Some(1e-6));
    assert_eq!(outline.len(), 6 * (3 - 1));
}

#[test]
fn test_quantized_merge_where_exact_does_not() {
    let lobe = SymmetryExpander::new(&ring_config()).lobe(&ring_arm());
    let replicated = replicate(&lobe, 4);
    assert_eq!(dedupe(&replicated, Some(1e-6)).len(), 16);
    assert!(dedupe(&replicated, None).len() > 16);
}

// =============================================================================
// EXPANDER TESTS
// =============================================================================

#[test]
fn test_expand_square_ring_arm() {
    let outline = SymmetryExpander::new(&ring_config())
        .expand(&ring_arm())
        .unwrap();

    assert_eq!(outline.len(), 16);
    assert_eq!(outline.vertices()[0], DVec2::new(0.0, -4.0));
    assert_relative_eq!(outline.signed_area(), -64.0, epsilon = 1e-9);
    assert!(!outline.is_ccw());
}

#[test]
fn test_expand_single_dendrite_keeps_lobe() {
    let config = SymmetryConfig {
        dendrites: 1,
        ..ring_config()
    };
    let outline = SymmetryExpander::new(&config).expand(&ring_arm()).unwrap();
    // Mirrored seed coincides with the seed
    assert_eq!(outline.len(), 5);
}

#[test]
fn test_expand_collapsed_arm_is_degenerate() {
    let arm = Arm::new(vec![IVec2::new(6, 6)], Termination::BudgetExhausted);
    let result = SymmetryExpander::new(&ring_config()).expand(&arm);
    assert!(matches!(result, Err(MeshError::DegeneratePolygon { .. })));
}

#[test]
fn test_expand_empty_arm_is_rejected() {
    let arm = Arm::new(Vec::new(), Termination::BudgetExhausted);
    let result = SymmetryExpander::new(&ring_config()).expand(&arm);
    assert!(matches!(result, Err(MeshError::InvalidInput { .. })));
}

#[test]
fn test_expand_nan_center_is_rejected() {
    let config = SymmetryConfig {
        center: [f64::NAN, 6.0],
        ..ring_config()
    };
    let result = SymmetryExpander::new(&config).expand(&ring_arm());
    assert!(matches!(result, Err(MeshError::InvalidInput { .. })));
}

#[test]
fn test_expand_infinite_shear_is_rejected() {
    let config = SymmetryConfig {
        shear_angle_deg: Some(f64::INFINITY),
        ..ring_config()
    };
    let result = SymmetryExpander::new(&config).expand(&ring_arm());
    assert!(matches!(result, Err(MeshError::InvalidInput { .. })));
}

#[test]
fn test_outline_area_orientation() {
    let ccw = Outline::new(vec![
        DVec2::new(0.0, 0.0),
        DVec2::new(1.0, 0.0),
        DVec2::new(0.0, 1.0),
    ]);
    assert_relative_eq!(ccw.signed_area(), 0.5);
    assert!(ccw.is_ccw());
}
