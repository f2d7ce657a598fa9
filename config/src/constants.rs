//! # Configuration Constants
//!
//! Centralized constants for the snowflake pipeline. Thresholds, kernels,
//! tracing masks, symmetry parameters and extrusion defaults are defined here
//! so that the library crates never carry bare literals.
//!
//! ## Categories
//!
//! - **Precision**: Floating-point comparison tolerances
//! - **Boundary**: Binarization threshold and Laplacian kernels
//! - **Tracing**: Neighbor masks, step budget, initial tangent
//! - **Symmetry**: Dendrite count, subsampling, shear and rotation centre
//! - **Triangulation**: Quality refinement limits
//! - **Extrusion**: Thickness, bevel and noise defaults

// =============================================================================
// PRECISION CONSTANTS
// =============================================================================

/// Epsilon for floating-point comparisons.
///
/// # Example
///
/// ```rust
/// use config::constants::EPSILON;
///
/// fn approximately_equal(a: f64, b: f64) -> bool {
///     (a - b).abs() < EPSILON
/// }
///
/// assert!(approximately_equal(1.0, 1.0 + 1e-11));
/// ```
pub const EPSILON: f64 = 1e-10;

/// Grid size used to quantize outline coordinates before deduplication.
///
/// Rotating a lobe by `2π/n` introduces rounding noise of order 1e-13 for
/// the coordinate ranges of a 1000×1000 raster, far below this quantum.
///
/// Keys come from rounding, so two copies of a point that land on either side
/// of a half-quantum boundary still get different keys. Lattice-derived
/// vertices sit far from those boundaries at this quantum.
///
/// # Example
///
/// ```rust
/// use config::constants::DEDUP_QUANTUM;
///
/// let key = |v: f64| (v / DEDUP_QUANTUM).round() as i64;
/// assert_eq!(key(-4.0), key(-4.0 + 2.4e-16));
/// ```
pub const DEDUP_QUANTUM: f64 = 1e-6;

/// Smallest triangle area accepted by mesh validation.
pub const MIN_TRIANGLE_AREA: f64 = 1e-12;

// =============================================================================
// BOUNDARY CONSTANTS
// =============================================================================

/// Field samples strictly above this value are inside the shape.
pub const BINARIZE_THRESHOLD: f64 = 1.0;

/// Six-neighbour Laplacian matching a hexagonal lattice stored as a sheared
/// square grid. Centre strongly negative, sums to zero.
///
/// # Example
///
/// ```rust
/// use config::constants::HEX_LAPLACIAN;
///
/// let sum: f64 = HEX_LAPLACIAN.iter().flatten().sum();
/// assert_eq!(sum, 0.0);
/// ```
pub const HEX_LAPLACIAN: [[f64; 3]; 3] = [
    [1.0, 1.0, 0.0],
    [1.0, -6.0, 1.0],
    [0.0, 1.0, 1.0],
];

/// Classic four-neighbour Laplacian for orthogonal lattices.
pub const GRID_LAPLACIAN: [[f64; 3]; 3] = [
    [0.0, 1.0, 0.0],
    [1.0, -4.0, 1.0],
    [0.0, 1.0, 0.0],
];

// =============================================================================
// TRACING CONSTANTS
// =============================================================================

/// 5×5 neighbour mask used for fine tracing.
///
/// The centre and its immediate orthogonal neighbours are excluded so every
/// step moves between √2 and √5 lattice units.
pub const SMALL_TRACE_MASK: [[u8; 5]; 5] = [
    [0, 1, 1, 1, 0],
    [1, 1, 0, 1, 1],
    [1, 0, 0, 0, 1],
    [1, 1, 0, 1, 1],
    [0, 1, 1, 1, 0],
];

/// 9×9 ring mask used for coarse tracing over noisy boundaries.
pub const LARGE_TRACE_MASK: [[u8; 9]; 9] = [
    [0, 0, 1, 1, 1, 1, 1, 0, 0],
    [0, 1, 1, 0, 0, 0, 1, 1, 0],
    [1, 1, 0, 0, 0, 0, 0, 1, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 1, 0, 0, 0, 0, 0, 1, 1],
    [0, 1, 1, 0, 0, 0, 1, 1, 0],
    [0, 0, 1, 1, 1, 1, 1, 0, 0],
];

/// Number of tracing steps for one arm of the reference snowflake raster.
pub const DEFAULT_TRACE_STEPS: usize = 184;

/// Walking direction assumed at the seed, as (row, column).
pub const DEFAULT_INITIAL_TANGENT: [i32; 2] = [-1, 1];

// =============================================================================
// SYMMETRY CONSTANTS
// =============================================================================

/// Rotational symmetry order of an ice crystal.
pub const DEFAULT_DENDRITES: u32 = 6;

/// Keep every n-th vertex of the mirrored lobe.
pub const DEFAULT_SUBSAMPLE_STRIDE: usize = 2;

/// Vertices dropped from the end of the mirrored lobe before subsampling.
pub const DEFAULT_SUBSAMPLE_TRIM: usize = 5;

/// Angle in degrees between the axes of the sheared sampling lattice.
pub const DEFAULT_SHEAR_ANGLE_DEG: f64 = 60.0;

/// Rotation centre of the reference raster, as (row, column).
pub const DEFAULT_CENTER: [f64; 2] = [500.0, 500.0];

// =============================================================================
// TRIANGULATION CONSTANTS
// =============================================================================

/// Minimum interior angle requested from quality refinement, in degrees.
pub const DEFAULT_MIN_ANGLE_DEG: f64 = 20.0;

/// Largest minimum angle refinement is still guaranteed to terminate for.
pub const MAX_MIN_ANGLE_DEG: f64 = 34.0;

/// Upper bound on Steiner points inserted by quality refinement.
pub const DEFAULT_MAX_STEINER_POINTS: usize = 10_000;

// =============================================================================
// EXTRUSION CONSTANTS
// =============================================================================

/// Distance from the mid plane to the front and back faces.
pub const DEFAULT_HALF_THICKNESS: f64 = 10.0;

/// Planar scale applied to front and back rings.
pub const DEFAULT_SHRINK: f64 = 0.7;

/// Seed of the surface noise generator.
pub const DEFAULT_NOISE_SEED: u64 = 12;

/// Standard deviation of the per-vertex surface noise.
pub const DEFAULT_NOISE_SCALE: f64 = 1.0;

// =============================================================================
// LIMITS
// =============================================================================

/// Largest supported dendrite count.
pub const MAX_DENDRITES: u32 = 64;

/// Maximum vertices in an emitted mesh.
pub const MAX_VERTICES: usize = 10_000_000;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Checks if two f64 values are approximately equal within EPSILON.
///
/// # Example
///
/// ```rust
/// use config::constants::approx_equal;
///
/// assert!(approx_equal(1.0, 1.0 + 1e-11));
/// assert!(!approx_equal(1.0, 1.1));
/// ```
#[inline]
pub fn approx_equal(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

/// Checks if a f64 value is approximately zero within EPSILON.
///
/// # Example
///
/// ```rust
/// use config::constants::approx_zero;
///
/// assert!(approx_zero(1e-11));
/// assert!(!approx_zero(0.1));
/// ```
#[inline]
pub fn approx_zero(value: f64) -> bool {
    value.abs() < EPSILON
}
