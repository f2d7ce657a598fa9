//! Runtime configuration for the snowflake pipeline.
//!
//! Every stage reads its parameters from one section of [`SnowflakeConfig`].
//! Defaults mirror the constants in [`crate::constants`], and every section
//! deserializes with `#[serde(default)]` so a JSON file only needs to name the
//! values it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    BINARIZE_THRESHOLD, DEDUP_QUANTUM, DEFAULT_CENTER, DEFAULT_DENDRITES, DEFAULT_HALF_THICKNESS,
    DEFAULT_INITIAL_TANGENT, DEFAULT_MAX_STEINER_POINTS, DEFAULT_MIN_ANGLE_DEG,
    DEFAULT_NOISE_SCALE, DEFAULT_NOISE_SEED, DEFAULT_SHEAR_ANGLE_DEG, DEFAULT_SHRINK,
    DEFAULT_SUBSAMPLE_STRIDE, DEFAULT_SUBSAMPLE_TRIM, DEFAULT_TRACE_STEPS, HEX_LAPLACIAN,
    LARGE_TRACE_MASK, MAX_DENDRITES, MAX_MIN_ANGLE_DEG, SMALL_TRACE_MASK,
};

/// Error returned when invalid configuration values are provided.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A numeric parameter is outside its accepted range.
    #[error("invalid {field}: {reason}")]
    OutOfRange { field: &'static str, reason: String },

    /// The tracing mask is not an odd square with an empty centre.
    #[error("invalid trace mask: {0}")]
    InvalidMask(String),

    /// The configuration file could not be read or written.
    #[error("failed to access config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON for [`SnowflakeConfig`].
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ConfigError {
    fn out_of_range(field: &'static str, reason: impl Into<String>) -> Self {
        Self::OutOfRange {
            field,
            reason: reason.into(),
        }
    }
}

/// How the Laplacian response is padded relative to the input field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConvolutionMode {
    /// Output has the input's extent; cell (r, c) is centred on input (r, c).
    #[default]
    Same,
    /// Output grows by the kernel radius on every side, shifting indices.
    Full,
}

/// Neighbour mask used by the contour tracer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaskShape {
    /// 5×5 mask, steps of one to two cells.
    #[default]
    Small,
    /// 9×9 ring, steps of three to four cells.
    Large,
    /// Caller supplied rows of 0/1 flags.
    Custom(Vec<Vec<u8>>),
}

impl MaskShape {
    /// Returns the mask as rows of 0/1 flags.
    ///
    /// # Examples
    /// ```
    /// use config::settings::MaskShape;
    /// assert_eq!(MaskShape::Small.rows().len(), 5);
    /// assert_eq!(MaskShape::Large.rows().len(), 9);
    /// ```
    pub fn rows(&self) -> Vec<Vec<u8>> {
        match self {
            MaskShape::Small => SMALL_TRACE_MASK.iter().map(|r| r.to_vec()).collect(),
            MaskShape::Large => LARGE_TRACE_MASK.iter().map(|r| r.to_vec()).collect(),
            MaskShape::Custom(rows) => rows.clone(),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let rows = self.rows();
        let size = rows.len();
        if size < 3 || size % 2 == 0 {
            return Err(ConfigError::InvalidMask(format!(
                "size must be odd and at least 3, got {size}"
            )));
        }
        if let Some(bad) = rows.iter().position(|row| row.len() != size) {
            return Err(ConfigError::InvalidMask(format!(
                "row {bad} has {} entries, expected {size}",
                rows[bad].len()
            )));
        }
        if rows[size / 2][size / 2] != 0 {
            return Err(ConfigError::InvalidMask(
                "centre cell must be excluded".to_string(),
            ));
        }
        if !rows.iter().flatten().any(|&flag| flag != 0) {
            return Err(ConfigError::InvalidMask(
                "mask allows no displacement".to_string(),
            ));
        }
        Ok(())
    }
}

/// Boundary extraction parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundaryConfig {
    /// Samples strictly above this value count as inside.
    pub threshold: f64,
    /// 3×3 Laplacian kernel applied to the binarized field.
    pub kernel: [[f64; 3]; 3],
    /// Padding mode of the convolution.
    pub mode: ConvolutionMode,
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self {
            threshold: BINARIZE_THRESHOLD,
            kernel: HEX_LAPLACIAN,
            mode: ConvolutionMode::Same,
        }
    }
}

/// Contour tracing parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceConfig {
    /// Neighbour mask bounding each step.
    pub mask: MaskShape,
    /// Step budget for one arm.
    pub steps: usize,
    /// Tangent assumed at the seed, as (row, column).
    pub initial_tangent: [i32; 2],
    /// Stop early once the walk returns within this distance of the seed.
    pub closure_radius: Option<f64>,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            mask: MaskShape::Small,
            steps: DEFAULT_TRACE_STEPS,
            initial_tangent: DEFAULT_INITIAL_TANGENT,
            closure_radius: None,
        }
    }
}

/// Symmetry expansion parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SymmetryConfig {
    /// Order of the rotational symmetry.
    pub dendrites: u32,
    /// Keep every `stride`-th lobe vertex.
    pub stride: usize,
    /// Lobe vertices dropped from the end before subsampling.
    pub trim_end: usize,
    /// Lattice shear angle in degrees; `None` for an orthogonal lattice.
    pub shear_angle_deg: Option<f64>,
    /// Rotation centre in lattice coordinates, as (row, column).
    pub center: [f64; 2],
    /// Quantization grid for deduplication; `None` compares exact bits.
    pub dedup_quantum: Option<f64>,
}

impl Default for SymmetryConfig {
    fn default() -> Self {
        Self {
            dendrites: DEFAULT_DENDRITES,
            stride: DEFAULT_SUBSAMPLE_STRIDE,
            trim_end: DEFAULT_SUBSAMPLE_TRIM,
            shear_angle_deg: Some(DEFAULT_SHEAR_ANGLE_DEG),
            center: DEFAULT_CENTER,
            dedup_quantum: Some(DEDUP_QUANTUM),
        }
    }
}

/// Constrained triangulation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriangulationConfig {
    /// Refine the interior until every angle meets `min_angle_deg`.
    pub quality: bool,
    /// Minimum interior angle in degrees for quality refinement.
    pub min_angle_deg: f64,
    /// Cap on Steiner points inserted by refinement.
    pub max_steiner_points: usize,
    /// Reject self-intersecting outlines before triangulating.
    pub validate_simple: bool,
}

impl Default for TriangulationConfig {
    fn default() -> Self {
        Self {
            quality: true,
            min_angle_deg: DEFAULT_MIN_ANGLE_DEG,
            max_steiner_points: DEFAULT_MAX_STEINER_POINTS,
            validate_simple: true,
        }
    }
}

/// Seeded Gaussian jitter of the front/back surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    /// Generator seed.
    pub seed: u64,
    /// Standard deviation of the z offsets.
    pub scale: f64,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_NOISE_SEED,
            scale: DEFAULT_NOISE_SCALE,
        }
    }
}

/// Prism extrusion parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtrusionConfig {
    /// Distance of the front (+z) and back (-z) faces from the mid plane.
    pub half_thickness: f64,
    /// Planar scale of the front and back rings.
    pub shrink: f64,
    /// Surface jitter; `None` keeps both faces flat.
    pub noise: Option<NoiseConfig>,
    /// Add a full-scale outline ring at z = 0 between front and back.
    pub middle_ring: bool,
}

impl Default for ExtrusionConfig {
    fn default() -> Self {
        Self {
            half_thickness: DEFAULT_HALF_THICKNESS,
            shrink: DEFAULT_SHRINK,
            noise: Some(NoiseConfig::default()),
            middle_ring: true,
        }
    }
}

/// Complete pipeline configuration.
///
/// # Examples
/// ```
/// use config::settings::SnowflakeConfig;
/// let config = SnowflakeConfig::default();
/// assert!(config.validate().is_ok());
/// assert_eq!(config.symmetry.dendrites, 6);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SnowflakeConfig {
    pub boundary: BoundaryConfig,
    pub trace: TraceConfig,
    pub symmetry: SymmetryConfig,
    pub triangulation: TriangulationConfig,
    pub extrusion: ExtrusionConfig,
}

impl SnowflakeConfig {
    /// Parses a configuration from JSON and validates it.
    ///
    /// # Examples
    /// ```
    /// use config::settings::SnowflakeConfig;
    /// let cfg = SnowflakeConfig::from_json(r#"{"symmetry": {"dendrites": 4}}"#).unwrap();
    /// assert_eq!(cfg.symmetry.dendrites, 4);
    /// assert_eq!(cfg.trace.steps, 184);
    /// ```
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a JSON configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Serializes the configuration as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks every section for out-of-range values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let boundary = &self.boundary;
        if !boundary.threshold.is_finite() {
            return Err(ConfigError::out_of_range(
                "boundary.threshold",
                format!("must be finite, got {}", boundary.threshold),
            ));
        }
        if !boundary.kernel.iter().flatten().all(|w| w.is_finite()) {
            return Err(ConfigError::out_of_range(
                "boundary.kernel",
                "weights must be finite",
            ));
        }

        let trace = &self.trace;
        trace.mask.validate()?;
        if trace.steps == 0 {
            return Err(ConfigError::out_of_range("trace.steps", "must be positive"));
        }
        if let Some(radius) = trace.closure_radius {
            if !(radius.is_finite() && radius > 0.0) {
                return Err(ConfigError::out_of_range(
                    "trace.closure_radius",
                    format!("must be positive, got {radius}"),
                ));
            }
        }

        let symmetry = &self.symmetry;
        if symmetry.dendrites == 0 || symmetry.dendrites > MAX_DENDRITES {
            return Err(ConfigError::out_of_range(
                "symmetry.dendrites",
                format!("must be in 1..={MAX_DENDRITES}, got {}", symmetry.dendrites),
            ));
        }
        if symmetry.stride == 0 {
            return Err(ConfigError::out_of_range("symmetry.stride", "must be positive"));
        }
        if let Some(angle) = symmetry.shear_angle_deg {
            if !angle.is_finite() {
                return Err(ConfigError::out_of_range(
                    "symmetry.shear_angle_deg",
                    "must be finite",
                ));
            }
        }
        if !symmetry.center.iter().all(|c| c.is_finite()) {
            return Err(ConfigError::out_of_range("symmetry.center", "must be finite"));
        }
        if let Some(quantum) = symmetry.dedup_quantum {
            if !(quantum.is_finite() && quantum > 0.0) {
                return Err(ConfigError::out_of_range(
                    "symmetry.dedup_quantum",
                    format!("must be positive, got {quantum}"),
                ));
            }
        }

        let triangulation = &self.triangulation;
        if !(0.0..=MAX_MIN_ANGLE_DEG).contains(&triangulation.min_angle_deg) {
            return Err(ConfigError::out_of_range(
                "triangulation.min_angle_deg",
                format!(
                    "must be in [0, {MAX_MIN_ANGLE_DEG}], got {}",
                    triangulation.min_angle_deg
                ),
            ));
        }

        let extrusion = &self.extrusion;
        if !(extrusion.half_thickness.is_finite() && extrusion.half_thickness > 0.0) {
            return Err(ConfigError::out_of_range(
                "extrusion.half_thickness",
                format!("must be positive, got {}", extrusion.half_thickness),
            ));
        }
        if !(extrusion.shrink.is_finite() && extrusion.shrink > 0.0) {
            return Err(ConfigError::out_of_range(
                "extrusion.shrink",
                format!("must be positive, got {}", extrusion.shrink),
            ));
        }
        if let Some(noise) = extrusion.noise {
            if !(noise.scale.is_finite() && noise.scale >= 0.0) {
                return Err(ConfigError::out_of_range(
                    "extrusion.noise.scale",
                    format!("must be non-negative, got {}", noise.scale),
                ));
            }
        }

        Ok(())
    }
}
