//! # Mesh Errors
//!
//! Error types for every pipeline stage. Each variant names the stage that
//! failed and carries the offending coordinates or indices when available.

use std::path::PathBuf;

use config::ConfigError;
use glam::IVec2;
use thiserror::Error;

/// Errors that can occur while building a snowflake mesh.
#[derive(Debug, Error)]
pub enum MeshError {
    /// Boundary extraction produced no cell to seed the tracer
    #[error("Boundary extraction: mask of {rows}x{cols} cells has no boundary cell")]
    EmptyBoundary { rows: usize, cols: usize },

    /// No boundary cell under the tracing mask
    #[error("Contour tracing: stuck at step {step} at lattice cell ({row}, {col}), no candidate under the mask")]
    StuckTracer {
        step: usize,
        row: i32,
        col: i32,
        /// Vertices accepted before the failing step, seed first
        partial: Vec<IVec2>,
    },

    /// Outline cannot form a polygon
    #[error("Degenerate polygon: {message}")]
    DegeneratePolygon { message: String },

    /// Two non-adjacent outline edges touch or cross
    #[error("Degenerate polygon: outline edges {first} and {second} intersect")]
    SelfIntersection { first: usize, second: usize },

    /// Constrained triangulation rejected its input
    #[error("Triangulation failed: {message}")]
    TriangulationFailed { message: String },

    /// Configuration failed validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    /// Stage inputs do not fit together
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// File could not be read or written
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Text field file is malformed
    #[error("Failed to parse field {path} line {line}: {message}")]
    ParseField {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// Image decoding failed
    #[error("Failed to decode image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// File extension not recognised
    #[error("Unsupported file format: {extension:?}")]
    UnsupportedFormat { extension: Option<String> },
}

impl MeshError {
    /// Creates a degenerate polygon error.
    pub fn degenerate(message: impl Into<String>) -> Self {
        Self::DegeneratePolygon {
            message: message.into(),
        }
    }

    /// Creates a triangulation failure.
    pub fn triangulation_failed(message: impl Into<String>) -> Self {
        Self::TriangulationFailed {
            message: message.into(),
        }
    }

    /// Creates an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates an I/O error bound to a path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Pipeline stage an error originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Config,
    Input,
    Boundary,
    Trace,
    Triangulate,
    Io,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Config => "configuration",
            Stage::Input => "stage input",
            Stage::Boundary => "boundary extraction",
            Stage::Trace => "contour tracing",
            Stage::Triangulate => "triangulation",
            Stage::Io => "file i/o",
        };
        f.write_str(name)
    }
}

impl MeshError {
    /// Stage that reported the error.
    ///
    /// Degenerate outlines are attributed to triangulation, which is where
    /// they become fatal.
    pub fn stage(&self) -> Stage {
        match self {
            MeshError::InvalidConfig(_) => Stage::Config,
            MeshError::EmptyBoundary { .. } => Stage::Boundary,
            MeshError::StuckTracer { .. } => Stage::Trace,
            MeshError::DegeneratePolygon { .. }
            | MeshError::SelfIntersection { .. }
            | MeshError::TriangulationFailed { .. } => Stage::Triangulate,
            MeshError::InvalidInput { .. } => Stage::Input,
            MeshError::Io { .. }
            | MeshError::ParseField { .. }
            | MeshError::Image { .. }
            | MeshError::UnsupportedFormat { .. } => Stage::Io,
        }
    }
}

/// Result alias used throughout the crate.
pub type MeshResult<T> = Result<T, MeshError>;
