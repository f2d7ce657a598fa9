//! # Snowflake Mesh
//!
//! Builds a closed 3D snowflake mesh from a rasterized density field.
//!
//! ## Architecture
//!
//! ```text
//! ScalarField ─boundary─▶ BoundaryMask ─trace─▶ Arm ─symmetry─▶ Outline
//!             ─triangulate─▶ Triangulation ─extrude─▶ Mesh
//! ```
//!
//! - **boundary**: Laplacian edge detection on the binarized field
//! - **trace**: greedy walk along the edge under a neighbour mask
//! - **symmetry**: mirror plus n-fold rotation with vertex deduplication
//! - **triangulate**: constrained Delaunay triangulation (`spade`)
//! - **extrude**: front/back caps with seeded noise and stitched side walls
//!
//! Every stage is single-threaded and deterministic for a fixed input and
//! configuration.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use config::SnowflakeConfig;
//! use snowflake_mesh::{io, Pipeline};
//!
//! let field = io::load_field(Path::new("flake.txt"))?;
//! let output = Pipeline::new(SnowflakeConfig::default())?.run(&field)?;
//! io::save_mesh(&output.mesh, Path::new("flake.obj"))?;
//! ```

pub mod boundary;
pub mod error;
pub mod extrude;
pub mod field;
pub mod io;
pub mod mesh;
pub mod pipeline;
pub mod symmetry;
pub mod trace;
pub mod triangulate;

pub use boundary::BoundaryExtractor;
pub use error::{MeshError, MeshResult, Stage};
pub use extrude::PrismExtruder;
pub use field::{BoundaryMask, ScalarField};
pub use mesh::{Mesh, MeshStats};
pub use pipeline::{generate_mesh, Pipeline, PipelineOutput};
pub use symmetry::{Outline, SymmetryExpander};
pub use trace::{Arm, ArmWalker, ContourTracer, Termination};
pub use triangulate::{PolygonTriangulator, Triangulation};
