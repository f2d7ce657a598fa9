//! # Config Crate
//!
//! Centralized configuration for the snowflake outline and prism pipeline.
//! All magic numbers and tunable parameters are defined here so that the
//! boundary, tracing, symmetry, triangulation and extrusion stages agree on
//! their defaults.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{BINARIZE_THRESHOLD, DEFAULT_DENDRITES};
//! use config::settings::SnowflakeConfig;
//!
//! let config = SnowflakeConfig::default();
//! assert_eq!(config.boundary.threshold, BINARIZE_THRESHOLD);
//! assert_eq!(config.symmetry.dendrites, DEFAULT_DENDRITES);
//! ```

pub mod constants;
pub mod settings;

pub use settings::{ConfigError, SnowflakeConfig};
