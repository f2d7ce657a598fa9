//! # Pipeline
//!
//! Runs every stage in order:
//!
//! ```text
//! ScalarField → BoundaryMask → Arm → Outline → Triangulation → Mesh
//! ```
//!
//! Each stage produces a new value; nothing earlier is modified. The run is
//! deterministic for a fixed field and configuration.

use std::ops::RangeInclusive;

use config::constants::MAX_DENDRITES;
use config::SnowflakeConfig;
use tracing::{info, info_span, instrument, warn};

use crate::boundary::BoundaryExtractor;
use crate::error::{MeshError, MeshResult};
use crate::extrude::PrismExtruder;
use crate::field::{BoundaryMask, ScalarField};
use crate::mesh::Mesh;
use crate::symmetry::{Outline, SymmetryExpander};
use crate::trace::{Arm, ContourTracer};
use crate::triangulate::{PolygonTriangulator, Triangulation};

/// Every intermediate artifact of one run.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub mask: BoundaryMask,
    pub arm: Arm,
    pub outline: Outline,
    pub triangulation: Triangulation,
    pub mesh: Mesh,
}

/// Configured snowflake pipeline.
///
/// # Example
///
/// ```rust,ignore
/// let pipeline = Pipeline::new(SnowflakeConfig::default())?;
/// let output = pipeline.run(&field)?;
/// save_mesh(&output.mesh, Path::new("snowflake.obj"))?;
/// ```
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: SnowflakeConfig,
}

impl Pipeline {
    /// Validates `config` and builds a pipeline.
    pub fn new(config: SnowflakeConfig) -> MeshResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SnowflakeConfig {
        &self.config
    }

    /// Runs every stage on a scalar field.
    #[instrument(skip_all, fields(rows = field.nrows(), cols = field.ncols()))]
    pub fn run(&self, field: &ScalarField) -> MeshResult<PipelineOutput> {
        let mask = BoundaryExtractor::new(&self.config.boundary).extract(field);
        self.run_from_mask(mask)
    }

    /// Runs every stage after boundary extraction.
    pub fn run_from_mask(&self, mask: BoundaryMask) -> MeshResult<PipelineOutput> {
        let arm = self.trace(&mask)?;
        let (outline, triangulation, mesh) = self.build(&arm, self.config.symmetry.dendrites)?;

        info!(
            arm = arm.len(),
            outline = outline.len(),
            triangles = triangulation.triangles().len(),
            mesh_vertices = mesh.vertex_count(),
            mesh_faces = mesh.triangle_count(),
            "Pipeline complete"
        );
        Ok(PipelineOutput {
            mask,
            arm,
            outline,
            triangulation,
            mesh,
        })
    }

    /// Builds one mesh per dendrite count from a single traced arm.
    ///
    /// Boundary extraction and tracing failures abort the sweep; failures for
    /// an individual count are returned alongside it.
    ///
    /// # Errors
    ///
    /// [`MeshError::InvalidInput`] if the range ends above
    /// [`MAX_DENDRITES`].
    #[instrument(skip_all, fields(from = dendrites.start(), to = dendrites.end()))]
    pub fn sweep(
        &self,
        field: &ScalarField,
        dendrites: RangeInclusive<u32>,
    ) -> MeshResult<Vec<(u32, MeshResult<Mesh>)>> {
        if *dendrites.end() > MAX_DENDRITES {
            return Err(MeshError::invalid_input(format!(
                "dendrite sweep {}..={} exceeds the limit of {MAX_DENDRITES}",
                dendrites.start(),
                dendrites.end()
            )));
        }
        let mask = BoundaryExtractor::new(&self.config.boundary).extract(field);
        let arm = self.trace(&mask)?;

        Ok(dendrites
            .map(|n| {
                let _span = info_span!("dendrites", n).entered();
                let result = self.build(&arm, n).map(|(_, _, mesh)| mesh);
                if let Err(e) = &result {
                    warn!(error = %e, "Skipping dendrite count");
                }
                (n, result)
            })
            .collect())
    }

    fn trace(&self, mask: &BoundaryMask) -> MeshResult<Arm> {
        ContourTracer::new(mask, &self.config.trace)?.trace()
    }

    fn build(&self, arm: &Arm, dendrites: u32) -> MeshResult<(Outline, Triangulation, Mesh)> {
        let outline = SymmetryExpander::new(&self.config.symmetry)
            .with_dendrites(dendrites)
            .expand(arm)?;
        let triangulation =
            PolygonTriangulator::new(&self.config.triangulation).triangulate(&outline)?;
        let mesh = PrismExtruder::new(&self.config.extrusion).extrude(&triangulation, &outline)?;
        Ok((outline, triangulation, mesh))
    }
}

/// Runs the pipeline with `config` and returns only the mesh.
pub fn generate_mesh(field: &ScalarField, config: &SnowflakeConfig) -> MeshResult<Mesh> {
    Ok(Pipeline::new(config.clone())?.run(field)?.mesh)
}
