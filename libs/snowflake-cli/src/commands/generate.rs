//! snowflake generate command - one mesh from a field file.

use std::path::Path;

use anyhow::{Context, Result};
use config::SnowflakeConfig;
use serde::Serialize;
use snowflake_mesh::io::{load_field, save_mesh};
use snowflake_mesh::{MeshStats, Pipeline};
use tracing::info;

use super::print_json;
use crate::Cli;

#[derive(Serialize)]
struct GenerateReport {
    input: String,
    output: String,
    dendrites: u32,
    arm_vertices: usize,
    outline_vertices: usize,
    steiner_points: usize,
    refinement_complete: bool,
    mesh: MeshStats,
}

pub fn run(input: &Path, output: &Path, config: SnowflakeConfig, cli: &Cli) -> Result<()> {
    let field =
        load_field(input).with_context(|| format!("Failed to load field from {:?}", input))?;

    let dendrites = config.symmetry.dendrites;
    let result = Pipeline::new(config)?
        .run(&field)
        .with_context(|| format!("Failed to build a mesh from {:?}", input))?;

    save_mesh(&result.mesh, output)
        .with_context(|| format!("Failed to save mesh to {:?}", output))?;
    info!(?output, "Mesh written");

    let report = GenerateReport {
        input: input.display().to_string(),
        output: output.display().to_string(),
        dendrites,
        arm_vertices: result.arm.len(),
        outline_vertices: result.outline.len(),
        steiner_points: result.triangulation.steiner_count(),
        refinement_complete: result.triangulation.is_refinement_complete(),
        mesh: result.mesh.stats(),
    };

    if cli.quiet {
        return Ok(());
    }
    if cli.json {
        return print_json(&report);
    }

    println!("Snowflake mesh");
    println!("  Input: {}", report.input);
    println!("  Output: {}", report.output);
    println!("  Dendrites: {}", report.dendrites);
    println!("  Arm vertices: {}", report.arm_vertices);
    println!("  Outline vertices: {}", report.outline_vertices);
    println!("  Steiner points: {}", report.steiner_points);
    if !report.refinement_complete {
        println!("  Refinement stopped at the Steiner point budget");
    }
    println!("  Mesh vertices: {}", report.mesh.vertices);
    println!("  Mesh faces: {}", report.mesh.triangles);
    println!("  Open edges: {}", report.mesh.open_edges);
    println!("  Volume: {:.3}", report.mesh.volume);
    Ok(())
}
