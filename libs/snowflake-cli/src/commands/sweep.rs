//! snowflake sweep command - one mesh per dendrite count.

use std::ops::RangeInclusive;
use std::path::Path;

use anyhow::{bail, Context, Result};
use config::SnowflakeConfig;
use serde::Serialize;
use snowflake_mesh::io::{load_field, save_mesh, MeshFormat};
use snowflake_mesh::{MeshStats, Pipeline};
use tracing::warn;

use super::print_json;
use crate::Cli;

#[derive(Serialize)]
struct SweepEntry {
    dendrites: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    mesh: Option<MeshStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

pub fn run(
    input: &Path,
    out_dir: &Path,
    dendrites: RangeInclusive<u32>,
    format: MeshFormat,
    config: SnowflakeConfig,
    cli: &Cli,
) -> Result<()> {
    if dendrites.is_empty() {
        bail!(
            "Empty dendrite range {}..={}",
            dendrites.start(),
            dendrites.end()
        );
    }

    let field =
        load_field(input).with_context(|| format!("Failed to load field from {:?}", input))?;
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory {:?}", out_dir))?;

    let results = Pipeline::new(config)?
        .sweep(&field, dendrites)
        .with_context(|| format!("Failed to trace {:?}", input))?;

    let mut entries = Vec::with_capacity(results.len());
    for (n, result) in results {
        let entry = match result {
            Ok(mesh) => {
                let path = out_dir.join(format!("{n}-snowflake.{}", format.extension()));
                save_mesh(&mesh, &path)
                    .with_context(|| format!("Failed to save mesh to {:?}", path))?;
                SweepEntry {
                    dendrites: n,
                    output: Some(path.display().to_string()),
                    mesh: Some(mesh.stats()),
                    error: None,
                }
            }
            Err(e) => {
                warn!(dendrites = n, stage = %e.stage(), "No mesh written");
                SweepEntry {
                    dendrites: n,
                    output: None,
                    mesh: None,
                    error: Some(e.to_string()),
                }
            }
        };
        entries.push(entry);
    }

    let written = entries.iter().filter(|e| e.mesh.is_some()).count();

    if !cli.quiet {
        if cli.json {
            print_json(&entries)?;
        } else {
            println!("Snowflake sweep: {} of {} meshes written", written, entries.len());
            for entry in &entries {
                match (&entry.output, &entry.error) {
                    (Some(output), _) => println!("  n = {:>2}: {}", entry.dendrites, output),
                    (None, Some(error)) => {
                        println!("  n = {:>2}: failed: {}", entry.dendrites, error)
                    }
                    (None, None) => {}
                }
            }
        }
    }

    if written == 0 {
        bail!("No dendrite count produced a mesh");
    }
    Ok(())
}
