//! Subcommand implementations.

pub mod generate;
pub mod sweep;

use anyhow::{Context, Result};
use config::SnowflakeConfig;
use serde::Serialize;

/// Prints the default configuration as pretty JSON.
pub fn print_config() -> Result<()> {
    let json = SnowflakeConfig::default()
        .to_json()
        .context("Failed to serialize the default configuration")?;
    println!("{}", json);
    Ok(())
}

/// Prints a serializable report as pretty JSON.
fn print_json<T: Serialize>(report: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
    println!("{}", json);
    Ok(())
}
