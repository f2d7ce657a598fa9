//! snowflake: command-line interface for the snowflake mesh pipeline.
//!
//! Reads a density field (text grid or grayscale image), traces one arm of
//! its boundary, expands it by n-fold symmetry and writes a closed prism mesh.
//!
//! # Logging
//!
//! Set the `RUST_LOG` environment variable to control log output:
//! - `RUST_LOG=snowflake_mesh=info` - One summary per stage
//! - `RUST_LOG=snowflake_mesh=debug` - Intermediate values
//! - `RUST_LOG=snowflake_mesh::trace=trace` - Every tracing step
//!
//! # Example
//!
//! ```bash
//! snowflake generate flake.png -o flake.obj --dendrites 6
//! snowflake sweep flake.png --out-dir meshes --from 1 --to 11 --format stl
//! snowflake config > snowflake.json
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use config::settings::MaskShape;
use config::SnowflakeConfig;
use snowflake_mesh::io::MeshFormat;
use snowflake_mesh::MeshError;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;

use commands::{generate, print_config, sweep};

/// snowflake - Builds symmetric snowflake meshes from density fields.
#[derive(Parser)]
#[command(name = "snowflake")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Suppress all non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Increase output verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate one mesh from a field file
    Generate {
        /// Input field (.txt/.csv/.dat grid or grayscale image)
        input: PathBuf,

        /// Output mesh path (format determined by extension: .obj or .stl)
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        overrides: Overrides,
    },

    /// Generate one mesh per dendrite count
    Sweep {
        /// Input field (.txt/.csv/.dat grid or grayscale image)
        input: PathBuf,

        /// Directory receiving `{n}-snowflake.{ext}` files
        #[arg(long)]
        out_dir: PathBuf,

        /// First dendrite count
        #[arg(long, default_value = "1")]
        from: u32,

        /// Last dendrite count (inclusive)
        #[arg(long, default_value = "11")]
        to: u32,

        /// Mesh file format
        #[arg(long, default_value = "obj")]
        format: FormatArg,

        #[command(flatten)]
        overrides: Overrides,
    },

    /// Print the default configuration as JSON
    Config,
}

/// Configuration file plus per-field overrides shared by the mesh commands.
#[derive(clap::Args)]
struct Overrides {
    /// JSON configuration file (missing fields take defaults)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Order of the rotational symmetry
    #[arg(long)]
    dendrites: Option<u32>,

    /// Tracing step budget
    #[arg(long)]
    steps: Option<usize>,

    /// Tracing neighbour mask
    #[arg(long)]
    mask: Option<MaskArg>,

    /// Keep every n-th traced vertex
    #[arg(long)]
    stride: Option<usize>,

    /// Surface noise seed
    #[arg(long, conflicts_with = "no_noise")]
    seed: Option<u64>,

    /// Keep the front and back faces flat
    #[arg(long)]
    no_noise: bool,

    /// Join front and back rings directly, without the bevel ring
    #[arg(long)]
    no_middle_ring: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum MaskArg {
    /// 5×5 mask
    Small,
    /// 9×9 ring
    Large,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    /// Wavefront OBJ
    Obj,
    /// Binary STL
    Stl,
}

impl From<FormatArg> for MeshFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Obj => MeshFormat::Obj,
            FormatArg::Stl => MeshFormat::Stl,
        }
    }
}

impl Overrides {
    /// Loads the configuration file (or defaults) and applies the flags.
    fn resolve(&self) -> Result<SnowflakeConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => SnowflakeConfig::default(),
        };

        if let Some(dendrites) = self.dendrites {
            config.symmetry.dendrites = dendrites;
        }
        if let Some(steps) = self.steps {
            config.trace.steps = steps;
        }
        if let Some(mask) = self.mask {
            config.trace.mask = match mask {
                MaskArg::Small => MaskShape::Small,
                MaskArg::Large => MaskShape::Large,
            };
        }
        if let Some(stride) = self.stride {
            config.symmetry.stride = stride;
        }
        if let Some(seed) = self.seed {
            config.extrusion.noise.get_or_insert_with(Default::default).seed = seed;
        }
        if self.no_noise {
            config.extrusion.noise = None;
        }
        if self.no_middle_ring {
            config.extrusion.middle_ring = false;
        }
        Ok(config)
    }
}

fn load_config(path: &Path) -> Result<SnowflakeConfig> {
    SnowflakeConfig::load(path)
        .with_context(|| format!("Failed to load configuration from {:?}", path))
}

/// Initialize the tracing subscriber based on verbosity level.
fn init_tracing(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    // RUST_LOG wins over -v flags
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let level = match verbose {
            0 => "warn",
            1 => "snowflake_mesh=info,snowflake=info",
            2 => "snowflake_mesh=debug,snowflake=debug",
            _ => "trace",
        };
        EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Commands::Generate {
            input,
            output,
            overrides,
        } => overrides
            .resolve()
            .and_then(|config| generate::run(input, output, config, &cli)),
        Commands::Sweep {
            input,
            out_dir,
            from,
            to,
            format,
            overrides,
        } => overrides.resolve().and_then(|config| {
            sweep::run(input, out_dir, *from..=*to, (*format).into(), config, &cli)
        }),
        Commands::Config => print_config(),
    };

    if let Err(e) = &result {
        if !cli.quiet {
            eprintln!("Error: {}", e);
            for cause in e.chain().skip(1) {
                eprintln!("  Caused by: {}", cause);
            }
            if let Some(mesh_err) = e.chain().find_map(|c| c.downcast_ref::<MeshError>()) {
                eprintln!("  Stage: {}", mesh_err.stage());
            }
        }
        std::process::exit(1);
    }

    Ok(())
}
