//! oc compiler CLI
//!
//! Reads a parsed tree (JSON), runs the semantic pass and writes the
//! annotated tree, the symbol tables and the generated oil.

use anyhow::Result;
use clap::{Parser, Subcommand};
use oc_driver::Emit;
use std::path::PathBuf;

mod build;
mod check;
mod logging;

#[derive(Parser)]
#[command(name = "occ")]
#[command(about = "oc semantic analyzer and oil generator", long_about = None)]
#[command(version)]
struct Cli {
    /// More log output (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a tree and write its outputs
    Build {
        /// Path to the tree JSON
        path: PathBuf,

        /// Output directory (defaults to the input's directory)
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Outputs to write: ast, sym, oil (repeatable)
        #[arg(long, value_delimiter = ',')]
        emit: Vec<Emit>,

        /// Configuration file (defaults to occ.toml next to the input)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Treat warnings as errors
        #[arg(long)]
        warnings_as_errors: bool,
    },

    /// Check a tree for semantic errors without writing anything
    Check {
        /// Path to the tree JSON
        path: PathBuf,

        /// Treat warnings as errors
        #[arg(long)]
        warnings_as_errors: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Commands::Build {
            path,
            out_dir,
            emit,
            config,
            warnings_as_errors,
        } => {
            let options = build::BuildOptions {
                out_dir,
                emit,
                config,
                warnings_as_errors,
            };
            build::build(&path, options)?;
        }
        Commands::Check {
            path,
            warnings_as_errors,
        } => {
            check::check(&path, warnings_as_errors)?;
        }
    }

    Ok(())
}
