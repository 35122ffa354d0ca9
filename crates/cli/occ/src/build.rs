//! Build command implementation

use anyhow::{Context, Result};
use colored::Colorize;
use oc_driver::{Config, Emit, Session};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Config file looked up next to the input when `--config` is absent
const CONFIG_FILE: &str = "occ.toml";

/// Command-line overrides for the build
#[derive(Debug, Default)]
pub struct BuildOptions {
    pub out_dir: Option<PathBuf>,
    pub emit: Vec<Emit>,
    pub config: Option<PathBuf>,
    pub warnings_as_errors: bool,
}

pub fn build(path: &Path, options: BuildOptions) -> Result<()> {
    let start = Instant::now();

    println!("{} {}", "Compiling".green().bold(), path.display());

    let config = resolve_config(path, options)?;
    let out_dir = output_dir(path, &config);
    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .with_context(|| format!("Input has no usable file name: {}", path.display()))?;

    let session = Session::new(config);
    let outputs = session.compile_file(path)?;

    for written in outputs.write_to(&out_dir, stem, &session.config().emit)? {
        println!("  {} {}", "Wrote:".bold(), written.display());
    }
    if !outputs.succeeded() && session.config().emits(Emit::Oil) {
        println!("  {} oil not generated", "Skipped:".yellow().bold());
    }

    crate::check::report(&outputs.diagnostics)?;

    println!(
        "  {} in {:.2}s",
        "Finished".green().bold(),
        start.elapsed().as_secs_f64()
    );
    Ok(())
}

/// Config file (explicit or next to the input), then flags on top
fn resolve_config(path: &Path, options: BuildOptions) -> Result<Config> {
    let file = options.config.or_else(|| {
        let candidate = path.parent()?.join(CONFIG_FILE);
        candidate.is_file().then_some(candidate)
    });
    let mut config = match file {
        Some(file) => Config::from_file(&file)?,
        None => Config::default(),
    };

    if options.out_dir.is_some() {
        config.out_dir = options.out_dir;
    }
    if !options.emit.is_empty() {
        config.emit = options.emit;
    }
    config.warnings_as_errors |= options.warnings_as_errors;

    tracing::debug!(?config, "resolved configuration");
    Ok(config)
}

fn output_dir(path: &Path, config: &Config) -> PathBuf {
    match &config.out_dir {
        Some(dir) => dir.clone(),
        None => path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
    }
}
