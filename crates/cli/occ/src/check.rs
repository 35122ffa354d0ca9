//! Check command implementation

use anyhow::Result;
use colored::Colorize;
use oc_driver::{Config, Session};
use oc_resolve::{Diagnostics, Severity};
use std::path::Path;

pub fn check(path: &Path, warnings_as_errors: bool) -> Result<()> {
    println!("{} {}", "Checking".green().bold(), path.display());

    let session = Session::new(Config {
        warnings_as_errors,
        ..Config::default()
    });
    let outputs = session.compile_file(path)?;

    report(&outputs.diagnostics)
}

/// Print every diagnostic, then a summary; fails if any error was reported
pub fn report(diagnostics: &Diagnostics) -> Result<()> {
    for diagnostic in diagnostics {
        let severity = match diagnostic.severity {
            Severity::Error => "error".red().bold(),
            Severity::Warning => "warning".yellow().bold(),
        };
        eprintln!("{}: {}: {}", diagnostic.location(), severity, diagnostic.message());
    }

    let errors = diagnostics.errors().count();
    let warnings = diagnostics.warnings().count();

    if warnings > 0 {
        eprintln!("{} {} warnings found", "Warning:".yellow().bold(), warnings);
    }
    if errors > 0 {
        eprintln!("{} {} errors found", "Failed:".red().bold(), errors);
        anyhow::bail!("Check failed with {} errors", errors);
    }

    println!("{} No errors found", "Success:".green().bold());
    Ok(())
}
