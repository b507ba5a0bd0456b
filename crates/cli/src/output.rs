//! Output helpers shared by commands.
//!
//! Responsibilities:
//! - Write command output to stdout or atomically to a file.
//! - Print load diagnostics to stderr.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use envstack_config::LoadResult;
use tempfile::NamedTempFile;

/// Print `output` to stdout, or write it to `output_file`.
pub fn output_result(output: &str, output_file: Option<&Path>) -> Result<()> {
    if let Some(path) = output_file {
        write_to_file(output, path)
            .with_context(|| format!("Failed to write output to {}", path.display()))?;
        eprintln!("Configuration written to {}", path.display());
    } else {
        print!("{}", output);
    }
    Ok(())
}

/// Write output to a file atomically.
///
/// Creates parent directories if needed, writes to temp file then renames
/// for atomicity.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    // If path has no parent (e.g., just ".env"), use current directory
    let parent_dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    if parent_dir != Path::new(".") {
        std::fs::create_dir_all(parent_dir)
            .with_context(|| format!("Failed to create directory: {}", parent_dir.display()))?;
    }

    let mut temp_file = NamedTempFile::new_in(parent_dir)
        .with_context(|| format!("Failed to create temp file in: {}", parent_dir.display()))?;
    temp_file
        .write_all(content.as_bytes())
        .context("Failed to write to temp file")?;
    temp_file.flush().context("Failed to flush temp file")?;

    temp_file
        .persist(path)
        .with_context(|| format!("Failed to write file: {}", path.display()))?;

    Ok(())
}

/// Print every diagnostic of a load to stderr.
pub fn print_diagnostics(result: &LoadResult) {
    for error in &result.validation_errors {
        eprintln!("error: {error}");
    }
    for warning in &result.warnings {
        eprintln!("warning: {warning}");
    }
}
