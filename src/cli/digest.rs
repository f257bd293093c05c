//! The `digest` command: print digested names without touching anything.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::asset::digested_name;

/// Print `original -> digested` for each file.
pub fn run(files: &[PathBuf]) -> Result<()> {
    for path in files {
        let digested = digested_name(path)
            .with_context(|| format!("failed to digest `{}`", path.display()))?;
        println!("{} -> {}", path.display(), digested.display());
    }
    Ok(())
}
