//! Asset manifest output.
//!
//! After a production run, `manifest.json` in the public root maps each
//! logical web path to its digested counterpart, so servers and templates
//! can resolve assets without re-deriving digests.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Manifest file name, written into the public root.
pub const MANIFEST_FILE_NAME: &str = "manifest.json";

/// Write the logical -> digested mapping into the public root.
///
/// Entries are sorted by logical path for stable diffs across builds.
pub fn write_manifest(
    entries: impl IntoIterator<Item = (String, String)>,
    public_root: &Path,
) -> Result<PathBuf> {
    let map: BTreeMap<String, String> = entries.into_iter().collect();
    let path = public_root.join(MANIFEST_FILE_NAME);

    let json = serde_json::to_string_pretty(&map)?;
    fs::write(&path, json)
        .with_context(|| format!("failed to write `{}`", path.display()))?;
    Ok(path)
}
