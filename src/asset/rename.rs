//! Batch renaming of assets to digest-bearing filenames.

use std::fs;

use anyhow::{Context, Result};

use crate::debug;

use super::digest::digested_name;
use super::record::Asset;

/// Copy each asset to its digested name and update its record in place.
///
/// The copy is byte-for-byte (`fs::copy`); the digested file lands next to
/// the original. With `remove_original`, the original is deleted once the
/// copy exists - public-tree outputs keep only the digested name, while
/// compiled outputs keep both.
///
/// An IO failure aborts the batch and propagates: there is no rollback,
/// so files renamed before the failing one stay renamed. Re-invoking on
/// unchanged content derives the same digested name again; callers guard
/// against double-application by renaming each batch exactly once, not by
/// detection here.
pub fn rename_all(assets: &mut [Asset], remove_original: bool) -> Result<()> {
    for asset in assets.iter_mut() {
        let original = asset.disk_path().to_path_buf();
        rename_one(asset, remove_original)
            .with_context(|| format!("failed to fingerprint `{}`", original.display()))?;
    }
    Ok(())
}

/// Rename a single asset: copy to digested path, update record, optionally
/// remove the original.
fn rename_one(asset: &mut Asset, remove_original: bool) -> Result<()> {
    let original = asset.disk_path().to_path_buf();
    let digested = digested_name(&original)?;

    fs::copy(&original, &digested)?;
    debug!("rename"; "{} -> {}", original.display(), digested.display());

    asset.set_disk_path(digested);

    if remove_original {
        fs::remove_file(&original)?;
    }
    Ok(())
}
