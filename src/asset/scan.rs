//! Output-tree scanning (builds the asset collection for a run).
//!
//! The host build pipeline knows its outputs in memory; a standalone run
//! has to reconstruct them from disk. Walking is sorted so batches are
//! deterministic across runs and platforms.

use std::path::PathBuf;

use anyhow::{Result, bail};
use jwalk::WalkDir;

use crate::config::RestampConfig;
use crate::log;
use crate::manifest::MANIFEST_FILE_NAME;

use super::record::{Asset, AssetCollection};

/// Walk the public root and partition its files into a collection.
///
/// Files whose extension is in `fingerprint.rewrite_extensions` become
/// compiled (rewritable) assets; everything else is a public asset. When a
/// file has a same-relative-path sibling under the source asset tree, that
/// sibling becomes the record's reference-matchable current path.
pub fn scan_collection(config: &RestampConfig) -> Result<AssetCollection> {
    let public_root = config.public_root();
    if !public_root.is_dir() {
        bail!("public root not found: {}", public_root.display());
    }
    let source_root = config.assets_source_root();

    let mut files: Vec<PathBuf> = WalkDir::new(&public_root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path())
        .collect();
    files.sort();

    let mut collection = AssetCollection::default();
    for path in files {
        // A manifest from a previous run is bookkeeping, not an asset
        if path.parent() == Some(public_root.as_path())
            && path.file_name().is_some_and(|n| n == MANIFEST_FILE_NAME)
        {
            continue;
        }

        let rel = path.strip_prefix(&public_root).unwrap_or(&path);
        let source = source_root.join(rel);
        let source = source.exists().then_some(source);

        if config.is_rewritable(&path) {
            let mut asset = Asset::new(&path);
            if let Some(src) = source {
                asset = asset.with_source(src);
            }
            collection.compiled.push(asset);
        } else {
            // The current path is the reference-matchable location: the
            // pre-build source when known, else the output file itself
            let asset = match source {
                Some(src) => Asset::with_destination(&src, &path).with_source(src),
                None => Asset::with_destination(&path, &path),
            };
            collection.public.push(asset);
        }
    }
    Ok(collection)
}

/// Build records for the explicitly configured extra files.
///
/// Missing entries are skipped with a warning rather than aborting - a
/// stale config line should not fail the whole build before it starts.
pub fn extra_assets(config: &RestampConfig) -> Vec<Asset> {
    let mut assets = Vec::new();
    for path in config.extra_files() {
        if path.is_file() {
            assets.push(Asset::new(path));
        } else {
            log!("warning"; "configured file not found, skipping: {}", path.display());
        }
    }
    assets
}
