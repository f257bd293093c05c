//! Reference resolution against the public asset set.
//!
//! The registry is the single lookup point for asset references found in
//! compiled files. References are matched by anchored path suffix - the
//! reference `images/logo.png` matches a public asset whose current or
//! destination path *ends with* that pathname at a component boundary.
//!
//! A basename-keyed index keeps lookups away from an O(n·m) rescan of the
//! whole collection per reference; suffix filtering only ever touches the
//! handful of assets sharing the reference's basename.

mod fallback;

pub use fallback::FallbackRoots;

use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;

use crate::asset::Asset;
use crate::core::{split_query, strip_leading_slash};

/// Outcome of resolving one reference path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Resolved to a destination. `runners_up` lists the other assets that
    /// shared the suffix and lost the tie-break; callers surface them as an
    /// ambiguity warning.
    Hit {
        destination: PathBuf,
        runners_up: Vec<PathBuf>,
    },
    /// The disk fallback found several plausible files; refusing to guess.
    Ambiguous { candidates: Vec<PathBuf> },
    /// Nothing matched.
    Miss,
}

/// Suffix-indexed view over the public assets of one batch.
pub struct AssetRegistry<'a> {
    assets: &'a [Asset],
    /// basename -> indices of assets whose current or destination path
    /// carries that basename
    by_basename: FxHashMap<String, Vec<usize>>,
    fallback: FallbackRoots,
}

impl<'a> AssetRegistry<'a> {
    /// Index a public asset list for resolution.
    pub fn new(assets: &'a [Asset], fallback: FallbackRoots) -> Self {
        let mut by_basename: FxHashMap<String, Vec<usize>> = FxHashMap::default();
        for (i, asset) in assets.iter().enumerate() {
            let mut insert = |path: &Path| {
                if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                    let entry = by_basename.entry(name.to_string()).or_default();
                    if entry.last() != Some(&i) {
                        entry.push(i);
                    }
                }
            };
            insert(&asset.current_path);
            if let Some(dest) = &asset.destination_path {
                insert(dest);
            }
        }
        Self {
            assets,
            by_basename,
            fallback,
        }
    }

    /// Number of indexed assets.
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// Check if the registry holds no assets.
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Resolve a reference path to the destination of a public asset.
    ///
    /// Any query string is stripped first; matching is by anchored path
    /// suffix. Several assets sharing the suffix are tie-broken
    /// deterministically - shortest destination path first, then
    /// lexicographic - with the losers reported as runners-up. When the
    /// registry is empty (no asset list available at all) and nothing
    /// matched, resolution falls back to the disk search.
    pub fn resolve(&self, asset_path: &str) -> Resolution {
        let (pathname, _query) = split_query(asset_path);
        let pathname = strip_leading_slash(pathname);
        if pathname.is_empty() {
            return Resolution::Miss;
        }
        let basename = pathname.rsplit('/').next().unwrap_or(pathname);

        let mut candidates: Vec<&Asset> = self
            .by_basename
            .get(basename)
            .map(|indices| {
                indices
                    .iter()
                    .map(|&i| &self.assets[i])
                    .filter(|asset| asset_matches(asset, pathname))
                    .collect()
            })
            .unwrap_or_default();

        if candidates.is_empty() {
            if self.assets.is_empty() {
                return self.fallback.search(pathname);
            }
            return Resolution::Miss;
        }

        candidates.sort_by_key(|asset| {
            let path = asset.disk_path().to_string_lossy().into_owned();
            (path.len(), path)
        });

        let mut paths: Vec<PathBuf> = candidates
            .iter()
            .map(|asset| asset.disk_path().to_path_buf())
            .collect();
        paths.dedup();
        let destination = paths.remove(0);
        Resolution::Hit {
            destination,
            runners_up: paths,
        }
    }
}

/// Check whether a reference pathname suffix-matches either of an asset's
/// paths.
fn asset_matches(asset: &Asset, pathname: &str) -> bool {
    path_suffix_matches(&asset.current_path, pathname)
        || asset
            .destination_path
            .as_deref()
            .is_some_and(|dest| path_suffix_matches(dest, pathname))
}

fn path_suffix_matches(path: &Path, pathname: &str) -> bool {
    suffix_matches(&path.to_string_lossy(), pathname)
}

/// Anchored suffix match: `full` ends with `suffix` at a path-component
/// boundary, so `app.css` never matches `webapp.css`.
fn suffix_matches(full: &str, suffix: &str) -> bool {
    full.ends_with(suffix)
        && (full.len() == suffix.len()
            || full.as_bytes()[full.len() - suffix.len() - 1] == b'/')
}
