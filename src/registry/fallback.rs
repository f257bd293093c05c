//! Disk-search fallback for reference resolution.
//!
//! When a run has no public asset list at all, a reference is resolved
//! against two parallel directory trees: an exact-basename match under the
//! source asset tree, and a digest-wildcarded match under the public tree.
//! This is an explicitly secondary, heuristic strategy behind the indexed
//! lookup - two loosely coupled trees matched by filename patterns. Any
//! multiple-match is surfaced as an ambiguity instead of a silent guess.

use std::path::{Path, PathBuf};

use jwalk::WalkDir;

use crate::debug;

use super::Resolution;

/// The two directory trees the fallback searches.
#[derive(Debug, Clone)]
pub struct FallbackRoots {
    source_root: PathBuf,
    public_root: PathBuf,
}

impl FallbackRoots {
    /// Create fallback roots from the configured trees.
    pub fn new(source_root: impl Into<PathBuf>, public_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            public_root: public_root.into(),
        }
    }

    /// Search both trees for the pathname's basename.
    ///
    /// A hit requires exactly one match on each side: the source file
    /// proves the asset exists in the project, the public match supplies
    /// the (possibly already digested) destination.
    pub(super) fn search(&self, pathname: &str) -> Resolution {
        let basename = pathname.rsplit('/').next().unwrap_or(pathname);

        let source_matches = find_by_name(&self.source_root, |name| name == basename);
        if source_matches.is_empty() {
            return Resolution::Miss;
        }

        let mut public_matches =
            find_by_name(&self.public_root, |name| digest_wildcard_matches(name, basename));
        if public_matches.is_empty() {
            return Resolution::Miss;
        }

        if source_matches.len() > 1 || public_matches.len() > 1 {
            let mut candidates = source_matches;
            candidates.extend(public_matches);
            return Resolution::Ambiguous { candidates };
        }

        let destination = public_matches.remove(0);
        debug!(
            "registry";
            "disk fallback resolved `{}` -> {}",
            pathname,
            destination.display()
        );
        Resolution::Hit {
            destination,
            runners_up: Vec::new(),
        }
    }
}

/// Collect files under `root` whose basename satisfies the predicate
/// (sorted for determinism).
fn find_by_name(root: &Path, matches: impl Fn(&str) -> bool) -> Vec<PathBuf> {
    if !root.is_dir() {
        return Vec::new();
    }

    let mut found: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(&matches)
        })
        .collect();
    found.sort();
    found
}

/// Match a filename against a basename with an optional digest infix:
/// `logo.png` accepts `logo.png` and `logo-<hex>.png`.
fn digest_wildcard_matches(name: &str, basename: &str) -> bool {
    if name == basename {
        return true;
    }

    let (stem, ext) = match basename.rsplit_once('.') {
        Some((stem, ext)) => (stem, Some(ext)),
        None => (basename, None),
    };

    let infix = name
        .strip_prefix(stem)
        .and_then(|rest| rest.strip_prefix('-'));
    let infix = match (infix, ext) {
        (Some(rest), Some(ext)) => rest.strip_suffix(ext).and_then(|r| r.strip_suffix('.')),
        (Some(rest), None) => Some(rest),
        (None, _) => None,
    };

    infix.is_some_and(|digest| {
        !digest.is_empty() && digest.chars().all(|c| c.is_ascii_hexdigit())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn roots(dir: &TempDir) -> FallbackRoots {
        FallbackRoots::new(dir.path().join("app/assets"), dir.path().join("public"))
    }

    #[test]
    fn test_digest_wildcard_matches() {
        assert!(digest_wildcard_matches("logo.png", "logo.png"));
        assert!(digest_wildcard_matches("logo-9f8a1c2d.png", "logo.png"));
        assert!(digest_wildcard_matches("logo-0123456789abcdef.png", "logo.png"));
        assert!(digest_wildcard_matches("CNAME-abc123", "CNAME"));

        assert!(!digest_wildcard_matches("logo-small.png", "logo.png"));
        assert!(!digest_wildcard_matches("logo-.png", "logo.png"));
        assert!(!digest_wildcard_matches("biglogo.png", "logo.png"));
        assert!(!digest_wildcard_matches("logo.svg", "logo.png"));
    }

    #[test]
    fn test_search_resolves_digested_public_file() {
        let dir = TempDir::new().unwrap();
        write(&dir.path().join("app/assets/images/logo.png"), "png");
        write(&dir.path().join("public/images/logo-9f8a1c2d.png"), "png");

        match roots(&dir).search("images/logo.png") {
            Resolution::Hit { destination, .. } => {
                assert!(destination.ends_with("public/images/logo-9f8a1c2d.png"));
            }
            other => panic!("expected hit, got {other:?}"),
        }
    }

    #[test]
    fn test_search_misses_without_source_side() {
        let dir = TempDir::new().unwrap();
        write(&dir.path().join("public/images/logo.png"), "png");

        assert_eq!(roots(&dir).search("images/logo.png"), Resolution::Miss);
    }

    #[test]
    fn test_search_misses_without_public_side() {
        let dir = TempDir::new().unwrap();
        write(&dir.path().join("app/assets/images/logo.png"), "png");

        assert_eq!(roots(&dir).search("images/logo.png"), Resolution::Miss);
    }

    #[test]
    fn test_search_reports_ambiguity() {
        let dir = TempDir::new().unwrap();
        write(&dir.path().join("app/assets/a/logo.png"), "a");
        write(&dir.path().join("app/assets/b/logo.png"), "b");
        write(&dir.path().join("public/images/logo-9f8a1c2d.png"), "png");

        match roots(&dir).search("logo.png") {
            Resolution::Ambiguous { candidates } => {
                assert_eq!(candidates.len(), 3);
            }
            other => panic!("expected ambiguity, got {other:?}"),
        }
    }

    #[test]
    fn test_search_missing_roots() {
        let dir = TempDir::new().unwrap();
        assert_eq!(roots(&dir).search("logo.png"), Resolution::Miss);
    }
}
