//! In-place rewriting of asset references inside compiled files.
//!
//! Each matched token is resolved through the registry and spliced over
//! its exact byte range, so substitution can never touch a different
//! occurrence that merely shares a suffix, and special characters in
//! asset names need no escaping. A miss leaves the token byte-identical
//! and records a diagnostic; one bad reference never aborts the pass.

mod report;
mod token;

pub use report::{RewriteIssue, RewriteReport};
pub use token::{AssetReference, RefKind, scan_malformed, scan_references};

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::core::web_path;
use crate::debug;
use crate::registry::{AssetRegistry, Resolution};
use crate::utils::plural_count;

/// Rewrite every asset reference in one file on disk.
///
/// Reads the file's text, substitutes resolved references, and writes the
/// file back only when something changed. `label` names the file in
/// diagnostics (typically its project-relative path). IO failures
/// propagate and abort the batch; resolution misses only feed the report.
pub fn rewrite_file(
    path: &Path,
    label: &str,
    registry: &AssetRegistry<'_>,
    public_root: &Path,
    report: &mut RewriteReport,
) -> Result<()> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read `{}`", path.display()))?;

    if let Some(rewritten) = rewrite_text(&text, label, registry, public_root, report) {
        fs::write(path, rewritten)
            .with_context(|| format!("failed to write `{}`", path.display()))?;
        debug!("rewrite"; "{}", label);
    }
    Ok(())
}

/// Substitute resolved references in a text (pure).
///
/// Returns the rewritten text when at least one substitution happened,
/// `None` when the text is unchanged. Tokens are replaced by splicing
/// their exact match ranges; everything between tokens is copied
/// untouched.
pub fn rewrite_text(
    text: &str,
    label: &str,
    registry: &AssetRegistry<'_>,
    public_root: &Path,
    report: &mut RewriteReport,
) -> Option<String> {
    let tokens = scan_references(text);
    for snippet in scan_malformed(text, &tokens) {
        report.add_warning(label, snippet, "does not parse as an asset reference");
    }
    if tokens.is_empty() {
        return None;
    }
    debug!("rewrite"; "{}: {}", label, plural_count(tokens.len(), "reference"));

    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    let mut changed = false;

    for token in &tokens {
        match registry.resolve(token.asset_path) {
            Resolution::Hit {
                destination,
                runners_up,
            } => {
                if !runners_up.is_empty() {
                    report.add_warning(
                        label,
                        token.asset_path,
                        format!(
                            "suffix also matches {}; picked {}",
                            plural_count(runners_up.len(), "other asset"),
                            destination.display()
                        ),
                    );
                }

                let web = web_path(&destination, public_root);
                let query = token.query.map(|q| format!("?{q}")).unwrap_or_default();
                let replacement = match token.kind {
                    RefKind::Url => format!("url({web}{query})"),
                    RefKind::Path => format!("{web}{query}"),
                };

                out.push_str(&text[cursor..token.range.start]);
                out.push_str(&replacement);
                cursor = token.range.end;
                changed = true;
            }
            Resolution::Ambiguous { candidates } => {
                report.add_warning(
                    label,
                    token.asset_path,
                    format!(
                        "disk fallback found {}; refusing to guess",
                        plural_count(candidates.len(), "candidate")
                    ),
                );
            }
            Resolution::Miss => {
                report.add_unresolved(label, token.asset_path);
            }
        }
    }

    if !changed {
        return None;
    }
    out.push_str(&text[cursor..]);
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::Asset;
    use crate::registry::FallbackRoots;
    use tempfile::TempDir;

    fn registry_with(assets: &[Asset]) -> AssetRegistry<'_> {
        AssetRegistry::new(
            assets,
            FallbackRoots::new("nonexistent/app/assets", "nonexistent/public"),
        )
    }

    fn logo_assets() -> Vec<Asset> {
        vec![Asset::with_destination(
            "app/assets/images/logo.png",
            "public/images/logo-9f8a1.png",
        )]
    }

    #[test]
    fn test_rewrite_asset_url() {
        let assets = logo_assets();
        let registry = registry_with(&assets);
        let mut report = RewriteReport::default();

        let out = rewrite_text(
            "background: asset-url('images/logo.png');",
            "app.css",
            &registry,
            Path::new("public"),
            &mut report,
        )
        .unwrap();
        assert_eq!(out, "background: url(/images/logo-9f8a1.png);");
        assert!(report.is_clean());
    }

    #[test]
    fn test_rewrite_asset_path_with_query() {
        let assets = logo_assets();
        let registry = registry_with(&assets);
        let mut report = RewriteReport::default();

        let out = rewrite_text(
            "src: asset-path('images/logo.png?v=2');",
            "app.css",
            &registry,
            Path::new("public"),
            &mut report,
        )
        .unwrap();
        assert_eq!(out, "src: /images/logo-9f8a1.png?v=2;");
    }

    #[test]
    fn test_rewrite_miss_leaves_text_untouched() {
        let assets = logo_assets();
        let registry = registry_with(&assets);
        let mut report = RewriteReport::default();

        let text = "background: asset-url('images/missing.png');";
        let out = rewrite_text(text, "app.css", &registry, Path::new("public"), &mut report);
        assert!(out.is_none());

        assert_eq!(report.unresolved_count(), 1);
        let issues = &report.unresolved["app.css"];
        assert_eq!(issues[0].target, "images/missing.png");
    }

    #[test]
    fn test_rewrite_miss_does_not_block_other_references() {
        let assets = logo_assets();
        let registry = registry_with(&assets);
        let mut report = RewriteReport::default();

        let text = "a: asset-url('missing.png'); b: asset-url('images/logo.png');";
        let out = rewrite_text(text, "app.css", &registry, Path::new("public"), &mut report)
            .unwrap();
        assert_eq!(
            out,
            "a: asset-url('missing.png'); b: url(/images/logo-9f8a1.png);"
        );
        assert_eq!(report.unresolved_count(), 1);
    }

    #[test]
    fn test_rewrite_multiple_occurrences() {
        let assets = logo_assets();
        let registry = registry_with(&assets);
        let mut report = RewriteReport::default();

        let text = "a: asset-url(images/logo.png); b: asset-path(\"images/logo.png\");";
        let out = rewrite_text(text, "app.css", &registry, Path::new("public"), &mut report)
            .unwrap();
        assert_eq!(
            out,
            "a: url(/images/logo-9f8a1.png); b: /images/logo-9f8a1.png;"
        );
    }

    #[test]
    fn test_rewrite_does_not_touch_similar_text() {
        // The bare string `images/logo.png` outside a token must survive
        let assets = logo_assets();
        let registry = registry_with(&assets);
        let mut report = RewriteReport::default();

        let text = "/* images/logo.png */ background: asset-url('images/logo.png');";
        let out = rewrite_text(text, "app.css", &registry, Path::new("public"), &mut report)
            .unwrap();
        assert_eq!(
            out,
            "/* images/logo.png */ background: url(/images/logo-9f8a1.png);"
        );
    }

    #[test]
    fn test_rewrite_special_characters_in_name() {
        let assets = vec![Asset::with_destination(
            "app/assets/images/logo (1).png",
            "public/images/logo (1)-9f8a1.png",
        )];
        let registry = registry_with(&assets);
        let mut report = RewriteReport::default();

        let out = rewrite_text(
            "background: asset-url('images/logo (1).png');",
            "app.css",
            &registry,
            Path::new("public"),
            &mut report,
        )
        .unwrap();
        assert_eq!(out, "background: url(/images/logo (1)-9f8a1.png);");
    }

    #[test]
    fn test_rewrite_reports_malformed_token() {
        let assets = logo_assets();
        let registry = registry_with(&assets);
        let mut report = RewriteReport::default();

        let text = "background: asset-url('broken.png;";
        let out = rewrite_text(text, "app.css", &registry, Path::new("public"), &mut report);
        assert!(out.is_none());
        assert_eq!(report.warning_count(), 1);
    }

    #[test]
    fn test_rewrite_file_roundtrip() {
        let dir = TempDir::new().unwrap();
        let css = dir.path().join("app.css");
        std::fs::write(&css, "background: asset-url('images/logo.png');").unwrap();

        let assets = logo_assets();
        let registry = registry_with(&assets);
        let mut report = RewriteReport::default();

        rewrite_file(&css, "app.css", &registry, Path::new("public"), &mut report).unwrap();
        assert_eq!(
            std::fs::read_to_string(&css).unwrap(),
            "background: url(/images/logo-9f8a1.png);"
        );
    }

    #[test]
    fn test_rewrite_file_untouched_on_miss() {
        let dir = TempDir::new().unwrap();
        let css = dir.path().join("app.css");
        let original = "background: asset-url('missing.png');";
        std::fs::write(&css, original).unwrap();

        let assets = logo_assets();
        let registry = registry_with(&assets);
        let mut report = RewriteReport::default();

        rewrite_file(&css, "app.css", &registry, Path::new("public"), &mut report).unwrap();
        // Byte-identical: the file was not rewritten at all
        assert_eq!(std::fs::read_to_string(&css).unwrap(), original);
    }
}
