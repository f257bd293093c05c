//! Pipeline orchestration: rename, then rewrite.
//!
//! Ordering is the load-bearing invariant here: every rename pass
//! completes before any rewriting starts, because rewrite resolution reads
//! each record's destination as updated by the rename pass. The renamed
//! collection is threaded directly into registry construction - the
//! rewrite phase never reads state mutated anywhere else.

use anyhow::Result;

use crate::asset::{Asset, AssetCollection, rename_all};
use crate::config::RestampConfig;
use crate::core::{Profile, RunPhase, web_path};
use crate::manifest;
use crate::registry::{AssetRegistry, FallbackRoots};
use crate::rewrite::{RewriteReport, rewrite_file};
use crate::utils::plural_count;
use crate::{debug, log};

/// Process one batch of build outputs.
///
/// During the precompile sub-phase nothing happens at all. Otherwise the
/// rename phase runs for production profiles only - compiled files keep
/// their originals, public-tree and extra files do not - and the rewrite
/// phase runs for every profile, so development output stays internally
/// consistent.
pub fn run(
    collection: &mut AssetCollection,
    extra: &mut [Asset],
    config: &RestampConfig,
    profile: Profile,
    phase: RunPhase,
) -> Result<RewriteReport> {
    let mut report = RewriteReport::default();
    if phase.is_precompile() {
        debug!("pipeline"; "precompile sub-phase, skipping");
        return Ok(report);
    }

    let public_root = config.public_root();

    // Logical web paths, captured before any rename mutates the records
    let logical: Vec<String> = collection
        .public
        .iter()
        .chain(collection.compiled.iter())
        .map(|a| web_path(a.disk_path(), &public_root))
        .collect();

    if profile.is_production() {
        log!(
            "rename";
            "fingerprinting {}",
            plural_count(collection.len() + extra.len(), "file")
        );
        rename_all(&mut collection.compiled, false)?;
        rename_all(&mut collection.public, true)?;
        rename_all(extra, true)?;
    }

    let registry = AssetRegistry::new(
        &collection.public,
        FallbackRoots::new(config.assets_source_root(), public_root.clone()),
    );
    debug!("rewrite"; "resolving against {}", plural_count(registry.len(), "public asset"));

    for asset in &collection.compiled {
        let path = asset.disk_path();
        let label = path
            .strip_prefix(&config.root)
            .unwrap_or(path)
            .display()
            .to_string();
        rewrite_file(path, &label, &registry, &public_root, &mut report)?;
    }

    if profile.is_production() && config.fingerprint.manifest {
        let digested = collection
            .public
            .iter()
            .chain(collection.compiled.iter())
            .map(|a| web_path(a.disk_path(), &public_root));
        let path = manifest::write_manifest(logical.into_iter().zip(digested), &public_root)?;
        debug!("pipeline"; "wrote {}", path.display());
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::{extra_assets, scan_collection};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn test_config(root: &Path) -> RestampConfig {
        let mut config = RestampConfig::default();
        config.root = root.to_path_buf();
        config
    }

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    /// A minimal project: one stylesheet referencing one image, with the
    /// image present in both the source and public trees.
    fn fixture(dir: &TempDir) -> RestampConfig {
        write(&dir.path().join("app/assets/images/logo.png"), "png bytes");
        write(&dir.path().join("public/images/logo.png"), "png bytes");
        write(
            &dir.path().join("public/css/app.css"),
            "background: asset-url('images/logo.png');",
        );
        test_config(dir.path())
    }

    fn find_file(dir: &Path, prefix: &str, suffix: &str) -> Option<std::path::PathBuf> {
        fs::read_dir(dir)
            .ok()?
            .filter_map(Result::ok)
            .map(|e| e.path())
            .find(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with(prefix) && n.ends_with(suffix))
            })
    }

    #[test]
    fn test_production_run_renames_and_rewrites() {
        let dir = TempDir::new().unwrap();
        let config = fixture(&dir);

        let mut collection = scan_collection(&config).unwrap();
        let mut extra = extra_assets(&config);
        let report = run(
            &mut collection,
            &mut extra,
            &config,
            Profile::Production,
            RunPhase::Normal,
        )
        .unwrap();
        assert!(report.is_clean());

        // Public image: only the digested copy remains
        let images = dir.path().join("public/images");
        assert!(!images.join("logo.png").exists());
        let digested_logo = find_file(&images, "logo-", ".png").unwrap();

        // Compiled stylesheet: original kept alongside the digested copy
        let css_dir = dir.path().join("public/css");
        assert!(css_dir.join("app.css").exists());
        let digested_css = find_file(&css_dir, "app-", ".css").unwrap();

        // The digested stylesheet points at the digested image
        let css = fs::read_to_string(&digested_css).unwrap();
        let expected = format!(
            "background: url(/images/{});",
            digested_logo.file_name().unwrap().to_str().unwrap()
        );
        assert_eq!(css, expected);
    }

    #[test]
    fn test_production_run_writes_manifest() {
        let dir = TempDir::new().unwrap();
        let config = fixture(&dir);

        let mut collection = scan_collection(&config).unwrap();
        run(
            &mut collection,
            &mut [],
            &config,
            Profile::Production,
            RunPhase::Normal,
        )
        .unwrap();

        let manifest_path = dir.path().join("public/manifest.json");
        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&manifest_path).unwrap()).unwrap();

        let logo = json["/images/logo.png"].as_str().unwrap();
        assert!(logo.starts_with("/images/logo-"));
        let css = json["/css/app.css"].as_str().unwrap();
        assert!(css.starts_with("/css/app-"));
    }

    #[test]
    fn test_development_run_rewrites_without_renaming() {
        let dir = TempDir::new().unwrap();
        let config = fixture(&dir);

        let mut collection = scan_collection(&config).unwrap();
        let report = run(
            &mut collection,
            &mut [],
            &config,
            Profile::Development,
            RunPhase::Normal,
        )
        .unwrap();
        assert!(report.is_clean());

        // No renames in development
        assert!(dir.path().join("public/images/logo.png").exists());
        assert!(!dir.path().join("public/manifest.json").exists());

        // References still resolve, to the un-digested destinations
        let css = fs::read_to_string(dir.path().join("public/css/app.css")).unwrap();
        assert_eq!(css, "background: url(/images/logo.png);");
    }

    #[test]
    fn test_precompile_phase_does_nothing() {
        let dir = TempDir::new().unwrap();
        let config = fixture(&dir);

        let mut collection = scan_collection(&config).unwrap();
        let report = run(
            &mut collection,
            &mut [],
            &config,
            Profile::Production,
            RunPhase::Precompile,
        )
        .unwrap();
        assert!(report.is_clean());

        // Tree is byte-identical to the fixture
        assert!(dir.path().join("public/images/logo.png").exists());
        assert_eq!(
            fs::read_to_string(dir.path().join("public/css/app.css")).unwrap(),
            "background: asset-url('images/logo.png');"
        );
    }

    #[test]
    fn test_unresolved_reference_does_not_abort_run() {
        let dir = TempDir::new().unwrap();
        let config = fixture(&dir);
        write(
            &dir.path().join("public/css/extra.css"),
            "a: asset-url('missing.png'); b: asset-path('images/logo.png');",
        );

        let mut collection = scan_collection(&config).unwrap();
        let report = run(
            &mut collection,
            &mut [],
            &config,
            Profile::Production,
            RunPhase::Normal,
        )
        .unwrap();

        assert_eq!(report.unresolved_count(), 1);
        let (_, issues) = report.unresolved.iter().next().unwrap();
        assert_eq!(issues[0].target, "missing.png");

        // The resolvable reference in the same file was still rewritten
        let css_dir = dir.path().join("public/css");
        let digested_extra = find_file(&css_dir, "extra-", ".css").unwrap();
        let css = fs::read_to_string(&digested_extra).unwrap();
        assert!(css.contains("asset-url('missing.png')"));
        assert!(css.contains("b: /images/logo-"));
    }

    #[test]
    fn test_extra_files_renamed_with_removal() {
        let dir = TempDir::new().unwrap();
        let mut config = fixture(&dir);
        write(&dir.path().join("public/legacy.css"), "old styles");
        config.fingerprint.files = vec![std::path::PathBuf::from("public/legacy.css")];
        // Keep legacy.css out of the scanned compiled set for this test
        config.fingerprint.rewrite_extensions = vec!["nomatch".to_string()];

        let mut collection = scan_collection(&config).unwrap();
        collection.public.retain(|a| !a.disk_path().ends_with("legacy.css"));
        let mut extra = extra_assets(&config);

        run(
            &mut collection,
            &mut extra,
            &config,
            Profile::Production,
            RunPhase::Normal,
        )
        .unwrap();

        assert!(!dir.path().join("public/legacy.css").exists());
        assert!(find_file(dir.path().join("public").as_path(), "legacy-", ".css").is_some());
    }
}
