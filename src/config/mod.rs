//! Configuration management for `restamp.toml`.
//!
//! # Sections
//!
//! | Section         | Purpose                                             |
//! |-----------------|-----------------------------------------------------|
//! | `[paths]`       | Source asset tree and public output tree            |
//! | `[fingerprint]` | Extra files, rewrite extensions, manifest toggle    |
//!
//! The config file is located by walking upward from the current directory
//! (like git). A missing file is fine - every field has a default - unless
//! the user pointed at one explicitly with `--config`.

mod error;

pub use error::ConfigError;

use crate::log;
use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Default config file name, searched upward from cwd.
pub const CONFIG_FILE_NAME: &str = "restamp.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing restamp.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestampConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Directory layout
    #[serde(default)]
    pub paths: PathsConfig,

    /// Fingerprinting behavior
    #[serde(default)]
    pub fingerprint: FingerprintConfig,
}

impl Default for RestampConfig {
    fn default() -> Self {
        Self {
            config_path: PathBuf::new(),
            root: PathBuf::new(),
            paths: PathsConfig::default(),
            fingerprint: FingerprintConfig::default(),
        }
    }
}

/// `[paths]` - directory layout of the project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Source asset tree, used by the glob-fallback resolution strategy
    #[serde(default = "default_assets_source_root")]
    pub assets_source_root: PathBuf,

    /// Public output tree - the served root; digested files and the
    /// manifest land here
    #[serde(default = "default_public_root")]
    pub public_root: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            assets_source_root: default_assets_source_root(),
            public_root: default_public_root(),
        }
    }
}

fn default_assets_source_root() -> PathBuf {
    PathBuf::from("app/assets")
}

fn default_public_root() -> PathBuf {
    PathBuf::from("public")
}

/// `[fingerprint]` - what gets fingerprinted and rewritten
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FingerprintConfig {
    /// Extra files to fingerprint, relative to the project root
    #[serde(default)]
    pub files: Vec<PathBuf>,

    /// Extensions of compiled files scanned for asset references
    #[serde(default = "default_rewrite_extensions")]
    pub rewrite_extensions: Vec<String>,

    /// Emit manifest.json into the public root after a production run
    #[serde(default = "default_manifest")]
    pub manifest: bool,
}

impl Default for FingerprintConfig {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            rewrite_extensions: default_rewrite_extensions(),
            manifest: default_manifest(),
        }
    }
}

fn default_rewrite_extensions() -> Vec<String> {
    vec!["css".to_string()]
}

fn default_manifest() -> bool {
    true
}

// ============================================================================
// loading
// ============================================================================

impl RestampConfig {
    /// Load configuration.
    ///
    /// Resolution order: explicit `--config` path (missing file is an
    /// error), else upward search for `restamp.toml` from cwd, else all
    /// defaults rooted at cwd. `root_override` wins over the config file's
    /// directory as project root.
    pub fn load(explicit: Option<&Path>, root_override: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => {
                if !path.exists() {
                    bail!("config file not found: {}", path.display());
                }
                Self::load_file(path)?
            }
            None => match find_config_file(Path::new(CONFIG_FILE_NAME)) {
                Some(path) => Self::load_file(&path)?,
                None => {
                    let mut config = Self::default();
                    config.root = std::env::current_dir()?;
                    config
                }
            },
        };

        if let Some(root) = root_override {
            config.root = root
                .canonicalize()
                .map_err(|e| ConfigError::Io(root.to_path_buf(), e))?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Read and parse a config file, warning about unknown fields.
    fn load_file(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;

        let (mut config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            print_unknown_fields_warning(&ignored, path);
        }

        config.config_path = path
            .canonicalize()
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        config.root = config
            .config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    /// Reject configurations that cannot work.
    fn validate(&self) -> Result<()> {
        if self.fingerprint.rewrite_extensions.is_empty() {
            bail!(ConfigError::Validation(
                "fingerprint.rewrite_extensions must not be empty".to_string()
            ));
        }
        for ext in &self.fingerprint.rewrite_extensions {
            if ext.starts_with('.') {
                bail!(ConfigError::Validation(format!(
                    "fingerprint.rewrite_extensions entries are bare extensions, got `{ext}`"
                )));
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // path accessors
    // ------------------------------------------------------------------------

    /// Join a path to the project root (absolute paths pass through).
    pub fn root_join(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Absolute path of the source asset tree.
    pub fn assets_source_root(&self) -> PathBuf {
        self.root_join(&self.paths.assets_source_root)
    }

    /// Absolute path of the public output tree.
    pub fn public_root(&self) -> PathBuf {
        self.root_join(&self.paths.public_root)
    }

    /// Absolute paths of the configured extra files (order preserved).
    pub fn extra_files(&self) -> Vec<PathBuf> {
        self.fingerprint
            .files
            .iter()
            .map(|f| self.root_join(f))
            .collect()
    }

    /// Check if a file's extension marks it as a rewritable compiled file.
    pub fn is_rewritable(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                self.fingerprint
                    .rewrite_extensions
                    .iter()
                    .any(|e| e == ext)
            })
    }
}

/// Print warning about unknown fields.
fn print_unknown_fields_warning(fields: &[String], path: &Path) {
    let display_path = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_else(|| path.to_string_lossy());
    log!("warning"; "unknown fields in {}, ignoring:", display_path);
    for field in fields {
        eprintln!("- {}", field);
    }
}

/// Find config file by searching upward from current directory
///
/// Starts from cwd and walks up parent directories until finding `config_name`
/// Returns the absolute path to the config file if found
fn find_config_file(config_name: &Path) -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;

    if config_name.is_absolute() && config_name.exists() {
        return Some(config_name.to_path_buf());
    }

    let mut current = cwd.as_path();
    loop {
        let candidate = current.join(config_name);
        if candidate.exists() {
            return Some(candidate);
        }

        match current.parent() {
            Some(parent) => current = parent,
            None => return None,
        }
    }
}

// ============================================================================
// tests
// ============================================================================
