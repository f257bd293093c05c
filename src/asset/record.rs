//! Asset records - the in-memory view of build outputs being processed.

use std::path::{Path, PathBuf};

/// A single build artifact tracked through the rename and rewrite passes.
///
/// The record outlives the on-disk original: when the rename pass removes
/// a file, the record stays valid for the rest of the batch and points at
/// the digested copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    /// Original location before the build, when known.
    pub source_path: Option<PathBuf>,

    /// Path as the file exists right now; updated in place when renamed
    /// (unless a destination path is present).
    pub current_path: PathBuf,

    /// Output location in the public tree, when differentiated from
    /// `current_path`. This is the field a rename updates when present.
    pub destination_path: Option<PathBuf>,
}

impl Asset {
    /// Create a record for a file with no separate destination.
    pub fn new(current_path: impl Into<PathBuf>) -> Self {
        Self {
            source_path: None,
            current_path: current_path.into(),
            destination_path: None,
        }
    }

    /// Create a record for a public-tree file with a differentiated
    /// destination.
    pub fn with_destination(
        current_path: impl Into<PathBuf>,
        destination_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            source_path: None,
            current_path: current_path.into(),
            destination_path: Some(destination_path.into()),
        }
    }

    /// Attach the pre-build source location.
    pub fn with_source(mut self, source_path: impl Into<PathBuf>) -> Self {
        self.source_path = Some(source_path.into());
        self
    }

    /// The on-disk path a rename pass reads and replaces: the destination
    /// when differentiated, otherwise the current path.
    pub fn disk_path(&self) -> &Path {
        self.destination_path
            .as_deref()
            .unwrap_or(&self.current_path)
    }

    /// Point the record at its digested location. Updates the destination
    /// when one is present, otherwise the current path - mirroring
    /// `disk_path`, so a record is mutated exactly once per rename pass.
    pub fn set_disk_path(&mut self, new_path: PathBuf) {
        match self.destination_path {
            Some(_) => self.destination_path = Some(new_path),
            None => self.current_path = new_path,
        }
    }
}

/// Build outputs for one compilation batch, partitioned by the caller.
#[derive(Debug, Default)]
pub struct AssetCollection {
    /// Every compiled file in the batch. These are the reference-rewriting
    /// targets; their originals survive the rename pass.
    pub compiled: Vec<Asset>,

    /// The subset copied into the public tree. These are the resolution
    /// targets for asset references; their originals are removed once the
    /// digested copy exists.
    pub public: Vec<Asset>,
}

impl AssetCollection {
    /// Total number of tracked assets.
    pub fn len(&self) -> usize {
        self.compiled.len() + self.public.len()
    }

    /// Check if the batch is empty.
    pub fn is_empty(&self) -> bool {
        self.compiled.is_empty() && self.public.is_empty()
    }
}
