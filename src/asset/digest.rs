//! Content hashing and digested-name derivation using blake3.
//!
//! The digest is a pure function of file bytes: identical content always
//! yields the identical digested name, no matter what the file is called
//! or how many times it is hashed.

use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

/// Number of hex characters embedded in digested filenames.
///
/// 64 bits of the blake3 output - fixed length, filename-friendly, and
/// far beyond collision concerns for a single build's asset set.
const FILENAME_DIGEST_LEN: usize = 16;

/// A 256-bit content hash (blake3 output).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Create a new ContentHash from raw bytes.
    #[inline]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    #[inline]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Full hex rendering (64 chars).
    pub fn to_hex(self) -> String {
        hex::encode(self.0)
    }

    /// The fixed-length hex digest embedded in filenames.
    pub fn filename_digest(self) -> String {
        self.to_hex()[..FILENAME_DIGEST_LEN].to_string()
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.to_hex()[..FILENAME_DIGEST_LEN])
    }
}

/// Compute the blake3 hash of a file's contents.
///
/// Streams through a buffered reader, so large binaries never sit in
/// memory whole. An unreadable file is an error - fingerprinting must
/// never silently hash a file it could not read.
pub fn hash_file(path: &Path) -> io::Result<ContentHash> {
    let file = File::open(path)?;
    let mut reader = BufReader::with_capacity(64 * 1024, file);
    let mut hasher = blake3::Hasher::new();
    let mut buffer = [0u8; 64 * 1024];

    loop {
        match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => {
                hasher.update(&buffer[..n]);
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }

    Ok(ContentHash::new(*hasher.finalize().as_bytes()))
}

/// Derive the digested name for a file from its current contents.
///
/// `app.css` becomes `app-<digest>.css` in the same directory.
pub fn digested_name(path: &Path) -> io::Result<PathBuf> {
    let hash = hash_file(path)?;
    Ok(digested_file_name(path, &hash))
}

/// Insert a digest between a file's stem and extension (pure).
pub fn digested_file_name(path: &Path, hash: &ContentHash) -> PathBuf {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    let digest = hash.filename_digest();

    let name = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{stem}-{digest}.{ext}"),
        None => format!("{stem}-{digest}"),
    };
    path.with_file_name(name)
}
