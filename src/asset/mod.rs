//! Asset records, content digests, and the rename pass.

mod digest;
mod record;
mod rename;
mod scan;

pub use digest::{ContentHash, digested_file_name, digested_name, hash_file};
pub use record::{Asset, AssetCollection};
pub use rename::rename_all;
pub use scan::{extra_assets, scan_collection};
