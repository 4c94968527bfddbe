//! Data-dir / network-dir path helpers (`spec.md` §6 CLI surface: "data
//! directory (for Store)", "network directory (for keys)").

use std::path::{Path, PathBuf};

pub const DEFAULT_ROOT_DIR: &str = ".lean";
pub const DEFAULT_NETWORK_DIR: &str = "network";
pub const DEFAULT_STORE_DIR: &str = "store";

/// Ensure `path` exists as a directory, creating it (and its parents) if
/// necessary.
pub fn ensure_dir_exists(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// The subdirectory of `data_dir` the `Store` backend opens.
pub fn store_dir(data_dir: &Path) -> PathBuf {
    data_dir.join(DEFAULT_STORE_DIR)
}

/// The subdirectory of `data_dir` holding network identity / gossip keys.
pub fn network_dir(data_dir: &Path) -> PathBuf {
    data_dir.join(DEFAULT_NETWORK_DIR)
}
