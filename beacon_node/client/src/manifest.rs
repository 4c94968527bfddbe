use ssz_derive::{Decode, Encode};
use types::Root;

/// A tiny on-disk record of the last-known finalized/head roots,
/// written after every fork-choice update and read back at startup.
///
/// The Store contract (`spec.md` §4.4) is deliberately small (has/get/
/// put by root); it has no notion of "which root is currently head", so
/// this manifest is what lets `Client::start` satisfy `spec.md` §6's
/// crash-consistency requirement without widening that contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode)]
pub struct RecoveryManifest {
    pub finalized_root: Root,
    pub finalized_slot: u64,
    pub head_root: Root,
    pub head_slot: u64,
}

impl RecoveryManifest {
    pub fn path(data_dir: &std::path::Path) -> std::path::PathBuf {
        data_dir.join("HEAD")
    }

    pub fn load(data_dir: &std::path::Path) -> std::io::Result<Option<Self>> {
        use ssz::Decode;

        let path = Self::path(data_dir);
        if !path.exists() {
            return Ok(None);
        }
        let bytes = std::fs::read(path)?;
        Ok(Self::from_ssz_bytes(&bytes).ok())
    }

    pub fn save(&self, data_dir: &std::path::Path) -> std::io::Result<()> {
        use ssz::Encode;
        std::fs::write(Self::path(data_dir), self.as_ssz_bytes())
    }
}
