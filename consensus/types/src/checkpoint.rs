use alloy_primitives::B256;
use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use tree_hash_derive::TreeHash;

/// A `(root, slot)` pair anchoring a justification or finalization claim.
///
/// The genesis checkpoint is `Checkpoint { root: B256::ZERO, slot: 0 }`.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode, TreeHash,
)]
pub struct Checkpoint {
    pub root: B256,
    pub slot: u64,
}

impl Checkpoint {
    pub const fn genesis() -> Self {
        Checkpoint {
            root: B256::ZERO,
            slot: 0,
        }
    }
}
