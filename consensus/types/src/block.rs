use alloy_primitives::B256;
use pqsig::Signature;
use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use ssz_types::{typenum::U4096, VariableList};
use tree_hash::TreeHash;
use tree_hash_derive::TreeHash;

use crate::attestation::SignedAttestation;

/// Bound on the number of attestations a single block body may carry,
/// `VALIDATOR_REGISTRY_LIMIT` from the `mainnet` preset.
pub type MaxAttestationsPerBlock = U4096;

/// The body of a block: an ordered sequence of signed attestations.
/// `spec.md` §3: every attestation must already have been verified
/// before inclusion.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode, TreeHash)]
pub struct BlockBody {
    pub attestations: VariableList<SignedAttestation, MaxAttestationsPerBlock>,
}

/// The canonical block as constructed by a proposer.
///
/// `proposer_index` must equal `slot mod num_validators`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode, TreeHash)]
pub struct Block {
    pub slot: u64,
    pub proposer_index: u64,
    pub parent_root: B256,
    pub state_root: B256,
    pub body: BlockBody,
}

impl Block {
    /// Construct the `BlockHeader` this block will install once processed
    /// — `body_root` is the tree-hash root of `body`; `state_root` is
    /// whatever the block carries (temporarily `B256::ZERO` until the
    /// state-transition backfills it, per `spec.md` §4.3).
    pub fn to_header(&self) -> BlockHeader {
        BlockHeader {
            slot: self.slot,
            proposer_index: self.proposer_index,
            parent_root: self.parent_root,
            state_root: self.state_root,
            body_root: self.body.tree_hash_root(),
        }
    }
}

/// A compact, body-less reference to a block, carried inside `State` as
/// `latest_block_header`.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Encode, Decode, TreeHash,
)]
pub struct BlockHeader {
    pub slot: u64,
    pub proposer_index: u64,
    pub parent_root: B256,
    pub state_root: B256,
    pub body_root: B256,
}

/// A block together with the proposer's signature over its tree-hash root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode, TreeHash)]
pub struct SignedBlock {
    pub message: Block,
    pub signature: Signature,
}
