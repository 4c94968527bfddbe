use pqsig::Signature;
use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use tree_hash_derive::TreeHash;

use crate::checkpoint::Checkpoint;

/// The content of a vote: the slot it was cast at, plus the head, target
/// and source checkpoints the validator is attesting to (`spec.md` §3).
///
/// Invariant: `source.slot <= target.slot <= slot`.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Encode, Decode, TreeHash,
)]
pub struct AttestationData {
    pub slot: u64,
    pub head: Checkpoint,
    pub target: Checkpoint,
    pub source: Checkpoint,
}

/// A signed vote from a single validator.
///
/// `validator_id` must be `< num_validators`; the signature is verified
/// against that validator's public key at `epoch = message.slot`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode, TreeHash)]
pub struct SignedAttestation {
    pub validator_id: u64,
    pub message: AttestationData,
    pub signature: Signature,
}
