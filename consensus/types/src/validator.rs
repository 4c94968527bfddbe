use pqsig::PublicKeyBytes;
use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use tree_hash_derive::TreeHash;

use crate::config::preset::PUBKEY_BYTES;

/// A validator's static identity as carried in `State::validators`.
///
/// The core never mutates a validator's public key after genesis;
/// key-lifecycle management beyond load-at-start is out of scope
/// (`spec.md` §1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode, TreeHash)]
pub struct Validator {
    pub pubkey: PublicKeyBytes,
}

impl Validator {
    pub fn from_pubkey_bytes(bytes: [u8; PUBKEY_BYTES]) -> Self {
        Validator {
            pubkey: PublicKeyBytes::from(bytes.to_vec()),
        }
    }
}

/// `true` iff `validator_index` is the designated proposer for `slot`
/// under a registry of `num_validators` validators.
///
/// `spec.md` §3: `proposer_index = slot mod num_validators`.
pub fn is_proposer(validator_index: u64, slot: u64, num_validators: u64) -> bool {
    num_validators != 0 && validator_index == slot % num_validators
}
