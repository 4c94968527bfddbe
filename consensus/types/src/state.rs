use alloy_primitives::B256;
use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use ssz_types::{
    typenum::{U1073741824, U262144, U4096},
    BitList, VariableList,
};
use tree_hash::TreeHash;
use tree_hash_derive::TreeHash;

use crate::{
    block::{Block, BlockBody, BlockHeader},
    checkpoint::Checkpoint,
    config::Config,
    validator::Validator,
};

/// Bound on `historical_block_hashes` / `justified_slots`: `HISTORICAL_ROOTS_LIMIT`.
pub type MaxHistoricalRoots = U262144;
/// Bound on `validators`: `VALIDATOR_REGISTRY_LIMIT`.
pub type MaxValidators = U4096;
/// Bound on `justifications_roots`: one entry per distinct targeted root,
/// itself bounded by the number of historical roots.
pub type MaxJustificationRoots = U262144;
/// Bound on the flattened `justifications_validators` bitlist:
/// `MaxJustificationRoots * MaxValidators` bits, rounded up to a power of
/// two typenum for convenience (the reference uses `2^30`).
pub type MaxJustificationBits = U1073741824;

/// The canonical per-node replicated state (`spec.md` §3).
///
/// Invariants (checked by `state_processing`, not by this type):
/// `len(historical_block_hashes) == len(justified_slots) == slot`; each
/// root in `justifications_roots` has exactly `validators.len()` bits in
/// the matching slice of `justifications_validators`; roots are stored
/// in ascending byte order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode, TreeHash)]
pub struct State {
    pub config: Config,
    pub slot: u64,
    pub latest_block_header: BlockHeader,

    pub latest_justified: Checkpoint,
    pub latest_finalized: Checkpoint,

    pub historical_block_hashes: VariableList<B256, MaxHistoricalRoots>,
    pub justified_slots: BitList<MaxHistoricalRoots>,

    pub validators: VariableList<Validator, MaxValidators>,

    pub justifications_roots: VariableList<B256, MaxJustificationRoots>,
    pub justifications_validators: BitList<MaxJustificationBits>,
}

/// The inputs needed to construct a genesis `State` (`spec.md` §6,
/// "Genesis configuration").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisSpec {
    pub genesis_time: u64,
    pub validators: Vec<Validator>,
}

impl State {
    /// Construct the genesis state for `spec`. The genesis checkpoint and
    /// the zero block header match `spec.md` §3: a zero-root,
    /// zero-slot checkpoint, and a header whose `body_root` commits to an
    /// empty body.
    pub fn genesis(spec: GenesisSpec) -> Self {
        let body_root = BlockBody::default().tree_hash_root();

        State {
            config: Config {
                genesis_time: spec.genesis_time,
            },
            slot: 0,
            latest_block_header: BlockHeader {
                slot: 0,
                proposer_index: 0,
                parent_root: B256::ZERO,
                state_root: B256::ZERO,
                body_root,
            },
            latest_justified: Checkpoint::genesis(),
            latest_finalized: Checkpoint::genesis(),
            historical_block_hashes: VariableList::empty(),
            justified_slots: BitList::with_capacity(0).expect("capacity 0 is always valid"),
            validators: VariableList::try_from(spec.validators).expect("validators within limit"),
            justifications_roots: VariableList::empty(),
            justifications_validators: BitList::with_capacity(0)
                .expect("capacity 0 is always valid"),
        }
    }

    pub fn num_validators(&self) -> u64 {
        self.validators.len() as u64
    }

    pub fn is_proposer(&self, validator_index: u64) -> bool {
        crate::validator::is_proposer(validator_index, self.slot, self.num_validators())
    }

    /// Construct the (unsigned) block header for `block` with `state_root`
    /// left at zero — the shape installed by `process_block_header` before
    /// the following `process_slots` call backfills it.
    pub fn header_for(block: &Block) -> BlockHeader {
        let mut header = block.to_header();
        header.state_root = B256::ZERO;
        header
    }
}
