use alloy_primitives::B256;

/// The STF failure taxonomy (`spec.md` §4.3).
///
/// These are never surfaced to the user as node-level failures: the
/// executor catches them, discards the offending block, and continues
/// ingestion with the next event (`spec.md` §7).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockProcessingError {
    /// `process_slots` was called with `target_slot <= state.slot`.
    InvalidPreState { state_slot: u64, target_slot: u64 },
    /// `block.slot != state.slot`, or `block.slot <= latest_block_header.slot`.
    InvalidLatestBlockHeader {
        block_slot: u64,
        state_slot: u64,
        latest_header_slot: u64,
    },
    /// `block.proposer_index != block.slot mod num_validators`.
    InvalidProposer { expected: u64, found: u64 },
    /// `block.parent_root != tree_hash(state.latest_block_header)`.
    InvalidParentRoot { expected: B256, found: B256 },
    /// `tree_hash(state) != block.state_root` under `validate_result = true`.
    InvalidPostState { expected: B256, computed: B256 },
    /// A candidate justification target slot fails `is_justifiable_slot`.
    InvalidJustifiableSlot {
        finalized_slot: u64,
        candidate_slot: u64,
    },
    /// An attestation's `validator_id >= num_validators`.
    InvalidValidatorId { validator_id: u64, num_validators: u64 },
    /// The proposer signature, or one of the attestation signatures, did
    /// not verify.
    InvalidBlockSignatures,
    /// Reserved for an execution-payload timestamp check that has no
    /// corresponding path in a lean-consensus devnet with no execution
    /// layer (`spec.md` §9, Open Question (a)). Never constructed; kept
    /// only so the taxonomy matches the reference one variant-for-variant.
    InvalidExecutionPayloadHeaderTimestamp,
}

impl std::fmt::Display for BlockProcessingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::error::Error for BlockProcessingError {}
