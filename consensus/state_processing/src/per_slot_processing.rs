use tree_hash::TreeHash;
use types::State;

use crate::errors::BlockProcessingError;

/// `process_slots(state, target_slot)` (`spec.md` §4.3): advance `state`
/// one slot at a time up to (and including) `target_slot`, backfilling
/// the outgoing header's `state_root` the first time it is still zero.
///
/// Idempotent in the sense `spec.md` §8 requires: calling this with
/// `target_slot == state.slot` is rejected outright (there is nothing to
/// advance), and once a header's `state_root` has been backfilled a
/// second pass over the same slot range never touches it again.
pub fn process_slots(state: &mut State, target_slot: u64) -> Result<(), BlockProcessingError> {
    if target_slot <= state.slot {
        return Err(BlockProcessingError::InvalidPreState {
            state_slot: state.slot,
            target_slot,
        });
    }

    while state.slot < target_slot {
        process_slot(state);
        state.slot += 1;
    }

    Ok(())
}

/// Close out the previous block's header by writing in the pre-state
/// tree-hash root, iff it hasn't been written already.
fn process_slot(state: &mut State) {
    if state.latest_block_header.state_root == types::Root::ZERO {
        state.latest_block_header.state_root = state.tree_hash_root();
    }
}
