use ssz_types::BitList;
use tree_hash::TreeHash;
use types::{Block, BlockHeader, State};

use crate::errors::BlockProcessingError;

/// `process_block_header` (`spec.md` §4.3).
///
/// Validates that `block` chains from `state.latest_block_header`,
/// records the outgoing header's root into `historical_block_hashes`
/// (back-filling `B256::ZERO`/`false` for any skipped slots), and
/// installs the new header with `state_root` left at zero.
pub fn process_block_header(state: &mut State, block: &Block) -> Result<(), BlockProcessingError> {
    if block.slot != state.slot {
        return Err(BlockProcessingError::InvalidLatestBlockHeader {
            block_slot: block.slot,
            state_slot: state.slot,
            latest_header_slot: state.latest_block_header.slot,
        });
    }
    if block.slot <= state.latest_block_header.slot {
        return Err(BlockProcessingError::InvalidLatestBlockHeader {
            block_slot: block.slot,
            state_slot: state.slot,
            latest_header_slot: state.latest_block_header.slot,
        });
    }

    let expected_proposer = block.slot % state.num_validators();
    if block.proposer_index != expected_proposer {
        return Err(BlockProcessingError::InvalidProposer {
            expected: expected_proposer,
            found: block.proposer_index,
        });
    }

    let parent_header_root = state.latest_block_header.tree_hash_root();
    if block.parent_root != parent_header_root {
        return Err(BlockProcessingError::InvalidParentRoot {
            expected: parent_header_root,
            found: block.parent_root,
        });
    }

    // First block after genesis: the parent (the genesis block) becomes
    // both justified and finalized.
    if state.latest_block_header.slot == 0 {
        state.latest_justified.root = block.parent_root;
        state.latest_finalized.root = block.parent_root;
    }

    // The parent is now attestable: record it at its slot index.
    state
        .historical_block_hashes
        .push(block.parent_root)
        .expect("historical_block_hashes within HISTORICAL_ROOTS_LIMIT");

    let genesis_parent = state.latest_block_header.slot == 0;
    append_justified_bit(state, genesis_parent);

    // Back-fill any skipped slots between the previous header and this block.
    let num_empty_slots = block.slot - state.latest_block_header.slot - 1;
    for _ in 0..num_empty_slots {
        state
            .historical_block_hashes
            .push(types::Root::ZERO)
            .expect("historical_block_hashes within HISTORICAL_ROOTS_LIMIT");
        append_justified_bit(state, false);
    }

    state.latest_block_header = BlockHeader {
        slot: block.slot,
        proposer_index: block.proposer_index,
        parent_root: block.parent_root,
        state_root: types::Root::ZERO,
        body_root: block.body.tree_hash_root(),
    };

    Ok(())
}

/// Append a single bit to `state.justified_slots`, growing its declared
/// length by one while preserving every existing bit.
fn append_justified_bit(state: &mut State, value: bool) {
    let length = state.justified_slots.len();
    let mut grown = BitList::with_capacity(length + 1)
        .expect("justified_slots within HISTORICAL_ROOTS_LIMIT");
    grown
        .set(length, value)
        .expect("index `length` is in bounds of a list of length `length + 1`");
    state.justified_slots = grown.union(&state.justified_slots);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::per_slot_processing::process_slots;
    use tree_hash::TreeHash;
    use types::{BlockBody, GenesisSpec};

    fn genesis(n: usize) -> State {
        let validators = (0..n)
            .map(|i| {
                let mut bytes = [0u8; 52];
                bytes[0] = i as u8;
                types::Validator::from_pubkey_bytes(bytes)
            })
            .collect();
        State::genesis(GenesisSpec {
            genesis_time: 0,
            validators,
        })
    }

    #[test]
    fn first_block_justifies_and_finalizes_genesis() {
        let mut state = genesis(2);
        process_slots(&mut state, 1).unwrap();

        let genesis_header_root = state.latest_block_header.tree_hash_root();
        let block = Block {
            slot: 1,
            proposer_index: 1,
            parent_root: genesis_header_root,
            state_root: types::Root::ZERO,
            body: BlockBody::default(),
        };

        process_block_header(&mut state, &block).unwrap();

        assert_eq!(state.latest_finalized.root, genesis_header_root);
        assert_eq!(state.latest_justified.root, genesis_header_root);
        assert_eq!(state.historical_block_hashes.len(), 1);
        assert_eq!(state.historical_block_hashes[0], genesis_header_root);
        assert_eq!(state.justified_slots.len(), 1);
        assert!(state.justified_slots.get(0).unwrap());
        assert_eq!(state.latest_block_header.state_root, types::Root::ZERO);
    }

    #[test]
    fn wrong_slot_is_rejected() {
        let mut state = genesis(2);
        process_slots(&mut state, 1).unwrap();
        let parent_root = state.latest_block_header.tree_hash_root();

        let block = Block {
            slot: 2,
            proposer_index: 1,
            parent_root,
            state_root: types::Root::ZERO,
            body: BlockBody::default(),
        };

        assert!(process_block_header(&mut state, &block).is_err());
    }

    #[test]
    fn wrong_proposer_is_rejected() {
        let mut state = genesis(2);
        process_slots(&mut state, 1).unwrap();
        let parent_root = state.latest_block_header.tree_hash_root();

        let block = Block {
            slot: 1,
            proposer_index: 0,
            parent_root,
            state_root: types::Root::ZERO,
            body: BlockBody::default(),
        };

        assert_eq!(
            process_block_header(&mut state, &block).unwrap_err(),
            BlockProcessingError::InvalidProposer {
                expected: 1,
                found: 0
            }
        );
    }

    #[test]
    fn wrong_parent_root_is_rejected() {
        let mut state = genesis(2);
        process_slots(&mut state, 1).unwrap();

        let block = Block {
            slot: 1,
            proposer_index: 1,
            parent_root: types::Root::repeat_byte(0xde),
            state_root: types::Root::ZERO,
            body: BlockBody::default(),
        };

        assert!(matches!(
            process_block_header(&mut state, &block),
            Err(BlockProcessingError::InvalidParentRoot { .. })
        ));
    }

    #[test]
    fn skipped_slots_are_backfilled_with_zero() {
        let mut state = genesis(2);
        process_slots(&mut state, 3).unwrap();
        let parent_root = state.latest_block_header.tree_hash_root();

        let block = Block {
            slot: 3,
            proposer_index: 1,
            parent_root,
            state_root: types::Root::ZERO,
            body: BlockBody::default(),
        };
        process_block_header(&mut state, &block).unwrap();

        // Slots 0,1,2 are recorded: genesis parent at index 0, then two
        // empty slots' zero hashes at indices 1 and 2.
        assert_eq!(state.historical_block_hashes.len(), 3);
        assert_eq!(state.historical_block_hashes[0], parent_root);
        assert_eq!(state.historical_block_hashes[1], types::Root::ZERO);
        assert_eq!(state.historical_block_hashes[2], types::Root::ZERO);
        assert_eq!(state.justified_slots.len(), 3);
        assert!(state.justified_slots.get(0).unwrap());
        assert!(!state.justified_slots.get(1).unwrap());
        assert!(!state.justified_slots.get(2).unwrap());
    }
}
