//! The state-transition function, §4.3 of `spec.md`: `process_slots`,
//! `process_block_header`, `process_attestations` and the top-level
//! `apply_transition` orchestrator that strings them together the way a
//! node applies an incoming `SignedBlock` to its current `State`.

mod errors;
mod per_block_processing;
mod per_slot_processing;

pub use errors::BlockProcessingError;
pub use per_block_processing::{process_attestations, process_block, process_block_header};
pub use per_slot_processing::process_slots;

use pqsig::XmssPrimitive;
use tree_hash::TreeHash;
use types::{SignedBlock, State};

/// Which of the two optional validation passes `apply_transition` runs.
///
/// Both default to `true`; a caller that has already checked signatures
/// (e.g. when replaying blocks it produced itself) or that doesn't need
/// the post-state root checked against the block's claim (e.g. when
/// computing a tentative post-state to sign) can turn either off.
#[derive(Debug, Clone, Copy)]
pub struct ApplyTransitionOpts {
    pub verify_signatures: bool,
    pub validate_result: bool,
}

impl Default for ApplyTransitionOpts {
    fn default() -> Self {
        ApplyTransitionOpts {
            verify_signatures: true,
            validate_result: true,
        }
    }
}

/// Apply `signed_block` to `state` in place (`spec.md` §4.3,
/// `apply_transition`).
///
/// Advances `state` to `signed_block.message.slot` (backfilling skipped
/// slots), optionally verifies the proposer signature and every
/// attestation signature, runs `process_block`, and optionally checks the
/// resulting tree-hash root against `signed_block.message.state_root`.
pub fn apply_transition<P: XmssPrimitive>(
    state: &mut State,
    signed_block: &SignedBlock,
    opts: ApplyTransitionOpts,
) -> Result<(), BlockProcessingError> {
    let block = &signed_block.message;

    if state.slot < block.slot {
        process_slots(state, block.slot)?;
    } else if state.slot > block.slot {
        return Err(BlockProcessingError::InvalidPreState {
            state_slot: state.slot,
            target_slot: block.slot,
        });
    }

    if opts.verify_signatures {
        verify_block_signatures::<P>(state, signed_block)?;
    }

    process_block(state, block)?;

    if opts.validate_result {
        let computed = state.tree_hash_root();
        if computed != block.state_root {
            return Err(BlockProcessingError::InvalidPostState {
                expected: block.state_root,
                computed,
            });
        }
    }

    Ok(())
}

/// The proposer signs `tree_hash(block)` at `epoch = block.slot`; each
/// attestation signs `tree_hash(message)` at `epoch = message.slot`
/// (`spec.md` §4.2 / §8).
fn verify_block_signatures<P: XmssPrimitive>(
    state: &State,
    signed_block: &SignedBlock,
) -> Result<(), BlockProcessingError> {
    let block = &signed_block.message;
    let num_validators = state.num_validators();

    if block.proposer_index >= num_validators {
        return Err(BlockProcessingError::InvalidProposer {
            expected: block.slot % num_validators.max(1),
            found: block.proposer_index,
        });
    }
    let proposer = &state.validators[block.proposer_index as usize];
    let block_root = block.tree_hash_root();
    if !pqsig::verify::<P>(&proposer.pubkey, block_root.0, block.slot as u32, &signed_block.signature) {
        return Err(BlockProcessingError::InvalidBlockSignatures);
    }

    for attestation in block.body.attestations.iter() {
        if attestation.validator_id >= num_validators {
            return Err(BlockProcessingError::InvalidValidatorId {
                validator_id: attestation.validator_id,
                num_validators,
            });
        }
        let validator = &state.validators[attestation.validator_id as usize];
        let data_root = attestation.message.tree_hash_root();
        if !pqsig::verify::<P>(
            &validator.pubkey,
            data_root.0,
            attestation.message.slot as u32,
            &attestation.signature,
        ) {
            return Err(BlockProcessingError::InvalidBlockSignatures);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pqsig::{Keypair, MockXmss};
    use types::{AttestationData, Block, BlockBody, Checkpoint, GenesisSpec, Validator};

    struct Node {
        keypairs: Vec<Keypair<MockXmss>>,
    }

    fn genesis(n: usize) -> (State, Node) {
        let keypairs: Vec<_> = (0..n)
            .map(|i| Keypair::<MockXmss>::generate(format!("v{i}").as_bytes(), 0, 1_000_000))
            .collect();
        let validators = keypairs
            .iter()
            .map(|kp| Validator {
                pubkey: kp.public_key.clone(),
            })
            .collect();
        let state = State::genesis(GenesisSpec {
            genesis_time: 0,
            validators,
        });
        (state, Node { keypairs })
    }

    #[test]
    fn well_formed_block_applies_cleanly() {
        let (mut state, mut node) = genesis(2);

        let parent_root = state.latest_block_header.tree_hash_root();
        let mut block = Block {
            slot: 1,
            proposer_index: 1,
            parent_root,
            state_root: types::Root::ZERO,
            body: BlockBody::default(),
        };

        let mut trial_state = state.clone();
        process_slots(&mut trial_state, 1).unwrap();
        process_block(&mut trial_state, &block).unwrap();
        block.state_root = trial_state.tree_hash_root();

        let signature = node.keypairs[1]
            .sign(block.tree_hash_root().0, block.slot as u32)
            .unwrap();
        let signed_block = SignedBlock {
            message: block,
            signature,
        };

        apply_transition::<MockXmss>(&mut state, &signed_block, ApplyTransitionOpts::default())
            .unwrap();

        assert_eq!(state.slot, 1);
        assert_eq!(state.tree_hash_root(), signed_block.message.state_root);
    }

    #[test]
    fn forged_proposer_signature_is_rejected() {
        let (mut state, node) = genesis(2);
        let parent_root = state.latest_block_header.tree_hash_root();
        let block = Block {
            slot: 1,
            proposer_index: 1,
            parent_root,
            state_root: types::Root::ZERO,
            body: BlockBody::default(),
        };

        // Sign with the wrong validator's key.
        let mut wrong_signer = Keypair::<MockXmss>::generate(b"impostor", 0, 1_000_000);
        let signature = wrong_signer
            .sign(block.tree_hash_root().0, block.slot as u32)
            .unwrap();
        let _ = node;
        let signed_block = SignedBlock {
            message: block,
            signature,
        };

        let err = apply_transition::<MockXmss>(
            &mut state,
            &signed_block,
            ApplyTransitionOpts::default(),
        )
        .unwrap_err();
        assert_eq!(err, BlockProcessingError::InvalidBlockSignatures);
    }

    #[test]
    fn mismatched_declared_state_root_is_rejected() {
        let (mut state, mut node) = genesis(2);
        let parent_root = state.latest_block_header.tree_hash_root();
        let mut block = Block {
            slot: 1,
            proposer_index: 1,
            parent_root,
            state_root: types::Root::repeat_byte(0x42),
            body: BlockBody::default(),
        };
        let signature = node.keypairs[1]
            .sign(block.tree_hash_root().0, block.slot as u32)
            .unwrap();
        block.state_root = types::Root::repeat_byte(0x42);
        let signed_block = SignedBlock {
            message: block,
            signature,
        };

        let err = apply_transition::<MockXmss>(
            &mut state,
            &signed_block,
            ApplyTransitionOpts::default(),
        )
        .unwrap_err();
        assert!(matches!(err, BlockProcessingError::InvalidPostState { .. }));
    }

    #[test]
    fn attestation_included_for_a_bogus_validator_id_fails_signature_check_first() {
        let (mut state, mut node) = genesis(2);
        let parent_root = state.latest_block_header.tree_hash_root();

        let bogus_attestation_data = AttestationData {
            slot: 1,
            head: Checkpoint::genesis(),
            target: Checkpoint::genesis(),
            source: Checkpoint::genesis(),
        };
        let attestation = types::SignedAttestation {
            validator_id: 99,
            message: bogus_attestation_data,
            signature: node.keypairs[0]
                .sign(bogus_attestation_data.tree_hash_root().0, 1)
                .unwrap(),
        };

        let block = Block {
            slot: 1,
            proposer_index: 1,
            parent_root,
            state_root: types::Root::ZERO,
            body: BlockBody {
                attestations: vec![attestation].try_into().unwrap(),
            },
        };
        let signature = node.keypairs[1]
            .sign(block.tree_hash_root().0, block.slot as u32)
            .unwrap();
        let signed_block = SignedBlock {
            message: block,
            signature,
        };

        let err = apply_transition::<MockXmss>(
            &mut state,
            &signed_block,
            ApplyTransitionOpts::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            BlockProcessingError::InvalidValidatorId {
                validator_id: 99,
                num_validators: 2
            }
        );
    }
}
