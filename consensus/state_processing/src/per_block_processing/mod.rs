mod attestations;
mod header;

pub use attestations::process_attestations;
pub use header::process_block_header;

use types::Block;

use crate::errors::BlockProcessingError;

/// `process_block` (`spec.md` §4.3): header validation followed by
/// attestation processing, the two halves of `process_operations` this
/// lean protocol actually has (no deposits, slashings, sync committees,
/// or execution payloads).
pub fn process_block(state: &mut types::State, block: &Block) -> Result<(), BlockProcessingError> {
    process_block_header(state, block)?;
    process_attestations(state, &block.body.attestations)?;
    Ok(())
}
