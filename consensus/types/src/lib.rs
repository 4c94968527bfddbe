//! The canonical data model of the lean-consensus core (`spec.md` §3):
//! every entity that must round-trip through SSZ and tree-hash
//! bit-exactly with the reference, plus the `mainnet` preset constants
//! and the `is_justifiable_slot` predicate.

pub mod attestation;
pub mod block;
pub mod checkpoint;
pub mod config;
pub mod error;
pub mod justifiable;
pub mod state;
pub mod validator;

pub use attestation::{AttestationData, SignedAttestation};
pub use block::{Block, BlockBody, BlockHeader, SignedBlock};
pub use checkpoint::Checkpoint;
pub use config::{preset, Config};
pub use error::DecodeError;
pub use justifiable::{is_justifiable_slot, JustifiableSlotError};
pub use state::{GenesisSpec, State};
pub use validator::{is_proposer, Validator};

/// A 32-byte tree-hash root. Re-exported here so downstream crates refer
/// to protocol roots via `types::Root` rather than reaching into
/// `alloy_primitives` directly.
pub type Root = alloy_primitives::B256;
