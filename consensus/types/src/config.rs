use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use tree_hash_derive::TreeHash;

/// Per-chain configuration carried inside [`crate::state::State`].
///
/// Only `genesis_time` is part of the canonical, tree-hashed state; the
/// remaining constants below are a fixed preset shared by every node on
/// the network and are not merkleized.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Encode, Decode, TreeHash)]
pub struct Config {
    pub genesis_time: u64,
}

/// The `mainnet` preset. A lean-consensus devnet may use a different
/// preset (e.g. shorter slots) but ships with `mainnet` as the default.
pub mod preset {
    /// Length in seconds of one slot.
    pub const SECONDS_PER_SLOT: u64 = 4;
    /// Number of intervals per slot: 0=propose, 1=attest, 2=aggregate/observe.
    pub const INTERVALS_PER_SLOT: u64 = 3;
    /// SSZ list-length bound for `historical_block_hashes` / `justified_slots`.
    pub const HISTORICAL_ROOTS_LIMIT: usize = 1 << 18;
    /// SSZ list-length bound for the validator registry and per-block attestations.
    pub const VALIDATOR_REGISTRY_LIMIT: usize = 1 << 12;
    /// Maximum number of blocks that may be requested in a single range-sync request.
    pub const MAX_REQUEST_BLOCKS: u64 = 1024;

    /// Generalized-XMSS lifetime exponent: `2^LOG_LIFETIME` signing epochs per key.
    pub const LOG_LIFETIME: u32 = 32;
    /// Length, in field elements, of the signature randomness vector `rho`.
    pub const RAND_LEN_FE: usize = 7;
    /// Length, in field elements, of a single hash-chain digest.
    pub const HASH_LEN_FE: usize = 8;
    /// Width in bytes of a single field element.
    pub const FIELD_ELEMENT_BYTES: usize = 4;
    /// SSZ list-length bound for the bootnode/ENR list.
    pub const NODE_LIST_LIMIT: usize = 1 << 17;

    /// `rho` byte length, derived: `RAND_LEN_FE * FIELD_ELEMENT_BYTES`.
    pub const RAND_LEN_BYTES: usize = RAND_LEN_FE * FIELD_ELEMENT_BYTES;
    /// Single hash-chain digest byte length, derived: `HASH_LEN_FE * FIELD_ELEMENT_BYTES`.
    pub const HASH_LEN_BYTES: usize = HASH_LEN_FE * FIELD_ELEMENT_BYTES;

    /// Upper bound on the number of per-chunk hash digests carried by a
    /// signature. Not pinned down by a named constant in the protocol
    /// description; sized generously for the Winternitz-style chunk count
    /// a generalized-XMSS scheme at this lifetime typically uses.
    pub const MAX_SIGNATURE_HASH_CHUNKS: usize = 128;

    /// Public key length in bytes.
    pub const PUBKEY_BYTES: usize = 52;
}
