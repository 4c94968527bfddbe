use alloy_primitives::B256;
use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use ssz_types::{
    typenum::{U128, U28, U32},
    FixedVector, VariableList,
};
use tree_hash_derive::TreeHash;

/// Generalized-XMSS public key: 52 raw bytes (`spec.md` §4.2).
pub type PublicKeyBytes = FixedVector<u8, ssz_types::typenum::U52>;

/// Merkle authentication path length bound: `LOG_LIFETIME` from the
/// `mainnet` preset (`spec.md` §6).
pub type MaxPathLength = U32;

/// Upper bound on the number of per-chunk hash digests a signature
/// carries. Not pinned down by name in the protocol description; see
/// `SPEC_FULL.md` §E for the sizing rationale.
pub type MaxHashChunks = U128;

/// A Generalized-XMSS signature.
///
/// Encoded and tree-hashed as a container of its three fields — a
/// Merkle authentication path, a randomness vector, and a list of
/// per-chunk hash digests — never as a flat opaque byte string. This
/// is the property `spec.md` §4.2 calls out as critical: `SignedX`
/// containers must compute the signature field as a container root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode, TreeHash)]
pub struct Signature {
    /// Merkle authentication path from the one-time key to the public root.
    pub path: VariableList<B256, MaxPathLength>,
    /// Per-signature randomness, `RAND_LEN_FE * FIELD_ELEMENT_BYTES = 28` bytes.
    pub rho: FixedVector<u8, U28>,
    /// Per-chunk hash-chain digests.
    pub hashes: VariableList<B256, MaxHashChunks>,
}
