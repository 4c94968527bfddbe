//! The post-quantum signature contract (`spec.md` §4.2).
//!
//! This crate wraps a Generalized-XMSS primitive behind a small,
//! stateful key/sign/verify surface. The concrete primitive — hash-chain
//! construction and underlying hash function — is an external
//! collaborator (`spec.md` §1); see [`primitive::XmssPrimitive`].

mod error;
mod keypair;
mod primitive;
mod signature;

pub use error::PqSigError;
pub use keypair::{verify, Keypair};
pub use primitive::{MockSecretState, MockXmss, XmssPrimitive};
pub use signature::{MaxHashChunks, MaxPathLength, PublicKeyBytes, Signature};
