/// Re-exported so downstream crates can match on SSZ decode failures
/// without depending on the underlying `ethereum_ssz` crate directly.
/// `spec.md` §4.1: malformed offsets, bounds exceeded, trailing bytes
/// are all reported through this type.
pub use ssz::DecodeError;
