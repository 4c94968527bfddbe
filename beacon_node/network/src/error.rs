use ssz::DecodeError;

/// Failure taxonomy for the gossip boundary (`spec.md` §7, tiers 1 and 4).
#[derive(Debug)]
pub enum Error {
    /// Tier 1: malformed SSZ on the wire.
    Decode(DecodeError),
    /// Tier 4: the transport itself failed to send/receive.
    Transport(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::error::Error for Error {}

impl From<DecodeError> for Error {
    fn from(e: DecodeError) -> Self {
        Error::Decode(e)
    }
}
