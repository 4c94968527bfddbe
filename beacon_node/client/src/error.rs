/// The node-level failure taxonomy (`spec.md` §7). STF and FC already
/// carry their own per-call error types for tiers 1/2; this enum covers
/// the tier-3 local-invariant violations the executor can hit and the
/// handful of setup failures that have no other home.
#[derive(Debug)]
pub enum Error {
    Store(store::Error),
    ForkChoice(fork_choice::Error),
    Genesis(genesis::Error),
    Io(std::io::Error),
    /// A block built or applied locally failed the STF. This should
    /// never happen for a block the node built itself; surfacing it as
    /// an error (rather than the usual silent drop, `spec.md` §7) is
    /// deliberate here because it indicates a bug in duty construction,
    /// not a hostile peer.
    BlockProcessing(state_processing::BlockProcessingError),
    /// Signing failed — almost always `PqSigError::EpochAlreadyUsed`,
    /// which means this process tried to sign twice in the same slot.
    Signing(pqsig::PqSigError),
    /// Crash-consistency check at startup failed: `spec.md` §6, "after
    /// restart the node must recover with `latest_finalized` unchanged
    /// and `head` at least at the last observed finalized block."
    InconsistentRecovery { finalized_root: types::Root },
    /// The Store has no post-state recorded for a root FC considers
    /// live. Can only happen if Store and FC have fallen out of sync,
    /// which `spec.md` §9 treats as a local invariant violation.
    MissingPostState { root: types::Root },
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::error::Error for Error {}

impl From<store::Error> for Error {
    fn from(e: store::Error) -> Self {
        Error::Store(e)
    }
}

impl From<fork_choice::Error> for Error {
    fn from(e: fork_choice::Error) -> Self {
        Error::ForkChoice(e)
    }
}

impl From<genesis::Error> for Error {
    fn from(e: genesis::Error) -> Self {
        Error::Genesis(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<state_processing::BlockProcessingError> for Error {
    fn from(e: state_processing::BlockProcessingError) -> Self {
        Error::BlockProcessing(e)
    }
}
