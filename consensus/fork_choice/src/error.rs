use types::Root;

/// Failure taxonomy for the fork-choice DAG (`spec.md` §4.4), mirroring
/// the teacher's `fork_choice::Error<T>` enum — without the generic
/// store-backend parameter, since this FC never talks to a pluggable
/// store itself; callers pass it post-states directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// `on_block` was called for a block whose parent isn't in the DAG yet.
    MissingParent { parent_root: Root },
    /// `on_block` was called twice for the same root.
    DuplicateBlock { block_root: Root },
    /// A lookup (e.g. `get_head`) referenced a root not present in `blocks`.
    UnknownBlock { block_root: Root },
    /// `get_head` was called before any block was ever inserted.
    EmptyForkChoice,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::error::Error for Error {}
