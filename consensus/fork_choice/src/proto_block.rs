use types::Root;

/// The lightweight fork-choice node (`spec.md` §3, `ProtoBlock`).
///
/// FC never holds block bodies or post-states — those live in the Store,
/// addressed by `block_root`. `timeliness` is the only piece of
/// per-block bookkeeping FC keeps beyond the DAG shape itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtoBlock {
    pub slot: u64,
    pub block_root: Root,
    pub parent_root: Root,
    pub state_root: Root,
    /// `true` iff the block was inserted before the interval-1 deadline
    /// of its own slot.
    pub timeliness: bool,
}
