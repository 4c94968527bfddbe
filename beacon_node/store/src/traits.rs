use types::{Root, State};

use crate::error::Error;

/// The Store contract (`spec.md` §4.4): `has`/`put_block`/`get_block`/
/// `put_state`/`get_state`, indexed by block root. Any backend is
/// acceptable so long as a `put_*` call has made its write durable by
/// the time it returns.
///
/// Blocks are stored pre-encoded (the caller already has SSZ bytes from
/// gossip or local production); states are handed over typed, since the
/// executor always has a live `State` and re-encoding on every write
/// would be wasted work for the in-memory backend used in tests.
pub trait ItemStore: Send + Sync {
    fn has(&self, root: &Root) -> Result<bool, Error>;

    fn put_block(&self, root: &Root, bytes: &[u8]) -> Result<(), Error>;
    fn get_block(&self, root: &Root) -> Result<Option<Vec<u8>>, Error>;

    fn put_state(&self, root: &Root, state: &State) -> Result<(), Error>;
    fn get_state(&self, root: &Root) -> Result<Option<State>, Error>;
}
