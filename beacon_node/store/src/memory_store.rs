use std::collections::HashMap;
use std::sync::RwLock;

use types::{Root, State};

use crate::error::Error;
use crate::traits::ItemStore;

/// An in-memory `ItemStore`, used by tests and single-process devnets
/// that don't need the data to survive a restart.
#[derive(Default)]
pub struct MemoryStore {
    blocks: RwLock<HashMap<Root, Vec<u8>>>,
    states: RwLock<HashMap<Root, State>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }
}

impl ItemStore for MemoryStore {
    fn has(&self, root: &Root) -> Result<bool, Error> {
        Ok(self.blocks.read().unwrap().contains_key(root)
            || self.states.read().unwrap().contains_key(root))
    }

    fn put_block(&self, root: &Root, bytes: &[u8]) -> Result<(), Error> {
        self.blocks.write().unwrap().insert(*root, bytes.to_vec());
        Ok(())
    }

    fn get_block(&self, root: &Root) -> Result<Option<Vec<u8>>, Error> {
        Ok(self.blocks.read().unwrap().get(root).cloned())
    }

    fn put_state(&self, root: &Root, state: &State) -> Result<(), Error> {
        self.states.write().unwrap().insert(*root, state.clone());
        Ok(())
    }

    fn get_state(&self, root: &Root) -> Result<Option<State>, Error> {
        Ok(self.states.read().unwrap().get(root).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::GenesisSpec;

    #[test]
    fn round_trips_blocks_and_states() {
        let store = MemoryStore::new();
        let root = Root::repeat_byte(0x01);

        assert!(!store.has(&root).unwrap());

        store.put_block(&root, b"hello").unwrap();
        assert_eq!(store.get_block(&root).unwrap().unwrap(), b"hello");
        assert!(store.has(&root).unwrap());

        let state = State::genesis(GenesisSpec {
            genesis_time: 0,
            validators: Vec::new(),
        });
        store.put_state(&root, &state).unwrap();
        assert_eq!(store.get_state(&root).unwrap().unwrap(), state);
    }

    #[test]
    fn missing_root_is_none_not_error() {
        let store = MemoryStore::new();
        let root = Root::repeat_byte(0xff);
        assert!(store.get_block(&root).unwrap().is_none());
        assert!(store.get_state(&root).unwrap().is_none());
    }
}
