use std::path::Path;

use crate::error::Error;

/// An ordered list of bootnode ENR strings (`spec.md` §6); a node's own
/// ID is its index into this list. ENRs themselves are opaque here —
/// parsing and dialing them is the (out of scope) transport's job.
#[derive(Debug, Clone, Default)]
pub struct Bootnodes(Vec<String>);

impl Bootnodes {
    pub fn from_file(path: &Path) -> Result<Self, Error> {
        let contents = std::fs::read_to_string(path)?;
        let enrs: Vec<String> = serde_yaml::from_str(&contents)?;
        Ok(Bootnodes(enrs))
    }

    pub fn enrs(&self) -> &[String] {
        &self.0
    }

    /// The ENR at `node_id`, if this list is long enough to name it.
    pub fn enr_for_node_id(&self, node_id: usize) -> Option<&str> {
        self.0.get(node_id).map(String::as_str)
    }
}
