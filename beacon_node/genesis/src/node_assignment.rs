use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Maps node names to the validator indices that node is responsible
/// for (`spec.md` §6). The CLI selects the active node by name and
/// looks its entry up in this table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeAssignments(HashMap<String, Vec<u64>>);

impl NodeAssignments {
    pub fn from_file(path: &Path) -> Result<Self, Error> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&contents)?)
    }

    /// The validator indices assigned to `node_name`, or an empty slice
    /// if the node runs no validators (a pure follower).
    pub fn validators_for(&self, node_name: &str) -> &[u64] {
        self.0.get(node_name).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn looks_up_validators_by_node_name() {
        let yaml = "alice:\n  - 0\n  - 2\nbob:\n  - 1\n";
        let assignments: NodeAssignments = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(assignments.validators_for("alice"), &[0, 2]);
        assert_eq!(assignments.validators_for("bob"), &[1]);
    }

    #[test]
    fn unknown_node_runs_no_validators() {
        let assignments = NodeAssignments::default();
        assert!(assignments.validators_for("nobody").is_empty());
    }
}
