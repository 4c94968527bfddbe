//! Loads the YAML inputs a node needs before it can start ticking:
//! the genesis state parameters, the validator-to-node assignment
//! table, and the bootnode ENR list (`spec.md` §6).

mod bootnodes;
mod error;
mod genesis_config;
mod node_assignment;

pub use bootnodes::Bootnodes;
pub use error::Error;
pub use genesis_config::GenesisYaml;
pub use node_assignment::NodeAssignments;
