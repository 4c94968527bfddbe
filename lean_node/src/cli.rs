use std::path::PathBuf;

use clap::Parser;

/// The lean-consensus node (`spec.md` §6, "CLI surface (contract
/// only)"): genesis directory, node identity, and the two on-disk
/// roots for keys and chain data.
#[derive(Debug, Parser)]
#[command(name = "lean_node", version, about = "A lean post-quantum consensus node")]
pub struct Cli {
    /// Directory containing `genesis.yaml`, `node_assignment.yaml` and
    /// `bootnodes.yaml`.
    #[arg(long, value_name = "DIR")]
    pub genesis_dir: PathBuf,

    /// This node's name, as it appears in `node_assignment.yaml`.
    #[arg(long, value_name = "NAME")]
    pub node_id: String,

    /// Overrides `GENESIS_TIME` from `genesis.yaml`.
    #[arg(long, value_name = "UNIX_SECONDS")]
    pub override_genesis_time: Option<u64>,

    /// Directory for this node's network identity/keys.
    #[arg(long, value_name = "DIR")]
    pub network_dir: Option<PathBuf>,

    /// Directory for the block/state Store.
    #[arg(long, value_name = "DIR")]
    pub data_dir: PathBuf,

    /// Optional metrics server port. Serving metrics itself is out of
    /// scope (`spec.md` §1); accepting the flag is part of the CLI
    /// contract regardless.
    #[arg(long, value_name = "PORT")]
    pub metrics_port: Option<u16>,
}
