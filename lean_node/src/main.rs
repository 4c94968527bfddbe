//! Binary entry point (`spec.md` §6, "CLI surface"): loads genesis
//! files, opens the Store, and runs the single-threaded reactor loop
//! that ties the slot clock, gossip transport, and `Client` together.

mod cli;
mod loopback_transport;

use std::collections::HashMap;
use std::sync::Arc;

use clap::Parser;
use client::Client;
use genesis::{Bootnodes, GenesisYaml, NodeAssignments};
use loopback_transport::LoopbackTransport;
use network::{GossipTransport, NetworkMessage};
use pqsig::{Keypair, MockXmss};
use slog::{error, info, o};
use slot_clock::{SlotClock, SystemTimeSlotClock};
use store::SledStore;

const GENESIS_FILE: &str = "genesis.yaml";
const NODE_ASSIGNMENT_FILE: &str = "node_assignment.yaml";
const BOOTNODES_FILE: &str = "bootnodes.yaml";

fn main() {
    let cli = cli::Cli::parse();
    let log = logging::root_logger(slog::Level::Info);

    match run(cli, log.clone()) {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            error!(log, "Fatal error"; "error" => %e);
            std::process::exit(1);
        }
    }
}

#[derive(Debug)]
enum NodeError {
    Genesis(genesis::Error),
    Client(client::Error),
    Io(std::io::Error),
}

impl std::fmt::Display for NodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl From<genesis::Error> for NodeError {
    fn from(e: genesis::Error) -> Self {
        NodeError::Genesis(e)
    }
}
impl From<client::Error> for NodeError {
    fn from(e: client::Error) -> Self {
        NodeError::Client(e)
    }
}
impl From<std::io::Error> for NodeError {
    fn from(e: std::io::Error) -> Self {
        NodeError::Io(e)
    }
}

fn run(cli: cli::Cli, log: slog::Logger) -> Result<(), NodeError> {
    let mut genesis_yaml = GenesisYaml::from_file(&cli.genesis_dir.join(GENESIS_FILE))?;
    if let Some(override_time) = cli.override_genesis_time {
        genesis_yaml.genesis_time = override_time;
    }
    let genesis_time = genesis_yaml.genesis_time;
    let genesis_spec = genesis_yaml.into_genesis_spec()?;
    let num_validators = genesis_spec.validators.len() as u64;

    let assignments = NodeAssignments::from_file(&cli.genesis_dir.join(NODE_ASSIGNMENT_FILE))?;
    let local_validator_ids = assignments.validators_for(&cli.node_id).to_vec();

    let bootnodes = Bootnodes::from_file(&cli.genesis_dir.join(BOOTNODES_FILE))?;
    info!(log, "Loaded genesis"; "num_validators" => num_validators, "bootnodes" => bootnodes.enrs().len());

    let local_keypairs: HashMap<u64, Keypair<MockXmss>> = local_validator_ids
        .iter()
        .map(|&id| {
            let seed = format!("lean-genesis-validator-{id}");
            (id, Keypair::<MockXmss>::generate(seed.as_bytes(), 0, 1 << 20))
        })
        .collect();

    directory::ensure_dir_exists(&cli.data_dir)?;
    let store = Arc::new(SledStore::open(&directory::store_dir(&cli.data_dir)).map_err(client::Error::from)?);

    let mut node_client = Client::<MockXmss, _>::start(
        cli.data_dir.clone(),
        store,
        genesis_spec,
        local_keypairs,
        log.new(o!("component" => "client")),
    )?;

    let runtime = tokio::runtime::Runtime::new().expect("failed to start tokio runtime");
    let (signal, exit) = exit_future::signal();
    let handle = runtime.handle().clone();
    let executor = task_executor::TaskExecutor::new(handle, exit, log.new(o!("component" => "executor")));

    let clock = Arc::new(SystemTimeSlotClock::new(genesis_time));
    let mut ticks = timer::spawn(Arc::clone(&clock), executor);
    let mut transport = LoopbackTransport::new(cli.node_id.clone(), log.new(o!("component" => "transport")));

    runtime.block_on(async {
        loop {
            tokio::select! {
                tick = ticks.recv() => {
                    let Some(tick) = tick else { break };
                    if let Err(e) = handle_tick(&mut node_client, &mut transport, tick.slot, tick.interval).await {
                        error!(log, "Error handling tick"; "slot" => tick.slot, "interval" => tick.interval, "error" => %e);
                    }
                }
                inbound = transport.next_message() => {
                    let Some(inbound) = inbound else { break };
                    if let Err(e) = handle_inbound(&mut node_client, &clock, inbound.message) {
                        error!(log, "Error handling inbound message"; "error" => %e);
                    }
                }
            }
        }
    });

    drop(signal);
    Ok(())
}

async fn handle_tick<P: pqsig::XmssPrimitive, S: store::ItemStore>(
    client: &mut Client<P, S>,
    transport: &mut LoopbackTransport,
    slot: u64,
    interval: u8,
) -> Result<(), client::Error> {
    match interval {
        0 => {
            if let Some(block) = client.produce_block_duty(slot)? {
                let _ = transport.publish(NetworkMessage::Block(Box::new(block))).await;
            }
        }
        1 => {
            for vote in client.produce_attestation_duties(slot)? {
                let _ = transport.publish(NetworkMessage::Vote(Box::new(vote))).await;
            }
        }
        _ => {
            client.observe_tick(slot, interval)?;
        }
    }
    Ok(())
}

fn handle_inbound<P: pqsig::XmssPrimitive, S: store::ItemStore>(
    client: &mut Client<P, S>,
    clock: &SystemTimeSlotClock,
    message: NetworkMessage,
) -> Result<(), client::Error> {
    match message {
        NetworkMessage::Block(block) => {
            let timely = matches!(
                (clock.now(), clock.current_interval()),
                (Some(now), Some(interval)) if now == block.message.slot && interval <= 1
            );
            client.ingest_block(&block, timely)
        }
        NetworkMessage::Vote(vote) => client.ingest_attestation(&vote),
    }
}
