//! The node orchestrator of `spec.md` §4.5 / §5: wires the STF, FC,
//! Store, and PQSig keypairs together and drives them from per-slot
//! ticks and inbound gossip, in the single-writer order §5 mandates
//! (timer tick → inbound blocks → inbound votes → local duties).

mod duties;
mod error;
mod manifest;
mod tiering;

pub use error::Error;
pub use manifest::RecoveryManifest;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use fork_choice::ForkChoice;
use pqsig::{Keypair, XmssPrimitive};
use slog::{debug, warn, Logger};
use ssz::Encode;
use ssz_types::VariableList;
use state_processing::{apply_transition, ApplyTransitionOpts};
use store::ItemStore;
use tree_hash::TreeHash;
use types::{AttestationData, Checkpoint, GenesisSpec, Root, SignedAttestation, SignedBlock, State};

/// Owns the Store, FC, and this process's validator keypairs, and is
/// the only thing that ever mutates them (`spec.md` §4: "Ownership").
/// `P` is the signature primitive; `S` is the Store backend.
pub struct Client<P: XmssPrimitive, S: ItemStore> {
    data_dir: PathBuf,
    store: Arc<S>,
    fork_choice: ForkChoice,
    num_validators: u64,
    local_keypairs: HashMap<u64, Keypair<P>>,
    pending_attestations: Vec<SignedAttestation>,
    log: Logger,
}

impl<P: XmssPrimitive, S: ItemStore> Client<P, S> {
    /// Bring up a node: resume from a prior run's manifest if one is
    /// present in `data_dir`, otherwise bootstrap fresh from `genesis`.
    pub fn start(
        data_dir: PathBuf,
        store: Arc<S>,
        genesis: GenesisSpec,
        local_keypairs: HashMap<u64, Keypair<P>>,
        log: Logger,
    ) -> Result<Self, Error> {
        directory::ensure_dir_exists(&data_dir)?;
        match RecoveryManifest::load(&data_dir)? {
            Some(manifest) => Self::resume(data_dir, store, manifest, local_keypairs, log),
            None => Self::genesis(data_dir, store, genesis, local_keypairs, log),
        }
    }

    fn genesis(
        data_dir: PathBuf,
        store: Arc<S>,
        genesis: GenesisSpec,
        local_keypairs: HashMap<u64, Keypair<P>>,
        log: Logger,
    ) -> Result<Self, Error> {
        let num_validators = genesis.validators.len() as u64;
        let mut state = State::genesis(genesis);
        // Close the genesis header the same way the first `process_slots`
        // call would (`spec.md` §4.3: "backfills ... state_root ... iff
        // it is currently zero"), so the anchor root registered here is
        // the same `parent_root` a slot-1 proposer will compute.
        if state.latest_block_header.state_root == Root::ZERO {
            state.latest_block_header.state_root = state.tree_hash_root();
        }
        let anchor_root = state.latest_block_header.tree_hash_root();

        tiering::with_retry(|| store.put_state(&anchor_root, &state))?;
        let fork_choice = ForkChoice::new(anchor_root, 0, &state);

        let client = Client {
            data_dir,
            store,
            fork_choice,
            num_validators,
            local_keypairs,
            pending_attestations: Vec::new(),
            log,
        };
        client.save_manifest()?;
        Ok(client)
    }

    /// Resume after a restart (`spec.md` §6: "the node must recover
    /// with `latest_finalized` unchanged and `head` at least at the
    /// last observed finalized block"). Non-finalized fork history is
    /// not reconstructed — the Store contract (§4.4) exposes no way to
    /// enumerate all stored roots, so FC is re-anchored at the last
    /// finalized checkpoint rather than replayed block-by-block.
    fn resume(
        data_dir: PathBuf,
        store: Arc<S>,
        manifest: RecoveryManifest,
        local_keypairs: HashMap<u64, Keypair<P>>,
        log: Logger,
    ) -> Result<Self, Error> {
        if manifest.head_slot < manifest.finalized_slot {
            return Err(Error::InconsistentRecovery {
                finalized_root: manifest.finalized_root,
            });
        }
        let finalized_state = tiering::with_retry(|| store.get_state(&manifest.finalized_root))?
            .ok_or(Error::InconsistentRecovery {
                finalized_root: manifest.finalized_root,
            })?;

        let num_validators = finalized_state.num_validators();
        let mut fork_choice = ForkChoice::new(manifest.finalized_root, manifest.finalized_slot, &finalized_state);

        if manifest.head_root != manifest.finalized_root {
            if let Some(head_state) = tiering::with_retry(|| store.get_state(&manifest.head_root))? {
                let state_root = head_state.tree_hash_root();
                fork_choice.on_block(
                    manifest.head_root,
                    manifest.finalized_root,
                    manifest.head_slot,
                    state_root,
                    &head_state,
                    true,
                )?;
            }
        }

        Ok(Client {
            data_dir,
            store,
            fork_choice,
            num_validators,
            local_keypairs,
            pending_attestations: Vec::new(),
            log,
        })
    }

    fn save_manifest(&self) -> Result<(), Error> {
        let manifest = RecoveryManifest {
            finalized_root: self.fork_choice.latest_finalized().root,
            finalized_slot: self.fork_choice.latest_finalized().slot,
            head_root: self.fork_choice.head(),
            head_slot: self
                .fork_choice
                .get_block(&self.fork_choice.head())
                .map(|b| b.slot)
                .unwrap_or(0),
        };
        manifest.save(&self.data_dir)?;
        Ok(())
    }

    pub fn head(&self) -> Root {
        self.fork_choice.head()
    }

    pub fn latest_finalized(&self) -> Checkpoint {
        self.fork_choice.latest_finalized()
    }

    pub fn head_state(&self) -> Result<State, Error> {
        let head = self.head();
        tiering::with_retry(|| self.store.get_state(&head))?
            .ok_or(Error::MissingPostState { root: head })
    }

    /// Apply an inbound (or locally-produced) block. Invalid input and
    /// protocol violations (`spec.md` §7, tiers 1/2) are logged and
    /// dropped rather than surfaced as an `Err`; only a Store/FC
    /// invariant failure propagates.
    pub fn ingest_block(&mut self, signed_block: &SignedBlock, timely: bool) -> Result<(), Error> {
        let block_root = signed_block.message.tree_hash_root();
        if self.fork_choice.contains_block(&block_root) {
            return Ok(());
        }

        let parent_root = signed_block.message.parent_root;
        let Some(mut state) = tiering::with_retry(|| self.store.get_state(&parent_root))? else {
            warn!(self.log, "Dropping block with unknown parent"; "parent_root" => %parent_root);
            return Ok(());
        };

        if let Err(e) = apply_transition::<P>(&mut state, signed_block, ApplyTransitionOpts::default()) {
            warn!(self.log, "Dropping invalid block"; "error" => %e);
            return Ok(());
        }

        let block_bytes = signed_block.as_ssz_bytes();
        tiering::with_retry(|| self.store.put_block(&block_root, &block_bytes))?;
        tiering::with_retry(|| self.store.put_state(&block_root, &state))?;
        self.fork_choice.on_block(
            block_root,
            parent_root,
            signed_block.message.slot,
            signed_block.message.state_root,
            &state,
            timely,
        )?;
        self.save_manifest()?;

        debug!(self.log, "Ingested block"; "slot" => signed_block.message.slot, "root" => %block_root);
        Ok(())
    }

    /// Apply an inbound (or locally-produced) vote.
    pub fn ingest_attestation(&mut self, signed_attestation: &SignedAttestation) -> Result<(), Error> {
        if signed_attestation.validator_id >= self.num_validators {
            warn!(self.log, "Dropping vote from out-of-range validator"; "validator_id" => signed_attestation.validator_id);
            return Ok(());
        }

        let head_state = self.head_state()?;
        let validator = &head_state.validators[signed_attestation.validator_id as usize];
        let data_root = signed_attestation.message.tree_hash_root();
        if !pqsig::verify::<P>(
            &validator.pubkey,
            data_root.0,
            signed_attestation.message.slot as u32,
            &signed_attestation.signature,
        ) {
            warn!(self.log, "Dropping vote with invalid signature"; "validator_id" => signed_attestation.validator_id);
            return Ok(());
        }

        self.fork_choice
            .on_attestation(signed_attestation.validator_id, signed_attestation.message.head)?;
        self.pending_attestations.push(signed_attestation.clone());
        self.save_manifest()?;
        Ok(())
    }

    /// Interval 0: if a local validator is due to propose at `slot`,
    /// build, sign, locally ingest, and return the block to publish.
    pub fn produce_block_duty(&mut self, slot: u64) -> Result<Option<SignedBlock>, Error> {
        let proposer_index = slot % self.num_validators.max(1);
        if !self.local_keypairs.contains_key(&proposer_index) {
            return Ok(None);
        }

        let head_state = self.head_state()?;
        let attestations: VariableList<_, types::block::MaxAttestationsPerBlock> =
            VariableList::try_from(std::mem::take(&mut self.pending_attestations))
                .unwrap_or_else(|_| VariableList::empty());

        let keypair = self.local_keypairs.get_mut(&proposer_index).expect("checked above");
        let (signed_block, _post_state) =
            duties::build_signed_block(&head_state, slot, proposer_index, attestations, keypair)?;

        self.ingest_block(&signed_block, true)?;
        Ok(Some(signed_block))
    }

    /// Interval 1: every locally-run validator emits a vote for the
    /// current head, with `target`/`source` per `spec.md` §4.5.
    pub fn produce_attestation_duties(&mut self, slot: u64) -> Result<Vec<SignedAttestation>, Error> {
        let head_root = self.head();
        let head_slot = self
            .fork_choice
            .get_block(&head_root)
            .map(|b| b.slot)
            .unwrap_or(0);
        let target = duties::compute_attestation_target(&self.fork_choice);
        let source = self.fork_choice.latest_justified();

        let mut out = Vec::new();
        let validator_ids: Vec<u64> = self.local_keypairs.keys().copied().collect();
        for validator_id in validator_ids {
            let message = AttestationData {
                slot,
                head: Checkpoint {
                    root: head_root,
                    slot: head_slot,
                },
                target,
                source,
            };
            let keypair = self.local_keypairs.get_mut(&validator_id).expect("came from keys()");
            let signature = match keypair.sign(message.tree_hash_root().0, slot as u32) {
                Ok(signature) => signature,
                Err(e) => {
                    warn!(self.log, "Skipping vote duty"; "validator_id" => validator_id, "error" => %e);
                    continue;
                }
            };
            let signed = SignedAttestation {
                validator_id,
                message,
                signature,
            };
            self.ingest_attestation(&signed)?;
            out.push(signed);
        }
        Ok(out)
    }

    /// Interval 2: re-select head as prior-slot votes become eligible.
    /// No outbound duties this interval (`spec.md` §4.5).
    pub fn observe_tick(&mut self, slot: u64, interval: u8) -> Result<(), Error> {
        self.fork_choice.on_tick(slot, interval)?;
        self.save_manifest()?;
        Ok(())
    }
}
