//! The in-memory fork-choice DAG and LMD-GHOST-style head selection of
//! `spec.md` §4.4. FC never owns block bytes or full post-states — it
//! holds only `ProtoBlock`s keyed by root, plus the bookkeeping needed
//! to mirror the justification/finalization STF already computed.

mod error;
mod proto_block;

pub use error::Error;
pub use proto_block::ProtoBlock;

use std::collections::{HashMap, HashSet};

use types::{Checkpoint, Root, State};

/// The fork-choice DAG and its derived `head`/`latest_justified`/
/// `latest_finalized` (`spec.md` §4.4).
#[derive(Debug, Clone)]
pub struct ForkChoice {
    blocks: HashMap<Root, ProtoBlock>,
    children: HashMap<Root, HashSet<Root>>,
    latest_known_votes: HashMap<u64, Checkpoint>,

    latest_justified: Checkpoint,
    latest_finalized: Checkpoint,
    head: Root,
}

impl ForkChoice {
    /// Seed FC with the anchor (genesis or a weak-subjectivity checkpoint)
    /// block and its post-state.
    pub fn new(anchor_block_root: Root, anchor_slot: u64, anchor_state: &State) -> Self {
        let anchor = ProtoBlock {
            slot: anchor_slot,
            block_root: anchor_block_root,
            parent_root: Root::ZERO,
            state_root: anchor_block_root,
            timeliness: true,
        };

        let mut blocks = HashMap::new();
        blocks.insert(anchor_block_root, anchor);

        let latest_justified = if anchor_state.latest_justified.root == Root::ZERO {
            Checkpoint {
                root: anchor_block_root,
                slot: anchor_slot,
            }
        } else {
            anchor_state.latest_justified
        };
        let latest_finalized = if anchor_state.latest_finalized.root == Root::ZERO {
            Checkpoint {
                root: anchor_block_root,
                slot: anchor_slot,
            }
        } else {
            anchor_state.latest_finalized
        };

        ForkChoice {
            blocks,
            children: HashMap::new(),
            latest_known_votes: HashMap::new(),
            latest_justified,
            latest_finalized,
            head: anchor_block_root,
        }
    }

    pub fn head(&self) -> Root {
        self.head
    }

    pub fn latest_justified(&self) -> Checkpoint {
        self.latest_justified
    }

    pub fn latest_finalized(&self) -> Checkpoint {
        self.latest_finalized
    }

    pub fn contains_block(&self, root: &Root) -> bool {
        self.blocks.contains_key(root)
    }

    pub fn get_block(&self, root: &Root) -> Option<&ProtoBlock> {
        self.blocks.get(root)
    }

    /// `on_block(signed_block, post_state, timeliness)` (`spec.md` §4.4):
    /// insert the block, update `latest_justified`/`latest_finalized`
    /// monotonically by slot from `post_state`, and recompute `head`.
    pub fn on_block(
        &mut self,
        block_root: Root,
        parent_root: Root,
        slot: u64,
        state_root: Root,
        post_state: &State,
        timeliness: bool,
    ) -> Result<(), Error> {
        if self.blocks.contains_key(&block_root) {
            return Err(Error::DuplicateBlock { block_root });
        }
        if parent_root != Root::ZERO && !self.blocks.contains_key(&parent_root) {
            return Err(Error::MissingParent { parent_root });
        }

        self.blocks.insert(
            block_root,
            ProtoBlock {
                slot,
                block_root,
                parent_root,
                state_root,
                timeliness,
            },
        );
        self.children.entry(parent_root).or_default().insert(block_root);

        if post_state.latest_justified.slot > self.latest_justified.slot {
            self.latest_justified = post_state.latest_justified;
        }
        if post_state.latest_finalized.slot > self.latest_finalized.slot {
            self.latest_finalized = post_state.latest_finalized;
        }

        self.recompute_head()?;
        Ok(())
    }

    /// `on_attestation(signed_attestation)` (`spec.md` §4.4): replace a
    /// validator's latest known vote iff the new target strictly
    /// advances its slot, then recompute `head`.
    pub fn on_attestation(&mut self, validator_id: u64, head: Checkpoint) -> Result<(), Error> {
        let advances = self
            .latest_known_votes
            .get(&validator_id)
            .map(|current| head.slot > current.slot)
            .unwrap_or(true);

        if advances {
            self.latest_known_votes.insert(validator_id, head);
            self.recompute_head()?;
        }
        Ok(())
    }

    /// `on_tick(slot, interval)` (`spec.md` §4.4): no vote/DAG state is
    /// keyed off wall-clock interval directly — timeliness is decided at
    /// `on_block` insertion time by the caller (the executor knows
    /// whether the interval-1 deadline has passed) — but re-selecting the
    /// head here keeps `head` current as votes from the prior slot become
    /// eligible once the new slot starts.
    pub fn on_tick(&mut self, _slot: u64, _interval: u8) -> Result<(), Error> {
        self.recompute_head()
    }

    /// `get_head()` (`spec.md` §4.4): the weighted LMD-GHOST walk.
    pub fn get_head(&self) -> Result<Root, Error> {
        if self.blocks.is_empty() {
            return Err(Error::EmptyForkChoice);
        }
        let start = if self.blocks.contains_key(&self.latest_justified.root) {
            self.latest_justified.root
        } else {
            // Anchor predates the justified root we were handed (e.g. a
            // fresh FC with only genesis); fall back to the block with
            // the smallest slot, matching the grounding behavior for an
            // unset root.
            *self
                .blocks
                .iter()
                .min_by_key(|(_, block)| block.slot)
                .map(|(root, _)| root)
                .expect("blocks is non-empty")
        };

        let weights = self.accumulate_weights(start);

        let mut current = start;
        loop {
            let Some(children) = self.children.get(&current) else {
                return Ok(current);
            };
            if children.is_empty() {
                return Ok(current);
            }

            current = *children
                .iter()
                .max_by(|a, b| {
                    let wa = weights.get(*a).copied().unwrap_or(0);
                    let wb = weights.get(*b).copied().unwrap_or(0);
                    wa.cmp(&wb).then_with(|| a.cmp(b))
                })
                .expect("children is non-empty");
        }
    }

    fn recompute_head(&mut self) -> Result<(), Error> {
        self.head = self.get_head()?;
        Ok(())
    }

    /// Walk up from each validator's vote head to `start`, crediting one
    /// unit of weight to every block on that path. Votes whose head block
    /// is not `timeliness == true` are excluded: `spec.md` §9 notes that
    /// untimely blocks' votes "do not receive full weight" under the
    /// reference rule; this FC resolves that to a binary timely/excluded
    /// rule (`SPEC_FULL.md` §C).
    fn accumulate_weights(&self, start: Root) -> HashMap<Root, usize> {
        let start_slot = self.blocks.get(&start).map(|b| b.slot).unwrap_or(0);
        let mut weights: HashMap<Root, usize> = HashMap::new();

        for vote in self.latest_known_votes.values() {
            let Some(head_block) = self.blocks.get(&vote.root) else {
                continue;
            };
            if !head_block.timeliness {
                continue;
            }

            let mut current = vote.root;
            loop {
                let Some(block) = self.blocks.get(&current) else {
                    break;
                };
                if block.slot <= start_slot {
                    break;
                }
                *weights.entry(current).or_insert(0) += 1;
                if block.parent_root == Root::ZERO {
                    break;
                }
                current = block.parent_root;
            }
        }

        weights
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::GenesisSpec;

    fn genesis_state() -> State {
        State::genesis(GenesisSpec {
            genesis_time: 0,
            validators: Vec::new(),
        })
    }

    fn root(byte: u8) -> Root {
        Root::repeat_byte(byte)
    }

    #[test]
    fn single_chain_head_is_the_tip() {
        let anchor = root(0x00);
        let mut fc = ForkChoice::new(anchor, 0, &genesis_state());

        let post_state = genesis_state();
        fc.on_block(root(0x01), anchor, 1, root(0xaa), &post_state, true)
            .unwrap();
        fc.on_block(root(0x02), root(0x01), 2, root(0xbb), &post_state, true)
            .unwrap();

        assert_eq!(fc.get_head().unwrap(), root(0x02));
    }

    #[test]
    fn missing_parent_is_rejected() {
        let anchor = root(0x00);
        let mut fc = ForkChoice::new(anchor, 0, &genesis_state());
        let err = fc
            .on_block(root(0x02), root(0x99), 1, root(0xaa), &genesis_state(), true)
            .unwrap_err();
        assert_eq!(
            err,
            Error::MissingParent {
                parent_root: root(0x99)
            }
        );
    }

    #[test]
    fn zero_vote_tie_break_prefers_greater_root() {
        let anchor = root(0x00);
        let mut fc = ForkChoice::new(anchor, 0, &genesis_state());
        let post_state = genesis_state();

        fc.on_block(root(0x01), anchor, 1, root(0xaa), &post_state, true)
            .unwrap();
        fc.on_block(root(0x02), anchor, 1, root(0xbb), &post_state, true)
            .unwrap();

        assert_eq!(fc.get_head().unwrap(), root(0x02));
    }

    #[test]
    fn votes_favor_their_chain() {
        let anchor = root(0x00);
        let mut fc = ForkChoice::new(anchor, 0, &genesis_state());
        let post_state = genesis_state();

        fc.on_block(root(0x01), anchor, 1, root(0xaa), &post_state, true)
            .unwrap();
        fc.on_block(root(0x02), anchor, 1, root(0xbb), &post_state, true)
            .unwrap();

        // Two validators vote for the lexicographically smaller root;
        // their weight should override the zero-vote tie-break.
        fc.on_attestation(
            0,
            Checkpoint {
                root: root(0x01),
                slot: 1,
            },
        )
        .unwrap();
        fc.on_attestation(
            1,
            Checkpoint {
                root: root(0x01),
                slot: 1,
            },
        )
        .unwrap();

        assert_eq!(fc.get_head().unwrap(), root(0x01));
    }

    #[test]
    fn untimely_block_votes_are_excluded_from_weight() {
        let anchor = root(0x00);
        let mut fc = ForkChoice::new(anchor, 0, &genesis_state());
        let post_state = genesis_state();

        fc.on_block(root(0x01), anchor, 1, root(0xaa), &post_state, false)
            .unwrap();
        fc.on_block(root(0x02), anchor, 1, root(0xbb), &post_state, true)
            .unwrap();

        fc.on_attestation(
            0,
            Checkpoint {
                root: root(0x01),
                slot: 1,
            },
        )
        .unwrap();

        // The only vote targets an untimely block, so it contributes no
        // weight; the tie-break on root value decides instead.
        assert_eq!(fc.get_head().unwrap(), root(0x02));
    }

    #[test]
    fn finalization_never_regresses() {
        let anchor = root(0x00);
        let mut fc = ForkChoice::new(anchor, 0, &genesis_state());

        let mut advanced = genesis_state();
        advanced.latest_finalized = Checkpoint {
            root: root(0x01),
            slot: 1,
        };
        fc.on_block(root(0x01), anchor, 1, root(0xaa), &advanced, true)
            .unwrap();
        assert_eq!(fc.latest_finalized(), advanced.latest_finalized);

        // A later block with a stale (lower-slot) post-state must not
        // revert `latest_finalized`.
        let stale = genesis_state();
        fc.on_block(root(0x02), root(0x01), 2, root(0xbb), &stale, true)
            .unwrap();
        assert_eq!(fc.latest_finalized(), advanced.latest_finalized);
    }
}
