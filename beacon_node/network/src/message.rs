use ssz::{Decode, DecodeError, Encode};
use types::{SignedAttestation, SignedBlock};

use crate::topic::GossipTopic;

/// A decoded gossip payload (`spec.md` §6): "two topics: `block`
/// (carrier = SSZ-encoded `SignedBlock`) and `vote` (carrier =
/// SSZ-encoded `SignedAttestation`). Wire encoding is the raw SSZ bytes
/// — no framing, no length prefix beyond what the transport supplies."
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkMessage {
    Block(Box<SignedBlock>),
    Vote(Box<SignedAttestation>),
}

impl NetworkMessage {
    pub fn topic(&self) -> GossipTopic {
        match self {
            NetworkMessage::Block(_) => GossipTopic::Block,
            NetworkMessage::Vote(_) => GossipTopic::Vote,
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        match self {
            NetworkMessage::Block(block) => block.as_ssz_bytes(),
            NetworkMessage::Vote(vote) => vote.as_ssz_bytes(),
        }
    }

    pub fn decode(topic: GossipTopic, bytes: &[u8]) -> Result<Self, DecodeError> {
        Ok(match topic {
            GossipTopic::Block => NetworkMessage::Block(Box::new(SignedBlock::from_ssz_bytes(bytes)?)),
            GossipTopic::Vote => {
                NetworkMessage::Vote(Box::new(SignedAttestation::from_ssz_bytes(bytes)?))
            }
        })
    }
}
