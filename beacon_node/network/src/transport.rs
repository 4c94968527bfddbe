use async_trait::async_trait;

use crate::message::NetworkMessage;

/// An opaque peer identity. The real transport's `PeerId` type (libp2p's,
/// keyed to a peer's public key) is an external collaborator per
/// `spec.md` §1; this crate only needs something hashable to downscore.
pub type PeerId = String;

/// What a real transport (libp2p/quic gossipsub) would hand up to the
/// node: the message itself plus who sent it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub peer: PeerId,
    pub message: NetworkMessage,
}

/// The boundary between the node and its gossip transport. The libp2p/
/// quic transport internals are out of scope (`spec.md` §1); this trait
/// is what a real transport implementation is expected to satisfy, and
/// is the seam a test harness substitutes an in-memory transport at.
#[async_trait]
pub trait GossipTransport: Send + Sync {
    async fn publish(&self, message: NetworkMessage) -> Result<(), crate::error::Error>;

    /// Block until the next gossip message arrives, or `None` if the
    /// transport has shut down.
    async fn next_message(&mut self) -> Option<InboundMessage>;

    /// Penalize `peer` for a tier-2 protocol violation (`spec.md` §7).
    /// Peer scoring internals are out of scope; this is the hook a real
    /// transport wires to its scoring system.
    fn downscore(&self, peer: &PeerId);
}
