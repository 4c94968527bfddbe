use async_trait::async_trait;
use network::{Error, GossipTransport, InboundMessage, NetworkMessage, PeerId};
use slog::{debug, Logger};
use tokio::sync::mpsc;

/// A stand-in for the libp2p/quic transport (`spec.md` §1: out of
/// scope). Every published message loops back as an inbound message
/// from this node's own `PeerId`, so a single-node devnet can exercise
/// the full propose/attest/observe cycle without a real network.
///
/// A multi-node deployment replaces this with a real `GossipTransport`
/// impl; nothing else in the node needs to change.
pub struct LoopbackTransport {
    self_id: PeerId,
    inbound: mpsc::UnboundedReceiver<InboundMessage>,
    outbound: mpsc::UnboundedSender<InboundMessage>,
    log: Logger,
}

impl LoopbackTransport {
    pub fn new(self_id: PeerId, log: Logger) -> Self {
        let (outbound, inbound) = mpsc::unbounded_channel();
        LoopbackTransport {
            self_id,
            inbound,
            outbound,
            log,
        }
    }
}

#[async_trait]
impl GossipTransport for LoopbackTransport {
    async fn publish(&self, message: NetworkMessage) -> Result<(), Error> {
        debug!(self.log, "Publishing"; "topic" => ?message.topic());
        self.outbound
            .send(InboundMessage {
                peer: self.self_id.clone(),
                message,
            })
            .map_err(|_| Error::Transport("loopback channel closed".to_string()))
    }

    async fn next_message(&mut self) -> Option<InboundMessage> {
        self.inbound.recv().await
    }

    fn downscore(&self, peer: &PeerId) {
        debug!(self.log, "Downscoring peer"; "peer" => peer);
    }
}
