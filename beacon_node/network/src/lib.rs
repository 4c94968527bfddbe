//! The gossip message contract of `spec.md` §6: topics, wire encoding,
//! and the transport-agnostic boundary the (out of scope) libp2p/quic
//! transport sits behind.

mod error;
mod message;
mod topic;
mod transport;

pub use error::Error;
pub use message::NetworkMessage;
pub use topic::GossipTopic;
pub use transport::{GossipTransport, InboundMessage, PeerId};
