//! Messages leaving the simulation: discrete room events and the outbound routing queue.

use shared::Packet;
use std::net::SocketAddr;

/// Something that happened to a room during a tick
#[derive(Debug, Clone, PartialEq)]
pub enum RoomEvent {
    PlayerDied { id: u32 },
    ScoreChanged { id: u32, score: u32 },
    GameOver,
}

impl RoomEvent {
    pub fn to_packet(&self) -> Packet {
        match *self {
            RoomEvent::PlayerDied { id } => Packet::PlayerDied { id },
            RoomEvent::ScoreChanged { id, score } => Packet::UpdateScore { id, score },
            RoomEvent::GameOver => Packet::GameOver,
        }
    }
}

/// Messages sent from the room engine to the network sender task
#[derive(Debug, Clone)]
pub enum GameMessage {
    SendPacket { packet: Packet, client_id: u32 },
    /// For addresses that have no client id yet (handshake replies)
    SendTo { packet: Packet, addr: SocketAddr },
    Multicast { packet: Packet, client_ids: Vec<u32> },
}
