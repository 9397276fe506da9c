//! Error types for room operations.

use thiserror::Error;

/// Errors returned by the room lifecycle operations.
///
/// None of these are fatal: `RoomFull` is reported to the joining client only,
/// the others are logged and dropped by the network layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoomError {
    #[error("Room {room_id} is full ({capacity} players)")]
    RoomFull { room_id: String, capacity: usize },

    #[error("Client {0} is not in a room")]
    UnknownClient(u32),

    #[error("Player {0} is dead")]
    PlayerDead(u32),
}
