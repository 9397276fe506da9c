//! Room registry and membership for the multiplayer server
//!
//! This module owns the process-wide map of active rooms and handles the three
//! player intents that reach the simulation from outside:
//! - `join`: create the room on demand, enforce capacity, place the bird and
//!   start the room's tick task when it is not already running
//! - `jump`: forward a jump to the player's bird, if it is alive
//! - `leave`: remove the bird and tear the room down once it is empty
//!
//! The registry starts empty and only holds rooms that have at least one
//! player. Lock order is always registry first, then room, and the tick tasks
//! only ever take the room lock, so intents and ticks for the same room never
//! run concurrently.

use crate::error::RoomError;
use crate::events::GameMessage;
use crate::room::{Room, RoomState};
use crate::scheduler;
use crate::utils::{player_name_or_default, random_color};
use log::{debug, error, info};
use shared::{Packet, PlayerSnapshot, ROOM_CAPACITY};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, Mutex};

/// Result of a successful join
#[derive(Debug, Clone)]
pub struct JoinOutcome {
    pub room_id: String,
    pub player: PlayerSnapshot,
    /// Room population including the new player
    pub population: usize,
    /// True if this join created the room
    pub created: bool,
    /// True if this join started the room's tick task
    pub started: bool,
}

/// Result of a successful leave
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaveOutcome {
    pub room_id: String,
    /// Players still in the room
    pub remaining: usize,
    /// True if the room was empty and has been torn down
    pub destroyed: bool,
}

#[derive(Default)]
struct Registry {
    rooms: HashMap<String, Arc<Mutex<Room>>>,
    /// Which room each client is currently in
    membership: HashMap<u32, String>,
}

/// Manages every active room and which client plays in which one
///
/// All notifications produced by membership changes are queued on the
/// outbound channel; the per-tick snapshots are queued by each room's
/// tick task on the same channel.
pub struct RoomManager {
    registry: Mutex<Registry>,
    outbound: mpsc::UnboundedSender<GameMessage>,
    tick_duration: Duration,
}

impl RoomManager {
    /// Creates a manager with an empty registry
    ///
    /// `tick_duration` is the fixed step of every room's tick task.
    pub fn new(outbound: mpsc::UnboundedSender<GameMessage>, tick_duration: Duration) -> Self {
        Self {
            registry: Mutex::new(Registry::default()),
            outbound,
            tick_duration,
        }
    }

    /// Puts a client's bird into a room
    ///
    /// Fails with `RoomFull` when the room already holds `ROOM_CAPACITY`
    /// players; the client is told with a `RoomFull` packet and nothing else
    /// changes. A client already in a room leaves it first. On success the
    /// room is told about the newcomer, the newcomer receives a full
    /// snapshot, the tick task is started if the room was not running, and
    /// everyone receives the new head count.
    pub async fn join(
        &self,
        client_id: u32,
        room_id: &str,
        player_name: &str,
    ) -> Result<JoinOutcome, RoomError> {
        let mut registry = self.registry.lock().await;

        let current_room = registry.membership.get(&client_id).cloned();
        if let Some(existing) = registry.rooms.get(room_id).cloned() {
            let rejoining = current_room.as_deref() == Some(room_id);
            if !rejoining && existing.lock().await.is_full() {
                info!(
                    "Room {} is full, client {} could not join",
                    room_id, client_id
                );
                self.send_to(client_id, Packet::RoomFull);
                return Err(RoomError::RoomFull {
                    room_id: room_id.to_string(),
                    capacity: ROOM_CAPACITY,
                });
            }
        }

        if current_room.is_some() {
            self.leave_locked(&mut registry, client_id).await?;
        }

        let (shared_room, created) = match registry.rooms.get(room_id) {
            Some(room) => (Arc::clone(room), false),
            None => (
                Arc::new(Mutex::new(Room::new(room_id, Instant::now()))),
                true,
            ),
        };

        let mut room = shared_room.lock().await;
        let name = player_name_or_default(player_name, client_id);
        let player = room.add_player(client_id, name, random_color())?;

        if created {
            info!("Room {} created", room_id);
            registry
                .rooms
                .insert(room_id.to_string(), Arc::clone(&shared_room));
        }
        registry
            .membership
            .insert(client_id, room_id.to_string());

        let members = room.member_ids();
        self.multicast(
            &members,
            Packet::PlayerJoined {
                id: player.id,
                x: player.x,
                y: player.y,
                color: player.color.clone(),
                name: player.name.clone(),
            },
        );
        self.send_to(client_id, room.snapshot());

        let started = !room.is_running();
        if started {
            let ticker = scheduler::spawn(
                room_id,
                Arc::downgrade(&shared_room),
                self.tick_duration,
                self.outbound.clone(),
            );
            room.start(ticker);
        }

        let population = room.population();
        self.multicast(&members, Packet::UpdatePlayersList { count: population });

        Ok(JoinOutcome {
            room_id: room_id.to_string(),
            player,
            population,
            created,
            started,
        })
    }

    /// Sets the client's bird velocity to the jump impulse
    ///
    /// Returns `UnknownClient` when the client is in no room and
    /// `PlayerDead` when its bird already died; callers drop both.
    pub async fn jump(&self, client_id: u32) -> Result<(), RoomError> {
        let shared_room = {
            let registry = self.registry.lock().await;
            let room_id = registry
                .membership
                .get(&client_id)
                .ok_or(RoomError::UnknownClient(client_id))?;
            registry
                .rooms
                .get(room_id)
                .cloned()
                .ok_or(RoomError::UnknownClient(client_id))?
        };

        let mut room = shared_room.lock().await;
        room.jump(client_id)
    }

    /// Removes the client's bird from its room
    ///
    /// The remaining members are told who left and the new head count. When
    /// the last player leaves, the room's tick task is cancelled and the room
    /// is removed from the registry before this call returns.
    pub async fn leave(&self, client_id: u32) -> Result<LeaveOutcome, RoomError> {
        let mut registry = self.registry.lock().await;
        self.leave_locked(&mut registry, client_id).await
    }

    async fn leave_locked(
        &self,
        registry: &mut Registry,
        client_id: u32,
    ) -> Result<LeaveOutcome, RoomError> {
        let room_id = registry
            .membership
            .remove(&client_id)
            .ok_or(RoomError::UnknownClient(client_id))?;

        let Some(shared_room) = registry.rooms.get(&room_id).cloned() else {
            error!(
                "Client {} was mapped to missing room {}",
                client_id, room_id
            );
            return Err(RoomError::UnknownClient(client_id));
        };

        let mut room = shared_room.lock().await;
        if room.remove_player(client_id).is_none() {
            error!("Client {} was not a player of room {}", client_id, room_id);
        }

        let remaining = room.population();
        let members = room.member_ids();
        self.multicast(&members, Packet::PlayerLeft { id: client_id });
        self.multicast(&members, Packet::UpdatePlayersList { count: remaining });

        let destroyed = room.is_empty();
        if destroyed {
            room.shutdown();
            registry.rooms.remove(&room_id);
            info!("Room {} closed, no players left", room_id);
        }

        Ok(LeaveOutcome {
            room_id,
            remaining,
            destroyed,
        })
    }

    /// Stops every room. Used when the server shuts down.
    pub async fn shutdown(&self) {
        let mut registry = self.registry.lock().await;
        for (room_id, shared_room) in registry.rooms.drain() {
            shared_room.lock().await.shutdown();
            debug!("Room {} shut down", room_id);
        }
        registry.membership.clear();
    }

    /// Returns the room the client is currently in
    pub async fn room_of(&self, client_id: u32) -> Option<String> {
        let registry = self.registry.lock().await;
        registry.membership.get(&client_id).cloned()
    }

    /// Returns the number of rooms in the registry
    pub async fn room_count(&self) -> usize {
        self.registry.lock().await.rooms.len()
    }

    /// Returns the number of players in a room, or None if it does not exist
    pub async fn population(&self, room_id: &str) -> Option<usize> {
        let shared_room = self.registry.lock().await.rooms.get(room_id).cloned()?;
        let room = shared_room.lock().await;
        Some(room.population())
    }

    /// Returns the lifecycle state of a room, or None if it does not exist
    pub async fn room_state(&self, room_id: &str) -> Option<RoomState> {
        let shared_room = self.registry.lock().await.rooms.get(room_id).cloned()?;
        let room = shared_room.lock().await;
        Some(room.state())
    }

    fn send_to(&self, client_id: u32, packet: Packet) {
        if let Err(e) = self.outbound.send(GameMessage::SendPacket { packet, client_id }) {
            error!("Failed to queue packet for client {}: {}", client_id, e);
        }
    }

    fn multicast(&self, client_ids: &[u32], packet: Packet) {
        if client_ids.is_empty() {
            return;
        }
        if let Err(e) = self.outbound.send(GameMessage::Multicast {
            packet,
            client_ids: client_ids.to_vec(),
        }) {
            error!("Failed to queue multicast packet: {}", e);
        }
    }
}
