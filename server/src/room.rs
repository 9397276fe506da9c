//! A single game room and its authoritative simulation step.
//!
//! A room owns its birds (in join order), its obstacles (left to right), the
//! spawn timer and the handle of the repeating tick task driving it. The
//! lifecycle is explicit:
//!
//! ```text
//! Idle --start--> Running --all birds dead--> Stopped --start--> Running
//! ```
//!
//! Removing the room from the registry (last player left) is handled by the
//! room manager, which also cancels the tick task.

use crate::collision;
use crate::entity::{Obstacle, Player};
use crate::error::RoomError;
use crate::events::RoomEvent;
use crate::obstacles;
use crate::physics;
use crate::scheduler::TickHandle;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use shared::{start_x, Packet, PlayerSnapshot, PLAYER_START_Y, ROOM_CAPACITY};
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomState {
    /// Created, tick loop never started
    Idle,
    Running,
    /// Every bird died; the tick loop has ended
    Stopped,
}

/// Everything a single tick produced, in publication order.
#[derive(Debug, Clone)]
pub struct TickOutcome {
    pub events: Vec<RoomEvent>,
    pub snapshot: Packet,
    pub game_over: bool,
}

impl TickOutcome {
    /// Deaths and scores first, then the snapshot, then `GameOver` if the tick ended the game.
    pub fn into_packets(self) -> Vec<Packet> {
        let mut packets: Vec<Packet> = self.events.iter().map(RoomEvent::to_packet).collect();
        packets.push(self.snapshot);
        if self.game_over {
            packets.push(RoomEvent::GameOver.to_packet());
        }
        packets
    }
}

#[derive(Debug)]
pub struct Room {
    pub id: String,
    players: Vec<Player>,
    obstacles: Vec<Obstacle>,
    state: RoomState,
    last_spawn_at: Instant,
    tick: u32,
    ticker: Option<TickHandle>,
    rng: StdRng,
}

impl Room {
    pub fn new(id: &str, now: Instant) -> Self {
        Self::with_rng(id, now, StdRng::from_entropy())
    }

    pub fn with_rng(id: &str, now: Instant, rng: StdRng) -> Self {
        Self {
            id: id.to_string(),
            players: Vec::new(),
            obstacles: Vec::new(),
            state: RoomState::Idle,
            last_spawn_at: now,
            tick: 0,
            ticker: None,
            rng,
        }
    }

    pub fn state(&self) -> RoomState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == RoomState::Running
    }

    pub fn tick(&self) -> u32 {
        self.tick
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    #[cfg(test)]
    fn obstacles_mut(&mut self) -> &mut Vec<Obstacle> {
        &mut self.obstacles
    }

    pub fn player(&self, id: u32) -> Option<&Player> {
        self.players.iter().find(|player| player.id == id)
    }

    pub fn player_mut(&mut self, id: u32) -> Option<&mut Player> {
        self.players.iter_mut().find(|player| player.id == id)
    }

    pub fn population(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.players.len() >= ROOM_CAPACITY
    }

    pub fn member_ids(&self) -> Vec<u32> {
        self.players.iter().map(|player| player.id).collect()
    }

    /// True when the room has birds and none of them is alive.
    pub fn all_dead(&self) -> bool {
        !self.players.is_empty() && self.players.iter().all(|player| !player.is_alive())
    }

    /// Places a new bird in the next lateral slot.
    pub fn add_player(
        &mut self,
        id: u32,
        name: String,
        color: String,
    ) -> Result<PlayerSnapshot, RoomError> {
        if self.is_full() {
            return Err(RoomError::RoomFull {
                room_id: self.id.clone(),
                capacity: ROOM_CAPACITY,
            });
        }

        let player = Player::new(id, name, color, start_x(self.players.len()), PLAYER_START_Y);
        info!(
            "Player {} ({}) joined room {} at ({}, {})",
            id, player.name, self.id, player.x, player.y
        );
        let snapshot = player.snapshot();
        self.players.push(player);
        Ok(snapshot)
    }

    pub fn remove_player(&mut self, id: u32) -> Option<Player> {
        let index = self.players.iter().position(|player| player.id == id)?;
        let player = self.players.remove(index);
        info!("Player {} left room {}", id, self.id);
        Some(player)
    }

    pub fn jump(&mut self, id: u32) -> Result<(), RoomError> {
        let player = self.player_mut(id).ok_or(RoomError::UnknownClient(id))?;
        if physics::jump(player) {
            Ok(())
        } else {
            Err(RoomError::PlayerDead(id))
        }
    }

    /// Hands the room its tick task and moves it to `Running`.
    ///
    /// A room that is already running keeps its current task; the new one is cancelled.
    pub fn start(&mut self, ticker: TickHandle) {
        if self.is_running() {
            ticker.cancel();
            return;
        }
        info!("Game loop started for room {}", self.id);
        self.state = RoomState::Running;
        self.ticker = Some(ticker);
    }

    /// Leaves `Running` and gives up the tick task. Only the first call after a start returns it.
    pub fn stop(&mut self) -> Option<TickHandle> {
        if !self.is_running() {
            return None;
        }
        self.state = RoomState::Stopped;
        self.ticker.take()
    }

    /// Stops the room and cancels its tick task, if any.
    pub fn shutdown(&mut self) {
        if let Some(ticker) = self.stop() {
            ticker.cancel();
        }
    }

    pub fn snapshot(&self) -> Packet {
        Packet::GameState {
            tick: self.tick,
            players: self.players.iter().map(Player::snapshot).collect(),
            obstacles: self.obstacles.iter().map(Obstacle::snapshot).collect(),
        }
    }

    /// Advances the room by one fixed tick.
    ///
    /// Returns `None` if the room is not running, which makes a late tick after a stop a no-op.
    pub fn step(&mut self, now: Instant) -> Option<TickOutcome> {
        if !self.is_running() {
            return None;
        }
        self.tick = self.tick.wrapping_add(1);

        for player in self.players.iter_mut() {
            physics::advance(player);
        }

        let events = collision::evaluate_all(&mut self.players, &mut self.obstacles);

        let game_over = self.all_dead();
        if game_over {
            info!("All players in room {} died, game stopped", self.id);
            // The tick task ends on its own after this tick
            drop(self.stop());
        } else {
            obstacles::maybe_spawn(
                &mut self.obstacles,
                &mut self.last_spawn_at,
                now,
                &mut self.rng,
            );
            obstacles::advance(&mut self.obstacles);
        }

        Some(TickOutcome {
            events,
            snapshot: self.snapshot(),
            game_over,
        })
    }
}
