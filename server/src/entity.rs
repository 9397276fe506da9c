//! Simulated entities: birds controlled by players and the pipe pairs they fly through.

use shared::{obstacle_span, Bounds, ObstacleSnapshot, PlayerSnapshot, GAP_HEIGHT};

/// Liveness of a bird. `Dead` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    Alive,
    Dead,
}

/// A bird owned by one connected client
#[derive(Debug, Clone)]
pub struct Player {
    pub id: u32,
    pub name: String,
    pub color: String,
    /// Fixed at join time
    pub x: f32,
    pub y: f32,
    pub velocity: f32,
    pub score: u32,
    state: PlayerState,
}

impl Player {
    pub fn new(id: u32, name: String, color: String, x: f32, y: f32) -> Self {
        Self {
            id,
            name,
            color,
            x,
            y,
            velocity: 0.0,
            score: 0,
            state: PlayerState::Alive,
        }
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn is_alive(&self) -> bool {
        self.state == PlayerState::Alive
    }

    /// Moves the bird to `Dead`. Returns true only for the call that performed the transition.
    pub fn kill(&mut self) -> bool {
        match self.state {
            PlayerState::Alive => {
                self.state = PlayerState::Dead;
                true
            }
            PlayerState::Dead => false,
        }
    }

    /// Credits one passed obstacle. Dead birds keep their final score.
    pub fn award_point(&mut self) -> Option<u32> {
        if !self.is_alive() {
            return None;
        }
        self.score += 1;
        Some(self.score)
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::bird(self.x, self.y)
    }

    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            id: self.id,
            name: self.name.clone(),
            color: self.color.clone(),
            x: self.x,
            y: self.y,
            velocity: self.velocity,
            score: self.score,
            alive: self.is_alive(),
        }
    }
}

/// A pipe pair scrolling from right to left
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub x: f32,
    pub gap_top: f32,
    pub gap_bottom: f32,
    /// Shared by the whole room: the first bird to pass the obstacle claims it.
    pub scored: bool,
}

impl Obstacle {
    pub fn new(x: f32, gap_top: f32) -> Self {
        Self {
            x,
            gap_top,
            gap_bottom: gap_top + GAP_HEIGHT,
            scored: false,
        }
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        obstacle_span(self.x).1
    }

    pub fn snapshot(&self) -> ObstacleSnapshot {
        ObstacleSnapshot {
            x: self.x,
            gap_top: self.gap_top,
            gap_bottom: self.gap_bottom,
            scored: self.scored,
        }
    }
}
