use serde::{Deserialize, Serialize};

// Playfield and tuning constants. The server simulates with these and every
// renderer draws with them, so they must never diverge between the two.
pub const PLAYFIELD_WIDTH: f32 = 800.0;
pub const PLAYFIELD_HEIGHT: f32 = 480.0;
pub const GROUND_HEIGHT: f32 = 50.0;
pub const FLOOR_Y: f32 = PLAYFIELD_HEIGHT - GROUND_HEIGHT;
pub const BIRD_SIZE: f32 = 30.0;
pub const GRAVITY: f32 = 0.5;
pub const JUMP_IMPULSE: f32 = -9.0;

pub const OBSTACLE_WIDTH: f32 = 50.0;
pub const GAP_HEIGHT: f32 = 150.0;
pub const OBSTACLE_SPEED: f32 = 3.0;
pub const SPAWN_INTERVAL_MS: u64 = 2000;
pub const MIN_GAP_Y: f32 = 50.0;
pub const GAP_MARGIN: f32 = 50.0;

pub const PLAYER_START_X: f32 = 50.0;
pub const PLAYER_SLOT_SPACING: f32 = 50.0;
pub const PLAYER_START_Y: f32 = PLAYFIELD_HEIGHT / 2.0;

pub const ROOM_CAPACITY: usize = 4;
pub const TICK_RATE: u32 = 60;
pub const PROTOCOL_VERSION: u32 = 1;

/// Longest display name kept by the server, in characters
pub const MAX_NAME_LEN: usize = 20;
/// Receive buffer a client needs to decode any server packet
pub const MAX_PACKET_SIZE: usize = 4096;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub enum Packet {
    // Client -> server
    Connect {
        client_version: u32,
    },
    Join {
        room_id: String,
        player_name: String,
    },
    Jump,
    Leave,
    Heartbeat,
    Disconnect,

    // Server -> client
    Connected {
        client_id: u32,
    },
    Disconnected {
        reason: String,
    },
    PlayerJoined {
        id: u32,
        x: f32,
        y: f32,
        color: String,
        name: String,
    },
    RoomFull,
    GameState {
        tick: u32,
        players: Vec<PlayerSnapshot>,
        obstacles: Vec<ObstacleSnapshot>,
    },
    PlayerDied {
        id: u32,
    },
    UpdateScore {
        id: u32,
        score: u32,
    },
    PlayerLeft {
        id: u32,
    },
    UpdatePlayersList {
        count: usize,
    },
    GameOver,
}

/// Authoritative view of one bird, as broadcast every tick.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PlayerSnapshot {
    pub id: u32,
    pub name: String,
    pub color: String,
    pub x: f32,
    pub y: f32,
    pub velocity: f32,
    pub score: u32,
    pub alive: bool,
}

impl PlayerSnapshot {
    pub fn bounds(&self) -> Bounds {
        Bounds::bird(self.x, self.y)
    }
}

/// One pipe pair. The passable gap spans `gap_top..gap_bottom`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ObstacleSnapshot {
    pub x: f32,
    pub gap_top: f32,
    pub gap_bottom: f32,
    pub scored: bool,
}

/// Axis-aligned box in playfield coordinates (y grows downwards).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Bounds {
    pub fn bird(x: f32, y: f32) -> Self {
        Self {
            left: x,
            top: y,
            right: x + BIRD_SIZE,
            bottom: y + BIRD_SIZE,
        }
    }

    /// True if `left..right` overlaps this box's horizontal span. Touching edges do not count.
    pub fn overlaps_horizontally(&self, left: f32, right: f32) -> bool {
        self.left < right && self.right > left
    }

    /// True if this box lies entirely inside the vertical band `top..=bottom`.
    pub fn fits_vertically(&self, top: f32, bottom: f32) -> bool {
        self.top >= top && self.bottom <= bottom
    }
}

/// Horizontal span covered by an obstacle whose left edge is at `x`.
pub fn obstacle_span(x: f32) -> (f32, f32) {
    (x, x + OBSTACLE_WIDTH)
}

/// Lateral start position for the player joining a room that already holds `slot` players.
pub fn start_x(slot: usize) -> f32 {
    PLAYER_START_X + slot as f32 * PLAYER_SLOT_SPACING
}
