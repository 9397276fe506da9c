//! # Flappy Rooms Server Library
//!
//! This library provides the authoritative server for a multiplayer
//! flappy-bird game. Players are grouped into named rooms; every room runs its
//! own fixed-rate simulation and publishes the results to its members only.
//!
//! ## Core Responsibilities
//!
//! ### Authoritative Simulation
//! Gravity, jumping, obstacle spawning and scrolling, collisions and scoring
//! all run here. Clients send intents (join, jump, leave) and render whatever
//! the server publishes.
//!
//! ### Room Lifecycle
//! Rooms are created by the first join, hold at most
//! [`shared::ROOM_CAPACITY`] birds, start ticking when somebody joins a room
//! that is not running, stop when every bird has died and are destroyed when
//! the last member leaves.
//!
//! ### Event Publication
//! Each tick of a running room publishes, in order, the deaths and score
//! changes detected during that tick, a full snapshot of the room, and a
//! game-over notice when the last bird died.
//!
//! ## Architecture Design
//!
//! ### One Task per Room
//! Every running room owns a tokio task ticking it at a fixed rate. Rooms are
//! independent: a room that is ticking never waits on another one, and the
//! registry lock is never held by a tick.
//!
//! ### UDP-Based Communication
//! Uses UDP sockets and bincode-encoded [`shared::Packet`]s. Packets are
//! queued as [`events::GameMessage`]s and written by a single sender task.
//!
//! ## Module Organization
//!
//! - `entity`, `physics`, `obstacles`, `collision`: the per-tick simulation
//! - `room`: one room's state machine and its `step`
//! - `scheduler`: the per-room tick task
//! - `room_manager`: the registry of rooms and client membership
//! - `client_manager`, `network`: connections, timeouts and the UDP loop
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use server::{Server, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut server = Server::new(ServerConfig::default()).await?;
//!
//!     // Runs until a Shutdown message arrives through `server.control()`
//!     server.run().await?;
//!
//!     Ok(())
//! }
//! ```

pub mod client_manager;
pub mod collision;
pub mod config;
pub mod entity;
pub mod error;
pub mod events;
pub mod network;
pub mod obstacles;
pub mod physics;
pub mod room;
pub mod room_manager;
pub mod scheduler;
pub mod utils;

pub use config::ServerConfig;
pub use error::RoomError;
pub use network::Server;
pub use room::{Room, RoomState};
pub use room_manager::RoomManager;
