//! Fixed-rate tick task, one per running room.
//!
//! The task holds only a weak reference to its room, locks it for the duration
//! of one step and publishes what the step produced to the room's members. It
//! ends by itself when the room stops (everyone died) or disappears, and can be
//! cancelled from outside through its [`TickHandle`].

use crate::events::GameMessage;
use crate::room::Room;
use log::{debug, error, info};
use std::sync::Weak;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

/// Ownership of a room's repeating tick task
#[derive(Debug)]
pub struct TickHandle {
    room_id: String,
    task: JoinHandle<()>,
}

impl TickHandle {
    #[cfg(test)]
    fn room_id(&self) -> &str {
        &self.room_id
    }

    #[cfg(test)]
    fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Aborts the task. A tick already holding the room lock completes first.
    pub fn cancel(self) {
        debug!("Cancelling tick task for room {}", self.room_id);
        self.task.abort();
    }
}

/// Spawns the tick task for `room` on the current runtime.
pub fn spawn(
    room_id: &str,
    room: Weak<Mutex<Room>>,
    tick_duration: Duration,
    outbound: mpsc::UnboundedSender<GameMessage>,
) -> TickHandle {
    let task = tokio::spawn(run_room_loop(
        room_id.to_string(),
        room,
        tick_duration,
        outbound,
    ));
    TickHandle {
        room_id: room_id.to_string(),
        task,
    }
}

async fn run_room_loop(
    room_id: String,
    room: Weak<Mutex<Room>>,
    tick_duration: Duration,
    outbound: mpsc::UnboundedSender<GameMessage>,
) {
    let mut interval_timer = interval(tick_duration);
    interval_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

    // Skip the first tick since it fires immediately
    interval_timer.tick().await;

    loop {
        interval_timer.tick().await;

        let Some(shared_room) = room.upgrade() else {
            debug!("Room {} is gone, tick task exiting", room_id);
            break;
        };

        let (members, outcome) = {
            let mut room = shared_room.lock().await;
            let Some(outcome) = room.step(Instant::now()) else {
                debug!("Room {} is not running, tick task exiting", room_id);
                break;
            };
            if room.tick() % 60 == 0 {
                debug!(
                    "Room {} tick {}: {} players, {} obstacles",
                    room_id,
                    room.tick(),
                    room.population(),
                    room.obstacles().len()
                );
            }
            (room.member_ids(), outcome)
        };

        let game_over = outcome.game_over;
        for packet in outcome.into_packets() {
            if let Err(e) = outbound.send(GameMessage::Multicast {
                packet,
                client_ids: members.clone(),
            }) {
                error!("Failed to queue packet for room {}: {}", room_id, e);
                return;
            }
        }

        if game_over {
            info!("Tick task for room {} finished", room_id);
            break;
        }
    }
}
