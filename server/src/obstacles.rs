//! Pipe spawning and scrolling.

use crate::entity::Obstacle;
use rand::Rng;
use shared::{
    FLOOR_Y, GAP_HEIGHT, GAP_MARGIN, MIN_GAP_Y, OBSTACLE_SPEED, PLAYFIELD_WIDTH, SPAWN_INTERVAL_MS,
};
use std::time::{Duration, Instant};

pub const SPAWN_INTERVAL: Duration = Duration::from_millis(SPAWN_INTERVAL_MS);

/// Highest allowed top edge of a gap
pub const MAX_GAP_Y: f32 = FLOOR_Y - GAP_HEIGHT - GAP_MARGIN;

/// Builds a new obstacle at the right edge with a uniformly random gap position.
pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Obstacle {
    let gap_top = rng.gen_range(MIN_GAP_Y..MAX_GAP_Y);
    Obstacle::new(PLAYFIELD_WIDTH, gap_top)
}

/// Appends an obstacle once more than `SPAWN_INTERVAL` has passed since `last_spawn_at`.
///
/// Returns true if an obstacle was spawned, in which case `last_spawn_at` is reset to `now`.
pub fn maybe_spawn<R: Rng + ?Sized>(
    obstacles: &mut Vec<Obstacle>,
    last_spawn_at: &mut Instant,
    now: Instant,
    rng: &mut R,
) -> bool {
    if now.saturating_duration_since(*last_spawn_at) <= SPAWN_INTERVAL {
        return false;
    }
    obstacles.push(generate(rng));
    *last_spawn_at = now;
    true
}

/// Scrolls every obstacle left by `OBSTACLE_SPEED` and drops the ones fully off screen.
///
/// Returns the number of obstacles removed.
pub fn advance(obstacles: &mut Vec<Obstacle>) -> usize {
    for obstacle in obstacles.iter_mut() {
        obstacle.x -= OBSTACLE_SPEED;
    }
    let before = obstacles.len();
    obstacles.retain(|obstacle| obstacle.right() > 0.0);
    before - obstacles.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generated_gap_within_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let obstacle = generate(&mut rng);
            assert_eq!(obstacle.x, PLAYFIELD_WIDTH);
            assert!(obstacle.gap_top >= MIN_GAP_Y);
            assert!(obstacle.gap_top < MAX_GAP_Y);
            assert_eq!(obstacle.gap_bottom - obstacle.gap_top, GAP_HEIGHT);
        }
    }

    #[test]
    fn test_no_spawn_before_interval() {
        let mut rng = StdRng::seed_from_u64(1);
        let start = Instant::now();
        let mut last_spawn_at = start;
        let mut obstacles = Vec::new();

        assert!(!maybe_spawn(&mut obstacles, &mut last_spawn_at, start + SPAWN_INTERVAL, &mut rng));
        assert!(obstacles.is_empty());
        assert_eq!(last_spawn_at, start);
    }

    #[test]
    fn test_spawn_after_interval_resets_timer() {
        let mut rng = StdRng::seed_from_u64(1);
        let start = Instant::now();
        let mut last_spawn_at = start;
        let mut obstacles = Vec::new();

        let now = start + SPAWN_INTERVAL + Duration::from_millis(1);
        assert!(maybe_spawn(&mut obstacles, &mut last_spawn_at, now, &mut rng));
        assert_eq!(obstacles.len(), 1);
        assert_eq!(last_spawn_at, now);

        // Same instant again: the interval starts over
        assert!(!maybe_spawn(&mut obstacles, &mut last_spawn_at, now, &mut rng));
        assert_eq!(obstacles.len(), 1);
    }

    #[test]
    fn test_spawned_obstacles_stay_ordered() {
        let mut rng = StdRng::seed_from_u64(3);
        let start = Instant::now();
        let mut last_spawn_at = start;
        let mut obstacles = Vec::new();

        let mut now = start;
        for _ in 0..3 {
            now += SPAWN_INTERVAL + Duration::from_millis(1);
            maybe_spawn(&mut obstacles, &mut last_spawn_at, now, &mut rng);
            for _ in 0..50 {
                advance(&mut obstacles);
            }
        }

        assert_eq!(obstacles.len(), 3);
        assert!(obstacles.windows(2).all(|pair| pair[0].x < pair[1].x));
    }

    #[test]
    fn test_obstacle_scrolls_off_and_is_removed() {
        let mut obstacles = vec![Obstacle::new(PLAYFIELD_WIDTH, 100.0)];

        // 800 / 3 rounded up: the left edge has just crossed zero
        let ticks_to_origin = (PLAYFIELD_WIDTH / OBSTACLE_SPEED).ceil() as usize;
        for _ in 0..ticks_to_origin {
            assert_eq!(advance(&mut obstacles), 0);
        }
        assert_eq!(obstacles.len(), 1);
        assert!(obstacles[0].x <= 0.0 && obstacles[0].x > -OBSTACLE_SPEED);

        let mut ticks = 0;
        while !obstacles.is_empty() {
            advance(&mut obstacles);
            ticks += 1;
        }
        // Right edge starts at 49 and is dropped once it is no longer positive
        assert_eq!(ticks, 17);
    }
}
