//! Per-tick bird motion. One call is one fixed step; there is no delta time.

use crate::entity::Player;
use shared::{GRAVITY, JUMP_IMPULSE};

/// Applies gravity to velocity, then velocity to position. Dead birds are left untouched.
pub fn advance(player: &mut Player) {
    if !player.is_alive() {
        return;
    }
    player.velocity += GRAVITY;
    player.y += player.velocity;
}

/// Replaces the bird's velocity with the upward jump impulse.
///
/// Returns false (and changes nothing) when the bird is dead.
pub fn jump(player: &mut Player) -> bool {
    if !player.is_alive() {
        return false;
    }
    player.velocity = JUMP_IMPULSE;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn bird_at(y: f32) -> Player {
        Player::new(1, "p".to_string(), "#FFFFFF".to_string(), 50.0, y)
    }

    #[test]
    fn test_single_tick_without_jump() {
        let mut player = bird_at(240.0);
        advance(&mut player);
        assert_approx_eq!(player.velocity, GRAVITY, 1e-6);
        assert_approx_eq!(player.y, 240.0 + GRAVITY, 1e-6);
    }

    #[test]
    fn test_jump_then_tick() {
        let mut player = bird_at(240.0);
        assert!(jump(&mut player));
        assert_eq!(player.velocity, JUMP_IMPULSE);

        advance(&mut player);
        assert_approx_eq!(player.velocity, JUMP_IMPULSE + GRAVITY, 1e-6);
        assert_approx_eq!(player.y, 240.0 + JUMP_IMPULSE + GRAVITY, 1e-6);
    }

    #[test]
    fn test_velocity_accumulates() {
        let mut player = bird_at(0.0);
        for _ in 0..4 {
            advance(&mut player);
        }
        // 0.5 + 1.0 + 1.5 + 2.0
        assert_approx_eq!(player.y, 5.0, 1e-6);
        assert_approx_eq!(player.velocity, 4.0 * GRAVITY, 1e-6);
    }

    #[test]
    fn test_dead_player_is_frozen() {
        let mut player = bird_at(400.0);
        player.kill();

        assert!(!jump(&mut player));
        advance(&mut player);

        assert_eq!(player.velocity, 0.0);
        assert_eq!(player.y, 400.0);
    }
}
