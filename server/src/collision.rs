//! Collision and scoring rules, evaluated once per tick after physics.

use crate::entity::{Obstacle, Player};
use crate::events::RoomEvent;
use shared::{BIRD_SIZE, FLOOR_Y};

/// True if the bird overlaps the pipe horizontally and is not fully inside its gap.
pub fn hits_obstacle(player: &Player, obstacle: &Obstacle) -> bool {
    let bounds = player.bounds();
    bounds.overlaps_horizontally(obstacle.left(), obstacle.right())
        && !bounds.fits_vertically(obstacle.gap_top, obstacle.gap_bottom)
}

/// True once the bird's left edge is strictly past the pipe's right edge.
pub fn has_passed(player: &Player, obstacle: &Obstacle) -> bool {
    player.x > obstacle.right()
}

/// Runs every rule against one bird, in order: ground, ceiling, then per obstacle hit and score.
///
/// Dead birds are skipped entirely. Events are appended to `events`.
pub fn evaluate(player: &mut Player, obstacles: &mut [Obstacle], events: &mut Vec<RoomEvent>) {
    if !player.is_alive() {
        return;
    }

    if player.y + BIRD_SIZE > FLOOR_Y {
        player.y = FLOOR_Y - BIRD_SIZE;
        player.velocity = 0.0;
        if player.kill() {
            events.push(RoomEvent::PlayerDied { id: player.id });
        }
    }

    // The ceiling only stops the bird
    if player.y < 0.0 {
        player.y = 0.0;
        player.velocity = 0.0;
    }

    for obstacle in obstacles.iter_mut() {
        if player.is_alive() && hits_obstacle(player, obstacle) && player.kill() {
            events.push(RoomEvent::PlayerDied { id: player.id });
        }

        if !obstacle.scored && has_passed(player, obstacle) {
            if let Some(score) = player.award_point() {
                obstacle.scored = true;
                events.push(RoomEvent::ScoreChanged {
                    id: player.id,
                    score,
                });
            }
        }
    }
}

/// Evaluates all birds in join order. Earlier birds claim shared obstacle points first.
pub fn evaluate_all(players: &mut [Player], obstacles: &mut [Obstacle]) -> Vec<RoomEvent> {
    let mut events = Vec::new();
    for player in players.iter_mut() {
        evaluate(player, obstacles, &mut events);
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::PlayerState;
    use crate::physics;
    use shared::{GAP_HEIGHT, OBSTACLE_WIDTH};

    fn bird(id: u32, x: f32, y: f32) -> Player {
        Player::new(id, format!("p{}", id), "#FFFFFF".to_string(), x, y)
    }

    #[test]
    fn test_ground_collision_kills_once() {
        let mut player = bird(1, 50.0, 420.0);
        player.velocity = 5.0;
        let mut events = Vec::new();

        physics::advance(&mut player);
        evaluate(&mut player, &mut [], &mut events);

        assert_eq!(player.state(), PlayerState::Dead);
        assert_eq!(player.y, FLOOR_Y - BIRD_SIZE);
        assert_eq!(player.velocity, 0.0);
        assert_eq!(events, vec![RoomEvent::PlayerDied { id: 1 }]);

        physics::advance(&mut player);
        evaluate(&mut player, &mut [], &mut events);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_resting_exactly_on_floor_is_safe() {
        let mut player = bird(1, 50.0, FLOOR_Y - BIRD_SIZE);
        let mut events = Vec::new();
        evaluate(&mut player, &mut [], &mut events);
        assert!(player.is_alive());
        assert!(events.is_empty());
    }

    #[test]
    fn test_ceiling_is_survivable() {
        let mut player = bird(1, 50.0, -4.0);
        player.velocity = -9.0;
        let mut events = Vec::new();

        evaluate(&mut player, &mut [], &mut events);

        assert!(player.is_alive());
        assert_eq!(player.y, 0.0);
        assert_eq!(player.velocity, 0.0);
        assert!(events.is_empty());
    }

    #[test]
    fn test_flying_through_gap() {
        let mut player = bird(1, 50.0, 150.0);
        let mut obstacles = vec![Obstacle::new(40.0, 100.0)];
        let mut events = Vec::new();

        evaluate(&mut player, &mut obstacles, &mut events);

        assert!(player.is_alive());
        assert!(events.is_empty());
    }

    #[test]
    fn test_hitting_upper_pipe() {
        let mut player = bird(1, 50.0, 90.0);
        let mut obstacles = vec![Obstacle::new(40.0, 100.0)];
        let mut events = Vec::new();

        evaluate(&mut player, &mut obstacles, &mut events);

        assert!(!player.is_alive());
        assert_eq!(events, vec![RoomEvent::PlayerDied { id: 1 }]);
    }

    #[test]
    fn test_hitting_lower_pipe() {
        let mut player = bird(1, 50.0, 100.0 + GAP_HEIGHT - BIRD_SIZE + 1.0);
        let mut obstacles = vec![Obstacle::new(40.0, 100.0)];
        let mut events = Vec::new();

        evaluate(&mut player, &mut obstacles, &mut events);

        assert!(!player.is_alive());
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_pipe_out_of_reach_is_ignored() {
        let mut player = bird(1, 50.0, 10.0);
        let mut obstacles = vec![Obstacle::new(50.0 + BIRD_SIZE, 100.0)];
        let mut events = Vec::new();

        evaluate(&mut player, &mut obstacles, &mut events);

        assert!(player.is_alive());
        assert!(events.is_empty());
    }

    #[test]
    fn test_passing_scores_once() {
        let mut player = bird(1, 50.0, 10.0);
        let mut obstacles = vec![Obstacle::new(50.0 - OBSTACLE_WIDTH - 1.0, 100.0)];
        let mut events = Vec::new();

        evaluate(&mut player, &mut obstacles, &mut events);
        evaluate(&mut player, &mut obstacles, &mut events);

        assert_eq!(player.score, 1);
        assert!(obstacles[0].scored);
        assert_eq!(events, vec![RoomEvent::ScoreChanged { id: 1, score: 1 }]);
    }

    #[test]
    fn test_touching_right_edge_does_not_score() {
        let mut player = bird(1, 50.0, 10.0);
        let mut obstacles = vec![Obstacle::new(50.0 - OBSTACLE_WIDTH, 100.0)];
        let mut events = Vec::new();

        evaluate(&mut player, &mut obstacles, &mut events);

        assert_eq!(player.score, 0);
        assert!(!obstacles[0].scored);
    }

    #[test]
    fn test_killing_obstacle_is_not_scored() {
        // The first obstacle kills the bird; the second one, already passed, must not score
        let mut player = bird(1, 50.0, 90.0);
        let mut obstacles = vec![
            Obstacle::new(40.0, 100.0),
            Obstacle::new(50.0 - OBSTACLE_WIDTH - 1.0, 100.0),
        ];
        let mut events = Vec::new();

        evaluate(&mut player, &mut obstacles, &mut events);

        assert!(!player.is_alive());
        assert_eq!(player.score, 0);
        assert!(!obstacles[1].scored);
        assert_eq!(events, vec![RoomEvent::PlayerDied { id: 1 }]);
    }

    #[test]
    fn test_score_then_death_in_same_tick() {
        // Sequence order: the passed obstacle comes first and scores before the fatal one
        let mut player = bird(1, 100.0, 90.0);
        let mut obstacles = vec![
            Obstacle::new(100.0 - OBSTACLE_WIDTH - 1.0, 100.0),
            Obstacle::new(90.0, 100.0),
        ];

        let events = evaluate_all(std::slice::from_mut(&mut player), &mut obstacles);

        assert_eq!(
            events,
            vec![
                RoomEvent::ScoreChanged { id: 1, score: 1 },
                RoomEvent::PlayerDied { id: 1 },
            ]
        );
        assert_eq!(player.score, 1);
    }

    #[test]
    fn test_dead_players_are_skipped() {
        let mut player = bird(1, 50.0, 90.0);
        player.kill();
        let mut obstacles = vec![
            Obstacle::new(40.0, 100.0),
            Obstacle::new(50.0 - OBSTACLE_WIDTH - 1.0, 100.0),
        ];

        let events = evaluate_all(std::slice::from_mut(&mut player), &mut obstacles);

        assert!(events.is_empty());
        assert!(!obstacles[1].scored);
    }

    #[test]
    fn test_obstacle_points_are_shared_room_wide() {
        // Both birds are past the pipe, only the first in join order gets the point
        let mut players = vec![bird(1, 100.0, 10.0), bird(2, 150.0, 10.0)];
        let mut obstacles = vec![Obstacle::new(0.0, 100.0)];

        let events = evaluate_all(&mut players, &mut obstacles);

        assert_eq!(events, vec![RoomEvent::ScoreChanged { id: 1, score: 1 }]);
        assert_eq!(players[0].score, 1);
        assert_eq!(players[1].score, 0);
    }
}
