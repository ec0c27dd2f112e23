// Axis-separated collision resolution against static obstacles
//
// Horizontal first, then vertical. Each obstacle is tested against the live,
// already-snapped rectangle, so a corner touched on both axes resolves as a
// wall contact before it can become a landing. Hazards and exits never push
// back; they are checked after both passes.

use super::movement::MovementState;
use crate::core::Rect;
use crate::engine::physics::{ContactListener, ObstacleKind, ObstacleProvider};

#[derive(Debug, Clone, Copy, Default)]
pub struct CollisionResolver;

impl CollisionResolver {
    pub fn new() -> Self {
        Self
    }

    /// Run both passes for one tick
    pub fn resolve<O>(
        &self,
        rect: &mut Rect,
        movement: &mut MovementState,
        obstacles: &O,
        listener: &mut dyn ContactListener,
    ) where
        O: ObstacleProvider + ?Sized,
    {
        self.resolve_horizontal(rect, movement, obstacles, listener);
        self.resolve_vertical(rect, movement, obstacles, listener);
    }

    pub fn resolve_horizontal<O>(
        &self,
        rect: &mut Rect,
        movement: &mut MovementState,
        obstacles: &O,
        listener: &mut dyn ContactListener,
    ) where
        O: ObstacleProvider + ?Sized,
    {
        let step = movement.velocity.x;
        rect.x += step;

        // Climbing only survives while the wall is still being pushed against
        let was_climbing = movement.is_climbing;
        movement.is_climbing = false;
        let mut caught = false;

        for obstacle in obstacles.obstacles() {
            if !obstacle.is_solid() || !rect.intersects(&obstacle.rect) {
                continue;
            }

            let snap_right_edge = if step != 0.0 { step > 0.0 } else { movement.direction > 0 };

            if movement.can_catch_wall() {
                // Face the wall so a wall jump launches away from it
                movement.direction = if snap_right_edge { 1 } else { -1 };
                movement.start_climbing();
                if !was_climbing && !caught {
                    caught = true;
                    log::debug!("wall catch on {}", obstacle.id);
                    listener.on_wall_catch();
                }
            }

            if snap_right_edge {
                rect.set_right(obstacle.rect.left());
            } else {
                rect.set_left(obstacle.rect.right());
            }
            movement.stop_horizontal();
        }
    }

    pub fn resolve_vertical<O>(
        &self,
        rect: &mut Rect,
        movement: &mut MovementState,
        obstacles: &O,
        listener: &mut dyn ContactListener,
    ) where
        O: ObstacleProvider + ?Sized,
    {
        let was_on_ground = movement.on_ground;
        let step = movement.velocity.y;
        rect.y += step;

        movement.on_ground = false;
        // A ground dash holds its height, so it is not airtime yet
        if !movement.in_ground_dash() {
            movement.air_frames = movement.air_frames.saturating_add(1);
        }
        if movement.is_dashing {
            movement.velocity.y = 0.0;
        }

        for obstacle in obstacles.obstacles() {
            if !obstacle.is_solid() || !rect.intersects(&obstacle.rect) {
                continue;
            }

            if step > 0.0 {
                rect.set_bottom(obstacle.rect.top());
                movement.on_ground = true;
                movement.air_frames = 0;
                listener.on_landed_on(obstacle);
            } else if step < 0.0 {
                rect.set_top(obstacle.rect.bottom());
            }
            movement.velocity.y = 0.0;
        }

        if movement.on_ground && !was_on_ground {
            log::trace!("landed at {:.1}, {:.1}", rect.x, rect.y);
            movement.land();
        }
    }

    /// Report hazards and exits overlapping the resolved rectangle
    ///
    /// A dashing runner passes through hazards unharmed.
    pub fn check_triggers<O>(
        &self,
        rect: &Rect,
        movement: &MovementState,
        obstacles: &O,
        listener: &mut dyn ContactListener,
    ) where
        O: ObstacleProvider + ?Sized,
    {
        for obstacle in obstacles.obstacles() {
            if !rect.intersects(&obstacle.rect) {
                continue;
            }
            match obstacle.kind {
                ObstacleKind::Hazard if !movement.is_dashing => {
                    log::debug!("hazard {} hit", obstacle.id);
                    listener.on_hazard(obstacle);
                }
                ObstacleKind::Exit => listener.on_exit(obstacle),
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::physics::{ContactEvent, ContactLog, Obstacle, ObstacleId, ObstacleKind};
    use crate::game::characters::movement::JumpKind;
    use glam::Vec2;

    const RUNNER: Vec2 = Vec2::new(20.0, 40.0);

    fn runner_at(x: f32, y: f32) -> Rect {
        Rect::from_top_left(Vec2::new(x, y), RUNNER)
    }

    fn floor() -> Obstacle {
        Obstacle::new(1, Rect::new(-500.0, 100.0, 1000.0, 50.0))
    }

    fn wall() -> Obstacle {
        Obstacle::new(2, Rect::new(100.0, -500.0, 50.0, 1000.0))
    }

    fn spikes() -> Obstacle {
        Obstacle::with_kind(7, Rect::new(0.0, 30.0, 50.0, 20.0), ObstacleKind::Hazard)
    }

    fn assert_no_overlap(rect: &Rect, obstacles: &[Obstacle]) {
        for obstacle in obstacles {
            assert!(
                !rect.intersects(&obstacle.rect),
                "{:?} overlaps {:?}",
                rect,
                obstacle
            );
        }
    }

    #[test]
    fn test_landing_snaps_and_resets() {
        // Bottom sits 5 above the floor, falling at 10 per tick
        let mut rect = runner_at(0.0, 55.0);
        let mut movement = MovementState::default();
        movement.air_frames = 20;
        movement.can_jump = false;
        movement.can_double_jump = false;
        movement.velocity.y = 10.0;
        let obstacles = vec![floor()];
        let mut log = ContactLog::new();

        CollisionResolver.resolve_vertical(&mut rect, &mut movement, &obstacles, &mut log);

        assert_eq!(rect.bottom(), 100.0);
        assert!(movement.on_ground);
        assert_eq!(movement.air_frames, 0);
        assert_eq!(movement.velocity.y, 0.0);
        assert!(movement.can_jump && movement.can_double_jump);
        assert_eq!(log.events(), &[ContactEvent::Landed(ObstacleId(1))]);
    }

    #[test]
    fn test_reset_actions_only_on_rising_edge() {
        let mut rect = runner_at(0.0, 60.0);
        let mut movement = MovementState::default();
        let obstacles = vec![floor()];

        movement.velocity.y = 1.0;
        CollisionResolver.resolve_vertical(&mut rect, &mut movement, &obstacles, &mut ());
        assert!(movement.on_ground);

        // Still grounded next tick: spent actions are not handed back
        movement.can_dash = false;
        movement.velocity.y = 0.8;
        CollisionResolver.resolve_vertical(&mut rect, &mut movement, &obstacles, &mut ());
        assert!(movement.on_ground);
        assert!(!movement.can_dash);
    }

    #[test]
    fn test_head_bump() {
        let ceiling = Obstacle::new(3, Rect::new(-100.0, 0.0, 200.0, 20.0));
        let mut rect = runner_at(0.0, 25.0);
        let mut movement = MovementState::default();
        movement.velocity.y = -10.0;
        let obstacles = vec![ceiling];
        let mut log = ContactLog::new();

        CollisionResolver.resolve_vertical(&mut rect, &mut movement, &obstacles, &mut log);

        assert_eq!(rect.top(), 20.0);
        assert_eq!(movement.velocity.y, 0.0);
        assert!(!movement.on_ground);
        assert!(log.events().is_empty());
    }

    #[test]
    fn test_running_into_wall_stops() {
        let mut rect = runner_at(78.0, 0.0);
        let mut movement = MovementState::default();
        movement.on_ground = true;
        movement.velocity.x = 5.0;
        let obstacles = vec![wall()];

        CollisionResolver.resolve_horizontal(&mut rect, &mut movement, &obstacles, &mut ());

        assert_eq!(rect.right(), 100.0);
        assert_eq!(movement.velocity.x, 0.0);
        assert!(!movement.is_climbing, "grounded runners do not climb");
        assert_no_overlap(&rect, &obstacles);
    }

    #[test]
    fn test_wall_catch_after_grace() {
        let mut rect = runner_at(78.0, 0.0);
        let mut movement = MovementState::default();
        movement.air_frames = 11;
        movement.can_jump = false;
        movement.velocity.x = 5.0;
        let obstacles = vec![wall()];
        let mut log = ContactLog::new();

        CollisionResolver.resolve_horizontal(&mut rect, &mut movement, &obstacles, &mut log);

        assert!(movement.is_climbing);
        assert!(movement.can_jump);
        assert_eq!(log.drain(), vec![ContactEvent::WallCatch]);

        // Holding into the wall keeps the climb without a second catch
        movement.velocity.x = 1.0;
        CollisionResolver.resolve_horizontal(&mut rect, &mut movement, &obstacles, &mut log);
        assert!(movement.is_climbing);
        assert!(log.events().is_empty());
    }

    #[test]
    fn test_no_catch_inside_grace() {
        let mut rect = runner_at(78.0, 0.0);
        let mut movement = MovementState::default();
        movement.air_frames = 10;
        movement.velocity.x = 5.0;
        let obstacles = vec![wall()];

        CollisionResolver.resolve_horizontal(&mut rect, &mut movement, &obstacles, &mut ());
        assert!(!movement.is_climbing);
    }

    #[test]
    fn test_releasing_wall_ends_climb() {
        let mut rect = runner_at(80.0, 0.0);
        let mut movement = MovementState::default();
        movement.air_frames = 30;
        movement.is_climbing = true;
        let obstacles = vec![wall()];

        CollisionResolver.resolve_horizontal(&mut rect, &mut movement, &obstacles, &mut ());
        assert!(!movement.is_climbing);
    }

    #[test]
    fn test_left_snap() {
        let mut rect = runner_at(152.0, 0.0);
        let mut movement = MovementState::default();
        movement.on_ground = true;
        movement.velocity.x = -5.0;
        let obstacles = vec![wall()];

        CollisionResolver.resolve_horizontal(&mut rect, &mut movement, &obstacles, &mut ());
        assert_eq!(rect.left(), 150.0);
    }

    #[test]
    fn test_wall_hit_ends_dash() {
        let mut rect = runner_at(70.0, 0.0);
        let mut movement = MovementState::default();
        movement.on_ground = true;
        movement.dash();
        movement.velocity.x = 15.0;
        let obstacles = vec![wall()];

        CollisionResolver.resolve_horizontal(&mut rect, &mut movement, &obstacles, &mut ());
        assert!(!movement.is_dashing);
        assert_no_overlap(&rect, &obstacles);
    }

    #[test]
    fn test_wall_catch_faces_the_wall() {
        let left_wall = Obstacle::new(6, Rect::new(0.0, -500.0, 50.0, 1000.0));
        let obstacles = vec![left_wall, wall()];
        let mut rect = runner_at(78.0, 0.0);
        let mut movement = MovementState::default();
        movement.air_frames = 30;
        movement.velocity.x = 5.0;
        let mut log = ContactLog::new();

        CollisionResolver.resolve_horizontal(&mut rect, &mut movement, &obstacles, &mut log);
        assert!(movement.is_climbing);
        assert_eq!(movement.direction, 1);

        // Launch off the right wall and catch the left one mid-launch
        assert_eq!(movement.jump(), Some(JumpKind::Wall));
        for _ in 0..movement.stats.climbing_jump_ticks {
            movement.update();
            CollisionResolver.resolve_horizontal(&mut rect, &mut movement, &obstacles, &mut log);
            if movement.is_climbing {
                break;
            }
        }
        assert!(movement.is_climbing);
        assert_eq!(rect.left(), 50.0);
        assert_eq!(movement.direction, -1);
        assert_eq!(log.events(), &[ContactEvent::WallCatch, ContactEvent::WallCatch]);

        assert_eq!(movement.jump(), Some(JumpKind::Wall));
        assert_eq!(movement.velocity.x, 5.0);
    }

    #[test]
    fn test_ground_dash_into_wall_does_not_climb() {
        let near_wall = Obstacle::new(2, Rect::new(135.0, -500.0, 50.0, 1000.0));
        let obstacles = vec![floor(), near_wall];
        let mut rect = runner_at(80.0, 60.0);
        let mut movement = MovementState::default();
        movement.on_ground = true;
        assert!(movement.dash());
        let mut log = ContactLog::new();

        for _ in 0..20 {
            movement.update();
            CollisionResolver.resolve(&mut rect, &mut movement, &obstacles, &mut log);
            assert!(!movement.is_climbing);
            assert_no_overlap(&rect, &obstacles);
        }
        assert_eq!(rect.right(), 135.0);
        assert_eq!(rect.bottom(), 100.0);
        assert!(movement.on_ground);
        assert!(!log.events().contains(&ContactEvent::WallCatch));
    }

    #[test]
    fn test_corner_resolves_as_wall_first() {
        // Falling diagonally past the top corner of a block
        let block = Obstacle::new(4, Rect::new(100.0, 100.0, 100.0, 100.0));
        let mut rect = runner_at(78.0, 62.0);
        let mut movement = MovementState::default();
        movement.air_frames = 30;
        movement.velocity = Vec2::new(5.0, 5.0);
        let obstacles = vec![block];
        let mut log = ContactLog::new();

        CollisionResolver.resolve(&mut rect, &mut movement, &obstacles, &mut log);

        assert_eq!(rect.right(), 100.0);
        assert!(movement.is_climbing);
        assert!(!movement.on_ground);
        assert_eq!(log.events(), &[ContactEvent::WallCatch]);
        assert_no_overlap(&rect, &obstacles);
    }

    #[test]
    fn test_degenerate_obstacle_ignored() {
        let sliver = Obstacle::new(5, Rect::new(0.0, 45.0, 100.0, 0.0));
        let mut rect = runner_at(0.0, 0.0);
        let mut movement = MovementState::default();
        movement.velocity.y = 10.0;
        let obstacles = vec![sliver];

        CollisionResolver.resolve(&mut rect, &mut movement, &obstacles, &mut ());
        assert_eq!(rect.top(), 10.0);
        assert!(!movement.on_ground);
    }

    #[test]
    fn test_dash_reasserts_zero_vertical() {
        let mut rect = runner_at(0.0, 0.0);
        let mut movement = MovementState::default();
        movement.dash();
        movement.velocity.y = 3.0;
        let obstacles: Vec<Obstacle> = Vec::new();

        CollisionResolver.resolve_vertical(&mut rect, &mut movement, &obstacles, &mut ());
        assert_eq!(movement.velocity.y, 0.0);
        assert_eq!(movement.air_frames, 1);
    }

    #[test]
    fn test_hazards_and_exits_do_not_block() {
        let obstacles = vec![
            Obstacle::with_kind(7, Rect::new(-500.0, 50.0, 1000.0, 20.0), ObstacleKind::Hazard),
            Obstacle::with_kind(8, Rect::new(20.0, -500.0, 10.0, 1000.0), ObstacleKind::Exit),
        ];
        let mut rect = runner_at(0.0, 0.0);
        let mut movement = MovementState::default();
        movement.air_frames = 30;
        movement.velocity = Vec2::new(5.0, 20.0);
        let mut log = ContactLog::new();

        CollisionResolver.resolve(&mut rect, &mut movement, &obstacles, &mut log);

        assert_eq!(rect.top_left(), Vec2::new(5.0, 20.0));
        assert!(!movement.on_ground);
        assert!(!movement.is_climbing);
        assert!(log.events().is_empty());
    }

    #[test]
    fn test_triggers_report_overlaps() {
        let door = Obstacle::with_kind(8, Rect::new(10.0, 0.0, 20.0, 40.0), ObstacleKind::Exit);
        let obstacles = vec![floor(), spikes(), door];
        let rect = runner_at(0.0, 20.0);
        let movement = MovementState::default();
        let mut log = ContactLog::new();

        CollisionResolver.check_triggers(&rect, &movement, &obstacles, &mut log);
        assert_eq!(
            log.events(),
            &[ContactEvent::Hazard(ObstacleId(7)), ContactEvent::Exit(ObstacleId(8))]
        );
    }

    #[test]
    fn test_dash_passes_through_hazards() {
        let obstacles = vec![spikes()];
        let rect = runner_at(0.0, 20.0);
        let mut movement = MovementState::default();
        movement.dash();
        let mut log = ContactLog::new();

        CollisionResolver.check_triggers(&rect, &movement, &obstacles, &mut log);
        assert!(log.events().is_empty());

        movement.stop_horizontal();
        CollisionResolver.check_triggers(&rect, &movement, &obstacles, &mut log);
        assert_eq!(log.events(), &[ContactEvent::Hazard(ObstacleId(7))]);
    }

    #[test]
    fn test_no_penetration_over_many_ticks() {
        let obstacles = vec![floor(), wall()];
        let mut rect = runner_at(0.0, 0.0);
        let mut movement = MovementState::default();

        for _ in 0..120 {
            movement.move_right();
            movement.update();
            CollisionResolver.resolve(&mut rect, &mut movement, &obstacles, &mut ());
            assert_no_overlap(&rect, &obstacles);
        }
        assert!(movement.on_ground);
        assert_eq!(rect.right(), 100.0);
    }
}
