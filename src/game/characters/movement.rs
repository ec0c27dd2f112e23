// Movement state machine: velocity, capability flags and tick timers
//
// Flags compose rather than forming one exclusive state. Two invariants hold
// across every public operation:
// - at most one of `is_dashing`, `is_climbing`, `is_climbing_jump` is set
// - gravity does not touch `velocity.y` while dashing or climbing-jumping

use super::state::MovementPhase;
use super::stats::MovementStats;
use crate::core::math::approach;
use glam::Vec2;

/// Fraction of a ramp step below which speed snaps to its target
const RAMP_SNAP: f32 = 1e-3;

/// Which kind of jump a `jump()` call performed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpKind {
    /// From the ground or within coyote time
    Ground,
    /// The single air jump
    Double,
    /// Jump out of a dash's prepare window
    Super,
    /// Jump off a wall while climbing
    Wall,
}

#[derive(Debug, Clone)]
pub struct MovementState {
    pub stats: MovementStats,

    /// Facing, 1 for right and -1 for left
    pub direction: i8,
    pub velocity: Vec2,
    pub on_ground: bool,
    /// Ticks since the last ground contact
    pub air_frames: u32,

    pub can_jump: bool,
    pub can_double_jump: bool,
    pub can_dash: bool,

    pub is_running: bool,
    pub is_dashing: bool,
    /// The current dash began on the ground
    pub dash_from_ground: bool,
    pub is_super_jumping: bool,
    pub is_climbing: bool,
    pub is_climbing_jump: bool,

    pub dash_timer: u32,
    /// Ticks elapsed since the dash started
    pub dash_frames: u32,
    pub dash_cooldown_timer: u32,
    pub climbing_jump_timer: u32,
    pub super_jump_lock_timer: u32,
}

impl MovementState {
    pub fn new(stats: MovementStats) -> Self {
        Self {
            stats,
            direction: 1,
            velocity: Vec2::ZERO,
            on_ground: false,
            air_frames: 0,
            can_jump: true,
            can_double_jump: true,
            can_dash: true,
            is_running: false,
            is_dashing: false,
            dash_from_ground: false,
            is_super_jumping: false,
            is_climbing: false,
            is_climbing_jump: false,
            dash_timer: 0,
            dash_frames: 0,
            dash_cooldown_timer: 0,
            climbing_jump_timer: 0,
            super_jump_lock_timer: 0,
        }
    }

    /// Derived high-level phase, for animation and debugging
    pub fn phase(&self) -> MovementPhase {
        if self.is_climbing_jump {
            MovementPhase::ClimbingJump
        } else if self.is_climbing {
            MovementPhase::Climbing
        } else if self.is_dashing {
            MovementPhase::Dashing
        } else if self.is_super_jumping {
            MovementPhase::SuperJumping
        } else if !self.on_ground {
            if self.velocity.y < 0.0 {
                MovementPhase::Jumping
            } else {
                MovementPhase::Falling
            }
        } else if self.is_running && self.velocity.x != 0.0 {
            MovementPhase::Running
        } else {
            MovementPhase::Idle
        }
    }

    /// Within the dash's opening window where a jump becomes a super jump
    pub fn in_dash_prepare(&self) -> bool {
        self.is_dashing && self.dash_frames <= self.stats.dash_prepare_ticks
    }

    /// A dash that left from the ground does not count as air time
    pub fn in_ground_dash(&self) -> bool {
        self.is_dashing && self.dash_from_ground
    }

    /// Airborne long enough that touching a wall latches onto it
    pub fn can_catch_wall(&self) -> bool {
        !self.on_ground && self.air_frames > self.stats.wall_catch_grace_ticks
    }

    /// Right after a super jump, requests are ignored until `can_jump` returns
    pub fn super_jump_locked(&self) -> bool {
        self.super_jump_lock_timer > 0 && !self.can_jump
    }

    /// Whether horizontal input currently steers the runner
    pub fn accepts_horizontal_input(&self) -> bool {
        !(self.is_dashing || self.is_super_jumping || self.is_climbing_jump)
    }

    /// Request a jump. Returns what kind of jump happened, if any.
    pub fn jump(&mut self) -> Option<JumpKind> {
        if self.is_climbing_jump || self.super_jump_locked() {
            return None;
        }

        if self.in_dash_prepare() && self.can_jump {
            self.super_jump();
            return Some(JumpKind::Super);
        }

        if self.is_climbing {
            self.climbing_jump();
            return Some(JumpKind::Wall);
        }

        let coyote = self.air_frames < self.stats.coyote_ticks;

        if !self.on_ground && !coyote && self.can_double_jump && !self.is_dashing {
            self.can_double_jump = false;
            self.velocity.y = self.stats.double_jump_force;
            self.is_super_jumping = false;
            return Some(JumpKind::Double);
        }

        if (self.on_ground || coyote) && self.can_jump && !self.is_dashing {
            self.can_jump = false;
            self.on_ground = false;
            self.velocity.y = self.stats.jump_force;
            return Some(JumpKind::Ground);
        }

        None
    }

    fn super_jump(&mut self) {
        let direction = f32::from(self.direction);
        self.is_dashing = false;
        self.dash_timer = 0;
        self.is_super_jumping = true;
        self.can_jump = false;
        self.on_ground = false;
        self.super_jump_lock_timer = self.stats.super_jump_lock_ticks;
        self.velocity = Vec2::new(
            self.stats.dash_speed * direction * self.stats.super_jump_horizontal_rate,
            self.stats.jump_force,
        );
    }

    fn climbing_jump(&mut self) {
        let away = -f32::from(self.direction);
        self.is_climbing = false;
        self.is_climbing_jump = true;
        self.climbing_jump_timer = self.stats.climbing_jump_ticks;
        self.can_jump = false;
        self.velocity = Vec2::new(away * self.stats.wall_jump_speed, self.stats.wall_jump_force);
    }

    /// Request a dash. Returns whether the dash started.
    pub fn dash(&mut self) -> bool {
        if !self.can_dash || self.is_climbing_jump || self.super_jump_locked() {
            return false;
        }

        if self.is_climbing {
            // Dash off the wall
            self.direction = -self.direction;
            self.is_climbing = false;
        }

        self.is_dashing = true;
        self.dash_from_ground = self.on_ground;
        self.is_running = false;
        self.can_dash = false;
        self.dash_timer = self.stats.dash_duration_ticks;
        self.dash_frames = 0;
        self.dash_cooldown_timer = self.stats.dash_cooldown_ticks;
        self.velocity.y = 0.0;
        true
    }

    /// Advance exactly one fixed tick
    pub fn update(&mut self) {
        if self.is_climbing_jump {
            self.climbing_jump_timer = self.climbing_jump_timer.saturating_sub(1);
            if self.climbing_jump_timer == 0 {
                self.is_climbing_jump = false;
                self.direction = -self.direction;
            }
            return;
        }

        self.apply_gravity();
        self.update_dash();
        self.update_cooldowns();

        if self.is_climbing {
            self.velocity.y = self.stats.climb_slide_speed;
        }
    }

    fn apply_gravity(&mut self) {
        if !self.is_dashing {
            self.velocity.y =
                (self.velocity.y + self.stats.gravity).min(self.stats.terminal_velocity);
        }
    }

    fn update_dash(&mut self) {
        if !self.is_dashing {
            return;
        }

        self.dash_timer = self.dash_timer.saturating_sub(1);
        self.dash_frames += 1;
        self.velocity.y = 0.0;

        if self.dash_frames <= self.stats.dash_prepare_ticks {
            if !self.is_super_jumping {
                self.velocity.x = 0.0;
            }
        } else {
            self.velocity.x = self.stats.dash_speed * f32::from(self.direction);
        }

        if self.dash_timer == 0 {
            self.is_dashing = false;
        }
    }

    fn update_cooldowns(&mut self) {
        if !self.can_dash && self.dash_cooldown_timer > 0 {
            self.dash_cooldown_timer -= 1;
            if self.dash_cooldown_timer == 0 {
                self.can_dash = true;
            }
        }
        self.super_jump_lock_timer = self.super_jump_lock_timer.saturating_sub(1);
    }

    pub fn move_left(&mut self) {
        self.move_horizontal(-1);
    }

    pub fn move_right(&mut self) {
        self.move_horizontal(1);
    }

    fn move_horizontal(&mut self, direction: i8) {
        let sign = f32::from(direction);
        self.is_running = true;
        self.direction = direction;

        // Reversing is a hard stop, not a turn-around curve
        if self.velocity.x * sign < 0.0 {
            self.velocity.x = 0.0;
        }
        let step = self.stats.accel_step();
        let mut speed = (self.velocity.x * sign + step).min(self.stats.run_speed);
        // Float steps land a hair short of the cap on the last ramp tick
        if self.stats.run_speed - speed < step * RAMP_SNAP {
            speed = self.stats.run_speed;
        }
        self.velocity.x = speed * sign;
    }

    /// Ease horizontal speed toward zero when no direction is held
    pub fn decelerate(&mut self) {
        let step = self.stats.decel_step();
        self.velocity.x = approach(self.velocity.x, 0.0, step);
        if self.velocity.x.abs() < step * RAMP_SNAP {
            self.velocity.x = 0.0;
        }
        if self.velocity.x == 0.0 {
            self.is_running = false;
        }
    }

    /// Horizontal contact: stop dead and end any dash or super jump
    pub fn stop_horizontal(&mut self) {
        self.velocity.x = 0.0;
        self.is_running = false;
        self.is_dashing = false;
        self.dash_timer = 0;
        self.is_super_jumping = false;
    }

    /// Latch onto a wall: slide slowly and get jump and dash back
    pub fn start_climbing(&mut self) {
        self.is_climbing = true;
        self.is_dashing = false;
        self.dash_timer = 0;
        self.is_climbing_jump = false;
        self.climbing_jump_timer = 0;
        self.is_super_jumping = false;
        self.can_jump = true;
        self.can_dash = true;
    }

    /// Restore jump, double jump and dash together
    pub fn reset_actions(&mut self) {
        self.can_jump = true;
        self.can_double_jump = true;
        self.can_dash = true;
    }

    /// Ground contact rising edge
    pub fn land(&mut self) {
        self.is_super_jumping = false;
        self.super_jump_lock_timer = 0;
        self.reset_actions();
    }

    /// Reinitialise everything for a respawn
    pub fn reset(&mut self) {
        *self = Self::new(self.stats.clone());
    }
}

impl Default for MovementState {
    fn default() -> Self {
        Self::new(MovementStats::default())
    }
}
