// The player-controlled runner

use super::collision::CollisionResolver;
use super::movement::MovementState;
use super::state::{MovementPhase, PhaseTracker};
use super::stats::MovementStats;
use crate::core::Rect;
use crate::engine::input::{
    ActionArbiter, ActionKind, ActionSink, ArbiterOutcome, HorizontalIntent, InputBuffer,
};
use crate::engine::physics::{ContactListener, ObstacleProvider};
use crate::game::Updatable;
use glam::Vec2;
use std::sync::Arc;

/// Hitbox size of the runner
pub const PLAYER_SIZE: Vec2 = Vec2::new(32.0, 48.0);

/// How long the perfect-combo highlight lasts, in seconds
pub const PERFECT_GLOW_SECS: f32 = 0.5;

/// Cosmetic highlight shown after a perfect combo
#[derive(Debug, Default)]
pub struct PerfectGlow {
    remaining: f32,
    kind: Option<ActionKind>,
}

impl PerfectGlow {
    pub fn trigger(&mut self, kind: ActionKind) {
        self.remaining = PERFECT_GLOW_SECS;
        self.kind = Some(kind);
    }

    pub fn is_active(&self) -> bool {
        self.kind.is_some()
    }

    /// Which action earned the glow, while it lasts
    pub fn kind(&self) -> Option<ActionKind> {
        self.kind
    }

    /// Fade factor from 1.0 (just triggered) to 0.0
    pub fn intensity(&self) -> f32 {
        (self.remaining / PERFECT_GLOW_SECS).clamp(0.0, 1.0)
    }

    pub fn clear(&mut self) {
        self.remaining = 0.0;
        self.kind = None;
    }
}

impl Updatable for PerfectGlow {
    fn update(&mut self, dt: f32) {
        if self.kind.is_none() {
            return;
        }
        self.remaining -= dt;
        if self.remaining <= 0.0 {
            self.clear();
        }
    }
}

/// Runner entity: movement state, hitbox and its share of the input buffer
#[derive(Debug)]
pub struct Player {
    pub movement: MovementState,
    pub rect: Rect,
    buffer: Arc<InputBuffer>,
    arbiter: ActionArbiter,
    resolver: CollisionResolver,
    phase: PhaseTracker,
    glow: PerfectGlow,
}

impl Player {
    pub fn new(position: Vec2, buffer: Arc<InputBuffer>) -> Self {
        Self::with_config(position, MovementStats::default(), ActionArbiter::default(), buffer)
    }

    pub fn with_config(
        position: Vec2,
        stats: MovementStats,
        arbiter: ActionArbiter,
        buffer: Arc<InputBuffer>,
    ) -> Self {
        Self {
            movement: MovementState::new(stats),
            rect: Rect::from_top_left(position, PLAYER_SIZE),
            buffer,
            arbiter,
            resolver: CollisionResolver::new(),
            phase: PhaseTracker::new(),
            glow: PerfectGlow::default(),
        }
    }

    pub fn buffer(&self) -> &Arc<InputBuffer> {
        &self.buffer
    }

    pub fn position(&self) -> Vec2 {
        self.rect.top_left()
    }

    pub fn phase(&self) -> MovementPhase {
        self.phase.phase()
    }

    pub fn glow(&self) -> &PerfectGlow {
        &self.glow
    }

    /// Advance the runner by one fixed tick
    ///
    /// Order matters: held direction, then buffered actions, then the
    /// movement timers and gravity, then collision (horizontal before
    /// vertical), then hazards and exits. `dt` only drives cosmetic timers.
    pub fn tick<O>(
        &mut self,
        dt: f32,
        intent: HorizontalIntent,
        obstacles: &O,
        listener: &mut dyn ContactListener,
    ) -> ArbiterOutcome
    where
        O: ObstacleProvider + ?Sized,
    {
        self.apply_intent(intent);

        let buffer = Arc::clone(&self.buffer);
        // The arbiter drives `self` as the sink, so it steps out for the call
        let mut arbiter = std::mem::take(&mut self.arbiter);
        let outcome = arbiter.arbitrate(&buffer, self);
        self.arbiter = arbiter;

        self.movement.update();
        self.resolver
            .resolve(&mut self.rect, &mut self.movement, obstacles, listener);
        self.resolver
            .check_triggers(&self.rect, &self.movement, obstacles, listener);

        let held = self.phase.ticks_in_phase() + 1;
        if self.phase.observe(self.movement.phase()) {
            log::debug!(
                "{:?} -> {:?} after {} ticks",
                self.phase.previous_phase(),
                self.phase.phase(),
                held
            );
        }
        self.glow.update(dt);

        outcome
    }

    fn apply_intent(&mut self, intent: HorizontalIntent) {
        // Dashes, super jumps and wall launches own the horizontal axis
        if !self.movement.accepts_horizontal_input() {
            return;
        }
        match intent {
            HorizontalIntent::Right => self.movement.move_right(),
            HorizontalIntent::Left => self.movement.move_left(),
            HorizontalIntent::None => self.movement.decelerate(),
        }
    }

    /// Put the runner back at `position` with a clean slate
    pub fn reset(&mut self, position: Vec2) {
        self.movement.reset();
        self.rect.set_top_left(position);
        self.buffer.clear();
        self.arbiter.reset();
        self.phase.reset();
        self.glow.clear();
    }

    pub fn respawn(&mut self, position: Vec2) {
        log::info!("Respawning at ({:.0}, {:.0})", position.x, position.y);
        self.reset(position);
    }
}

impl ActionSink for Player {
    fn jump(&mut self) {
        match self.movement.jump() {
            Some(kind) => log::debug!("{:?} jump", kind),
            None => log::trace!("jump ignored while {:?}", self.movement.phase()),
        }
    }

    fn dash(&mut self) {
        if self.movement.dash() {
            log::debug!("dash, facing {}", self.movement.direction);
        } else {
            log::trace!("dash ignored while {:?}", self.movement.phase());
        }
    }

    fn on_perfect(&mut self, kind: ActionKind) {
        self.glow.trigger(kind);
    }
}
