// Movement phases

/// High-level phase of a runner, derived from the movement flags each tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MovementPhase {
    /// Standing still on ground
    #[default]
    Idle,
    /// Moving horizontally on ground
    Running,
    /// In the air, moving upward
    Jumping,
    /// In the air, moving downward
    Falling,
    /// Dashing, including the prepare window
    Dashing,
    /// Launched out of a dash, until the next landing
    SuperJumping,
    /// Sliding down a wall
    Climbing,
    /// Launching away from a wall
    ClimbingJump,
}

impl MovementPhase {
    /// Get the animation name for this phase
    pub fn animation_name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "run",
            Self::Jumping => "jump",
            Self::Falling => "fall",
            Self::Dashing => "dash",
            Self::SuperJumping => "super_jump",
            Self::Climbing => "climb",
            Self::ClimbingJump => "wall_jump",
        }
    }
}

/// Remembers the phase history so presentation can react to transitions
#[derive(Debug, Default)]
pub struct PhaseTracker {
    current: MovementPhase,
    previous: MovementPhase,
    ticks_in_phase: u32,
}

impl PhaseTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> MovementPhase {
        self.current
    }

    pub fn previous_phase(&self) -> MovementPhase {
        self.previous
    }

    /// Ticks spent in the current phase
    pub fn ticks_in_phase(&self) -> u32 {
        self.ticks_in_phase
    }

    /// Record the phase observed this tick. Returns true on a change.
    pub fn observe(&mut self, phase: MovementPhase) -> bool {
        if self.current != phase {
            self.previous = self.current;
            self.current = phase;
            self.ticks_in_phase = 0;
            true
        } else {
            self.ticks_in_phase = self.ticks_in_phase.saturating_add(1);
            false
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
