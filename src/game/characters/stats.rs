// Movement tuning - every "frame" quantity is a tick count at TICK_RATE
// Distances are in pixels, speeds in pixels per tick, y grows downward

/// Fixed movement tuning shared by every runner
#[derive(Debug, Clone)]
pub struct MovementStats {
    // Running
    /// Top horizontal running speed
    pub run_speed: f32,
    /// Ticks to ramp from standstill to `run_speed`
    pub accel_ticks: u32,
    /// Ticks to ramp from `run_speed` back to standstill
    pub decel_ticks: u32,

    // Vertical
    /// Downward acceleration per tick
    pub gravity: f32,
    /// Maximum falling speed
    pub terminal_velocity: f32,
    /// Initial vertical speed of a ground jump (negative is up)
    pub jump_force: f32,
    /// Initial vertical speed of the air jump
    pub double_jump_force: f32,
    /// Ticks after leaving the ground during which a ground jump is still allowed
    pub coyote_ticks: u32,

    // Dash
    /// Horizontal speed of the dash burst
    pub dash_speed: f32,
    /// Total dash length in ticks, including the prepare window
    pub dash_duration_ticks: u32,
    /// Opening ticks of a dash where the runner holds still and can super jump
    pub dash_prepare_ticks: u32,
    /// Ticks before a spent dash comes back without landing
    pub dash_cooldown_ticks: u32,

    // Super jump
    /// Multiplier on `dash_speed` for the super jump launch
    pub super_jump_horizontal_rate: f32,
    /// Ticks after a super jump during which new jump/dash requests are ignored
    pub super_jump_lock_ticks: u32,

    // Walls
    /// Airborne ticks required before touching a wall latches onto it
    pub wall_catch_grace_ticks: u32,
    /// Constant downward speed while sliding on a wall
    pub climb_slide_speed: f32,
    /// Horizontal launch speed away from the wall
    pub wall_jump_speed: f32,
    /// Vertical launch speed of a wall jump
    pub wall_jump_force: f32,
    /// Length of the wall jump launch in ticks
    pub climbing_jump_ticks: u32,
}

pub const BASE_STATS: MovementStats = MovementStats {
    run_speed: 5.0,
    accel_ticks: 6,
    decel_ticks: 3,

    gravity: 0.8,
    terminal_velocity: 16.0,
    jump_force: -16.0,
    double_jump_force: -13.0,
    coyote_ticks: 6,

    dash_speed: 15.0,
    dash_duration_ticks: 8,
    dash_prepare_ticks: 4,
    dash_cooldown_ticks: 30,

    super_jump_horizontal_rate: 1.2,
    super_jump_lock_ticks: 10,

    wall_catch_grace_ticks: 10,
    climb_slide_speed: 1.5,
    wall_jump_speed: 5.0,
    wall_jump_force: -8.0,
    climbing_jump_ticks: 8,
};

impl Default for MovementStats {
    fn default() -> Self {
        BASE_STATS
    }
}

impl MovementStats {
    /// Horizontal speed gained per tick while input is held
    pub fn accel_step(&self) -> f32 {
        self.run_speed / self.accel_ticks.max(1) as f32
    }

    /// Horizontal speed lost per tick once input is released
    pub fn decel_step(&self) -> f32 {
        self.run_speed / self.decel_ticks.max(1) as f32
    }
}
