/// Fixed timestep driver
///
/// Simulation always advances in whole ticks at `TICK_RATE`. Wall-clock time
/// is accumulated and converted to a number of ticks per frame.
use std::time::{Duration, Instant};

/// Simulation ticks per second
pub const TICK_RATE: u32 = 60;

/// Length of one tick in seconds
pub const FIXED_TIMESTEP: f32 = 1.0 / TICK_RATE as f32;
const FIXED_TIMESTEP_DURATION: Duration = Duration::from_micros(16_667);

/// Maximum ticks per frame, so a long stall cannot snowball
const MAX_TICKS_PER_FRAME: u32 = 5;

/// Accumulator turning frame time into fixed ticks
#[derive(Debug)]
pub struct FixedStep {
    accumulator: Duration,
    last_frame_time: Instant,
    paused: bool,
    tick_count: u64,
}

impl FixedStep {
    pub fn new() -> Self {
        Self {
            accumulator: Duration::ZERO,
            last_frame_time: Instant::now(),
            paused: false,
            tick_count: 0,
        }
    }

    /// Begin a new frame, returns the number of ticks to run
    pub fn begin_frame(&mut self) -> u32 {
        let now = Instant::now();
        let frame_time = now.duration_since(self.last_frame_time);
        self.last_frame_time = now;
        self.advance(frame_time)
    }

    /// Feed an explicit frame duration, returns the number of ticks to run
    pub fn advance(&mut self, frame_time: Duration) -> u32 {
        if self.paused {
            return 0;
        }

        self.accumulator += frame_time;

        let mut ticks = 0;
        while self.accumulator >= FIXED_TIMESTEP_DURATION && ticks < MAX_TICKS_PER_FRAME {
            self.accumulator -= FIXED_TIMESTEP_DURATION;
            ticks += 1;
        }
        if ticks == MAX_TICKS_PER_FRAME && self.accumulator >= FIXED_TIMESTEP_DURATION {
            log::debug!("dropping {:?} of backlog", self.accumulator);
            self.accumulator = Duration::ZERO;
        }

        self.tick_count += u64::from(ticks);
        ticks
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            log::info!("Game paused");
        }
    }

    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            // Reset so resuming does not burst through the paused time
            self.accumulator = Duration::ZERO;
            self.last_frame_time = Instant::now();
            log::info!("Game resumed");
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }
}

impl Default for FixedStep {
    fn default() -> Self {
        Self::new()
    }
}
