// Game-side simulation: the runner and the course it runs on

pub mod characters;
pub mod level;

/// Something advanced by wall-clock time between ticks (cosmetic or level timers)
pub trait Updatable {
    fn update(&mut self, dt: f32);
}
