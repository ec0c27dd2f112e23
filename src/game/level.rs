// Course geometry and temporary platforms

use crate::core::Rect;
use crate::engine::physics::{
    ContactListener, Obstacle, ObstacleId, ObstacleKind, ObstacleProvider,
};
use crate::game::Updatable;
use glam::Vec2;

/// Seconds a temporary platform holds after it is first stood on
pub const TEMP_PLATFORM_SECS: f32 = 1.0;

#[derive(Debug, Clone, Copy)]
struct TempPlatform {
    id: ObstacleId,
    countdown: Option<f32>,
    expired: bool,
}

/// Countdowns for platforms that crumble after being landed on
#[derive(Debug)]
pub struct PlatformTimers {
    platforms: Vec<TempPlatform>,
    lifetime: f32,
    expired: Vec<ObstacleId>,
}

impl PlatformTimers {
    pub fn new(lifetime: f32) -> Self {
        Self {
            platforms: Vec::new(),
            lifetime,
            expired: Vec::new(),
        }
    }

    pub fn register(&mut self, id: ObstacleId) {
        self.platforms.push(TempPlatform {
            id,
            countdown: None,
            expired: false,
        });
    }

    pub fn is_temporary(&self, id: ObstacleId) -> bool {
        self.platforms.iter().any(|p| p.id == id)
    }

    /// Seconds left before the platform goes, once its countdown has started
    pub fn remaining(&self, id: ObstacleId) -> Option<f32> {
        self.platforms
            .iter()
            .find(|p| p.id == id && !p.expired)
            .and_then(|p| p.countdown)
    }

    /// Platforms whose countdown ran out since the last call
    pub fn take_expired(&mut self) -> Vec<ObstacleId> {
        std::mem::take(&mut self.expired)
    }

    /// Cancel every countdown and forget expiries
    pub fn reset(&mut self) {
        for platform in &mut self.platforms {
            platform.countdown = None;
            platform.expired = false;
        }
        self.expired.clear();
    }
}

impl Default for PlatformTimers {
    fn default() -> Self {
        Self::new(TEMP_PLATFORM_SECS)
    }
}

impl ContactListener for PlatformTimers {
    fn on_landed_on(&mut self, obstacle: &Obstacle) {
        let lifetime = self.lifetime;
        if let Some(platform) = self
            .platforms
            .iter_mut()
            .find(|p| p.id == obstacle.id && !p.expired)
        {
            if platform.countdown.is_none() {
                log::debug!("platform {} activated", obstacle.id);
                platform.countdown = Some(lifetime);
            }
        }
    }
}

impl Updatable for PlatformTimers {
    fn update(&mut self, dt: f32) {
        for platform in &mut self.platforms {
            if platform.expired {
                continue;
            }
            if let Some(remaining) = platform.countdown.as_mut() {
                *remaining -= dt;
                if *remaining <= 0.0 {
                    platform.expired = true;
                    self.expired.push(platform.id);
                }
            }
        }
    }
}

/// What the runner touched this tick, as seen by the course
#[derive(Debug, Default)]
pub struct CourseContacts {
    pub platforms: PlatformTimers,
    hazard: Option<ObstacleId>,
    exit: Option<ObstacleId>,
}

impl CourseContacts {
    /// The hazard that killed the runner, if one did since the last call
    pub fn take_hazard(&mut self) -> Option<ObstacleId> {
        self.hazard.take()
    }

    /// The exit reached, if one was since the last call
    pub fn take_exit(&mut self) -> Option<ObstacleId> {
        self.exit.take()
    }

    pub fn reset(&mut self) {
        self.platforms.reset();
        self.hazard = None;
        self.exit = None;
    }
}

impl ContactListener for CourseContacts {
    fn on_landed_on(&mut self, obstacle: &Obstacle) {
        self.platforms.on_landed_on(obstacle);
    }

    fn on_hazard(&mut self, obstacle: &Obstacle) {
        self.hazard.get_or_insert(obstacle.id);
    }

    fn on_exit(&mut self, obstacle: &Obstacle) {
        self.exit.get_or_insert(obstacle.id);
    }
}

/// A course: obstacles, contact bookkeeping, and where to spawn
///
/// `obstacles` and `contacts` are separate fields so the resolver can read
/// one while notifying the other.
#[derive(Debug)]
pub struct Level {
    pub obstacles: Vec<Obstacle>,
    pub contacts: CourseContacts,
    pub spawn: Vec2,
    /// Runners whose top passes this line have fallen out of the course
    pub kill_y: f32,
    removed: Vec<Obstacle>,
    next_id: u32,
    complete: bool,
}

impl Level {
    pub fn new(spawn: Vec2, kill_y: f32) -> Self {
        Self {
            obstacles: Vec::new(),
            contacts: CourseContacts::default(),
            spawn,
            kill_y,
            removed: Vec::new(),
            next_id: 1,
            complete: false,
        }
    }

    fn add(&mut self, rect: Rect, kind: ObstacleKind) -> ObstacleId {
        let obstacle = Obstacle::with_kind(self.next_id, rect, kind);
        self.next_id += 1;
        self.obstacles.push(obstacle);
        obstacle.id
    }

    pub fn add_solid(&mut self, rect: Rect) -> ObstacleId {
        self.add(rect, ObstacleKind::Solid)
    }

    /// Spikes and the like: touching one outside a dash is fatal
    pub fn add_hazard(&mut self, rect: Rect) -> ObstacleId {
        self.add(rect, ObstacleKind::Hazard)
    }

    pub fn add_exit(&mut self, rect: Rect) -> ObstacleId {
        self.add(rect, ObstacleKind::Exit)
    }

    pub fn add_temporary(&mut self, rect: Rect) -> ObstacleId {
        let id = self.add_solid(rect);
        self.contacts.platforms.register(id);
        id
    }

    /// Small hand-built course: a spiked gap bridged by a crumbling platform,
    /// a climbable wall, a couple of ledges and an exit on top of the wall
    pub fn demo() -> Self {
        let mut level = Self::new(Vec2::new(80.0, 500.0), 900.0);

        // Floor with a gap
        level.add_solid(Rect::new(0.0, 620.0, 600.0, 100.0));
        level.add_solid(Rect::new(760.0, 620.0, 520.0, 100.0));
        level.add_temporary(Rect::new(600.0, 520.0, 160.0, 20.0));
        level.add_hazard(Rect::new(600.0, 700.0, 160.0, 20.0));

        // Spikes on the floor, cleared with a jump or a dash
        level.add_hazard(Rect::new(440.0, 608.0, 60.0, 12.0));

        // Ledges
        level.add_solid(Rect::new(200.0, 450.0, 160.0, 20.0));
        level.add_temporary(Rect::new(400.0, 330.0, 120.0, 20.0));

        // Climbing wall and its landing
        level.add_solid(Rect::new(1000.0, 300.0, 40.0, 320.0));
        level.add_solid(Rect::new(1040.0, 300.0, 160.0, 20.0));
        level.add_exit(Rect::new(1140.0, 240.0, 40.0, 60.0));

        // Bounds
        level.add_solid(Rect::new(-40.0, -400.0, 40.0, 1120.0));
        level.add_solid(Rect::new(1280.0, -400.0, 40.0, 1120.0));

        level
    }

    pub fn obstacle(&self, id: ObstacleId) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| o.id == id)
    }

    pub fn is_out_of_bounds(&self, rect: &Rect) -> bool {
        rect.top() > self.kill_y
    }

    /// Whether the runner died this tick, by hazard or by falling out
    pub fn take_death(&mut self, rect: &Rect) -> bool {
        if let Some(id) = self.contacts.take_hazard() {
            log::info!("runner killed by hazard {}", id);
            return true;
        }
        if self.is_out_of_bounds(rect) {
            log::info!("runner fell out of the course");
            return true;
        }
        false
    }

    /// Whether an exit has been reached since the last reset
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Bring back crumbled platforms, stop all countdowns and reopen the course
    pub fn reset(&mut self) {
        if !self.removed.is_empty() {
            log::debug!("restoring {} platforms", self.removed.len());
            self.obstacles.append(&mut self.removed);
            self.obstacles.sort_by_key(|o| o.id);
        }
        self.contacts.reset();
        self.complete = false;
    }
}

impl ObstacleProvider for Level {
    fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }
}

impl Updatable for Level {
    fn update(&mut self, dt: f32) {
        if let Some(id) = self.contacts.take_exit() {
            if !self.complete {
                log::info!("Level complete at exit {}", id);
                self.complete = true;
            }
        }

        self.contacts.platforms.update(dt);
        for id in self.contacts.platforms.take_expired() {
            if let Some(index) = self.obstacles.iter().position(|o| o.id == id) {
                log::info!("platform {} crumbled", id);
                self.removed.push(self.obstacles.remove(index));
            }
        }
    }
}
