use crate::core::Rect;
use std::fmt;

/// Stable identity of an obstacle within a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObstacleId(pub u32);

impl fmt::Display for ObstacleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What touching an obstacle does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ObstacleKind {
    /// Blocks movement on both axes
    #[default]
    Solid,
    /// Kills on overlap unless the runner is dashing
    Hazard,
    /// Finishes the course on overlap
    Exit,
}

/// Axis-aligned block in the course
///
/// Only solids push the runner back. Hazards and exits are triggers the
/// runner passes through.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub id: ObstacleId,
    pub rect: Rect,
    pub kind: ObstacleKind,
}

impl Obstacle {
    pub fn new(id: u32, rect: Rect) -> Self {
        Self::with_kind(id, rect, ObstacleKind::Solid)
    }

    pub fn with_kind(id: u32, rect: Rect, kind: ObstacleKind) -> Self {
        Self {
            id: ObstacleId(id),
            rect,
            kind,
        }
    }

    pub fn is_solid(&self) -> bool {
        self.kind == ObstacleKind::Solid
    }
}

/// Anything that can hand the resolver its obstacles for this tick
pub trait ObstacleProvider {
    fn obstacles(&self) -> &[Obstacle];
}

impl ObstacleProvider for [Obstacle] {
    fn obstacles(&self) -> &[Obstacle] {
        self
    }
}

impl ObstacleProvider for Vec<Obstacle> {
    fn obstacles(&self) -> &[Obstacle] {
        self.as_slice()
    }
}

/// Receives contact notifications during resolution
///
/// Every hook defaults to doing nothing, so listeners only implement what they
/// care about. `()` is the null listener.
pub trait ContactListener {
    /// The runner came to rest on top of `obstacle`
    fn on_landed_on(&mut self, _obstacle: &Obstacle) {}

    /// The runner latched onto a wall this tick
    fn on_wall_catch(&mut self) {}

    /// The runner overlaps a hazard while vulnerable
    fn on_hazard(&mut self, _obstacle: &Obstacle) {}

    /// The runner overlaps an exit
    fn on_exit(&mut self, _obstacle: &Obstacle) {}
}

impl ContactListener for () {}

/// Contact recorded by a `ContactLog`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactEvent {
    Landed(ObstacleId),
    WallCatch,
    Hazard(ObstacleId),
    Exit(ObstacleId),
}

/// Listener that keeps every contact in order, drained by the caller
#[derive(Debug, Default)]
pub struct ContactLog {
    events: Vec<ContactEvent>,
}

impl ContactLog {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(8),
        }
    }

    pub fn events(&self) -> &[ContactEvent] {
        &self.events
    }

    /// Take all recorded events, leaving the log empty
    pub fn drain(&mut self) -> Vec<ContactEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl ContactListener for ContactLog {
    fn on_landed_on(&mut self, obstacle: &Obstacle) {
        self.events.push(ContactEvent::Landed(obstacle.id));
    }

    fn on_wall_catch(&mut self) {
        self.events.push(ContactEvent::WallCatch);
    }

    fn on_hazard(&mut self, obstacle: &Obstacle) {
        self.events.push(ContactEvent::Hazard(obstacle.id));
    }

    fn on_exit(&mut self, obstacle: &Obstacle) {
        self.events.push(ContactEvent::Exit(obstacle.id));
    }
}
