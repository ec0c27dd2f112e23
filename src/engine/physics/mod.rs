// Static collision geometry
//
// The world is a flat list of axis-aligned obstacles (solids, hazards and
// exits). Movement resolution lives with the characters; this module only
// describes what can be hit and who hears about contacts.

mod collision;

pub use collision::{
    ContactEvent, ContactListener, ContactLog, Obstacle, ObstacleId, ObstacleKind,
    ObstacleProvider,
};
