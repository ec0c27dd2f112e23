// Character system
//
// Everything that makes the runner move:
// - Movement tuning and the flag-based movement state machine
// - Derived phases for animation and debugging
// - Axis-separated collision against the level
// - The player entity tying input, movement and collision together

pub mod collision;
pub mod movement;
pub mod player;
pub mod state;
pub mod stats;

// Re-export commonly used types
pub use collision::CollisionResolver;
pub use movement::{JumpKind, MovementState};
pub use player::{PerfectGlow, Player, PLAYER_SIZE};
pub use state::{MovementPhase, PhaseTracker};
pub use stats::{MovementStats, BASE_STATS};
