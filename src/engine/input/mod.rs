// Input handling system
//
// Two producers feed one shared, lock-guarded buffer of timestamped commands:
// the polled keyboard on the main thread and a voice listener on a background
// thread. Once per tick the arbiter drains the buffer into at most one jump
// and one dash, detecting "perfect" keyboard+voice combos.
//
// ## Architecture
//
// - `command`: Command tags, timestamps and buffered events
// - `clock`: Monotonic and manual time sources
// - `buffer`: Thread-safe, time-bounded event store
// - `arbiter`: Per-tick combo detection and action triggering
// - `action`: Keyboard actions and default key bindings
// - `config`: Key binding configuration and remapping
// - `keyboard`: Held-key state and keyboard command production
// - `voice`: Background voice command producer
//
// ## Usage Example
//
// ```rust
// let clock = Arc::new(MonotonicClock::new());
// let buffer = Arc::new(InputBuffer::new(clock));
//
// // Producers, any thread
// buffer.push_now(Command::VoiceJump);
//
// // Main thread, once per tick
// let mut arbiter = ActionArbiter::default();
// let outcome = arbiter.arbitrate(&buffer, &mut player);
// ```

pub mod action;
pub mod arbiter;
pub mod buffer;
pub mod clock;
pub mod command;
pub mod config;
pub mod keyboard;
pub mod voice;

// Re-export commonly used types
pub use action::Action;
pub use arbiter::{ActionArbiter, ActionSink, ArbiterConfig, ArbiterOutcome, Trigger};
pub use buffer::InputBuffer;
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use command::{ActionKind, Command, InputEvent, Timestamp};
pub use config::InputConfig;
pub use keyboard::{HorizontalIntent, KeyboardState};
pub use voice::{ChannelRecognizer, Transcript, VoiceError, VoiceListener, VoiceProducer};
