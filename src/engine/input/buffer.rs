// Input buffering shared between the keyboard and voice producers

use super::clock::Clock;
use super::command::{Command, InputEvent, Timestamp};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

/// Time-bounded store of timestamped input events
///
/// Producers on any thread only ever add. The main-thread arbiter is the
/// only caller that removes. Every operation takes the lock once, so each
/// call sees a consistent snapshot of the store.
pub struct InputBuffer {
    events: Mutex<Vec<InputEvent>>,
    retention: Duration,
    clock: Arc<dyn Clock>,
}

impl InputBuffer {
    /// How long an unconsumed event stays in the buffer
    pub const DEFAULT_RETENTION: Duration = Duration::from_millis(1500);

    /// Create a buffer with the default retention
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_retention(clock, Self::DEFAULT_RETENTION)
    }

    /// Create a buffer with a custom retention
    pub fn with_retention(clock: Arc<dyn Clock>, retention: Duration) -> Self {
        Self {
            events: Mutex::new(Vec::with_capacity(16)),
            retention,
            clock,
        }
    }

    pub fn retention(&self) -> Duration {
        self.retention
    }

    /// Current time on the buffer's clock
    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// Append an event. No deduplication: identical events are kept twice.
    pub fn add_input(&self, command: Command, timestamp: Timestamp) {
        log::trace!("buffered {:?} at {}", command, timestamp);
        self.events.lock().push(InputEvent::new(command, timestamp));
    }

    /// Append an event stamped with the buffer's clock
    pub fn push_now(&self, command: Command) {
        self.add_input(command, self.clock.now());
    }

    /// Matching, non-expired events sorted by timestamp. Does not remove anything.
    ///
    /// `commands` restricts the result to the given commands and `window`
    /// further bounds how far back to look.
    pub fn get_recent_events(
        &self,
        commands: Option<&[Command]>,
        window: Option<Duration>,
    ) -> Vec<InputEvent> {
        let now = self.clock.now();
        let max_age = window.map_or(self.retention, |w| w.min(self.retention));

        let mut recent: Vec<InputEvent> = self
            .events
            .lock()
            .iter()
            .filter(|event| now.saturating_since(event.timestamp) <= max_age)
            .filter(|event| commands.map_or(true, |wanted| wanted.contains(&event.command)))
            .copied()
            .collect();

        // Arrival order differs between producers; timestamps are authoritative
        recent.sort_by_key(|event| event.timestamp);
        recent
    }

    /// Remove one exact match per given event; missing events are ignored
    pub fn remove_specific_events(&self, to_remove: &[InputEvent]) {
        let mut events = self.events.lock();
        for target in to_remove {
            if let Some(pos) = events.iter().position(|event| event == target) {
                events.remove(pos);
            }
        }
    }

    /// Drop every event older than the retention window
    pub fn clear_expired(&self) {
        let now = self.clock.now();
        let retention = self.retention;
        self.events
            .lock()
            .retain(|event| now.saturating_since(event.timestamp) <= retention);
    }

    /// Check whether a command is buffered, expiring stale entries first
    pub fn has_input(&self, command: Command) -> bool {
        self.clear_expired();
        self.events.lock().iter().any(|event| event.command == command)
    }

    /// Drop everything, e.g. on a respawn edge
    pub fn clear(&self) {
        self.events.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl std::fmt::Debug for InputBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputBuffer")
            .field("events", &*self.events.lock())
            .field("retention", &self.retention)
            .finish()
    }
}
