// Per-tick arbitration of buffered commands into jump/dash triggers
//
// Each action family is resolved in two phases: candidate extraction from the
// buffer, then pairing of keyboard and voice candidates. A keyboard and a voice
// command for the same action inside the perfect window form a "perfect"
// action; otherwise the most recent candidate fires as a regular action.

use super::buffer::InputBuffer;
use super::command::{ActionKind, CommandSource, InputEvent, Timestamp};
use crate::core::math::abs_diff;
use std::time::Duration;

/// Receiver of arbitrated actions (usually the player character)
pub trait ActionSink {
    fn jump(&mut self);
    fn dash(&mut self);
    /// Called after the action fired when it was a perfect combo
    fn on_perfect(&mut self, kind: ActionKind);
}

/// Timing windows for combo detection
#[derive(Debug, Clone, Copy)]
pub struct ArbiterConfig {
    /// Maximum distance between a keyboard and a voice command to count as perfect
    pub perfect_window: Duration,
    /// Candidate fetch window as a multiple of `perfect_window`
    pub query_factor: f64,
}

impl ArbiterConfig {
    pub fn query_window(&self) -> Duration {
        self.perfect_window.mul_f64(self.query_factor)
    }
}

impl Default for ArbiterConfig {
    fn default() -> Self {
        Self {
            perfect_window: Duration::from_millis(120),
            query_factor: 1.1,
        }
    }
}

/// How an action fired this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Perfect { key: InputEvent, voice: InputEvent },
    Regular(InputEvent),
}

impl Trigger {
    pub fn is_perfect(&self) -> bool {
        matches!(self, Self::Perfect { .. })
    }

    /// Events this trigger consumed from the buffer
    pub fn consumed(&self) -> Vec<InputEvent> {
        match *self {
            Self::Perfect { key, voice } => vec![key, voice],
            Self::Regular(event) => vec![event],
        }
    }
}

/// What the arbiter fired during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArbiterOutcome {
    pub jump: Option<Trigger>,
    pub dash: Option<Trigger>,
}

impl ArbiterOutcome {
    pub fn is_idle(&self) -> bool {
        self.jump.is_none() && self.dash.is_none()
    }
}

/// Candidates for one action family, split by source, each ascending by timestamp
#[derive(Debug, Default)]
struct Candidates {
    keyboard: Vec<InputEvent>,
    voice: Vec<InputEvent>,
    latest: Option<InputEvent>,
}

impl Candidates {
    fn extract(sorted: Vec<InputEvent>) -> Self {
        let latest = sorted.last().copied();
        let (keyboard, voice) = sorted
            .into_iter()
            .partition(|event| event.command.source() == CommandSource::Keyboard);
        Self {
            keyboard,
            voice,
            latest,
        }
    }
}

/// Find the first keyboard/voice pair within `window`.
///
/// Keyboard candidates are scanned in ascending order and, for each, voice
/// candidates in ascending order, so ties go to the earliest timestamps.
pub fn find_perfect_pair(
    keyboard: &[InputEvent],
    voice: &[InputEvent],
    window: Duration,
) -> Option<(InputEvent, InputEvent)> {
    keyboard.iter().find_map(|key| {
        voice
            .iter()
            .find(|v| abs_diff(key.timestamp.since_origin(), v.timestamp.since_origin()) <= window)
            .map(|v| (*key, *v))
    })
}

/// Resolves buffered commands into at most one jump and one dash per tick
///
/// Each family remembers the timestamp of the newest event it fired. Older
/// leftovers stay in the buffer until they expire but are never fired.
#[derive(Debug, Clone, Default)]
pub struct ActionArbiter {
    config: ArbiterConfig,
    jump_fired_through: Option<Timestamp>,
    dash_fired_through: Option<Timestamp>,
}

impl ActionArbiter {
    pub fn new(config: ArbiterConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &ArbiterConfig {
        &self.config
    }

    /// Timestamp of the newest event already fired for `kind`
    pub fn fired_through(&self, kind: ActionKind) -> Option<Timestamp> {
        match kind {
            ActionKind::Jump => self.jump_fired_through,
            ActionKind::Dash => self.dash_fired_through,
        }
    }

    /// Forget what has fired (respawn)
    pub fn reset(&mut self) {
        self.jump_fired_through = None;
        self.dash_fired_through = None;
    }

    /// Run one tick of arbitration against the buffer
    ///
    /// Jump and dash are mutually exclusive per tick: when a jump fires, the
    /// dash family is left untouched in the buffer.
    pub fn arbitrate(&mut self, buffer: &InputBuffer, sink: &mut dyn ActionSink) -> ArbiterOutcome {
        buffer.clear_expired();

        let jump = self.resolve(ActionKind::Jump, buffer, sink);
        let dash = if jump.is_some() {
            None
        } else {
            self.resolve(ActionKind::Dash, buffer, sink)
        };

        ArbiterOutcome { jump, dash }
    }

    fn resolve(
        &mut self,
        kind: ActionKind,
        buffer: &InputBuffer,
        sink: &mut dyn ActionSink,
    ) -> Option<Trigger> {
        let commands = [kind.key_command(), kind.voice_command()];
        let fired_through = self.fired_through(kind);
        let mut recent =
            buffer.get_recent_events(Some(&commands), Some(self.config.query_window()));
        if let Some(mark) = fired_through {
            recent.retain(|event| event.timestamp > mark);
        }
        let candidates = Candidates::extract(recent);

        let trigger = match find_perfect_pair(
            &candidates.keyboard,
            &candidates.voice,
            self.config.perfect_window,
        ) {
            Some((key, voice)) => Trigger::Perfect { key, voice },
            None => Trigger::Regular(candidates.latest?),
        };

        match kind {
            ActionKind::Jump => sink.jump(),
            ActionKind::Dash => sink.dash(),
        }
        if trigger.is_perfect() {
            log::info!("perfect {:?}", kind);
            sink.on_perfect(kind);
        } else {
            log::debug!("regular {:?}", kind);
        }

        let consumed = trigger.consumed();
        let newest = consumed.iter().map(|event| event.timestamp).max();
        match kind {
            ActionKind::Jump => self.jump_fired_through = newest,
            ActionKind::Dash => self.dash_fired_through = newest,
        }
        buffer.remove_specific_events(&consumed);
        Some(trigger)
    }
}
