// Discrete input commands and timestamped events crossing into the core

use std::fmt;
use std::time::Duration;

/// A discrete command produced by one of the input sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    KeyJump,
    KeyDash,
    VoiceJump,
    VoiceDash,
}

/// The logical action family a command belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Jump,
    Dash,
}

/// Which producer a command came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandSource {
    Keyboard,
    Voice,
}

impl Command {
    pub fn kind(self) -> ActionKind {
        match self {
            Self::KeyJump | Self::VoiceJump => ActionKind::Jump,
            Self::KeyDash | Self::VoiceDash => ActionKind::Dash,
        }
    }

    pub fn source(self) -> CommandSource {
        match self {
            Self::KeyJump | Self::KeyDash => CommandSource::Keyboard,
            Self::VoiceJump | Self::VoiceDash => CommandSource::Voice,
        }
    }
}

impl ActionKind {
    /// The keyboard command for this action
    pub fn key_command(self) -> Command {
        match self {
            Self::Jump => Command::KeyJump,
            Self::Dash => Command::KeyDash,
        }
    }

    /// The voice command for this action
    pub fn voice_command(self) -> Command {
        match self {
            Self::Jump => Command::VoiceJump,
            Self::Dash => Command::VoiceDash,
        }
    }
}

/// Monotonic point in time, measured from a clock's origin
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(Duration);

impl Timestamp {
    pub const ZERO: Self = Self(Duration::ZERO);

    pub const fn from_duration(since_origin: Duration) -> Self {
        Self(since_origin)
    }

    pub fn from_secs_f64(secs: f64) -> Self {
        Self(Duration::from_secs_f64(secs))
    }

    pub fn from_millis(millis: u64) -> Self {
        Self(Duration::from_millis(millis))
    }

    pub fn since_origin(self) -> Duration {
        self.0
    }

    /// Time elapsed from `earlier` to `self`, zero if `earlier` is in the future
    pub fn saturating_since(self, earlier: Timestamp) -> Duration {
        self.0.saturating_sub(earlier.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}s", self.0.as_secs_f64())
    }
}

/// A single buffered input: what was commanded and when
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InputEvent {
    pub command: Command,
    pub timestamp: Timestamp,
}

impl InputEvent {
    pub fn new(command: Command, timestamp: Timestamp) -> Self {
        Self { command, timestamp }
    }
}
