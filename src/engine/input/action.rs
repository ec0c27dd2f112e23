// Keyboard action definitions and default bindings

use super::command::Command;
use winit::keyboard::KeyCode;

/// Represents all keyboard-driven actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // Continuous movement
    MoveLeft,
    MoveRight,

    // Discrete, buffered actions
    Jump,
    Dash,

    // Meta actions
    Respawn,
    Pause,
}

impl Action {
    /// The buffered command this action produces when pressed, if any
    pub fn command(self) -> Option<Command> {
        match self {
            Self::Jump => Some(Command::KeyJump),
            Self::Dash => Some(Command::KeyDash),
            _ => None,
        }
    }
}

/// Represents a physical input source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputSource {
    Keyboard(KeyCode),
}

impl InputSource {
    /// Create a keyboard input source
    pub fn key(code: KeyCode) -> Self {
        Self::Keyboard(code)
    }
}

/// Default keyboard bindings: arrows and WASD, Space to jump, Shift to dash
pub fn default_bindings() -> Vec<(InputSource, Action)> {
    vec![
        (InputSource::key(KeyCode::ArrowLeft), Action::MoveLeft),
        (InputSource::key(KeyCode::KeyA), Action::MoveLeft),
        (InputSource::key(KeyCode::ArrowRight), Action::MoveRight),
        (InputSource::key(KeyCode::KeyD), Action::MoveRight),
        (InputSource::key(KeyCode::Space), Action::Jump),
        (InputSource::key(KeyCode::ArrowUp), Action::Jump),
        (InputSource::key(KeyCode::KeyW), Action::Jump),
        (InputSource::key(KeyCode::ShiftLeft), Action::Dash),
        (InputSource::key(KeyCode::ShiftRight), Action::Dash),
        (InputSource::key(KeyCode::KeyR), Action::Respawn),
        (InputSource::key(KeyCode::KeyP), Action::Pause),
    ]
}
