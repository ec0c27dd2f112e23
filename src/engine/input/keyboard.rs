// Polled keyboard state and keyboard command production

use super::action::{Action, InputSource};
use super::buffer::InputBuffer;
use super::config::InputConfig;
use std::collections::HashSet;
use winit::event::{ElementState, KeyEvent};
use winit::keyboard::PhysicalKey;

/// Held horizontal direction for continuous movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HorizontalIntent {
    #[default]
    None,
    Left,
    Right,
}

/// Keyboard state for the local player
///
/// Held keys drive continuous movement; fresh presses of jump/dash are pushed
/// into the shared [`InputBuffer`] as timestamped commands.
#[derive(Debug)]
pub struct KeyboardState {
    config: InputConfig,

    /// Actions currently held
    pressed: HashSet<Action>,

    /// Actions pressed since the last `end_frame`
    just_pressed: HashSet<Action>,

    /// Actions released since the last `end_frame`
    just_released: HashSet<Action>,
}

impl KeyboardState {
    pub fn new(config: InputConfig) -> Self {
        Self {
            config,
            pressed: HashSet::new(),
            just_pressed: HashSet::new(),
            just_released: HashSet::new(),
        }
    }

    /// Process a keyboard event from winit
    pub fn process_keyboard_event(&mut self, event: &KeyEvent) {
        let PhysicalKey::Code(key_code) = event.physical_key else {
            return;
        };
        let Some(action) = self.config.get_action(InputSource::key(key_code)) else {
            return;
        };

        match event.state {
            // Key repeat must not produce extra buffered commands
            ElementState::Pressed if !event.repeat => self.press(action),
            ElementState::Pressed => {}
            ElementState::Released => self.release(action),
        }
    }

    pub fn press(&mut self, action: Action) {
        if self.pressed.insert(action) {
            self.just_pressed.insert(action);
        }
    }

    pub fn release(&mut self, action: Action) {
        if self.pressed.remove(&action) {
            self.just_released.insert(action);
        }
    }

    pub fn is_pressed(&self, action: Action) -> bool {
        self.pressed.contains(&action)
    }

    pub fn just_pressed(&self, action: Action) -> bool {
        self.just_pressed.contains(&action)
    }

    pub fn just_released(&self, action: Action) -> bool {
        self.just_released.contains(&action)
    }

    /// Horizontal direction currently held; right wins when both are held
    pub fn horizontal_intent(&self) -> HorizontalIntent {
        if self.is_pressed(Action::MoveRight) {
            HorizontalIntent::Right
        } else if self.is_pressed(Action::MoveLeft) {
            HorizontalIntent::Left
        } else {
            HorizontalIntent::None
        }
    }

    /// Push a buffered command for every fresh jump/dash press
    ///
    /// Returns the number of commands pushed.
    pub fn emit_commands(&self, buffer: &InputBuffer) -> usize {
        let mut emitted = 0;
        for command in self.just_pressed.iter().filter_map(|a| a.command()) {
            buffer.push_now(command);
            emitted += 1;
        }
        emitted
    }

    /// Clear per-frame edges. Call once per frame after emitting commands.
    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
    }

    /// Release everything (focus loss, respawn)
    pub fn reset(&mut self) {
        self.pressed.clear();
        self.just_pressed.clear();
        self.just_released.clear();
    }
}

impl Default for KeyboardState {
    fn default() -> Self {
        Self::new(InputConfig::default())
    }
}
