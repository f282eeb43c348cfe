//! Keyboard and touch state turned into tick intents

use std::collections::HashSet;

use super::InputSource;
use crate::sim::{GameState, TickInput, autopilot};

/// Keys the game listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Space,
    X,
}

impl Key {
    /// Map a DOM-style key name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ArrowLeft" => Some(Key::ArrowLeft),
            "ArrowRight" => Some(Key::ArrowRight),
            "ArrowUp" => Some(Key::ArrowUp),
            "ArrowDown" => Some(Key::ArrowDown),
            " " | "Space" => Some(Key::Space),
            "x" | "X" => Some(Key::X),
            _ => None,
        }
    }
}

/// On-screen buttons of the touch layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TouchButton {
    Left,
    Right,
    /// Jumps and aims up, like holding Space and ArrowUp
    Jump,
    /// Swings along the facing direction
    Attack,
    /// Aims down and swings once per touch
    Down,
}

/// Held keys and touches
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    keys: HashSet<Key>,
    touches: HashSet<TouchButton>,
    /// Down was touched since the last poll
    down_swing: bool,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: Key) {
        self.keys.insert(key);
    }

    pub fn release(&mut self, key: Key) {
        self.keys.remove(&key);
    }

    /// Press by DOM key name; unknown keys are ignored. Returns true if the
    /// key belongs to the game (the host should swallow the event).
    pub fn press_named(&mut self, name: &str) -> bool {
        match Key::from_name(name) {
            Some(key) => {
                self.press(key);
                true
            }
            None => false,
        }
    }

    pub fn release_named(&mut self, name: &str) {
        if let Some(key) = Key::from_name(name) {
            self.release(key);
        }
    }

    pub fn touch_start(&mut self, button: TouchButton) {
        if self.touches.insert(button) && button == TouchButton::Down {
            self.down_swing = true;
        }
    }

    /// Also used for touchcancel
    pub fn touch_end(&mut self, button: TouchButton) {
        self.touches.remove(&button);
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.keys.contains(&key)
    }

    /// Drop everything (focus lost)
    pub fn clear(&mut self) {
        self.keys.clear();
        self.touches.clear();
        self.down_swing = false;
    }

    pub fn intents(&self) -> TickInput {
        let key = |k: Key| self.keys.contains(&k);
        let touch = |b: TouchButton| self.touches.contains(&b);

        TickInput {
            left: key(Key::ArrowLeft) || touch(TouchButton::Left),
            right: key(Key::ArrowRight) || touch(TouchButton::Right),
            aim_up: key(Key::ArrowUp) || touch(TouchButton::Jump),
            aim_down: key(Key::ArrowDown) || touch(TouchButton::Down),
            jump: key(Key::Space) || touch(TouchButton::Jump),
            attack: key(Key::X) || touch(TouchButton::Attack) || self.down_swing,
            aim_facing: touch(TouchButton::Attack),
        }
    }

    /// Intents for one tick; consumes a pending down swing
    pub fn take_intents(&mut self) -> TickInput {
        let input = self.intents();
        self.down_swing = false;
        input
    }
}

impl InputSource for KeyboardState {
    fn poll(&mut self, _state: &GameState) -> TickInput {
        self.take_intents()
    }
}

/// Lets the game play itself
#[derive(Debug, Clone, Copy, Default)]
pub struct Autopilot;

impl InputSource for Autopilot {
    fn poll(&mut self, state: &GameState) -> TickInput {
        autopilot::steer(state)
    }
}
