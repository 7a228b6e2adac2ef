//! Keyboard input state
//!
//! Directions are level-triggered: held keys move the ship every tick.
//! Fire buttons are edge-triggered: one press yields exactly one shot,
//! however long the key is held and however often the OS repeats it.

use crate::sim::TickInput;

/// Game keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    FireBullet,
    FireBomb,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` name; unknown keys are ignored
    pub fn from_key_name(name: &str) -> Option<Self> {
        match name {
            "ArrowUp" | "Up" => Some(Key::Up),
            "ArrowDown" | "Down" => Some(Key::Down),
            "ArrowLeft" | "Left" => Some(Key::Left),
            "ArrowRight" | "Right" => Some(Key::Right),
            " " | "Spacebar" | "x" | "X" => Some(Key::FireBullet),
            "z" | "Z" | "b" | "B" => Some(Key::FireBomb),
            _ => None,
        }
    }
}

/// Edge-triggered button
///
/// A press arms the latch only if the key was up; reading consumes it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FireLatch {
    held: bool,
    armed: bool,
}

impl FireLatch {
    pub fn press(&mut self) {
        if !self.held {
            self.held = true;
            self.armed = true;
        }
    }

    pub fn release(&mut self) {
        self.held = false;
    }

    /// Returns true once per physical press
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.armed)
    }

    pub fn is_held(&self) -> bool {
        self.held
    }
}

/// Current keyboard state, fed by key events between ticks
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub bullet: FireLatch,
    pub bomb: FireLatch,
}

impl InputState {
    pub fn key_down(&mut self, key: Key) {
        match key {
            Key::Up => self.up = true,
            Key::Down => self.down = true,
            Key::Left => self.left = true,
            Key::Right => self.right = true,
            Key::FireBullet => self.bullet.press(),
            Key::FireBomb => self.bomb.press(),
        }
    }

    pub fn key_up(&mut self, key: Key) {
        match key {
            Key::Up => self.up = false,
            Key::Down => self.down = false,
            Key::Left => self.left = false,
            Key::Right => self.right = false,
            Key::FireBullet => self.bullet.release(),
            Key::FireBomb => self.bomb.release(),
        }
    }

    /// Read the input for one tick, consuming pending fire presses
    pub fn snapshot(&mut self) -> TickInput {
        TickInput {
            up: self.up,
            down: self.down,
            left: self.left,
            right: self.right,
            fire_bullet: self.bullet.take(),
            fire_bomb: self.bomb.take(),
        }
    }

    /// Release everything (focus lost, reset)
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
