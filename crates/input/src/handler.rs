//! Fast-fall latch for terminal environments.
//!
//! Fast-fall is a held input. Terminals that never emit key-release events
//! only send repeated presses, so the latch releases itself once the repeats
//! stop for longer than a short timeout.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::map::handle_key_event;
use crate::types::{ButtonState, InputEvent};

// A tap must not turn into a sustained fast-fall when no release arrives.
const DEFAULT_KEY_RELEASE_TIMEOUT_MS: u32 = 150;

fn is_fast_fall_key(code: KeyCode) -> bool {
    matches!(
        code,
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Char('j') | KeyCode::Char('J')
    )
}

/// Tracks the held state of fast-fall.
#[derive(Debug, Clone)]
pub struct InputHandler {
    fast_fall_held: bool,
    last_fast_fall_time: std::time::Instant,
    key_release_timeout_ms: u32,
}

impl InputHandler {
    pub fn new() -> Self {
        Self {
            fast_fall_held: false,
            last_fast_fall_time: std::time::Instant::now(),
            key_release_timeout_ms: DEFAULT_KEY_RELEASE_TIMEOUT_MS,
        }
    }

    pub fn with_key_release_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.key_release_timeout_ms = timeout_ms;
        self
    }

    pub fn key_release_timeout_ms(&self) -> u32 {
        self.key_release_timeout_ms
    }

    pub fn is_fast_fall_held(&self) -> bool {
        self.fast_fall_held
    }

    /// Route a key event by kind (press, repeat or release)
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Option<InputEvent> {
        match key.kind {
            KeyEventKind::Release => self.handle_key_release(key.code),
            KeyEventKind::Press | KeyEventKind::Repeat => self.handle_key_press(key),
        }
    }

    pub fn handle_key_press(&mut self, key: KeyEvent) -> Option<InputEvent> {
        if !is_fast_fall_key(key.code) {
            return handle_key_event(key);
        }
        self.last_fast_fall_time = std::time::Instant::now();
        if self.fast_fall_held {
            None
        } else {
            self.fast_fall_held = true;
            Some(InputEvent::FastFall(ButtonState::Pressed))
        }
    }

    pub fn handle_key_release(&mut self, code: KeyCode) -> Option<InputEvent> {
        if is_fast_fall_key(code) && self.fast_fall_held {
            self.fast_fall_held = false;
            Some(InputEvent::FastFall(ButtonState::Released))
        } else {
            None
        }
    }

    /// Auto-release when the terminal does not emit release events.
    pub fn update(&mut self) -> Option<InputEvent> {
        if !self.fast_fall_held {
            return None;
        }
        let since = self.last_fast_fall_time.elapsed().as_millis() as u32;
        if since > self.key_release_timeout_ms {
            self.fast_fall_held = false;
            return Some(InputEvent::FastFall(ButtonState::Released));
        }
        None
    }

    pub fn reset(&mut self) {
        self.fast_fall_held = false;
        self.last_fast_fall_time = std::time::Instant::now();
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
