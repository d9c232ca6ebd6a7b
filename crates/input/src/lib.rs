//! Terminal input module (battle-facing).
//!
//! This module is independent of any UI framework. It maps `crossterm` key
//! and mouse events into [`crate::types::InputEvent`] and provides a
//! fast-fall latch suitable for terminals without key-release events.

pub mod handler;
pub mod map;

pub use cascade_quest_types as types;

pub use handler::InputHandler;
pub use map::{handle_key_event, handle_mouse_event, should_quit};
