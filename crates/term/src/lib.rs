//! Terminal "battle renderer" module.
//!
//! This is a small, game-oriented rendering layer for terminal play.
//! It avoids widget/layout libraries and instead renders a
//! [`BattleSnapshot`](crate::core::BattleSnapshot) into a simple framebuffer
//! that is diffed and flushed to the terminal.
//!
//! Goals:
//! - Keep `core` deterministic and testable
//! - Keep the view a pure function of the snapshot
//! - Allow precise control over aspect ratio (e.g. 2 chars wide per cell)

pub mod battle_view;
pub mod fb;
pub mod renderer;

pub use cascade_quest_core as core;
pub use cascade_quest_types as types;

pub use battle_view::{BattleView, Viewport};
pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
