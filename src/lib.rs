//! Cascade Quest (workspace facade crate).
//!
//! This package exposes `cascade_quest::{core,input,term,types}` while the
//! implementation lives in dedicated crates under `crates/`.

pub use cascade_quest_core as core;
pub use cascade_quest_input as input;
pub use cascade_quest_term as term;
pub use cascade_quest_types as types;
