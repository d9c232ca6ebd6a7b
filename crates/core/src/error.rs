//! Error taxonomy for the puzzle and battle core.
//!
//! Kinematic probing never produces these; they surface only at API
//! boundaries or as log text when `update` recovers on its own.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    #[error("placement at ({x}, {y}) is out of bounds or occupied")]
    InvalidPlacement { x: i8, y: i8 },

    #[error("spawn column {column} is full")]
    FullColumn { column: i8 },

    #[error("cascade unresolved after {elapsed:.2}s, scheduler reset")]
    SchedulerTimeout { elapsed: f32 },

    #[error("host contract violation: {what} = {value}")]
    HostContractViolation { what: &'static str, value: f32 },

    #[error("no potion in slot {slot}")]
    InvalidPotionSlot { slot: usize },

    #[error("action not allowed during {phase}")]
    WrongPhase { phase: &'static str },

    #[error("no living enemy to target")]
    NoLivingEnemy,
}

pub type CoreResult<T> = Result<T, CoreError>;
