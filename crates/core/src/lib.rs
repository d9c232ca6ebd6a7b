//! Core battle logic module - pure, deterministic, and testable
//!
//! This crate contains the puzzle rules, the cascade scheduler, enemy AI and
//! the battle controller that couples them. It has **no dependencies** on
//! the terminal, timers or any other I/O, making it:
//!
//! - **Deterministic**: Same seed and inputs produce the same battle
//! - **Testable**: Every rule is exercised by unit tests
//! - **Portable**: The host only feeds `update(dt)` and input events
//!
//! # Module Structure
//!
//! - [`grid`]: 6x12 color grid with a parallel special-cell layer and gravity
//! - [`groups`]: 4-connected same-color group detection
//! - [`scoring`]: Integer group scores and chain multipliers
//! - [`cascade`]: Timed clear → gravity → recheck state machine
//! - [`pair`]: Falling pair kinematics, rotation kicks, lock delay and separation
//! - [`piece_source`]: Color bag and special-cell rolls with a NEXT preview
//! - [`puzzle`]: Board phases tying the pair and the scheduler together
//! - [`special`]: Special-cell rate table and effect resolution
//! - [`status`]: Timed status effects and the shield stack
//! - [`enemy`]: Species tables, patterns and the per-enemy action timer
//! - [`encounter`]: Enemy groups, target selection and floor generation
//! - [`player`]: Player HP, damage pipeline, potions and the persisted record
//! - [`effects`]: Floating damage numbers and clear particles
//! - [`battle`]: The real-time battle controller
//! - [`snapshot`]: Render-ready projection of a battle
//!
//! # Battle Rules
//!
//! - **Pairs**: Two cells fall together; clearing needs 4 connected cells of one color
//! - **Cascades**: Clears, gravity and rechecks run on sim time, one group per step
//! - **Chain damage**: A finished cascade hits the selected enemy once
//! - **Specials**: Heal, Bomb, Lightning, Shield, Multiplier and Poison cells fire when cleared
//! - **Enemies**: Each enemy walks a cyclic action pattern on its own timer
//!
//! # Example
//!
//! ```
//! use cascade_quest_core::{BattleConfig, BattleController, Player};
//! use cascade_quest_core::types::{BattlePhase, InputEvent};
//!
//! let config = BattleConfig {
//!     countdown: false,
//!     ..BattleConfig::default()
//! };
//! let mut battle = BattleController::new(config, Player::default());
//! assert_eq!(battle.phase(), BattlePhase::Active);
//!
//! // The first pair spawns on the first tick
//! battle.update(1.0 / 60.0);
//! assert!(battle.apply_input(InputEvent::HardDrop));
//!
//! for _ in 0..120 {
//!     battle.update(1.0 / 60.0);
//! }
//! let snapshot = battle.snapshot();
//! let settled = snapshot.grid.iter().flatten().filter(|c| !c.is_empty()).count();
//! assert_eq!(settled, 2);
//! ```
//!
//! # Timing
//!
//! All timing is in seconds of simulated time passed to
//! [`BattleController::update`](battle::BattleController::update). Frames
//! longer than `MAX_FRAME_DT` are clamped.

pub mod battle;
pub mod cascade;
pub mod effects;
pub mod encounter;
pub mod enemy;
pub mod error;
pub mod grid;
pub mod groups;
pub mod pair;
pub mod piece_source;
pub mod player;
pub mod puzzle;
pub mod rng;
pub mod scoring;
pub mod snapshot;
pub mod special;
pub mod status;

pub use cascade_quest_types as types;

// Re-export commonly used types for convenience
pub use battle::{BattleConfig, BattleController, Combat};
pub use cascade::{CascadeObserver, CascadeScheduler, NoopObserver};
pub use effects::Effects;
pub use encounter::EnemyGroup;
pub use enemy::{Enemy, EnemyAction};
pub use error::{CoreError, CoreResult};
pub use grid::Grid;
pub use groups::{find_groups, Group};
pub use pair::{ActivePair, PairStep};
pub use piece_source::{PairSpec, PieceSource};
pub use player::{Player, PlayerRecord, Potion, PotionBelt};
pub use puzzle::{PuzzleBoard, PuzzlePhase};
pub use rng::{ColorBag, SimpleRng};
pub use snapshot::BattleSnapshot;
pub use special::{SpecialEffect, SpecialRates};
pub use status::StatusMap;
