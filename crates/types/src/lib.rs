//! Core types module - shared data structures and constants
//!
//! This crate defines the fundamental types used throughout the workspace.
//! All types are plain data with no behaviour beyond small conversions, so
//! they can be shared by the core simulation, the terminal view and the
//! input layer alike.
//!
//! # Grid Dimensions
//!
//! - **Width**: 6 columns (indexed 0-5)
//! - **Height**: 12 rows (indexed 0-11, row 0 at the top)
//! - **Spawn column**: 3, rows above 0 form the implicit spawn area
//!
//! # Timing Constants
//!
//! All durations are in seconds of simulated time:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `PAIR_FALL_SPEED` | 0.4 | Cells per second while falling normally |
//! | `PAIR_FAST_FALL_SPEED` | 15.0 | Cells per second while fast-falling |
//! | `LOCK_GRACE` | 0.5 | Grounded time before the pair locks |
//! | `AUTO_LOCK` | 1.0 | Grounded time without input before the pair locks |
//! | `POST_SEP_WINDOW` | 0.2 | Horizontal control window after separation |
//! | `STEP_DELAY` | 0.1 | Pause between cascade steps |
//! | `CASCADE_TIMEOUT` | 10.0 | Scheduler safety valve |
//! | `COUNTDOWN` | 3.0 | Pre-combat countdown |
//! | `DAMAGE_FLASH` | 0.3 | Screen-edge flash after the player is hit |
//!
//! # Examples
//!
//! ```
//! use cascade_quest_types::{CellColor, InputEvent, Rotation, GRID_HEIGHT, GRID_WIDTH};
//!
//! // Colors parse case-insensitively
//! assert_eq!(CellColor::from_str("red"), Some(CellColor::Red));
//! assert!(CellColor::Red.is_matchable());
//! assert!(!CellColor::Garbage.is_matchable());
//!
//! // Rotation cycles clockwise Up -> Right -> Down -> Left
//! assert_eq!(Rotation::Up.rotate_cw(), Rotation::Right);
//! assert_eq!(Rotation::Right.sub_offset(), (1, 0));
//!
//! // Host input events
//! assert_eq!(InputEvent::from_str("rotateCw"), Some(InputEvent::RotateCw));
//!
//! assert_eq!(GRID_WIDTH, 6);
//! assert_eq!(GRID_HEIGHT, 12);
//! ```

/// Grid width in cells (6 columns)
pub const GRID_WIDTH: u8 = 6;

/// Grid height in cells (12 rows)
pub const GRID_HEIGHT: u8 = 12;

/// Minimum size of a connected group that clears
pub const MIN_GROUP: usize = 4;

/// Column the main cell of a new pair spawns in
pub const SPAWN_X: i8 = 3;

/// Vertical center of a freshly spawned pair (main at row 1, sub at row 0)
pub const SPAWN_Y: f32 = 1.0;

/// Normal fall speed of the active pair (cells per second)
pub const PAIR_FALL_SPEED: f32 = 0.4;

/// Fast-fall speed of the active pair (cells per second)
pub const PAIR_FAST_FALL_SPEED: f32 = 15.0;

/// Sub-step used while falling normally
pub const FALL_STEP: f32 = 0.05;

/// Sub-step used while fast-falling
pub const FAST_FALL_STEP: f32 = 0.1;

/// Grounded time after which the pair locks
pub const LOCK_GRACE: f32 = 0.5;

/// Grounded time without input after which the pair locks
pub const AUTO_LOCK: f32 = 1.0;

/// Maximum number of lock-delay resets per pair (15)
pub const MAX_MOVE_RESETS: u8 = 15;

/// Horizontal control window for the remaining cell after separation
pub const POST_SEP_WINDOW: f32 = 0.2;

/// Epsilon added before snapping a fractional position to a cell
pub const PLACEMENT_EPSILON: f64 = 1e-10;

/// Delay between the board settling and the next pair spawning
pub const SPAWN_DELAY: f32 = 0.35;

/// Length of the NEXT queue preview
pub const NEXT_QUEUE_LEN: usize = 2;

/// Pause between cascade steps (animation time)
pub const STEP_DELAY: f32 = 0.1;

/// Sim time after which a stuck cascade is force-reset
pub const CASCADE_TIMEOUT: f32 = 10.0;

/// Chain score divisor used when converting score into damage
pub const CHAIN_SCORE_BASE: u32 = 10;

/// Floor applied to every group score
pub const MIN_GROUP_SCORE: u32 = 40;

/// Chain multipliers in tenths for chain levels 1 through 10
///
/// Index 0 = level 1. Levels above 10 extend linearly by 4.0 per level.
pub const CHAIN_MULTIPLIER_TENTHS: [u32; 10] = [10, 18, 29, 46, 77, 120, 160, 200, 240, 280];

/// Pre-combat countdown duration
pub const COUNTDOWN: f32 = 3.0;

/// Player damage flash duration
pub const DAMAGE_FLASH: f32 = 0.3;

/// Enemy damage flash duration
pub const ENEMY_DAMAGE_FLASH: f32 = 0.3;

/// Largest dt accepted from the host before clamping
pub const MAX_FRAME_DT: f32 = 0.25;

/// Lifetime of a floating damage number
pub const DAMAGE_NUMBER_LIFETIME: f32 = 2.0;

/// Rise speed of a floating damage number (rows per second)
pub const DAMAGE_NUMBER_RISE: f32 = 1.5;

/// Particles emitted per cleared cell
pub const PARTICLES_PER_CELL: usize = 8;

/// Particle lifetime range
pub const PARTICLE_LIFE_MIN: f32 = 0.3;
pub const PARTICLE_LIFE_MAX: f32 = 0.5;

/// Particle speed (cells per second)
pub const PARTICLE_SPEED: f32 = 3.0;

/// Default player max HP
pub const PLAYER_MAX_HP: u32 = 100;

/// Potion belt capacity
pub const POTION_BELT_SIZE: usize = 3;

/// Enemy base stats before species and floor scaling
pub const ENEMY_BASE_HP: u32 = 20;
pub const ENEMY_BASE_DMG: u32 = 8;
pub const ENEMY_BASE_INTERVAL: f32 = 6.0;

/// Per-floor scaling factors (speed < 1 means faster attacks)
pub const FLOOR_SCALING_HP: f32 = 1.3;
pub const FLOOR_SCALING_DMG: f32 = 1.25;
pub const FLOOR_SCALING_SPEED: f32 = 0.9;

/// Incoming damage factor while guarding
pub const GUARD_REDUCTION: f32 = 0.5;

/// Stat scaling applied to every member of a multi-enemy group
pub const MULTI_ENEMY_HP_SCALE: f32 = 0.8;
pub const MULTI_ENEMY_DMG_SCALE: f32 = 0.9;

/// Duration of an enemy self-buff
pub const ENEMY_BUFF_DURATION: f32 = 10.0;

/// Duration of a debuff an enemy puts on the player
pub const PLAYER_DEBUFF_DURATION: f32 = 8.0;

/// Every fifth floor is a boss floor
pub const BOSS_FLOOR_INTERVAL: u32 = 5;

/// Maximum number of enemies in one encounter
pub const MAX_ENEMIES: usize = 3;

/// Enemy slot size in arena coordinates (used by `SelectEnemyAt`)
pub const ENEMY_SLOT_W: u16 = 14;
pub const ENEMY_SLOT_H: u16 = 5;

/// Special-cell effect magnitudes
pub const HEAL_SPECIAL_AMOUNT: u32 = 10;
pub const BOMB_BASE_DAMAGE: u32 = 40;
pub const SHIELD_SPECIAL_AMOUNT: f32 = 15.0;
pub const SHIELD_SPECIAL_DURATION: f32 = 8.0;
pub const MULTIPLIER_SPECIAL_PCT: f32 = 50.0;
pub const MULTIPLIER_SPECIAL_DURATION: f32 = 10.0;
pub const POISON_SPECIAL_DPS: f32 = 5.0;
pub const POISON_SPECIAL_DURATION: f32 = 10.0;

/// Potion base magnitudes, scaled by [`Rarity::multiplier`]
pub const POTION_HEAL: f32 = 30.0;
pub const POTION_STRENGTH_PCT: f32 = 25.0;
pub const POTION_DEFENSE: f32 = 20.0;
pub const POTION_BUFF_DURATION: f32 = 30.0;
pub const POTION_FREEZE_SECS: f32 = 3.0;
pub const POTION_VENOM_DPS: f32 = 8.0;
pub const POTION_VENOM_DURATION: f32 = 15.0;
pub const POTION_EXPLOSIVE_DAMAGE: f32 = 40.0;


/// Cell colors
///
/// `Empty` marks a free cell. `Garbage` occupies space but never forms groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CellColor {
    #[default]
    Empty,
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
    Orange,
    Cyan,
    Garbage,
}

impl CellColor {
    /// The five colors dealt by the piece bag
    pub const PRIMARY: [CellColor; 5] = [
        CellColor::Red,
        CellColor::Blue,
        CellColor::Green,
        CellColor::Yellow,
        CellColor::Purple,
    ];

    pub fn is_empty(&self) -> bool {
        *self == CellColor::Empty
    }

    /// True for colors that can take part in a connected group
    pub fn is_matchable(&self) -> bool {
        !matches!(self, CellColor::Empty | CellColor::Garbage)
    }

    /// Parse color from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use cascade_quest_types::CellColor;
    ///
    /// assert_eq!(CellColor::from_str("Purple"), Some(CellColor::Purple));
    /// assert_eq!(CellColor::from_str("magenta"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "empty" => Some(CellColor::Empty),
            "red" => Some(CellColor::Red),
            "blue" => Some(CellColor::Blue),
            "green" => Some(CellColor::Green),
            "yellow" => Some(CellColor::Yellow),
            "purple" => Some(CellColor::Purple),
            "orange" => Some(CellColor::Orange),
            "cyan" => Some(CellColor::Cyan),
            "garbage" => Some(CellColor::Garbage),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CellColor::Empty => "empty",
            CellColor::Red => "red",
            CellColor::Blue => "blue",
            CellColor::Green => "green",
            CellColor::Yellow => "yellow",
            CellColor::Purple => "purple",
            CellColor::Orange => "orange",
            CellColor::Cyan => "cyan",
            CellColor::Garbage => "garbage",
        }
    }
}

/// Typed effect attached to a grid cell, fired when the cell clears
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpecialKind {
    Heal,
    Bomb,
    Lightning,
    Shield,
    Multiplier,
    Poison,
}

impl SpecialKind {
    pub const ALL: [SpecialKind; 6] = [
        SpecialKind::Heal,
        SpecialKind::Bomb,
        SpecialKind::Lightning,
        SpecialKind::Shield,
        SpecialKind::Multiplier,
        SpecialKind::Poison,
    ];

    /// Stable index into per-kind tables
    pub fn index(&self) -> usize {
        match self {
            SpecialKind::Heal => 0,
            SpecialKind::Bomb => 1,
            SpecialKind::Lightning => 2,
            SpecialKind::Shield => 3,
            SpecialKind::Multiplier => 4,
            SpecialKind::Poison => 5,
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "heal" => Some(SpecialKind::Heal),
            "bomb" => Some(SpecialKind::Bomb),
            "lightning" => Some(SpecialKind::Lightning),
            "shield" => Some(SpecialKind::Shield),
            "multiplier" => Some(SpecialKind::Multiplier),
            "poison" => Some(SpecialKind::Poison),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SpecialKind::Heal => "heal",
            SpecialKind::Bomb => "bomb",
            SpecialKind::Lightning => "lightning",
            SpecialKind::Shield => "shield",
            SpecialKind::Multiplier => "multiplier",
            SpecialKind::Poison => "poison",
        }
    }
}

/// Timed modifiers carried by the player and by enemies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusKind {
    AttackBuff,
    AttackDebuff,
    DefenseBuff,
    ShieldFlat,
    AbsorbShield,
    Reflect,
    Curse,
    Poison,
    Stun,
}

impl StatusKind {
    /// Shields are consumed by the damage pipeline in insertion order
    pub fn is_shield(&self) -> bool {
        matches!(self, StatusKind::ShieldFlat | StatusKind::AbsorbShield)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusKind::AttackBuff => "attack_buff",
            StatusKind::AttackDebuff => "attack_debuff",
            StatusKind::DefenseBuff => "defense_buff",
            StatusKind::ShieldFlat => "shield",
            StatusKind::AbsorbShield => "absorb_shield",
            StatusKind::Reflect => "reflect",
            StatusKind::Curse => "curse",
            StatusKind::Poison => "poison",
            StatusKind::Stun => "stun",
        }
    }
}

/// Rotation states of the active pair
///
/// The rotation names where the sub cell sits relative to the main cell:
/// - **Up**: sub above main (spawn orientation)
/// - **Right**: sub to the right
/// - **Down**: sub below
/// - **Left**: sub to the left
///
/// The rotation cycle goes: Up → Right → Down → Left → Up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rotation {
    #[default]
    Up,
    Right,
    Down,
    Left,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [Rotation::Up, Rotation::Right, Rotation::Down, Rotation::Left];

    /// Rotate clockwise (90°)
    ///
    /// # Examples
    ///
    /// ```
    /// use cascade_quest_types::Rotation;
    ///
    /// assert_eq!(Rotation::Up.rotate_cw(), Rotation::Right);
    /// assert_eq!(Rotation::Left.rotate_cw(), Rotation::Up);
    /// ```
    pub fn rotate_cw(&self) -> Self {
        match self {
            Rotation::Up => Rotation::Right,
            Rotation::Right => Rotation::Down,
            Rotation::Down => Rotation::Left,
            Rotation::Left => Rotation::Up,
        }
    }

    /// Rotate counter-clockwise (-90°)
    pub fn rotate_ccw(&self) -> Self {
        match self {
            Rotation::Up => Rotation::Left,
            Rotation::Left => Rotation::Down,
            Rotation::Down => Rotation::Right,
            Rotation::Right => Rotation::Up,
        }
    }

    /// Offset of the sub cell relative to the main cell
    pub fn sub_offset(&self) -> (i8, i8) {
        match self {
            Rotation::Up => (0, -1),
            Rotation::Right => (1, 0),
            Rotation::Down => (0, 1),
            Rotation::Left => (-1, 0),
        }
    }

    /// Numeric rotation index (0=Up, 1=Right, 2=Down, 3=Left)
    pub fn index(&self) -> usize {
        match self {
            Rotation::Up => 0,
            Rotation::Right => 1,
            Rotation::Down => 2,
            Rotation::Left => 3,
        }
    }

    pub fn from_index(i: usize) -> Self {
        Self::ALL[i % 4]
    }
}

/// Cell coordinates on the grid (origin top-left, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridPos {
    pub x: i8,
    pub y: i8,
}

impl GridPos {
    pub const fn new(x: i8, y: i8) -> Self {
        Self { x, y }
    }
}

/// Press/release state for held inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    Pressed,
    Released,
}

/// Developer commands, honoured only with the `debug-commands` feature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugCommand {
    /// Kill the selected enemy
    Kill,
    /// Restore the player to full HP
    Heal,
    /// Hit the player for a fixed amount
    Damage,
}

/// Input events the host feeds into the battle controller
///
/// Events of a frame are consumed before that frame's kinematics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    MoveLeft,
    MoveRight,
    RotateCw,
    RotateCcw,
    /// Fast-fall held or released
    FastFall(ButtonState),
    /// Drop to the lowest legal position and lock
    HardDrop,
    SelectEnemyNext,
    SelectEnemyPrev,
    /// Select the enemy under arena coordinates (x, y)
    SelectEnemyAt { x: u16, y: u16 },
    /// Drink the potion in the given belt slot
    UsePotion(usize),
    Debug(DebugCommand),
}

impl InputEvent {
    /// Parse a payload-free event from its camelCase name
    ///
    /// # Examples
    ///
    /// ```
    /// use cascade_quest_types::{ButtonState, InputEvent};
    ///
    /// assert_eq!(InputEvent::from_str("moveLeft"), Some(InputEvent::MoveLeft));
    /// assert_eq!(InputEvent::from_str("fastFall"), Some(InputEvent::FastFall(ButtonState::Pressed)));
    /// assert_eq!(InputEvent::from_str("usePotion"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(InputEvent::MoveLeft),
            "moveright" => Some(InputEvent::MoveRight),
            "rotatecw" => Some(InputEvent::RotateCw),
            "rotateccw" => Some(InputEvent::RotateCcw),
            "fastfall" => Some(InputEvent::FastFall(ButtonState::Pressed)),
            "fastfallrelease" => Some(InputEvent::FastFall(ButtonState::Released)),
            "harddrop" => Some(InputEvent::HardDrop),
            "selectenemynext" => Some(InputEvent::SelectEnemyNext),
            "selectenemyprev" => Some(InputEvent::SelectEnemyPrev),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InputEvent::MoveLeft => "moveLeft",
            InputEvent::MoveRight => "moveRight",
            InputEvent::RotateCw => "rotateCw",
            InputEvent::RotateCcw => "rotateCcw",
            InputEvent::FastFall(ButtonState::Pressed) => "fastFall",
            InputEvent::FastFall(ButtonState::Released) => "fastFallRelease",
            InputEvent::HardDrop => "hardDrop",
            InputEvent::SelectEnemyNext => "selectEnemyNext",
            InputEvent::SelectEnemyPrev => "selectEnemyPrev",
            InputEvent::SelectEnemyAt { .. } => "selectEnemyAt",
            InputEvent::UsePotion(_) => "usePotion",
            InputEvent::Debug(_) => "debug",
        }
    }
}

/// Battle lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BattlePhase {
    #[default]
    Countdown,
    Active,
    Victory,
    Defeat,
}

impl BattlePhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, BattlePhase::Victory | BattlePhase::Defeat)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BattlePhase::Countdown => "countdown",
            BattlePhase::Active => "active",
            BattlePhase::Victory => "victory",
            BattlePhase::Defeat => "defeat",
        }
    }
}

/// Cascade scheduler states
///
/// `Idle → Emitting → WaitingStepDelay → Gravity → Recheck → (Emitting | Done)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CascadePhase {
    #[default]
    Idle,
    Emitting,
    WaitingStepDelay,
    Gravity,
    Recheck,
    Done,
}

/// Enemy species
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnemySpecies {
    Slime,
    Goblin,
    Orc,
    Golem,
    Mage,
    Dragon,
    BossDemon,
}

impl EnemySpecies {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "slime" => Some(EnemySpecies::Slime),
            "goblin" => Some(EnemySpecies::Goblin),
            "orc" => Some(EnemySpecies::Orc),
            "golem" => Some(EnemySpecies::Golem),
            "mage" => Some(EnemySpecies::Mage),
            "dragon" => Some(EnemySpecies::Dragon),
            "bossdemon" | "boss_demon" => Some(EnemySpecies::BossDemon),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EnemySpecies::Slime => "Slime",
            EnemySpecies::Goblin => "Goblin",
            EnemySpecies::Orc => "Orc",
            EnemySpecies::Golem => "Golem",
            EnemySpecies::Mage => "Mage",
            EnemySpecies::Dragon => "Dragon",
            EnemySpecies::BossDemon => "Demon Lord",
        }
    }
}

/// Potion rarity tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    /// Effect multiplier for this tier
    pub fn multiplier(&self) -> f32 {
        match self {
            Rarity::Common => 1.0,
            Rarity::Uncommon => 1.3,
            Rarity::Rare => 1.6,
            Rarity::Epic => 2.0,
            Rarity::Legendary => 2.5,
        }
    }
}

/// Potion kinds usable in battle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PotionKind {
    Health,
    Strength,
    Defense,
    FreezeTime,
    Venom,
    Explosive,
}

/// Tint of a floating damage number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageTint {
    /// Damage dealt by the player (yellow)
    Outgoing,
    /// Damage taken by the player (red)
    Incoming,
    /// Damage bounced back by Reflect (orange)
    Reflected,
    /// HP restored (green)
    Heal,
}
