//! Scoring module - cascade score and damage conversion rules
//!
//! All arithmetic is integer so scores are exact:
//! - Group score: `10·s·(1 + 0.2·(s-4))` simplifies to `2·s·(s+1)`; Purple and
//!   Orange earn a 1.1 bonus (11/10, floored); the result is never below 40.
//! - Chain multipliers are stored in tenths; a level's group scores are
//!   summed first and floored once: `Σ group_score · mult_tenths / 10`.
//! - Chain damage is `score / CHAIN_SCORE_BASE`, at least 1.

use crate::types::{
    CellColor, BOMB_BASE_DAMAGE, CHAIN_MULTIPLIER_TENTHS, CHAIN_SCORE_BASE, MIN_GROUP_SCORE,
};

/// Color bonus in tenths (Purple and Orange 1.1, others 1.0)
pub fn color_bonus_tenths(color: CellColor) -> u32 {
    match color {
        CellColor::Purple | CellColor::Orange => 11,
        _ => 10,
    }
}

/// Score of one cleared group before the chain multiplier
pub fn group_score(size: usize, color: CellColor) -> u32 {
    let s = size as u32;
    let base = 2 * s * (s + 1);
    let with_bonus = base * color_bonus_tenths(color) / 10;
    with_bonus.max(MIN_GROUP_SCORE)
}

/// Chain multiplier in tenths for a 1-indexed chain level
///
/// Levels 1-10 come from the table; above 10 it grows by 4.0 per level.
pub fn level_multiplier_tenths(chain_level: u32) -> u32 {
    match chain_level {
        0 => CHAIN_MULTIPLIER_TENTHS[0],
        1..=10 => CHAIN_MULTIPLIER_TENTHS[(chain_level - 1) as usize],
        n => CHAIN_MULTIPLIER_TENTHS[9] + 40 * (n - 10),
    }
}

/// Chain multiplier as a float (for display)
pub fn level_multiplier(chain_level: u32) -> f32 {
    level_multiplier_tenths(chain_level) as f32 / 10.0
}

/// Score of one chain level from the summed group scores of that level
pub fn level_score(group_sum: u32, chain_level: u32) -> u32 {
    group_sum.saturating_mul(level_multiplier_tenths(chain_level)) / 10
}

/// Base damage for a finished cascade: `max(1, score / CHAIN_SCORE_BASE)`
pub fn chain_base_damage(score: u32) -> u32 {
    (score / CHAIN_SCORE_BASE).max(1)
}

/// Damage of Bomb and Lightning specials at a chain level
///
/// `floor(40 · (1 + 0.5·(chain-1)) · chain_damage_multiplier)`
pub fn special_strike_damage(chain_level: u32, chain_damage_multiplier: f32) -> u32 {
    let chain = chain_level.max(1) as f32;
    let raw = BOMB_BASE_DAMAGE as f32 * (1.0 + 0.5 * (chain - 1.0)) * chain_damage_multiplier;
    raw.max(0.0).floor() as u32
}
