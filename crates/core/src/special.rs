//! Special cells - spawn rates and effect resolution
//!
//! The grid stores which cells carry a special kind. This module decides
//! which new cells get one and what each kind does when its host clears.

use serde::{Deserialize, Serialize};

use crate::rng::SimpleRng;
use crate::scoring::special_strike_damage;
use crate::types::{
    SpecialKind, HEAL_SPECIAL_AMOUNT, MULTIPLIER_SPECIAL_DURATION, MULTIPLIER_SPECIAL_PCT,
    POISON_SPECIAL_DPS, POISON_SPECIAL_DURATION, SHIELD_SPECIAL_AMOUNT, SHIELD_SPECIAL_DURATION,
};

/// Per-kind spawn probability for each new cell
///
/// All rates start at 0; rewards raise them. Rates summing below 1 leave
/// room for plain cells.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SpecialRates {
    rates: [f32; 6],
}

impl SpecialRates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: SpecialKind) -> f32 {
        self.rates[kind.index()]
    }

    /// Set a rate, clamped to [0, 1]
    pub fn set(&mut self, kind: SpecialKind, rate: f32) {
        self.rates[kind.index()] = if rate.is_finite() {
            rate.clamp(0.0, 1.0)
        } else {
            0.0
        };
    }

    pub fn with(mut self, kind: SpecialKind, rate: f32) -> Self {
        self.set(kind, rate);
        self
    }

    pub fn total(&self) -> f32 {
        self.rates.iter().sum()
    }

    pub fn is_zero(&self) -> bool {
        self.rates.iter().all(|&r| r <= 0.0)
    }

    /// Roll one cell: the first kind whose cumulative rate covers the roll wins.
    /// Does not touch the RNG when every rate is zero.
    pub fn roll(&self, rng: &mut SimpleRng) -> Option<SpecialKind> {
        if self.is_zero() {
            return None;
        }
        let roll = rng.next_f32();
        let mut cumulative = 0.0;
        for kind in SpecialKind::ALL {
            cumulative += self.get(kind);
            if roll < cumulative {
                return Some(kind);
            }
        }
        None
    }
}

/// What a fired special does, resolved against the chain that cleared it
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpecialEffect {
    HealPlayer(u32),
    /// Damage every living enemy
    StrikeAll(u32),
    /// Damage the living enemy with the most HP
    StrikeStrongest(u32),
    Shield { amount: f32, duration: f32 },
    /// Timed attack buff plus a multiplier on the current cascade's damage
    AttackBuff { pct: f32, duration: f32 },
    PoisonAll { dps: f32, duration: f32 },
}

impl SpecialEffect {
    pub fn resolve(kind: SpecialKind, chain_level: u32, chain_damage_multiplier: f32) -> Self {
        match kind {
            SpecialKind::Heal => SpecialEffect::HealPlayer(HEAL_SPECIAL_AMOUNT),
            SpecialKind::Bomb => SpecialEffect::StrikeAll(special_strike_damage(
                chain_level,
                chain_damage_multiplier,
            )),
            SpecialKind::Lightning => SpecialEffect::StrikeStrongest(special_strike_damage(
                chain_level,
                chain_damage_multiplier,
            )),
            SpecialKind::Shield => SpecialEffect::Shield {
                amount: SHIELD_SPECIAL_AMOUNT,
                duration: SHIELD_SPECIAL_DURATION,
            },
            SpecialKind::Multiplier => SpecialEffect::AttackBuff {
                pct: MULTIPLIER_SPECIAL_PCT,
                duration: MULTIPLIER_SPECIAL_DURATION,
            },
            SpecialKind::Poison => SpecialEffect::PoisonAll {
                dps: POISON_SPECIAL_DPS,
                duration: POISON_SPECIAL_DURATION,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_rates_never_roll() {
        let rates = SpecialRates::new();
        let mut rng = SimpleRng::new(5);
        let before = rng.state();
        for _ in 0..100 {
            assert_eq!(rates.roll(&mut rng), None);
        }
        assert_eq!(rng.state(), before);
    }

    #[test]
    fn test_full_rate_always_rolls() {
        let rates = SpecialRates::new().with(SpecialKind::Bomb, 1.0);
        let mut rng = SimpleRng::new(5);
        for _ in 0..100 {
            assert_eq!(rates.roll(&mut rng), Some(SpecialKind::Bomb));
        }
    }

    #[test]
    fn test_partial_rate_mixes() {
        let rates = SpecialRates::new().with(SpecialKind::Heal, 0.5);
        let mut rng = SimpleRng::new(11);
        let hits = (0..1000).filter(|_| rates.roll(&mut rng).is_some()).count();
        assert!((350..650).contains(&hits));
    }

    #[test]
    fn test_rate_is_clamped() {
        let mut rates = SpecialRates::new();
        rates.set(SpecialKind::Poison, 3.0);
        assert_eq!(rates.get(SpecialKind::Poison), 1.0);
        rates.set(SpecialKind::Poison, f32::NAN);
        assert_eq!(rates.get(SpecialKind::Poison), 0.0);
    }

    #[test]
    fn test_resolve_bomb_scales_with_chain() {
        assert_eq!(
            SpecialEffect::resolve(SpecialKind::Bomb, 1, 1.0),
            SpecialEffect::StrikeAll(40)
        );
        assert_eq!(
            SpecialEffect::resolve(SpecialKind::Lightning, 3, 1.0),
            SpecialEffect::StrikeStrongest(80)
        );
    }
}
