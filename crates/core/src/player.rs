//! Player module - hit points, statuses, potions and the persisted record

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::special::SpecialRates;
use crate::status::StatusMap;
use crate::types::{
    PotionKind, Rarity, SpecialKind, StatusKind, DAMAGE_FLASH, PLAYER_MAX_HP, POTION_BELT_SIZE,
    POTION_BUFF_DURATION, POTION_DEFENSE, POTION_EXPLOSIVE_DAMAGE, POTION_FREEZE_SECS,
    POTION_HEAL, POTION_STRENGTH_PCT, POTION_VENOM_DPS, POTION_VENOM_DURATION,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Potion {
    pub kind: PotionKind,
    pub rarity: Rarity,
}

/// A potion's effect with rarity applied
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PotionEffect {
    Heal(u32),
    Buff {
        status: StatusKind,
        magnitude: f32,
        duration: f32,
    },
    StunEnemies(f32),
    PoisonEnemies { dps: f32, duration: f32 },
    DamageTarget(u32),
}

impl Potion {
    pub const fn new(kind: PotionKind, rarity: Rarity) -> Self {
        Self { kind, rarity }
    }

    pub fn effect(&self) -> PotionEffect {
        let r = self.rarity.multiplier();
        match self.kind {
            PotionKind::Health => PotionEffect::Heal((POTION_HEAL * r).round() as u32),
            PotionKind::Strength => PotionEffect::Buff {
                status: StatusKind::AttackBuff,
                magnitude: POTION_STRENGTH_PCT * r,
                duration: POTION_BUFF_DURATION,
            },
            PotionKind::Defense => PotionEffect::Buff {
                status: StatusKind::DefenseBuff,
                magnitude: (POTION_DEFENSE * r).round(),
                duration: POTION_BUFF_DURATION,
            },
            PotionKind::FreezeTime => PotionEffect::StunEnemies(POTION_FREEZE_SECS * r),
            PotionKind::Venom => PotionEffect::PoisonEnemies {
                dps: POTION_VENOM_DPS * r,
                duration: POTION_VENOM_DURATION,
            },
            PotionKind::Explosive => {
                PotionEffect::DamageTarget((POTION_EXPLOSIVE_DAMAGE * r).round() as u32)
            }
        }
    }
}

/// Up to three potions carried into battle
#[derive(Debug, Clone, Default)]
pub struct PotionBelt {
    slots: ArrayVec<Potion, POTION_BELT_SIZE>,
}

impl PotionBelt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when the belt is full
    pub fn add(&mut self, potion: Potion) -> bool {
        self.slots.try_push(potion).is_ok()
    }

    pub fn get(&self, slot: usize) -> Option<&Potion> {
        self.slots.get(slot)
    }

    /// Remove a potion; later slots shift down
    pub fn take(&mut self, slot: usize) -> Option<Potion> {
        if slot < self.slots.len() {
            Some(self.slots.remove(slot))
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Potion> {
        self.slots.iter()
    }
}

/// How an incoming hit was split by the damage pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HitReport {
    pub raw: u32,
    pub reflected: u32,
    pub absorbed: u32,
    pub healed: u32,
    pub blocked: u32,
    pub dealt: u32,
}

/// Serializable player state a host may persist between battles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub hp: u32,
    pub max_hp: u32,
    pub gold: u32,
    pub chain_damage_multiplier: f32,
    pub owned_specials: Vec<SpecialKind>,
    pub special_rates: SpecialRates,
}

impl Default for PlayerRecord {
    fn default() -> Self {
        Self {
            hp: PLAYER_MAX_HP,
            max_hp: PLAYER_MAX_HP,
            gold: 0,
            chain_damage_multiplier: 1.0,
            owned_specials: Vec::new(),
            special_rates: SpecialRates::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    hp: u32,
    max_hp: u32,
    pub gold: u32,
    pub chain_damage_multiplier: f32,
    /// Chain level of the cascade in progress (HUD only)
    pub chain_count: u32,
    statuses: StatusMap,
    belt: PotionBelt,
    owned_specials: Vec<SpecialKind>,
    special_rates: SpecialRates,
    flash: f32,
}

impl Player {
    pub fn new(max_hp: u32) -> Self {
        Self::from_record(&PlayerRecord {
            hp: max_hp,
            max_hp,
            ..PlayerRecord::default()
        })
    }

    /// Rebuild a player from its record; hp is clamped into [0, max_hp]
    pub fn from_record(record: &PlayerRecord) -> Self {
        let max_hp = record.max_hp.max(1);
        Self {
            hp: record.hp.min(max_hp),
            max_hp,
            gold: record.gold,
            chain_damage_multiplier: record.chain_damage_multiplier,
            chain_count: 0,
            statuses: StatusMap::new(),
            belt: PotionBelt::new(),
            owned_specials: record.owned_specials.clone(),
            special_rates: record.special_rates,
            flash: 0.0,
        }
    }

    pub fn record(&self) -> PlayerRecord {
        PlayerRecord {
            hp: self.hp,
            max_hp: self.max_hp,
            gold: self.gold,
            chain_damage_multiplier: self.chain_damage_multiplier,
            owned_specials: self.owned_specials.clone(),
            special_rates: self.special_rates,
        }
    }

    pub fn hp(&self) -> u32 {
        self.hp
    }

    pub fn max_hp(&self) -> u32 {
        self.max_hp
    }

    /// Set HP directly, clamped to [0, max_hp]
    pub fn set_hp(&mut self, hp: u32) {
        self.hp = hp.min(self.max_hp);
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn statuses(&self) -> &StatusMap {
        &self.statuses
    }

    pub fn statuses_mut(&mut self) -> &mut StatusMap {
        &mut self.statuses
    }

    pub fn belt(&self) -> &PotionBelt {
        &self.belt
    }

    pub fn belt_mut(&mut self) -> &mut PotionBelt {
        &mut self.belt
    }

    pub fn special_rates(&self) -> &SpecialRates {
        &self.special_rates
    }

    pub fn owned_specials(&self) -> &[SpecialKind] {
        &self.owned_specials
    }

    /// Reward path: own a special kind and raise its spawn rate
    pub fn grant_special(&mut self, kind: SpecialKind, rate: f32) {
        if !self.owned_specials.contains(&kind) {
            self.owned_specials.push(kind);
        }
        let current = self.special_rates.get(kind);
        self.special_rates.set(kind, current + rate);
    }

    /// Seconds left on the damage flash
    pub fn flash(&self) -> f32 {
        self.flash
    }

    pub fn tick_flash(&mut self, dt: f32) {
        self.flash = (self.flash - dt).max(0.0);
    }

    /// Outgoing chain damage factor from statuses
    pub fn attack_multiplier(&self) -> f32 {
        self.statuses.attack_multiplier()
    }

    /// Returns HP actually restored
    pub fn heal(&mut self, amount: u32) -> u32 {
        let gained = amount.min(self.max_hp - self.hp);
        self.hp += gained;
        gained
    }

    /// Unmitigated HP loss. Returns HP actually lost.
    pub fn lose_hp(&mut self, amount: u32) -> u32 {
        let lost = amount.min(self.hp);
        self.hp -= lost;
        if lost > 0 {
            self.flash = DAMAGE_FLASH;
        }
        lost
    }

    /// Damage pipeline: reflect, shields in order, flat defense, then HP
    pub fn receive_hit(&mut self, raw: u32) -> HitReport {
        let mut report = HitReport {
            raw,
            ..HitReport::default()
        };
        let mut d = raw;

        let reflect_pct = self.statuses.magnitude(StatusKind::Reflect);
        if reflect_pct > 0.0 {
            report.reflected = ((d as f32 * reflect_pct / 100.0).floor() as u32).min(d);
            d -= report.reflected;
        }

        let soaked = self.statuses.absorb(d);
        report.absorbed = soaked.absorbed;
        d = soaked.remaining;
        if soaked.healed > 0 {
            report.healed = self.heal(soaked.healed);
        }

        let flat = self.statuses.magnitude(StatusKind::DefenseBuff).max(0.0).floor() as u32;
        report.blocked = flat.min(d);
        d -= report.blocked;

        report.dealt = self.lose_hp(d);
        report
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new(PLAYER_MAX_HP)
    }
}
