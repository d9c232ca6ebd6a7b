//! Enemy module - species roster, scaling and pattern-driven AI
//!
//! Every enemy walks one attack pattern picked at creation. Its attack timer
//! fills up with sim time; when it reaches the interval the action under the
//! cursor is emitted and the cursor advances. The action under the cursor
//! is always visible as the enemy's intent.
//!
//! Self-targeted parts of an action (guard, heal, self-buff) are applied
//! here; the battle controller delivers the player-facing parts.

use crate::rng::SimpleRng;
use crate::status::StatusMap;
use crate::types::{
    EnemySpecies, StatusKind, ENEMY_BASE_DMG, ENEMY_BASE_HP, ENEMY_BASE_INTERVAL,
    ENEMY_BUFF_DURATION, ENEMY_DAMAGE_FLASH, FLOOR_SCALING_DMG, FLOOR_SCALING_HP,
    FLOOR_SCALING_SPEED, GUARD_REDUCTION, PLAYER_DEBUFF_DURATION,
};

/// Species stat multipliers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeciesStats {
    pub hp: f64,
    pub damage: f64,
    pub interval: f64,
}

pub fn species_stats(species: EnemySpecies) -> SpeciesStats {
    let (hp, damage, interval) = match species {
        EnemySpecies::Slime => (0.8, 0.7, 1.2),
        EnemySpecies::Goblin => (1.0, 1.0, 0.8),
        EnemySpecies::Orc => (1.5, 1.3, 1.0),
        EnemySpecies::Golem => (2.0, 0.9, 1.5),
        EnemySpecies::Mage => (1.2, 1.1, 1.3),
        EnemySpecies::Dragon => (3.0, 1.8, 1.1),
        EnemySpecies::BossDemon => (5.0, 2.5, 0.7),
    };
    SpeciesStats {
        hp,
        damage,
        interval,
    }
}

/// What a technique does, before it is sized against an enemy
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Move {
    /// Hit the player for base damage × factor
    Attack(f32),
    /// Heavier hit, same delivery as `Attack`
    Special(f32),
    Guard,
    /// Restore a fraction of max HP
    Heal(f32),
    BuffSelf(StatusKind, f32),
    /// Attack debuff on the player, in percent
    DebuffPlayer(f32),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Technique {
    pub name: &'static str,
    pub effect: Move,
}

const fn tech(name: &'static str, effect: Move) -> Technique {
    Technique { name, effect }
}

// Slot 0 and 1 are shared by every species.
const BASIC: usize = 0;
const GUARD: usize = 1;

const SLIME: [Technique; 4] = [
    tech("Basic Attack", Move::Attack(1.0)),
    tech("Guard", Move::Guard),
    tech("Split Strike", Move::Attack(0.8)),
    tech("Regenerate", Move::Heal(0.2)),
];

const GOBLIN: [Technique; 4] = [
    tech("Basic Attack", Move::Attack(1.0)),
    tech("Guard", Move::Guard),
    tech("Quick Stab", Move::Attack(0.7)),
    tech("Evasive Stance", Move::BuffSelf(StatusKind::DefenseBuff, 30.0)),
];

const ORC: [Technique; 4] = [
    tech("Basic Attack", Move::Attack(1.0)),
    tech("Guard", Move::Guard),
    tech("Heavy Blow", Move::Special(1.6)),
    tech("Rage", Move::BuffSelf(StatusKind::AttackBuff, 40.0)),
];

const GOLEM: [Technique; 4] = [
    tech("Basic Attack", Move::Attack(1.0)),
    tech("Guard", Move::Guard),
    tech("Rock Throw", Move::Attack(1.3)),
    tech("Iron Wall", Move::BuffSelf(StatusKind::DefenseBuff, 50.0)),
];

const MAGE: [Technique; 5] = [
    tech("Basic Attack", Move::Attack(1.0)),
    tech("Guard", Move::Guard),
    tech("Arcane Bolt", Move::Special(1.2)),
    tech("Empower", Move::BuffSelf(StatusKind::AttackBuff, 30.0)),
    tech("Ward", Move::BuffSelf(StatusKind::DefenseBuff, 35.0)),
];

const DRAGON: [Technique; 5] = [
    tech("Basic Attack", Move::Attack(1.0)),
    tech("Guard", Move::Guard),
    tech("Fire Breath", Move::Special(1.4)),
    tech("Intimidate", Move::DebuffPlayer(25.0)),
    tech("Dragon Fury", Move::BuffSelf(StatusKind::AttackBuff, 50.0)),
];

const DEMON: [Technique; 6] = [
    tech("Basic Attack", Move::Attack(1.0)),
    tech("Guard", Move::Guard),
    tech("Dark Orb", Move::Special(1.3)),
    tech("Hellfire", Move::Special(1.8)),
    tech("Dark Heal", Move::Heal(0.25)),
    tech("Overlord's Aura", Move::DebuffPlayer(40.0)),
];

/// Technique list of a species
pub fn techniques(species: EnemySpecies) -> &'static [Technique] {
    match species {
        EnemySpecies::Slime => &SLIME,
        EnemySpecies::Goblin => &GOBLIN,
        EnemySpecies::Orc => &ORC,
        EnemySpecies::Golem => &GOLEM,
        EnemySpecies::Mage => &MAGE,
        EnemySpecies::Dragon => &DRAGON,
        EnemySpecies::BossDemon => &DEMON,
    }
}

/// Cyclic patterns as indices into [`techniques`]
pub fn patterns(species: EnemySpecies) -> &'static [&'static [usize]] {
    match species {
        EnemySpecies::Slime => &[&[BASIC, 2, 3], &[BASIC, BASIC, GUARD]],
        EnemySpecies::Goblin => &[&[2, BASIC, 3], &[BASIC, 2, GUARD]],
        EnemySpecies::Orc => &[&[BASIC, 2, GUARD], &[3, BASIC, 2]],
        EnemySpecies::Golem => &[&[GUARD, 2, 3], &[BASIC, GUARD, 2]],
        EnemySpecies::Mage => &[&[3, 2, 4], &[BASIC, 2, GUARD]],
        EnemySpecies::Dragon => &[&[3, 2, GUARD], &[BASIC, 4, 2]],
        EnemySpecies::BossDemon => &[&[BASIC, 2, GUARD], &[3, 4, BASIC], &[5, 2, 3]],
    }
}

/// A technique sized against its user
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActionKind {
    Attack(u32),
    Special(u32),
    Guard,
    Heal(u32),
    BuffSelf {
        status: StatusKind,
        pct: f32,
        duration: f32,
    },
    DebuffPlayer {
        pct: f32,
        duration: f32,
    },
}

impl ActionKind {
    /// Damage dealt to the player, if any
    pub fn damage(&self) -> Option<u32> {
        match self {
            ActionKind::Attack(d) | ActionKind::Special(d) => Some(*d),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyAction {
    pub name: &'static str,
    pub kind: ActionKind,
}

/// Stat line for an enemy of a species at a floor level
pub fn scaled_stats(species: EnemySpecies, level: u32) -> (u32, u32, f32) {
    let s = species_stats(species);
    let steps = level.max(1) as i32 - 1;
    let hp = (ENEMY_BASE_HP as f64 * s.hp * (FLOOR_SCALING_HP as f64).powi(steps)).round();
    let dmg = (ENEMY_BASE_DMG as f64 * s.damage * (FLOOR_SCALING_DMG as f64).powi(steps)).round();
    let interval =
        ENEMY_BASE_INTERVAL as f64 * s.interval * (FLOOR_SCALING_SPEED as f64).powi(steps);
    ((hp as u32).max(1), (dmg as u32).max(1), interval as f32)
}

/// Per-tick result of [`Enemy::update`]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EnemyTick {
    pub action: Option<EnemyAction>,
    /// Poison damage taken this tick
    pub poison: u32,
    /// HP actually restored by an emitted Heal
    pub healed: u32,
}

#[derive(Debug, Clone)]
pub struct Enemy {
    species: EnemySpecies,
    level: u32,
    hp: u32,
    max_hp: u32,
    base_damage: u32,
    attack_interval: f32,
    attack_timer: f32,
    guarding: bool,
    statuses: StatusMap,
    pattern: &'static [usize],
    cursor: usize,
    flash: f32,
}

impl Enemy {
    /// Enemy at a floor level with a pattern picked by `rng`
    pub fn new(species: EnemySpecies, level: u32, rng: &mut SimpleRng) -> Self {
        let choices = patterns(species);
        let pick = rng.next_range(choices.len() as u32) as usize;
        let (max_hp, base_damage, attack_interval) = scaled_stats(species, level);
        let mut enemy = Self::with_stats(species, max_hp, base_damage, attack_interval);
        enemy.level = level.max(1);
        enemy.pattern = choices[pick];
        enemy
    }

    /// Enemy with explicit stats, level 1, first pattern
    pub fn with_stats(
        species: EnemySpecies,
        max_hp: u32,
        base_damage: u32,
        attack_interval: f32,
    ) -> Self {
        Self {
            species,
            level: 1,
            hp: max_hp,
            max_hp,
            base_damage,
            attack_interval: attack_interval.max(0.1),
            attack_timer: 0.0,
            guarding: false,
            statuses: StatusMap::new(),
            pattern: patterns(species)[0],
            cursor: 0,
            flash: 0.0,
        }
    }

    /// Multi-enemy encounters weaken each member
    pub fn apply_group_scaling(&mut self, hp_scale: f32, dmg_scale: f32) {
        self.max_hp = ((self.max_hp as f32 * hp_scale).round() as u32).max(1);
        self.hp = self.max_hp;
        self.base_damage = ((self.base_damage as f32 * dmg_scale).round() as u32).max(1);
    }

    pub fn species(&self) -> EnemySpecies {
        self.species
    }

    pub fn name(&self) -> &'static str {
        self.species.as_str()
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn hp(&self) -> u32 {
        self.hp
    }

    pub fn max_hp(&self) -> u32 {
        self.max_hp
    }

    pub fn base_damage(&self) -> u32 {
        self.base_damage
    }

    pub fn attack_interval(&self) -> f32 {
        self.attack_interval
    }

    pub fn attack_timer(&self) -> f32 {
        self.attack_timer
    }

    /// Fill ratio of the attack timer in [0, 1]
    pub fn timer_progress(&self) -> f32 {
        (self.attack_timer / self.attack_interval).clamp(0.0, 1.0)
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn is_guarding(&self) -> bool {
        self.guarding
    }

    pub fn is_stunned(&self) -> bool {
        self.statuses.is_stunned()
    }

    pub fn stun_remaining(&self) -> f32 {
        match self.statuses.get(StatusKind::Stun) {
            Some(e) if !e.is_expired() => e.remaining,
            _ => 0.0,
        }
    }

    pub fn statuses(&self) -> &StatusMap {
        &self.statuses
    }

    pub fn statuses_mut(&mut self) -> &mut StatusMap {
        &mut self.statuses
    }

    /// Seconds left on the hit flash
    pub fn flash(&self) -> f32 {
        self.flash
    }

    pub fn pattern(&self) -> &'static [usize] {
        self.pattern
    }

    /// Technique the next emission will use
    pub fn intent_technique(&self) -> Technique {
        techniques(self.species)[self.pattern[self.cursor]]
    }

    /// The next action, sized with the current modifiers
    pub fn intent(&self) -> EnemyAction {
        self.resolve(self.intent_technique())
    }

    /// Outgoing damage after attack buffs, debuffs and curse
    pub fn outgoing_damage(&self, factor: f32) -> u32 {
        let raw = self.base_damage as f32 * factor;
        let modded = raw * self.statuses.attack_multiplier() * self.statuses.curse_factor();
        (modded.floor() as u32).max(1)
    }

    fn resolve(&self, tech: Technique) -> EnemyAction {
        let kind = match tech.effect {
            Move::Attack(f) => ActionKind::Attack(self.outgoing_damage(f)),
            Move::Special(f) => ActionKind::Special(self.outgoing_damage(f)),
            Move::Guard => ActionKind::Guard,
            Move::Heal(frac) => ActionKind::Heal(((self.max_hp as f32 * frac).floor() as u32).max(1)),
            Move::BuffSelf(status, pct) => ActionKind::BuffSelf {
                status,
                pct,
                duration: ENEMY_BUFF_DURATION,
            },
            Move::DebuffPlayer(pct) => ActionKind::DebuffPlayer {
                pct,
                duration: PLAYER_DEBUFF_DURATION,
            },
        };
        EnemyAction {
            name: tech.name,
            kind,
        }
    }

    /// Advance timers; emits at most one action per call
    pub fn update(&mut self, dt: f32) -> EnemyTick {
        let mut tick = EnemyTick::default();
        if !self.is_alive() {
            return tick;
        }
        // Guard covers hits up to this tick only, stunned or not.
        self.guarding = false;

        self.flash = (self.flash - dt).max(0.0);
        tick.poison = self.statuses.tick(dt);
        if tick.poison > 0 {
            self.lose_hp(tick.poison);
            if !self.is_alive() {
                return tick;
            }
        }

        if self.is_stunned() {
            return tick;
        }

        self.attack_timer += dt;
        if self.attack_timer >= self.attack_interval {
            self.attack_timer = 0.0;
            let hp_before = self.hp;
            tick.action = Some(self.emit());
            tick.healed = self.hp - hp_before;
        }
        tick
    }

    /// Emit the intent, advance the cursor and apply the self-targeted part
    pub fn emit(&mut self) -> EnemyAction {
        let action = self.intent();
        self.cursor = (self.cursor + 1) % self.pattern.len();
        self.guarding = false;

        match action.kind {
            ActionKind::Guard => self.guarding = true,
            ActionKind::Heal(amount) => {
                self.heal(amount);
            }
            ActionKind::BuffSelf {
                status,
                pct,
                duration,
            } => self.statuses.apply(status, pct, duration),
            _ => {}
        }

        log::debug!("{} uses {}", self.name(), action.name);
        action
    }

    /// Mitigated hit: guard halves it, defense buff cuts a percentage
    pub fn take_damage(&mut self, raw: u32) -> u32 {
        if !self.is_alive() || raw == 0 {
            return 0;
        }
        let mut d = raw as f32;
        if self.guarding {
            d *= GUARD_REDUCTION;
        }
        let defense = self.statuses.magnitude(StatusKind::DefenseBuff);
        d *= (1.0 - defense / 100.0).max(0.0);
        let amount = (d.floor() as u32).max(1);
        self.lose_hp(amount)
    }

    /// Unmitigated HP loss (poison, reflect). Returns HP actually lost.
    pub fn lose_hp(&mut self, amount: u32) -> u32 {
        let lost = amount.min(self.hp);
        self.hp -= lost;
        if lost > 0 {
            self.flash = ENEMY_DAMAGE_FLASH;
        }
        lost
    }

    /// Returns HP actually restored
    pub fn heal(&mut self, amount: u32) -> u32 {
        if !self.is_alive() {
            return 0;
        }
        let gained = amount.min(self.max_hp - self.hp);
        self.hp += gained;
        gained
    }
}
