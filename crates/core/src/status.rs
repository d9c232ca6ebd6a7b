//! Status module - timed buffs, debuffs, shields and damage-over-time
//!
//! Each actor carries a [`StatusMap`]. Entries keep their insertion order
//! because shields are consumed front to back. Applying a kind that is
//! already present replaces its magnitude and duration in place.
//!
//! Expired entries are not removed by [`StatusMap::tick`]; the battle
//! controller calls [`StatusMap::purge_expired`] at the end of its tick so an
//! entry that runs out mid-tick still counts for that tick's damage.

use arrayvec::ArrayVec;

use crate::types::StatusKind;

/// One slot per status kind
pub const MAX_STATUSES: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusEntry {
    pub kind: StatusKind,
    /// Percent for buffs/debuffs/reflect/curse, points for shields and
    /// flat defense, damage per second for poison, unused for stun
    pub magnitude: f32,
    /// Seconds left
    pub remaining: f32,
}

impl StatusEntry {
    pub fn is_expired(&self) -> bool {
        self.remaining <= 0.0 || (self.kind.is_shield() && self.magnitude <= 0.0)
    }
}

/// Result of pushing damage through a shield stack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Absorbed {
    /// Damage left after shields
    pub remaining: u32,
    /// Total damage soaked by shields
    pub absorbed: u32,
    /// HP to restore from absorb shields
    pub healed: u32,
}

#[derive(Debug, Clone, Default)]
pub struct StatusMap {
    entries: ArrayVec<StatusEntry, MAX_STATUSES>,
    /// Fractional poison damage carried between ticks
    poison_carry: f32,
}

impl StatusMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or refresh a status
    pub fn apply(&mut self, kind: StatusKind, magnitude: f32, duration: f32) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.kind == kind) {
            entry.magnitude = magnitude;
            entry.remaining = duration;
            return;
        }
        // One slot per kind, so this cannot overflow.
        let _ = self.entries.try_push(StatusEntry {
            kind,
            magnitude,
            remaining: duration,
        });
    }

    pub fn get(&self, kind: StatusKind) -> Option<&StatusEntry> {
        self.entries.iter().find(|e| e.kind == kind)
    }

    pub fn has(&self, kind: StatusKind) -> bool {
        self.get(kind).is_some_and(|e| !e.is_expired())
    }

    /// Magnitude of an active status, 0 when absent
    pub fn magnitude(&self, kind: StatusKind) -> f32 {
        match self.get(kind) {
            Some(e) if !e.is_expired() => e.magnitude,
            _ => 0.0,
        }
    }

    pub fn remove(&mut self, kind: StatusKind) {
        self.entries.retain(|e| e.kind != kind);
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.poison_carry = 0.0;
    }

    /// Advance timers by `dt`. Returns whole poison damage due this tick.
    pub fn tick(&mut self, dt: f32) -> u32 {
        for entry in self.entries.iter_mut() {
            if entry.remaining <= 0.0 {
                continue;
            }
            if entry.kind == StatusKind::Poison {
                self.poison_carry += entry.magnitude * dt.min(entry.remaining);
            }
            entry.remaining -= dt;
        }

        let whole = self.poison_carry.floor();
        self.poison_carry -= whole;
        whole as u32
    }

    /// Drop entries whose time ran out or whose shield is spent
    pub fn purge_expired(&mut self) {
        self.entries.retain(|e| !e.is_expired());
        if !self.has(StatusKind::Poison) {
            self.poison_carry = 0.0;
        }
    }

    /// Outgoing damage factor: product of buffs over product of debuffs
    pub fn attack_multiplier(&self) -> f32 {
        let buff = 1.0 + self.magnitude(StatusKind::AttackBuff) / 100.0;
        let debuff = 1.0 + self.magnitude(StatusKind::AttackDebuff) / 100.0;
        buff / debuff
    }

    /// Outgoing damage factor from a curse placed on this actor
    pub fn curse_factor(&self) -> f32 {
        1.0 / (1.0 + self.magnitude(StatusKind::Curse) / 100.0)
    }

    pub fn is_stunned(&self) -> bool {
        self.has(StatusKind::Stun)
    }

    /// Consume shields in insertion order
    pub fn absorb(&mut self, damage: u32) -> Absorbed {
        let mut out = Absorbed {
            remaining: damage,
            ..Absorbed::default()
        };

        for entry in self.entries.iter_mut() {
            if out.remaining == 0 {
                break;
            }
            if !entry.kind.is_shield() || entry.is_expired() {
                continue;
            }
            let soak = (out.remaining as f32).min(entry.magnitude).floor() as u32;
            entry.magnitude -= soak as f32;
            out.remaining -= soak;
            out.absorbed += soak;
            if entry.kind == StatusKind::AbsorbShield {
                out.healed += soak;
            }
        }

        out
    }

    /// Total shield points left
    pub fn shield_total(&self) -> f32 {
        self.entries
            .iter()
            .filter(|e| e.kind.is_shield() && !e.is_expired())
            .map(|e| e.magnitude)
            .sum()
    }
}
