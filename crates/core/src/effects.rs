//! Visual effects - floating damage numbers and clear particles
//!
//! Purely decorative state. It is advanced by the battle tick so the view
//! stays a pure function of the snapshot, but nothing here feeds back into
//! the simulation.

use crate::rng::SimpleRng;
use crate::types::{
    CellColor, DamageTint, GridPos, DAMAGE_NUMBER_LIFETIME, DAMAGE_NUMBER_RISE, PARTICLES_PER_CELL,
    PARTICLE_LIFE_MAX, PARTICLE_LIFE_MIN, PARTICLE_SPEED,
};

/// Soft cap so a huge cascade cannot grow the particle list without bound
const MAX_PARTICLES: usize = 1024;

/// Who a damage number floats over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberAnchor {
    Player,
    Enemy(usize),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageNumber {
    pub value: u32,
    pub tint: DamageTint,
    pub anchor: NumberAnchor,
    /// Seconds since spawn
    pub age: f32,
}

impl DamageNumber {
    /// Rows risen since spawn
    pub fn rise(&self) -> f32 {
        self.age * DAMAGE_NUMBER_RISE
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Position in grid cells (fractional)
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub life: f32,
    pub max_life: f32,
    pub color: CellColor,
}

/// The 8 compass directions, unit length
const DIRECTIONS: [(f32, f32); PARTICLES_PER_CELL] = [
    (0.0, -1.0),
    (0.707_106_77, -0.707_106_77),
    (1.0, 0.0),
    (0.707_106_77, 0.707_106_77),
    (0.0, 1.0),
    (-0.707_106_77, 0.707_106_77),
    (-1.0, 0.0),
    (-0.707_106_77, -0.707_106_77),
];

#[derive(Debug, Clone, Default)]
pub struct Effects {
    numbers: Vec<DamageNumber>,
    particles: Vec<Particle>,
}

impl Effects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn numbers(&self) -> &[DamageNumber] {
        &self.numbers
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn push_number(&mut self, value: u32, tint: DamageTint, anchor: NumberAnchor) {
        if value == 0 {
            return;
        }
        self.numbers.push(DamageNumber {
            value,
            tint,
            anchor,
            age: 0.0,
        });
    }

    /// Spray particles out of a cleared cell
    pub fn burst(&mut self, pos: GridPos, color: CellColor, rng: &mut SimpleRng) {
        for (dx, dy) in DIRECTIONS {
            if self.particles.len() >= MAX_PARTICLES {
                return;
            }
            let life = rng.next_f32_in(PARTICLE_LIFE_MIN, PARTICLE_LIFE_MAX);
            self.particles.push(Particle {
                x: pos.x as f32,
                y: pos.y as f32,
                vx: dx * PARTICLE_SPEED,
                vy: dy * PARTICLE_SPEED,
                life,
                max_life: life,
                color,
            });
        }
    }

    pub fn update(&mut self, dt: f32) {
        for n in self.numbers.iter_mut() {
            n.age += dt;
        }
        self.numbers.retain(|n| n.age < DAMAGE_NUMBER_LIFETIME);

        for p in self.particles.iter_mut() {
            p.x += p.vx * dt;
            p.y += p.vy * dt;
            p.life -= dt;
        }
        self.particles.retain(|p| p.life > 0.0);
    }

    pub fn clear(&mut self) {
        self.numbers.clear();
        self.particles.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers_expire() {
        let mut fx = Effects::new();
        fx.push_number(12, DamageTint::Outgoing, NumberAnchor::Enemy(0));
        fx.push_number(0, DamageTint::Incoming, NumberAnchor::Player);
        assert_eq!(fx.numbers().len(), 1);

        fx.update(1.0);
        assert!((fx.numbers()[0].rise() - DAMAGE_NUMBER_RISE).abs() < 1e-6);
        fx.update(1.0);
        assert!(fx.numbers().is_empty());
    }

    #[test]
    fn test_burst_emits_eight_and_fades() {
        let mut fx = Effects::new();
        let mut rng = SimpleRng::new(3);
        fx.burst(GridPos::new(2, 5), CellColor::Red, &mut rng);
        assert_eq!(fx.particles().len(), PARTICLES_PER_CELL);
        assert!(fx
            .particles()
            .iter()
            .all(|p| (PARTICLE_LIFE_MIN..=PARTICLE_LIFE_MAX).contains(&p.life)));

        fx.update(PARTICLE_LIFE_MAX);
        assert!(fx.particles().is_empty());
    }
}
