//! Encounter module - enemy groups, target selection and floor generation

use arrayvec::ArrayVec;

use crate::enemy::Enemy;
use crate::rng::SimpleRng;
use crate::types::{
    EnemySpecies, BOSS_FLOOR_INTERVAL, ENEMY_SLOT_H, ENEMY_SLOT_W, MAX_ENEMIES,
    MULTI_ENEMY_DMG_SCALE, MULTI_ENEMY_HP_SCALE,
};

/// Species that can appear on a regular floor
pub fn species_pool(floor: u32) -> &'static [EnemySpecies] {
    use EnemySpecies::*;
    match floor {
        0..=2 => &[Slime, Goblin],
        3..=4 => &[Goblin, Orc, Golem],
        5..=6 => &[Orc, Golem, Mage],
        7..=8 => &[Golem, Mage, Dragon],
        _ => &[Dragon, BossDemon],
    }
}

pub fn is_boss_floor(floor: u32) -> bool {
    floor > 0 && floor % BOSS_FLOOR_INTERVAL == 0
}

/// Enemy level for a floor: one of `floor - 1`, `floor`, `floor + 1`, at least 1
fn roll_level(floor: u32, rng: &mut SimpleRng) -> u32 {
    (floor + rng.next_range(3)).saturating_sub(1).max(1)
}

/// Boss species guarding a boss floor
pub fn boss_for(floor: u32) -> EnemySpecies {
    match floor {
        0..=5 => EnemySpecies::Orc,
        6..=10 => EnemySpecies::Dragon,
        _ => EnemySpecies::BossDemon,
    }
}

/// Weights for groups of 1, 2 and 3 enemies
pub fn group_size_weights(floor: u32) -> [u32; MAX_ENEMIES] {
    match floor {
        0..=2 => [80, 20, 0],
        3..=5 => [50, 40, 10],
        _ => [30, 50, 20],
    }
}

/// The enemies of one battle and the player's current target
#[derive(Debug, Clone, Default)]
pub struct EnemyGroup {
    enemies: ArrayVec<Enemy, MAX_ENEMIES>,
    selected: usize,
}

impl EnemyGroup {
    /// Group from explicit enemies; extras beyond `MAX_ENEMIES` are dropped
    pub fn from_enemies(enemies: impl IntoIterator<Item = Enemy>) -> Self {
        let mut group = Self {
            enemies: enemies.into_iter().take(MAX_ENEMIES).collect(),
            selected: 0,
        };
        group.snap_selection();
        group
    }

    /// Roll the encounter for a floor
    pub fn generate(floor: u32, rng: &mut SimpleRng) -> Self {
        let floor = floor.max(1);

        if is_boss_floor(floor) {
            let level = roll_level(floor, rng);
            let boss = Enemy::new(boss_for(floor), level, rng);
            log::info!("boss floor {}: {}", floor, boss.name());
            return Self::from_enemies([boss]);
        }

        let pool = species_pool(floor);
        let count = 1 + rng.pick_weighted(&group_size_weights(floor));
        let mut enemies = ArrayVec::<Enemy, MAX_ENEMIES>::new();
        for _ in 0..count {
            let species = pool[rng.next_range(pool.len() as u32) as usize];
            let level = roll_level(floor, rng);
            let mut enemy = Enemy::new(species, level, rng);
            if count > 1 {
                enemy.apply_group_scaling(MULTI_ENEMY_HP_SCALE, MULTI_ENEMY_DMG_SCALE);
            }
            enemies.push(enemy);
        }
        Self::from_enemies(enemies)
    }

    pub fn len(&self) -> usize {
        self.enemies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Enemy> {
        self.enemies.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Enemy> {
        self.enemies.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Enemy> {
        self.enemies.iter_mut()
    }

    pub fn living_count(&self) -> usize {
        self.enemies.iter().filter(|e| e.is_alive()).count()
    }

    pub fn all_dead(&self) -> bool {
        self.enemies.iter().all(|e| !e.is_alive())
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    /// The current target, if it is alive
    pub fn selected(&self) -> Option<&Enemy> {
        self.enemies.get(self.selected).filter(|e| e.is_alive())
    }

    pub fn selected_mut(&mut self) -> Option<&mut Enemy> {
        self.enemies.get_mut(self.selected).filter(|e| e.is_alive())
    }

    /// Move the target to the first living enemy if the current one is dead
    pub fn snap_selection(&mut self) {
        if self.selected().is_some() {
            return;
        }
        if let Some(i) = self.enemies.iter().position(|e| e.is_alive()) {
            self.selected = i;
        }
    }

    fn cycle(&mut self, forward: bool) -> bool {
        let n = self.enemies.len();
        for step in 1..=n {
            let i = if forward {
                (self.selected + step) % n
            } else {
                (self.selected + n * step - step) % n
            };
            if self.enemies[i].is_alive() {
                let changed = i != self.selected;
                self.selected = i;
                return changed;
            }
        }
        false
    }

    pub fn select_next(&mut self) -> bool {
        self.cycle(true)
    }

    pub fn select_prev(&mut self) -> bool {
        self.cycle(false)
    }

    /// Select the living enemy whose arena slot contains (x, y)
    pub fn select_at(&mut self, x: u16, y: u16) -> bool {
        if y >= ENEMY_SLOT_H {
            return false;
        }
        let i = (x / ENEMY_SLOT_W) as usize;
        match self.enemies.get(i) {
            Some(e) if e.is_alive() => {
                self.selected = i;
                true
            }
            _ => false,
        }
    }

    /// Index of the living enemy with the most HP (first on ties)
    pub fn strongest_living(&self) -> Option<usize> {
        let mut best: Option<(usize, u32)> = None;
        for (i, e) in self.enemies.iter().enumerate() {
            if !e.is_alive() {
                continue;
            }
            if best.map_or(true, |(_, hp)| e.hp() > hp) {
                best = Some((i, e.hp()));
            }
        }
        best.map(|(i, _)| i)
    }
}
