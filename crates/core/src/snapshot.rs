//! Snapshot module - flat, render-ready projection of a battle
//!
//! A view renders from a [`BattleSnapshot`] only. `snapshot_into` refills an
//! existing snapshot so the per-frame projection reuses its buffers.

use arrayvec::ArrayVec;

use crate::effects::{DamageNumber, Particle};
use crate::enemy::{ActionKind, Enemy};
use crate::pair::LiveCell;
use crate::piece_source::PairSpec;
use crate::player::{Player, Potion};
use crate::status::{StatusEntry, StatusMap};
use crate::types::{
    BattlePhase, CascadePhase, CellColor, EnemySpecies, GridPos, SpecialKind, GRID_HEIGHT,
    GRID_WIDTH, NEXT_QUEUE_LEN,
};

pub type ColorGrid = [[CellColor; GRID_WIDTH as usize]; GRID_HEIGHT as usize];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusSnapshot {
    pub kind: crate::types::StatusKind,
    pub magnitude: f32,
    pub remaining: f32,
}

impl From<&StatusEntry> for StatusSnapshot {
    fn from(value: &StatusEntry) -> Self {
        Self {
            kind: value.kind,
            magnitude: value.magnitude,
            remaining: value.remaining,
        }
    }
}

fn write_statuses(map: &StatusMap, out: &mut Vec<StatusSnapshot>) {
    out.clear();
    out.extend(map.iter().map(StatusSnapshot::from));
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSnapshot {
    pub hp: u32,
    pub max_hp: u32,
    pub gold: u32,
    pub flash: f32,
    pub chain_count: u32,
    pub attack_multiplier: f32,
    pub shield: f32,
    pub statuses: Vec<StatusSnapshot>,
    pub potions: Vec<Potion>,
}

impl PlayerSnapshot {
    pub fn write_from(&mut self, player: &Player) {
        self.hp = player.hp();
        self.max_hp = player.max_hp();
        self.gold = player.gold;
        self.flash = player.flash();
        self.chain_count = player.chain_count;
        self.attack_multiplier = player.attack_multiplier();
        self.shield = player.statuses().shield_total();
        write_statuses(player.statuses(), &mut self.statuses);
        self.potions.clear();
        self.potions.extend(player.belt().iter().copied());
    }
}

impl Default for PlayerSnapshot {
    fn default() -> Self {
        Self {
            hp: 0,
            max_hp: 0,
            gold: 0,
            flash: 0.0,
            chain_count: 0,
            attack_multiplier: 1.0,
            shield: 0.0,
            statuses: Vec::new(),
            potions: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnemySnapshot {
    pub species: EnemySpecies,
    pub name: &'static str,
    pub level: u32,
    pub hp: u32,
    pub max_hp: u32,
    /// Telegraphed next action
    pub intent_name: &'static str,
    pub intent: ActionKind,
    /// 0.0 to 1.0 toward the next action
    pub timer_progress: f32,
    pub flash: f32,
    pub selected: bool,
    pub alive: bool,
    pub guarding: bool,
    pub stunned: bool,
    pub statuses: Vec<StatusSnapshot>,
}

impl EnemySnapshot {
    pub fn from_enemy(enemy: &Enemy, selected: bool) -> Self {
        let intent = enemy.intent();
        let mut statuses = Vec::new();
        write_statuses(enemy.statuses(), &mut statuses);
        Self {
            species: enemy.species(),
            name: enemy.name(),
            level: enemy.level(),
            hp: enemy.hp(),
            max_hp: enemy.max_hp(),
            intent_name: intent.name,
            intent: intent.kind,
            timer_progress: enemy.timer_progress(),
            flash: enemy.flash(),
            selected,
            alive: enemy.is_alive(),
            guarding: enemy.is_guarding(),
            stunned: enemy.is_stunned(),
            statuses,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BattleSnapshot {
    pub phase: BattlePhase,
    /// Seconds left on the countdown overlay
    pub countdown: f32,
    pub elapsed: f32,
    pub floor: u32,
    pub seed: u32,

    pub grid: ColorGrid,
    pub specials: Vec<(GridPos, SpecialKind)>,
    pub pair: ArrayVec<LiveCell, 2>,
    pub ghost: ArrayVec<LiveCell, 2>,
    pub next_queue: [PairSpec; NEXT_QUEUE_LEN],

    pub cascade_phase: CascadePhase,
    pub chain_level: u32,
    pub score: u64,
    pub best_chain: u32,

    pub player: PlayerSnapshot,
    pub enemies: Vec<EnemySnapshot>,

    pub numbers: Vec<DamageNumber>,
    pub particles: Vec<Particle>,
}

impl BattleSnapshot {
    pub fn clear(&mut self) {
        self.phase = BattlePhase::Countdown;
        self.countdown = 0.0;
        self.elapsed = 0.0;
        self.floor = 0;
        self.seed = 0;
        self.grid = [[CellColor::Empty; GRID_WIDTH as usize]; GRID_HEIGHT as usize];
        self.specials.clear();
        self.pair.clear();
        self.ghost.clear();
        self.next_queue = [PairSpec::plain(CellColor::Empty, CellColor::Empty); NEXT_QUEUE_LEN];
        self.cascade_phase = CascadePhase::Idle;
        self.chain_level = 0;
        self.score = 0;
        self.best_chain = 0;
        self.player = PlayerSnapshot::default();
        self.enemies.clear();
        self.numbers.clear();
        self.particles.clear();
    }

    /// True while the player can act on the board
    pub fn playable(&self) -> bool {
        self.phase == BattlePhase::Active
    }

    pub fn selected_enemy(&self) -> Option<&EnemySnapshot> {
        self.enemies.iter().find(|e| e.selected && e.alive)
    }
}

impl Default for BattleSnapshot {
    fn default() -> Self {
        let mut s = Self {
            phase: BattlePhase::Countdown,
            countdown: 0.0,
            elapsed: 0.0,
            floor: 0,
            seed: 0,
            grid: [[CellColor::Empty; GRID_WIDTH as usize]; GRID_HEIGHT as usize],
            specials: Vec::new(),
            pair: ArrayVec::new(),
            ghost: ArrayVec::new(),
            next_queue: [PairSpec::plain(CellColor::Empty, CellColor::Empty); NEXT_QUEUE_LEN],
            cascade_phase: CascadePhase::Idle,
            chain_level: 0,
            score: 0,
            best_chain: 0,
            player: PlayerSnapshot::default(),
            enemies: Vec::new(),
            numbers: Vec::new(),
            particles: Vec::new(),
        };
        s.clear();
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::{BattleConfig, BattleController};
    use crate::encounter::EnemyGroup;
    use crate::grid::Grid;
    use crate::types::StatusKind;

    fn battle() -> BattleController {
        BattleController::with_enemies(
            BattleConfig {
                countdown: false,
                ..BattleConfig::default()
            },
            Player::new(80),
            EnemyGroup::from_enemies([
                Enemy::with_stats(EnemySpecies::Goblin, 30, 5, 4.0),
                Enemy::with_stats(EnemySpecies::Orc, 50, 9, 6.0),
            ]),
        )
    }

    #[test]
    fn test_default_is_empty() {
        let s = BattleSnapshot::default();
        assert!(s.pair.is_empty());
        assert!(s.enemies.is_empty());
        assert!(s.grid.iter().flatten().all(|c| c.is_empty()));
        assert!(!s.playable());
    }

    #[test]
    fn test_snapshot_reflects_battle() {
        let mut b = battle().with_grid(Grid::from_rows(&["RB...."]));
        b.combat_mut()
            .player
            .statuses_mut()
            .apply(StatusKind::ShieldFlat, 15.0, 8.0);
        b.update(0.016);

        let s = b.snapshot();
        assert!(s.playable());
        assert_eq!(s.grid[11][0], CellColor::Red);
        assert_eq!(s.grid[11][1], CellColor::Blue);
        assert_eq!(s.pair.len(), 2);
        assert_eq!(s.ghost.len(), 2);
        assert_eq!(s.player.hp, 80);
        assert_eq!(s.player.shield, 15.0);
        assert_eq!(s.player.statuses.len(), 1);

        assert_eq!(s.enemies.len(), 2);
        assert_eq!(s.enemies[0].name, "Goblin");
        assert_eq!(s.enemies[0].intent_name, "Quick Stab");
        assert!(s.enemies[0].selected);
        assert!(!s.enemies[1].selected);
        assert_eq!(s.selected_enemy().map(|e| e.max_hp), Some(30));
    }

    #[test]
    fn test_snapshot_into_reuses_buffers() {
        let mut b = battle();
        let mut s = BattleSnapshot::default();
        b.snapshot_into(&mut s);
        b.apply_input(crate::types::InputEvent::SelectEnemyNext);
        b.snapshot_into(&mut s);
        assert_eq!(s.enemies.len(), 2);
        assert!(s.enemies[1].selected);
        assert_eq!(s, b.snapshot());
    }
}
