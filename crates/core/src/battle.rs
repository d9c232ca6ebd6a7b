//! Battle module - real-time combat around the puzzle board
//!
//! The controller is driven by a fixed-step `update(dt)` from the host and
//! never touches I/O. One tick after the countdown runs, in order:
//!
//! 1. player status timers (poison)
//! 2. the puzzle board and its cascade scheduler
//! 3. chain damage for a cascade that just finished
//! 4. every living enemy
//! 5. damage numbers and particles
//! 6. expired statuses are purged
//! 7. end conditions
//!
//! ```text
//! Countdown → Active → Victory
//!                 └──→ Defeat
//! ```

use crate::cascade::CascadeObserver;
use crate::effects::{Effects, NumberAnchor};
use crate::encounter::EnemyGroup;
use crate::enemy::{ActionKind, EnemyTick};
use crate::error::{CoreError, CoreResult};
use crate::grid::Grid;
use crate::groups::Group;
use crate::player::{Player, PotionEffect};
use crate::puzzle::PuzzleBoard;
use crate::rng::SimpleRng;
use crate::scoring::chain_base_damage;
use crate::snapshot::{BattleSnapshot, EnemySnapshot};
use crate::special::SpecialEffect;
use crate::types::{
    BattlePhase, ButtonState, DamageTint, GridPos, InputEvent, SpecialKind, StatusKind, COUNTDOWN,
    MAX_FRAME_DT, SPAWN_DELAY,
};

#[cfg(feature = "debug-commands")]
use crate::types::DebugCommand;

/// HP taken by the `Damage` debug command
#[cfg(feature = "debug-commands")]
const DEBUG_DAMAGE: u32 = 10;

/// Runtime knobs for one battle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BattleConfig {
    pub seed: u32,
    pub floor: u32,
    /// Run the pre-combat countdown
    pub countdown: bool,
    pub enable_hard_drop: bool,
    pub spawn_delay: f32,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            floor: 1,
            countdown: true,
            enable_hard_drop: true,
            spawn_delay: SPAWN_DELAY,
        }
    }
}

/// Clamp a host-supplied frame time into `[0, MAX_FRAME_DT]`
pub fn sanitize_dt(dt: f32) -> f32 {
    if !dt.is_finite() || dt < 0.0 {
        log::warn!("{}", CoreError::HostContractViolation { what: "dt", value: dt });
        return 0.0;
    }
    if dt > MAX_FRAME_DT {
        log::warn!("{}", CoreError::HostContractViolation { what: "dt", value: dt });
        return MAX_FRAME_DT;
    }
    dt
}

/// Player and enemies, plus the damage rules between them
#[derive(Debug, Clone)]
pub struct Combat {
    pub player: Player,
    pub enemies: EnemyGroup,
    /// Product of Multiplier specials fired during the running cascade
    cascade_factor: f32,
}

impl Combat {
    pub fn new(player: Player, enemies: EnemyGroup) -> Self {
        Self {
            player,
            enemies,
            cascade_factor: 1.0,
        }
    }

    pub fn cascade_factor(&self) -> f32 {
        self.cascade_factor
    }

    pub fn reset_cascade_factor(&mut self) {
        self.cascade_factor = 1.0;
    }

    /// Damage for a finished cascade worth `score` points
    pub fn chain_damage(&self, score: u32) -> u32 {
        let base = chain_base_damage(score) as f32;
        let damage = base
            * self.player.attack_multiplier()
            * self.player.chain_damage_multiplier
            * self.cascade_factor;
        (damage.floor() as u32).max(1)
    }

    /// Hit the selected enemy with a finished cascade. Returns HP removed.
    pub fn deliver_chain(&mut self, score: u32, effects: &mut Effects) -> u32 {
        let damage = self.chain_damage(score);
        self.cascade_factor = 1.0;

        self.enemies.snap_selection();
        if self.enemies.selected().is_none() {
            return 0;
        }
        let target = self.enemies.selected_index();
        let dealt = self.strike(target, damage, effects);
        log::debug!("chain of {} points deals {} to enemy {}", score, dealt, target);
        dealt
    }

    /// Mitigated hit on one enemy; selection moves on if it dies
    pub fn strike(&mut self, index: usize, damage: u32, effects: &mut Effects) -> u32 {
        let Some(enemy) = self.enemies.get_mut(index) else {
            return 0;
        };
        let dealt = enemy.take_damage(damage);
        effects.push_number(dealt, DamageTint::Outgoing, NumberAnchor::Enemy(index));
        self.enemies.snap_selection();
        dealt
    }

    /// Resolve a special cell cleared at `chain_level`
    pub fn apply_special(&mut self, kind: SpecialKind, chain_level: u32, effects: &mut Effects) {
        let effect = SpecialEffect::resolve(kind, chain_level, self.player.chain_damage_multiplier);
        match effect {
            SpecialEffect::HealPlayer(amount) => {
                let gained = self.player.heal(amount);
                effects.push_number(gained, DamageTint::Heal, NumberAnchor::Player);
            }
            SpecialEffect::StrikeAll(damage) => {
                for i in 0..self.enemies.len() {
                    if self.enemies.get(i).is_some_and(|e| e.is_alive()) {
                        self.strike(i, damage, effects);
                    }
                }
            }
            SpecialEffect::StrikeStrongest(damage) => {
                if let Some(i) = self.enemies.strongest_living() {
                    self.strike(i, damage, effects);
                }
            }
            SpecialEffect::Shield { amount, duration } => {
                self.player
                    .statuses_mut()
                    .apply(StatusKind::ShieldFlat, amount, duration);
            }
            SpecialEffect::AttackBuff { pct, duration } => {
                self.player
                    .statuses_mut()
                    .apply(StatusKind::AttackBuff, pct, duration);
                self.cascade_factor *= 1.0 + pct / 100.0;
            }
            SpecialEffect::PoisonAll { dps, duration } => {
                for enemy in self.enemies.iter_mut().filter(|e| e.is_alive()) {
                    enemy.statuses_mut().apply(StatusKind::Poison, dps, duration);
                }
            }
        }
        log::debug!("special {} fired at chain {}", kind.as_str(), chain_level);
    }

    /// Carry out the player-facing part of an enemy tick
    pub fn resolve_enemy_tick(&mut self, index: usize, tick: &EnemyTick, effects: &mut Effects) {
        effects.push_number(tick.poison, DamageTint::Outgoing, NumberAnchor::Enemy(index));
        let Some(action) = tick.action else {
            return;
        };
        match action.kind {
            ActionKind::Attack(raw) | ActionKind::Special(raw) => {
                let report = self.player.receive_hit(raw);
                effects.push_number(report.dealt, DamageTint::Incoming, NumberAnchor::Player);
                effects.push_number(report.healed, DamageTint::Heal, NumberAnchor::Player);

                if report.reflected > 0 {
                    if let Some(enemy) = self.enemies.get_mut(index) {
                        let lost = enemy.lose_hp(report.reflected);
                        effects.push_number(lost, DamageTint::Reflected, NumberAnchor::Enemy(index));
                    }
                    self.enemies.snap_selection();
                }
            }
            ActionKind::Heal(_) => {
                effects.push_number(tick.healed, DamageTint::Heal, NumberAnchor::Enemy(index));
            }
            ActionKind::DebuffPlayer { pct, duration } => {
                self.player
                    .statuses_mut()
                    .apply(StatusKind::AttackDebuff, pct, duration);
            }
            // Self-targeted parts were applied when the enemy emitted
            ActionKind::Guard | ActionKind::BuffSelf { .. } => {}
        }
    }
}

/// Routes cascade events into combat while the board is borrowed
struct BattleSink<'a> {
    combat: &'a mut Combat,
    effects: &'a mut Effects,
    rng: &'a mut SimpleRng,
}

impl CascadeObserver for BattleSink<'_> {
    fn group_cleared(&mut self, group: &Group, _chain_level: u32) {
        for &pos in group.positions.iter() {
            self.effects.burst(pos, group.color, self.rng);
        }
    }

    fn special_triggered(&mut self, kind: SpecialKind, _pos: GridPos, chain_level: u32) {
        self.combat.apply_special(kind, chain_level, self.effects);
    }
}

#[derive(Debug, Clone)]
pub struct BattleController {
    config: BattleConfig,
    phase: BattlePhase,
    phase_change: Option<BattlePhase>,
    countdown: f32,
    elapsed: f32,
    puzzle: PuzzleBoard,
    combat: Combat,
    effects: Effects,
    fx_rng: SimpleRng,
}

impl BattleController {
    /// Battle against the encounter generated for `config.floor`
    pub fn new(config: BattleConfig, player: Player) -> Self {
        let mut rng = SimpleRng::new(config.seed);
        let enemies = EnemyGroup::generate(config.floor, &mut rng);
        Self::with_enemies(config, player, enemies)
    }

    /// Battle against a fixed group of enemies
    pub fn with_enemies(config: BattleConfig, player: Player, enemies: EnemyGroup) -> Self {
        let mut puzzle = PuzzleBoard::new(config.seed, *player.special_rates());
        puzzle.set_hard_drop_enabled(config.enable_hard_drop);
        puzzle.set_spawn_delay(config.spawn_delay);

        let (phase, countdown) = if config.countdown {
            (BattlePhase::Countdown, COUNTDOWN)
        } else {
            (BattlePhase::Active, 0.0)
        };

        log::info!(
            "battle start: floor {}, {} enemies, seed {}",
            config.floor,
            enemies.len(),
            config.seed
        );

        Self {
            config,
            phase,
            phase_change: None,
            countdown,
            elapsed: 0.0,
            puzzle,
            combat: Combat::new(player, enemies),
            effects: Effects::new(),
            fx_rng: SimpleRng::new(config.seed.wrapping_add(1)),
        }
    }

    /// Replace the starting board
    pub fn with_grid(mut self, grid: Grid) -> Self {
        *self.puzzle.grid_mut() = grid;
        self
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    /// Seconds left on the countdown overlay
    pub fn countdown_remaining(&self) -> f32 {
        self.countdown
    }

    /// Active time since the countdown ended
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn puzzle(&self) -> &PuzzleBoard {
        &self.puzzle
    }

    pub fn puzzle_mut(&mut self) -> &mut PuzzleBoard {
        &mut self.puzzle
    }

    pub fn combat(&self) -> &Combat {
        &self.combat
    }

    pub fn combat_mut(&mut self) -> &mut Combat {
        &mut self.combat
    }

    pub fn player(&self) -> &Player {
        &self.combat.player
    }

    pub fn enemies(&self) -> &EnemyGroup {
        &self.combat.enemies
    }

    pub fn effects(&self) -> &Effects {
        &self.effects
    }

    pub fn snapshot_into(&self, out: &mut BattleSnapshot) {
        out.phase = self.phase;
        out.countdown = self.countdown;
        out.elapsed = self.elapsed;
        out.floor = self.config.floor;
        out.seed = self.config.seed;

        let grid = self.puzzle.grid();
        grid.write_color_grid(&mut out.grid);
        out.specials.clear();
        out.specials.extend(grid.specials());

        out.pair.clear();
        out.ghost.clear();
        if let Some(pair) = self.puzzle.pair() {
            out.pair = pair.cells();
            out.ghost = pair.ghost_cells(grid);
        }
        out.next_queue = *self.puzzle.next_queue();

        let scheduler = self.puzzle.scheduler();
        out.cascade_phase = scheduler.phase();
        out.chain_level = scheduler.chain_level();
        out.score = scheduler.total_score();
        out.best_chain = scheduler.best_chain();

        out.player.write_from(&self.combat.player);

        let selected = self.combat.enemies.selected_index();
        out.enemies.clear();
        out.enemies.extend(
            self.combat
                .enemies
                .iter()
                .enumerate()
                .map(|(i, e)| EnemySnapshot::from_enemy(e, i == selected)),
        );

        out.numbers.clear();
        out.numbers.extend_from_slice(self.effects.numbers());
        out.particles.clear();
        out.particles.extend_from_slice(self.effects.particles());
    }

    pub fn snapshot(&self) -> BattleSnapshot {
        let mut s = BattleSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    /// The phase entered since the last call, reported once
    pub fn take_phase_change(&mut self) -> Option<BattlePhase> {
        self.phase_change.take()
    }

    fn set_phase(&mut self, phase: BattlePhase) {
        if self.phase == phase {
            return;
        }
        self.phase = phase;
        self.phase_change = Some(phase);
        log::info!("battle {}", phase.as_str());
    }

    /// Advance the battle by `dt` seconds
    pub fn update(&mut self, dt: f32) {
        let dt = sanitize_dt(dt);

        match self.phase {
            BattlePhase::Victory | BattlePhase::Defeat => {
                self.effects.update(dt);
                self.combat.player.tick_flash(dt);
            }
            BattlePhase::Countdown => {
                self.countdown -= dt;
                self.effects.update(dt);
                if self.countdown <= 0.0 {
                    self.countdown = 0.0;
                    self.set_phase(BattlePhase::Active);
                }
            }
            BattlePhase::Active => self.tick_active(dt),
        }
    }

    fn tick_active(&mut self, dt: f32) {
        self.elapsed += dt;

        let poison = self.combat.player.statuses_mut().tick(dt);
        if poison > 0 {
            let lost = self.combat.player.lose_hp(poison);
            self.effects
                .push_number(lost, DamageTint::Incoming, NumberAnchor::Player);
        }

        {
            let mut sink = BattleSink {
                combat: &mut self.combat,
                effects: &mut self.effects,
                rng: &mut self.fx_rng,
            };
            self.puzzle.update(dt, &mut sink);
        }

        let scheduler = self.puzzle.scheduler_mut();
        let score = scheduler.drain_last_chain_score();
        let cleared = scheduler.drain_last_positions().len();
        let running = scheduler.is_running();
        let chain_level = scheduler.chain_level();
        self.combat.player.chain_count = if running { chain_level } else { 0 };
        if score > 0 {
            log::debug!("cascade finished: {} points from {} cells", score, cleared);
            self.combat.deliver_chain(score, &mut self.effects);
        } else if !running {
            self.combat.reset_cascade_factor();
        }

        for i in 0..self.combat.enemies.len() {
            let Some(enemy) = self.combat.enemies.get_mut(i) else {
                continue;
            };
            if !enemy.is_alive() {
                continue;
            }
            let tick = enemy.update(dt);
            self.combat.resolve_enemy_tick(i, &tick, &mut self.effects);
        }
        self.combat.enemies.snap_selection();

        self.effects.update(dt);
        self.combat.player.tick_flash(dt);

        self.combat.player.statuses_mut().purge_expired();
        for enemy in self.combat.enemies.iter_mut() {
            enemy.statuses_mut().purge_expired();
        }

        if self.combat.enemies.all_dead() {
            self.set_phase(BattlePhase::Victory);
        } else if !self.combat.player.is_alive() || self.puzzle.is_topped_out() {
            self.set_phase(BattlePhase::Defeat);
        }
    }

    /// Apply one host input; returns true if it changed anything
    pub fn apply_input(&mut self, event: InputEvent) -> bool {
        if self.phase.is_terminal() {
            return false;
        }
        let active = self.phase == BattlePhase::Active;

        match event {
            InputEvent::SelectEnemyNext => self.combat.enemies.select_next(),
            InputEvent::SelectEnemyPrev => self.combat.enemies.select_prev(),
            InputEvent::SelectEnemyAt { x, y } => self.combat.enemies.select_at(x, y),
            InputEvent::FastFall(state) => {
                self.puzzle.set_fast_fall(state == ButtonState::Pressed);
                true
            }
            InputEvent::UsePotion(slot) => match self.use_potion(slot) {
                Ok(()) => true,
                Err(e) => {
                    log::warn!("potion rejected: {}", e);
                    false
                }
            },
            InputEvent::Debug(cmd) => self.run_debug(cmd),
            _ if !active => false,
            InputEvent::MoveLeft => self.puzzle.move_left(),
            InputEvent::MoveRight => self.puzzle.move_right(),
            InputEvent::RotateCw => self.puzzle.rotate(true),
            InputEvent::RotateCcw => self.puzzle.rotate(false),
            InputEvent::HardDrop => self.puzzle.hard_drop(),
        }
    }

    /// Drink the potion in `slot`
    pub fn use_potion(&mut self, slot: usize) -> CoreResult<()> {
        if self.phase != BattlePhase::Active {
            return Err(CoreError::WrongPhase {
                phase: self.phase.as_str(),
            });
        }
        let potion = *self
            .combat
            .player
            .belt()
            .get(slot)
            .ok_or(CoreError::InvalidPotionSlot { slot })?;
        let effect = potion.effect();
        if matches!(effect, PotionEffect::DamageTarget(_)) && self.combat.enemies.selected().is_none()
        {
            return Err(CoreError::NoLivingEnemy);
        }
        self.combat.player.belt_mut().take(slot);

        match effect {
            PotionEffect::Heal(amount) => {
                let gained = self.combat.player.heal(amount);
                self.effects
                    .push_number(gained, DamageTint::Heal, NumberAnchor::Player);
            }
            PotionEffect::Buff {
                status,
                magnitude,
                duration,
            } => self
                .combat
                .player
                .statuses_mut()
                .apply(status, magnitude, duration),
            PotionEffect::StunEnemies(secs) => {
                for enemy in self.combat.enemies.iter_mut().filter(|e| e.is_alive()) {
                    enemy.statuses_mut().apply(StatusKind::Stun, 0.0, secs);
                }
            }
            PotionEffect::PoisonEnemies { dps, duration } => {
                for enemy in self.combat.enemies.iter_mut().filter(|e| e.is_alive()) {
                    enemy.statuses_mut().apply(StatusKind::Poison, dps, duration);
                }
            }
            PotionEffect::DamageTarget(damage) => {
                let target = self.combat.enemies.selected_index();
                self.combat.strike(target, damage, &mut self.effects);
            }
        }

        log::info!("potion used: {:?} ({:?})", potion.kind, potion.rarity);
        Ok(())
    }

    #[cfg(feature = "debug-commands")]
    fn run_debug(&mut self, cmd: DebugCommand) -> bool {
        match cmd {
            DebugCommand::Kill => {
                let target = self.combat.enemies.selected_index();
                let Some(enemy) = self.combat.enemies.selected_mut() else {
                    return false;
                };
                let hp = enemy.hp();
                let lost = enemy.lose_hp(hp);
                self.effects
                    .push_number(lost, DamageTint::Outgoing, NumberAnchor::Enemy(target));
                self.combat.enemies.snap_selection();
            }
            DebugCommand::Heal => {
                let max = self.combat.player.max_hp();
                self.combat.player.heal(max);
            }
            DebugCommand::Damage => {
                let lost = self.combat.player.lose_hp(DEBUG_DAMAGE);
                self.effects
                    .push_number(lost, DamageTint::Incoming, NumberAnchor::Player);
            }
        }
        log::info!("debug command {:?}", cmd);
        true
    }

    #[cfg(not(feature = "debug-commands"))]
    fn run_debug(&mut self, cmd: crate::types::DebugCommand) -> bool {
        log::warn!("debug command {:?} ignored: built without debug-commands", cmd);
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enemy::{Enemy, EnemyAction};
    use crate::player::Potion;
    use crate::types::{EnemySpecies, PotionKind, Rarity};

    fn quiet_config() -> BattleConfig {
        BattleConfig {
            countdown: false,
            ..BattleConfig::default()
        }
    }

    fn dummy(hp: u32) -> Enemy {
        Enemy::with_stats(EnemySpecies::Slime, hp, 5, 1000.0)
    }

    fn battle_vs(enemies: impl IntoIterator<Item = Enemy>) -> BattleController {
        BattleController::with_enemies(
            quiet_config(),
            Player::default(),
            EnemyGroup::from_enemies(enemies),
        )
    }

    #[test]
    fn test_sanitize_dt() {
        assert_eq!(sanitize_dt(0.016), 0.016);
        assert_eq!(sanitize_dt(-1.0), 0.0);
        assert_eq!(sanitize_dt(f32::NAN), 0.0);
        assert_eq!(sanitize_dt(f32::INFINITY), 0.0);
        assert_eq!(sanitize_dt(5.0), MAX_FRAME_DT);
    }

    #[test]
    fn test_countdown_pauses_board() {
        let mut battle = BattleController::with_enemies(
            BattleConfig::default(),
            Player::default(),
            EnemyGroup::from_enemies([dummy(30)]),
        );
        assert_eq!(battle.phase(), BattlePhase::Countdown);

        // Oversized frames are clamped, so this only eats 0.25 s
        battle.update(10.0);
        assert!((battle.countdown_remaining() - (COUNTDOWN - MAX_FRAME_DT)).abs() < 1e-5);
        assert!(battle.puzzle().pair().is_none());
        assert!(!battle.apply_input(InputEvent::MoveLeft));

        for _ in 0..12 {
            battle.update(0.25);
        }
        assert_eq!(battle.phase(), BattlePhase::Active);
        assert_eq!(battle.take_phase_change(), Some(BattlePhase::Active));
        assert_eq!(battle.take_phase_change(), None);

        battle.update(0.25);
        battle.update(0.25);
        assert!(battle.puzzle().pair().is_some());
    }

    #[test]
    fn test_chain_damage_formula() {
        let mut combat = Combat::new(Player::default(), EnemyGroup::from_enemies([dummy(100)]));
        let mut fx = Effects::new();

        assert_eq!(combat.chain_damage(5), 1);
        assert_eq!(combat.deliver_chain(112, &mut fx), 11);
        assert_eq!(combat.enemies.get(0).unwrap().hp(), 89);
        assert_eq!(fx.numbers().len(), 1);
        assert_eq!(fx.numbers()[0].tint, DamageTint::Outgoing);
    }

    #[test]
    fn test_multiplier_specials_compound() {
        let mut combat = Combat::new(Player::default(), EnemyGroup::from_enemies([dummy(200)]));
        let mut fx = Effects::new();

        combat.apply_special(SpecialKind::Multiplier, 1, &mut fx);
        combat.apply_special(SpecialKind::Multiplier, 2, &mut fx);
        assert!((combat.cascade_factor() - 2.25).abs() < 1e-6);
        assert!(combat.player.statuses().has(StatusKind::AttackBuff));

        // 10 base x 1.5 buff x 2.25 cascade
        assert_eq!(combat.deliver_chain(100, &mut fx), 33);
        assert_eq!(combat.cascade_factor(), 1.0);
    }

    #[test]
    fn test_heal_special_on_wounded_player() {
        let mut player = Player::new(50);
        player.set_hp(10);
        let mut combat = Combat::new(player, EnemyGroup::from_enemies([dummy(30)]));
        let mut fx = Effects::new();

        combat.apply_special(SpecialKind::Heal, 1, &mut fx);
        assert_eq!(combat.player.hp(), 20);
        assert_eq!(fx.numbers()[0].tint, DamageTint::Heal);
    }

    #[test]
    fn test_bomb_hits_every_enemy() {
        let mut combat = Combat::new(
            Player::default(),
            EnemyGroup::from_enemies([dummy(30), dummy(45)]),
        );
        let mut fx = Effects::new();

        combat.apply_special(SpecialKind::Bomb, 1, &mut fx);
        assert_eq!(combat.enemies.get(0).unwrap().hp(), 0);
        assert_eq!(combat.enemies.get(1).unwrap().hp(), 5);
        assert_eq!(combat.enemies.selected_index(), 1);
    }

    #[test]
    fn test_lightning_and_poison_specials() {
        let mut combat = Combat::new(
            Player::default(),
            EnemyGroup::from_enemies([dummy(30), dummy(90)]),
        );
        let mut fx = Effects::new();

        combat.apply_special(SpecialKind::Lightning, 1, &mut fx);
        assert_eq!(combat.enemies.get(0).unwrap().hp(), 30);
        assert_eq!(combat.enemies.get(1).unwrap().hp(), 50);

        combat.apply_special(SpecialKind::Poison, 1, &mut fx);
        assert!(combat
            .enemies
            .iter()
            .all(|e| e.statuses().has(StatusKind::Poison)));

        combat.apply_special(SpecialKind::Shield, 1, &mut fx);
        assert!(combat.player.statuses().has(StatusKind::ShieldFlat));
    }

    #[test]
    fn test_full_reflect_bounces_attack() {
        let mut combat = Combat::new(Player::new(50), EnemyGroup::from_enemies([dummy(40)]));
        combat
            .player
            .statuses_mut()
            .apply(StatusKind::Reflect, 100.0, 8.0);
        let mut fx = Effects::new();

        let tick = EnemyTick {
            action: Some(EnemyAction {
                name: "Basic Attack",
                kind: ActionKind::Attack(20),
            }),
            ..EnemyTick::default()
        };
        combat.resolve_enemy_tick(0, &tick, &mut fx);

        assert_eq!(combat.player.hp(), 50);
        assert_eq!(combat.enemies.get(0).unwrap().hp(), 20);
        assert!(fx
            .numbers()
            .iter()
            .any(|n| n.tint == DamageTint::Reflected && n.value == 20));
    }

    #[test]
    fn test_enemy_heal_number_shows_hp_gained() {
        let mut combat = Combat::new(Player::default(), EnemyGroup::from_enemies([dummy(40)]));
        let mut fx = Effects::new();
        let tick = EnemyTick {
            action: Some(EnemyAction {
                name: "Regenerate",
                kind: ActionKind::Heal(20),
            }),
            healed: 3,
            ..EnemyTick::default()
        };
        combat.resolve_enemy_tick(0, &tick, &mut fx);

        let heals: Vec<_> = fx
            .numbers()
            .iter()
            .filter(|n| n.tint == DamageTint::Heal)
            .map(|n| n.value)
            .collect();
        assert_eq!(heals, vec![3]);
    }

    #[test]
    fn test_enemy_attack_lands_on_player() {
        let mut battle = battle_vs([Enemy::with_stats(EnemySpecies::Slime, 30, 10, 1.0)]);
        for _ in 0..70 {
            battle.update(1.0 / 60.0);
        }
        assert_eq!(battle.player().hp(), 90);
        assert!(battle.player().flash() > 0.0);
    }

    #[test]
    fn test_victory_is_reported_once() {
        let mut battle = battle_vs([dummy(30)]);
        battle.update(0.016);
        battle.combat_mut().enemies.get_mut(0).unwrap().lose_hp(30);

        battle.update(0.016);
        assert_eq!(battle.phase(), BattlePhase::Victory);
        assert_eq!(battle.take_phase_change(), Some(BattlePhase::Victory));

        battle.update(0.016);
        assert_eq!(battle.take_phase_change(), None);
        assert!(!battle.apply_input(InputEvent::MoveLeft));
        assert!(!battle.apply_input(InputEvent::SelectEnemyNext));
    }

    #[test]
    fn test_player_death_is_defeat() {
        let mut battle = battle_vs([dummy(30)]);
        battle.combat_mut().player.set_hp(0);
        battle.update(0.016);
        assert_eq!(battle.phase(), BattlePhase::Defeat);
        assert_eq!(battle.take_phase_change(), Some(BattlePhase::Defeat));
    }

    #[test]
    fn test_potion_rules() {
        let mut battle = BattleController::with_enemies(
            BattleConfig::default(),
            Player::new(100),
            EnemyGroup::from_enemies([dummy(100)]),
        );
        battle.combat_mut().player.set_hp(40);
        battle
            .combat_mut()
            .player
            .belt_mut()
            .add(Potion::new(PotionKind::Health, Rarity::Common));
        battle
            .combat_mut()
            .player
            .belt_mut()
            .add(Potion::new(PotionKind::Explosive, Rarity::Epic));

        assert_eq!(
            battle.use_potion(0),
            Err(CoreError::WrongPhase { phase: "countdown" })
        );

        for _ in 0..13 {
            battle.update(0.25);
        }
        assert_eq!(battle.phase(), BattlePhase::Active);
        assert_eq!(battle.use_potion(5), Err(CoreError::InvalidPotionSlot { slot: 5 }));

        assert!(battle.apply_input(InputEvent::UsePotion(0)));
        assert_eq!(battle.player().hp(), 70);
        assert_eq!(battle.player().belt().len(), 1);

        // Explosive shifted into slot 0: 40 x 2.0
        assert_eq!(battle.use_potion(0), Ok(()));
        assert_eq!(battle.enemies().get(0).unwrap().hp(), 20);
        assert!(battle.player().belt().is_empty());
    }

    #[test]
    fn test_freeze_potion_stuns_enemies() {
        let mut battle = battle_vs([dummy(30), dummy(30)]);
        battle
            .combat_mut()
            .player
            .belt_mut()
            .add(Potion::new(PotionKind::FreezeTime, Rarity::Common));
        battle.use_potion(0).unwrap();
        assert!(battle.enemies().iter().all(|e| e.is_stunned()));
    }

    #[test]
    fn test_selection_input() {
        let mut battle = battle_vs([dummy(30), dummy(30), dummy(30)]);
        assert!(battle.apply_input(InputEvent::SelectEnemyNext));
        assert_eq!(battle.enemies().selected_index(), 1);
        assert!(battle.apply_input(InputEvent::SelectEnemyPrev));
        assert_eq!(battle.enemies().selected_index(), 0);
        assert!(battle.apply_input(InputEvent::SelectEnemyAt { x: 30, y: 1 }));
        assert_eq!(battle.enemies().selected_index(), 2);
    }

    #[cfg(feature = "debug-commands")]
    #[test]
    fn test_debug_commands() {
        let mut battle = battle_vs([dummy(30), dummy(30)]);
        assert!(battle.apply_input(InputEvent::Debug(DebugCommand::Damage)));
        assert_eq!(battle.player().hp(), 90);
        assert!(battle.apply_input(InputEvent::Debug(DebugCommand::Heal)));
        assert_eq!(battle.player().hp(), 100);
        assert!(battle.apply_input(InputEvent::Debug(DebugCommand::Kill)));
        assert!(!battle.enemies().get(0).unwrap().is_alive());
        assert_eq!(battle.enemies().selected_index(), 1);
    }
}
