//! Cascade scheduler - multi-level clear/gravity sequencing
//!
//! A cascade starts when a pair locks. Each level finds every group, clears
//! the groups one at a time in row-major order with a `STEP_DELAY` pause
//! after each, runs gravity, pauses again and re-detects. The cascade ends
//! when a detection pass finds nothing.
//!
//! ```text
//! Idle → Recheck → Emitting → WaitingStepDelay → Emitting ... → Gravity
//!      → WaitingStepDelay → Recheck → (Emitting | Done) → Idle
//! ```
//!
//! The scheduler does not know about the battle. Cleared groups and fired
//! special cells are reported through a [`CascadeObserver`].

use arrayvec::ArrayVec;

use crate::error::CoreError;
use crate::grid::{Grid, GRID_SIZE};
use crate::groups::{find_groups, Group, MAX_GROUPS};
use crate::scoring::{group_score, level_score};
use crate::types::{CascadePhase, GridPos, SpecialKind, CASCADE_TIMEOUT, STEP_DELAY};

/// Receives cascade side effects as they happen
pub trait CascadeObserver {
    /// A group has been removed from the grid
    fn group_cleared(&mut self, _group: &Group, _chain_level: u32) {}

    /// A special cell was cleared and its effect must fire
    fn special_triggered(&mut self, kind: SpecialKind, pos: GridPos, chain_level: u32);
}

/// Observer that ignores every effect
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl CascadeObserver for NoopObserver {
    fn special_triggered(&mut self, _kind: SpecialKind, _pos: GridPos, _chain_level: u32) {}
}

/// Positions cleared during one cascade (deduplicated, in clear order)
pub type ClearedPositions = ArrayVec<GridPos, GRID_SIZE>;

#[derive(Debug, Clone)]
pub struct CascadeScheduler {
    phase: CascadePhase,
    /// Phase to enter once the current step delay runs out
    resume: CascadePhase,
    wait: f32,
    elapsed: f32,
    chain_level: u32,
    pending: ArrayVec<Group, MAX_GROUPS>,
    next_group: usize,
    /// Unmultiplied group scores of the level being cleared
    level_sum: u32,
    cascade_score: u32,
    cleared: ClearedPositions,
    last_chain_score: u32,
    last_chain_level: u32,
    last_positions: ClearedPositions,
    total_score: u64,
    best_chain: u32,
}

impl CascadeScheduler {
    pub fn new() -> Self {
        Self {
            phase: CascadePhase::Idle,
            resume: CascadePhase::Idle,
            wait: 0.0,
            elapsed: 0.0,
            chain_level: 0,
            pending: ArrayVec::new(),
            next_group: 0,
            level_sum: 0,
            cascade_score: 0,
            cleared: ArrayVec::new(),
            last_chain_score: 0,
            last_chain_level: 0,
            last_positions: ArrayVec::new(),
            total_score: 0,
            best_chain: 0,
        }
    }

    pub fn phase(&self) -> CascadePhase {
        self.phase
    }

    /// True while a cascade is in progress (neither Idle nor Done)
    pub fn is_running(&self) -> bool {
        !matches!(self.phase, CascadePhase::Idle | CascadePhase::Done)
    }

    /// Chain level of the wave currently being cleared (0 before the first)
    pub fn chain_level(&self) -> u32 {
        self.chain_level
    }

    /// Score accumulated so far by the running cascade
    pub fn current_score(&self) -> u32 {
        self.cascade_score
            .saturating_add(level_score(self.level_sum, self.chain_level))
    }

    /// Sim time spent in the running cascade
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Groups detected for the current level that have not cleared yet
    pub fn pending_groups(&self) -> &[Group] {
        self.pending.get(self.next_group..).unwrap_or(&[])
    }

    /// Begin a cascade: gravity runs once immediately, detection follows on the next update
    pub fn start(&mut self, grid: &mut Grid) {
        grid.apply_gravity();
        self.phase = CascadePhase::Recheck;
        self.resume = CascadePhase::Idle;
        self.wait = 0.0;
        self.elapsed = 0.0;
        self.chain_level = 0;
        self.pending.clear();
        self.next_group = 0;
        self.level_sum = 0;
        self.cascade_score = 0;
        self.cleared.clear();
    }

    /// Advance the cascade by `dt` seconds of animation time
    pub fn update(&mut self, dt: f32, grid: &mut Grid, observer: &mut impl CascadeObserver) {
        match self.phase {
            CascadePhase::Idle => return,
            CascadePhase::Done => {
                self.phase = CascadePhase::Idle;
                return;
            }
            _ => {}
        }

        self.elapsed += dt;
        if self.elapsed > CASCADE_TIMEOUT {
            log::warn!(
                "{}",
                CoreError::SchedulerTimeout {
                    elapsed: self.elapsed
                }
            );
            self.abort();
            return;
        }

        if self.phase == CascadePhase::WaitingStepDelay {
            self.wait -= dt;
            if self.wait > 0.0 {
                return;
            }
            self.phase = self.resume;
        }

        // Instant phases chain within one update until a delay is scheduled.
        loop {
            match self.phase {
                CascadePhase::Recheck => {
                    let groups = find_groups(grid);
                    if groups.is_empty() {
                        self.finish();
                        return;
                    }
                    self.chain_level += 1;
                    log::debug!(
                        "cascade level {}: {} group(s)",
                        self.chain_level,
                        groups.len()
                    );
                    self.pending = groups;
                    self.next_group = 0;
                    self.phase = CascadePhase::Emitting;
                }
                CascadePhase::Emitting => {
                    self.emit_next_group(grid, observer);
                    self.resume = if self.next_group < self.pending.len() {
                        CascadePhase::Emitting
                    } else {
                        CascadePhase::Gravity
                    };
                    self.delay();
                    return;
                }
                CascadePhase::Gravity => {
                    self.cascade_score = self
                        .cascade_score
                        .saturating_add(level_score(self.level_sum, self.chain_level));
                    self.level_sum = 0;
                    grid.apply_gravity();
                    self.pending.clear();
                    self.next_group = 0;
                    self.resume = CascadePhase::Recheck;
                    self.delay();
                    return;
                }
                CascadePhase::WaitingStepDelay | CascadePhase::Idle | CascadePhase::Done => return,
            }
        }
    }

    /// Step the cascade until it settles. Returns the number of chain levels.
    ///
    /// Convenience for hosts that do not animate (tests, benches, replays).
    pub fn run_to_end(&mut self, grid: &mut Grid, observer: &mut impl CascadeObserver) -> u32 {
        // Bound the loop by the safety valve.
        let max_steps = (CASCADE_TIMEOUT / STEP_DELAY) as usize + 2;
        for _ in 0..max_steps {
            if !self.is_running() {
                break;
            }
            self.update(STEP_DELAY, grid, observer);
        }
        self.last_chain_level
    }

    fn delay(&mut self) {
        self.wait = STEP_DELAY;
        self.phase = CascadePhase::WaitingStepDelay;
    }

    fn emit_next_group(&mut self, grid: &mut Grid, observer: &mut impl CascadeObserver) {
        let Some(group) = self.pending.get(self.next_group) else {
            return;
        };
        self.next_group += 1;

        let mut fired = ArrayVec::<(SpecialKind, GridPos), GRID_SIZE>::new();
        for &pos in &group.positions {
            if !self.cleared.contains(&pos) {
                self.cleared.push(pos);
            }
            if let Some(kind) = grid.clear_cell(pos.x, pos.y) {
                fired.push((kind, pos));
            }
        }

        self.level_sum = self
            .level_sum
            .saturating_add(group_score(group.size(), group.color));

        observer.group_cleared(group, self.chain_level);
        for (kind, pos) in fired {
            observer.special_triggered(kind, pos, self.chain_level);
        }
    }

    fn finish(&mut self) {
        if self.chain_level > 0 {
            self.last_chain_score = self.cascade_score;
            self.last_chain_level = self.chain_level;
            self.last_positions = std::mem::take(&mut self.cleared);
            self.total_score += u64::from(self.cascade_score);
            self.best_chain = self.best_chain.max(self.chain_level);
            log::debug!(
                "cascade finished: {} level(s), score {}",
                self.chain_level,
                self.cascade_score
            );
        }
        self.pending.clear();
        self.next_group = 0;
        self.phase = CascadePhase::Done;
    }

    /// Force the scheduler back to Idle, dropping queued work
    pub fn abort(&mut self) {
        self.phase = CascadePhase::Idle;
        self.resume = CascadePhase::Idle;
        self.wait = 0.0;
        self.elapsed = 0.0;
        self.pending.clear();
        self.next_group = 0;
        self.level_sum = 0;
        self.cascade_score = 0;
        self.cleared.clear();
    }

    /// Take the score of the most recent finished cascade (0 if already taken)
    pub fn drain_last_chain_score(&mut self) -> u32 {
        std::mem::take(&mut self.last_chain_score)
    }

    /// Take the union of positions cleared by the most recent finished cascade
    pub fn drain_last_positions(&mut self) -> ClearedPositions {
        std::mem::take(&mut self.last_positions)
    }

    /// Number of chain levels in the most recent finished cascade
    pub fn last_chain_level(&self) -> u32 {
        self.last_chain_level
    }

    /// Sum of every finished cascade's score
    pub fn total_score(&self) -> u64 {
        self.total_score
    }

    /// Longest chain seen so far
    pub fn best_chain(&self) -> u32 {
        self.best_chain
    }
}

impl Default for CascadeScheduler {
    fn default() -> Self {
        Self::new()
    }
}
