//! Puzzle board - owns the grid, the active pair and the cascade scheduler
//!
//! The board alternates between a pair falling and a cascade resolving:
//!
//! ```text
//! SpawnDelay → PairActive → CascadeRunning → SpawnDelay → ...
//!                  └───────────────────────────────→ ToppedOut (spawn blocked)
//! ```
//!
//! A new pair never spawns while a cascade is running.

use crate::cascade::{CascadeObserver, CascadeScheduler};
use crate::error::{CoreError, CoreResult};
use crate::grid::Grid;
use crate::pair::{ActivePair, PairStep};
use crate::piece_source::{PairSpec, PieceSource};
use crate::special::SpecialRates;
use crate::types::{NEXT_QUEUE_LEN, SPAWN_DELAY, SPAWN_X};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PuzzlePhase {
    #[default]
    SpawnDelay,
    PairActive,
    CascadeRunning,
    ToppedOut,
}

#[derive(Debug, Clone)]
pub struct PuzzleBoard {
    grid: Grid,
    pair: Option<ActivePair>,
    source: PieceSource,
    scheduler: CascadeScheduler,
    phase: PuzzlePhase,
    spawn_timer: f32,
    spawn_delay: f32,
    fast_fall: bool,
    hard_drop_enabled: bool,
    pairs_locked: u32,
}

impl PuzzleBoard {
    /// Empty board; the first pair spawns on the first update
    pub fn new(seed: u32, rates: SpecialRates) -> Self {
        Self::with_grid(Grid::new(), seed, rates)
    }

    /// Board starting from a prepared grid
    pub fn with_grid(grid: Grid, seed: u32, rates: SpecialRates) -> Self {
        Self {
            grid,
            pair: None,
            source: PieceSource::new(seed, rates),
            scheduler: CascadeScheduler::new(),
            phase: PuzzlePhase::SpawnDelay,
            spawn_timer: 0.0,
            spawn_delay: SPAWN_DELAY,
            fast_fall: false,
            hard_drop_enabled: true,
            pairs_locked: 0,
        }
    }

    pub fn set_hard_drop_enabled(&mut self, enabled: bool) {
        self.hard_drop_enabled = enabled;
    }

    /// Pause between a settled board and the next spawn
    pub fn set_spawn_delay(&mut self, secs: f32) {
        self.spawn_delay = secs.max(0.0);
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn pair(&self) -> Option<&ActivePair> {
        self.pair.as_ref()
    }

    pub fn scheduler(&self) -> &CascadeScheduler {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut CascadeScheduler {
        &mut self.scheduler
    }

    pub fn phase(&self) -> PuzzlePhase {
        self.phase
    }

    pub fn is_topped_out(&self) -> bool {
        self.phase == PuzzlePhase::ToppedOut
    }

    pub fn next_queue(&self) -> &[PairSpec; NEXT_QUEUE_LEN] {
        self.source.peek()
    }

    pub fn set_special_rates(&mut self, rates: SpecialRates) {
        self.source.set_rates(rates);
    }

    pub fn pairs_locked(&self) -> u32 {
        self.pairs_locked
    }

    /// Seconds until the next spawn (0 unless waiting)
    pub fn spawn_timer(&self) -> f32 {
        self.spawn_timer
    }

    /// Bring the next pair into play
    ///
    /// Fails with `FullColumn` and tops the board out when the spawn cells
    /// are occupied.
    pub fn spawn_pair(&mut self) -> CoreResult<()> {
        if self.grid.is_spawn_blocked() {
            self.phase = PuzzlePhase::ToppedOut;
            self.pair = None;
            return Err(CoreError::FullColumn { column: SPAWN_X });
        }
        let mut pair = ActivePair::spawn(self.source.next_pair());
        pair.set_fast_fall(self.fast_fall);
        self.pair = Some(pair);
        self.phase = PuzzlePhase::PairActive;
        Ok(())
    }

    /// Advance the board by `dt` seconds
    pub fn update(&mut self, dt: f32, observer: &mut impl CascadeObserver) {
        match self.phase {
            PuzzlePhase::ToppedOut => {}
            PuzzlePhase::SpawnDelay => {
                self.spawn_timer -= dt;
                if self.spawn_timer <= 0.0 {
                    self.spawn_timer = 0.0;
                    if let Err(e) = self.spawn_pair() {
                        log::info!("{}", e);
                    }
                }
            }
            PuzzlePhase::PairActive => {
                let Some(pair) = self.pair.as_mut() else {
                    self.phase = PuzzlePhase::SpawnDelay;
                    return;
                };
                if pair.update(dt, &mut self.grid) == PairStep::Locked {
                    self.begin_cascade();
                }
            }
            PuzzlePhase::CascadeRunning => {
                self.scheduler.update(dt, &mut self.grid, observer);
                if !self.scheduler.is_running() {
                    self.phase = PuzzlePhase::SpawnDelay;
                    self.spawn_timer = self.spawn_delay;
                }
            }
        }
    }

    fn begin_cascade(&mut self) {
        self.pair = None;
        self.pairs_locked += 1;
        self.scheduler.start(&mut self.grid);
        self.phase = PuzzlePhase::CascadeRunning;
    }

    pub fn move_left(&mut self) -> bool {
        self.shift(-1)
    }

    pub fn move_right(&mut self) -> bool {
        self.shift(1)
    }

    fn shift(&mut self, dir: i8) -> bool {
        match self.pair.as_mut() {
            Some(pair) => pair.try_move(&self.grid, dir),
            None => false,
        }
    }

    pub fn rotate(&mut self, clockwise: bool) -> bool {
        match self.pair.as_mut() {
            Some(pair) => pair.try_rotate(&self.grid, clockwise),
            None => false,
        }
    }

    /// Fast-fall is latched on the board so it carries over to the next pair
    pub fn set_fast_fall(&mut self, held: bool) {
        self.fast_fall = held;
        if let Some(pair) = self.pair.as_mut() {
            pair.set_fast_fall(held);
        }
    }

    pub fn hard_drop(&mut self) -> bool {
        if !self.hard_drop_enabled {
            return false;
        }
        let Some(pair) = self.pair.as_mut() else {
            return false;
        };
        pair.hard_drop(&mut self.grid);
        self.begin_cascade();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cascade::NoopObserver;
    use crate::types::{CascadePhase, CellColor};

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_first_update_spawns() {
        let mut board = PuzzleBoard::new(1, SpecialRates::new());
        assert!(board.pair().is_none());
        board.update(DT, &mut NoopObserver);
        assert_eq!(board.phase(), PuzzlePhase::PairActive);
        assert!(board.pair().is_some());
    }

    #[test]
    fn test_spawn_blocked_tops_out() {
        let mut grid = Grid::new();
        grid.place(SPAWN_X, 1, CellColor::Garbage);
        let mut board = PuzzleBoard::with_grid(grid, 1, SpecialRates::new());

        let err = board.spawn_pair().unwrap_err();
        assert_eq!(err, CoreError::FullColumn { column: 3 });
        assert!(board.is_topped_out());

        board.update(DT, &mut NoopObserver);
        assert!(board.is_topped_out());
    }

    #[test]
    fn test_hard_drop_starts_cascade_then_waits() {
        let mut board = PuzzleBoard::new(1, SpecialRates::new());
        board.update(DT, &mut NoopObserver);
        assert!(board.hard_drop());
        assert_eq!(board.phase(), PuzzlePhase::CascadeRunning);
        assert_eq!(board.grid().occupied_count(), 2);
        assert_eq!(board.pairs_locked(), 1);

        // No groups: the cascade finishes on the next update.
        board.update(DT, &mut NoopObserver);
        assert_eq!(board.phase(), PuzzlePhase::SpawnDelay);
        assert_eq!(board.scheduler().phase(), CascadePhase::Done);

        let mut waited = 0.0;
        while board.phase() == PuzzlePhase::SpawnDelay {
            board.update(DT, &mut NoopObserver);
            waited += DT;
        }
        assert!(waited >= SPAWN_DELAY - DT);
        assert_eq!(board.phase(), PuzzlePhase::PairActive);
    }

    #[test]
    fn test_hard_drop_can_be_disabled() {
        let mut board = PuzzleBoard::new(1, SpecialRates::new());
        board.set_hard_drop_enabled(false);
        board.update(DT, &mut NoopObserver);
        assert!(!board.hard_drop());
        assert_eq!(board.phase(), PuzzlePhase::PairActive);
    }

    #[test]
    fn test_fast_fall_latches_across_pairs() {
        let mut board = PuzzleBoard::new(1, SpecialRates::new());
        board.set_fast_fall(true);
        board.update(DT, &mut NoopObserver);
        assert!(board.pair().is_some_and(|p| p.is_fast_falling()));
    }

    #[test]
    fn test_input_without_pair_is_ignored() {
        let mut board = PuzzleBoard::new(1, SpecialRates::new());
        assert!(!board.move_left());
        assert!(!board.rotate(true));
        assert!(!board.hard_drop());
    }
}
