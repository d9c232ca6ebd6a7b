//! Pair module - the falling two-cell piece
//!
//! The main cell's position is kept as a fractional `(x, y)`; grid cells are
//! derived by rounding with [`PLACEMENT_EPSILON`] added first. The sub cell
//! sits at `main + rotation.sub_offset()`.
//!
//! Lifecycle of one pair:
//!
//! ```text
//! spawn → falling ⇄ grounded (lock delay) → lock
//!                                             ├─ both supported: write both
//!                                             └─ one supported: write it, the
//!                                                other falls alone and is
//!                                                written when it lands
//! ```
//!
//! Rotation tries the in-place position first, then a small kick table.

use arrayvec::ArrayVec;

use crate::grid::Grid;
use crate::piece_source::PairSpec;
use crate::types::{
    CellColor, GridPos, Rotation, SpecialKind, AUTO_LOCK, FALL_STEP, FAST_FALL_STEP,
    GRID_HEIGHT, GRID_WIDTH, LOCK_GRACE, MAX_MOVE_RESETS, PAIR_FALL_SPEED, PAIR_FAST_FALL_SPEED,
    PLACEMENT_EPSILON, POST_SEP_WINDOW, SPAWN_X, SPAWN_Y,
};

/// Kick candidates per rotation transition, in-place first
pub type KickTable = [[(i8, i8); 4]; 8];

/// Indexed by [`kick_index`]
pub const PAIR_KICKS: KickTable = [
    // 0->1 (Up->Right, clockwise)
    [(0, 0), (-1, 0), (0, -1), (-1, -1)],
    // 0->3 (Up->Left, counter-clockwise)
    [(0, 0), (1, 0), (0, -1), (1, -1)],
    // 1->0 (Right->Up, counter-clockwise)
    [(0, 0), (0, -1), (-1, 0), (-1, -1)],
    // 1->2 (Right->Down, clockwise)
    [(0, 0), (0, -1), (-1, 0), (-1, -1)],
    // 2->1 (Down->Right, counter-clockwise)
    [(0, 0), (-1, 0), (0, -1), (-1, -1)],
    // 2->3 (Down->Left, clockwise)
    [(0, 0), (1, 0), (0, -1), (1, -1)],
    // 3->2 (Left->Down, counter-clockwise)
    [(0, 0), (0, -1), (1, 0), (1, -1)],
    // 3->0 (Left->Up, clockwise)
    [(0, 0), (0, -1), (1, 0), (1, -1)],
];

/// Index into [`PAIR_KICKS`] for a rotation transition
pub fn kick_index(from: Rotation, clockwise: bool) -> usize {
    match (from, clockwise) {
        (Rotation::Up, true) => 0,
        (Rotation::Up, false) => 1,
        (Rotation::Right, false) => 2,
        (Rotation::Right, true) => 3,
        (Rotation::Down, false) => 4,
        (Rotation::Down, true) => 5,
        (Rotation::Left, false) => 6,
        (Rotation::Left, true) => 7,
    }
}

/// Kick candidates (excluding the in-place try) for a transition
pub fn kicks_for(from: Rotation, clockwise: bool) -> &'static [(i8, i8)] {
    &PAIR_KICKS[kick_index(from, clockwise)][1..]
}

/// Round a fractional coordinate to its cell
#[inline]
pub fn snap(v: f64) -> i8 {
    (v + PLACEMENT_EPSILON).round() as i8
}

/// Single-cell placement rule: in-bounds column, rows above the grid always
/// pass, rows inside must be Empty
#[inline]
fn cell_fits(grid: &Grid, x: i8, y: i8) -> bool {
    if x < 0 || x >= GRID_WIDTH as i8 || y >= GRID_HEIGHT as i8 {
        return false;
    }
    y < 0 || grid.can_place(x, y)
}

/// Placement test for an unseparated pair centered at (x, y)
pub fn can_place_at(grid: &Grid, x: f64, y: f64, rotation: Rotation) -> bool {
    let (mx, my) = (snap(x), snap(y));
    let (ox, oy) = rotation.sub_offset();
    cell_fits(grid, mx, my) && cell_fits(grid, mx + ox, my + oy)
}

fn is_supported(grid: &Grid, pos: GridPos) -> bool {
    pos.y >= GRID_HEIGHT as i8 - 1 || grid.is_occupied(pos.x, pos.y + 1)
}

/// Which half of the pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairCell {
    Main,
    Sub,
}

/// Outcome of one pair update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairStep {
    Falling,
    /// One cell was written; the other keeps falling alone
    Separated,
    /// Every cell has been written (cells above the grid are dropped)
    Locked,
}

/// A live cell of the pair, for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiveCell {
    pub pos: GridPos,
    pub color: CellColor,
    pub special: Option<SpecialKind>,
    pub role: PairCell,
}

#[derive(Debug, Clone)]
pub struct ActivePair {
    spec: PairSpec,
    /// Main cell position, or the lone cell's position after separation
    x: f64,
    y: f64,
    rotation: Rotation,
    fall_speed: f64,
    fast_fall_speed: f64,
    fast_fall: bool,
    grounded: bool,
    grounded_timer: f32,
    no_input_timer: f32,
    move_reset_count: u8,
    main_fixed: bool,
    sub_fixed: bool,
    separated: bool,
    separation_timer: f32,
}

impl ActivePair {
    /// New pair at the spawn point, sub above main
    pub fn spawn(spec: PairSpec) -> Self {
        Self::at(spec, SPAWN_X, SPAWN_Y as f64, Rotation::Up)
    }

    /// New pair with its main cell at an explicit position
    pub fn at(spec: PairSpec, x: i8, y: f64, rotation: Rotation) -> Self {
        Self {
            spec,
            x: x as f64,
            y,
            rotation,
            fall_speed: PAIR_FALL_SPEED as f64,
            fast_fall_speed: PAIR_FAST_FALL_SPEED as f64,
            fast_fall: false,
            grounded: false,
            grounded_timer: 0.0,
            no_input_timer: 0.0,
            move_reset_count: 0,
            main_fixed: false,
            sub_fixed: false,
            separated: false,
            separation_timer: 0.0,
        }
    }

    pub fn spec(&self) -> &PairSpec {
        &self.spec
    }

    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn is_separated(&self) -> bool {
        self.separated
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    pub fn grounded_timer(&self) -> f32 {
        self.grounded_timer
    }

    pub fn no_input_timer(&self) -> f32 {
        self.no_input_timer
    }

    pub fn move_reset_count(&self) -> u8 {
        self.move_reset_count
    }

    /// Seconds of horizontal control left for the lone cell
    pub fn separation_window(&self) -> f32 {
        self.separation_timer
    }

    pub fn is_fast_falling(&self) -> bool {
        self.fast_fall
    }

    pub fn set_fast_fall(&mut self, held: bool) {
        self.fast_fall = held;
    }

    /// Snapped main cell position (the lone cell after separation)
    pub fn main_pos(&self) -> GridPos {
        GridPos::new(snap(self.x), snap(self.y))
    }

    /// Snapped sub cell position; None once separated
    pub fn sub_pos(&self) -> Option<GridPos> {
        if self.separated {
            return None;
        }
        let (ox, oy) = self.rotation.sub_offset();
        let m = self.main_pos();
        Some(GridPos::new(m.x + ox, m.y + oy))
    }

    /// Cells still controlled by the player
    pub fn cells(&self) -> ArrayVec<LiveCell, 2> {
        let mut out = ArrayVec::new();
        let pos = self.main_pos();
        if self.separated {
            let role = if self.main_fixed {
                PairCell::Sub
            } else {
                PairCell::Main
            };
            out.push(self.live_cell(role, pos));
            return out;
        }
        out.push(self.live_cell(PairCell::Main, pos));
        if let Some(sub) = self.sub_pos() {
            out.push(self.live_cell(PairCell::Sub, sub));
        }
        out
    }

    fn live_cell(&self, role: PairCell, pos: GridPos) -> LiveCell {
        let (color, special) = match role {
            PairCell::Main => (self.spec.main, self.spec.main_special),
            PairCell::Sub => (self.spec.sub, self.spec.sub_special),
        };
        LiveCell {
            pos,
            color,
            special,
            role,
        }
    }

    /// Placement test for the live cells at a candidate position
    fn fits(&self, grid: &Grid, x: f64, y: f64, rotation: Rotation) -> bool {
        if self.separated {
            cell_fits(grid, snap(x), snap(y))
        } else {
            can_place_at(grid, x, y, rotation)
        }
    }

    /// Largest y the lowest live cell may reach
    fn max_y(&self) -> f64 {
        let below = if !self.separated && self.rotation == Rotation::Down {
            1.0
        } else {
            0.0
        };
        (GRID_HEIGHT - 1) as f64 - below
    }

    /// Landing test: bottom row, half-cell look-ahead, or a cell directly below
    pub fn touching_down(&self, grid: &Grid) -> bool {
        let cells = self.cells();
        if cells.iter().any(|c| c.pos.y >= GRID_HEIGHT as i8 - 1) {
            return true;
        }
        if !self.fits(grid, self.x, self.y + 0.5, self.rotation) {
            return true;
        }
        cells.iter().any(|c| grid.is_occupied(c.pos.x, c.pos.y + 1))
    }

    /// Advance by `distance` in sub-steps, stopping at the last safe position
    fn fall(&mut self, grid: &Grid, distance: f64, step: f64) {
        let mut left = distance;
        while left > 0.0 {
            let d = step.min(left);
            if !self.fits(grid, self.x, self.y + d, self.rotation) {
                break;
            }
            self.y += d;
            left -= d;
        }
        self.y = self.y.min(self.max_y());
    }

    fn register_input(&mut self) {
        self.no_input_timer = 0.0;
        if self.grounded && self.move_reset_count < MAX_MOVE_RESETS {
            self.grounded_timer = 0.0;
            self.move_reset_count += 1;
        }
    }

    /// Shift one column left (`-1`) or right (`+1`)
    pub fn try_move(&mut self, grid: &Grid, dir: i8) -> bool {
        if self.separated && self.separation_timer <= 0.0 {
            return false;
        }
        let nx = self.x + dir as f64;
        if !self.fits(grid, nx, self.y, self.rotation) {
            return false;
        }
        self.x = nx;
        self.register_input();
        true
    }

    /// Rotate with kicks. Disabled once separated.
    pub fn try_rotate(&mut self, grid: &Grid, clockwise: bool) -> bool {
        if self.separated {
            return false;
        }
        let to = if clockwise {
            self.rotation.rotate_cw()
        } else {
            self.rotation.rotate_ccw()
        };
        let (ox, oy) = to.sub_offset();
        let top = -1;
        let bottom = GRID_HEIGHT as i8 - 1;

        for &(dx, dy) in &PAIR_KICKS[kick_index(self.rotation, clockwise)] {
            if dx.abs() > 1 || dy.abs() > 1 {
                continue;
            }
            let nx = self.x + dx as f64;
            let ny = self.y + dy as f64;
            let (mx, my) = (snap(nx), snap(ny));
            let (sx, sy) = (mx + ox, my + oy);
            if my < top || my > bottom || sy < top || sy > bottom {
                continue;
            }
            if (sx - mx).abs() + (sy - my).abs() != 1 {
                continue;
            }
            if can_place_at(grid, nx, ny, to) {
                self.x = nx;
                self.y = ny;
                self.rotation = to;
                self.register_input();
                return true;
            }
        }

        false
    }

    /// Advance kinematics and the lock delay by `dt`
    pub fn update(&mut self, dt: f32, grid: &mut Grid) -> PairStep {
        if self.separated {
            self.separation_timer = (self.separation_timer - dt).max(0.0);
            self.fall(grid, self.fast_fall_speed * dt as f64, FAST_FALL_STEP as f64);
            if self.touching_down(grid) {
                self.write_lone_cell(grid);
                return PairStep::Locked;
            }
            return PairStep::Falling;
        }

        let (speed, step) = if self.fast_fall {
            (self.fast_fall_speed, FAST_FALL_STEP as f64)
        } else {
            (self.fall_speed, FALL_STEP as f64)
        };
        self.fall(grid, speed * dt as f64, step);

        if self.touching_down(grid) {
            if !self.grounded {
                self.grounded = true;
                self.grounded_timer = 0.0;
                self.no_input_timer = 0.0;
                self.move_reset_count = 0;
            } else {
                self.grounded_timer += dt;
                self.no_input_timer += dt;
            }

            if self.grounded_timer >= LOCK_GRACE
                || self.no_input_timer >= AUTO_LOCK
                || self.move_reset_count >= MAX_MOVE_RESETS
            {
                return self.lock(grid);
            }
        } else if self.grounded {
            self.grounded = false;
            self.grounded_timer = 0.0;
            self.no_input_timer = 0.0;
            self.move_reset_count = 0;
        }

        PairStep::Falling
    }

    /// Write supported cells; an unsupported cell keeps falling alone
    pub fn lock(&mut self, grid: &mut Grid) -> PairStep {
        if self.separated {
            self.write_lone_cell(grid);
            return PairStep::Locked;
        }

        let main = self.main_pos();
        let Some(sub) = self.sub_pos() else {
            return PairStep::Locked;
        };

        let main_on_sub = sub == GridPos::new(main.x, main.y + 1);
        let sub_on_main = main == GridPos::new(sub.x, sub.y + 1);
        let main_supported = is_supported(grid, main) || (main_on_sub && is_supported(grid, sub));
        let sub_supported = is_supported(grid, sub) || (sub_on_main && is_supported(grid, main));

        match (main_supported, sub_supported) {
            (true, false) => {
                self.write_cell(grid, PairCell::Main, main);
                self.main_fixed = true;
                self.separate(sub);
                PairStep::Separated
            }
            (false, true) => {
                self.write_cell(grid, PairCell::Sub, sub);
                self.sub_fixed = true;
                self.separate(main);
                PairStep::Separated
            }
            _ => {
                // Neither-supported cannot come from a grounded pair; cascade gravity settles it.
                self.write_cell(grid, PairCell::Main, main);
                self.write_cell(grid, PairCell::Sub, sub);
                self.main_fixed = true;
                self.sub_fixed = true;
                log::debug!("pair locked at {:?}/{:?}", main, sub);
                PairStep::Locked
            }
        }
    }

    fn separate(&mut self, lone: GridPos) {
        log::debug!("pair separated, lone cell at {:?}", lone);
        self.separated = true;
        self.x = lone.x as f64;
        self.y = lone.y as f64;
        self.separation_timer = POST_SEP_WINDOW;
        self.grounded = false;
        self.grounded_timer = 0.0;
        self.no_input_timer = 0.0;
    }

    fn write_lone_cell(&mut self, grid: &mut Grid) {
        let role = if self.main_fixed {
            PairCell::Sub
        } else {
            PairCell::Main
        };
        let pos = self.main_pos();
        self.write_cell(grid, role, pos);
        self.main_fixed = true;
        self.sub_fixed = true;
    }

    fn write_cell(&self, grid: &mut Grid, role: PairCell, pos: GridPos) {
        let cell = self.live_cell(role, pos);
        if pos.y < 0 {
            log::debug!("{:?} cell above the grid dropped", role);
            return;
        }
        if grid.place_checked(pos.x, pos.y, cell.color).is_err() {
            log::debug!("{:?} cell at {:?} blocked, dropped", role, pos);
            return;
        }
        if let Some(kind) = cell.special {
            grid.attach_special(pos.x, pos.y, kind);
        }
    }

    /// Main-cell y the pair would land at if dropped straight down
    pub fn landing_y(&self, grid: &Grid) -> f64 {
        let mut y = snap(self.y) as f64;
        if !self.fits(grid, self.x, y, self.rotation) {
            return self.y;
        }
        while y + 1.0 <= self.max_y() && self.fits(grid, self.x, y + 1.0, self.rotation) {
            y += 1.0;
        }
        y
    }

    /// Drop to the lowest legal position and lock; a separated cell drops too
    pub fn hard_drop(&mut self, grid: &mut Grid) -> PairStep {
        self.y = self.landing_y(grid);
        if self.lock(grid) == PairStep::Separated {
            self.y = self.landing_y(grid);
            self.write_lone_cell(grid);
        }
        PairStep::Locked
    }

    /// Cells the pair would occupy after a straight drop (ghost preview)
    pub fn ghost_cells(&self, grid: &Grid) -> ArrayVec<LiveCell, 2> {
        let dy = snap(self.landing_y(grid)) - snap(self.y);
        self.cells()
            .into_iter()
            .map(|mut c| {
                c.pos.y += dy;
                c
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn spec() -> PairSpec {
        PairSpec::plain(CellColor::Red, CellColor::Blue)
    }

    fn run_until_locked(pair: &mut ActivePair, grid: &mut Grid) -> usize {
        for i in 0..20_000 {
            if pair.update(DT, grid) == PairStep::Locked {
                return i;
            }
        }
        panic!("pair never locked");
    }

    #[test]
    fn test_spawn_position() {
        let pair = ActivePair::spawn(spec());
        assert_eq!(pair.main_pos(), GridPos::new(3, 1));
        assert_eq!(pair.sub_pos(), Some(GridPos::new(3, 0)));
        assert_eq!(pair.rotation(), Rotation::Up);
    }

    #[test]
    fn test_snap_epsilon() {
        assert_eq!(snap(10.5), 11);
        assert_eq!(snap(10.49), 10);
        assert_eq!(snap(-0.4), 0);
        assert_eq!(snap(-0.6), -1);
    }

    #[test]
    fn test_can_place_at_rules() {
        let grid = Grid::from_rows(&["R....."]);
        assert!(can_place_at(&grid, 0.0, 10.0, Rotation::Up));
        assert!(!can_place_at(&grid, 0.0, 10.0, Rotation::Down));
        assert!(!can_place_at(&grid, 5.0, 5.0, Rotation::Right));
        assert!(can_place_at(&grid, 2.0, 0.0, Rotation::Up));
        assert!(!can_place_at(&grid, 2.0, 11.0, Rotation::Down));
    }

    #[test]
    fn test_move_blocked_by_wall() {
        let grid = Grid::new();
        let mut pair = ActivePair::at(spec(), 0, 5.0, Rotation::Up);
        assert!(!pair.try_move(&grid, -1));
        assert!(pair.try_move(&grid, 1));
        assert_eq!(pair.main_pos(), GridPos::new(1, 5));
    }

    #[test]
    fn test_rotation_in_place() {
        let grid = Grid::new();
        let mut pair = ActivePair::at(spec(), 2, 5.0, Rotation::Up);
        assert!(pair.try_rotate(&grid, true));
        assert_eq!(pair.main_pos(), GridPos::new(2, 5));
        assert_eq!(pair.sub_pos(), Some(GridPos::new(3, 5)));
    }

    #[test]
    fn test_wall_kick_near_left_wall() {
        let mut grid = Grid::new();
        // Block (1,5) so the in-place rotation fails.
        grid.place(1, 5, CellColor::Green);

        let mut pair = ActivePair::at(spec(), 0, 5.0, Rotation::Up);
        assert!(pair.try_rotate(&grid, true));
        assert_eq!(pair.main_pos(), GridPos::new(0, 4));
        assert_eq!(pair.rotation(), Rotation::Right);
        assert_eq!(pair.sub_pos(), Some(GridPos::new(1, 4)));
    }

    #[test]
    fn test_kick_tables_mirror() {
        for from in Rotation::ALL {
            let to = from.rotate_cw();
            let mut cw: Vec<_> = kicks_for(from, true).to_vec();
            let mut ccw: Vec<_> = kicks_for(to, false).to_vec();
            cw.sort();
            ccw.sort();
            assert_eq!(cw, ccw, "{:?} -> {:?}", from, to);
        }
    }

    #[test]
    fn test_four_rotations_restore() {
        let grid = Grid::new();
        let mut pair = ActivePair::at(spec(), 2, 5.0, Rotation::Up);
        for _ in 0..4 {
            assert!(pair.try_rotate(&grid, true));
        }
        assert_eq!(pair.rotation(), Rotation::Up);
    }

    #[test]
    fn test_falls_and_locks_on_floor() {
        let mut grid = Grid::new();
        let mut pair = ActivePair::spawn(spec());
        pair.set_fast_fall(true);
        run_until_locked(&mut pair, &mut grid);

        assert_eq!(grid.get(3, 11), Some(CellColor::Red));
        assert_eq!(grid.get(3, 10), Some(CellColor::Blue));
        assert_eq!(grid.occupied_count(), 2);
    }

    #[test]
    fn test_lock_grace_period() {
        let mut grid = Grid::new();
        let mut pair = ActivePair::at(spec(), 2, 11.0, Rotation::Up);

        assert_eq!(pair.update(DT, &mut grid), PairStep::Falling);
        assert!(pair.is_grounded());

        let mut elapsed = 0.0;
        loop {
            elapsed += DT;
            if pair.update(DT, &mut grid) == PairStep::Locked {
                break;
            }
            assert!(elapsed < 1.0);
        }
        assert!((LOCK_GRACE - DT..LOCK_GRACE + DT).contains(&elapsed));
    }

    #[test]
    fn test_move_resets_are_capped() {
        let mut grid = Grid::new();
        let mut pair = ActivePair::at(spec(), 2, 11.0, Rotation::Up);
        pair.update(0.01, &mut grid);
        assert!(pair.is_grounded());

        for i in 0..14 {
            let dir = if i % 2 == 0 { 1 } else { -1 };
            assert!(pair.try_move(&grid, dir));
            assert_eq!(pair.update(0.1, &mut grid), PairStep::Falling);
        }
        assert_eq!(pair.move_reset_count(), 14);

        assert!(pair.try_move(&grid, 1));
        assert_eq!(pair.move_reset_count(), MAX_MOVE_RESETS);
        assert_eq!(pair.update(0.01, &mut grid), PairStep::Locked);
    }

    #[test]
    fn test_separation_on_uneven_ground() {
        let mut grid = Grid::from_rows(&["X....."]);
        let mut pair = ActivePair::at(spec(), 0, 10.0, Rotation::Right);

        let mut step = PairStep::Falling;
        for _ in 0..120 {
            step = pair.update(DT, &mut grid);
            if step != PairStep::Falling {
                break;
            }
        }
        assert_eq!(step, PairStep::Separated);
        assert_eq!(grid.get(0, 10), Some(CellColor::Red));
        assert!(pair.is_separated());
        assert_eq!(pair.cells()[0].pos, GridPos::new(1, 10));

        run_until_locked(&mut pair, &mut grid);
        assert_eq!(grid.get(1, 11), Some(CellColor::Blue));
    }

    #[test]
    fn test_post_separation_window() {
        let mut grid = Grid::from_rows(&["X.....", "X.....", "X.....", "X.....", "X.....", "X....."]);
        let mut pair = ActivePair::at(spec(), 0, 5.0, Rotation::Right);
        assert_eq!(pair.lock(&mut grid), PairStep::Separated);
        assert_eq!(grid.get(0, 5), Some(CellColor::Red));

        assert!(!pair.try_rotate(&grid, true));
        assert_eq!(pair.update(0.1, &mut grid), PairStep::Falling);
        assert!(pair.try_move(&grid, 1));

        assert_eq!(pair.update(0.15, &mut grid), PairStep::Falling);
        assert!(!pair.try_move(&grid, 1));

        run_until_locked(&mut pair, &mut grid);
        assert_eq!(grid.get(2, 11), Some(CellColor::Blue));
    }

    #[test]
    fn test_hard_drop_writes_both_cells() {
        let mut grid = Grid::from_rows(&["X....."]);
        let mut pair = ActivePair::at(spec(), 0, 2.0, Rotation::Right);
        assert_eq!(pair.hard_drop(&mut grid), PairStep::Locked);
        assert_eq!(grid.get(0, 10), Some(CellColor::Red));
        assert_eq!(grid.get(1, 11), Some(CellColor::Blue));
    }

    #[test]
    fn test_specials_written_with_cells() {
        let mut grid = Grid::new();
        let spec = PairSpec {
            main_special: Some(SpecialKind::Bomb),
            ..spec()
        };
        let mut pair = ActivePair::at(spec, 1, 3.0, Rotation::Up);
        pair.hard_drop(&mut grid);
        assert_eq!(grid.special_at(1, 11), Some(SpecialKind::Bomb));
        assert_eq!(grid.special_at(1, 10), None);
    }

    #[test]
    fn test_ghost_cells() {
        let grid = Grid::from_rows(&["..R..."]);
        let pair = ActivePair::at(spec(), 2, 3.0, Rotation::Up);
        let ghost = pair.ghost_cells(&grid);
        assert_eq!(ghost[0].pos, GridPos::new(2, 10));
        assert_eq!(ghost[1].pos, GridPos::new(2, 9));
    }
}
