//! Pair tests - falling, rotation kicks, lock delay and separation

use cascade_quest::core::pair::{can_place_at, kicks_for};
use cascade_quest::core::{ActivePair, Grid, PairSpec, PairStep};
use cascade_quest::types::{CellColor, GridPos, Rotation, SpecialKind, LOCK_GRACE};

const DT: f32 = 1.0 / 60.0;

fn spec() -> PairSpec {
    PairSpec::plain(CellColor::Yellow, CellColor::Purple)
}

#[test]
fn test_wall_kick_cw_near_left_wall() {
    let mut grid = Grid::new();
    grid.place(1, 5, CellColor::Garbage);

    assert_eq!(kicks_for(Rotation::Up, true), &[(-1, 0), (0, -1), (-1, -1)]);

    let mut pair = ActivePair::at(spec(), 0, 5.0, Rotation::Up);
    assert_eq!(pair.sub_pos(), Some(GridPos::new(0, 4)));
    assert!(pair.try_rotate(&grid, true));
    assert_eq!(pair.main_pos(), GridPos::new(0, 4));
    assert_eq!(pair.rotation(), Rotation::Right);
    assert_eq!(pair.sub_pos(), Some(GridPos::new(1, 4)));
}

#[test]
fn test_rotation_fails_when_every_kick_is_blocked() {
    let mut grid = Grid::new();
    grid.place(1, 5, CellColor::Garbage);
    grid.place(1, 4, CellColor::Garbage);

    let mut pair = ActivePair::at(spec(), 0, 5.0, Rotation::Up);
    assert!(!pair.try_rotate(&grid, true));
    assert_eq!(pair.main_pos(), GridPos::new(0, 5));
    assert_eq!(pair.rotation(), Rotation::Up);
}

#[test]
fn test_placement_above_grid_is_allowed() {
    let grid = Grid::new();
    assert!(can_place_at(&grid, 3.0, 0.0, Rotation::Up));
    assert!(!can_place_at(&grid, -1.0, 0.0, Rotation::Up));
}

#[test]
fn test_fast_fall_reaches_the_floor_quickly() {
    let mut grid = Grid::new();
    let mut pair = ActivePair::spawn(spec());
    pair.set_fast_fall(true);

    let mut locked_at = None;
    for i in 0..90 {
        if pair.update(DT, &mut grid) == PairStep::Locked {
            locked_at = Some(i);
            break;
        }
    }
    assert!(locked_at.is_some());
    assert_eq!(grid.get(3, 11), Some(CellColor::Yellow));
    assert_eq!(grid.get(3, 10), Some(CellColor::Purple));
}

#[test]
fn test_normal_fall_is_slow() {
    let mut grid = Grid::new();
    let mut pair = ActivePair::spawn(spec());
    for _ in 0..90 {
        assert_eq!(pair.update(DT, &mut grid), PairStep::Falling);
    }
    // 0.4 cells per second for 1.5 s
    let (_, y) = pair.position();
    assert!((y - 1.6).abs() < 0.01, "y = {}", y);
    assert!(grid.is_empty());
}

#[test]
fn test_moves_in_the_air_do_not_spend_resets() {
    let grid = Grid::new();
    let mut pair = ActivePair::at(spec(), 2, 3.0, Rotation::Up);
    for i in 0..20 {
        let dir = if i % 2 == 0 { 1 } else { -1 };
        assert!(pair.try_move(&grid, dir));
    }
    assert_eq!(pair.move_reset_count(), 0);
}

#[test]
fn test_grounded_input_extends_lock_delay() {
    let mut grid = Grid::new();
    let mut pair = ActivePair::at(spec(), 2, 11.0, Rotation::Right);
    pair.update(DT, &mut grid);
    assert!(pair.is_grounded());

    // Just short of the grace period, then a move restarts it.
    let mut t = 0.0;
    while t + DT < LOCK_GRACE - 0.05 {
        assert_eq!(pair.update(DT, &mut grid), PairStep::Falling);
        t += DT;
    }
    assert!(pair.try_move(&grid, -1));
    assert_eq!(pair.grounded_timer(), 0.0);
    assert_eq!(pair.update(0.2, &mut grid), PairStep::Falling);
    assert_eq!(pair.update(0.35, &mut grid), PairStep::Locked);
    assert_eq!(grid.get(1, 11), Some(CellColor::Yellow));
    assert_eq!(grid.get(2, 11), Some(CellColor::Purple));
}

#[test]
fn test_separated_cell_keeps_falling_alone() {
    // Main lands on a garbage stack, sub hangs over an empty column.
    let mut grid = Grid::from_rows(&["X.....", "X.....", "X....."]);
    let spec = PairSpec {
        sub_special: Some(SpecialKind::Poison),
        ..spec()
    };
    let mut pair = ActivePair::at(spec, 0, 8.0, Rotation::Right);

    assert_eq!(pair.lock(&mut grid), PairStep::Separated);
    assert_eq!(grid.get(0, 8), Some(CellColor::Yellow));
    assert!(pair.is_separated());
    assert!(!pair.try_rotate(&grid, false));
    assert_eq!(pair.cells().len(), 1);

    let mut step = PairStep::Falling;
    for _ in 0..120 {
        step = pair.update(DT, &mut grid);
        if step == PairStep::Locked {
            break;
        }
    }
    assert_eq!(step, PairStep::Locked);
    assert_eq!(grid.get(1, 11), Some(CellColor::Purple));
    assert_eq!(grid.special_at(1, 11), Some(SpecialKind::Poison));
}

#[test]
fn test_cells_above_the_grid_are_dropped() {
    let mut grid = Grid::new();
    for y in 1..12 {
        grid.place(2, y, CellColor::Garbage);
    }
    let mut pair = ActivePair::at(spec(), 2, 0.0, Rotation::Up);
    assert_eq!(pair.hard_drop(&mut grid), PairStep::Locked);
    assert_eq!(grid.get(2, 0), Some(CellColor::Yellow));
    assert_eq!(grid.occupied_count(), 12);
}

#[test]
fn test_ghost_matches_hard_drop() {
    let mut grid = Grid::from_rows(&["...GG."]);
    let mut pair = ActivePair::at(spec(), 3, 2.0, Rotation::Right);
    let ghost = pair.ghost_cells(&grid);

    pair.hard_drop(&mut grid);
    for cell in ghost {
        assert_eq!(grid.get(cell.pos.x, cell.pos.y), Some(cell.color));
    }
}
