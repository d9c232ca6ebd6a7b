//! Group detection - 4-connected same-color components
//!
//! Groups are discovered with an iterative flood fill seeded in row-major
//! order, so the first group reported is the one whose top-left-most cell
//! comes first when scanning rows top to bottom, columns left to right.

use arrayvec::ArrayVec;

use crate::grid::{Grid, GRID_SIZE};
use crate::types::{CellColor, GridPos, GRID_HEIGHT, GRID_WIDTH, MIN_GROUP};

/// Upper bound on simultaneously clearable groups
pub const MAX_GROUPS: usize = GRID_SIZE / MIN_GROUP;

/// A maximal connected component of one color
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub color: CellColor,
    /// Member cells in discovery order
    pub positions: ArrayVec<GridPos, GRID_SIZE>,
}

impl Group {
    pub fn size(&self) -> usize {
        self.positions.len()
    }

    pub fn contains(&self, pos: GridPos) -> bool {
        self.positions.contains(&pos)
    }
}

const NEIGHBORS: [(i8, i8); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

/// Enumerate every group of at least `MIN_GROUP` cells, excluding Empty and Garbage
pub fn find_groups(grid: &Grid) -> ArrayVec<Group, MAX_GROUPS> {
    let mut groups = ArrayVec::new();
    let mut visited = [false; GRID_SIZE];
    let width = GRID_WIDTH as usize;

    for y in 0..GRID_HEIGHT as i8 {
        for x in 0..GRID_WIDTH as i8 {
            let idx = (y as usize) * width + (x as usize);
            if visited[idx] {
                continue;
            }
            let color = match grid.get(x, y) {
                Some(c) if c.is_matchable() => c,
                _ => continue,
            };

            let group = flood(grid, GridPos::new(x, y), color, &mut visited);
            if group.size() >= MIN_GROUP {
                // MAX_GROUPS is the geometric bound, so this never overflows.
                let _ = groups.try_push(group);
            }
        }
    }

    groups
}

fn flood(grid: &Grid, start: GridPos, color: CellColor, visited: &mut [bool; GRID_SIZE]) -> Group {
    let width = GRID_WIDTH as usize;
    let mut positions = ArrayVec::<GridPos, GRID_SIZE>::new();
    let mut stack = ArrayVec::<GridPos, GRID_SIZE>::new();

    visited[(start.y as usize) * width + start.x as usize] = true;
    stack.push(start);

    while let Some(pos) = stack.pop() {
        positions.push(pos);
        for (dx, dy) in NEIGHBORS {
            let (nx, ny) = (pos.x + dx, pos.y + dy);
            if grid.get(nx, ny) != Some(color) {
                continue;
            }
            let nidx = (ny as usize) * width + nx as usize;
            if !visited[nidx] {
                visited[nidx] = true;
                stack.push(GridPos::new(nx, ny));
            }
        }
    }

    Group { color, positions }
}
