//! Grid module - manages the puzzle field
//!
//! The grid is 6 columns by 12 rows. Each cell holds a [`CellColor`] and may
//! additionally host a [`SpecialKind`]. Both layers are flat arrays for cache
//! locality and zero allocation; special records travel with their host cell
//! under gravity.
//!
//! Coordinates: (x, y) where x ranges 0..5 (left to right), y ranges 0..11
//! (top to bottom). Gravity pulls toward larger y. Rows with y < 0 are the
//! implicit spawn area and never stored.

use crate::error::{CoreError, CoreResult};
use crate::types::{CellColor, GridPos, SpecialKind, GRID_HEIGHT, GRID_WIDTH, SPAWN_X};

/// Total number of cells on the grid
pub const GRID_SIZE: usize = (GRID_WIDTH as usize) * (GRID_HEIGHT as usize);

/// The puzzle grid - colors plus the special-cell registry
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    /// Flat array of colors, row-major order (y * WIDTH + x)
    cells: [CellColor; GRID_SIZE],
    /// Special kinds attached to non-empty cells, same layout as `cells`
    specials: [Option<SpecialKind>; GRID_SIZE],
}

impl Grid {
    /// Create a new empty grid
    pub fn new() -> Self {
        Self {
            cells: [CellColor::Empty; GRID_SIZE],
            specials: [None; GRID_SIZE],
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= GRID_WIDTH as i8 || y < 0 || y >= GRID_HEIGHT as i8 {
            return None;
        }
        Some((y as usize) * (GRID_WIDTH as usize) + (x as usize))
    }

    pub fn width(&self) -> u8 {
        GRID_WIDTH
    }

    pub fn height(&self) -> u8 {
        GRID_HEIGHT
    }

    /// Get color at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<CellColor> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Write a color, overwriting whatever is there
    /// Out-of-bounds writes are ignored. Writing `Empty` drops any special record.
    pub fn place(&mut self, x: i8, y: i8, color: CellColor) {
        if let Some(idx) = Self::index(x, y) {
            self.cells[idx] = color;
            if color.is_empty() {
                self.specials[idx] = None;
            }
        }
    }

    /// Write a color into an empty in-bounds cell
    pub fn place_checked(&mut self, x: i8, y: i8, color: CellColor) -> CoreResult<()> {
        if !self.can_place(x, y) {
            return Err(CoreError::InvalidPlacement { x, y });
        }
        self.place(x, y, color);
        Ok(())
    }

    /// True iff (x, y) is in bounds and Empty
    pub fn can_place(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(CellColor::Empty))
    }

    /// True iff (x, y) is in bounds and holds a non-Empty cell
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(c) if !c.is_empty())
    }

    pub fn is_out_of_bounds(&self, x: i8, y: i8) -> bool {
        Self::index(x, y).is_none()
    }

    /// Lowest free row of column x: the largest y that is Empty with every cell
    /// below it filled. Returns None when the column is full or x is out of range.
    pub fn drop_floor(&self, x: i8) -> Option<i8> {
        if x < 0 || x >= GRID_WIDTH as i8 {
            return None;
        }
        (0..GRID_HEIGHT as i8).rev().find(|&y| self.can_place(x, y))
    }

    /// Compact every column toward the bottom, preserving vertical order.
    /// Special records move with their host cell. Returns the number of cells moved.
    pub fn apply_gravity(&mut self) -> usize {
        let mut moved = 0;
        let width = GRID_WIDTH as usize;

        for x in 0..width {
            let mut write_y = GRID_HEIGHT as usize;
            // Scan from bottom to top, two-pointer compaction
            for read_y in (0..GRID_HEIGHT as usize).rev() {
                let read = read_y * width + x;
                if self.cells[read].is_empty() {
                    continue;
                }
                write_y -= 1;
                if write_y != read_y {
                    let write = write_y * width + x;
                    self.cells[write] = self.cells[read];
                    self.specials[write] = self.specials[read].take();
                    self.cells[read] = CellColor::Empty;
                    moved += 1;
                }
            }
        }

        moved
    }

    /// Empty a cell and hand back any special record it hosted
    pub fn clear_cell(&mut self, x: i8, y: i8) -> Option<SpecialKind> {
        let idx = Self::index(x, y)?;
        self.cells[idx] = CellColor::Empty;
        self.specials[idx].take()
    }

    /// Special kind hosted at (x, y), if any
    pub fn special_at(&self, x: i8, y: i8) -> Option<SpecialKind> {
        Self::index(x, y).and_then(|idx| self.specials[idx])
    }

    /// Attach a special kind to a non-empty cell
    /// Returns false if the cell is out of bounds or Empty.
    pub fn attach_special(&mut self, x: i8, y: i8, kind: SpecialKind) -> bool {
        match Self::index(x, y) {
            Some(idx) if !self.cells[idx].is_empty() => {
                self.specials[idx] = Some(kind);
                true
            }
            _ => false,
        }
    }

    /// Iterate over every special record as (position, kind), row-major
    pub fn specials(&self) -> impl Iterator<Item = (GridPos, SpecialKind)> + '_ {
        let width = GRID_WIDTH as usize;
        self.specials.iter().enumerate().filter_map(move |(i, s)| {
            s.map(|kind| (GridPos::new((i % width) as i8, (i / width) as i8), kind))
        })
    }

    /// Spawn test: the pair's spawn cells (column 3, rows 0 and 1) must be free
    pub fn is_spawn_blocked(&self) -> bool {
        !self.can_place(SPAWN_X, 0) || !self.can_place(SPAWN_X, 1)
    }

    /// Get a reference to the internal color array
    pub fn cells(&self) -> &[CellColor] {
        &self.cells
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|c| c.is_empty())
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_empty()).count()
    }

    /// Clear the entire grid
    pub fn clear(&mut self) {
        self.cells = [CellColor::Empty; GRID_SIZE];
        self.specials = [None; GRID_SIZE];
    }

    /// Copy colors into a fixed 2D array (row-major, for snapshots)
    pub fn write_color_grid(
        &self,
        out: &mut [[CellColor; GRID_WIDTH as usize]; GRID_HEIGHT as usize],
    ) {
        let width = GRID_WIDTH as usize;
        for (y, row) in out.iter_mut().enumerate() {
            row.copy_from_slice(&self.cells[y * width..(y + 1) * width]);
        }
    }

    /// Build a grid from text rows, top to bottom, aligned to the bottom row.
    ///
    /// `.` is Empty, `R B G Y P O C` are colors, `X` is Garbage. Unknown
    /// characters are treated as Empty. Extra rows or columns are ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use cascade_quest_core::Grid;
    /// use cascade_quest_core::types::CellColor;
    ///
    /// let grid = Grid::from_rows(&["R.....", "RRR..."]);
    /// assert_eq!(grid.get(0, 10), Some(CellColor::Red));
    /// assert_eq!(grid.get(2, 11), Some(CellColor::Red));
    /// assert_eq!(grid.get(3, 11), Some(CellColor::Empty));
    /// ```
    pub fn from_rows(rows: &[&str]) -> Self {
        let mut grid = Self::new();
        let height = GRID_HEIGHT as usize;
        let rows = if rows.len() > height {
            &rows[rows.len() - height..]
        } else {
            rows
        };
        let top = height - rows.len();
        for (dy, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().take(GRID_WIDTH as usize).enumerate() {
                grid.place(x as i8, (top + dy) as i8, color_from_char(ch));
            }
        }
        grid
    }

    /// Render the grid as text rows using the `from_rows` alphabet
    pub fn to_rows(&self) -> Vec<String> {
        let width = GRID_WIDTH as usize;
        self.cells
            .chunks(width)
            .map(|row| row.iter().map(|&c| char_from_color(c)).collect())
            .collect()
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

fn color_from_char(ch: char) -> CellColor {
    match ch.to_ascii_uppercase() {
        'R' => CellColor::Red,
        'B' => CellColor::Blue,
        'G' => CellColor::Green,
        'Y' => CellColor::Yellow,
        'P' => CellColor::Purple,
        'O' => CellColor::Orange,
        'C' => CellColor::Cyan,
        'X' => CellColor::Garbage,
        _ => CellColor::Empty,
    }
}

fn char_from_color(color: CellColor) -> char {
    match color {
        CellColor::Empty => '.',
        CellColor::Red => 'R',
        CellColor::Blue => 'B',
        CellColor::Green => 'G',
        CellColor::Yellow => 'Y',
        CellColor::Purple => 'P',
        CellColor::Orange => 'O',
        CellColor::Cyan => 'C',
        CellColor::Garbage => 'X',
    }
}
