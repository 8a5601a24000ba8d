//! The fixed star-shaped board geometry.

use crate::cell::Cell;
use std::collections::HashSet;

/// Number of rows on the board.
pub const ROWS: i16 = 17;

/// Number of physical columns (cells sit on every other column).
pub const COLS: i16 = 25;

/// Widest row, measured in cells.
const MAX_WIDTH: i16 = 13;

/// Relative positions of the six hex neighbors.
const NEIGHBOR_OFFSETS: [(i16, i16); 6] =
    [(-1, -1), (-1, 1), (0, -2), (0, 2), (1, -1), (1, 1)];

/// The set of playable cells of the six-pointed star, 121 in total.
///
/// Validity is computed once at construction and never changes. All
/// queries are pure; out-of-range input yields empty results rather than
/// errors.
#[derive(Debug, Clone)]
pub struct Grid {
    valid: HashSet<Cell>,
}

/// How many cells row `row` holds. The four rows of each star point grow
/// or shrink by one cell per row; the hexagonal middle spans the rest.
fn row_width(row: i16) -> i16 {
    match row {
        0..=3 | 8..=11 => row + 1,
        4 | 12 => MAX_WIDTH,
        _ => ROWS - row,
    }
}

impl Grid {
    /// Builds the star grid.
    pub fn new() -> Self {
        let mut valid = HashSet::new();
        for row in 0..ROWS {
            let width = row_width(row);
            let first = (MAX_WIDTH - width) / 2;
            for slot in first..first + width {
                // Odd rows are shifted half a cell to the right.
                valid.insert(Cell::new(row, row % 2 + 2 * slot));
            }
        }
        Self { valid }
    }

    /// Whether `cell` is a playable position on the star.
    pub fn is_valid_cell(&self, cell: Cell) -> bool {
        self.valid.contains(&cell)
    }

    /// The playable cells adjacent to `cell`, at most six. Empty when
    /// `cell` itself is off the star.
    pub fn neighbors(&self, cell: Cell) -> HashSet<Cell> {
        if !self.is_valid_cell(cell) {
            return HashSet::new();
        }
        NEIGHBOR_OFFSETS
            .iter()
            .map(|&(dr, dc)| Cell::new(cell.row + dr, cell.col + dc))
            .filter(|c| self.is_valid_cell(*c))
            .collect()
    }

    /// Iterates over every playable cell.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.valid.iter().copied()
    }

    /// Number of playable cells.
    pub fn len(&self) -> usize {
        self.valid.len()
    }

    /// Always false; the star is never empty.
    pub fn is_empty(&self) -> bool {
        self.valid.is_empty()
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}
