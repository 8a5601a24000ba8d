//! Board occupancy and move generation.

use crate::cell::Cell;
use crate::grid::{COLS, Grid, ROWS};
use crate::piece::PieceHandle;
use std::collections::HashMap;
use std::collections::HashSet;
use std::rc::Rc;
use tracing::{debug, instrument, warn};

/// What a board coordinate holds.
#[derive(Debug, Clone)]
pub enum CellContent {
    /// A playable cell with no piece on it.
    Empty,
    /// A coordinate outside the star.
    OutOfBounds,
    /// A playable cell holding a piece.
    Occupied(PieceHandle),
}

impl CellContent {
    /// Whether this is a playable, unoccupied cell.
    pub fn is_open(&self) -> bool {
        matches!(self, CellContent::Empty)
    }
}

impl PartialEq for CellContent {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CellContent::Empty, CellContent::Empty) => true,
            (CellContent::OutOfBounds, CellContent::OutOfBounds) => true,
            (CellContent::Occupied(a), CellContent::Occupied(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Eq for CellContent {}

/// The game board: piece occupancy over the star grid.
///
/// Occupancy is tracked twice: a slot per playable cell and a direct
/// cell-to-piece index. Every
/// mutation updates both, so the index is always an exact projection of
/// the occupied slots.
#[derive(Debug, Clone)]
pub struct Board {
    grid: Grid,
    occupancy: HashMap<Cell, Option<PieceHandle>>,
    pieces: HashMap<Cell, PieceHandle>,
}

impl Board {
    /// Creates an empty board over the star grid.
    pub fn new() -> Self {
        let grid = Grid::new();
        let occupancy = grid.cells().map(|cell| (cell, None)).collect();
        Self {
            grid,
            occupancy,
            pieces: HashMap::new(),
        }
    }

    /// The underlying grid geometry.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// What `cell` holds: a piece, nothing, or not a playable cell at all.
    pub fn content(&self, cell: Cell) -> CellContent {
        match self.occupancy.get(&cell) {
            None => CellContent::OutOfBounds,
            Some(None) => CellContent::Empty,
            Some(Some(piece)) => CellContent::Occupied(piece.clone()),
        }
    }

    /// Places a piece at its recorded cell.
    ///
    /// Succeeds only if no piece on the board shares its identifier, the
    /// cell is playable, and the cell is empty. Returns false and changes
    /// nothing otherwise.
    #[instrument(skip(self, piece))]
    pub fn add_piece(&mut self, piece: PieceHandle) -> bool {
        let (id, cell) = {
            let p = piece.borrow();
            (p.id().to_string(), p.cell())
        };
        if self.pieces.values().any(|p| p.borrow().id() == id) {
            warn!(id, "duplicate piece identifier rejected");
            return false;
        }
        if !self.content(cell).is_open() {
            debug!(id, %cell, "placement rejected: cell unavailable");
            return false;
        }
        self.occupancy.insert(cell, Some(piece.clone()));
        self.pieces.insert(cell, piece);
        true
    }

    /// Every destination the piece may legally move to this turn.
    ///
    /// Empty adjacent cells are single-step destinations. When all six
    /// neighbor slots exist and are empty there is nothing to jump over
    /// and those six cells are the complete answer. Otherwise the result
    /// also includes every landing reachable by a chain of jumps, each hop
    /// reflecting the current cell through an occupied neighbor onto an
    /// empty cell not yet visited by the search.
    ///
    /// A piece that is not on this board has no moves.
    pub fn legal_destinations(&self, piece: &PieceHandle) -> HashSet<Cell> {
        let source = piece.borrow().cell();
        match self.pieces.get(&source) {
            Some(resident) if Rc::ptr_eq(resident, piece) => {}
            _ => return HashSet::new(),
        }

        let mut moves = HashSet::new();
        let mut blocked = Vec::new();
        for cell in self.grid.neighbors(source) {
            if self.content(cell).is_open() {
                moves.insert(cell);
            } else {
                blocked.push(cell);
            }
        }
        // Fully open surroundings: simple steps only, no chain to start.
        if moves.len() == 6 {
            return moves;
        }

        // Worklist of candidate landings, each paired with the occupied
        // cell just jumped over. The shared visited set makes every
        // accepted landing unique, which bounds the search by the number
        // of empty cells.
        let mut visited: HashSet<Cell> = HashSet::new();
        let mut pending: Vec<(Cell, Cell)> = blocked
            .into_iter()
            .map(|over| (source.reflect_over(over), over))
            .collect();
        while let Some((landing, over)) = pending.pop() {
            if !self.content(landing).is_open() || !visited.insert(landing) {
                continue;
            }
            moves.insert(landing);
            for next in self.grid.neighbors(landing) {
                if next != over && !self.content(next).is_open() {
                    pending.push((landing.reflect_over(next), next));
                }
            }
        }
        moves
    }

    /// Moves the piece standing on `from` to `to`.
    ///
    /// Succeeds only if `from` holds a piece and `to` is one of its legal
    /// destinations; the vacated slot, the destination slot, the piece
    /// index, and the piece's own cell all update together. Returns false
    /// and changes nothing otherwise.
    #[instrument(skip(self))]
    pub fn move_piece(&mut self, from: Cell, to: Cell) -> bool {
        let Some(piece) = self.pieces.get(&from).cloned() else {
            debug!(%from, "no piece to move");
            return false;
        };
        if !self.legal_destinations(&piece).contains(&to) {
            debug!(%from, %to, "destination not reachable");
            return false;
        }
        self.occupancy.insert(from, None);
        self.occupancy.insert(to, Some(piece.clone()));
        self.pieces.remove(&from);
        piece.borrow_mut().relocate(to);
        self.pieces.insert(to, piece);
        debug!(%from, %to, "piece moved");
        true
    }

    /// The cells currently holding pieces.
    pub fn piece_locations(&self) -> Vec<Cell> {
        self.pieces.keys().copied().collect()
    }

    /// The piece standing on `cell`, if any.
    pub fn piece_by_cell(&self, cell: Cell) -> Option<PieceHandle> {
        self.pieces.get(&cell).cloned()
    }

    /// Number of pieces on the board.
    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let header: String = (0..COLS)
            .map(|i| char::from(b'A' + i as u8))
            .collect();
        writeln!(f, "     {header}")?;
        for row in 0..ROWS {
            let mut line = String::new();
            for col in 0..COLS {
                line.push(match self.content(Cell::new(row, col)) {
                    CellContent::OutOfBounds => ' ',
                    CellContent::Empty => '.',
                    CellContent::Occupied(piece) => piece.borrow().color().glyph(),
                });
            }
            writeln!(f, "{:<2}   {}", row + 1, line.trim_end())?;
        }
        Ok(())
    }
}
