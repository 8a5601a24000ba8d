//! Game configuration and starting-corner geometry.

use crate::cell::Cell;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Corner anchors whose ten cells fan out downward from a wide base row;
/// the remaining corners fan out downward from a single tip.
const BASE_DOWN_ANCHORS: [Cell; 3] = [Cell::new(4, 0), Cell::new(4, 18), Cell::new(13, 9)];

/// Settings collected before a game starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSettings {
    /// Total number of players, 2, 3, 4 or 6.
    pub players: usize,
    /// How many of the players are automated, fewer than `players`.
    pub automated: usize,
    /// Names for the human players, in turn order. Automated players are
    /// named `Computer 1`, `Computer 2`, ... after them.
    pub names: Vec<String>,
}

/// Rejected game configuration.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum SetupError {
    /// The player count is not one of 2, 3, 4 or 6.
    #[display("unsupported player count: {_0}")]
    PlayerCount(#[error(not(source))] usize),
    /// At least one player must be human-driven or the count is exceeded.
    #[display("invalid automated player count: {automated} of {players}")]
    AutomatedCount {
        /// Requested automated players.
        automated: usize,
        /// Total players.
        players: usize,
    },
    /// The human name list does not match the human player count.
    #[display("expected {expected} human names, got {got}")]
    NameCount {
        /// Names required.
        expected: usize,
        /// Names supplied.
        got: usize,
    },
    /// A human name is blank or repeats another.
    #[display("invalid player name: {_0:?}")]
    InvalidName(#[error(not(source))] String),
}

impl GameSettings {
    /// Creates settings for `players` total players, the last `automated`
    /// of which move automatically.
    pub fn new(players: usize, automated: usize, names: Vec<String>) -> Self {
        Self {
            players,
            automated,
            names,
        }
    }

    /// Checks the player counts and names.
    pub fn validate(&self) -> Result<(), SetupError> {
        if !matches!(self.players, 2 | 3 | 4 | 6) {
            return Err(SetupError::PlayerCount(self.players));
        }
        if self.automated >= self.players {
            return Err(SetupError::AutomatedCount {
                automated: self.automated,
                players: self.players,
            });
        }
        let humans = self.players - self.automated;
        if self.names.len() != humans {
            return Err(SetupError::NameCount {
                expected: humans,
                got: self.names.len(),
            });
        }
        let mut seen = HashSet::new();
        for name in &self.names {
            if name.trim().is_empty() || !seen.insert(name.as_str()) {
                return Err(SetupError::InvalidName(name.clone()));
            }
        }
        Ok(())
    }
}

/// The corner anchor of each player's starting corner, in turn order.
pub fn starting_anchors(players: usize) -> Vec<Cell> {
    let anchors: &[(i16, i16)] = match players {
        6 => &[(0, 12), (4, 0), (9, 3), (13, 9), (9, 21), (4, 18)],
        4 => &[(4, 0), (9, 3), (9, 21), (4, 18)],
        3 => &[(0, 12), (9, 3), (9, 21)],
        2 => &[(0, 12), (13, 9)],
        _ => &[],
    };
    anchors.iter().map(|&(r, c)| Cell::new(r, c)).collect()
}

/// The anchor of the corner opposite `anchor`: where that corner's pieces
/// must end up.
pub fn opposite_anchor(anchor: Cell) -> Cell {
    match (anchor.row, anchor.col) {
        (0, 12) => Cell::new(13, 9),
        (4, 0) => Cell::new(9, 21),
        (9, 3) => Cell::new(4, 18),
        (13, 9) => Cell::new(0, 12),
        (9, 21) => Cell::new(4, 0),
        (4, 18) => Cell::new(9, 3),
        _ => anchor,
    }
}

/// The ten cells of the corner anchored at `anchor`.
///
/// Corners anchored on a wide base row shrink by one cell per row going
/// down; the others grow from a single tip. The enumeration order fixes
/// each piece's index within its corner.
pub fn corner_cells(anchor: Cell) -> Vec<Cell> {
    let mut cells = Vec::with_capacity(10);
    let base_down = BASE_DOWN_ANCHORS.contains(&anchor);
    for row in anchor.row..anchor.row + 4 {
        let depth = row - anchor.row;
        let (first, last) = if base_down {
            (anchor.col + depth, anchor.col + 6 - depth)
        } else {
            (anchor.col - depth, anchor.col + depth)
        };
        let mut col = first;
        while col <= last {
            cells.push(Cell::new(row, col));
            col += 2;
        }
    }
    cells
}
