//! Board coordinates.

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A discrete coordinate on the star board.
///
/// Rows run 0..17 top to bottom. Columns use the doubled numbering of the
/// original board layout: horizontally adjacent cells are two columns
/// apart, and diagonal neighbors are one row and one column away. Any pair
/// of integers is a `Cell`; whether it names a playable position is the
/// [`Grid`](crate::Grid)'s call.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Cell {
    /// Row index.
    pub row: i16,
    /// Column index.
    pub col: i16,
}

impl Cell {
    /// Creates a cell from row and column indices.
    pub const fn new(row: i16, col: i16) -> Self {
        Self { row, col }
    }

    /// The landing cell of a jump over `over`: the reflection of `self`
    /// through `over`, componentwise `over + (over - self)`.
    pub const fn reflect_over(self, over: Cell) -> Cell {
        Cell::new(
            over.row + (over.row - self.row),
            over.col + (over.col - self.col),
        )
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Failure to parse a `(row, col)` pair from a log record.
#[derive(Debug, Clone, Display, Error)]
#[display("not a cell coordinate: {text:?}")]
pub struct ParseCellError {
    /// The text that failed to parse.
    pub text: String,
}

impl FromStr for Cell {
    type Err = ParseCellError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseCellError { text: s.into() };
        let inner = s
            .trim()
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(err)?;
        let (row, col) = inner.split_once(',').ok_or_else(err)?;
        Ok(Cell::new(
            row.trim().parse().map_err(|_| err())?,
            col.trim().parse().map_err(|_| err())?,
        ))
    }
}
