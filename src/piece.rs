//! Game pieces and player colors.

use crate::cell::Cell;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

/// The color identifying a player and their pieces.
///
/// Colors are assigned to players in declaration order at setup.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PlayerColor {
    /// First player.
    Red,
    /// Second player.
    Green,
    /// Third player.
    Blue,
    /// Fourth player.
    Yellow,
    /// Fifth player.
    Orange,
    /// Sixth player.
    Purple,
}

impl PlayerColor {
    /// Single-character abbreviation used by the text board rendering.
    pub fn glyph(self) -> char {
        match self {
            PlayerColor::Red => 'r',
            PlayerColor::Green => 'g',
            PlayerColor::Blue => 'b',
            PlayerColor::Yellow => 'y',
            PlayerColor::Orange => 'o',
            PlayerColor::Purple => 'p',
        }
    }
}

/// A single game piece.
///
/// Identity and color are fixed at construction. The cell changes only
/// through [`Board::move_piece`](crate::Board::move_piece); board and
/// owning player otherwise share the same handle and so always agree on
/// where the piece stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    id: String,
    color: PlayerColor,
    cell: Cell,
}

/// Shared handle to a piece. The game is single-threaded and the board is
/// the sole mutator, so a reference-counted cell suffices.
pub type PieceHandle = Rc<RefCell<Piece>>;

impl Piece {
    /// Creates a piece at its starting cell.
    pub fn new(color: PlayerColor, id: impl Into<String>, cell: Cell) -> Self {
        Self {
            id: id.into(),
            color,
            cell,
        }
    }

    /// Creates a piece and wraps it in a shared handle.
    pub fn handle(color: PlayerColor, id: impl Into<String>, cell: Cell) -> PieceHandle {
        Rc::new(RefCell::new(Self::new(color, id, cell)))
    }

    /// The piece's stable identifier, unique per game.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The owning player's color.
    pub fn color(&self) -> PlayerColor {
        self.color
    }

    /// The cell the piece currently stands on.
    pub fn cell(&self) -> Cell {
        self.cell
    }

    /// Records the piece's new cell. Only the board may call this, as the
    /// final step of a validated move.
    pub(crate) fn relocate(&mut self, to: Cell) {
        self.cell = to;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn color_names_round_trip() {
        for color in [
            PlayerColor::Red,
            PlayerColor::Green,
            PlayerColor::Blue,
            PlayerColor::Yellow,
            PlayerColor::Orange,
            PlayerColor::Purple,
        ] {
            assert_eq!(PlayerColor::from_str(&color.to_string()).unwrap(), color);
        }
    }

    #[test]
    fn identity_survives_relocation() {
        let piece = Piece::handle(PlayerColor::Red, "red0", Cell::new(0, 12));
        piece.borrow_mut().relocate(Cell::new(1, 11));
        assert_eq!(piece.borrow().id(), "red0");
        assert_eq!(piece.borrow().color(), PlayerColor::Red);
        assert_eq!(piece.borrow().cell(), Cell::new(1, 11));
    }
}
