//! Per-player piece and target bookkeeping.

use crate::cell::Cell;
use crate::piece::{PieceHandle, PlayerColor};
use rand::seq::IteratorRandom;
use std::collections::{HashMap, HashSet};
use tracing::{debug, instrument};

/// One participant in the game.
///
/// A player mirrors the board's view of their own pieces, keyed by cell,
/// and tracks the target corner: the win predicate holds once every
/// target cell is covered by a piece of the player's own color. The
/// mirror is bookkeeping, not a second authority; placement and move
/// legality are the board's business.
#[derive(Debug, Clone)]
pub struct Player {
    name: String,
    color: PlayerColor,
    automated: bool,
    wins: u32,
    losses: u32,
    pieces: HashMap<Cell, PieceHandle>,
    targets: HashMap<Cell, Option<PieceHandle>>,
}

impl Player {
    /// Creates a player with no pieces or targets yet.
    pub fn new(name: impl Into<String>, color: PlayerColor, automated: bool) -> Self {
        Self {
            name: name.into(),
            color,
            automated,
            wins: 0,
            losses: 0,
            pieces: HashMap::new(),
            targets: HashMap::new(),
        }
    }

    /// The player's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The player's color.
    pub fn color(&self) -> PlayerColor {
        self.color
    }

    /// Whether this player moves automatically.
    pub fn is_automated(&self) -> bool {
        self.automated
    }

    /// Games won so far.
    pub fn wins(&self) -> u32 {
        self.wins
    }

    /// Games lost so far.
    pub fn losses(&self) -> u32 {
        self.losses
    }

    /// Credits a won game.
    pub fn record_win(&mut self) {
        self.wins += 1;
    }

    /// Credits a lost game.
    pub fn record_loss(&mut self) {
        self.losses += 1;
    }

    /// Mirrors a piece the board has already accepted, keyed by its
    /// current cell.
    pub fn add_piece(&mut self, piece: PieceHandle) {
        let cell = piece.borrow().cell();
        self.pieces.insert(cell, piece);
    }

    /// Registers a home-target cell with an empty marker. Called once per
    /// target during setup, never during play.
    pub fn add_target_cell(&mut self, cell: Cell) {
        self.targets.insert(cell, None);
    }

    /// Relocates an owned piece from `from` to `to` and refreshes the
    /// target markers touched by the move.
    ///
    /// Fails if `from` holds no owned piece or `to` already does. Must run
    /// in the same logical transaction as the board's move of the same
    /// pair, or the two views of the piece diverge.
    #[instrument(skip(self), fields(player = %self.name))]
    pub fn apply_move(&mut self, from: Cell, to: Cell) -> bool {
        if self.pieces.contains_key(&to) {
            debug!(%from, %to, "bookkeeping move rejected: destination owned");
            return false;
        }
        let Some(piece) = self.pieces.remove(&from) else {
            debug!(%from, %to, "bookkeeping move rejected: source not owned");
            return false;
        };
        self.pieces.insert(to, piece.clone());

        if let Some(marker) = self.targets.get_mut(&from) {
            *marker = None;
        }
        if let Some(marker) = self.targets.get_mut(&to) {
            *marker = Some(piece);
        }
        true
    }

    /// The owned piece standing on `cell`, if any.
    pub fn piece_at(&self, cell: Cell) -> Option<PieceHandle> {
        self.pieces.get(&cell).cloned()
    }

    /// The player's pieces keyed by current cell.
    pub fn pieces(&self) -> &HashMap<Cell, PieceHandle> {
        &self.pieces
    }

    /// The target map: home-target cells and the piece covering each, if
    /// any.
    pub fn targets(&self) -> &HashMap<Cell, Option<PieceHandle>> {
        &self.targets
    }

    /// Whether every target cell is covered by a piece of this player's
    /// color. False when the target map is empty or any entry is vacant
    /// or covered by an opposing piece.
    pub fn has_won(&self) -> bool {
        !self.targets.is_empty()
            && self.targets.values().all(|marker| {
                marker
                    .as_ref()
                    .is_some_and(|piece| piece.borrow().color() == self.color)
            })
    }

    /// Picks one of the player's pieces uniformly at random, or `None`
    /// when the player has no pieces.
    pub fn select_piece_for_automated_turn(&self) -> Option<PieceHandle> {
        let mut rng = rand::rng();
        self.pieces.values().choose(&mut rng).cloned()
    }

    /// Picks a destination uniformly at random from `candidates`, or
    /// `None` when there is nothing to choose.
    pub fn select_destination_for_automated_turn(
        &self,
        candidates: &HashSet<Cell>,
    ) -> Option<Cell> {
        let mut rng = rand::rng();
        candidates.iter().choose(&mut rng).copied()
    }
}
