//! The turn-based game state machine.

use crate::board::{Board, CellContent};
use crate::cell::Cell;
use crate::log::{LogRecord, SessionLog};
use crate::piece::{Piece, PieceHandle, PlayerColor};
use crate::player::Player;
use crate::settings::{GameSettings, SetupError, corner_cells, opposite_anchor, starting_anchors};
use derive_more::{Display, Error};
use rand::seq::IteratorRandom;
use std::collections::HashSet;
use strum::IntoEnumIterator;
use tracing::{debug, info, instrument, warn};

/// Where the session stands within a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    /// Waiting for the turn-holder to pick one of their pieces.
    AwaitingSelection,
    /// A piece is selected; waiting for a destination.
    AwaitingDestination,
    /// A player has won; no further input is accepted.
    GameOver,
}

/// A replay stream could not be applied.
#[derive(Debug, Display, Error)]
pub enum ReplayError {
    /// No settings record precedes the turns.
    #[display("replay stream has no settings record")]
    MissingSettings,
    /// The player-info records disagree with the settings record.
    #[display("player records do not match the recorded settings")]
    RosterMismatch,
    /// The recorded roster fails setup validation.
    #[display("{_0}")]
    Setup(SetupError),
    /// A turn record names a player absent from the roster.
    #[display("turn recorded for unknown player {_0:?}")]
    UnknownPlayer(#[error(not(source))] String),
    /// A turn record's source cell holds no piece.
    #[display("no piece at recorded source {_0}")]
    VacantSource(#[error(not(source))] Cell),
    /// The piece at the source is not the one the record names.
    #[display("piece at {cell} is not {expected:?}")]
    PieceMismatch {
        /// Source cell of the record.
        cell: Cell,
        /// Piece id the record names.
        expected: String,
    },
    /// A recorded move is illegal on the replayed board.
    #[display("recorded move {from} -> {to} is illegal")]
    IllegalMove {
        /// Recorded source.
        from: Cell,
        /// Recorded destination.
        to: Cell,
    },
}

impl From<SetupError> for ReplayError {
    fn from(error: SetupError) -> Self {
        ReplayError::Setup(error)
    }
}

/// One full game: the board, the players in fixed turn order, and the
/// turn state machine that sequences them.
///
/// The session is the sole owner of the board and players; every move
/// flows through [`select`](GameSession::select) or
/// [`automated_turn`](GameSession::automated_turn), which mutate board
/// and owning player in lockstep.
#[derive(Debug)]
pub struct GameSession {
    board: Board,
    players: Vec<Player>,
    turn: usize,
    state: TurnState,
    selected: Option<PieceHandle>,
    valid_moves: HashSet<Cell>,
    move_accepted: bool,
    winner: Option<usize>,
    log: Option<SessionLog>,
}

impl GameSession {
    /// Builds a session from validated settings: creates the players
    /// (humans first, then `Computer N`), places every corner's ten
    /// pieces, registers the opposite corner as each player's targets,
    /// and hands the first turn to the first player.
    #[instrument(skip(log))]
    pub fn new(settings: GameSettings, log: Option<SessionLog>) -> Result<Self, SetupError> {
        settings.validate()?;
        let mut roster: Vec<(String, bool)> = settings
            .names
            .iter()
            .map(|name| (name.clone(), false))
            .collect();
        for i in 0..settings.automated {
            roster.push((format!("Computer {}", i + 1), true));
        }
        let session = Self::from_roster(roster, log)?;
        info!(
            players = settings.players,
            automated = settings.automated,
            "session ready"
        );
        if let Some(log) = &session.log {
            session.write_record(
                log,
                &LogRecord::Settings {
                    players: settings.players,
                    automated: settings.automated,
                },
            );
            for player in &session.players {
                session.write_record(
                    log,
                    &LogRecord::PlayerInfo {
                        name: player.name().to_string(),
                        color: player.color(),
                        automated: player.is_automated(),
                    },
                );
            }
        }
        Ok(session)
    }

    /// Builds the board and players for a named roster in turn order.
    fn from_roster(
        roster: Vec<(String, bool)>,
        log: Option<SessionLog>,
    ) -> Result<Self, SetupError> {
        if !matches!(roster.len(), 2 | 3 | 4 | 6) {
            return Err(SetupError::PlayerCount(roster.len()));
        }
        let mut board = Board::new();
        let mut players = Vec::with_capacity(roster.len());
        let anchors = starting_anchors(roster.len());
        let colors: Vec<PlayerColor> = PlayerColor::iter().take(roster.len()).collect();
        for (((name, automated), color), anchor) in roster.into_iter().zip(colors).zip(anchors) {
            let mut player = Player::new(name, color, automated);
            for (index, cell) in corner_cells(anchor).into_iter().enumerate() {
                let piece = Piece::handle(color, format!("{color}{index}"), cell);
                let placed = board.add_piece(piece.clone());
                // The corner layouts are disjoint and on the star.
                assert!(placed, "starting cell {cell} is not placeable");
                player.add_piece(piece);
            }
            for cell in corner_cells(opposite_anchor(anchor)) {
                player.add_target_cell(cell);
            }
            players.push(player);
        }
        Ok(Self {
            board,
            players,
            turn: 0,
            state: TurnState::AwaitingSelection,
            selected: None,
            valid_moves: HashSet::new(),
            move_accepted: true,
            winner: None,
            log,
        })
    }

    /// Rebuilds a session from a recorded stream: the settings and
    /// player-info records define the roster, then every turn record is
    /// applied through the same move path as live play. The turn passes
    /// to the successor of the last recorded mover.
    #[instrument(skip(records, log))]
    pub fn replay(records: &[LogRecord], log: Option<SessionLog>) -> Result<Self, ReplayError> {
        let mut counts = None;
        let mut roster = Vec::new();
        let mut colors = Vec::new();
        for record in records {
            match record {
                LogRecord::Settings { players, automated } => {
                    counts = Some((*players, *automated));
                }
                LogRecord::PlayerInfo {
                    name,
                    color,
                    automated,
                } => {
                    roster.push((name.clone(), *automated));
                    colors.push(*color);
                }
                _ => {}
            }
        }
        let (player_count, automated_count) = counts.ok_or(ReplayError::MissingSettings)?;
        let recorded_automated = roster.iter().filter(|(_, automated)| *automated).count();
        if roster.len() != player_count || recorded_automated != automated_count {
            return Err(ReplayError::RosterMismatch);
        }
        let mut session = Self::from_roster(roster, log)?;
        if session
            .players
            .iter()
            .zip(&colors)
            .any(|(player, color)| player.color() != *color)
        {
            return Err(ReplayError::RosterMismatch);
        }

        let mut last_mover = None;
        for record in records {
            let LogRecord::Turn {
                player,
                piece_id,
                from,
                to,
            } = record
            else {
                continue;
            };
            let index = session
                .players
                .iter()
                .position(|p| p.name() == player)
                .ok_or_else(|| ReplayError::UnknownPlayer(player.clone()))?;
            let piece = session
                .board
                .piece_by_cell(*from)
                .ok_or(ReplayError::VacantSource(*from))?;
            if piece.borrow().id() != piece_id.as_str() {
                return Err(ReplayError::PieceMismatch {
                    cell: *from,
                    expected: piece_id.clone(),
                });
            }
            if !session.board.move_piece(*from, *to)
                || !session.players[index].apply_move(*from, *to)
            {
                return Err(ReplayError::IllegalMove {
                    from: *from,
                    to: *to,
                });
            }
            debug!(player, %from, %to, "turn replayed");
            last_mover = Some(index);
        }
        if let Some(index) = last_mover {
            session.turn = (index + 1) % session.players.len();
        }
        if session.players.iter().any(Player::has_won) {
            session.finish_game();
        }
        Ok(session)
    }

    /// Feeds one cell selection into the turn state machine.
    ///
    /// In `AwaitingSelection` the cell must hold one of the turn-holder's
    /// pieces; its legal destinations are then cached and the session
    /// waits for a destination. In `AwaitingDestination` the cell must be
    /// an empty member of the cached set; the move is then committed and
    /// the turn ends. Anything else is rejected with the invalid-move
    /// flag raised, and a rejected destination also clears the selection,
    /// so the player starts the turn over. Returns whether the input was
    /// accepted.
    pub fn select(&mut self, cell: Cell) -> bool {
        match self.state {
            TurnState::AwaitingSelection => self.select_piece(cell),
            TurnState::AwaitingDestination => self.select_destination(cell),
            TurnState::GameOver => {
                debug!(%cell, "selection ignored: game is over");
                self.move_accepted = false;
                false
            }
        }
    }

    fn select_piece(&mut self, cell: Cell) -> bool {
        match self.board.content(cell) {
            CellContent::Occupied(piece)
                if piece.borrow().color() == self.players[self.turn].color() =>
            {
                self.valid_moves = self.board.legal_destinations(&piece);
                self.selected = Some(piece);
                self.state = TurnState::AwaitingDestination;
                self.move_accepted = true;
                true
            }
            _ => {
                debug!(%cell, "selection rejected");
                self.move_accepted = false;
                false
            }
        }
    }

    fn select_destination(&mut self, cell: Cell) -> bool {
        let Some(piece) = self.selected.take() else {
            // Destination phase with no selection is a state machine
            // defect; recover by restarting the turn.
            self.clear_selection();
            self.state = TurnState::AwaitingSelection;
            self.move_accepted = false;
            return false;
        };
        if self.board.content(cell).is_open() && self.valid_moves.contains(&cell) {
            let from = piece.borrow().cell();
            let piece_id = piece.borrow().id().to_string();
            self.clear_selection();
            self.commit_move(from, cell, piece_id);
            self.move_accepted = true;
            true
        } else {
            debug!(%cell, "destination rejected, selection cleared");
            self.clear_selection();
            self.state = TurnState::AwaitingSelection;
            self.move_accepted = false;
            false
        }
    }

    /// Plays one full turn for an automated turn-holder: a uniform-random
    /// piece among those with at least one legal destination, then a
    /// uniform-random destination. When no owned piece can move the turn
    /// is forfeited: nothing changes on the board and play passes on.
    /// Returns true if a move was made, false on a forfeit or after the
    /// game is over.
    #[instrument(skip(self), fields(player = %self.players[self.turn].name()))]
    pub fn automated_turn(&mut self) -> bool {
        if self.state == TurnState::GameOver {
            return false;
        }
        let player = &self.players[self.turn];
        let movable: Vec<PieceHandle> = player
            .pieces()
            .values()
            .filter(|piece| !self.board.legal_destinations(piece).is_empty())
            .cloned()
            .collect();
        let mut rng = rand::rng();
        let Some(piece) = movable.into_iter().choose(&mut rng) else {
            info!("no legal moves, turn forfeited");
            self.clear_selection();
            self.state = TurnState::AwaitingSelection;
            self.turn = (self.turn + 1) % self.players.len();
            self.move_accepted = true;
            return false;
        };
        let destinations = self.board.legal_destinations(&piece);
        let Some(destination) =
            self.players[self.turn].select_destination_for_automated_turn(&destinations)
        else {
            // Unreachable: the piece was chosen for having destinations.
            return false;
        };
        let from = piece.borrow().cell();
        let piece_id = piece.borrow().id().to_string();
        self.clear_selection();
        self.commit_move(from, destination, piece_id);
        self.move_accepted = true;
        true
    }

    /// Applies a validated move to board and owning player in lockstep,
    /// logs it, and finishes the turn.
    fn commit_move(&mut self, from: Cell, to: Cell, piece_id: String) {
        let player_name = self.players[self.turn].name().to_string();
        let moved =
            self.board.move_piece(from, to) && self.players[self.turn].apply_move(from, to);
        // A move that passed validation must land on both sides; anything
        // else is a broken invariant, not a rejectable input.
        assert!(moved, "board and player disagree on move {from} -> {to}");
        if let Some(log) = self.log.clone() {
            self.write_record(
                &log,
                &LogRecord::Turn {
                    player: player_name,
                    piece_id,
                    from,
                    to,
                },
            );
        }
        self.finish_turn();
    }

    fn finish_turn(&mut self) {
        if self.players.iter().any(Player::has_won) {
            self.finish_game();
        } else {
            self.turn = (self.turn + 1) % self.players.len();
            self.state = TurnState::AwaitingSelection;
        }
    }

    /// Declares the first winning player in turn order the winner and
    /// settles every score counter exactly once.
    fn finish_game(&mut self) {
        let Some(index) = self.players.iter().position(Player::has_won) else {
            return;
        };
        self.winner = Some(index);
        self.state = TurnState::GameOver;
        for (i, player) in self.players.iter_mut().enumerate() {
            if i == index {
                player.record_win();
            } else {
                player.record_loss();
            }
        }
        info!(winner = self.players[index].name(), "game over");
        if let Some(log) = self.log.clone() {
            self.write_record(&log, &LogRecord::GameOver);
        }
    }

    fn clear_selection(&mut self) {
        self.selected = None;
        self.valid_moves.clear();
    }

    /// Logging is best effort; a failed write must not corrupt a live
    /// game.
    fn write_record(&self, log: &SessionLog, record: &LogRecord) {
        if let Err(error) = log.append(record) {
            warn!(%error, path = %log.path().display(), "failed to append log record");
        }
    }

    /// The board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The players, in turn order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// The player whose turn it is.
    pub fn current_player(&self) -> &Player {
        &self.players[self.turn]
    }

    /// Where the session stands within the current turn.
    pub fn turn_state(&self) -> TurnState {
        self.state
    }

    /// The piece selected by the turn-holder, if any.
    pub fn selected_piece(&self) -> Option<&PieceHandle> {
        self.selected.as_ref()
    }

    /// The cached legal destinations for the selected piece.
    pub fn valid_moves(&self) -> &HashSet<Cell> {
        &self.valid_moves
    }

    /// Whether the most recent input was accepted. Rendering surfaces the
    /// negative case as an invalid-move message.
    pub fn last_input_accepted(&self) -> bool {
        self.move_accepted
    }

    /// The winner, once the game is over.
    pub fn winner(&self) -> Option<&Player> {
        self.winner.map(|index| &self.players[index])
    }

    /// Win/loss tallies per player, in turn order.
    pub fn scores(&self) -> Vec<(String, u32, u32)> {
        self.players
            .iter()
            .map(|p| (p.name().to_string(), p.wins(), p.losses()))
            .collect()
    }
}
