//! Star-board hop checkers rules engine.
//!
//! The crate implements the full rules of a multi-player board game on a
//! fixed star-shaped hexagonal grid: piece placement, single-step and
//! chained-jump move generation, turn sequencing for human and automated
//! players, and win detection.
//!
//! # Architecture
//!
//! - **Grid**: the immutable star geometry and adjacency queries
//! - **Board**: occupancy plus the jump-chain move-generation search
//! - **Player**: per-player piece and target-corner bookkeeping
//! - **GameSession**: the turn state machine driving a game to completion
//! - **Log**: the append-only session record format and replay
//!
//! Rendering, input collection, and prompting live outside the library;
//! the binary in this crate is a thin headless driver over the same API.
//!
//! # Example
//!
//! ```
//! use star_checkers::{GameSession, GameSettings};
//!
//! let settings = GameSettings::new(2, 1, vec!["Alice".into()]);
//! let mut session = GameSession::new(settings, None)?;
//! // Alice selects her corner tip, then one of its two steps.
//! assert!(session.select(star_checkers::Cell::new(3, 9)));
//! assert!(session.select(star_checkers::Cell::new(4, 8)));
//! # Ok::<(), star_checkers::SetupError>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod board;
mod cell;
mod grid;
mod log;
mod piece;
mod player;
mod session;
mod settings;

pub use board::{Board, CellContent};
pub use cell::{Cell, ParseCellError};
pub use grid::{COLS, Grid, ROWS};
pub use log::{LogError, LogRecord, RecordError, SessionLog, read_records};
pub use piece::{Piece, PieceHandle, PlayerColor};
pub use player::Player;
pub use session::{GameSession, ReplayError, TurnState};
pub use settings::{GameSettings, SetupError, corner_cells, opposite_anchor, starting_anchors};
