//! Append-only session log: one record per line.
//!
//! The format carries four record kinds, each a `+`-separated line with a
//! timestamp prefix and a trailing tag naming the kind. Replay reads the
//! records back in file order and feeds the turn records through the same
//! move path as live play.

use crate::cell::Cell;
use crate::piece::PlayerColor;
use chrono::Local;
use derive_more::{Display, Error, From};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const SETTINGS_TAG: &str = "Game Settings";
const PLAYER_INFO_TAG: &str = "Players Info";
const TURN_TAG: &str = "Turn";
const GAME_OVER_TAG: &str = "Game Over";

/// One line of the session log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogRecord {
    /// Player counts chosen at setup.
    Settings {
        /// Total players.
        players: usize,
        /// Automated players among them.
        automated: usize,
    },
    /// One player's identity, written in turn order.
    PlayerInfo {
        /// Player name.
        name: String,
        /// Player color.
        color: PlayerColor,
        /// Whether the player is automated.
        automated: bool,
    },
    /// One completed move.
    Turn {
        /// Name of the player who moved.
        player: String,
        /// Identifier of the moved piece.
        piece_id: String,
        /// Cell the piece left.
        from: Cell,
        /// Cell the piece landed on.
        to: Cell,
    },
    /// End-of-game marker.
    GameOver,
}

/// A line that could not be understood as a log record.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum RecordError {
    /// The trailing tag names no known record kind.
    #[display("unrecognized log record: {line:?}")]
    UnknownKind {
        /// The offending line.
        line: String,
    },
    /// The tag was recognized but the fields did not parse.
    #[display("malformed {kind} record: {line:?}")]
    Malformed {
        /// Record kind named by the tag.
        kind: &'static str,
        /// The offending line.
        line: String,
    },
}

impl LogRecord {
    /// Renders the record as a log line, stamped with the current local
    /// time.
    pub fn to_line(&self) -> String {
        let ts = Local::now().format(TIMESTAMP_FORMAT);
        match self {
            LogRecord::Settings { players, automated } => {
                format!("{ts},Game Settings: +{players}+{automated}+{SETTINGS_TAG}")
            }
            LogRecord::PlayerInfo {
                name,
                color,
                automated,
            } => {
                format!("{ts},Game Settings: +{name}+{color}+{automated}+{PLAYER_INFO_TAG}")
            }
            LogRecord::Turn {
                player,
                piece_id,
                from,
                to,
            } => format!("{ts}+{player}+{piece_id}+{from}+{to}+{TURN_TAG}"),
            LogRecord::GameOver => format!("{ts}+{GAME_OVER_TAG}"),
        }
    }

    /// Parses one log line.
    pub fn parse(line: &str) -> Result<Self, RecordError> {
        let trimmed = line.trim_end();
        let malformed = |kind| RecordError::Malformed {
            kind,
            line: trimmed.to_string(),
        };
        let parts: Vec<&str> = trimmed.split('+').collect();
        match *parts.last().unwrap_or(&"") {
            SETTINGS_TAG => {
                let [_, players, automated, _] = parts[..] else {
                    return Err(malformed(SETTINGS_TAG));
                };
                Ok(LogRecord::Settings {
                    players: players.parse().map_err(|_| malformed(SETTINGS_TAG))?,
                    automated: automated.parse().map_err(|_| malformed(SETTINGS_TAG))?,
                })
            }
            PLAYER_INFO_TAG => {
                let [_, name, color, automated, _] = parts[..] else {
                    return Err(malformed(PLAYER_INFO_TAG));
                };
                Ok(LogRecord::PlayerInfo {
                    name: name.to_string(),
                    color: PlayerColor::from_str(color.trim())
                        .map_err(|_| malformed(PLAYER_INFO_TAG))?,
                    automated: automated.trim().eq_ignore_ascii_case("true"),
                })
            }
            TURN_TAG => {
                let [_, player, piece_id, from, to, _] = parts[..] else {
                    return Err(malformed(TURN_TAG));
                };
                Ok(LogRecord::Turn {
                    player: player.to_string(),
                    piece_id: piece_id.to_string(),
                    from: from.parse().map_err(|_| malformed(TURN_TAG))?,
                    to: to.parse().map_err(|_| malformed(TURN_TAG))?,
                })
            }
            GAME_OVER_TAG => {
                let [_, _] = parts[..] else {
                    return Err(malformed(GAME_OVER_TAG));
                };
                Ok(LogRecord::GameOver)
            }
            _ => Err(RecordError::UnknownKind {
                line: trimmed.to_string(),
            }),
        }
    }
}

/// Failure reading or writing a session log file.
#[derive(Debug, Display, Error, From)]
pub enum LogError {
    /// The file could not be read or written.
    #[display("log file error: {_0}")]
    Io(std::io::Error),
    /// A line in the file is not a valid record.
    #[display("{_0}")]
    Record(RecordError),
}

/// Append-only writer for a session's log file.
#[derive(Debug, Clone)]
pub struct SessionLog {
    path: PathBuf,
}

impl SessionLog {
    /// Starts a fresh log at `path`, truncating any previous contents.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self, LogError> {
        let path = path.into();
        std::fs::write(&path, "")?;
        Ok(Self { path })
    }

    /// Reopens an existing log for continued appending.
    pub fn resume(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Appends one record.
    pub fn append(&self, record: &LogRecord) -> Result<(), LogError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", record.to_line())?;
        Ok(())
    }

    /// The log file's path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Reads every record of a log file, in file order. Blank lines are
/// skipped; any other unparseable line aborts with an error.
pub fn read_records(path: impl AsRef<Path>) -> Result<Vec<LogRecord>, LogError> {
    let text = std::fs::read_to_string(path)?;
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| LogRecord::parse(line).map_err(LogError::from))
        .collect()
}
