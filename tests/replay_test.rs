//! Tests for session logging and replay: a logged game rebuilds to the
//! same position, and corrupt streams are refused.

use star_checkers::{
    Board, Cell, GameSession, GameSettings, LogRecord, Piece, PlayerColor, ReplayError,
    SessionLog, TurnState, corner_cells, read_records,
};
use std::collections::{HashMap, VecDeque};
use tempfile::tempdir;

/// Plays two logged turns (one per player) and returns the log path.
fn logged_two_turn_game(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let path = dir.path().join("session.log");
    let log = SessionLog::create(&path).unwrap();
    let settings = GameSettings::new(2, 0, vec!["Alice".into(), "Bob".into()]);
    let mut session = GameSession::new(settings, Some(log)).unwrap();
    assert!(session.select(Cell::new(3, 9)));
    assert!(session.select(Cell::new(4, 8)));
    assert!(session.select(Cell::new(13, 15)));
    assert!(session.select(Cell::new(12, 16)));
    path
}

/// The setup records a two-human game writes before any turn.
fn roster_records() -> Vec<LogRecord> {
    vec![
        LogRecord::Settings {
            players: 2,
            automated: 0,
        },
        LogRecord::PlayerInfo {
            name: "Alice".into(),
            color: PlayerColor::Red,
            automated: false,
        },
        LogRecord::PlayerInfo {
            name: "Bob".into(),
            color: PlayerColor::Green,
            automated: false,
        },
    ]
}

/// Shortest route from `from` to `to` over currently empty cells, one
/// step per turn. Panics if no route exists.
fn step_path(board: &Board, from: Cell, to: Cell) -> Vec<Cell> {
    let mut queue = VecDeque::from([from]);
    let mut parent: HashMap<Cell, Cell> = HashMap::from([(from, from)]);
    while let Some(cell) = queue.pop_front() {
        if cell == to {
            break;
        }
        for next in board.grid().neighbors(cell) {
            if board.content(next).is_open() && !parent.contains_key(&next) {
                parent.insert(next, cell);
                queue.push_back(next);
            }
        }
    }
    let mut path = vec![to];
    let mut cursor = to;
    while parent[&cursor] != cursor {
        cursor = parent[&cursor];
        path.push(cursor);
    }
    path.pop();
    path.reverse();
    path
}

/// Walks one piece to `to` step by step, recording each move.
fn march(
    board: &mut Board,
    records: &mut Vec<LogRecord>,
    player: &str,
    piece_id: &str,
    from: Cell,
    to: Cell,
) {
    let mut at = from;
    for step in step_path(board, from, to) {
        assert!(board.move_piece(at, step));
        records.push(LogRecord::Turn {
            player: player.into(),
            piece_id: piece_id.into(),
            from: at,
            to: step,
        });
        at = step;
    }
}

/// A complete two-player game, planned on a shadow board: Bob clears his
/// corner into the western star point, then Alice walks all ten pieces
/// into the vacated corner, which wins for her.
fn winning_game_records() -> Vec<LogRecord> {
    let mut records = roster_records();
    let mut board = Board::new();
    let red_home = corner_cells(Cell::new(0, 12));
    let green_home = corner_cells(Cell::new(13, 9));
    for (i, cell) in red_home.iter().enumerate() {
        assert!(board.add_piece(Piece::handle(PlayerColor::Red, format!("red{i}"), *cell)));
    }
    for (i, cell) in green_home.iter().enumerate() {
        assert!(board.add_piece(Piece::handle(
            PlayerColor::Green,
            format!("green{i}"),
            *cell
        )));
    }
    // Greens leave outermost row first, so each departure has an exit.
    let refuge = corner_cells(Cell::new(4, 0));
    for (i, (from, to)) in green_home.iter().zip(&refuge).enumerate() {
        march(&mut board, &mut records, "Bob", &format!("green{i}"), *from, *to);
    }
    // Reds enter deepest target cells first; the home corner empties from
    // its widest row inward so every piece can get out.
    for (j, i) in (0..red_home.len()).rev().enumerate() {
        let goal = green_home[green_home.len() - 1 - j];
        march(
            &mut board,
            &mut records,
            "Alice",
            &format!("red{i}"),
            red_home[i],
            goal,
        );
    }
    records
}

#[test]
fn filling_the_target_corner_ends_the_replayed_game() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("finished.log");
    let log = SessionLog::create(&path).unwrap();

    let mut session = GameSession::replay(&winning_game_records(), Some(log)).unwrap();
    assert_eq!(session.turn_state(), TurnState::GameOver);
    assert_eq!(session.winner().unwrap().name(), "Alice");
    assert_eq!(session.scores(), vec![
        ("Alice".to_string(), 1, 0),
        ("Bob".to_string(), 0, 1),
    ]);
    assert!(session.players()[0].has_won());
    assert!(!session.players()[1].has_won());

    // The finished game accepts no further input of either kind.
    assert!(!session.select(Cell::new(13, 9)));
    assert!(!session.last_input_accepted());
    assert!(!session.automated_turn());
    assert_eq!(session.turn_state(), TurnState::GameOver);

    // The end of the game is the only record written by the replay.
    assert_eq!(read_records(&path).unwrap(), vec![LogRecord::GameOver]);
}

#[test]
fn a_logged_game_replays_to_the_same_position() {
    let dir = tempdir().unwrap();
    let path = logged_two_turn_game(&dir);

    let records = read_records(&path).unwrap();
    assert_eq!(records.len(), 5);
    assert!(matches!(records[0], LogRecord::Settings { players: 2, automated: 0 }));
    assert!(matches!(
        &records[3],
        LogRecord::Turn { player, .. } if player == "Alice"
    ));

    let session = GameSession::replay(&records, None).unwrap();
    assert_eq!(session.board().piece_count(), 20);
    let red = session.board().piece_by_cell(Cell::new(4, 8)).unwrap();
    assert_eq!(red.borrow().id(), "red6");
    assert!(session.board().piece_by_cell(Cell::new(3, 9)).is_none());
    let green = session.board().piece_by_cell(Cell::new(12, 16)).unwrap();
    assert_eq!(green.borrow().color(), PlayerColor::Green);
    assert!(session.board().piece_by_cell(Cell::new(13, 15)).is_none());
    // Bob moved last, so the replayed game is Alice's turn again.
    assert_eq!(session.current_player().name(), "Alice");
    assert!(session.winner().is_none());
}

#[test]
fn a_resumed_session_keeps_appending_to_the_log() {
    let dir = tempdir().unwrap();
    let path = logged_two_turn_game(&dir);

    let records = read_records(&path).unwrap();
    let mut session =
        GameSession::replay(&records, Some(SessionLog::resume(&path))).unwrap();
    assert!(session.select(Cell::new(4, 8)));
    assert!(session.select(Cell::new(5, 7)));

    let records = read_records(&path).unwrap();
    assert_eq!(records.len(), 6);
    assert!(matches!(
        &records[5],
        LogRecord::Turn { player, to, .. } if player == "Alice" && *to == Cell::new(5, 7)
    ));
}

#[test]
fn garbled_log_lines_abort_reading() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.log");
    std::fs::write(&path, "not a record at all\n").unwrap();
    assert!(read_records(&path).is_err());
}

#[test]
fn replay_requires_a_settings_record() {
    let records = [LogRecord::Turn {
        player: "Alice".into(),
        piece_id: "red0".into(),
        from: Cell::new(0, 12),
        to: Cell::new(1, 13),
    }];
    assert!(matches!(
        GameSession::replay(&records, None),
        Err(ReplayError::MissingSettings)
    ));
}

#[test]
fn replay_rejects_a_roster_that_contradicts_the_settings() {
    let mut records = roster_records();
    records.remove(2); // settings promise two players, only one recorded
    assert!(matches!(
        GameSession::replay(&records, None),
        Err(ReplayError::RosterMismatch)
    ));
}

#[test]
fn replay_rejects_turns_by_unknown_players() {
    let mut records = roster_records();
    records.push(LogRecord::Turn {
        player: "Mallory".into(),
        piece_id: "red0".into(),
        from: Cell::new(0, 12),
        to: Cell::new(1, 13),
    });
    assert!(matches!(
        GameSession::replay(&records, None),
        Err(ReplayError::UnknownPlayer(_))
    ));
}

#[test]
fn replay_rejects_a_turn_from_an_empty_cell() {
    let mut records = roster_records();
    records.push(LogRecord::Turn {
        player: "Alice".into(),
        piece_id: "red0".into(),
        from: Cell::new(8, 12),
        to: Cell::new(9, 13),
    });
    assert!(matches!(
        GameSession::replay(&records, None),
        Err(ReplayError::VacantSource(_))
    ));
}

#[test]
fn replay_rejects_a_turn_naming_the_wrong_piece() {
    let mut records = roster_records();
    records.push(LogRecord::Turn {
        player: "Alice".into(),
        piece_id: "red9".into(),
        from: Cell::new(0, 12),
        to: Cell::new(1, 13),
    });
    assert!(matches!(
        GameSession::replay(&records, None),
        Err(ReplayError::PieceMismatch { .. })
    ));
}

#[test]
fn replay_rejects_an_unreachable_recorded_move() {
    let mut records = roster_records();
    records.push(LogRecord::Turn {
        player: "Alice".into(),
        piece_id: "red6".into(),
        from: Cell::new(3, 9),
        to: Cell::new(8, 12),
    });
    assert!(matches!(
        GameSession::replay(&records, None),
        Err(ReplayError::IllegalMove { .. })
    ));
}
