//! Star Checkers - headless terminal driver.
//!
//! The library owns all the rules; this binary only collects input,
//! renders the board as text, and reports results.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result, bail};
use clap::Parser;
use cli::{Cli, Command};
use star_checkers::{
    Cell, GameSession, GameSettings, LogRecord, SessionLog, TurnState, read_records,
};
use std::io::{BufRead, Write};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let session = match cli.command {
        Command::New {
            players,
            automated,
            names,
            log_file,
        } => {
            let log = match log_file {
                Some(path) => Some(SessionLog::create(path)?),
                None => None,
            };
            GameSession::new(GameSettings::new(players, automated, names), log)?
        }
        Command::Resume { file, keep_logging } => {
            let records = read_records(&file)?;
            if records.contains(&LogRecord::GameOver) {
                bail!("that game is already over; start a new one");
            }
            let log = keep_logging.then(|| SessionLog::resume(&file));
            info!(file = %file.display(), turns = records.len(), "resuming session");
            GameSession::replay(&records, log)?
        }
    };
    run(session)
}

/// Drives the session to completion, alternating automated turns and
/// stdin-driven human turns.
fn run(mut session: GameSession) -> Result<()> {
    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        println!("{}", session.board());
        if session.turn_state() == TurnState::GameOver {
            break;
        }
        let player = session.current_player();
        let name = player.name().to_string();
        println!("Current player: {} ({})", name, player.color());
        if player.is_automated() {
            if !session.automated_turn() {
                println!("{name} has no legal moves and passes.");
            }
            continue;
        }
        let prompt = match session.turn_state() {
            TurnState::AwaitingSelection => "select a piece (row col): ",
            _ => "select a destination (row col): ",
        };
        let Some(cell) = read_cell(&mut lines, prompt)? else {
            bail!("input closed before the game ended");
        };
        if !session.select(cell) {
            println!("Invalid move, please select again.");
        }
    }

    if let Some(winner) = session.winner() {
        println!("The winner is: {}", winner.name());
    }
    for (name, wins, losses) in session.scores() {
        println!("{name}: {wins} wins, {losses} losses");
    }
    Ok(())
}

/// Prompts until a `row col` pair parses; `None` on end of input.
fn read_cell(
    lines: &mut impl Iterator<Item = std::io::Result<String>>,
    prompt: &str,
) -> Result<Option<Cell>> {
    loop {
        print!("{prompt}");
        std::io::stdout().flush().context("flushing prompt")?;
        let Some(line) = lines.next() else {
            return Ok(None);
        };
        let line = line.context("reading selection")?;
        let mut fields = line.split_whitespace();
        if let (Some(row), Some(col)) = (fields.next(), fields.next())
            && let (Ok(row), Ok(col)) = (row.parse(), col.parse())
            && fields.next().is_none()
        {
            return Ok(Some(Cell::new(row, col)));
        }
        println!("Enter two numbers, e.g. `3 9`.");
    }
}
