//! Command-line interface for the headless game driver.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Star Checkers - star-board hop checkers in the terminal
#[derive(Parser, Debug)]
#[command(name = "star_checkers")]
#[command(about = "Headless driver for star-board hop checkers", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start a new game
    New {
        /// Total number of players (2, 3, 4 or 6)
        #[arg(short, long, default_value = "2")]
        players: usize,

        /// Number of automated players (fewer than the total)
        #[arg(short, long, default_value = "0")]
        automated: usize,

        /// Human player names, one per human, in turn order
        #[arg(short, long = "name")]
        names: Vec<String>,

        /// Append a session log to this file
        #[arg(long)]
        log_file: Option<PathBuf>,
    },

    /// Resume a logged game from its session log
    Resume {
        /// Session log to replay
        file: PathBuf,

        /// Keep appending new turns to the same log
        #[arg(long)]
        keep_logging: bool,
    },
}
