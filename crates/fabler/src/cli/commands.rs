//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Fabler - robot-narrated interactive story sessions
#[derive(Parser, Debug)]
#[command(name = "fabler")]
#[command(about = "Play robot-narrated interactive story session scripts", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Play a session script to the end
    Run {
        /// Session number; negative or absent plays the demo script
        #[arg(allow_negative_numbers = true)]
        session: Option<i64>,

        /// Participant ID; DEMO plays the demo script
        participant: Option<String>,

        /// Session script to play instead of the one chosen by session
        #[arg(long)]
        script: Option<PathBuf>,

        /// Seed for reproducible phrase picks and answer order
        #[arg(long)]
        seed: Option<u64>,

        /// Configuration file to use instead of the layered defaults
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Parse a script and show how each line would be interpreted
    Check {
        /// Script file to check
        file: PathBuf,
    },
}
