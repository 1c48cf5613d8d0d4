//! Fabler CLI binary.
//!
//! This binary provides command-line access to Fabler's functionality:
//! - Play a session script with a console stand-in for the robot and tablet
//! - Check how a script's lines parse

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, RunOptions, check_script, run_session};

    // Load .env file if present
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    // Initialize tracing; RUST_LOG wins over --verbose
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Run {
            session,
            participant,
            script,
            seed,
            config,
        } => {
            let options = RunOptions {
                session,
                participant,
                script,
                seed,
                config,
            };
            match run_session(options).await {
                Ok(summary) => {
                    println!(
                        "Session complete: {} stories told, {} commands in {}s",
                        summary.stories_told(),
                        summary.commands_executed(),
                        summary.elapsed().as_secs()
                    );
                }
                Err(e) => {
                    tracing::error!(error = %e, "Session stopped");
                    return Err(e.into());
                }
            }
        }

        Commands::Check { file } => {
            let invalid = check_script(&file).await?;
            if invalid > 0 {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
