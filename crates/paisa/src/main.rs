//! Paisa CLI binary.
//!
//! This binary provides command-line access to Paisa's functionality:
//! - Generate a full AI financial analysis from a snapshot file
//! - Ask one-off questions about a snapshot
//! - Print offline rule-based insights without touching the API

use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, run_ask, run_insights, run_local};

    // Load .env before reading credentials
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    // Initialize tracing
    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    // Execute the requested command
    match cli.command {
        Commands::Insights { snapshot } => {
            run_insights(&snapshot).await?;
        }

        Commands::Ask { question, snapshot } => {
            run_ask(&question, &snapshot).await?;
        }

        Commands::Local { snapshot } => {
            run_local(&snapshot)?;
        }
    }

    Ok(())
}
