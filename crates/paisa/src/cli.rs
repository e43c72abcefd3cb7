//! Command-line interface definitions and handlers.

use clap::{Parser, Subcommand};
use paisa_core::FinancialSnapshot;
use paisa_error::{ConfigError, JsonError, PaisaResult};
use std::path::{Path, PathBuf};

use paisa::{InsightEngine, local_insights};

/// Paisa CLI arguments.
#[derive(Debug, Parser)]
#[command(name = "paisa", version, about = "AI-assisted financial insights")]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate a full AI analysis from a snapshot file
    Insights {
        /// Path to a snapshot JSON file
        #[arg(long)]
        snapshot: PathBuf,
    },
    /// Ask a one-off question about a snapshot
    Ask {
        /// The question to ask
        question: String,
        /// Path to a snapshot JSON file
        #[arg(long)]
        snapshot: PathBuf,
    },
    /// Print offline rule-based insights (no API calls)
    Local {
        /// Path to a snapshot JSON file
        #[arg(long)]
        snapshot: PathBuf,
    },
}

/// Load a snapshot from a JSON file.
pub fn load_snapshot(path: &Path) -> PaisaResult<FinancialSnapshot> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        ConfigError::new(format!("Failed to read snapshot {}: {}", path.display(), e))
    })?;
    serde_json::from_str(&raw).map_err(|e| {
        JsonError::new(format!("Failed to parse snapshot {}: {}", path.display(), e)).into()
    })
}

/// Run the `insights` command.
pub async fn run_insights(snapshot_path: &Path) -> PaisaResult<()> {
    let snapshot = load_snapshot(snapshot_path)?;
    let engine = InsightEngine::from_env()?;
    let insight = engine.generate_insights(&snapshot).await?;

    println!("Summary\n  {}", insight.summary());
    print_section("Recommendations", insight.recommendations());
    print_section("Warnings", insight.warnings());
    print_section("Opportunities", insight.opportunities());
    Ok(())
}

/// Run the `ask` command.
pub async fn run_ask(question: &str, snapshot_path: &Path) -> PaisaResult<()> {
    let snapshot = load_snapshot(snapshot_path)?;
    let engine = InsightEngine::from_env()?;
    let answer = engine.answer_question(question, &snapshot).await?;
    println!("{}", answer);
    Ok(())
}

/// Run the `local` command.
pub fn run_local(snapshot_path: &Path) -> PaisaResult<()> {
    let snapshot = load_snapshot(snapshot_path)?;
    for insight in local_insights(&snapshot) {
        println!("{}", insight);
    }
    Ok(())
}

fn print_section(title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!("\n{}", title);
    for item in items {
        println!("  - {}", item);
    }
}
