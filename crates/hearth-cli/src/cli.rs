//! Command-line interface definitions and parsing

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<String>,

    /// JSON fixture to seed the in-memory backend (defaults to the demo data)
    #[arg(short, long)]
    pub fixture: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a path through the auth guard and render the result
    Route {
        /// Path such as `/` or `/topic/ai`
        path: String,
        /// Sign in as this fixture user first
        #[arg(long = "as", value_name = "UID")]
        as_user: Option<String>,
    },
    /// List the trending topics and their routes
    Topics,
    /// Run the unread poller and print each published snapshot
    Watch {
        /// Sign in as this fixture user first
        #[arg(long = "as", value_name = "UID")]
        as_user: Option<String>,
        /// Stop after this many snapshots
        #[arg(short, long)]
        ticks: Option<u64>,
    },
    /// Load the notifications page and mark it read
    Notifications {
        /// Fixture user whose notifications to load
        #[arg(long = "as", value_name = "UID")]
        as_user: String,
    },
    /// Print the effective configuration as TOML
    Config,
}
