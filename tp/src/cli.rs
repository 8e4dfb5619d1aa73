//! CLI command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// TripPlanner - travel assistant backed by an LLM
#[derive(Debug, Parser)]
#[command(
    name = "tp",
    about = "Travel assistant that answers questions or generates structured itineraries",
    version = env!("CARGO_PKG_VERSION"),
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute (defaults to `serve`)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve {
        /// Address to bind (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Answer one query and print the JSON reply
    Ask {
        /// Travel question or itinerary request
        query: String,
    },

    /// Generate an itinerary for a destination and print it
    Plan {
        /// Place or trek to plan
        destination: String,
    },
}
