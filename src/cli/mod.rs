//! Command-line interface for ReelRate.

mod commands;

use clap::{Parser, Subcommand};

/// ReelRate - movie reviews and rating analytics
#[derive(Parser)]
#[command(name = "reelrate")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API until interrupted
    #[command(alias = "web")]
    Serve,

    /// Create default config file
    #[command(alias = "--init")]
    Init,

    /// Insert sample movies, users and reviews
    Seed,

    /// Print catalog statistics and the top rated movies
    Stats {
        /// Number of top movies to show
        #[arg(short, long)]
        limit: Option<String>,
    },
}

pub use commands::*;
