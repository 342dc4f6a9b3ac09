//! CLI module for the operations API
//!
//! - `serve`: run the HTTP server
//! - `migrate`: create the PostgreSQL table and exit

pub mod migrate;
pub mod serve;

use clap::{Parser, Subcommand};

/// Operations API - REST resource for bank account operations
#[derive(Parser)]
#[command(name = "operations-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve(serve::ServeArgs),

    /// Create the operations table in PostgreSQL
    Migrate,
}
