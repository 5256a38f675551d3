// Copyright (c) 2024-2025 SchemaScrape Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Command-line argument definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "schemascrape")]
#[command(about = "Inventory DB2 catalog tables, aliases and columns", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    pub log_level: Option<log::Level>,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Engine configuration file (JSON)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where catalog rows come from
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Catalog snapshot (JSON) loaded into an in-memory catalog
    #[arg(long)]
    pub snapshot: Option<PathBuf>,

    /// SQLite file holding the catalog tables
    #[arg(long, conflicts_with = "snapshot")]
    pub database: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List databases holding tables of a creator
    Databases {
        /// Schema owner
        #[arg(long)]
        creator: String,

        /// Catalog location
        #[arg(long)]
        location: String,

        /// Comma-separated database whitelist; omit to list logical names
        #[arg(long, value_delimiter = ',')]
        whitelist: Option<Vec<String>>,
    },

    /// Scrape tables with their resolved columns
    Tables {
        /// Schema owner
        #[arg(long)]
        creator: String,

        /// Catalog location
        #[arg(long)]
        location: String,

        /// Comma-separated database whitelist
        #[arg(long, value_delimiter = ',', required = true)]
        whitelist: Vec<String>,
    },

    /// Row count of a catalog table
    Count {
        /// Table identifier, optionally qualified
        table: String,
    },

    /// Show version information
    Version,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}
