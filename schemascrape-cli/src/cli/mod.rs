// Copyright (c) 2024-2025 SchemaScrape Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! CLI module for SchemaScrape
//!
//! Opens a catalog source from a snapshot or a SQLite file and runs the
//! discovery, scrape and row-count operations against it.

pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{Cli, Commands};
pub use handlers::{handle_count, handle_databases, handle_tables};
