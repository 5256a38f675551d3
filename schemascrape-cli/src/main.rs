// Copyright (c) 2024-2025 SchemaScrape Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! SchemaScrape CLI entry point

use clap::Parser;
use colored::Colorize;
use schemascrape::CatalogError;
use std::process::ExitCode;

mod cli;
use cli::{Cli, Commands};

fn main() -> ExitCode {
    // Parse command line arguments first to get log level
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        log::LevelFilter::Debug
    } else if let Some(level) = cli.log_level {
        level.to_level_filter()
    } else {
        // Default to Warn (can still be overridden by RUST_LOG env var)
        log::LevelFilter::Warn
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    let config = cli.config.as_deref();
    let result = match cli.command {
        Commands::Version => {
            println!("{} {}", "SchemaScrape".bold().green(), schemascrape::VERSION);
            println!("Cross-environment relational catalog reconciliation");
            Ok(())
        }

        Commands::Databases {
            creator,
            location,
            whitelist,
        } => cli::handle_databases(&cli.source, config, cli.format, creator, location, whitelist),

        Commands::Tables {
            creator,
            location,
            whitelist,
        } => cli::handle_tables(&cli.source, config, cli.format, creator, location, whitelist),

        Commands::Count { table } => cli::handle_count(&cli.source, config, cli.format, table),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => match err.downcast_ref::<CatalogError>() {
            Some(CatalogError::MissingRequiredParameter(name)) => {
                eprintln!("{} missing required parameter '{}'", "usage:".bold().red(), name);
                ExitCode::from(2)
            }
            _ => {
                eprintln!("{} {}", "error:".bold().red(), err);
                ExitCode::FAILURE
            }
        },
    }
}
