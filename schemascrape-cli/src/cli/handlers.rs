// Copyright (c) 2024-2025 SchemaScrape Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! CLI command handlers for SchemaScrape

use std::error::Error;
use std::path::Path;
use std::sync::Arc;

use super::commands::{OutputFormat, SourceArgs};
use super::output::CatalogFormatter;
use schemascrape::{
    CatalogError, CatalogSnapshot, EngineConfig, SchemaCatalogEngine, SqliteCatalogSource,
};

/// Open an engine over the catalog named on the command line
///
/// Both local sources hold plain SQLite tables, so the SQLite preset is used
/// unless a configuration file says otherwise.
fn open_engine(
    source: &SourceArgs,
    config: Option<&Path>,
) -> Result<SchemaCatalogEngine, Box<dyn Error>> {
    let config = match config {
        Some(path) => EngineConfig::from_json_file(path)?,
        None => EngineConfig::sqlite(),
    };

    let catalog = if let Some(path) = &source.snapshot {
        let snapshot = CatalogSnapshot::from_json_file(path)?;
        log::info!(
            "Loaded snapshot {:?} ({} table rows, {} column rows)",
            path,
            snapshot.tables.len(),
            snapshot.columns.len()
        );
        SqliteCatalogSource::from_snapshot(&snapshot, &config)?
    } else if let Some(path) = &source.database {
        SqliteCatalogSource::open_file(path)?
    } else {
        return Err(CatalogError::Configuration(
            "no catalog source; pass --snapshot <file> or --database <file>".to_string(),
        )
        .into());
    };

    Ok(SchemaCatalogEngine::new(Arc::new(catalog), config)?)
}

/// Handle the databases command
pub fn handle_databases(
    source: &SourceArgs,
    config: Option<&Path>,
    format: OutputFormat,
    creator: String,
    location: String,
    whitelist: Option<Vec<String>>,
) -> Result<(), Box<dyn Error>> {
    let engine = open_engine(source, config)?;

    let names: Vec<String> = match whitelist {
        Some(whitelist) => engine
            .get_databases_by_creator(&creator, &location, &whitelist)?
            .into_iter()
            .map(|database| database.name)
            .collect(),
        None => engine
            .get_logical_database_names(&creator, &location)?
            .into_iter()
            .collect(),
    };

    print!("{}", CatalogFormatter::databases(&names, format));
    Ok(())
}

/// Handle the tables command
pub fn handle_tables(
    source: &SourceArgs,
    config: Option<&Path>,
    format: OutputFormat,
    creator: String,
    location: String,
    whitelist: Vec<String>,
) -> Result<(), Box<dyn Error>> {
    let engine = open_engine(source, config)?;
    let outcome = engine.scrape_tables(&creator, &location, &whitelist, None)?;

    print!("{}", CatalogFormatter::tables(&outcome, format));
    Ok(())
}

/// Handle the count command
pub fn handle_count(
    source: &SourceArgs,
    config: Option<&Path>,
    format: OutputFormat,
    table: String,
) -> Result<(), Box<dyn Error>> {
    let engine = open_engine(source, config)?;
    let count = engine.get_row_count(&table)?;

    print!("{}", CatalogFormatter::row_count(&table, count, format));
    Ok(())
}
