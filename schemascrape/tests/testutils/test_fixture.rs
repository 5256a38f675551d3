//! Test fixture for SchemaScrape integration tests
//!
//! Seeds an in-memory SQLite catalog with table and column rows and exposes an
//! engine configured for it. Every fixture owns its own database, so tests
//! never share catalog state.

#![allow(dead_code)]

use schemascrape::catalog::traits::CatalogDataSource;
use schemascrape::{
    CatalogColumnRow, CatalogTableRow, EngineConfig, ReconciledColumn, ReconciledTable,
    SchemaCatalogEngine, SqliteCatalogSource,
};
use std::sync::Arc;

pub const MATCHING_CREATOR: &str = "TESTXX";
pub const MATCHING_ALIAS_CREATOR: &str = "ALIASCREATOR";
pub const MATCHING_LOCATION: &str = "HOMEDB2E";
pub const MATCHING_DATABASE: &str = "DB1";
pub const SYSTEM_ALIAS_DATABASE: &str = "DSNDB06";
pub const TABLES: &str = "main.SYSTABLES";
pub const COLUMNS: &str = "main.SYSCOLUMNS";

/// Engine over an isolated in-memory catalog
pub struct TestFixture {
    pub engine: SchemaCatalogEngine,
    pub source: Arc<SqliteCatalogSource>,
}

impl TestFixture {
    /// Fixture loaded with the standard four tables and two columns
    pub fn new() -> Self {
        Self::with_rows(&standard_tables(), &standard_columns())
    }

    /// Fixture loaded with the given rows
    pub fn with_rows(tables: &[CatalogTableRow], columns: &[CatalogColumnRow]) -> Self {
        let source = SqliteCatalogSource::in_memory().expect("Failed to create in-memory catalog");
        source
            .seed_tables(TABLES, tables)
            .expect("Failed to seed table rows");
        source
            .seed_columns(COLUMNS, columns)
            .expect("Failed to seed column rows");
        Self::from_source(source)
    }

    /// Fixture whose catalog only has a table catalog, so column lookups fail
    pub fn without_column_catalog(tables: &[CatalogTableRow]) -> Self {
        let source = SqliteCatalogSource::in_memory().expect("Failed to create in-memory catalog");
        source
            .seed_tables(TABLES, tables)
            .expect("Failed to seed table rows");
        Self::from_source(source)
    }

    fn from_source(source: SqliteCatalogSource) -> Self {
        let source = Arc::new(source);
        let engine = SchemaCatalogEngine::new(
            Arc::clone(&source) as Arc<dyn CatalogDataSource>,
            EngineConfig::sqlite(),
        )
        .expect("Failed to create engine");
        Self { engine, source }
    }

    /// Unresolved master list for the matching creator within `whitelist`
    pub fn master_list(&self, whitelist: &[&str]) -> Vec<ReconciledTable> {
        self.engine
            .build_master_list(MATCHING_CREATOR, MATCHING_LOCATION, &names(whitelist), None)
            .expect("Failed to build master list")
    }
}

pub fn names(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

pub fn table_row(name: &str, database: &str, table_type: &str, creator: &str) -> CatalogTableRow {
    CatalogTableRow {
        name: name.to_string(),
        database_name: database.to_string(),
        table_type: table_type.to_string(),
        creator: creator.to_string(),
        target_creator: None,
        location: None,
        target_name: None,
    }
}

pub fn alias_row(
    name: &str,
    database: &str,
    creator: &str,
    target_creator: &str,
    target_name: &str,
) -> CatalogTableRow {
    CatalogTableRow {
        target_creator: Some(target_creator.to_string()),
        target_name: Some(target_name.to_string()),
        ..table_row(name, database, "A", creator)
    }
}

pub fn column_row(name: &str, table: &str, creator: &str, ordinal: i64) -> CatalogColumnRow {
    CatalogColumnRow {
        name: name.to_string(),
        owning_table_name: table.to_string(),
        owning_table_creator: creator.to_string(),
        ordinal,
        key_sequence: 1,
        length: 1,
        type_code: "1".to_string(),
        nullable: false,
        default: Some("0".to_string()),
        scale: 0,
    }
}

pub fn reconciled_column(name: &str) -> ReconciledColumn {
    ReconciledColumn::from(&column_row(name, "", "", 1))
}

/// One alias, one physical table, one row of an unknown type and one row of
/// another creator
pub fn standard_tables() -> Vec<CatalogTableRow> {
    vec![
        CatalogTableRow {
            location: Some("ALIASLOCATION1".to_string()),
            ..alias_row(
                "ALIASTABLE1",
                MATCHING_DATABASE,
                MATCHING_CREATOR,
                MATCHING_ALIAS_CREATOR,
                "ALIASTABLE1",
            )
        },
        table_row("PHYSICALTABLE2", MATCHING_DATABASE, "T", MATCHING_CREATOR),
        table_row("TABLE1", "DB2_NOT_MATCH", "TYPE_NOT_MATCH", MATCHING_CREATOR),
        table_row("GLOBALTABLE1", "DB3_NOT_MATCH", "G", "CREATOR_NOT_MATCH"),
    ]
}

pub fn standard_columns() -> Vec<CatalogColumnRow> {
    vec![
        column_row("COLUMN1", "TABLE1", MATCHING_CREATOR, 1),
        column_row("ALIASCOLUMN1", "ALIASTABLE1", MATCHING_ALIAS_CREATOR, 1),
    ]
}

/// Standard rows plus a physical table sharing the alias name
pub fn tables_with_shadowing_physical() -> Vec<CatalogTableRow> {
    let mut tables = standard_tables();
    tables.push(table_row("ALIASTABLE1", MATCHING_DATABASE, "T", MATCHING_CREATOR));
    tables
}

pub fn columns_with_shadowing_physical() -> Vec<CatalogColumnRow> {
    let mut columns = standard_columns();
    columns.push(column_row("COLUMN1", "ALIASTABLE1", MATCHING_CREATOR, 1));
    columns
}
