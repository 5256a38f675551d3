// Copyright (c) 2024-2025 SchemaScrape Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Catalog data model
//!
//! Raw rows ([`CatalogTableRow`], [`CatalogColumnRow`]) are read-only records
//! returned by a catalog. [`ReconciledTable`] is the canonical inventory entry
//! produced from them and filled in by the reconciler.

use super::error::CatalogResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Catalog entry kinds that take part in discovery and reconciliation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TableType {
    /// Points at a target table's columns through a target name/creator
    Alias,
    /// Physical table owning its columns
    Table,
    /// Global temporary table, owns its columns like a physical table
    Global,
}

impl TableType {
    pub const ALL: [TableType; 3] = [TableType::Alias, TableType::Table, TableType::Global];

    /// Single-letter code used in the catalog `TYPE` column
    pub fn code(&self) -> &'static str {
        match self {
            TableType::Alias => "A",
            TableType::Table => "T",
            TableType::Global => "G",
        }
    }

    /// Parse a catalog type code; anything outside the closed set is `None`
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "A" | "a" => Some(TableType::Alias),
            "T" | "t" => Some(TableType::Table),
            "G" | "g" => Some(TableType::Global),
            _ => None,
        }
    }
}

impl fmt::Display for TableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// One raw catalog table entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogTableRow {
    pub name: String,
    pub database_name: String,
    /// Raw `TYPE` code; rows with unrecognized codes are ignored downstream
    pub table_type: String,
    pub creator: String,
    /// Present only on alias rows
    #[serde(default)]
    pub target_creator: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub target_name: Option<String>,
}

impl CatalogTableRow {
    pub fn recognized_type(&self) -> Option<TableType> {
        TableType::from_code(&self.table_type)
    }
}

/// One raw catalog column entry, owned by `(owning_table_name, owning_table_creator)`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CatalogColumnRow {
    pub name: String,
    pub owning_table_name: String,
    pub owning_table_creator: String,
    #[serde(default)]
    pub ordinal: i64,
    #[serde(default)]
    pub key_sequence: i64,
    #[serde(default)]
    pub length: i64,
    #[serde(default)]
    pub type_code: String,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default)]
    pub default: Option<String>,
    #[serde(default)]
    pub scale: i64,
}

/// Logical database derived from the `DBNAME` of visible catalog rows
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Database {
    pub name: String,
}

impl Database {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// `(name, creator)` pair identifying the table that owns a set of columns
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TableIdentity {
    pub name: String,
    pub creator: String,
}

impl TableIdentity {
    pub fn new(name: impl Into<String>, creator: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            creator: creator.into(),
        }
    }
}

impl fmt::Display for TableIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.creator, self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciledColumn {
    pub name: String,
    pub ordinal: i64,
    pub key_sequence: i64,
    pub length: i64,
    pub type_code: String,
    pub nullable: bool,
    pub default: Option<String>,
    pub scale: i64,
}

impl From<&CatalogColumnRow> for ReconciledColumn {
    fn from(row: &CatalogColumnRow) -> Self {
        Self {
            name: row.name.clone(),
            ordinal: row.ordinal,
            key_sequence: row.key_sequence,
            length: row.length,
            type_code: row.type_code.clone(),
            nullable: row.nullable,
            default: row.default.clone(),
            scale: row.scale,
        }
    }
}

/// Which resolution step produced a table's columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnSource {
    Physical,
    Alias,
}

/// Canonical inventory entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciledTable {
    pub table_type: TableType,
    pub location: Option<String>,
    pub name: String,
    /// Alias target name; a physical table's own name
    pub target_name: String,
    /// Alias target creator; a physical table's own creator
    pub owning_environment: String,
    pub database_name: String,
    pub columns: Vec<ReconciledColumn>,
    #[serde(default)]
    pub resolved_by: Option<ColumnSource>,
}

impl ReconciledTable {
    pub fn new(
        table_type: TableType,
        name: impl Into<String>,
        database_name: impl Into<String>,
        owning_environment: impl Into<String>,
    ) -> Self {
        let name = name.into();
        Self {
            table_type,
            location: None,
            target_name: name.clone(),
            name,
            owning_environment: owning_environment.into(),
            database_name: database_name.into(),
            columns: Vec::new(),
            resolved_by: None,
        }
    }

    /// Build an unresolved entry from a raw row. Unrecognized types yield `None`.
    pub fn from_row(row: &CatalogTableRow) -> Option<Self> {
        let table_type = row.recognized_type()?;
        let (target_name, owning_environment) = match table_type {
            TableType::Alias => (
                row.target_name.clone().unwrap_or_else(|| row.name.clone()),
                row.target_creator.clone().unwrap_or_default(),
            ),
            TableType::Table | TableType::Global => (row.name.clone(), row.creator.clone()),
        };
        Some(Self {
            table_type,
            location: row.location.clone(),
            name: row.name.clone(),
            target_name,
            owning_environment,
            database_name: row.database_name.clone(),
            columns: Vec::new(),
            resolved_by: None,
        })
    }

    pub fn with_target(mut self, target_name: impl Into<String>, target_creator: impl Into<String>) -> Self {
        self.target_name = target_name.into();
        self.owning_environment = target_creator.into();
        self
    }

    /// Attach columns the caller already knows; provenance is inferred from the type
    pub fn with_columns(mut self, columns: Vec<ReconciledColumn>) -> Self {
        self.columns = columns;
        self
    }

    pub fn is_alias(&self) -> bool {
        self.table_type == TableType::Alias
    }

    /// Identity whose columns this entry shows
    pub fn target_identity(&self) -> TableIdentity {
        TableIdentity::new(self.target_name.clone(), self.owning_environment.clone())
    }

    /// How the current columns were resolved; `None` while unresolved.
    ///
    /// Columns supplied by the caller without a recorded source count as
    /// physical unless the entry itself is an alias.
    pub fn resolution(&self) -> Option<ColumnSource> {
        if self.columns.is_empty() {
            return None;
        }
        Some(self.resolved_by.unwrap_or(if self.is_alias() {
            ColumnSource::Alias
        } else {
            ColumnSource::Physical
        }))
    }

    pub(crate) fn resolve(&mut self, columns: Vec<ReconciledColumn>, source: ColumnSource) {
        self.columns = columns;
        self.resolved_by = Some(source);
    }
}

/// Alias resolution discarded because a physical definition already existed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileConflict {
    pub name: String,
    pub alias_target: TableIdentity,
}

/// Result of one reconciliation pass
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReconcileOutcome {
    pub tables: Vec<ReconciledTable>,
    pub conflicts: Vec<ReconcileConflict>,
}

/// Offline dump of catalog rows
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    #[serde(default)]
    pub tables: Vec<CatalogTableRow>,
    #[serde(default)]
    pub columns: Vec<CatalogColumnRow>,
}

impl CatalogSnapshot {
    pub fn from_json_file(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}
