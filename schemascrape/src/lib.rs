// Copyright (c) 2024-2025 SchemaScrape Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! SchemaScrape - cross-environment relational catalog reconciliation
//!
//! SchemaScrape reads raw catalog metadata (table, alias and column definitions)
//! from a relational catalog, filters it against a database whitelist and
//! reconciles alias definitions against physical tables that share a name,
//! producing one column-populated table inventory per logical database.
//!
//! # Features
//!
//! - **Database Discovery**: distinct logical databases visible to a creator
//! - **Alias Reconciliation**: physical definitions always win over alias targets
//! - **Pluggable Catalogs**: any backend implementing [`CatalogDataSource`]
//! - **SQLite Backend**: in-memory or file catalogs behind the `sqlite` feature
//!
//! # Usage
//!
//! ```ignore
//! let source = SqliteCatalogSource::from_snapshot(&snapshot, &EngineConfig::sqlite())?;
//! let engine = SchemaCatalogEngine::new(Arc::new(source), EngineConfig::sqlite())?;
//! let databases = engine.get_databases_by_creator("TESTXX", "HOMEDB2E", &["DB1".into()])?;
//! ```

pub mod catalog;

pub use catalog::config::EngineConfig;
pub use catalog::engine::SchemaCatalogEngine;
pub use catalog::error::{CatalogError, CatalogResult};
pub use catalog::model::{
    CatalogColumnRow, CatalogSnapshot, CatalogTableRow, ColumnSource, Database, ReconcileConflict,
    ReconcileOutcome, ReconciledColumn, ReconciledTable, TableIdentity, TableType,
};
pub use catalog::query::{CatalogQuery, Db2QueryFragments, QueryFragment, Whitelist};
pub use catalog::traits::{CatalogConnection, CatalogDataSource, QueryFragmentProvider};

#[cfg(feature = "sqlite")]
pub use catalog::sqlite::SqliteCatalogSource;

/// SchemaScrape version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
