// Copyright (c) 2024-2025 SchemaScrape Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Collaborator traits
//!
//! The engine never talks to a database or renders SQL by itself. It asks a
//! [`QueryFragmentProvider`] for query text and runs it on a connection
//! obtained from a [`CatalogDataSource`].

use super::error::CatalogResult;
use super::mapping::CatalogRow;
use super::model::TableIdentity;
use super::query::{CatalogQuery, QueryFragment, Whitelist};

/// An open connection to a catalog
///
/// The connection is released when the handle is dropped, so it is returned
/// on every exit path of the operation that opened it.
pub trait CatalogConnection {
    /// Execute a query, returning rows in the order the catalog produced them
    ///
    /// # Returns
    /// * `Ok(Vec<CatalogRow>)` - possibly empty result set
    /// * `Err(CatalogError::QueryFailure)` if execution fails
    /// * `Err(CatalogError::ObjectNotFound)` if a referenced table does not exist
    fn execute(&self, query: &CatalogQuery) -> CatalogResult<Vec<CatalogRow>>;
}

/// Factory for catalog connections
pub trait CatalogDataSource: Send + Sync {
    /// Open a scoped connection
    fn open(&self) -> CatalogResult<Box<dyn CatalogConnection + '_>>;

    /// Human-readable name used in log messages
    fn name(&self) -> &str {
        "catalog"
    }
}

/// Pure builder of catalog query text
///
/// Implementations must not have side effects. Every query selects table
/// rows through the alias `T` and column rows through the alias `C`; the
/// whitelist and extra filter fragments refer to those aliases.
pub trait QueryFragmentProvider: Send + Sync {
    /// Identifier of the catalog table listing tables, for a location
    fn build_table_name_for(&self, location: &str) -> CatalogResult<String>;

    /// Identifier of the catalog table listing columns, for a location
    fn build_column_name_for(&self, location: &str) -> CatalogResult<String>;

    /// `DBNAME IN (...)` predicate over an effective whitelist
    fn build_whitelist_filter(&self, whitelist: &Whitelist) -> QueryFragment;

    /// Table rows of one creator, restricted to the recognized types
    ///
    /// # Arguments
    /// * `tables` - identifier from [`Self::build_table_name_for`]
    /// * `creator` - bound as the first parameter
    /// * `whitelist` - optional database filter
    /// * `extra_filter` - optional caller predicate over `T`
    fn build_table_query(
        &self,
        tables: &str,
        creator: &str,
        whitelist: Option<&QueryFragment>,
        extra_filter: Option<&QueryFragment>,
    ) -> CatalogResult<CatalogQuery>;

    /// Columns of alias targets, reached through whitelisted alias rows
    fn build_alias_column_query(
        &self,
        columns: &str,
        tables: &str,
        targets: &[TableIdentity],
        whitelist: &QueryFragment,
        extra_filter: Option<&QueryFragment>,
    ) -> CatalogResult<CatalogQuery>;

    /// Columns owned directly by one table
    fn build_column_detail_query(
        &self,
        columns: &str,
        table: &TableIdentity,
    ) -> CatalogResult<CatalogQuery>;

    /// `COUNT(*)` over an arbitrary catalog-exposed table
    fn build_row_count_query(&self, table: &str) -> CatalogResult<CatalogQuery>;
}
