// Copyright (c) 2024-2025 SchemaScrape Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Schema catalog engine - the single external interface
//!
//! [`SchemaCatalogEngine`] composes database discovery and alias reconciliation
//! behind one precondition-checking entry point. It keeps no state between
//! calls apart from its collaborators, so independent calls may run
//! concurrently against the same engine.

use super::config::EngineConfig;
use super::discovery::DatabaseDiscovery;
use super::error::{require_parameter, CatalogError, CatalogResult};
use super::model::{Database, ReconcileConflict, ReconcileOutcome, ReconciledTable};
use super::query::{Db2QueryFragments, QueryFragment, Whitelist};
use super::reconciler::AliasReconciler;
use super::traits::{CatalogConnection, CatalogDataSource, QueryFragmentProvider};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Facade over discovery, reconciliation and the row-count probe
///
/// # Key Design Principles
/// - **Preconditions First**: blank creator/location fail before a connection is opened
/// - **Scoped Connections**: every operation opens its own connection and drops it on exit
/// - **Pure Reconciliation**: master lists are returned, never patched halfway
pub struct SchemaCatalogEngine {
    source: Arc<dyn CatalogDataSource>,
    queries: Arc<dyn QueryFragmentProvider>,
    config: EngineConfig,
}

impl SchemaCatalogEngine {
    /// Create an engine using the default DB2 query builder
    ///
    /// # Returns
    /// * `Err(CatalogError::Configuration)` if the configuration is invalid
    pub fn new(source: Arc<dyn CatalogDataSource>, config: EngineConfig) -> CatalogResult<Self> {
        let queries = Arc::new(Db2QueryFragments::new(config.clone())?);
        Ok(Self {
            source,
            queries,
            config,
        })
    }

    /// Create an engine with a custom query builder
    pub fn with_query_provider(
        source: Arc<dyn CatalogDataSource>,
        queries: Arc<dyn QueryFragmentProvider>,
        config: EngineConfig,
    ) -> CatalogResult<Self> {
        config.validate()?;
        Ok(Self {
            source,
            queries,
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Open a connection for callers driving [`Self::reconcile`] themselves
    pub fn open_connection(&self) -> CatalogResult<Box<dyn CatalogConnection + '_>> {
        self.source.open()
    }

    /// Whitelist as it is applied to every query
    pub fn effective_whitelist(&self, whitelist: &[String]) -> Whitelist {
        Whitelist::effective(whitelist, &self.config.system_alias_database)
    }

    fn discovery(&self) -> DatabaseDiscovery<'_> {
        DatabaseDiscovery::new(self.queries.as_ref(), &self.config.system_alias_database)
    }

    fn reconciler(&self) -> AliasReconciler<'_> {
        AliasReconciler::new(self.queries.as_ref(), &self.config.system_alias_database)
    }

    fn check_scope(creator: &str, location: &str) -> CatalogResult<()> {
        require_parameter("creator", creator)?;
        require_parameter("location", location)
    }

    /// Distinct databases owned by `creator` within the whitelist
    ///
    /// # Returns
    /// * `Ok(BTreeSet<Database>)` - each name once; empty when nothing matches
    /// * `Err(CatalogError::MissingRequiredParameter)` for a blank creator or location
    /// * `Err(CatalogError::QueryFailure)` if the catalog query fails
    pub fn get_databases_by_creator(
        &self,
        creator: &str,
        location: &str,
        whitelist: &[String],
    ) -> CatalogResult<BTreeSet<Database>> {
        Self::check_scope(creator, location)?;
        let connection = self.source.open()?;
        self.discovery()
            .databases_by_creator(connection.as_ref(), creator, location, whitelist)
    }

    /// Distinct database names owned by `creator`, without a whitelist
    pub fn get_logical_database_names(
        &self,
        creator: &str,
        location: &str,
    ) -> CatalogResult<BTreeSet<String>> {
        Self::check_scope(creator, location)?;
        let connection = self.source.open()?;
        self.discovery()
            .logical_database_names(connection.as_ref(), creator, location)
    }

    /// Number of rows in a catalog-exposed table
    ///
    /// # Returns
    /// * `Ok(Some(n))` for a table holding `n > 0` rows
    /// * `Ok(None)` when the table is empty or unknown to the catalog
    pub fn get_row_count(&self, catalog_table_name: &str) -> CatalogResult<Option<i64>> {
        require_parameter("catalog_table_name", catalog_table_name)?;
        let query = self.queries.build_row_count_query(catalog_table_name.trim())?;
        let connection = self.source.open()?;

        let rows = match connection.execute(&query) {
            Ok(rows) => rows,
            Err(CatalogError::ObjectNotFound(message)) => {
                log::debug!("Row count probe on unknown table: {}", message);
                return Ok(None);
            }
            Err(e) => return Err(e),
        };
        Ok(rows
            .first()
            .and_then(|row| row.value_at(0))
            .and_then(|value| value.as_i64())
            .filter(|count| *count > 0))
    }

    /// One unresolved entry per visible table row
    pub fn build_master_list(
        &self,
        creator: &str,
        location: &str,
        whitelist: &[String],
        extra_filter: Option<&QueryFragment>,
    ) -> CatalogResult<Vec<ReconciledTable>> {
        Self::check_scope(creator, location)?;
        let connection = self.source.open()?;
        self.master_list(connection.as_ref(), creator, location, whitelist, extra_filter)
    }

    fn master_list(
        &self,
        connection: &dyn CatalogConnection,
        creator: &str,
        location: &str,
        whitelist: &[String],
        extra_filter: Option<&QueryFragment>,
    ) -> CatalogResult<Vec<ReconciledTable>> {
        let whitelist = self.effective_whitelist(whitelist);
        let rows = self.discovery().table_rows(
            connection,
            creator,
            location,
            Some(&whitelist),
            extra_filter,
        )?;
        Ok(rows.iter().filter_map(ReconciledTable::from_row).collect())
    }

    /// Resolve physical entries from their own columns
    pub fn resolve_physical(
        &self,
        location: &str,
        entries: &[ReconciledTable],
        connection: &dyn CatalogConnection,
    ) -> CatalogResult<Vec<ReconciledTable>> {
        self.reconciler().resolve_physical(connection, location, entries)
    }

    /// Reconcile alias entries, returning the new master list
    pub fn reconcile(
        &self,
        location: &str,
        whitelist: &[String],
        entries: &[ReconciledTable],
        connection: &dyn CatalogConnection,
        extra_filter: Option<&QueryFragment>,
    ) -> CatalogResult<ReconcileOutcome> {
        self.reconciler()
            .reconcile(connection, location, whitelist, entries, extra_filter)
    }

    /// Reconcile a caller-owned master list in place
    ///
    /// The list is replaced only after the whole pass succeeds; on error it
    /// is left exactly as it was.
    pub fn reconcile_in_place(
        &self,
        location: &str,
        whitelist: &[String],
        entries: &mut Vec<ReconciledTable>,
        connection: &dyn CatalogConnection,
        extra_filter: Option<&QueryFragment>,
    ) -> CatalogResult<Vec<ReconcileConflict>> {
        let outcome = self.reconcile(location, whitelist, entries, connection, extra_filter)?;
        *entries = outcome.tables;
        Ok(outcome.conflicts)
    }

    /// Full inventory: master list, physical resolution, then alias reconciliation
    pub fn scrape_tables(
        &self,
        creator: &str,
        location: &str,
        whitelist: &[String],
        extra_filter: Option<&QueryFragment>,
    ) -> CatalogResult<ReconcileOutcome> {
        Self::check_scope(creator, location)?;
        let connection = self.source.open()?;
        let connection = connection.as_ref();

        let entries = self.master_list(connection, creator, location, whitelist, extra_filter)?;
        let entries = self.resolve_physical(location, &entries, connection)?;
        let outcome = self.reconcile(location, whitelist, &entries, connection, extra_filter)?;

        log::debug!(
            "Scraped {} table(s) for '{}' from {} ({} alias conflict(s))",
            outcome.tables.len(),
            creator,
            self.source.name(),
            outcome.conflicts.len()
        );
        Ok(outcome)
    }
}
