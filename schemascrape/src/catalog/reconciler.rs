// Copyright (c) 2024-2025 SchemaScrape Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Alias/physical column reconciliation
//!
//! Both resolution steps are pure: they read the catalog, then return a new
//! entry list derived from the input. Nothing is written until every query of
//! the pass has completed, so a failed pass exposes no partial state.
//!
//! Per table name the resolution state only moves forward:
//! unresolved -> physical, unresolved -> alias, or alias -> physical when a
//! physical definition turns up later. A physical resolution is never
//! replaced by an alias.

use super::error::{require_parameter, CatalogResult};
use super::mapping::query_as;
use super::model::{
    CatalogColumnRow, ColumnSource, ReconcileConflict, ReconcileOutcome, ReconciledColumn,
    ReconciledTable, TableIdentity,
};
use super::query::{QueryFragment, Whitelist};
use super::traits::{CatalogConnection, QueryFragmentProvider};
use std::collections::{BTreeMap, BTreeSet};

type ColumnsByTable = BTreeMap<TableIdentity, Vec<ReconciledColumn>>;

pub struct AliasReconciler<'a> {
    queries: &'a dyn QueryFragmentProvider,
    system_alias_database: &'a str,
}

impl<'a> AliasReconciler<'a> {
    pub fn new(queries: &'a dyn QueryFragmentProvider, system_alias_database: &'a str) -> Self {
        Self {
            queries,
            system_alias_database,
        }
    }

    /// Resolve alias entries against their target tables' columns
    ///
    /// For each alias name, the current state of `entries` decides the outcome:
    /// a physical definition with columns wins and the alias result is
    /// discarded (reported in [`ReconcileOutcome::conflicts`]); an earlier
    /// alias resolution is kept; otherwise the alias target's columns are
    /// written onto every entry sharing the name.
    ///
    /// # Arguments
    /// * `location` - catalog location the lookup runs against
    /// * `whitelist` - caller database names; the system alias database is added
    /// * `entries` - master list, left untouched
    /// * `extra_filter` - caller predicate over the alias rows (alias `T`)
    pub fn reconcile(
        &self,
        connection: &dyn CatalogConnection,
        location: &str,
        whitelist: &[String],
        entries: &[ReconciledTable],
        extra_filter: Option<&QueryFragment>,
    ) -> CatalogResult<ReconcileOutcome> {
        require_parameter("location", location)?;

        let alias_names = distinct_alias_names(entries);
        if alias_names.is_empty() {
            return Ok(ReconcileOutcome {
                tables: entries.to_vec(),
                conflicts: Vec::new(),
            });
        }

        let targets: BTreeSet<TableIdentity> = entries
            .iter()
            .filter(|entry| entry.is_alias())
            .map(ReconciledTable::target_identity)
            .filter(|target| !target.name.is_empty() && !target.creator.is_empty())
            .collect();
        let resolved = self.fetch_alias_columns(connection, location, whitelist, &targets, extra_filter)?;

        let mut tables = entries.to_vec();
        let mut conflicts = Vec::new();

        for name in &alias_names {
            let candidate = alias_candidate(&tables, name, &resolved);

            match name_state(&tables, name) {
                Some(ColumnSource::Physical) => {
                    if let Some((target, _)) = &candidate {
                        log::info!(
                            "A physical table with existing columns was found in the master list for '{}'; \
                             it takes precedence over alias target {}",
                            name,
                            target
                        );
                        conflicts.push(ReconcileConflict {
                            name: name.clone(),
                            alias_target: target.clone(),
                        });
                    }
                    converge(&mut tables, name, ColumnSource::Physical);
                }
                Some(ColumnSource::Alias) => {
                    log::debug!("Alias '{}' already resolved, keeping existing columns", name);
                    converge(&mut tables, name, ColumnSource::Alias);
                }
                None => match candidate {
                    Some((target, columns)) => {
                        log::debug!(
                            "Resolved alias '{}' to {} ({} column(s))",
                            name,
                            target,
                            columns.len()
                        );
                        for entry in tables.iter_mut().filter(|entry| &entry.name == name) {
                            entry.resolve(columns.clone(), ColumnSource::Alias);
                        }
                    }
                    None => log::debug!("No target columns found for alias '{}'", name),
                },
            }
        }

        Ok(ReconcileOutcome { tables, conflicts })
    }

    /// Resolve physical entries from their own `(name, creator)` columns
    ///
    /// Physical columns replace any alias resolution for the same name.
    pub fn resolve_physical(
        &self,
        connection: &dyn CatalogConnection,
        location: &str,
        entries: &[ReconciledTable],
    ) -> CatalogResult<Vec<ReconciledTable>> {
        require_parameter("location", location)?;

        let identities: BTreeSet<TableIdentity> = entries
            .iter()
            .filter(|entry| !entry.is_alias())
            .map(ReconciledTable::target_identity)
            .collect();
        if identities.is_empty() {
            return Ok(entries.to_vec());
        }

        let columns_table = self.queries.build_column_name_for(location)?;
        let mut resolved = ColumnsByTable::new();
        for identity in identities {
            let query = self
                .queries
                .build_column_detail_query(&columns_table, &identity)?;
            let columns = sorted_columns(query_as::<CatalogColumnRow>(connection, &query)?.iter());
            if !columns.is_empty() {
                resolved.insert(identity, columns);
            }
        }

        let mut tables = entries.to_vec();
        let mut claimed: BTreeSet<String> = BTreeSet::new();
        for (identity, columns) in &resolved {
            for entry in tables.iter_mut() {
                let same_table = !entry.is_alias() && entry.target_identity() == *identity;
                let shadowed_alias = entry.is_alias()
                    && entry.name == identity.name
                    && !claimed.contains(&identity.name);
                if same_table || shadowed_alias {
                    entry.resolve(columns.clone(), ColumnSource::Physical);
                }
            }
            claimed.insert(identity.name.clone());
        }
        log::debug!(
            "Resolved {} physical table(s) at '{}'",
            resolved.len(),
            location
        );
        Ok(tables)
    }

    fn fetch_alias_columns(
        &self,
        connection: &dyn CatalogConnection,
        location: &str,
        whitelist: &[String],
        targets: &BTreeSet<TableIdentity>,
        extra_filter: Option<&QueryFragment>,
    ) -> CatalogResult<ColumnsByTable> {
        if targets.is_empty() {
            return Ok(ColumnsByTable::new());
        }

        let tables = self.queries.build_table_name_for(location)?;
        let columns = self.queries.build_column_name_for(location)?;
        let whitelist = Whitelist::effective(whitelist, self.system_alias_database);
        let filter = self.queries.build_whitelist_filter(&whitelist);
        let targets: Vec<TableIdentity> = targets.iter().cloned().collect();
        let query = self
            .queries
            .build_alias_column_query(&columns, &tables, &targets, &filter, extra_filter)?;

        let mut grouped: BTreeMap<TableIdentity, Vec<CatalogColumnRow>> = BTreeMap::new();
        for row in query_as::<CatalogColumnRow>(connection, &query)? {
            let identity = TableIdentity::new(
                row.owning_table_name.clone(),
                row.owning_table_creator.clone(),
            );
            grouped.entry(identity).or_default().push(row);
        }
        Ok(grouped
            .into_iter()
            .map(|(identity, rows)| (identity, sorted_columns(rows.iter())))
            .collect())
    }
}

fn sorted_columns<'r>(rows: impl Iterator<Item = &'r CatalogColumnRow>) -> Vec<ReconciledColumn> {
    let mut columns: Vec<ReconciledColumn> = rows.map(ReconciledColumn::from).collect();
    columns.sort_by(|a, b| a.ordinal.cmp(&b.ordinal).then_with(|| a.name.cmp(&b.name)));
    columns.dedup();
    columns
}

/// Alias names in order of first appearance
fn distinct_alias_names(entries: &[ReconciledTable]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    entries
        .iter()
        .filter(|entry| entry.is_alias())
        .filter(|entry| seen.insert(entry.name.clone()))
        .map(|entry| entry.name.clone())
        .collect()
}

/// Current resolution of a name; physical anywhere beats alias anywhere
fn name_state(tables: &[ReconciledTable], name: &str) -> Option<ColumnSource> {
    let mut state = None;
    for entry in tables.iter().filter(|entry| entry.name == name) {
        match entry.resolution() {
            Some(ColumnSource::Physical) => return Some(ColumnSource::Physical),
            Some(ColumnSource::Alias) => state = Some(ColumnSource::Alias),
            None => {}
        }
    }
    state
}

/// First alias target (in a fixed order) under `name` that resolved to columns
fn alias_candidate(
    tables: &[ReconciledTable],
    name: &str,
    resolved: &ColumnsByTable,
) -> Option<(TableIdentity, Vec<ReconciledColumn>)> {
    let mut aliases: Vec<&ReconciledTable> = tables
        .iter()
        .filter(|entry| entry.is_alias() && entry.name == name)
        .collect();
    aliases.sort_by(|a, b| {
        (&a.database_name, &a.owning_environment, &a.target_name).cmp(&(
            &b.database_name,
            &b.owning_environment,
            &b.target_name,
        ))
    });
    aliases.into_iter().find_map(|alias| {
        let target = alias.target_identity();
        resolved
            .get(&target)
            .filter(|columns| !columns.is_empty())
            .map(|columns| (target, columns.clone()))
    })
}

/// Copy the winning columns onto entries of `name` not already resolved by `source`
///
/// Under a physical win this replaces alias-held columns as well, so every
/// entry sharing the name ends up with one column set.
fn converge(tables: &mut [ReconciledTable], name: &str, source: ColumnSource) {
    let mut winners: Vec<&ReconciledTable> = tables
        .iter()
        .filter(|entry| entry.name == name && entry.resolution() == Some(source))
        .collect();
    winners.sort_by(|a, b| {
        (&a.owning_environment, &a.database_name).cmp(&(&b.owning_environment, &b.database_name))
    });
    let Some(columns) = winners.first().map(|winner| winner.columns.clone()) else {
        return;
    };
    for entry in tables
        .iter_mut()
        .filter(|entry| entry.name == name && entry.resolution() != Some(source))
    {
        entry.resolve(columns.clone(), source);
    }
}
