// Copyright (c) 2024-2025 SchemaScrape Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Logical database discovery
//!
//! Databases have no identity of their own: they are the distinct `DBNAME`
//! values of the table rows a creator can see.

use super::error::{require_parameter, CatalogResult};
use super::mapping::query_as;
use super::model::{CatalogTableRow, Database};
use super::query::{QueryFragment, Whitelist};
use super::traits::{CatalogConnection, QueryFragmentProvider};
use std::collections::BTreeSet;

pub struct DatabaseDiscovery<'a> {
    queries: &'a dyn QueryFragmentProvider,
    system_alias_database: &'a str,
}

impl<'a> DatabaseDiscovery<'a> {
    pub fn new(queries: &'a dyn QueryFragmentProvider, system_alias_database: &'a str) -> Self {
        Self {
            queries,
            system_alias_database,
        }
    }

    /// Distinct databases of `creator` within the effective whitelist
    pub fn databases_by_creator(
        &self,
        connection: &dyn CatalogConnection,
        creator: &str,
        location: &str,
        whitelist: &[String],
    ) -> CatalogResult<BTreeSet<Database>> {
        let whitelist = Whitelist::effective(whitelist, self.system_alias_database);
        let rows = self.table_rows(connection, creator, location, Some(&whitelist), None)?;

        let databases: BTreeSet<Database> = rows
            .into_iter()
            .map(|row| Database::new(row.database_name))
            .collect();
        log::debug!(
            "Discovered {} database(s) for creator '{}' at '{}'",
            databases.len(),
            creator,
            location
        );
        Ok(databases)
    }

    /// Distinct database names of `creator` across the whole environment
    pub fn logical_database_names(
        &self,
        connection: &dyn CatalogConnection,
        creator: &str,
        location: &str,
    ) -> CatalogResult<BTreeSet<String>> {
        let rows = self.table_rows(connection, creator, location, None, None)?;
        Ok(rows.into_iter().map(|row| row.database_name).collect())
    }

    /// Raw table rows of `creator` whose type is recognized
    ///
    /// # Arguments
    /// * `whitelist` - `None` disables database filtering
    /// * `extra_filter` - caller predicate over the table rows (alias `T`)
    ///
    /// # Returns
    /// * `Err(CatalogError::MissingRequiredParameter)` before any query when
    ///   `creator` or `location` is blank
    pub fn table_rows(
        &self,
        connection: &dyn CatalogConnection,
        creator: &str,
        location: &str,
        whitelist: Option<&Whitelist>,
        extra_filter: Option<&QueryFragment>,
    ) -> CatalogResult<Vec<CatalogTableRow>> {
        require_parameter("creator", creator)?;
        require_parameter("location", location)?;

        let tables = self.queries.build_table_name_for(location)?;
        let filter = whitelist.map(|whitelist| self.queries.build_whitelist_filter(whitelist));
        let query =
            self.queries
                .build_table_query(&tables, creator.trim(), filter.as_ref(), extra_filter)?;

        // The provider is trusted to filter types, but the result set must stay closed.
        let rows = query_as::<CatalogTableRow>(connection, &query)?
            .into_iter()
            .filter(|row| row.recognized_type().is_some())
            .filter(|row| whitelist.map_or(true, |w| w.contains(&row.database_name)))
            .collect();
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::config::EngineConfig;
    use crate::catalog::error::CatalogError;
    use crate::catalog::mapping::{CatalogRow, CatalogValue};
    use crate::catalog::query::{CatalogQuery, Db2QueryFragments};
    use std::cell::RefCell;

    /// Returns canned rows and records every query it receives
    struct CannedConnection {
        rows: Vec<CatalogRow>,
        seen: RefCell<Vec<CatalogQuery>>,
    }

    impl CannedConnection {
        fn new(rows: &[(&str, &str, &str)]) -> Self {
            let rows = rows
                .iter()
                .map(|(name, database, table_type)| {
                    CatalogRow::new(vec![
                        ("NAME".into(), CatalogValue::from(*name)),
                        ("DBNAME".into(), CatalogValue::from(*database)),
                        ("TYPE".into(), CatalogValue::from(*table_type)),
                        ("CREATOR".into(), CatalogValue::from("TESTXX")),
                    ])
                })
                .collect();
            Self {
                rows,
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl CatalogConnection for CannedConnection {
        fn execute(&self, query: &CatalogQuery) -> CatalogResult<Vec<CatalogRow>> {
            self.seen.borrow_mut().push(query.clone());
            Ok(self.rows.clone())
        }
    }

    #[test]
    fn test_blank_parameters_fail_before_querying() {
        let provider = Db2QueryFragments::new(EngineConfig::sqlite()).unwrap();
        let discovery = DatabaseDiscovery::new(&provider, "DSNDB06");
        let connection = CannedConnection::new(&[]);

        let err = discovery
            .databases_by_creator(&connection, "", "HOMEDB2E", &[])
            .unwrap_err();
        assert_eq!(err, CatalogError::MissingRequiredParameter("creator".into()));

        let err = discovery
            .logical_database_names(&connection, "TESTXX", " ")
            .unwrap_err();
        assert_eq!(err, CatalogError::MissingRequiredParameter("location".into()));

        assert!(connection.seen.borrow().is_empty());
    }

    #[test]
    fn test_unrecognized_types_and_foreign_databases_are_dropped() {
        let provider = Db2QueryFragments::new(EngineConfig::sqlite()).unwrap();
        let discovery = DatabaseDiscovery::new(&provider, "DSNDB06");
        let connection = CannedConnection::new(&[
            ("T1", "DB1", "T"),
            ("T2", "DB1", "A"),
            ("V1", "DB1", "V"),
            ("T3", "DB9", "T"),
        ]);

        let databases = discovery
            .databases_by_creator(&connection, "TESTXX", "HOMEDB2E", &["DB1".into()])
            .unwrap();
        assert_eq!(databases.into_iter().collect::<Vec<_>>(), vec![Database::new("DB1")]);

        let query = connection.seen.borrow()[0].clone();
        assert_eq!(query.params[2], CatalogValue::from("DSNDB06"));
    }

    #[test]
    fn test_logical_names_ignore_whitelist() {
        let provider = Db2QueryFragments::new(EngineConfig::sqlite()).unwrap();
        let discovery = DatabaseDiscovery::new(&provider, "DSNDB06");
        let connection = CannedConnection::new(&[("T1", "DB1", "T"), ("T3", "DB9", "G")]);

        let names = discovery
            .logical_database_names(&connection, "TESTXX", "HOMEDB2E")
            .unwrap();
        assert_eq!(names.len(), 2);
        assert_eq!(connection.seen.borrow()[0].params.len(), 1);
    }
}
