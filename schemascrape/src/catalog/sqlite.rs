// Copyright (c) 2024-2025 SchemaScrape Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! SQLite catalog backend
//!
//! Serves a local copy of the catalog tables, either from a file or from an
//! in-memory database seeded with catalog rows. Queries produced by
//! [`Db2QueryFragments`](super::query::Db2QueryFragments) run unchanged when
//! the engine is configured with [`EngineConfig::sqlite`].

use super::config::EngineConfig;
use super::error::{CatalogError, CatalogResult};
use super::mapping::{CatalogEntity, CatalogRow, CatalogValue, FieldKind};
use super::model::{CatalogColumnRow, CatalogSnapshot, CatalogTableRow};
use super::query::{validate_identifier, CatalogQuery};
use super::traits::{CatalogConnection, CatalogDataSource};
use parking_lot::Mutex;
use rusqlite::types::{Value, ValueRef};
use rusqlite::{params_from_iter, Connection, OpenFlags};
use std::path::{Path, PathBuf};
use std::sync::Arc;

enum SourceKind {
    /// One connection shared by every handle; required for `:memory:` databases
    Shared(Arc<Mutex<Connection>>),
    /// A fresh connection per handle
    File(PathBuf),
}

/// [`CatalogDataSource`] backed by SQLite
pub struct SqliteCatalogSource {
    kind: SourceKind,
    name: String,
}

impl SqliteCatalogSource {
    /// Empty in-memory catalog
    pub fn in_memory() -> CatalogResult<Self> {
        let connection = Connection::open_in_memory()?;
        Ok(Self {
            kind: SourceKind::Shared(Arc::new(Mutex::new(connection))),
            name: "sqlite::memory".to_string(),
        })
    }

    /// Catalog stored in an existing SQLite file
    pub fn open_file(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let path = path.as_ref().to_path_buf();
        // Fail early on a missing or unreadable file rather than on first query.
        Connection::open_with_flags(&path, OpenFlags::SQLITE_OPEN_READ_WRITE)?;
        Ok(Self {
            name: format!("sqlite::{}", path.display()),
            kind: SourceKind::File(path),
        })
    }

    /// In-memory catalog holding the rows of a snapshot
    pub fn from_snapshot(snapshot: &CatalogSnapshot, config: &EngineConfig) -> CatalogResult<Self> {
        let source = Self::in_memory()?;
        let tables = format!("{}.{}", config.catalog_schema, config.tables_view);
        let columns = format!("{}.{}", config.catalog_schema, config.columns_view);
        source.seed_tables(&tables, &snapshot.tables)?;
        source.seed_columns(&columns, &snapshot.columns)?;
        log::debug!(
            "Loaded snapshot with {} table row(s) and {} column row(s)",
            snapshot.tables.len(),
            snapshot.columns.len()
        );
        Ok(source)
    }

    /// Create `identifier` with the table catalog layout if needed and insert `rows`
    pub fn seed_tables(&self, identifier: &str, rows: &[CatalogTableRow]) -> CatalogResult<()> {
        self.seed(identifier, rows)
    }

    /// Create `identifier` with the column catalog layout if needed and insert `rows`
    pub fn seed_columns(&self, identifier: &str, rows: &[CatalogColumnRow]) -> CatalogResult<()> {
        self.seed(identifier, rows)
    }

    fn seed<T: CatalogEntity>(&self, identifier: &str, rows: &[T]) -> CatalogResult<()> {
        validate_identifier(identifier)?;

        let definitions = T::FIELDS
            .iter()
            .map(|field| {
                let sql_type = match field.kind {
                    FieldKind::Text => "TEXT",
                    FieldKind::Integer => "INTEGER",
                };
                format!("\"{}\" {}", field.column, sql_type)
            })
            .collect::<Vec<_>>()
            .join(", ");
        let column_list = T::FIELDS
            .iter()
            .map(|field| format!("\"{}\"", field.column))
            .collect::<Vec<_>>()
            .join(", ");
        let create = format!("CREATE TABLE IF NOT EXISTS {} ({})", identifier, definitions);
        let insert = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            identifier,
            column_list,
            vec!["?"; T::FIELDS.len()].join(", ")
        );

        self.with_connection(|connection| {
            connection.execute(&create, [])?;
            let mut statement = connection.prepare(&insert)?;
            for row in rows {
                let values: Vec<Value> = row.to_values().iter().map(to_sql_value).collect();
                statement.execute(params_from_iter(values.iter()))?;
            }
            Ok(())
        })
    }

    fn with_connection<R>(
        &self,
        f: impl FnOnce(&Connection) -> CatalogResult<R>,
    ) -> CatalogResult<R> {
        match &self.kind {
            SourceKind::Shared(shared) => f(&shared.lock()),
            SourceKind::File(path) => f(&Connection::open(path)?),
        }
    }
}

impl CatalogDataSource for SqliteCatalogSource {
    fn open(&self) -> CatalogResult<Box<dyn CatalogConnection + '_>> {
        let handle = match &self.kind {
            SourceKind::Shared(shared) => Handle::Shared(Arc::clone(shared)),
            SourceKind::File(path) => Handle::Owned(Connection::open(path)?),
        };
        Ok(Box::new(SqliteCatalogConnection { handle }))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

enum Handle {
    Shared(Arc<Mutex<Connection>>),
    Owned(Connection),
}

struct SqliteCatalogConnection {
    handle: Handle,
}

impl CatalogConnection for SqliteCatalogConnection {
    fn execute(&self, query: &CatalogQuery) -> CatalogResult<Vec<CatalogRow>> {
        log::debug!("sqlite catalog query: {}", query);
        match &self.handle {
            Handle::Shared(shared) => run_query(&shared.lock(), query),
            Handle::Owned(connection) => run_query(connection, query),
        }
    }
}

fn run_query(connection: &Connection, query: &CatalogQuery) -> CatalogResult<Vec<CatalogRow>> {
    let mut statement = connection.prepare(&query.text)?;
    let columns: Vec<String> = statement
        .column_names()
        .into_iter()
        .map(String::from)
        .collect();
    let params: Vec<Value> = query.params.iter().map(to_sql_value).collect();

    let rows = statement.query_map(params_from_iter(params.iter()), |row| {
        let mut entries = Vec::with_capacity(columns.len());
        for (index, name) in columns.iter().enumerate() {
            entries.push((name.clone(), from_value_ref(row.get_ref(index)?)));
        }
        Ok(CatalogRow::new(entries))
    })?;

    let rows = rows.collect::<Result<Vec<_>, _>>().map_err(CatalogError::from)?;
    Ok(rows)
}

fn to_sql_value(value: &CatalogValue) -> Value {
    match value {
        CatalogValue::Null => Value::Null,
        CatalogValue::Integer(i) => Value::Integer(*i),
        CatalogValue::Real(r) => Value::Real(*r),
        CatalogValue::Text(s) => Value::Text(s.clone()),
    }
}

fn from_value_ref(value: ValueRef<'_>) -> CatalogValue {
    match value {
        ValueRef::Null => CatalogValue::Null,
        ValueRef::Integer(i) => CatalogValue::Integer(i),
        ValueRef::Real(r) => CatalogValue::Real(r),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            CatalogValue::Text(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_and_query_round_trip() {
        let source = SqliteCatalogSource::in_memory().unwrap();
        source
            .seed_tables(
                "main.SYSTABLES",
                &[CatalogTableRow {
                    name: "T1".into(),
                    database_name: "DB1".into(),
                    table_type: "T".into(),
                    creator: "TESTXX".into(),
                    target_creator: None,
                    location: None,
                    target_name: None,
                }],
            )
            .unwrap();

        let connection = source.open().unwrap();
        let rows = connection
            .execute(&CatalogQuery::new("SELECT \"NAME\", \"TBCREATOR\" FROM main.SYSTABLES"))
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("name"), Some(&CatalogValue::Text("T1".into())));
        assert_eq!(rows[0].get("TBCREATOR"), Some(&CatalogValue::Null));
    }

    #[test]
    fn test_unknown_table_maps_to_object_not_found() {
        let source = SqliteCatalogSource::in_memory().unwrap();
        let connection = source.open().unwrap();
        let err = connection
            .execute(&CatalogQuery::new("SELECT COUNT(*) FROM NOPE"))
            .unwrap_err();
        assert!(matches!(err, CatalogError::ObjectNotFound(_)));
    }

    #[test]
    fn test_seed_rejects_bad_identifier() {
        let source = SqliteCatalogSource::in_memory().unwrap();
        assert!(matches!(
            source.seed_columns("x; DROP TABLE y", &[]),
            Err(CatalogError::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn test_file_source_opens_fresh_connections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.sqlite");
        Connection::open(&path).unwrap();

        let source = SqliteCatalogSource::open_file(&path).unwrap();
        source.seed_columns("main.SYSCOLUMNS", &[CatalogColumnRow::default()]).unwrap();

        let connection = source.open().unwrap();
        let rows = connection
            .execute(&CatalogQuery::new("SELECT COUNT(*) FROM main.SYSCOLUMNS"))
            .unwrap();
        assert_eq!(rows[0].value_at(0).and_then(CatalogValue::as_i64), Some(1));
        assert!(source.name().starts_with("sqlite::"));
    }
}
