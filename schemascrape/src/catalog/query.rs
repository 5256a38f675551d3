// Copyright (c) 2024-2025 SchemaScrape Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Query text generation
//!
//! [`Db2QueryFragments`] is the default [`QueryFragmentProvider`]. It renders
//! DB2 catalog queries that also run unchanged against a SQLite copy of the
//! catalog. Identifiers are validated before they are interpolated; every
//! caller-supplied value is a bound `?` parameter.

use super::config::EngineConfig;
use super::error::{CatalogError, CatalogResult};
use super::mapping::{CatalogEntity, CatalogValue, FieldMapping};
use super::model::{CatalogColumnRow, CatalogTableRow, TableIdentity, TableType};
use super::traits::QueryFragmentProvider;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static IDENTIFIER_PART: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_#$@]*$").expect("valid identifier regex"));

/// Check a one- to three-part catalog identifier such as `LOC.SYSIBM.SYSTABLES`
pub fn validate_identifier(identifier: &str) -> CatalogResult<()> {
    let parts: Vec<&str> = identifier.split('.').collect();
    if parts.len() > 3 || parts.iter().any(|part| !IDENTIFIER_PART.is_match(part)) {
        return Err(CatalogError::InvalidIdentifier(identifier.to_string()));
    }
    Ok(())
}

/// A predicate with its bound parameters
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryFragment {
    pub text: String,
    pub params: Vec<CatalogValue>,
}

impl QueryFragment {
    pub fn new(text: impl Into<String>, params: Vec<CatalogValue>) -> Self {
        Self {
            text: text.into(),
            params,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Ready-to-execute query text and its positional parameters
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CatalogQuery {
    pub text: String,
    pub params: Vec<CatalogValue>,
}

impl CatalogQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            params: Vec::new(),
        }
    }

    fn bind(mut self, value: impl Into<CatalogValue>) -> Self {
        self.params.push(value.into());
        self
    }

    fn and(mut self, fragment: &QueryFragment) -> Self {
        self.text.push_str(&format!(" AND ({})", fragment.text));
        self.params.extend(fragment.params.iter().cloned());
        self
    }

    fn and_optional(self, fragment: Option<&QueryFragment>) -> Self {
        match fragment {
            Some(fragment) if !fragment.is_empty() => self.and(fragment),
            _ => self,
        }
    }

    fn push(mut self, text: &str) -> Self {
        self.text.push_str(text);
        self
    }
}

impl fmt::Display for CatalogQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// Caller database names plus the system alias database
///
/// The system alias database is always present, whatever the caller passed.
/// Names are trimmed and de-duplicated, first occurrence wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Whitelist {
    names: Vec<String>,
}

impl Whitelist {
    pub fn effective(names: &[String], system_alias_database: &str) -> Self {
        let mut effective: Vec<String> = Vec::with_capacity(names.len() + 1);
        let candidates = names
            .iter()
            .map(|name| name.trim())
            .chain(std::iter::once(system_alias_database.trim()));
        for name in candidates {
            if !name.is_empty() && !effective.iter().any(|existing| existing == name) {
                effective.push(name.to_string());
            }
        }
        Self { names: effective }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|existing| existing == name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

fn select_list(alias: &str, fields: &[FieldMapping]) -> String {
    fields
        .iter()
        .map(|field| format!("{alias}.\"{col}\" AS \"{col}\"", col = field.column))
        .collect::<Vec<_>>()
        .join(", ")
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

/// Query builder for DB2 style catalogs
#[derive(Debug, Clone)]
pub struct Db2QueryFragments {
    config: EngineConfig,
}

impl Db2QueryFragments {
    pub fn new(config: EngineConfig) -> CatalogResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn qualified(&self, location: &str, view: &str) -> CatalogResult<String> {
        let identifier = if self.config.qualify_with_location {
            format!("{}.{}.{}", location.trim(), self.config.catalog_schema, view)
        } else {
            format!("{}.{}", self.config.catalog_schema, view)
        };
        validate_identifier(&identifier)?;
        Ok(identifier)
    }
}

impl QueryFragmentProvider for Db2QueryFragments {
    fn build_table_name_for(&self, location: &str) -> CatalogResult<String> {
        self.qualified(location, &self.config.tables_view)
    }

    fn build_column_name_for(&self, location: &str) -> CatalogResult<String> {
        self.qualified(location, &self.config.columns_view)
    }

    fn build_whitelist_filter(&self, whitelist: &Whitelist) -> QueryFragment {
        QueryFragment::new(
            format!("T.\"DBNAME\" IN ({})", placeholders(whitelist.len())),
            whitelist.names().iter().map(|name| name.as_str().into()).collect(),
        )
    }

    fn build_table_query(
        &self,
        tables: &str,
        creator: &str,
        whitelist: Option<&QueryFragment>,
        extra_filter: Option<&QueryFragment>,
    ) -> CatalogResult<CatalogQuery> {
        validate_identifier(tables)?;
        let types = TableType::ALL
            .iter()
            .map(|table_type| format!("'{}'", table_type.code()))
            .collect::<Vec<_>>()
            .join(", ");

        Ok(CatalogQuery::new(format!(
            "SELECT {} FROM {} T WHERE T.\"CREATOR\" = ? AND T.\"TYPE\" IN ({})",
            select_list("T", CatalogTableRow::FIELDS),
            tables,
            types
        ))
        .bind(creator)
        .and_optional(whitelist)
        .and_optional(extra_filter)
        .push(" ORDER BY T.\"DBNAME\", T.\"NAME\", T.\"TYPE\""))
    }

    fn build_alias_column_query(
        &self,
        columns: &str,
        tables: &str,
        targets: &[TableIdentity],
        whitelist: &QueryFragment,
        extra_filter: Option<&QueryFragment>,
    ) -> CatalogResult<CatalogQuery> {
        validate_identifier(columns)?;
        validate_identifier(tables)?;

        let target_predicate = if targets.is_empty() {
            "1 = 0".to_string()
        } else {
            vec!["(C.\"TBNAME\" = ? AND C.\"TBCREATOR\" = ?)"; targets.len()].join(" OR ")
        };

        let mut query = CatalogQuery::new(format!(
            "SELECT DISTINCT {} FROM {} C INNER JOIN {} T \
             ON T.\"TBNAME\" = C.\"TBNAME\" AND T.\"TBCREATOR\" = C.\"TBCREATOR\" \
             WHERE T.\"TYPE\" = '{}' AND ({})",
            select_list("C", CatalogColumnRow::FIELDS),
            columns,
            tables,
            TableType::Alias.code(),
            target_predicate
        ));
        for target in targets {
            query = query
                .bind(target.name.as_str())
                .bind(target.creator.as_str());
        }

        Ok(query
            .and(whitelist)
            .and_optional(extra_filter)
            .push(" ORDER BY \"TBCREATOR\", \"TBNAME\", \"COLNO\""))
    }

    fn build_column_detail_query(
        &self,
        columns: &str,
        table: &TableIdentity,
    ) -> CatalogResult<CatalogQuery> {
        validate_identifier(columns)?;
        Ok(CatalogQuery::new(format!(
            "SELECT {} FROM {} C WHERE C.\"TBNAME\" = ? AND C.\"TBCREATOR\" = ? ORDER BY C.\"COLNO\"",
            select_list("C", CatalogColumnRow::FIELDS),
            columns
        ))
        .bind(table.name.as_str())
        .bind(table.creator.as_str()))
    }

    fn build_row_count_query(&self, table: &str) -> CatalogResult<CatalogQuery> {
        validate_identifier(table)?;
        Ok(CatalogQuery::new(format!(
            "SELECT COUNT(*) AS \"ROW_COUNT\" FROM {}",
            table
        )))
    }
}
