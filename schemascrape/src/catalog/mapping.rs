// Copyright (c) 2024-2025 SchemaScrape Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Static field-to-column mapping between catalog entities and result rows
//!
//! Each entity declares its catalog columns once in [`CatalogEntity::FIELDS`].
//! Select lists, seeding DDL and row decoding are all derived from that table.

use super::error::{CatalogError, CatalogResult};
use super::model::{CatalogColumnRow, CatalogTableRow};
use super::query::CatalogQuery;
use super::traits::CatalogConnection;
use serde::{Deserialize, Serialize};

/// A single value returned by (or bound into) a catalog query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CatalogValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl CatalogValue {
    /// Text form of the value; catalogs pad CHAR columns, so text is trimmed
    pub fn as_text(&self) -> Option<String> {
        match self {
            CatalogValue::Null => None,
            CatalogValue::Integer(i) => Some(i.to_string()),
            CatalogValue::Real(r) => Some(r.to_string()),
            CatalogValue::Text(s) => Some(s.trim_end().to_string()),
        }
    }

    /// Integer form of the value, parsing numeric text
    ///
    /// Reals convert only when they are whole numbers within `i64` range.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CatalogValue::Null => None,
            CatalogValue::Integer(i) => Some(*i),
            CatalogValue::Real(r) => {
                let whole = r.fract() == 0.0 && *r >= i64::MIN as f64 && *r < i64::MAX as f64;
                whole.then_some(*r as i64)
            }
            CatalogValue::Text(s) => s.trim().parse().ok(),
        }
    }

    /// `Y`, `1` and `true` are truthy
    pub fn as_bool(&self) -> bool {
        match self {
            CatalogValue::Integer(i) => *i != 0,
            CatalogValue::Text(s) => matches!(
                s.trim().to_ascii_uppercase().as_str(),
                "Y" | "YES" | "1" | "TRUE"
            ),
            _ => false,
        }
    }
}

impl From<&str> for CatalogValue {
    fn from(value: &str) -> Self {
        CatalogValue::Text(value.to_string())
    }
}

impl From<String> for CatalogValue {
    fn from(value: String) -> Self {
        CatalogValue::Text(value)
    }
}

impl From<i64> for CatalogValue {
    fn from(value: i64) -> Self {
        CatalogValue::Integer(value)
    }
}

impl<T: Into<CatalogValue>> From<Option<T>> for CatalogValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(CatalogValue::Null)
    }
}

/// One result row: column names paired with values, in select order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CatalogRow {
    entries: Vec<(String, CatalogValue)>,
}

impl CatalogRow {
    pub fn new(entries: Vec<(String, CatalogValue)>) -> Self {
        Self { entries }
    }

    /// Case-insensitive lookup by column name
    pub fn get(&self, column: &str) -> Option<&CatalogValue> {
        self.entries
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(column))
            .map(|(_, value)| value)
    }

    pub fn value_at(&self, index: usize) -> Option<&CatalogValue> {
        self.entries.get(index).map(|(_, value)| value)
    }

    fn required_text(&self, column: &str) -> CatalogResult<String> {
        self.get(column)
            .and_then(CatalogValue::as_text)
            .ok_or_else(|| CatalogError::RowMapping(format!("column {} is missing or NULL", column)))
    }

    fn optional_text(&self, column: &str) -> Option<String> {
        self.get(column)
            .and_then(CatalogValue::as_text)
            .filter(|s| !s.is_empty())
    }

    fn integer_or_zero(&self, column: &str) -> i64 {
        self.get(column).and_then(CatalogValue::as_i64).unwrap_or(0)
    }
}

/// Storage type of a mapped column, used when a catalog copy is created
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMapping {
    pub field: &'static str,
    pub column: &'static str,
    pub kind: FieldKind,
}

impl FieldMapping {
    pub const fn text(field: &'static str, column: &'static str) -> Self {
        Self {
            field,
            column,
            kind: FieldKind::Text,
        }
    }

    pub const fn integer(field: &'static str, column: &'static str) -> Self {
        Self {
            field,
            column,
            kind: FieldKind::Integer,
        }
    }
}

/// A typed record read from a catalog table
pub trait CatalogEntity: Sized {
    /// Field-to-column mapping in select order
    const FIELDS: &'static [FieldMapping];

    /// Decode one result row
    fn from_row(row: &CatalogRow) -> CatalogResult<Self>;

    /// Values in `FIELDS` order, for inserting into a catalog copy
    fn to_values(&self) -> Vec<CatalogValue>;

    /// Catalog column name for a field
    fn column(field: &str) -> Option<&'static str> {
        Self::FIELDS
            .iter()
            .find(|mapping| mapping.field == field)
            .map(|mapping| mapping.column)
    }
}

impl CatalogEntity for CatalogTableRow {
    const FIELDS: &'static [FieldMapping] = &[
        FieldMapping::text("name", "NAME"),
        FieldMapping::text("database_name", "DBNAME"),
        FieldMapping::text("table_type", "TYPE"),
        FieldMapping::text("creator", "CREATOR"),
        FieldMapping::text("target_creator", "TBCREATOR"),
        FieldMapping::text("location", "LOCATION"),
        FieldMapping::text("target_name", "TBNAME"),
    ];

    fn from_row(row: &CatalogRow) -> CatalogResult<Self> {
        Ok(Self {
            name: row.required_text("NAME")?,
            database_name: row.required_text("DBNAME")?,
            table_type: row.required_text("TYPE")?,
            creator: row.required_text("CREATOR")?,
            target_creator: row.optional_text("TBCREATOR"),
            location: row.optional_text("LOCATION"),
            target_name: row.optional_text("TBNAME"),
        })
    }

    fn to_values(&self) -> Vec<CatalogValue> {
        vec![
            self.name.as_str().into(),
            self.database_name.as_str().into(),
            self.table_type.as_str().into(),
            self.creator.as_str().into(),
            self.target_creator.clone().into(),
            self.location.clone().into(),
            self.target_name.clone().into(),
        ]
    }
}

impl CatalogEntity for CatalogColumnRow {
    const FIELDS: &'static [FieldMapping] = &[
        FieldMapping::text("name", "NAME"),
        FieldMapping::text("owning_table_name", "TBNAME"),
        FieldMapping::text("owning_table_creator", "TBCREATOR"),
        FieldMapping::integer("ordinal", "COLNO"),
        FieldMapping::integer("key_sequence", "KEYSEQ"),
        FieldMapping::integer("length", "LENGTH"),
        FieldMapping::text("type_code", "COLTYPE"),
        FieldMapping::text("nullable", "NULLS"),
        FieldMapping::text("default", "DEFAULT"),
        FieldMapping::integer("scale", "SCALE"),
    ];

    fn from_row(row: &CatalogRow) -> CatalogResult<Self> {
        Ok(Self {
            name: row.required_text("NAME")?,
            owning_table_name: row.required_text("TBNAME")?,
            owning_table_creator: row.required_text("TBCREATOR")?,
            ordinal: row.integer_or_zero("COLNO"),
            key_sequence: row.integer_or_zero("KEYSEQ"),
            length: row.integer_or_zero("LENGTH"),
            type_code: row.optional_text("COLTYPE").unwrap_or_default(),
            nullable: row.get("NULLS").map(CatalogValue::as_bool).unwrap_or(false),
            default: row.optional_text("DEFAULT"),
            scale: row.integer_or_zero("SCALE"),
        })
    }

    fn to_values(&self) -> Vec<CatalogValue> {
        vec![
            self.name.as_str().into(),
            self.owning_table_name.as_str().into(),
            self.owning_table_creator.as_str().into(),
            self.ordinal.into(),
            self.key_sequence.into(),
            self.length.into(),
            self.type_code.as_str().into(),
            (if self.nullable { "Y" } else { "N" }).into(),
            self.default.clone().into(),
            self.scale.into(),
        ]
    }
}

/// Execute a query and decode every row as `T`
pub fn query_as<T: CatalogEntity>(
    connection: &dyn CatalogConnection,
    query: &CatalogQuery,
) -> CatalogResult<Vec<T>> {
    connection
        .execute(query)?
        .iter()
        .map(T::from_row)
        .collect()
}
