// Copyright (c) 2024-2025 SchemaScrape Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Error types for the catalog reconciliation system

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    #[error("Missing required parameter: {0}")]
    MissingRequiredParameter(String),

    #[error("Catalog query failed: {0}")]
    QueryFailure(String),

    #[error("Invalid catalog identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Catalog object not found: {0}")]
    ObjectNotFound(String),

    #[error("Row mapping error: {0}")]
    RowMapping(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl CatalogError {
    /// True when the caller supplied bad input, as opposed to a catalog failure.
    pub fn is_client_fault(&self) -> bool {
        matches!(
            self,
            CatalogError::MissingRequiredParameter(_) | CatalogError::InvalidIdentifier(_)
        )
    }
}

impl From<std::io::Error> for CatalogError {
    fn from(err: std::io::Error) -> Self {
        CatalogError::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::SerializationError(err.to_string())
    }
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for CatalogError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            // SQLite reports a missing table as a generic SQLITE_ERROR; only the message tells it apart.
            rusqlite::Error::SqliteFailure(failure, Some(message))
                if failure.code == rusqlite::ErrorCode::Unknown =>
            {
                if message.starts_with("no such table") {
                    CatalogError::ObjectNotFound(message.clone())
                } else {
                    CatalogError::QueryFailure(err.to_string())
                }
            }
            _ => {
                let message = err.to_string();
                if message.contains("no such table") {
                    CatalogError::ObjectNotFound(message)
                } else {
                    CatalogError::QueryFailure(message)
                }
            }
        }
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Reject absent or blank creator/location identifiers before any query runs.
pub(crate) fn require_parameter(name: &str, value: &str) -> CatalogResult<()> {
    if value.trim().is_empty() {
        return Err(CatalogError::MissingRequiredParameter(name.to_string()));
    }
    Ok(())
}
