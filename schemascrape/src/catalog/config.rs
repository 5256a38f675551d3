// Copyright (c) 2024-2025 SchemaScrape Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Catalog engine configuration

use super::error::{CatalogError, CatalogResult};
use super::query::validate_identifier;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Database under which DB2 records alias entries in its catalog
pub const DEFAULT_SYSTEM_ALIAS_DATABASE: &str = "DSNDB06";

/// Configuration for catalog naming and whitelist behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Database name appended to every whitelist so alias lookups reach the system catalog
    pub system_alias_database: String,

    /// Schema owning the catalog tables
    pub catalog_schema: String,

    /// Catalog table holding one row per table, alias or global temporary table
    pub tables_view: String,

    /// Catalog table holding one row per column
    pub columns_view: String,

    /// Whether catalog identifiers are prefixed with the location (three-part names)
    pub qualify_with_location: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::db2()
    }
}

impl EngineConfig {
    /// Configuration for a DB2 catalog reached through three-part names
    pub fn db2() -> Self {
        Self {
            system_alias_database: DEFAULT_SYSTEM_ALIAS_DATABASE.to_string(),
            catalog_schema: "SYSIBM".to_string(),
            tables_view: "SYSTABLES".to_string(),
            columns_view: "SYSCOLUMNS".to_string(),
            qualify_with_location: true,
        }
    }

    /// Configuration for a catalog copy held in a local SQLite database
    pub fn sqlite() -> Self {
        Self {
            catalog_schema: "main".to_string(),
            qualify_with_location: false,
            ..Self::db2()
        }
    }

    /// Load a configuration from a JSON file; missing keys take DB2 defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every identifier the configuration contributes to generated queries
    pub fn validate(&self) -> CatalogResult<()> {
        if self.system_alias_database.trim().is_empty() {
            return Err(CatalogError::Configuration(
                "system_alias_database must not be empty".to_string(),
            ));
        }
        for part in [&self.catalog_schema, &self.tables_view, &self.columns_view] {
            validate_identifier(part)
                .map_err(|e| CatalogError::Configuration(e.to_string()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_db2_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.system_alias_database, "DSNDB06");
        assert_eq!(config.catalog_schema, "SYSIBM");
        assert!(config.qualify_with_location);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_sqlite_preset() {
        let config = EngineConfig::sqlite();
        assert_eq!(config.catalog_schema, "main");
        assert!(!config.qualify_with_location);
        assert_eq!(config.tables_view, "SYSTABLES");
    }

    #[test]
    fn test_validate_rejects_bad_identifier() {
        let config = EngineConfig {
            tables_view: "SYSTABLES; DROP TABLE X".to_string(),
            ..EngineConfig::db2()
        };
        assert!(matches!(
            config.validate(),
            Err(CatalogError::Configuration(_))
        ));
    }

    #[test]
    fn test_from_json_file_partial() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "system_alias_database": "ALIASDB", "qualify_with_location": false }}"#)
            .unwrap();

        let config = EngineConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.system_alias_database, "ALIASDB");
        assert!(!config.qualify_with_location);
        assert_eq!(config.columns_view, "SYSCOLUMNS");
    }
}
