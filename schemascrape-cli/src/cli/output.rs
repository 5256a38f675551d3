// Copyright (c) 2024-2025 SchemaScrape Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Result formatting for CLI output

use colored::*;
use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};
use schemascrape::{ColumnSource, ReconcileOutcome, ReconciledTable};

use super::commands::OutputFormat;

/// Formatter for the results of each command
pub struct CatalogFormatter;

impl CatalogFormatter {
    /// Format a list of database names
    pub fn databases(names: &[String], format: OutputFormat) -> String {
        match format {
            OutputFormat::Json => Self::to_json(&serde_json::json!({ "databases": names })),
            OutputFormat::Table => {
                if names.is_empty() {
                    return format!("{}\n", "No databases found".yellow());
                }

                let mut table = Table::new();
                table.load_preset(UTF8_FULL);
                table.set_header(vec![Cell::new("Database").fg(Color::Green)]);
                for name in names {
                    table.add_row(vec![name.as_str()]);
                }

                format!(
                    "{}\n{}\n",
                    format!("Databases: {}", names.len()).bold().green(),
                    table
                )
            }
        }
    }

    /// Format a scraped inventory with any alias conflicts
    pub fn tables(outcome: &ReconcileOutcome, format: OutputFormat) -> String {
        match format {
            OutputFormat::Json => Self::to_json(outcome),
            OutputFormat::Table => Self::tables_as_table(outcome),
        }
    }

    fn tables_as_table(outcome: &ReconcileOutcome) -> String {
        if outcome.tables.is_empty() {
            return format!("{}\n", "No tables found".yellow());
        }

        let mut output = String::new();
        output.push_str(&format!("{}\n", "Catalog Tables".bold().green()));
        output.push_str(&format!("Tables returned: {}\n\n", outcome.tables.len()));

        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(
            ["Type", "Database", "Name", "Target", "Location", "Columns", "Resolved by"]
                .iter()
                .map(|header| Cell::new(header).fg(Color::Green))
                .collect::<Vec<_>>(),
        );

        for entry in &outcome.tables {
            table.add_row(vec![
                entry.table_type.to_string(),
                entry.database_name.clone(),
                entry.name.clone(),
                entry.target_identity().to_string(),
                entry.location.clone().unwrap_or_default(),
                Self::column_names(entry),
                Self::resolution_label(entry.resolution()).to_string(),
            ]);
        }

        output.push_str(&table.to_string());
        output.push('\n');

        if !outcome.conflicts.is_empty() {
            output.push_str(&format!("\n{}\n", "Alias conflicts:".bold().yellow()));
            for (i, conflict) in outcome.conflicts.iter().enumerate() {
                output.push_str(&format!(
                    "  {}. {}\n",
                    i + 1,
                    format!(
                        "{} kept its physical columns over alias target {}",
                        conflict.name, conflict.alias_target
                    )
                    .yellow()
                ));
            }
        }

        output
    }

    /// Format the result of a row-count probe
    pub fn row_count(table: &str, count: Option<i64>, format: OutputFormat) -> String {
        match format {
            OutputFormat::Json => {
                Self::to_json(&serde_json::json!({ "table": table, "row_count": count }))
            }
            OutputFormat::Table => match count {
                Some(count) => format!("{}: {}\n", table.bold(), count),
                None => format!("{}\n", format!("{}: no rows", table).yellow()),
            },
        }
    }

    fn column_names(entry: &ReconciledTable) -> String {
        entry
            .columns
            .iter()
            .map(|column| column.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn resolution_label(source: Option<ColumnSource>) -> &'static str {
        match source {
            Some(ColumnSource::Physical) => "physical",
            Some(ColumnSource::Alias) => "alias",
            None => "-",
        }
    }

    fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> String {
        let mut json = serde_json::to_string_pretty(value).unwrap_or_else(|_| {
            "{\"status\": \"error\", \"error\": \"Could not serialize results to JSON\"}"
                .to_string()
        });
        json.push('\n');
        json
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemascrape::{ReconcileConflict, TableIdentity, TableType};

    fn outcome() -> ReconcileOutcome {
        ReconcileOutcome {
            tables: vec![ReconciledTable::new(TableType::Table, "ORDERS", "DB1", "TESTXX")],
            conflicts: vec![ReconcileConflict {
                name: "ORDERS".to_string(),
                alias_target: TableIdentity::new("ORDERS", "ALIASCREATOR"),
            }],
        }
    }

    #[test]
    fn test_tables_json_is_parseable() {
        let json = CatalogFormatter::tables(&outcome(), OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["tables"][0]["name"], "ORDERS");
        assert_eq!(value["conflicts"][0]["alias_target"]["creator"], "ALIASCREATOR");
    }

    #[test]
    fn test_tables_table_lists_conflicts() {
        colored::control::set_override(false);
        let text = CatalogFormatter::tables(&outcome(), OutputFormat::Table);
        assert!(text.contains("Tables returned: 1"));
        assert!(text.contains("TESTXX.ORDERS"));
        assert!(text.contains("ORDERS kept its physical columns over alias target ALIASCREATOR.ORDERS"));
    }

    #[test]
    fn test_row_count_absent() {
        let json = CatalogFormatter::row_count("SYSTABLES", None, OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["row_count"].is_null());
    }

    #[test]
    fn test_empty_databases() {
        colored::control::set_override(false);
        assert_eq!(
            CatalogFormatter::databases(&[], OutputFormat::Table),
            "No databases found\n"
        );
    }
}
