// Copyright (c) 2024-2025 SchemaScrape Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Catalog reconciliation system
//!
//! This module reads raw catalog rows through a pluggable [`traits::CatalogDataSource`],
//! discovers the logical databases they belong to and reconciles alias entries
//! against physical tables. [`engine::SchemaCatalogEngine`] is the single entry
//! point external code should use.

pub mod config;
pub mod discovery;
pub mod engine;
pub mod error;
pub mod mapping;
pub mod model;
pub mod query;
pub mod reconciler;
#[cfg(feature = "sqlite")]
pub mod sqlite;
pub mod traits;
