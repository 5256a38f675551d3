//! Test utilities for SchemaScrape integration tests
//!
//! TestFixture seeds an in-memory SQLite catalog and wires an engine to it.

pub mod test_fixture;
