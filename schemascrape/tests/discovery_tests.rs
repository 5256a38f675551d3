// Database discovery and row-count probe against a seeded catalog

#![cfg(feature = "sqlite")]

#[path = "testutils/mod.rs"]
mod testutils;

use schemascrape::{CatalogError, Database};
use testutils::test_fixture::*;

#[test]
fn test_databases_by_creator_required_params_missing() {
    let fixture = TestFixture::new();

    for (creator, location, missing) in [
        ("", MATCHING_LOCATION, "creator"),
        (MATCHING_CREATOR, "", "location"),
        ("", "", "creator"),
    ] {
        let err = fixture
            .engine
            .get_databases_by_creator(creator, location, &[])
            .unwrap_err();
        assert_eq!(err, CatalogError::MissingRequiredParameter(missing.to_string()));
        assert!(err.is_client_fault());
    }
}

#[test]
fn test_databases_by_creator_matching_database_returns_distinct_names() {
    let fixture = TestFixture::new();

    let result = fixture
        .engine
        .get_databases_by_creator(MATCHING_CREATOR, MATCHING_LOCATION, &names(&[MATCHING_DATABASE]))
        .unwrap();

    // Two rows match, both in DB1, so a single database comes back.
    assert_eq!(result.into_iter().collect::<Vec<_>>(), vec![Database::new("DB1")]);
}

#[test]
fn test_databases_by_creator_duplicates_collapse() {
    let mut tables = standard_tables();
    for i in 0..5 {
        tables.push(table_row(&format!("EXTRA{}", i), "DB1", "T", MATCHING_CREATOR));
        tables.push(table_row(&format!("OTHER{}", i), "DB4", "G", MATCHING_CREATOR));
    }
    let fixture = TestFixture::with_rows(&tables, &[]);

    let result = fixture
        .engine
        .get_databases_by_creator(MATCHING_CREATOR, MATCHING_LOCATION, &names(&["DB1", "DB4"]))
        .unwrap();

    assert_eq!(
        result.into_iter().collect::<Vec<_>>(),
        vec![Database::new("DB1"), Database::new("DB4")]
    );
}

#[test]
fn test_databases_by_creator_unknown_database_returns_empty() {
    let fixture = TestFixture::new();

    let result = fixture
        .engine
        .get_databases_by_creator(
            MATCHING_CREATOR,
            MATCHING_LOCATION,
            &names(&["DatabaseNameNotInOurInternalDataSet"]),
        )
        .unwrap();

    assert!(result.is_empty());
}

#[test]
fn test_system_alias_database_always_whitelisted() {
    let mut tables = standard_tables();
    tables.push(alias_row(
        "SYSTEMALIAS",
        SYSTEM_ALIAS_DATABASE,
        MATCHING_CREATOR,
        MATCHING_ALIAS_CREATOR,
        "ALIASTABLE1",
    ));
    let fixture = TestFixture::with_rows(&tables, &[]);

    // Only DB1 is whitelisted by the caller; the alias database is reachable anyway.
    let result = fixture
        .engine
        .get_databases_by_creator(MATCHING_CREATOR, MATCHING_LOCATION, &names(&[MATCHING_DATABASE]))
        .unwrap();

    assert!(result.contains(&Database::new(SYSTEM_ALIAS_DATABASE)));
    assert!(result.contains(&Database::new(MATCHING_DATABASE)));

    let effective = fixture.engine.effective_whitelist(&names(&[MATCHING_DATABASE]));
    assert_eq!(effective.names(), &names(&[MATCHING_DATABASE, SYSTEM_ALIAS_DATABASE])[..]);
}

#[test]
fn test_logical_database_names_only_recognized_types_of_creator() {
    let fixture = TestFixture::new();

    let names = fixture
        .engine
        .get_logical_database_names(MATCHING_CREATOR, MATCHING_LOCATION)
        .unwrap();

    // TABLE1 has an unknown type and GLOBALTABLE1 belongs to another creator.
    assert_eq!(names.into_iter().collect::<Vec<_>>(), vec!["DB1".to_string()]);
}

#[test]
fn test_logical_database_names_required_params_missing() {
    let fixture = TestFixture::new();
    assert!(matches!(
        fixture.engine.get_logical_database_names(" ", MATCHING_LOCATION),
        Err(CatalogError::MissingRequiredParameter(_))
    ));
}

#[test]
fn test_row_count_results_found() {
    let fixture = TestFixture::new();

    let count = fixture.engine.get_row_count("SYSTABLES").unwrap();

    assert_eq!(count, Some(standard_tables().len() as i64));
}

#[test]
fn test_row_count_empty_or_unknown_table_is_absent() {
    let fixture = TestFixture::with_rows(&standard_tables(), &[]);

    assert_eq!(fixture.engine.get_row_count("SYSCOLUMNS").unwrap(), None);
    assert_eq!(fixture.engine.get_row_count("NOT_A_CATALOG_TABLE").unwrap(), None);
}

#[test]
fn test_row_count_rejects_bad_names() {
    let fixture = TestFixture::new();

    assert!(matches!(
        fixture.engine.get_row_count("SYSTABLES; DROP TABLE SYSTABLES"),
        Err(CatalogError::InvalidIdentifier(_))
    ));
    assert!(matches!(
        fixture.engine.get_row_count(""),
        Err(CatalogError::MissingRequiredParameter(_))
    ));
}
