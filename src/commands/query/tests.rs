use std::collections::HashSet;

use rusqlite::{Connection, params};

use super::run::open_existing_store;
use super::*;
use crate::commands::migrate::{StoreTable, ensure_schema, open_store, table_counts};

fn memory_store() -> Connection {
    let connection = Connection::open_in_memory().expect("open in-memory store");
    ensure_schema(&connection).expect("ensure schema");
    connection
}

fn insert_metadata(connection: &Connection, id: i64, title: &str, culture: Option<&str>) {
    connection
        .execute(
            "INSERT INTO artifact_metadata(id, title, culture, classification) VALUES(?1, ?2, ?3, 'Coins')",
            params![id, title, culture],
        )
        .expect("insert metadata");
}

fn insert_color(connection: &Connection, objectid: i64, color: &str, hue: &str, percent: f64) {
    connection
        .execute(
            "INSERT INTO artifact_colors(objectid, color, spectrum, hue, percent, css3) VALUES(?1, ?2, NULL, ?3, ?4, NULL)",
            params![objectid, color, hue, percent],
        )
        .expect("insert color");
}

fn insert_media(connection: &Connection, objectid: i64, rank: i64, mediacount: i64) {
    connection
        .execute(
            "INSERT INTO artifact_media(objectid, imagecount, mediacount, colorcount, rank, datebegin, dateend) VALUES(?1, 1, ?2, 0, ?3, 1520, 1580)",
            params![objectid, mediacount, rank],
        )
        .expect("insert media");
}

fn text(cell: &Cell) -> &str {
    match cell {
        Cell::Text(value) => value,
        other => panic!("expected text cell, got {other:?}"),
    }
}

#[test]
fn catalog_has_twenty_five_distinct_numbered_entries() {
    assert_eq!(CatalogQuery::ALL.len(), 25);

    let numbers: Vec<u8> = CatalogQuery::ALL.iter().map(|query| query.number()).collect();
    assert_eq!(numbers, (1..=25).collect::<Vec<u8>>());

    let titles: HashSet<&str> = CatalogQuery::ALL.iter().map(|query| query.title()).collect();
    assert_eq!(titles.len(), 25);
}

#[test]
fn only_colors_for_artifact_takes_a_parameter() {
    let parameterized: Vec<CatalogQuery> = CatalogQuery::ALL
        .into_iter()
        .filter(|query| query.requires_artifact_id())
        .collect();

    assert_eq!(parameterized, vec![CatalogQuery::ColorsForArtifact]);
    for query in CatalogQuery::ALL {
        assert_eq!(
            query.sql().contains('?'),
            query.requires_artifact_id(),
            "placeholder mismatch for {}",
            query.label()
        );
    }
}

#[test]
fn every_catalog_query_prepares_read_only_against_the_schema() {
    let connection = memory_store();

    for query in CatalogQuery::ALL {
        let statement = connection
            .prepare(query.sql())
            .unwrap_or_else(|err| panic!("{} failed to prepare: {err}", query.label()));
        assert!(statement.readonly(), "{} is not read-only", query.label());
    }
}

#[test]
fn every_zero_parameter_query_runs_on_an_empty_store() {
    let connection = memory_store();

    for query in CatalogQuery::ALL {
        if query.requires_artifact_id() {
            continue;
        }
        let table = execute(&connection, query, None)
            .unwrap_or_else(|err| panic!("{} failed: {err}", query.label()));
        assert!(!table.columns.is_empty(), "{} has no columns", query.label());
    }
}

#[test]
fn find_accepts_number_title_and_label() {
    assert_eq!(
        CatalogQuery::find("14").expect("by number"),
        CatalogQuery::ColorsForArtifact
    );
    assert_eq!(
        CatalogQuery::find("14.").expect("by numbered prefix"),
        CatalogQuery::ColorsForArtifact
    );
    assert_eq!(
        CatalogQuery::find("unique cultures").expect("by title"),
        CatalogQuery::UniqueCultures
    );
    assert_eq!(
        CatalogQuery::find("7. Average rank").expect("by label"),
        CatalogQuery::AverageRank
    );
}

#[test]
fn find_rejects_unknown_selectors() {
    assert!(matches!(
        CatalogQuery::find("26"),
        Err(CatalogError::UnknownQuery(_))
    ));
    assert!(matches!(
        CatalogQuery::find("DROP TABLE artifact_metadata"),
        Err(CatalogError::UnknownQuery(_))
    ));
    assert_eq!(CatalogQuery::from_number(0), None);
}

#[test]
fn unique_cultures_collapses_duplicates() {
    let connection = memory_store();
    insert_metadata(&connection, 1, "Solidus", Some("Byzantine"));
    insert_metadata(&connection, 2, "Histamenon", Some("Byzantine"));
    insert_metadata(&connection, 3, "Denarius", Some("Roman"));

    let table = execute(&connection, CatalogQuery::UniqueCultures, None).expect("query 2");

    assert_eq!(table.columns, vec!["culture".to_string()]);
    assert_eq!(table.rows.len(), 2);
    let mut cultures: Vec<&str> = table.rows.iter().map(|row| text(&row[0])).collect();
    cultures.sort_unstable();
    assert_eq!(cultures, vec!["Byzantine", "Roman"]);
}

#[test]
fn average_rank_of_empty_media_is_a_single_null_row() {
    let connection = memory_store();

    let table = execute(&connection, CatalogQuery::AverageRank, None).expect("query 7");

    assert_eq!(table.rows, vec![vec![Cell::Null]]);
}

#[test]
fn average_rank_averages_media_rows() {
    let connection = memory_store();
    insert_media(&connection, 1, 10, 1);
    insert_media(&connection, 2, 30, 0);

    let table = execute(&connection, CatalogQuery::AverageRank, None).expect("query 7");

    assert_eq!(table.rows, vec![vec![Cell::Real(20.0)]]);
}

#[test]
fn colors_for_artifact_returns_only_that_artifact() {
    let connection = memory_store();
    insert_color(&connection, 42, "Red", "Red", 0.5);
    insert_color(&connection, 42, "Blue", "Blue", 0.3);
    insert_color(&connection, 7, "Green", "Green", 0.9);

    let table =
        execute(&connection, CatalogQuery::ColorsForArtifact, Some(42)).expect("query 14");

    assert_eq!(
        table.columns,
        vec!["objectid", "color", "spectrum", "hue", "percent", "css3"]
    );
    assert_eq!(table.rows.len(), 2);
    assert!(table.rows.iter().all(|row| row[0] == Cell::Integer(42)));
    let mut colors: Vec<&str> = table.rows.iter().map(|row| text(&row[1])).collect();
    colors.sort_unstable();
    assert_eq!(colors, vec!["Blue", "Red"]);
}

#[test]
fn colors_for_artifact_requires_an_id() {
    let connection = memory_store();
    insert_color(&connection, 0, "Black", "Black", 1.0);

    let err = execute(&connection, CatalogQuery::ColorsForArtifact, None)
        .expect_err("missing id should be rejected");

    assert!(matches!(
        err,
        CatalogError::MissingArtifactId { number: 14, .. }
    ));
}

#[test]
fn zero_parameter_query_rejects_an_id() {
    let connection = memory_store();

    let err = execute(&connection, CatalogQuery::TotalColorEntries, Some(42))
        .expect_err("unexpected id should be rejected");

    assert!(matches!(
        err,
        CatalogError::UnexpectedArtifactId { number: 15, .. }
    ));
}

#[test]
fn joins_link_metadata_to_colors_and_media() {
    let connection = memory_store();
    insert_metadata(&connection, 1, "Solidus", Some("Byzantine"));
    insert_metadata(&connection, 2, "Denarius", Some("Roman"));
    insert_color(&connection, 1, "#777777", "Grey", 0.8);
    insert_color(&connection, 2, "#777777", "Grey", 0.4);
    insert_media(&connection, 1, 5, 0);

    let byzantine = execute(&connection, CatalogQuery::ByzantineHues, None).expect("query 16");
    assert_eq!(
        byzantine.rows,
        vec![vec![
            Cell::Text("Solidus".to_string()),
            Cell::Text("Grey".to_string())
        ]]
    );

    let grey = execute(&connection, CatalogQuery::TopGreyArtifacts, None).expect("query 19");
    assert_eq!(grey.rows.len(), 2);

    let without_media = execute(&connection, CatalogQuery::WithoutMedia, None).expect("query 10");
    assert_eq!(without_media.rows, vec![vec![Cell::Integer(1)]]);

    let dated = execute(&connection, CatalogQuery::DatedFifteenHundreds, None).expect("query 9");
    assert_eq!(dated.rows, vec![vec![Cell::Integer(1)]]);
}

#[test]
fn artifacts_without_culture_match_null_only() {
    let connection = memory_store();
    insert_metadata(&connection, 1, "Unknown origin", None);
    insert_metadata(&connection, 2, "Denarius", Some("Roman"));

    let table = execute(&connection, CatalogQuery::WithoutCulture, None).expect("query 21");

    assert_eq!(table.rows.len(), 1);
    assert_eq!(table.rows[0][0], Cell::Integer(1));
    assert_eq!(table.columns.len(), 12);
}

#[test]
fn preview_table_limits_rows() {
    let connection = memory_store();
    for id in 0..4 {
        insert_metadata(&connection, id, "Coin", Some("Roman"));
    }

    let preview = preview_table(&connection, StoreTable::Metadata, 2).expect("preview");

    assert_eq!(preview.rows.len(), 2);
    assert_eq!(preview.columns[0], "id");
}

#[test]
fn text_table_renders_columns_rows_and_nulls() {
    let table = ResultTable {
        columns: vec!["hue".to_string(), "AVG(percent)".to_string()],
        rows: vec![
            vec![Cell::Text("Grey".to_string()), Cell::Real(0.5)],
            vec![Cell::Null, Cell::Null],
        ],
    };
    let mut output = Vec::new();

    write_text_table(&mut output, "13. Avg percent per hue", &table).expect("render");

    let text = String::from_utf8(output).expect("utf8");
    assert_eq!(
        text,
        "13. Avg percent per hue\nhue\tAVG(percent)\nGrey\t0.5\nNULL\tNULL\n(2 rows)\n"
    );
}

#[test]
fn json_response_serializes_null_cells_as_null() {
    let table = ResultTable {
        columns: vec!["AVG(rank)".to_string()],
        rows: vec![vec![Cell::Null]],
    };
    let mut output = Vec::new();

    write_json_response(&mut output, CatalogQuery::AverageRank, None, &table).expect("render");

    let value: serde_json::Value = serde_json::from_slice(&output).expect("valid json");
    assert_eq!(value["number"], 7);
    assert_eq!(value["returned"], 1);
    assert_eq!(value["rows"][0][0], serde_json::Value::Null);
    assert_eq!(value["columns"][0], "AVG(rank)");
}

#[test]
fn catalog_listing_marks_the_parameterized_entry() {
    let mut output = Vec::new();

    write_catalog_listing(&mut output, false).expect("render");

    let text = String::from_utf8(output).expect("utf8");
    assert_eq!(text.lines().count(), 25);
    assert!(text.contains("14. Colors for artifact\t(requires --artifact-id)"));
    assert!(text.lines().next().unwrap_or_default().starts_with("1. Artifacts from 11th century"));
}

#[test]
fn querying_a_missing_store_fails_without_creating_it() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("harvard_artifacts.db");

    let err = open_existing_store(&db_path)
        .err()
        .expect("missing store should fail");

    assert!(err.to_string().contains("no artifact store"));
    assert!(!db_path.exists());
}

#[test]
fn querying_an_empty_store_still_runs() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("harvard_artifacts.db");
    drop(open_store(&db_path).expect("create store"));

    let connection = open_existing_store(&db_path).expect("empty store opens");

    assert!(table_counts(&connection).expect("counts").is_empty());
    let table = execute(&connection, CatalogQuery::AverageRank, None).expect("query 7");
    assert_eq!(table.rows, vec![vec![Cell::Null]]);
}
