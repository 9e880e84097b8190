mod common;

use common::*;
use gaa_elo_core::summary::{
    load_summary, normalize_summary_headers, reshape_summary, summary_header_mapping,
    year_from_label, LABEL_COLUMN,
};
use gaa_elo_core::{LoadError, SportConfig};
use gaa_elo_parser::{MemoryWorkbook, RawSheet, SheetSource, WorkbookError};

fn summary_sheet() -> RawSheet {
    RawSheet::from_grid("Elo values", summary_grid()).expect("non-empty grid")
}

#[test]
fn reshape_produces_one_row_per_team_and_column() {
    let sport = football();
    let sheet = normalize_summary_headers(summary_sheet(), &sport).expect("normalize");
    let long = reshape_summary(&sheet).expect("reshape");

    // 3 teams x 4 value columns, nothing filtered yet
    assert_eq!(long.height(), 12);

    let labels = long.column(LABEL_COLUMN).unwrap().str().unwrap();
    let mut distinct: Vec<&str> = labels.into_iter().flatten().collect();
    distinct.sort();
    distinct.dedup();
    assert_eq!(distinct, vec!["EOY 2018", "EOY 2019", "EOY 2025", "Notes"]);
}

#[test]
fn load_summary_drops_unrecognized_labels_and_gaps() {
    let mut workbook = football_workbook();
    let table = load_summary(&mut workbook, &football()).expect("load summary");

    assert_eq!(table.len(), 8);
    assert!(table.len() <= 12);
    assert_eq!(
        table.teams().into_iter().collect::<Vec<_>>(),
        vec!["Dublin", "Kerry", "Mayo"]
    );
    assert_eq!(table.years().into_iter().collect::<Vec<_>>(), vec![2018, 2019, 2025]);

    let kerry: Vec<_> = table
        .records()
        .iter()
        .filter(|r| r.team == "Kerry")
        .map(|r| r.year)
        .collect();
    assert_eq!(kerry, vec![2018, 2019]);

    let dublin_now = table
        .records()
        .iter()
        .find(|r| r.team == "Dublin" && r.year == 2025)
        .expect("current rating");
    assert_eq!(dublin_now.rating, 1850.0);
}

#[test]
fn records_are_unique_per_team_and_year() {
    let mut workbook = football_workbook();
    let table = load_summary(&mut workbook, &football()).expect("load summary");

    let mut keys: Vec<(String, i32)> = table
        .records()
        .iter()
        .map(|r| (r.team.clone(), r.year))
        .collect();
    let before = keys.len();
    keys.sort();
    keys.dedup();
    assert_eq!(keys.len(), before);
}

#[test]
fn header_mapping_accepts_only_known_patterns() {
    let sport = football();
    let mapping = summary_header_mapping(&sport);

    assert_eq!(mapping.get("end of 2015").map(String::as_str), Some("EOY 2015"));
    assert_eq!(mapping.get("today").map(String::as_str), Some("EOY 2025"));
    assert_eq!(mapping.get("unnamed: 0").map(String::as_str), Some("team"));
    assert!(mapping.get("end of 2008").is_none());
    assert!(mapping.get("end of 2025").is_none());
    assert!(mapping.get("2015").is_none());

    assert_eq!(year_from_label("EOY 2015"), Some(2015));
    assert_eq!(year_from_label("EOY 15"), None);
    assert_eq!(year_from_label("Notes"), None);
    assert_eq!(year_from_label("end of 2015"), None);
}

#[test]
fn header_matching_ignores_case_and_padding() {
    let grid = vec![
        headers(&["Team", " End of 2019 ", "TODAY"]),
        vec![t("Limerick"), n(1900.0), n(1950.0)],
    ];
    let mut workbook = MemoryWorkbook::new().with_sheet("Elo values", grid);
    let table = load_summary(&mut workbook, &SportConfig::hurling()).expect("load summary");

    let years: Vec<i32> = table.records().iter().map(|r| r.year).collect();
    assert_eq!(years, vec![2019, 2025]);
}

#[test]
fn current_column_follows_configured_year() {
    let sport = SportConfig {
        current_year: 2024,
        ..football()
    };
    let mut workbook = football_workbook();
    let table = load_summary(&mut workbook, &sport).expect("load summary");
    assert!(table.years().contains(&2024));
    assert!(!table.years().contains(&2025));
}

#[test]
fn missing_team_column_is_a_load_failure() {
    let mut workbook = football_workbook();
    let err = load_summary(&mut workbook, &SportConfig::hurling()).unwrap_err();
    assert!(matches!(
        err,
        LoadError::MissingColumn { ref sheet, ref column }
            if sheet == "Elo values" && column == "Team"
    ));
}

#[test]
fn missing_summary_sheet_is_a_load_failure() {
    let mut workbook = MemoryWorkbook::new().with_sheet("2019", season_2019_grid());
    let err = load_summary(&mut workbook, &football()).unwrap_err();
    assert!(matches!(
        err,
        LoadError::Workbook(WorkbookError::MissingSheet(ref name)) if name == "Elo values"
    ));
}

#[test]
fn summary_without_year_columns_is_empty() {
    let grid = vec![headers(&["", "Notes"]), vec![t("Dublin"), t("n/a")]];
    let mut workbook = MemoryWorkbook::new().with_sheet("Elo values", grid);
    assert_eq!(workbook.sheet_names(), vec!["Elo values"]);

    let table = load_summary(&mut workbook, &football()).expect("load summary");
    assert!(table.is_empty());
}
