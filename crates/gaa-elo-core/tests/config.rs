use std::fs;

use gaa_elo_core::config::season_year;
use gaa_elo_core::{DashboardConfig, LoadError, SportConfig};
use tempfile::TempDir;

const TWO_SPORTS: &str = r#"
[[sport]]
name = "Football"
workbook = "data/football.xlsx"
team_column = "Unnamed: 0"
default_teams = ["Dublin", "Kerry"]

[[sport]]
name = "Hurling"
workbook = "/srv/elo/hurling.xlsx"
current_year = 2024
upset_limit = 10
"#;

#[test]
fn defaults_cover_both_sports() {
    let config = DashboardConfig::default();
    config.validate().expect("defaults are valid");
    assert_eq!(config.sport_names(), vec!["Football", "Hurling"]);

    let football = config.sport("football").unwrap();
    assert_eq!(football.team_column, "Unnamed: 0");
    assert_eq!(football.default_teams, vec!["Dublin", "Kerry"]);

    let hurling = config.sport("HURLING").unwrap();
    assert_eq!(hurling.team_column, "Team");
    assert_eq!(hurling.default_teams.len(), 4);
    assert_eq!(hurling.upset_limit, 5);
}

#[test]
fn toml_fills_unset_fields_with_defaults() {
    let config = DashboardConfig::from_toml_str(TWO_SPORTS).unwrap();
    let hurling = config.sport("Hurling").unwrap();

    assert_eq!(hurling.current_year, 2024);
    assert_eq!(hurling.upset_limit, 10);
    assert_eq!(hurling.summary_sheet, "Elo values");
    assert_eq!(hurling.team_column, "Team");
    assert_eq!(hurling.starting_value_rows, 1);
    assert_eq!(hurling.excluded_sheets, vec!["Rules", "Elo values"]);
}

#[test]
fn load_resolves_relative_workbooks_against_config_dir() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("gaa-elo.toml");
    fs::write(&path, TWO_SPORTS).unwrap();

    let config = DashboardConfig::load(&path).unwrap();
    assert_eq!(
        config.sport("Football").unwrap().workbook,
        dir.path().join("data/football.xlsx")
    );
    assert_eq!(
        config.sport("Hurling").unwrap().workbook.to_str(),
        Some("/srv/elo/hurling.xlsx")
    );
}

#[test]
fn invalid_configs_are_rejected() {
    let duplicate = r#"
[[sport]]
name = "Football"
[[sport]]
name = "football"
"#;
    assert!(matches!(
        DashboardConfig::from_toml_str(duplicate),
        Err(LoadError::Config(_))
    ));

    let backwards = r#"
[[sport]]
name = "Football"
first_year = 2030
"#;
    assert!(matches!(
        DashboardConfig::from_toml_str(backwards),
        Err(LoadError::Config(_))
    ));

    assert!(matches!(
        DashboardConfig::from_toml_str("sport = []"),
        Err(LoadError::Config(_))
    ));
    assert!(matches!(
        DashboardConfig::from_toml_str("[[sport]\nname ="),
        Err(LoadError::Toml(_))
    ));
}

#[test]
fn unknown_sport_is_reported() {
    let err = DashboardConfig::default().sport("Camogie").unwrap_err();
    assert!(matches!(err, LoadError::UnknownSport(ref name) if name == "Camogie"));
}

#[test]
fn excluded_sheets_include_future_seasons() {
    let sport = SportConfig::football();
    assert!(sport.is_excluded_sheet("Rules"));
    assert!(sport.is_excluded_sheet(" elo values "));
    assert!(sport.is_excluded_sheet("2026"));
    assert!(!sport.is_excluded_sheet("2025"));
    assert!(!sport.is_excluded_sheet("2009"));
    assert!(!sport.is_excluded_sheet("Archive"));

    assert_eq!(season_year("2019"), Some(2019));
    assert_eq!(season_year("19"), None);
    assert_eq!(season_year("2019 replays"), None);
}
