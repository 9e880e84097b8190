mod common;

use std::sync::Arc;

use anyhow::Result;
use common::*;
use gaa_elo_core::cache::cache_key;
use gaa_elo_core::{load_match_detail_file, load_summary_file, LoadCache, LoadError, SportConfig};
use tempfile::TempDir;

fn sport_at(path: &std::path::Path) -> SportConfig {
    SportConfig {
        workbook: path.to_path_buf(),
        ..SportConfig::football()
    }
}

#[test]
fn xlsx_workbook_loads_end_to_end() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write_football_xlsx(dir.path())?;
    let sport = sport_at(&path);

    let summary = load_summary_file(&path, &sport)?;
    assert_eq!(summary.len(), 8);

    let table = load_match_detail_file(&path, &sport, &summary.teams())?;
    assert_eq!(table.len(), 8);
    assert!(table.skipped().is_empty());
    assert_eq!(table.records()[0].date, d(2018, 8, 19));
    assert_eq!(table.records()[2].team_1.score.map(|s| s.to_string()).as_deref(), Some("2-3 (9)"));

    let memory = load_from_memory(&summary);
    assert_eq!(table, memory);
    Ok(())
}

fn load_from_memory(summary: &gaa_elo_core::SummaryTable) -> gaa_elo_core::MatchTable {
    gaa_elo_core::load_match_detail(&mut football_workbook(), &football(), &summary.teams())
        .expect("load from memory")
}

#[test]
fn repeated_loads_hit_the_cache() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write_football_xlsx(dir.path())?;
    let sport = sport_at(&path);
    let cache = LoadCache::new(4);

    let first = cache.sport_data(&sport)?;
    let second = cache.sport_data(&sport)?;

    assert!(Arc::ptr_eq(&first.summary, &second.summary));
    assert!(Arc::ptr_eq(&first.matches, &second.matches));
    assert_eq!(cache.len(), 2);
    Ok(())
}

#[test]
fn edited_workbook_is_reloaded() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write_football_xlsx(dir.path())?;
    let sport = sport_at(&path);
    let cache = LoadCache::default();

    let before = cache.summary(&sport)?;
    assert_eq!(before.len(), 8);

    let mut grid = summary_grid();
    grid.push(vec![t("Cavan"), n(1600.0), n(1610.0), n(1620.0), e()]);
    write_xlsx(&path, &[("Elo values", grid)])?;

    let after = cache.summary(&sport)?;
    assert!(!Arc::ptr_eq(&before, &after));
    assert_eq!(after.len(), 11);
    assert!(after.teams().contains("Cavan"));
    Ok(())
}

#[test]
fn parameters_are_part_of_the_key() {
    let bytes = b"same bytes";
    let path = std::path::Path::new("football.xlsx");
    let football = SportConfig::football();
    let hurling = SportConfig::hurling();

    let a = cache_key(path, bytes, &football, None);
    let b = cache_key(path, bytes, &football, None);
    let c = cache_key(path, bytes, &hurling, None);
    let teams = ["Dublin".to_string()].into_iter().collect();
    let with_teams = cache_key(path, bytes, &football, Some(&teams));

    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_ne!(a, with_teams);
    assert_eq!(a.content_hash, c.content_hash);
    assert_eq!(a.content_hash.len(), 64);
}

#[test]
fn missing_workbook_is_a_load_failure_and_not_cached() {
    let dir = TempDir::new().unwrap();
    let sport = sport_at(&dir.path().join("absent.xlsx"));
    let cache = LoadCache::new(0);

    let err = cache.summary(&sport).unwrap_err();
    assert!(matches!(err, LoadError::Io(_)));
    assert!(cache.is_empty());
}

#[test]
fn one_sport_failing_leaves_the_other_usable() -> Result<()> {
    let dir = TempDir::new()?;
    let football_path = write_football_xlsx(dir.path())?;
    let broken = dir.path().join("hurling.xlsx");
    std::fs::write(&broken, b"not a workbook")?;

    let cache = LoadCache::default();
    let hurling = SportConfig {
        workbook: broken,
        ..SportConfig::hurling()
    };
    assert!(matches!(cache.sport_data(&hurling), Err(LoadError::Workbook(_))));

    let football = cache.sport_data(&sport_at(&football_path))?;
    assert_eq!(football.matches.len(), 8);
    Ok(())
}
