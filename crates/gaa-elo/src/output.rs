// crates/gaa-elo/src/output.rs

use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use gaa_elo_core::{MatchRecord, MatchTable, RatingRecord, Upset};
use serde::Serialize;

/// Flat year-end row for JSON and CSV.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryRow {
    pub team: String,
    pub year: i32,
    pub rating: f64,
}

impl From<&RatingRecord> for SummaryRow {
    fn from(record: &RatingRecord) -> Self {
        Self {
            team: record.team.clone(),
            year: record.year,
            rating: record.rating,
        }
    }
}

/// One team's view of a match, with slot-dependent fields already selected.
#[derive(Debug, Clone, Serialize)]
pub struct MatchRow {
    pub season: String,
    pub date: NaiveDate,
    pub team: String,
    pub opponent: String,
    pub own_score: Option<String>,
    pub opponent_score: Option<String>,
    pub rating: f64,
    pub rating_change: Option<f64>,
    pub grade: Option<String>,
    pub home_away: Option<String>,
    pub win_probability: Option<f64>,
}

impl From<&MatchRecord> for MatchRow {
    fn from(record: &MatchRecord) -> Self {
        Self {
            season: record.season.clone(),
            date: record.date,
            team: record.team.clone(),
            opponent: record.opponent().to_string(),
            own_score: record.own_score().map(|score| score.to_string()),
            opponent_score: record.opponent_score().map(|score| score.to_string()),
            rating: record.rating,
            rating_change: record.rating_change(),
            grade: record.grade.clone(),
            home_away: record.home_away.clone(),
            win_probability: record.win_probability,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SeasonListing {
    pub season: String,
    pub matches: usize,
}

#[derive(Debug, Serialize)]
pub struct SeasonReport {
    pub seasons: Vec<SeasonListing>,
    pub skipped: Vec<gaa_elo_core::SkippedSheet>,
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn number_cell(value: Option<f64>) -> Cell {
    let text = value.map(|v| format!("{v:.1}")).unwrap_or_default();
    Cell::new(text).set_alignment(CellAlignment::Right)
}

/// One row per team, one column per year, teams in selection order.
pub fn summary_table(teams: &[String], records: &[&RatingRecord]) -> Table {
    let years: BTreeSet<i32> = records.iter().map(|r| r.year).collect();
    let ratings: BTreeMap<(&str, i32), f64> = records
        .iter()
        .map(|r| ((r.team.as_str(), r.year), r.rating))
        .collect();

    let year_labels: Vec<String> = years.iter().map(|y| y.to_string()).collect();
    let mut header = vec!["Team"];
    header.extend(year_labels.iter().map(String::as_str));
    let mut table = new_table(header);

    for team in teams {
        let mut row = vec![Cell::new(team)];
        row.extend(
            years
                .iter()
                .map(|year| number_cell(ratings.get(&(team.as_str(), *year)).copied())),
        );
        table.add_row(row);
    }
    table
}

pub fn matches_table(rows: &[MatchRow]) -> Table {
    let mut table = new_table(vec![
        "Date", "Team", "Opponent", "Score", "Opp. score", "Rating", "Change", "Grade",
    ]);
    for row in rows {
        table.add_row(vec![
            Cell::new(row.date.format("%Y-%m-%d")),
            Cell::new(&row.team),
            Cell::new(&row.opponent),
            Cell::new(row.own_score.as_deref().unwrap_or("")),
            Cell::new(row.opponent_score.as_deref().unwrap_or("")),
            number_cell(Some(row.rating)),
            number_cell(row.rating_change),
            Cell::new(row.grade.as_deref().unwrap_or("")),
        ]);
    }
    table
}

pub fn upsets_table(upsets: &[Upset]) -> Table {
    let mut table = new_table(vec!["#", "Date", "Result", "Swing", "Grade"]);
    for (rank, upset) in upsets.iter().enumerate() {
        table.add_row(vec![
            Cell::new(rank + 1),
            Cell::new(upset.date.format("%Y-%m-%d")),
            Cell::new(upset),
            number_cell(Some(upset.swing)),
            Cell::new(upset.grade.as_deref().unwrap_or("")),
        ]);
    }
    table
}

pub fn season_listing(matches: &MatchTable) -> SeasonReport {
    let seasons = matches
        .seasons()
        .into_iter()
        .map(|season| SeasonListing {
            matches: matches.for_season(&season).len() / 2,
            season,
        })
        .collect();
    SeasonReport {
        seasons,
        skipped: matches.skipped().to_vec(),
    }
}

pub fn seasons_table(matches: &MatchTable) -> Table {
    let report = season_listing(matches);
    let mut table = new_table(vec!["Season", "Matches", "Note"]);
    for listing in &report.seasons {
        table.add_row(vec![
            Cell::new(&listing.season),
            Cell::new(listing.matches).set_alignment(CellAlignment::Right),
            Cell::new(""),
        ]);
    }
    for skipped in &report.skipped {
        table.add_row(vec![
            Cell::new(&skipped.sheet),
            Cell::new("-").set_alignment(CellAlignment::Right),
            Cell::new(format!("skipped: {}", skipped.reason)),
        ]);
    }
    table
}

/// Writes rows as CSV to a file or stdout and returns how many were written.
pub fn write_csv<T: Serialize>(rows: &[T], destination: Option<&Path>) -> Result<usize> {
    let sink: Box<dyn Write> = match destination {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };
    let mut writer = csv::Writer::from_writer(sink);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(rows.len())
}
