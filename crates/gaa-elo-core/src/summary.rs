use std::collections::{HashMap, HashSet};
use std::path::Path;

use gaa_elo_parser::{build_frame, ColumnKind, RawSheet, SheetSource, Workbook};
use polars::prelude::*;
use tracing::{debug, info};

use crate::config::SportConfig;
use crate::error::{LoadError, Result};
use crate::types::{RatingRecord, SummaryTable};

pub const TEAM_COLUMN: &str = "team";
pub const LABEL_COLUMN: &str = "label";
pub const RATING_COLUMN: &str = "rating";

const YEAR_LABEL_PREFIX: &str = "EOY ";

/// Loads the year-end ratings sheet of one sport into one row per (team, year).
pub fn load_summary<S: SheetSource + ?Sized>(
    source: &mut S,
    sport: &SportConfig,
) -> Result<SummaryTable> {
    let sheet = source.read_sheet(&sport.summary_sheet)?;
    let sheet = normalize_summary_headers(sheet, sport)?;
    let long = reshape_summary(&sheet)?;
    let table = finalize_summary(&long)?;

    info!(
        sport = %sport.name,
        teams = table.teams().len(),
        records = table.len(),
        "Loaded year-end ratings"
    );
    Ok(table)
}

pub fn load_summary_file(path: impl AsRef<Path>, sport: &SportConfig) -> Result<SummaryTable> {
    let mut workbook = Workbook::open(path)?;
    debug!(path = ?workbook.path(), hash = workbook.content_hash(), "Opened workbook");
    load_summary(&mut workbook, sport)
}

/// Label a summary header maps to: the team column becomes `team`, the
/// in-progress column and every supported `end of <year>` become `EOY <year>`.
pub fn summary_header_mapping(sport: &SportConfig) -> HashMap<String, String> {
    let mut mapping = HashMap::new();
    mapping.insert(fold(&sport.team_column), TEAM_COLUMN.to_string());
    mapping.insert(fold(&sport.current_column), year_label(sport.current_year));
    for year in sport.first_year..sport.current_year {
        mapping.insert(fold(&format!("end of {year}")), year_label(year));
    }
    mapping
}

pub fn normalize_summary_headers(mut sheet: RawSheet, sport: &SportConfig) -> Result<RawSheet> {
    let mapping = summary_header_mapping(sport);
    let mut used: HashSet<String> = sheet.headers.iter().cloned().collect();
    for header in sheet.headers.iter_mut() {
        let Some(renamed) = mapping.get(&fold(header)) else {
            continue;
        };
        if renamed == header {
            continue;
        }
        if used.contains(renamed) {
            debug!(from = %header, to = %renamed, "Summary column label already taken");
            continue;
        }
        debug!(from = %header, to = %renamed, "Renamed summary column");
        used.insert(renamed.clone());
        *header = renamed.clone();
    }

    if sheet.column_index(TEAM_COLUMN).is_none() {
        return Err(LoadError::MissingColumn {
            sheet: sheet.name.clone(),
            column: sport.team_column.clone(),
        });
    }
    Ok(sheet)
}

/// Unpivots the wide sheet into `team`, `label`, `rating`: exactly one row per
/// team row and non-team column, nothing filtered yet.
pub fn reshape_summary(sheet: &RawSheet) -> Result<DataFrame> {
    let value_columns: Vec<&str> = sheet
        .headers
        .iter()
        .map(String::as_str)
        .filter(|header| *header != TEAM_COLUMN)
        .collect();

    if value_columns.is_empty() {
        return Ok(DataFrame::new(vec![
            Series::new(TEAM_COLUMN.into(), Vec::<String>::new()).into(),
            Series::new(LABEL_COLUMN.into(), Vec::<String>::new()).into(),
            Series::new(RATING_COLUMN.into(), Vec::<f64>::new()).into(),
        ])?);
    }

    let mut kinds: HashMap<String, ColumnKind> = value_columns
        .iter()
        .map(|header| (header.to_string(), ColumnKind::Number))
        .collect();
    kinds.insert(TEAM_COLUMN.to_string(), ColumnKind::Text);

    let wide = build_frame(&sheet.headers, &sheet.rows, &kinds)?;
    let mut long = wide.unpivot(value_columns, [TEAM_COLUMN])?;
    long.rename("variable", LABEL_COLUMN.into())?;
    long.rename("value", RATING_COLUMN.into())?;
    Ok(long)
}

/// Extracts years from the reshaped labels and drops rows without a team,
/// year or rating. The first row per (team, year) wins.
pub fn finalize_summary(long: &DataFrame) -> Result<SummaryTable> {
    let teams = long.column(TEAM_COLUMN)?.str()?;
    let labels = long.column(LABEL_COLUMN)?.str()?;
    let ratings = long.column(RATING_COLUMN)?.f64()?;

    let mut seen: HashSet<(String, i32)> = HashSet::new();
    let mut records = Vec::with_capacity(long.height());
    for idx in 0..long.height() {
        let (Some(team), Some(label), Some(rating)) =
            (teams.get(idx), labels.get(idx), ratings.get(idx))
        else {
            continue;
        };
        let team = team.trim();
        if team.is_empty() {
            continue;
        }
        let Some(year) = year_from_label(label) else {
            continue;
        };
        if !seen.insert((team.to_string(), year)) {
            continue;
        }
        records.push(RatingRecord {
            team: team.to_string(),
            year,
            rating,
        });
    }

    Ok(SummaryTable::new(records))
}

pub fn year_label(year: i32) -> String {
    format!("{YEAR_LABEL_PREFIX}{year}")
}

/// Year of an `EOY dddd` label; any other label yields nothing.
pub fn year_from_label(label: &str) -> Option<i32> {
    let digits = label.strip_prefix(YEAR_LABEL_PREFIX)?;
    if digits.len() == 4 && digits.chars().all(|c| c.is_ascii_digit()) {
        digits.parse().ok()
    } else {
        None
    }
}

fn fold(header: &str) -> String {
    header.trim().to_lowercase()
}
