use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::Path;

use gaa_elo_parser::{
    build_frame, date_from_epoch_days, is_placeholder_header, Cell, ColumnKind, RawSheet,
    SheetSource, Workbook,
};
use polars::prelude::*;
use tracing::{debug, info, warn};

use crate::columns::{is_reserved_name, resolve_header, MatchField};
use crate::config::SportConfig;
use crate::error::{LoadError, Result};
use crate::types::{team_key, MatchRecord, MatchTable, Score, Side, SkippedSheet};

pub const SEASON_COLUMN: &str = "season";
pub const TEAM_COLUMN: &str = "team";
pub const RATING_COLUMN: &str = "rating";
const ROW_INDEX_COLUMN: &str = "row_index";

/// What a season-sheet column holds once its header is understood.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ColumnRole {
    Field(MatchField),
    /// Post-match rating of the named team.
    Team(String),
    /// Any other metadata column, carried through by header.
    Extra(String),
}

impl ColumnRole {
    pub fn output_name(&self) -> &str {
        match self {
            ColumnRole::Field(field) => field.canonical_name(),
            ColumnRole::Team(team) => team,
            ColumnRole::Extra(header) => header,
        }
    }

    fn column_kind(&self) -> ColumnKind {
        match self {
            ColumnRole::Field(field) => field.column_kind(),
            ColumnRole::Team(_) => ColumnKind::Number,
            ColumnRole::Extra(_) => ColumnKind::Infer,
        }
    }

    fn is_required(&self) -> bool {
        matches!(self, ColumnRole::Field(field) if MatchField::REQUIRED.contains(field))
    }

    fn sort_rank(&self) -> u8 {
        match self {
            ColumnRole::Field(_) => 0,
            ColumnRole::Team(_) => 1,
            ColumnRole::Extra(_) => 2,
        }
    }
}

/// One season's rows laid out in canonical columns.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonSheet {
    pub season: String,
    pub columns: Vec<ColumnRole>,
    pub rows: Vec<Vec<Cell>>,
}

/// Every loaded season stacked into one wide table.
#[derive(Debug, Clone, PartialEq)]
pub struct WideTable {
    pub headers: Vec<String>,
    pub kinds: HashMap<String, ColumnKind>,
    pub team_columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

/// Loads every season sheet into one row per (match, participating team),
/// ordered by date. Sheets that fail are skipped and reported on the table.
pub fn load_match_detail<S: SheetSource + ?Sized>(
    source: &mut S,
    sport: &SportConfig,
    known_teams: &BTreeSet<String>,
) -> Result<MatchTable> {
    let teams = team_lookup(known_teams);
    let mut seasons = Vec::new();
    let mut skipped = Vec::new();

    for name in source.sheet_names() {
        if sport.is_excluded_sheet(&name) {
            debug!(sheet = %name, "Ignoring non-season sheet");
            continue;
        }
        let season = source
            .read_sheet(&name)
            .map_err(LoadError::from)
            .and_then(|raw| harmonize_season(raw, sport, &teams));
        match season {
            Ok(season) => seasons.push(season),
            Err(err) => {
                warn!(sheet = %name, error = %err, "Skipping season sheet");
                skipped.push(SkippedSheet {
                    sheet: name,
                    reason: err.to_string(),
                });
            }
        }
    }

    if seasons.is_empty() {
        warn!(sport = %sport.name, "No season sheets could be loaded");
        return Ok(MatchTable::new(Vec::new(), skipped));
    }

    let wide = combine_seasons(&seasons);
    if wide.team_columns.is_empty() {
        warn!(sport = %sport.name, "No season sheet has a column for a known team");
        return Ok(MatchTable::new(Vec::new(), skipped));
    }

    let long = reshape_matches(&wide)?;
    let records = records_from_frame(&long)?;

    info!(
        sport = %sport.name,
        seasons = seasons.len(),
        skipped = skipped.len(),
        records = records.len(),
        "Loaded match detail"
    );
    Ok(MatchTable::new(records, skipped))
}

pub fn load_match_detail_file(
    path: impl AsRef<Path>,
    sport: &SportConfig,
    known_teams: &BTreeSet<String>,
) -> Result<MatchTable> {
    let mut workbook = Workbook::open(path)?;
    debug!(path = ?workbook.path(), hash = workbook.content_hash(), "Opened workbook");
    load_match_detail(&mut workbook, sport, known_teams)
}

/// Case- and whitespace-insensitive lookup from header text to team name.
pub fn team_lookup(known_teams: &BTreeSet<String>) -> HashMap<String, String> {
    known_teams
        .iter()
        .map(|team| (team_key(team), team.clone()))
        .collect()
}

/// Classifies a sheet's headers, drops placeholder columns and the starting
/// values row(s), merges synonym columns and parses the date column.
pub fn harmonize_season(
    raw: RawSheet,
    sport: &SportConfig,
    teams: &HashMap<String, String>,
) -> Result<SeasonSheet> {
    let mut groups: Vec<(ColumnRole, Vec<(usize, usize)>)> = Vec::new();

    for (idx, header) in raw.headers.iter().enumerate() {
        if is_placeholder_header(header) {
            continue;
        }
        let (role, priority) = if let Some((field, priority)) = resolve_header(header) {
            (ColumnRole::Field(field), priority)
        } else if let Some(team) = teams.get(&team_key(header)) {
            (ColumnRole::Team(team.clone()), idx)
        } else if is_reserved_name(header) {
            debug!(sheet = %raw.name, header = %header, "Dropping column with a reserved name");
            continue;
        } else {
            (ColumnRole::Extra(header.clone()), idx)
        };

        match groups.iter_mut().find(|(existing, _)| *existing == role) {
            Some((_, sources)) => sources.push((priority, idx)),
            None => groups.push((role, vec![(priority, idx)])),
        }
    }

    for field in MatchField::REQUIRED {
        if !groups
            .iter()
            .any(|(role, _)| *role == ColumnRole::Field(field))
        {
            return Err(LoadError::MissingColumn {
                sheet: raw.name.clone(),
                column: field.canonical_name().to_string(),
            });
        }
    }

    for (_, sources) in groups.iter_mut() {
        sources.sort_by_key(|(priority, _)| *priority);
    }

    let rows = raw
        .rows
        .iter()
        .skip(sport.starting_value_rows)
        .map(|row| {
            groups
                .iter()
                .map(|(role, sources)| {
                    let cell = sources
                        .iter()
                        .map(|(_, idx)| &row[*idx])
                        .find(|cell| !cell.is_empty())
                        .cloned()
                        .unwrap_or(Cell::Empty);
                    match role {
                        ColumnRole::Field(MatchField::Date) => {
                            cell.as_date().map(Cell::Date).unwrap_or(Cell::Empty)
                        }
                        _ => cell,
                    }
                })
                .collect()
        })
        .collect();

    Ok(SeasonSheet {
        season: raw.name.trim().to_string(),
        columns: groups.into_iter().map(|(role, _)| role).collect(),
        rows,
    })
}

/// Stacks seasons over the union of their columns and tags each row with its
/// season. Columns that are empty everywhere are dropped unless required.
pub fn combine_seasons(seasons: &[SeasonSheet]) -> WideTable {
    let mut roles: Vec<ColumnRole> = Vec::new();
    for season in seasons {
        for role in &season.columns {
            if !roles.contains(role) {
                roles.push(role.clone());
            }
        }
    }
    roles.sort_by(|a, b| match (a, b) {
        (ColumnRole::Field(x), ColumnRole::Field(y)) => x.cmp(y),
        _ => a.sort_rank().cmp(&b.sort_rank()),
    });

    let mut rows: Vec<Vec<Cell>> = Vec::new();
    for season in seasons {
        let positions: Vec<Option<usize>> = roles
            .iter()
            .map(|role| season.columns.iter().position(|c| c == role))
            .collect();
        for row in &season.rows {
            let mut combined = Vec::with_capacity(roles.len() + 1);
            combined.push(Cell::Text(season.season.clone()));
            for position in &positions {
                combined.push(position.map(|idx| row[idx].clone()).unwrap_or(Cell::Empty));
            }
            rows.push(combined);
        }
    }

    let populated: Vec<bool> = roles
        .iter()
        .enumerate()
        .map(|(idx, role)| role.is_required() || rows.iter().any(|row| !row[idx + 1].is_empty()))
        .collect();

    let mut headers = vec![SEASON_COLUMN.to_string()];
    let mut kinds = HashMap::new();
    kinds.insert(SEASON_COLUMN.to_string(), ColumnKind::Text);
    let mut team_columns = Vec::new();
    for (role, keep) in roles.iter().zip(&populated) {
        if !keep {
            continue;
        }
        let name = role.output_name().to_string();
        kinds.insert(name.clone(), role.column_kind());
        if matches!(role, ColumnRole::Team(_)) {
            team_columns.push(name.clone());
        }
        headers.push(name);
    }

    let rows = rows
        .into_iter()
        .map(|row| {
            let mut cells = row.into_iter();
            let mut kept = Vec::with_capacity(headers.len());
            kept.extend(cells.next());
            for (cell, keep) in cells.zip(&populated) {
                if *keep {
                    kept.push(cell);
                }
            }
            kept
        })
        .collect();

    WideTable {
        headers,
        kinds,
        team_columns,
        rows,
    }
}

/// Unpivots the team rating columns into `team` / `rating`, keeps the two
/// participants of each match that have a date and a rating, and sorts by date.
pub fn reshape_matches(wide: &WideTable) -> Result<DataFrame> {
    let mut frame = build_frame(&wide.headers, &wide.rows, &wide.kinds)?;
    let row_index: Vec<u32> = (0..frame.height() as u32).collect();
    frame.with_column(Series::new(ROW_INDEX_COLUMN.into(), row_index))?;

    let index_columns: Vec<&str> = frame
        .get_columns()
        .iter()
        .map(|column| column.name().as_str())
        .filter(|name| !wide.team_columns.iter().any(|team| team == name))
        .collect();
    let team_columns: Vec<&str> = wide.team_columns.iter().map(String::as_str).collect();

    let mut long = frame.unpivot(team_columns, index_columns)?;
    long.rename("variable", TEAM_COLUMN.into())?;
    long.rename("value", RATING_COLUMN.into())?;

    let keep: Vec<bool> = {
        let dates = long.column(MatchField::Date.canonical_name())?.is_not_null();
        let ratings = long.column(RATING_COLUMN)?.f64()?;
        let teams = long.column(TEAM_COLUMN)?.str()?;
        let team_1 = long.column(MatchField::Team1.canonical_name())?.str()?;
        let team_2 = long.column(MatchField::Team2.canonical_name())?.str()?;

        (0..long.height())
            .map(|idx| {
                dates.get(idx).unwrap_or(false)
                    && ratings.get(idx).is_some()
                    && teams
                        .get(idx)
                        .is_some_and(|team| is_participant(team, team_1.get(idx), team_2.get(idx)))
            })
            .collect()
    };
    let mask = BooleanChunked::from_slice("keep".into(), &keep);
    let filtered = long.filter(&mask)?;

    let sorted = filtered.sort(
        [MatchField::Date.canonical_name(), ROW_INDEX_COLUMN],
        SortMultipleOptions::default().with_maintain_order(true),
    )?;
    Ok(sorted)
}

/// Converts the reshaped frame into typed records, row for row.
pub fn records_from_frame(long: &DataFrame) -> Result<Vec<MatchRecord>> {
    let days = long
        .column(MatchField::Date.canonical_name())?
        .cast(&DataType::Int32)?;
    let days = days.i32()?;
    let teams = long.column(TEAM_COLUMN)?.str()?;
    let seasons = long.column(SEASON_COLUMN)?.str()?;
    let ratings = long.column(RATING_COLUMN)?.f64()?;

    let text = |field: MatchField| optional_str(long, field);
    let number = |field: MatchField| optional_f64(long, field);

    let grade = text(MatchField::Grade)?;
    let home_away = text(MatchField::HomeAway)?;
    let team_1 = text(MatchField::Team1)?;
    let team_2 = text(MatchField::Team2)?;
    let score_1 = text(MatchField::Team1Score)?;
    let score_2 = text(MatchField::Team2Score)?;
    let goals_1 = number(MatchField::Team1Goals)?;
    let points_1 = number(MatchField::Team1Points)?;
    let goals_2 = number(MatchField::Team2Goals)?;
    let points_2 = number(MatchField::Team2Points)?;
    let change_1 = number(MatchField::Team1RatingChange)?;
    let change_2 = number(MatchField::Team2RatingChange)?;
    let win_probability = number(MatchField::WinProbability)?;
    let post_win_probability = number(MatchField::PostWinProbability)?;

    let structural: HashSet<&str> = [SEASON_COLUMN, TEAM_COLUMN, RATING_COLUMN, ROW_INDEX_COLUMN]
        .into_iter()
        .chain(MatchField::ALL.iter().map(|field| field.canonical_name()))
        .collect();
    let mut extra_columns: Vec<Column> = Vec::new();
    for column in long.get_columns() {
        if !structural.contains(column.name().as_str()) {
            extra_columns.push(column.cast(&DataType::String)?);
        }
    }
    let mut extra_text: Vec<&StringChunked> = Vec::with_capacity(extra_columns.len());
    for column in &extra_columns {
        extra_text.push(column.str()?);
    }

    let mut records = Vec::with_capacity(long.height());
    for idx in 0..long.height() {
        let (Some(team), Some(day), Some(rating)) =
            (teams.get(idx), days.get(idx), ratings.get(idx))
        else {
            continue;
        };
        let Some(date) = date_from_epoch_days(day) else {
            continue;
        };

        let (rating_change_1, rating_change_2) =
            mirror_changes(f64_at(change_1, idx), f64_at(change_2, idx));

        records.push(MatchRecord {
            team: team.to_string(),
            date,
            season: seasons.get(idx).unwrap_or_default().to_string(),
            rating,
            grade: str_at(grade, idx),
            home_away: str_at(home_away, idx),
            win_probability: f64_at(win_probability, idx),
            post_win_probability: f64_at(post_win_probability, idx),
            team_1: Side {
                name: str_at(team_1, idx).unwrap_or_default(),
                score: side_score(
                    f64_at(goals_1, idx),
                    f64_at(points_1, idx),
                    score_1.and_then(|ca| ca.get(idx)),
                ),
                rating_change: rating_change_1,
            },
            team_2: Side {
                name: str_at(team_2, idx).unwrap_or_default(),
                score: side_score(
                    f64_at(goals_2, idx),
                    f64_at(points_2, idx),
                    score_2.and_then(|ca| ca.get(idx)),
                ),
                rating_change: rating_change_2,
            },
            extra: extra_text
                .iter()
                .filter_map(|ca| {
                    ca.get(idx)
                        .map(|value| (ca.name().to_string(), value.to_string()))
                })
                .collect(),
        });
    }
    Ok(records)
}

fn optional_str(df: &DataFrame, field: MatchField) -> Result<Option<&StringChunked>> {
    match df.get_column_index(field.canonical_name()) {
        Some(idx) => Ok(Some(df.get_columns()[idx].str()?)),
        None => Ok(None),
    }
}

fn optional_f64(df: &DataFrame, field: MatchField) -> Result<Option<&Float64Chunked>> {
    match df.get_column_index(field.canonical_name()) {
        Some(idx) => Ok(Some(df.get_columns()[idx].f64()?)),
        None => Ok(None),
    }
}

fn str_at(column: Option<&StringChunked>, idx: usize) -> Option<String> {
    column.and_then(|ca| ca.get(idx)).map(str::to_string)
}

fn f64_at(column: Option<&Float64Chunked>, idx: usize) -> Option<f64> {
    column.and_then(|ca| ca.get(idx))
}

fn side_score(goals: Option<f64>, points: Option<f64>, text: Option<&str>) -> Option<Score> {
    match (goals, points) {
        (Some(goals), Some(points)) => Score::from_parts(goals, points),
        _ => text.and_then(Score::parse),
    }
}

/// Rating changes are zero-sum; a side left blank mirrors the other side.
fn mirror_changes(first: Option<f64>, second: Option<f64>) -> (Option<f64>, Option<f64>) {
    match (first, second) {
        (Some(a), None) => (Some(a), Some(-a)),
        (None, Some(b)) => (Some(-b), Some(b)),
        other => other,
    }
}

fn is_participant(team: &str, team_1: Option<&str>, team_2: Option<&str>) -> bool {
    let team = team_key(team);
    [team_1, team_2]
        .into_iter()
        .flatten()
        .any(|slot| team_key(slot) == team)
}
