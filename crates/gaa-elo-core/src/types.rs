use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A Gaelic games scoreline: a goal is worth three points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Score {
    pub goals: u32,
    pub points: u32,
}

impl Score {
    pub fn new(goals: u32, points: u32) -> Self {
        Self { goals, points }
    }

    /// Total in points.
    pub fn total(&self) -> u64 {
        u64::from(self.goals) * 3 + u64::from(self.points)
    }

    /// Parses `g-p`, tolerating a trailing `(total)` and surrounding spaces.
    pub fn parse(text: &str) -> Option<Self> {
        let body = match text.find('(') {
            Some(idx) => &text[..idx],
            None => text,
        };
        let (goals, points) = body.trim().split_once('-')?;
        Some(Self {
            goals: goals.trim().parse().ok()?,
            points: points.trim().parse().ok()?,
        })
    }

    /// Builds a score from sheet numbers; negative or fractional values are rejected.
    pub fn from_parts(goals: f64, points: f64) -> Option<Self> {
        let whole = |value: f64| {
            (value.is_finite() && value >= 0.0 && value.fract() == 0.0).then_some(value as u32)
        };
        Some(Self {
            goals: whole(goals)?,
            points: whole(points)?,
        })
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{} ({})", self.goals, self.points, self.total())
    }
}

/// Year-end rating of one team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingRecord {
    pub team: String,
    pub year: i32,
    pub rating: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryTable {
    records: Vec<RatingRecord>,
}

impl SummaryTable {
    pub fn new(records: Vec<RatingRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[RatingRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn teams(&self) -> BTreeSet<String> {
        self.records.iter().map(|r| r.team.clone()).collect()
    }

    pub fn years(&self) -> BTreeSet<i32> {
        self.records.iter().map(|r| r.year).collect()
    }

    /// Records of the given teams, ordered by year then team.
    pub fn for_teams(&self, teams: &[String]) -> Vec<&RatingRecord> {
        let wanted: HashSet<&str> = teams.iter().map(String::as_str).collect();
        let mut selected: Vec<&RatingRecord> = self
            .records
            .iter()
            .filter(|r| wanted.contains(r.team.as_str()))
            .collect();
        selected.sort_by(|a, b| a.year.cmp(&b.year).then_with(|| a.team.cmp(&b.team)));
        selected
    }
}

/// Which side of the original match row a team occupied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Slot {
    One,
    Two,
}

/// One participant as recorded on the match row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Side {
    pub name: String,
    pub score: Option<Score>,
    pub rating_change: Option<f64>,
}

/// One team's participation in one match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub team: String,
    pub date: NaiveDate,
    pub season: String,
    /// The team's rating after the match.
    pub rating: f64,
    pub grade: Option<String>,
    pub home_away: Option<String>,
    /// Pre-match win probability of team 1.
    pub win_probability: Option<f64>,
    pub post_win_probability: Option<f64>,
    pub team_1: Side,
    pub team_2: Side,
    /// Season-sheet columns with no canonical field, rendered as text.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

/// Key under which team names compare equal: whitespace collapsed, Unicode lowercased.
pub(crate) fn team_key(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

impl MatchRecord {
    /// Matched with the same key the loader uses to keep participant rows.
    pub fn slot(&self) -> Slot {
        if team_key(&self.team) == team_key(&self.team_1.name) {
            Slot::One
        } else {
            Slot::Two
        }
    }

    pub fn own_side(&self) -> &Side {
        match self.slot() {
            Slot::One => &self.team_1,
            Slot::Two => &self.team_2,
        }
    }

    pub fn opponent_side(&self) -> &Side {
        match self.slot() {
            Slot::One => &self.team_2,
            Slot::Two => &self.team_1,
        }
    }

    pub fn opponent(&self) -> &str {
        &self.opponent_side().name
    }

    pub fn own_score(&self) -> Option<Score> {
        self.own_side().score
    }

    pub fn opponent_score(&self) -> Option<Score> {
        self.opponent_side().score
    }

    pub fn rating_change(&self) -> Option<f64> {
        self.own_side().rating_change
    }
}

/// A season sheet left out of the detail table, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedSheet {
    pub sheet: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchTable {
    records: Vec<MatchRecord>,
    skipped: Vec<SkippedSheet>,
}

impl MatchTable {
    pub fn new(records: Vec<MatchRecord>, skipped: Vec<SkippedSheet>) -> Self {
        Self { records, skipped }
    }

    pub fn records(&self) -> &[MatchRecord] {
        &self.records
    }

    pub fn skipped(&self) -> &[SkippedSheet] {
        &self.skipped
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn teams(&self) -> BTreeSet<String> {
        self.records.iter().map(|r| r.team.clone()).collect()
    }

    pub fn seasons(&self) -> BTreeSet<String> {
        self.records.iter().map(|r| r.season.clone()).collect()
    }

    pub fn for_season(&self, season: &str) -> Vec<&MatchRecord> {
        self.records
            .iter()
            .filter(|r| r.season == season)
            .collect()
    }

    pub fn for_teams(&self, teams: &[String]) -> Vec<&MatchRecord> {
        let wanted: HashSet<&str> = teams.iter().map(String::as_str).collect();
        self.records
            .iter()
            .filter(|r| wanted.contains(r.team.as_str()))
            .collect()
    }
}
