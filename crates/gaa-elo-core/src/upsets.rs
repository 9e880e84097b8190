use std::collections::HashSet;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{MatchRecord, Score};

/// A ranked match, with the side that gained rating reported as the winner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Upset {
    pub date: NaiveDate,
    pub season: String,
    pub grade: Option<String>,
    pub winner: String,
    pub loser: String,
    pub winner_score: Option<Score>,
    pub loser_score: Option<Score>,
    /// Absolute rating swing; always non-negative.
    pub swing: f64,
}

impl fmt::Display for Upset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.winner)?;
        if let Some(score) = self.winner_score {
            write!(f, " {score}")?;
        }
        write!(f, " beat {}", self.loser)?;
        if let Some(score) = self.loser_score {
            write!(f, " {score}")?;
        }
        Ok(())
    }
}

#[derive(PartialEq, Eq, Hash)]
struct MatchKey {
    date: NaiveDate,
    team_1: String,
    team_2: String,
    score_1: Option<Score>,
    score_2: Option<Score>,
    change_bits: Option<u64>,
    grade: Option<String>,
}

impl MatchKey {
    fn of(record: &MatchRecord) -> Self {
        Self {
            date: record.date,
            team_1: record.team_1.name.clone(),
            team_2: record.team_2.name.clone(),
            score_1: record.team_1.score,
            score_2: record.team_2.score,
            change_bits: record.team_1.rating_change.map(f64::to_bits),
            grade: record.grade.clone(),
        }
    }
}

/// Collapses the two participant rows of each match into one, keeping the
/// first row seen.
pub fn unique_matches<'a, I>(records: I) -> Vec<&'a MatchRecord>
where
    I: IntoIterator<Item = &'a MatchRecord>,
{
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|record| seen.insert(MatchKey::of(record)))
        .collect()
}

/// Top `limit` matches by absolute team-1 rating change. Equal swings keep
/// their input order; matches without a recorded change are not ranked.
pub fn rank_upsets<'a, I>(records: I, limit: usize) -> Vec<Upset>
where
    I: IntoIterator<Item = &'a MatchRecord>,
{
    let mut ranked: Vec<(&MatchRecord, f64)> = unique_matches(records)
        .into_iter()
        .filter_map(|record| record.team_1.rating_change.map(|change| (record, change)))
        .filter(|(_, change)| change.is_finite())
        .collect();
    ranked.sort_by(|(_, a), (_, b)| b.abs().total_cmp(&a.abs()));

    ranked
        .into_iter()
        .take(limit)
        .map(|(record, change)| {
            let (winner, loser) = if change > 0.0 {
                (&record.team_1, &record.team_2)
            } else {
                (&record.team_2, &record.team_1)
            };
            Upset {
                date: record.date,
                season: record.season.clone(),
                grade: record.grade.clone(),
                winner: winner.name.clone(),
                loser: loser.name.clone(),
                winner_score: winner.score,
                loser_score: loser.score,
                swing: change.abs(),
            }
        })
        .collect()
}
