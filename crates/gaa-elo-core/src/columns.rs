use std::collections::HashMap;

use gaa_elo_parser::ColumnKind;
use once_cell::sync::Lazy;

/// Canonical match-sheet fields. Seasons label these columns differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MatchField {
    Date,
    Grade,
    Team1,
    Team2,
    Team1Goals,
    Team1Points,
    Team2Goals,
    Team2Points,
    Team1Score,
    Team2Score,
    Team1RatingChange,
    Team2RatingChange,
    HomeAway,
    WinProbability,
    PostWinProbability,
}

impl MatchField {
    pub const ALL: [MatchField; 15] = [
        MatchField::Date,
        MatchField::Grade,
        MatchField::Team1,
        MatchField::Team2,
        MatchField::Team1Goals,
        MatchField::Team1Points,
        MatchField::Team2Goals,
        MatchField::Team2Points,
        MatchField::Team1Score,
        MatchField::Team2Score,
        MatchField::Team1RatingChange,
        MatchField::Team2RatingChange,
        MatchField::HomeAway,
        MatchField::WinProbability,
        MatchField::PostWinProbability,
    ];

    /// Fields a season sheet cannot be loaded without.
    pub const REQUIRED: [MatchField; 3] = [MatchField::Date, MatchField::Team1, MatchField::Team2];

    pub fn canonical_name(&self) -> &'static str {
        match self {
            MatchField::Date => "date",
            MatchField::Grade => "grade",
            MatchField::Team1 => "team_1",
            MatchField::Team2 => "team_2",
            MatchField::Team1Goals => "team_1_goals",
            MatchField::Team1Points => "team_1_points",
            MatchField::Team2Goals => "team_2_goals",
            MatchField::Team2Points => "team_2_points",
            MatchField::Team1Score => "team_1_score",
            MatchField::Team2Score => "team_2_score",
            MatchField::Team1RatingChange => "team_1_rating_change",
            MatchField::Team2RatingChange => "team_2_rating_change",
            MatchField::HomeAway => "home_away",
            MatchField::WinProbability => "win_probability",
            MatchField::PostWinProbability => "post_win_probability",
        }
    }

    /// Sheet headers carrying this field, highest priority first. When several
    /// are present the first non-empty cell in this order wins.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            MatchField::Date => &["Date", "Match date", "Fixture date"],
            MatchField::Grade => &["Grade", "Competition", "Comp"],
            MatchField::Team1 => &["Team 1", "T1", "Team1"],
            MatchField::Team2 => &["Team 2", "T2", "Team2"],
            MatchField::Team1Goals => &["T1 goals", "Team 1 goals", "T1 G"],
            MatchField::Team1Points => &["T1 points", "Team 1 points", "T1 P", "T1 pts"],
            MatchField::Team2Goals => &["T2 goals", "Team 2 goals", "T2 G"],
            MatchField::Team2Points => &["T2 points", "Team 2 points", "T2 P", "T2 pts"],
            MatchField::Team1Score => &["T1 score", "Team 1 score", "Score 1"],
            MatchField::Team2Score => &["T2 score", "Team 2 score", "Score 2"],
            MatchField::Team1RatingChange => {
                &["T1 change", "T1 Elo change", "T1 rating change", "Team 1 change"]
            }
            MatchField::Team2RatingChange => {
                &["T2 change", "T2 Elo change", "T2 rating change", "Team 2 change"]
            }
            MatchField::HomeAway => &["Home/away", "H/A", "Home or away", "Venue"],
            MatchField::WinProbability => &["Odds", "Win prob", "Pre-match odds", "T1 win prob"],
            MatchField::PostWinProbability => {
                &["Post-match odds", "Post odds", "Post win prob"]
            }
        }
    }

    pub fn column_kind(&self) -> ColumnKind {
        match self {
            MatchField::Date => ColumnKind::Date,
            MatchField::Grade
            | MatchField::Team1
            | MatchField::Team2
            | MatchField::Team1Score
            | MatchField::Team2Score
            | MatchField::HomeAway => ColumnKind::Text,
            MatchField::Team1Goals
            | MatchField::Team1Points
            | MatchField::Team2Goals
            | MatchField::Team2Points
            | MatchField::Team1RatingChange
            | MatchField::Team2RatingChange
            | MatchField::WinProbability
            | MatchField::PostWinProbability => ColumnKind::Number,
        }
    }
}

/// Header lookup: normalized alias -> (field, priority).
static SYNONYMS: Lazy<HashMap<String, (MatchField, usize)>> = Lazy::new(|| {
    let mut table = HashMap::new();
    for field in MatchField::ALL {
        for (priority, alias) in field.aliases().iter().enumerate() {
            table.insert(normalize_header(alias), (field, priority));
        }
    }
    table
});

/// Resolves a raw sheet header to its canonical field and alias priority.
pub fn resolve_header(header: &str) -> Option<(MatchField, usize)> {
    SYNONYMS.get(&normalize_header(header)).copied()
}

/// Lowercases and collapses runs of whitespace.
pub fn normalize_header(header: &str) -> String {
    header
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Column names the detail table reserves for itself.
pub fn is_reserved_name(header: &str) -> bool {
    const RESERVED: [&str; 6] = ["season", "team", "rating", "row_index", "variable", "value"];
    let normalized = normalize_header(header);
    RESERVED.contains(&normalized.as_str())
        || MatchField::ALL
            .iter()
            .any(|field| field.canonical_name() == normalized)
}
