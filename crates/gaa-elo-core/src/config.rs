use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{LoadError, Result};

/// Settings for every sport the dashboard can show.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(rename = "sport")]
    pub sports: Vec<SportConfig>,
}

/// One sport's workbook and the layout conventions of its sheets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SportConfig {
    pub name: String,
    pub workbook: PathBuf,
    /// Header of the summary-sheet column that holds team names.
    pub team_column: String,
    pub summary_sheet: String,
    /// Summary column holding the in-progress season's rating.
    pub current_column: String,
    pub first_year: i32,
    pub current_year: i32,
    pub excluded_sheets: Vec<String>,
    /// Rows directly under a season sheet's header that hold starting values.
    pub starting_value_rows: usize,
    pub default_teams: Vec<String>,
    pub upset_limit: usize,
}

impl Default for SportConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            workbook: PathBuf::new(),
            team_column: "Team".to_string(),
            summary_sheet: "Elo values".to_string(),
            current_column: "Today".to_string(),
            first_year: 2009,
            current_year: 2025,
            excluded_sheets: vec!["Rules".to_string(), "Elo values".to_string()],
            starting_value_rows: 1,
            default_teams: Vec::new(),
            upset_limit: 5,
        }
    }
}

impl SportConfig {
    pub fn football() -> Self {
        Self {
            name: "Football".to_string(),
            workbook: PathBuf::from("data/🏐 GAA Elo ratings - Football.xlsx"),
            team_column: "Unnamed: 0".to_string(),
            default_teams: vec!["Dublin".to_string(), "Kerry".to_string()],
            ..Self::default()
        }
    }

    pub fn hurling() -> Self {
        Self {
            name: "Hurling".to_string(),
            workbook: PathBuf::from("data/⚾ GAA Elo ratings - Hurling.xlsx"),
            team_column: "Team".to_string(),
            default_teams: ["Limerick", "Kilkenny", "Cork", "Tipperary"]
                .iter()
                .map(|team| team.to_string())
                .collect(),
            ..Self::default()
        }
    }

    /// Whether a sheet is a rules/summary tab or a season that has not started.
    pub fn is_excluded_sheet(&self, sheet: &str) -> bool {
        let trimmed = sheet.trim();
        if self
            .excluded_sheets
            .iter()
            .any(|excluded| excluded.trim().eq_ignore_ascii_case(trimmed))
        {
            return true;
        }
        match season_year(trimmed) {
            Some(year) => year > self.current_year,
            None => false,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(LoadError::Config("sport name must not be empty".to_string()));
        }
        if self.team_column.trim().is_empty() {
            return Err(LoadError::Config(format!(
                "sport '{}' has an empty team_column",
                self.name
            )));
        }
        if self.first_year > self.current_year {
            return Err(LoadError::Config(format!(
                "sport '{}' has first_year {} after current_year {}",
                self.name, self.first_year, self.current_year
            )));
        }
        if self.upset_limit == 0 {
            return Err(LoadError::Config(format!(
                "sport '{}' must rank at least one upset",
                self.name
            )));
        }
        Ok(())
    }
}

/// Parses a sheet name made of exactly four digits.
pub fn season_year(label: &str) -> Option<i32> {
    let trimmed = label.trim();
    if trimmed.len() == 4 && trimmed.chars().all(|c| c.is_ascii_digit()) {
        trimmed.parse().ok()
    } else {
        None
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            sports: vec![SportConfig::football(), SportConfig::hurling()],
        }
    }
}

impl DashboardConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: DashboardConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a TOML file; relative workbook paths resolve against its directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&content)?;
        if let Some(base) = path.parent() {
            for sport in &mut config.sports {
                if sport.workbook.is_relative() {
                    sport.workbook = base.join(&sport.workbook);
                }
            }
        }
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.sports.is_empty() {
            return Err(LoadError::Config("no sports configured".to_string()));
        }
        let mut seen = HashSet::new();
        for sport in &self.sports {
            sport.validate()?;
            if !seen.insert(sport.name.to_ascii_lowercase()) {
                return Err(LoadError::Config(format!(
                    "sport '{}' is configured twice",
                    sport.name
                )));
            }
        }
        Ok(())
    }

    pub fn sport(&self, name: &str) -> Result<&SportConfig> {
        self.sports
            .iter()
            .find(|sport| sport.name.eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| LoadError::UnknownSport(name.to_string()))
    }

    pub fn sport_names(&self) -> Vec<&str> {
        self.sports.iter().map(|sport| sport.name.as_str()).collect()
    }
}
