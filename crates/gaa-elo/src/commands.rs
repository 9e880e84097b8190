// crates/gaa-elo/src/commands.rs

use std::path::Path;

use anyhow::{bail, Result};
use gaa_elo_core::{
    rank_upsets, LoadCache, MatchRecord, MatchTable, SportConfig, SportData, SummaryTable,
};
use tracing::info;

use crate::output::{self, MatchRow, SummaryRow};
use crate::{ExportTable, TeamArgs};

pub const NO_TEAMS_PROMPT: &str = "Please select at least one team.";

pub struct Context {
    pub sport: SportConfig,
    pub json: bool,
    cache: LoadCache,
}

impl Context {
    pub fn new(sport: SportConfig, json: bool) -> Self {
        Self {
            sport,
            json,
            cache: LoadCache::default(),
        }
    }

    fn sport_data(&self) -> Result<SportData> {
        let data = self.cache.sport_data(&self.sport)?;
        report_skipped(&data.matches);
        Ok(data)
    }

    fn resolve_teams(&self, args: &TeamArgs, summary: &SummaryTable) -> Vec<String> {
        args.selection()
            .resolve(&summary.teams(), &self.sport.default_teams)
    }
}

pub fn summary(ctx: &Context, args: &TeamArgs) -> Result<()> {
    let summary = ctx.cache.summary(&ctx.sport)?;
    let teams = ctx.resolve_teams(args, &summary);
    if teams.is_empty() {
        println!("{NO_TEAMS_PROMPT}");
        return Ok(());
    }

    let records = summary.for_teams(&teams);
    if ctx.json {
        let rows: Vec<SummaryRow> = records.into_iter().map(SummaryRow::from).collect();
        return output::print_json(&rows);
    }
    println!("{}", output::summary_table(&teams, &records));
    Ok(())
}

pub fn matches(ctx: &Context, args: &TeamArgs, season: Option<&str>) -> Result<()> {
    let data = ctx.sport_data()?;
    if data.matches.is_empty() {
        println!("No match data is available for {}.", ctx.sport.name);
        return Ok(());
    }
    let teams = ctx.resolve_teams(args, &data.summary);
    if teams.is_empty() {
        println!("{NO_TEAMS_PROMPT}");
        return Ok(());
    }

    let season = resolve_season(&data.matches, season)?;
    let rows: Vec<MatchRow> = data
        .matches
        .for_season(&season)
        .into_iter()
        .filter(|record| teams.contains(&record.team))
        .map(MatchRow::from)
        .collect();

    if ctx.json {
        return output::print_json(&rows);
    }
    println!("{} season {season}", ctx.sport.name);
    println!("{}", output::matches_table(&rows));
    Ok(())
}

pub fn upsets(ctx: &Context, season: Option<&str>, limit: Option<usize>) -> Result<()> {
    let data = ctx.sport_data()?;
    if data.matches.is_empty() {
        println!("No match data is available for {}.", ctx.sport.name);
        return Ok(());
    }

    let season = resolve_season(&data.matches, season)?;
    let limit = limit.unwrap_or(ctx.sport.upset_limit);
    let upsets = rank_upsets(data.matches.for_season(&season), limit);

    if ctx.json {
        return output::print_json(&upsets);
    }
    println!("Biggest shocks of {season}");
    println!("{}", output::upsets_table(&upsets));
    Ok(())
}

pub fn teams(ctx: &Context) -> Result<()> {
    let summary = ctx.cache.summary(&ctx.sport)?;
    let teams: Vec<String> = summary.teams().into_iter().collect();
    if ctx.json {
        return output::print_json(&teams);
    }
    for team in teams {
        println!("{team}");
    }
    Ok(())
}

pub fn seasons(ctx: &Context) -> Result<()> {
    let data = ctx.sport_data()?;
    if ctx.json {
        return output::print_json(&output::season_listing(&data.matches));
    }
    println!("{}", output::seasons_table(&data.matches));
    Ok(())
}

pub fn export(
    ctx: &Context,
    table: ExportTable,
    args: &TeamArgs,
    season: Option<&str>,
    destination: Option<&Path>,
) -> Result<()> {
    let written = match table {
        ExportTable::Summary => {
            let summary = ctx.cache.summary(&ctx.sport)?;
            let teams = ctx.resolve_teams(args, &summary);
            if teams.is_empty() {
                println!("{NO_TEAMS_PROMPT}");
                return Ok(());
            }
            let rows: Vec<SummaryRow> = summary
                .for_teams(&teams)
                .into_iter()
                .map(SummaryRow::from)
                .collect();
            output::write_csv(&rows, destination)?
        }
        ExportTable::Matches => {
            let data = ctx.sport_data()?;
            let teams = ctx.resolve_teams(args, &data.summary);
            if teams.is_empty() {
                println!("{NO_TEAMS_PROMPT}");
                return Ok(());
            }
            let records: Vec<&MatchRecord> = match season {
                Some(season) => {
                    let season = resolve_season(&data.matches, Some(season))?;
                    data.matches.for_season(&season)
                }
                None => data.matches.records().iter().collect(),
            };
            let rows: Vec<MatchRow> = records
                .into_iter()
                .filter(|record| teams.contains(&record.team))
                .map(MatchRow::from)
                .collect();
            output::write_csv(&rows, destination)?
        }
    };

    info!(rows = written, table = ?table, "Exported table");
    Ok(())
}

/// The requested season, or the latest one loaded.
fn resolve_season(matches: &MatchTable, requested: Option<&str>) -> Result<String> {
    let seasons = matches.seasons();
    match requested {
        Some(season) => {
            let season = season.trim();
            if seasons.contains(season) {
                Ok(season.to_string())
            } else {
                let available: Vec<&str> = seasons.iter().map(String::as_str).collect();
                bail!(
                    "no season '{season}' was loaded; available: {}",
                    available.join(", ")
                )
            }
        }
        None => match seasons.iter().next_back() {
            Some(latest) => Ok(latest.clone()),
            None => bail!("no seasons were loaded"),
        },
    }
}

fn report_skipped(matches: &MatchTable) {
    for skipped in matches.skipped() {
        eprintln!("warning: skipped sheet '{}': {}", skipped.sheet, skipped.reason);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;
    use tempfile::TempDir;

    fn write_summary_only(path: &Path) {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name("Elo values").unwrap();
        sheet.write_string(0, 1, "end of 2019").unwrap();
        for (row, (team, rating)) in [("Dublin", 1832.0), ("Kerry", 1748.0)].iter().enumerate() {
            let row = row as u32 + 1;
            sheet.write_string(row, 0, *team).unwrap();
            sheet.write_number(row, 1, *rating).unwrap();
        }
        workbook.save(path).unwrap();
    }

    #[test]
    fn summary_export_loads_only_the_summary() {
        let dir = TempDir::new().unwrap();
        let workbook = dir.path().join("football.xlsx");
        write_summary_only(&workbook);
        let sport = SportConfig {
            workbook,
            ..SportConfig::football()
        };
        let ctx = Context::new(sport, false);

        let destination = dir.path().join("summary.csv");
        export(
            &ctx,
            ExportTable::Summary,
            &TeamArgs::default(),
            None,
            Some(&destination),
        )
        .unwrap();

        let written = std::fs::read_to_string(&destination).unwrap();
        assert_eq!(
            written.lines().collect::<Vec<_>>(),
            vec!["team,year,rating", "Dublin,2019,1832.0", "Kerry,2019,1748.0"]
        );
        assert_eq!(ctx.cache.len(), 1);
    }
}
