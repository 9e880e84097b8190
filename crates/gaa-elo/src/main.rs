// crates/gaa-elo/src/main.rs

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use gaa_elo_core::{DashboardConfig, TeamSelection};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

/// Historical GAA Elo ratings from the published football and hurling workbooks
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TOML file describing each sport's workbook; built-in defaults otherwise
    #[arg(long, env = "GAA_ELO_CONFIG", global = true)]
    config: Option<PathBuf>,
    /// Sport to show, matched case-insensitively
    #[arg(long, default_value = "Football", global = true)]
    sport: String,
    /// Print JSON instead of a table
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug, Clone, Default)]
pub struct TeamArgs {
    /// Team to include; repeat for several. Defaults to the sport's preset teams
    #[arg(long = "team")]
    pub teams: Vec<String>,
    /// Include every team
    #[arg(long, conflicts_with = "teams")]
    pub all_teams: bool,
}

impl TeamArgs {
    pub fn selection(&self) -> TeamSelection {
        TeamSelection::from_args(self.all_teams, self.teams.clone())
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Year-end ratings per team
    Summary {
        #[command(flatten)]
        teams: TeamArgs,
    },
    /// Match-by-match ratings for one season
    Matches {
        #[command(flatten)]
        teams: TeamArgs,
        /// Season sheet to show; the latest season by default
        #[arg(long)]
        season: Option<String>,
    },
    /// Biggest rating swings of one season
    Upsets {
        #[arg(long)]
        season: Option<String>,
        /// Number of matches to list; the sport's configured limit by default
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Teams present in the year-end sheet
    Teams,
    /// Season sheets that loaded, plus any that were skipped
    Seasons,
    /// Write a table as CSV
    Export {
        #[arg(value_enum)]
        table: ExportTable,
        #[command(flatten)]
        teams: TeamArgs,
        #[arg(long)]
        season: Option<String>,
        /// Destination file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportTable {
    Summary,
    Matches,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;
    let sport = config.sport(&cli.sport)?.clone();
    info!(sport = %sport.name, workbook = %sport.workbook.display(), "Using workbook");

    let ctx = commands::Context::new(sport, cli.json);
    match cli.command {
        Command::Summary { teams } => commands::summary(&ctx, &teams),
        Command::Matches { teams, season } => commands::matches(&ctx, &teams, season.as_deref()),
        Command::Upsets { season, limit } => commands::upsets(&ctx, season.as_deref(), limit),
        Command::Teams => commands::teams(&ctx),
        Command::Seasons => commands::seasons(&ctx),
        Command::Export {
            table,
            teams,
            season,
            output,
        } => commands::export(&ctx, table, &teams, season.as_deref(), output.as_deref()),
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<DashboardConfig> {
    match path {
        Some(path) => DashboardConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => Ok(DashboardConfig::default()),
    }
}
