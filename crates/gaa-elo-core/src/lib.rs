pub mod cache;
pub mod columns;
pub mod config;
pub mod error;
pub mod match_detail;
pub mod selection;
pub mod summary;
pub mod types;
pub mod upsets;

pub use cache::{LoadCache, SportData};
pub use config::{DashboardConfig, SportConfig};
pub use error::{LoadError, Result};
pub use match_detail::{load_match_detail, load_match_detail_file};
pub use selection::TeamSelection;
pub use summary::{load_summary, load_summary_file};
pub use types::{
    MatchRecord, MatchTable, RatingRecord, Score, Side, SkippedSheet, Slot, SummaryTable,
};
pub use upsets::{rank_upsets, unique_matches, Upset};
