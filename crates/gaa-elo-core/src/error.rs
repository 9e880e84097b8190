// crates/gaa-elo-core/src/error.rs

use gaa_elo_parser::WorkbookError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Workbook error: {0}")]
    Workbook(#[from] WorkbookError),

    #[error("Polars operation failed: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config file could not be parsed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Sheet '{sheet}' has no '{column}' column")]
    MissingColumn { sheet: String, column: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("No sport named '{0}' is configured")]
    UnknownSport(String),
}

pub type Result<T> = std::result::Result<T, LoadError>;
