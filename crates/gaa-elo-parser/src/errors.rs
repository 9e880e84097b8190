use std::path::PathBuf;

use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkbookError {
    #[error("failed to open workbook {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("failed to read workbook bytes: {0}")]
    Io(#[from] std::io::Error),

    #[error("workbook could not be decoded: {0}")]
    Decode(#[source] calamine::Error),

    #[error("sheet '{0}' is not present in the workbook")]
    MissingSheet(String),

    #[error("sheet '{sheet}' could not be read: {message}")]
    Unreadable { sheet: String, message: String },

    #[error("sheet '{0}' has no header row")]
    EmptySheet(String),

    #[error("column '{column}' could not be built: {source}")]
    Frame {
        column: String,
        #[source]
        source: PolarsError,
    },

    #[error("Polars operation failed: {0}")]
    Polars(#[from] PolarsError),
}
