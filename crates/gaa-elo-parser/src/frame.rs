use std::collections::HashMap;

use chrono::NaiveDate;
use polars::prelude::*;

use crate::errors::WorkbookError;
use crate::model::Cell;

/// How a column's cells are coerced into a polars dtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Float64; anything non-numeric becomes null.
    Number,
    /// String; numbers and dates are rendered as text.
    Text,
    /// Date; anything that is not a calendar date becomes null.
    Date,
    /// Chosen from the cells themselves.
    Infer,
}

/// Builds a DataFrame from row-major cells. Columns not named in `kinds` are inferred.
pub fn build_frame(
    headers: &[String],
    rows: &[Vec<Cell>],
    kinds: &HashMap<String, ColumnKind>,
) -> Result<DataFrame, WorkbookError> {
    let mut columns: Vec<Column> = Vec::with_capacity(headers.len());

    for (idx, header) in headers.iter().enumerate() {
        let cells: Vec<&Cell> = rows
            .iter()
            .map(|row| row.get(idx).unwrap_or(&Cell::Empty))
            .collect();
        let kind = match kinds.get(header).copied().unwrap_or(ColumnKind::Infer) {
            ColumnKind::Infer => infer_kind(&cells),
            explicit => explicit,
        };
        let series = build_series(header, &cells, kind)?;
        columns.push(series.into());
    }

    DataFrame::new(columns).map_err(WorkbookError::from)
}

pub fn infer_kind(cells: &[&Cell]) -> ColumnKind {
    let mut saw_number = false;
    let mut saw_date = false;
    for cell in cells {
        match cell {
            Cell::Empty => {}
            Cell::Number(_) => saw_number = true,
            Cell::Date(_) => saw_date = true,
            Cell::Text(_) | Cell::Bool(_) => return ColumnKind::Text,
        }
        if saw_number && saw_date {
            return ColumnKind::Text;
        }
    }
    if saw_date {
        ColumnKind::Date
    } else {
        ColumnKind::Number
    }
}

fn build_series(header: &str, cells: &[&Cell], kind: ColumnKind) -> Result<Series, WorkbookError> {
    let name: PlSmallStr = header.into();
    let series = match kind {
        ColumnKind::Number | ColumnKind::Infer => {
            let values: Vec<Option<f64>> = cells.iter().map(|cell| cell.as_number()).collect();
            Series::new(name, values)
        }
        ColumnKind::Text => {
            let values: Vec<Option<String>> = cells.iter().map(|cell| cell.as_text()).collect();
            Series::new(name, values)
        }
        ColumnKind::Date => {
            let values: Vec<Option<i32>> = cells
                .iter()
                .map(|cell| cell.as_date().map(days_since_epoch))
                .collect();
            Series::new(name, values)
                .cast(&DataType::Date)
                .map_err(|source| WorkbookError::Frame {
                    column: header.to_string(),
                    source,
                })?
        }
    };
    Ok(series)
}

pub fn days_since_epoch(date: NaiveDate) -> i32 {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default();
    (date - epoch).num_days() as i32
}

pub fn date_from_epoch_days(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(1970, 1, 1)?.checked_add_signed(chrono::Duration::days(days as i64))
}
