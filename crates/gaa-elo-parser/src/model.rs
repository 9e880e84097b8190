use std::collections::HashMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::common::{format_number, parse_date_text, parse_number_text};

/// A single worksheet cell after conversion out of the workbook format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    Number(f64),
    Text(String),
    Bool(bool),
    Date(NaiveDate),
}

impl Cell {
    /// Builds a text cell, collapsing blank strings to `Empty`.
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            Cell::Empty
        } else if trimmed.len() == value.len() {
            Cell::Text(value)
        } else {
            Cell::Text(trimmed.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Numeric view of the cell. Text that reads as a number counts.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(value) if value.is_finite() => Some(*value),
            Cell::Text(text) => parse_number_text(text),
            _ => None,
        }
    }

    /// Text view of the cell. Numbers render without a trailing `.0`.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Number(value) => Some(format_number(*value)),
            Cell::Text(text) => Some(text.clone()),
            Cell::Bool(value) => Some(value.to_string()),
            Cell::Date(date) => Some(date.format("%Y-%m-%d").to_string()),
        }
    }

    /// Calendar-date view of the cell: date cells, Excel serial numbers, or
    /// text in one of the accepted layouts.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Cell::Date(date) => Some(*date),
            Cell::Number(serial) => crate::common::excel_serial_to_date(*serial),
            Cell::Text(text) => parse_date_text(text),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_text().as_deref().unwrap_or(""))
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::text(value)
    }
}

impl From<NaiveDate> for Cell {
    fn from(value: NaiveDate) -> Self {
        Cell::Date(value)
    }
}

/// One worksheet: a normalized header row plus data rows of equal width.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSheet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl RawSheet {
    /// Splits a cell grid into header and data rows. Blank header cells are
    /// named `Unnamed: <index>`, repeated headers get a `.N` suffix, and rows
    /// are padded or cut to the header width.
    pub fn from_grid(name: impl Into<String>, grid: Vec<Vec<Cell>>) -> Option<Self> {
        let mut rows = grid.into_iter();
        let header_cells = rows.next()?;
        let mut seen: HashMap<String, usize> = HashMap::new();
        let headers: Vec<String> = header_cells
            .iter()
            .enumerate()
            .map(|(idx, cell)| {
                let base = header_name(idx, cell);
                let count = seen.entry(base.clone()).or_insert(0);
                *count += 1;
                if *count == 1 {
                    base
                } else {
                    format!("{base}.{}", *count - 1)
                }
            })
            .collect();
        let width = headers.len();

        let rows = rows
            .map(|mut row| {
                row.resize(width, Cell::Empty);
                row
            })
            .collect();

        Some(Self {
            name: name.into(),
            headers,
            rows,
        })
    }

    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == header)
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }
}

fn header_name(idx: usize, cell: &Cell) -> String {
    match cell.as_text() {
        Some(text) if !text.trim().is_empty() => text.trim().to_string(),
        _ => placeholder_header(idx),
    }
}

pub fn placeholder_header(idx: usize) -> String {
    format!("Unnamed: {idx}")
}

/// True for headers synthesized from blank header cells.
pub fn is_placeholder_header(header: &str) -> bool {
    let trimmed = header.trim();
    trimmed.is_empty()
        || trimmed
            .strip_prefix("Unnamed:")
            .is_some_and(|rest| rest.trim().chars().all(|c| c.is_ascii_digit()))
}
