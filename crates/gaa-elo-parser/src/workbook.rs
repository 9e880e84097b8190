use std::collections::HashSet;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use blake3::Hasher;
use calamine::{open_workbook_auto_from_rs, Data, Reader, Sheets};

use crate::common::parse_date_text;
use crate::errors::WorkbookError;
use crate::model::{Cell, RawSheet};

/// Anything that can hand out named sheets as raw cell grids.
pub trait SheetSource {
    /// Sheet names in workbook order.
    fn sheet_names(&self) -> Vec<String>;
    fn read_sheet(&mut self, name: &str) -> Result<RawSheet, WorkbookError>;
}

/// A spreadsheet file (xlsx, xls, xlsb or ods) held in memory.
pub struct Workbook {
    path: Option<PathBuf>,
    content_hash: String,
    sheets: Sheets<Cursor<Vec<u8>>>,
}

impl std::fmt::Debug for Workbook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workbook")
            .field("path", &self.path)
            .field("content_hash", &self.content_hash)
            .finish()
    }
}

impl Workbook {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, WorkbookError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let content_hash = content_hash(&bytes);
        let sheets =
            open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(|source| WorkbookError::Open {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self {
            path: Some(path.to_path_buf()),
            content_hash,
            sheets,
        })
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, WorkbookError> {
        let content_hash = content_hash(&bytes);
        let sheets = open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(WorkbookError::Decode)?;
        Ok(Self {
            path: None,
            content_hash,
            sheets,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// blake3 hex digest of the file bytes.
    pub fn content_hash(&self) -> &str {
        &self.content_hash
    }
}

impl SheetSource for Workbook {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.sheet_names()
    }

    fn read_sheet(&mut self, name: &str) -> Result<RawSheet, WorkbookError> {
        if !self.sheets.sheet_names().iter().any(|n| n == name) {
            return Err(WorkbookError::MissingSheet(name.to_string()));
        }
        let range = self
            .sheets
            .worksheet_range(name)
            .map_err(|err| WorkbookError::Unreadable {
                sheet: name.to_string(),
                message: err.to_string(),
            })?;

        let grid: Vec<Vec<Cell>> = range
            .rows()
            .map(|row| row.iter().map(convert_cell).collect())
            .collect();

        RawSheet::from_grid(name, grid).ok_or_else(|| WorkbookError::EmptySheet(name.to_string()))
    }
}

pub(crate) fn convert_cell(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::Int(value) => Cell::Number(*value as f64),
        Data::Float(value) => Cell::Number(*value),
        Data::Bool(value) => Cell::Bool(*value),
        Data::String(value) => Cell::text(value.as_str()),
        Data::DateTime(value) => match crate::common::excel_serial_to_date(value.as_f64()) {
            Some(date) => Cell::Date(date),
            None => Cell::Number(value.as_f64()),
        },
        Data::DateTimeIso(value) => match parse_date_text(value) {
            Some(date) => Cell::Date(date),
            None => Cell::text(value.as_str()),
        },
        Data::DurationIso(value) => Cell::text(value.as_str()),
    }
}

/// blake3 hex digest used to identify workbook contents.
pub fn content_hash(contents: &[u8]) -> String {
    let mut hasher = Hasher::new();
    hasher.update(contents);
    let hash = hasher.finalize();
    hash.to_hex().to_string()
}

/// Sheets supplied as ready-made cell grids, e.g. from another export format.
#[derive(Debug, Clone, Default)]
pub struct MemoryWorkbook {
    order: Vec<String>,
    grids: Vec<(String, Vec<Vec<Cell>>)>,
    unreadable: HashSet<String>,
}

impl MemoryWorkbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a sheet; the first grid row is the header row.
    pub fn with_sheet(mut self, name: impl Into<String>, grid: Vec<Vec<Cell>>) -> Self {
        let name = name.into();
        self.order.push(name.clone());
        self.grids.push((name, grid));
        self
    }

    /// Adds a sheet name whose contents cannot be read.
    pub fn with_unreadable_sheet(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.order.push(name.clone());
        self.unreadable.insert(name);
        self
    }
}

impl SheetSource for MemoryWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.order.clone()
    }

    fn read_sheet(&mut self, name: &str) -> Result<RawSheet, WorkbookError> {
        if self.unreadable.contains(name) {
            return Err(WorkbookError::Unreadable {
                sheet: name.to_string(),
                message: "sheet data is corrupt".to_string(),
            });
        }
        let grid = self
            .grids
            .iter()
            .find(|(sheet, _)| sheet == name)
            .map(|(_, grid)| grid.clone())
            .ok_or_else(|| WorkbookError::MissingSheet(name.to_string()))?;
        RawSheet::from_grid(name, grid).ok_or_else(|| WorkbookError::EmptySheet(name.to_string()))
    }
}
