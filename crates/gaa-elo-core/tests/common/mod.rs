#![allow(dead_code)]

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use gaa_elo_core::SportConfig;
use gaa_elo_parser::{Cell, MemoryWorkbook};
use rust_xlsxwriter::{Workbook as XlsxWriter, XlsxError};

pub fn t(value: &str) -> Cell {
    Cell::text(value)
}

pub fn n(value: f64) -> Cell {
    Cell::Number(value)
}

pub fn e() -> Cell {
    Cell::Empty
}

pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).expect("valid date")
}

pub fn row(cells: &[Cell]) -> Vec<Cell> {
    cells.to_vec()
}

pub fn headers(names: &[&str]) -> Vec<Cell> {
    names.iter().map(|name| Cell::text(*name)).collect()
}

/// Three teams, four value columns: two year-ends, the in-progress column and
/// a notes column that is not a year.
pub fn summary_grid() -> Vec<Vec<Cell>> {
    vec![
        headers(&["", "end of 2018", "end of 2019", "Today", "Notes"]),
        row(&[t("Dublin"), n(1790.0), n(1832.0), n(1850.0), t("champions")]),
        row(&[t("Kerry"), n(1760.0), n(1748.0), e(), e()]),
        row(&[t("Mayo"), n(1705.0), n(1710.0), n(1702.5), e()]),
    ]
}

/// 2019: goals/points columns, the first legacy odds name, a placeholder
/// column, a starting-values row and one row with an unusable date.
pub fn season_2019_grid() -> Vec<Vec<Cell>> {
    vec![
        headers(&[
            "Date", "Grade", "Team 1", "Team 2", "T1 goals", "T1 points", "T2 goals",
            "T2 points", "T1 change", "T2 change", "Odds", "Dublin", "Kerry", "Mayo", "",
        ]),
        row(&[
            e(), e(), e(), e(), e(), e(), e(), e(), e(), e(), e(),
            n(1790.0), n(1760.0), n(1705.0), t("start"),
        ]),
        row(&[
            Cell::Date(d(2019, 5, 12)), t("Super 8"), t("Dublin"), t("Kerry"),
            n(2.0), n(3.0), n(1.0), n(4.0), n(12.0), n(-12.0), n(0.6),
            n(1802.0), n(1748.0), n(1705.0), e(),
        ]),
        row(&[
            t("01/06/2019"), t("Connacht"), t("Mayo"), t("Dublin"),
            n(0.0), n(10.0), n(1.0), n(15.0), n(-20.0), n(20.0), n(0.3),
            n(1822.0), n(1748.0), n(1685.0), e(),
        ]),
        row(&[
            Cell::Date(d(2019, 7, 1)), t("Qualifier"), t("Kerry"), t("Mayo"),
            n(1.0), n(12.0), n(2.0), n(14.0), e(), n(30.0), n(0.7),
            n(1822.0), n(1718.0), n(1715.0), e(),
        ]),
        row(&[
            t("TBC"), t("Final"), t("Dublin"), t("Mayo"),
            e(), e(), e(), e(), e(), e(), e(),
            n(1822.0), n(1718.0), n(1715.0), e(),
        ]),
    ]
}

/// 2018: abbreviated team headers, text scores and the second legacy odds name.
pub fn season_2018_grid() -> Vec<Vec<Cell>> {
    vec![
        headers(&[
            "Match date", "T1", "T2", "T1 score", "T2 score", "T1 change", "T2 change",
            "Win prob", "Dublin", "Kerry", "Mayo",
        ]),
        row(&[e(), e(), e(), e(), e(), e(), e(), e(), n(1782.0), n(1760.0), n(1713.0)]),
        row(&[
            Cell::Date(d(2018, 8, 19)), t("Dublin"), t("Mayo"), t("2-10"), t("0-14"),
            n(8.0), n(-8.0), n(0.75),
            n(1790.0), n(1760.0), n(1705.0),
        ]),
    ]
}

pub fn rules_grid() -> Vec<Vec<Cell>> {
    vec![headers(&["Rule"]), row(&[t("K = 50")])]
}

pub fn future_grid() -> Vec<Vec<Cell>> {
    vec![
        headers(&["Date", "Team 1", "Team 2", "Dublin"]),
        row(&[e(), e(), e(), n(1850.0)]),
        row(&[Cell::Date(d(2026, 2, 1)), t("Dublin"), t("Kerry"), n(1860.0)]),
    ]
}

pub fn football_workbook() -> MemoryWorkbook {
    MemoryWorkbook::new()
        .with_sheet("Rules", rules_grid())
        .with_sheet("Elo values", summary_grid())
        .with_sheet("2019", season_2019_grid())
        .with_sheet("2018", season_2018_grid())
        .with_sheet("2026", future_grid())
}

pub fn football() -> SportConfig {
    SportConfig::football()
}

pub fn write_xlsx(path: &Path, sheets: &[(&str, Vec<Vec<Cell>>)]) -> Result<(), XlsxError> {
    let mut writer = XlsxWriter::new();
    for (name, grid) in sheets {
        let sheet = writer.add_worksheet();
        sheet.set_name(*name)?;
        for (r, cells) in grid.iter().enumerate() {
            for (c, cell) in cells.iter().enumerate() {
                let (r, c) = (r as u32, c as u16);
                match cell {
                    Cell::Empty => {}
                    Cell::Number(value) => {
                        sheet.write_number(r, c, *value)?;
                    }
                    Cell::Bool(value) => {
                        sheet.write_boolean(r, c, *value)?;
                    }
                    Cell::Text(value) => {
                        sheet.write_string(r, c, value)?;
                    }
                    Cell::Date(date) => {
                        sheet.write_string(r, c, date.format("%Y-%m-%d").to_string())?;
                    }
                }
            }
        }
    }
    writer.save(path)?;
    Ok(())
}

/// Writes the football fixture as a real workbook and returns its path.
pub fn write_football_xlsx(dir: &Path) -> Result<PathBuf, XlsxError> {
    let path = dir.join("football.xlsx");
    write_xlsx(
        &path,
        &[
            ("Rules", rules_grid()),
            ("Elo values", summary_grid()),
            ("2019", season_2019_grid()),
            ("2018", season_2018_grid()),
            ("2026", future_grid()),
        ],
    )?;
    Ok(path)
}
