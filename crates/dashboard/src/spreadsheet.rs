//! Reading uploaded spreadsheets into header-keyed rows

use calamine::{Data, ExcelDateTime, Range, Reader, Xls, Xlsx};
use chrono::NaiveTime;
use optimo_common::{Cell, Error, Result, Row};
use std::io::Cursor;
use tracing::debug;

/// Accepted upload formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpreadsheetKind {
    Xlsx,
    Xls,
}

impl SpreadsheetKind {
    pub fn from_filename(filename: &str) -> Result<Self> {
        let lower = filename.trim().to_ascii_lowercase();
        if lower.ends_with(".xlsx") {
            Ok(SpreadsheetKind::Xlsx)
        } else if lower.ends_with(".xls") {
            Ok(SpreadsheetKind::Xls)
        } else {
            Err(Error::UnsupportedFileType(filename.to_string()))
        }
    }
}

/// Read the first worksheet. The first row holds the column names; blank rows
/// are skipped. Each row comes with its 1-based data row number (header
/// excluded), counting the skipped rows.
pub fn read_rows(filename: &str, bytes: Vec<u8>) -> Result<Vec<(usize, Row)>> {
    let cursor = Cursor::new(bytes);

    let range = match SpreadsheetKind::from_filename(filename)? {
        SpreadsheetKind::Xlsx => first_sheet(
            Xlsx::new(cursor).map_err(|e| Error::Spreadsheet(e.to_string()))?,
        )?,
        SpreadsheetKind::Xls => first_sheet(
            Xls::new(cursor).map_err(|e| Error::Spreadsheet(e.to_string()))?,
        )?,
    };

    let rows = rows_from_range(&range);
    debug!("Read {} rows from {}", rows.len(), filename);
    Ok(rows)
}

fn first_sheet<R>(mut workbook: R) -> Result<Range<Data>>
where
    R: Reader<Cursor<Vec<u8>>>,
    R::Error: std::fmt::Display,
{
    workbook
        .worksheet_range_at(0)
        .ok_or_else(|| Error::Spreadsheet("Workbook has no worksheets".to_string()))?
        .map_err(|e| Error::Spreadsheet(e.to_string()))
}

fn rows_from_range(range: &Range<Data>) -> Vec<(usize, Row)> {
    let mut rows = range.rows();

    let Some(header) = rows.next() else {
        return Vec::new();
    };
    let columns: Vec<Option<String>> = header
        .iter()
        .map(|cell| {
            let name = cell.to_string().trim().to_string();
            (!name.is_empty()).then_some(name)
        })
        .collect();

    rows.enumerate()
        .filter_map(|(index, cells)| {
            let row: Row = columns
                .iter()
                .zip(cells)
                .filter_map(|(column, data)| Some((column.clone()?, to_cell(data))))
                .filter(|(_, cell)| !cell.is_empty())
                .collect();
            (!row.is_empty()).then_some((index + 1, row))
        })
        .collect()
}

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => datetime_cell(dt),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        _ => Cell::Empty,
    }
}

/// Time-only cells become `HH:MM`, whole days `YYYY-MM-DD`
fn datetime_cell(dt: &ExcelDateTime) -> Cell {
    let Some(value) = dt.as_datetime() else {
        return Cell::Number(dt.as_f64());
    };

    let text = if dt.as_f64() < 1.0 {
        value.format("%H:%M").to_string()
    } else if value.time() == NaiveTime::MIN {
        value.format("%Y-%m-%d").to_string()
    } else {
        value.format("%Y-%m-%d %H:%M").to_string()
    };
    Cell::Text(text)
}
