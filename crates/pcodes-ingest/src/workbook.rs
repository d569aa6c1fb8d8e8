//! Spreadsheet parsing into the in-memory [`Workbook`] model.

use std::collections::HashMap;
use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use chrono::{NaiveDate, NaiveDateTime};
use tracing::debug;

use pcodes_model::{CellValue, Sheet, Workbook, excel_serial_to_datetime, format_numeric};

/// Outcome of opening a workbook.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseResult {
    Ok(Workbook),
    Failed(String),
}

/// Opens a downloaded file as a workbook of named sheets.
pub trait SpreadsheetOpener {
    fn open(&self, path: &Path) -> ParseResult;
}

/// Reads `.xlsx`, `.xls`, `.xlsb` and `.ods` files with calamine.
#[derive(Debug, Clone, Copy, Default)]
pub struct CalamineOpener;

impl SpreadsheetOpener for CalamineOpener {
    fn open(&self, path: &Path) -> ParseResult {
        let mut workbook = match open_workbook_auto(path) {
            Ok(workbook) => workbook,
            Err(error) => return ParseResult::Failed(error.to_string()),
        };
        let names = workbook.sheet_names().to_vec();
        let mut sheets = Vec::with_capacity(names.len());
        for name in names {
            let range = match workbook.worksheet_range(&name) {
                Ok(range) => range,
                Err(error) => return ParseResult::Failed(format!("{name}: {error}")),
            };
            let mut rows = range.rows();
            let header_cells = rows.next().unwrap_or_default();
            let raw_headers: Vec<String> = header_cells.iter().map(header_text).collect();
            let mut sheet = Sheet::new(name.as_str(), dedupe_headers(&raw_headers));
            for row in rows {
                let cells: Vec<CellValue> = row.iter().map(convert_cell).collect();
                if cells.iter().all(CellValue::is_blank) {
                    continue;
                }
                sheet.push_row(cells);
            }
            debug!(sheet = %name, rows = sheet.rows.len(), "parsed sheet");
            sheets.push(sheet);
        }
        ParseResult::Ok(Workbook::new(sheets))
    }
}

fn header_text(cell: &Data) -> String {
    match convert_cell(cell) {
        CellValue::Text(text) => text,
        other => other.to_text(),
    }
}

/// Make header names unique: blanks become `Unnamed: {index}` and repeats
/// get `.1`, `.2`, ... suffixes.
pub fn dedupe_headers(raw: &[String]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut headers = Vec::with_capacity(raw.len());
    for (index, header) in raw.iter().enumerate() {
        let base = if header.trim().is_empty() {
            format!("Unnamed: {index}")
        } else {
            header.clone()
        };
        let mut name = base.clone();
        while let Some(count) = seen.get_mut(&name) {
            *count += 1;
            name = format!("{base}.{}", *count);
        }
        seen.insert(name.clone(), 0);
        headers.push(name);
    }
    headers
}

/// Map a calamine cell onto the model cell type.
pub fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(text) => CellValue::Text(text.clone()),
        Data::Int(value) => CellValue::Int(*value),
        Data::Float(value) => CellValue::Float(*value),
        Data::Bool(value) => CellValue::Bool(*value),
        Data::DateTime(value) => match excel_serial_to_datetime(value.as_f64()) {
            Some(datetime) => date_or_datetime(datetime),
            None => CellValue::Text(format_numeric(value.as_f64())),
        },
        Data::DateTimeIso(text) => parse_iso(text).unwrap_or_else(|| CellValue::Text(text.clone())),
        Data::DurationIso(text) => CellValue::Text(text.clone()),
        Data::Error(error) => CellValue::Text(format!("#{error:?}")),
    }
}

fn date_or_datetime(value: NaiveDateTime) -> CellValue {
    if value.time() == chrono::NaiveTime::MIN {
        CellValue::Date(value.date())
    } else {
        CellValue::DateTime(value)
    }
}

fn parse_iso(text: &str) -> Option<CellValue> {
    if let Ok(datetime) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(date_or_datetime(datetime));
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .map(CellValue::Date)
}
