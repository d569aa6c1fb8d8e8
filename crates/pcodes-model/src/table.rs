#![deny(unsafe_code)]

use chrono::{Duration, NaiveDate, NaiveDateTime};

/// A single spreadsheet cell after parsing.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

static EMPTY_CELL: CellValue = CellValue::Empty;

impl CellValue {
    /// True for empty cells and whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(text) => text.trim().is_empty(),
            _ => false,
        }
    }

    /// Render the cell the way it reads in the sheet.
    pub fn to_text(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(text) => text.clone(),
            Self::Int(value) => value.to_string(),
            Self::Float(value) => format_numeric(*value),
            Self::Bool(value) => value.to_string(),
            Self::Date(date) => date.format("%Y-%m-%d").to_string(),
            Self::DateTime(value) => value.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            Self::Empty
        } else {
            Self::Text(value.to_string())
        }
    }
}

/// Integral floats print without a fractional part.
pub fn format_numeric(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// Convert a spreadsheet serial day number (day 0 = 1899-12-30) to a timestamp.
pub fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let days = serial.trunc() as i64;
    let seconds = (serial.fract() * 86_400.0).round() as i64;
    epoch
        .checked_add_signed(Duration::try_days(days)?)?
        .checked_add_signed(Duration::try_seconds(seconds)?)
}

/// One worksheet: the header row and the data rows beneath it.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, headers: Vec<String>) -> Self {
        Self {
            name: name.into(),
            headers,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<CellValue>) {
        self.rows.push(row);
    }

    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == header)
    }

    /// Cell at `row`/`column`; short rows and missing rows read as empty.
    pub fn cell_at(&self, row: usize, column: usize) -> &CellValue {
        self.rows
            .get(row)
            .map_or(&EMPTY_CELL, |cells| cell_in(cells, column))
    }
}

/// Cell `column` of a row; short rows read as empty.
pub fn cell_in(row: &[CellValue], column: usize) -> &CellValue {
    row.get(column).unwrap_or(&EMPTY_CELL)
}

/// Sheets in workbook order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new(sheets: Vec<Sheet>) -> Self {
        Self { sheets }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sheet: Sheet) {
        self.sheets.push(sheet);
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn into_sheets(self) -> Vec<Sheet> {
        self.sheets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_cells() {
        assert!(CellValue::Empty.is_blank());
        assert!(CellValue::Text("  ".to_string()).is_blank());
        assert!(!CellValue::Int(0).is_blank());
    }

    #[test]
    fn float_text_drops_integral_fraction() {
        assert_eq!(CellValue::Float(101.0).to_text(), "101");
        assert_eq!(CellValue::Float(1.5).to_text(), "1.5");
    }

    #[test]
    fn serial_dates_use_1899_epoch() {
        let value = excel_serial_to_datetime(44517.0).unwrap();
        assert_eq!(value.format("%Y-%m-%d").to_string(), "2021-11-17");
        let noon = excel_serial_to_datetime(1.5).unwrap();
        assert_eq!(noon.format("%Y-%m-%d %H:%M").to_string(), "1899-12-31 12:00");
    }

    #[test]
    fn sheet_cell_out_of_range_is_empty() {
        let mut sheet = Sheet::new("ADM1", vec!["a".to_string(), "b".to_string()]);
        sheet.push_row(vec![CellValue::from("x")]);
        assert_eq!(sheet.cell_at(0, 0), &CellValue::Text("x".to_string()));
        assert_eq!(sheet.cell_at(0, 1), &CellValue::Empty);
    }
}
