//! Validity-date resolution.

use chrono::{NaiveDate, NaiveDateTime};

use pcodes_model::{CellValue, excel_serial_to_datetime};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// `YYYY-MM-DD` for a date cell, or `reference` when the sheet has no date
/// column or the cell holds no recognisable date.
pub fn resolve_date(cell: Option<&CellValue>, reference: &str) -> String {
    cell.and_then(cell_date)
        .map_or_else(|| reference.to_string(), |date| date.format(DATE_FORMAT).to_string())
}

fn cell_date(cell: &CellValue) -> Option<NaiveDate> {
    match cell {
        CellValue::Date(date) => Some(*date),
        CellValue::DateTime(value) => Some(value.date()),
        CellValue::Int(serial) => excel_serial_to_datetime(*serial as f64).map(|v| v.date()),
        CellValue::Float(serial) => excel_serial_to_datetime(*serial).map(|v| v.date()),
        CellValue::Text(text) => parse_text_date(text.trim()),
        CellValue::Empty | CellValue::Bool(_) => None,
    }
}

fn parse_text_date(text: &str) -> Option<NaiveDate> {
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(value) = NaiveDateTime::parse_from_str(text, format) {
            return Some(value.date());
        }
    }
    for format in [DATE_FORMAT, "%d/%m/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Some(date);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const REFERENCE: &str = "2014-10-01";

    #[test]
    fn structured_dates() {
        let date = NaiveDate::from_ymd_opt(2021, 11, 17).unwrap();
        assert_eq!(resolve_date(Some(&CellValue::Date(date)), REFERENCE), "2021-11-17");
        let datetime = date.and_hms_opt(13, 5, 0).unwrap();
        assert_eq!(
            resolve_date(Some(&CellValue::DateTime(datetime)), REFERENCE),
            "2021-11-17"
        );
    }

    #[test]
    fn serial_numbers() {
        assert_eq!(resolve_date(Some(&CellValue::Int(44517)), REFERENCE), "2021-11-17");
        assert_eq!(
            resolve_date(Some(&CellValue::Float(44517.25)), REFERENCE),
            "2021-11-17"
        );
    }

    #[test]
    fn text_dates() {
        let iso = CellValue::Text("2019-03-01".to_string());
        assert_eq!(resolve_date(Some(&iso), REFERENCE), "2019-03-01");
        let stamp = CellValue::Text("2019-03-01 00:00:00".to_string());
        assert_eq!(resolve_date(Some(&stamp), REFERENCE), "2019-03-01");
        let day_first = CellValue::Text("25/12/2018".to_string());
        assert_eq!(resolve_date(Some(&day_first), REFERENCE), "2018-12-25");
    }

    #[test]
    fn fallback_to_reference() {
        assert_eq!(resolve_date(None, REFERENCE), REFERENCE);
        assert_eq!(resolve_date(Some(&CellValue::Empty), REFERENCE), REFERENCE);
        let junk = CellValue::Text("unknown".to_string());
        assert_eq!(resolve_date(Some(&junk), REFERENCE), REFERENCE);
    }
}
