//! CSV serialization of the published tables.
//!
//! Files are UTF-8 with a byte-order mark, followed by the header row and a
//! row of HXL hashtags.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Terminator, WriterBuilder};
use tracing::debug;

use pcodes_model::{AdminLevel, CountryCode, PcodeLengthEntry, PcodeRecord};

use crate::error::{OutputError, Result};
use crate::tables::{LENGTH_HEADERS, LENGTH_HXL_TAGS, PCODE_HEADERS, PCODE_HXL_TAGS};

const BOM: &[u8] = b"\xEF\xBB\xBF";

fn write_table<I, R>(path: &Path, headers: &[&str], tags: &[&str], rows: I) -> Result<usize>
where
    I: IntoIterator<Item = R>,
    R: IntoIterator<Item = String>,
{
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| OutputError::io(parent, e))?;
    }
    let file = File::create(path).map_err(|e| OutputError::io(path, e))?;
    let mut buffer = BufWriter::new(file);
    buffer.write_all(BOM).map_err(|e| OutputError::io(path, e))?;

    let mut writer = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(buffer);
    writer
        .write_record(headers)
        .map_err(|e| OutputError::csv(path, e))?;
    writer
        .write_record(tags)
        .map_err(|e| OutputError::csv(path, e))?;
    let mut count = 0;
    for row in rows {
        let fields: Vec<String> = row.into_iter().collect();
        writer
            .write_record(&fields)
            .map_err(|e| OutputError::csv(path, e))?;
        count += 1;
    }
    writer.flush().map_err(|e| OutputError::io(path, e))?;
    debug!(path = %path.display(), rows = count, "wrote table");
    Ok(count)
}

fn record_row(record: &PcodeRecord) -> [String; 6] {
    [
        record.country().to_string(),
        record.admin_level().to_string(),
        record.code().to_string(),
        record.name().unwrap_or_default().to_string(),
        record.parent_code().to_string(),
        record.valid_from().to_string(),
    ]
}

fn length_row(entry: &PcodeLengthEntry) -> Vec<String> {
    let mut row = Vec::with_capacity(LENGTH_HEADERS.len());
    row.push(entry.country.to_string());
    row.push(
        entry
            .country_code_length
            .map(|len| len.to_string())
            .unwrap_or_default(),
    );
    row.extend(
        entry
            .admin_lengths
            .iter()
            .map(|value| value.clone().unwrap_or_default()),
    );
    row
}

/// Write p-code records in the published layout. Returns the data row count.
pub fn write_pcodes_csv(path: &Path, records: &[PcodeRecord]) -> Result<usize> {
    write_table(
        path,
        &PCODE_HEADERS,
        &PCODE_HXL_TAGS,
        records.iter().map(record_row),
    )
}

pub fn write_lengths_csv(path: &Path, entries: &[PcodeLengthEntry]) -> Result<usize> {
    write_table(
        path,
        &LENGTH_HEADERS,
        &LENGTH_HXL_TAGS,
        entries.iter().map(length_row),
    )
}

/// Read a previously published p-code table.
///
/// The HXL row is skipped. Empty names read back as absent.
pub fn read_pcodes_csv(path: &Path) -> Result<Vec<PcodeRecord>> {
    let file = File::open(path).map_err(|e| OutputError::io(path, e))?;
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(file);
    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| OutputError::csv(path, e))?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();
    let index = |column: &str| {
        headers
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| OutputError::MissingColumn {
                path: path.to_path_buf(),
                column: column.to_string(),
            })
    };
    let columns = [
        index(PCODE_HEADERS[0])?,
        index(PCODE_HEADERS[1])?,
        index(PCODE_HEADERS[2])?,
        index(PCODE_HEADERS[3])?,
        index(PCODE_HEADERS[4])?,
        index(PCODE_HEADERS[5])?,
    ];

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| OutputError::csv(path, e))?;
        let line = row.position().map_or(0, csv::Position::line);
        if row.get(columns[0]).is_some_and(|v| v.starts_with('#')) {
            continue;
        }
        let record = parse_record(&row, &columns).map_err(|message| OutputError::InvalidRow {
            path: path.to_path_buf(),
            line,
            message,
        })?;
        records.push(record);
    }
    debug!(path = %path.display(), records = records.len(), "read published table");
    Ok(records)
}

fn parse_record(row: &StringRecord, columns: &[usize; 6]) -> std::result::Result<PcodeRecord, String> {
    let field = |i: usize| row.get(columns[i]).unwrap_or_default().trim();
    let country = CountryCode::new(field(0)).map_err(|e| e.to_string())?;
    let level = field(1)
        .parse::<u8>()
        .map_err(|e| format!("admin level {:?}: {e}", field(1)))
        .and_then(|v| AdminLevel::new(v).map_err(|e| e.to_string()))?;
    let name = Some(field(3))
        .filter(|name| !name.is_empty())
        .map(str::to_string);
    PcodeRecord::new(country, level, field(2), name, field(4), field(5)).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_rows_leave_unknown_blank() {
        let entry = PcodeLengthEntry {
            country: CountryCode::new("XYZ").unwrap(),
            country_code_length: None,
            admin_lengths: [Some("2".to_string()), None, None, None, None],
        };
        assert_eq!(length_row(&entry), vec!["XYZ", "", "2", "", "", "", ""]);
    }

    #[test]
    fn record_rows_blank_missing_name() {
        let record = PcodeRecord::new(
            CountryCode::new("AFG").unwrap(),
            AdminLevel::new(2).unwrap(),
            "AF0101",
            None,
            "AF01",
            "2021-11-17",
        )
        .unwrap();
        assert_eq!(
            record_row(&record),
            ["AFG", "2", "AF0101", "", "AF01", "2021-11-17"].map(String::from)
        );
    }
}
