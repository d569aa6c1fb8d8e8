//! Turning the rows of one resolved admin sheet into records.

use std::collections::HashSet;

use tracing::{debug, trace};

use pcodes_config::CountryRules;
use pcodes_model::{
    AdminLevel, ColumnResolution, CountryCode, Diagnostics, PcodeRecord, Sheet, cell_in,
};

use crate::code::{CodeCheck, clean_code};
use crate::date::resolve_date;
use crate::name::normalize_name;

/// Per-country inputs shared by every sheet of a gazetteer.
#[derive(Debug, Clone, Copy)]
pub struct SheetContext<'a> {
    pub country: &'a CountryCode,
    /// Dataset reference start date used when a row has no date.
    pub reference_date: &'a str,
    /// Dataset the diagnostics are filed under.
    pub subject: &'a str,
    pub rules: &'a CountryRules<'a>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetExtraction {
    pub level: AdminLevel,
    /// Unique records in row order.
    pub records: Vec<PcodeRecord>,
    /// Codes seen on more than one row.
    pub duplicate_codes: Vec<String>,
    pub skipped_rows: usize,
}

impl SheetExtraction {
    fn empty(level: AdminLevel) -> Self {
        Self {
            level,
            records: Vec::new(),
            duplicate_codes: Vec::new(),
            skipped_rows: 0,
        }
    }

    pub fn has_duplicates(&self) -> bool {
        !self.duplicate_codes.is_empty()
    }
}

/// Extract records from `sheet` using the headers chosen in `columns`.
pub fn extract_sheet(
    sheet: &Sheet,
    columns: &ColumnResolution,
    ctx: &SheetContext<'_>,
    diagnostics: &mut Diagnostics,
) -> SheetExtraction {
    let level = columns.level;
    let mut extraction = SheetExtraction::empty(level);
    let (Some(code_idx), Some(name_idx)) = (
        sheet.column_index(&columns.code),
        sheet.column_index(&columns.name),
    ) else {
        return extraction;
    };
    let parent_idx = columns.parent.as_deref().and_then(|h| sheet.column_index(h));
    let date_idx = columns.date.as_deref().and_then(|h| sheet.column_index(h));
    let transliterate = ctx.rules.transliterate(level);
    let name_label = format!("admin {level} name");

    let mut seen_codes: HashSet<String> = HashSet::new();
    let mut seen_records: HashSet<PcodeRecord> = HashSet::new();

    for row in &sheet.rows {
        let code = match clean_code(cell_in(row, code_idx), ctx.rules) {
            CodeCheck::Valid(code) => code,
            other => {
                trace!(sheet = %sheet.name, check = ?other, "row skipped");
                extraction.skipped_rows += 1;
                continue;
            }
        };
        if !seen_codes.insert(code.clone()) {
            extraction.duplicate_codes.push(code.clone());
        }

        let name = normalize_name(cell_in(row, name_idx), transliterate);
        if name.is_none() {
            diagnostics.missing_value(ctx.subject, &name_label, &code);
        }

        let valid_from = resolve_date(date_idx.map(|i| cell_in(row, i)), ctx.reference_date);
        let parent_code = match parent_idx {
            Some(i) => cell_in(row, i).to_text().trim().to_string(),
            None => ctx.country.to_string(),
        };

        let Ok(record) = PcodeRecord::new(
            ctx.country.clone(),
            level,
            code,
            name,
            parent_code,
            valid_from,
        ) else {
            extraction.skipped_rows += 1;
            continue;
        };
        if seen_records.insert(record.clone()) {
            extraction.records.push(record);
        }
    }

    debug!(
        sheet = %sheet.name,
        %level,
        records = extraction.records.len(),
        skipped = extraction.skipped_rows,
        duplicates = extraction.duplicate_codes.len(),
        "extracted sheet"
    );
    extraction
}
