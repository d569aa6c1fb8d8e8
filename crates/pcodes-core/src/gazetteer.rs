//! Extraction of every admin sheet of one gazetteer workbook.

use tracing::{debug, info};

use pcodes_config::CountryRules;
use pcodes_map::{ResolveError, resolve_columns};
use pcodes_model::{CountryCode, Diagnostics, PcodeRecord, Workbook};
use pcodes_normalization::{SheetContext, extract_sheet};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GazetteerExtraction {
    pub records: Vec<PcodeRecord>,
    pub sheets_used: usize,
    /// Sheets dropped for unresolvable columns or duplicate codes.
    pub sheets_discarded: usize,
}

/// Resolve and normalize each sheet of an already filtered workbook.
///
/// Sheets whose code column holds the same code twice are dropped whole.
pub fn extract_gazetteer(
    workbook: &Workbook,
    country: &CountryCode,
    reference_date: &str,
    subject: &str,
    rules: &CountryRules<'_>,
    diagnostics: &mut Diagnostics,
) -> GazetteerExtraction {
    let ctx = SheetContext {
        country,
        reference_date,
        subject,
        rules,
    };
    let mut extraction = GazetteerExtraction::default();

    for sheet in workbook.sheets() {
        if rules.skips_sheet(&sheet.name) {
            debug!(sheet = %sheet.name, "sheet skipped by country configuration");
            continue;
        }
        let columns = match resolve_columns(&sheet.name, &sheet.headers, rules, subject, diagnostics)
        {
            Ok(columns) => columns,
            Err(error @ ResolveError::NoLevel { .. }) => {
                diagnostics.warning(subject, error.to_string());
                extraction.sheets_discarded += 1;
                continue;
            }
            Err(error) => {
                diagnostics.error(subject, error.to_string());
                extraction.sheets_discarded += 1;
                continue;
            }
        };

        let sheet_records = extract_sheet(sheet, &columns, &ctx, diagnostics);
        if sheet_records.has_duplicates() {
            info!(
                sheet = %sheet.name,
                codes = ?sheet_records.duplicate_codes,
                "discarding sheet with duplicate codes"
            );
            diagnostics.error(
                subject,
                format!("Duplicate p-codes found at adm{}", sheet_records.level),
            );
            extraction.sheets_discarded += 1;
            continue;
        }
        extraction.records.extend(sheet_records.records);
        extraction.sheets_used += 1;
    }
    extraction
}
