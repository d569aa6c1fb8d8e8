//! Keeping only the admin-level sheets of an opened gazetteer.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use pcodes_model::{Diagnostics, Workbook};

use crate::workbook::ParseResult;

static ADMIN_SHEET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^.*adm(in)?.?[1-7]").expect("Invalid admin sheet regex"));

pub fn is_admin_sheet(name: &str) -> bool {
    ADMIN_SHEET.is_match(name)
}

/// Reduce a parsed workbook to its admin sheets, in workbook order.
///
/// `subject` is the dataset the diagnostics are filed under and `resource`
/// the gazetteer file name used in their messages. An unreadable workbook or
/// one with no admin sheets yields an empty workbook.
pub fn filter_admin_sheets(
    parsed: ParseResult,
    resource: &str,
    subject: &str,
    diagnostics: &mut Diagnostics,
) -> Workbook {
    let workbook = match parsed {
        ParseResult::Ok(workbook) => workbook,
        ParseResult::Failed(reason) => {
            debug!(%resource, %reason, "workbook could not be parsed");
            diagnostics.error(subject, format!("Could not open {resource}"));
            return Workbook::empty();
        }
    };

    let kept: Vec<_> = workbook
        .into_sheets()
        .into_iter()
        .filter(|sheet| is_admin_sheet(&sheet.name))
        .collect();

    if kept.is_empty() {
        diagnostics.error(subject, format!("Could not find admin tabs in {resource}"));
        return Workbook::empty();
    }
    Workbook::new(kept)
}
