use std::collections::{BTreeSet, HashSet};

use tracing::debug;

use pcodes_model::{CountryCode, Diagnostics, PcodeRecord};

const PARENT_VALUE_TYPE: &str = "parent pcode";
const BLANK_PARENT_VALUE_TYPE: &str = "parent pcode for";

/// Report every parent code that is not itself a code of `country`.
///
/// Level 1 records are not checked. A blank parent cell is reported against
/// the child code. Returns the distinct missing parent codes in sorted order.
pub fn check_parents(
    country: &CountryCode,
    subject: &str,
    records: &[PcodeRecord],
    diagnostics: &mut Diagnostics,
) -> Vec<String> {
    let codes: HashSet<&str> = records.iter().map(PcodeRecord::code).collect();
    let mut missing: BTreeSet<&str> = BTreeSet::new();
    let mut blank_parent_children: BTreeSet<&str> = BTreeSet::new();

    for record in records.iter().filter(|r| r.admin_level().get() > 1) {
        let parent = record.parent_code();
        if parent.trim().is_empty() {
            blank_parent_children.insert(record.code());
        } else if !codes.contains(parent) {
            missing.insert(parent);
        }
    }

    for child in &blank_parent_children {
        diagnostics.missing_value(subject, BLANK_PARENT_VALUE_TYPE, *child);
    }
    for parent in &missing {
        diagnostics.missing_value(subject, PARENT_VALUE_TYPE, *parent);
    }
    if !missing.is_empty() {
        debug!(%country, missing = missing.len(), "parent codes without a unit");
    }
    missing.into_iter().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pcodes_model::AdminLevel;

    fn record(level: u8, code: &str, parent: &str) -> PcodeRecord {
        PcodeRecord::new(
            CountryCode::new("AFG").unwrap(),
            AdminLevel::new(level).unwrap(),
            code,
            None,
            parent,
            "2021-11-17",
        )
        .unwrap()
    }

    #[test]
    fn consistent_hierarchy_reports_nothing() {
        let records = vec![
            record(1, "AF01", "AFG"),
            record(2, "AF0101", "AF01"),
            record(3, "AF010101", "AF0101"),
        ];
        let mut diagnostics = Diagnostics::new();
        let country = CountryCode::new("AFG").unwrap();
        assert!(check_parents(&country, "AFG", &records, &mut diagnostics).is_empty());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn missing_parents_reported_once() {
        let records = vec![
            record(1, "AF01", "AFG"),
            record(2, "AF0301", "AF03"),
            record(2, "AF0302", "AF03"),
            record(2, "AF0201", "AF02"),
        ];
        let mut diagnostics = Diagnostics::new();
        let country = CountryCode::new("AFG").unwrap();
        let missing = check_parents(&country, "AFG", &records, &mut diagnostics);
        assert_eq!(missing, vec!["AF02", "AF03"]);
        assert_eq!(
            diagnostics.messages_for("AFG"),
            vec!["parent pcode AF02 not found", "parent pcode AF03 not found"]
        );
    }

    #[test]
    fn blank_parent_is_reported_against_child() {
        let records = vec![record(1, "AF01", "AFG"), record(2, "AF0101", "")];
        let mut diagnostics = Diagnostics::new();
        let country = CountryCode::new("AFG").unwrap();
        let missing = check_parents(&country, "AFG", &records, &mut diagnostics);
        assert!(missing.is_empty());
        assert_eq!(
            diagnostics.messages_for("AFG"),
            vec!["parent pcode for AF0101 not found"]
        );
    }
}
