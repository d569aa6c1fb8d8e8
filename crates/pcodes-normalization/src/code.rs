//! P-code cell cleaning.

use pcodes_config::CountryRules;
use pcodes_model::CellValue;

/// Values that stand for "no code" in gazetteers.
const PLACEHOLDER_CODES: [&str; 3] = ["-", "none", "not reported"];

/// Classification of a code cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeCheck {
    Valid(String),
    /// An HXL tag row (`#adm1+code`) rather than data.
    HxlTag,
    Placeholder,
    /// A literal the country configuration marks as not a real unit.
    Ignored,
}

pub fn clean_code(cell: &CellValue, rules: &CountryRules<'_>) -> CodeCheck {
    let raw = cell.to_text();
    if raw.contains('#') {
        return CodeCheck::HxlTag;
    }
    let code = raw.trim();
    if code.is_empty() || is_placeholder(code) {
        return CodeCheck::Placeholder;
    }
    if rules.is_ignored_code(code) {
        return CodeCheck::Ignored;
    }
    CodeCheck::Valid(code.to_string())
}

pub fn is_placeholder(code: &str) -> bool {
    let lowered = code.trim().to_lowercase();
    lowered.is_empty() || PLACEHOLDER_CODES.contains(&lowered.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pcodes_config::CountryOverride;

    fn text(value: &str) -> CellValue {
        CellValue::Text(value.to_string())
    }

    #[test]
    fn placeholders_are_rejected() {
        let rules = CountryRules::default();
        for value in ["", " ", "-", "None", "NONE", "Not Reported", "not reported"] {
            assert_eq!(clean_code(&text(value), &rules), CodeCheck::Placeholder, "{value:?}");
        }
        assert_eq!(clean_code(&CellValue::Empty, &rules), CodeCheck::Placeholder);
    }

    #[test]
    fn hxl_rows_are_detected() {
        let rules = CountryRules::default();
        assert_eq!(clean_code(&text("#adm1+code"), &rules), CodeCheck::HxlTag);
    }

    #[test]
    fn codes_are_trimmed_and_numbers_stringified() {
        let rules = CountryRules::default();
        assert_eq!(
            clean_code(&text(" AF01 "), &rules),
            CodeCheck::Valid("AF01".to_string())
        );
        assert_eq!(
            clean_code(&CellValue::Float(1201.0), &rules),
            CodeCheck::Valid("1201".to_string())
        );
        assert_eq!(
            clean_code(&CellValue::Int(7), &rules),
            CodeCheck::Valid("7".to_string())
        );
    }

    #[test]
    fn country_ignore_list() {
        let overrides = CountryOverride {
            ignored_codes: vec!["ECISLA".to_string()],
            ..CountryOverride::default()
        };
        let rules = CountryRules::new(Some(&overrides), &[]);
        assert_eq!(clean_code(&text("ECISLA"), &rules), CodeCheck::Ignored);
        assert_eq!(
            clean_code(&text("EC01"), &rules),
            CodeCheck::Valid("EC01".to_string())
        );
    }
}
