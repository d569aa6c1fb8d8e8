use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use pcodes_config::CountryRules;
use pcodes_model::{AdminLevel, ColumnResolution, Diagnostics};

use crate::error::ResolveError;
use crate::rules::{HeaderRole, Substitutions, match_role};

static ISOLATED_DIGIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\D)([1-7])(?:\D|$)").expect("Invalid level regex"));

/// Admin level of a sheet: the first digit 1-7 in its name that is not part of
/// a longer number.
pub fn infer_level(sheet_name: &str) -> Option<AdminLevel> {
    let captures = ISOLATED_DIGIT.captures(sheet_name)?;
    let digit = captures.get(1)?.as_str().chars().next()?;
    AdminLevel::from_digit(digit)
}

/// Choose the code, name, parent and date headers of one admin sheet.
///
/// Ambiguities that still allow reading the sheet are reported as warnings
/// against `subject`; the returned error means the sheet must be skipped.
pub fn resolve_columns(
    sheet_name: &str,
    headers: &[String],
    rules: &CountryRules<'_>,
    subject: &str,
    diagnostics: &mut Diagnostics,
) -> Result<ColumnResolution, ResolveError> {
    let level = infer_level(sheet_name).ok_or_else(|| ResolveError::NoLevel {
        sheet: sheet_name.to_string(),
    })?;
    let parent_level = if level.get() > 1 {
        rules.parent_level(level)
    } else {
        None
    };
    let vars = Substitutions {
        level: level.to_string(),
        parent: parent_level.map(|p| p.to_string()).unwrap_or_default(),
    };

    let code_candidates = match_role(HeaderRole::Code, headers, &vars)?;
    let code = pick_code(&code_candidates, level, subject, diagnostics)
        .ok_or(ResolveError::NoCodeColumn { level })?;

    let name = match rules.name_header(level) {
        Some(forced) => headers
            .iter()
            .find(|h| h.trim() == forced)
            .cloned()
            .ok_or(ResolveError::NoNameColumn { level })?,
        None => pick_name(
            &match_role(HeaderRole::Name, headers, &vars)?,
            level,
            rules,
            subject,
            diagnostics,
        )
        .ok_or(ResolveError::NoNameColumn { level })?,
    };

    let parent = match parent_level {
        Some(_) => {
            let candidates = match_role(HeaderRole::Parent, headers, &vars)?;
            if candidates.is_empty() {
                diagnostics.warning(subject, format!("Can't find parent code header at adm{level}"));
            } else if candidates.len() > 1 {
                diagnostics.warning(
                    subject,
                    format!("Found multiple parent code columns at adm{level}, using first"),
                );
            }
            candidates.first().map(|h| (*h).to_string())
        }
        None => None,
    };

    let date = match_role(HeaderRole::Date, headers, &vars)?
        .first()
        .map(|h| (*h).to_string());
    if date.is_none() {
        diagnostics.warning(
            subject,
            format!("Can't find date header at adm{level}, using dataset reference date"),
        );
    }

    debug!(
        sheet = sheet_name,
        %level,
        code = %code,
        name = %name,
        parent = parent.as_deref().unwrap_or("-"),
        date = date.as_deref().unwrap_or("-"),
        "resolved columns"
    );

    Ok(ColumnResolution {
        level,
        code,
        name,
        parent,
        date,
    })
}

fn pick_code(
    candidates: &[&str],
    level: AdminLevel,
    subject: &str,
    diagnostics: &mut Diagnostics,
) -> Option<String> {
    if candidates.len() > 1 {
        if let Some(pcode) = candidates
            .iter()
            .find(|h| h.to_lowercase().contains("pcode"))
        {
            return Some((*pcode).to_string());
        }
        diagnostics.warning(
            subject,
            format!("Found multiple code columns at adm{level}, using first"),
        );
    }
    candidates.first().map(|h| (*h).to_string())
}

fn pick_name(
    candidates: &[&str],
    level: AdminLevel,
    rules: &CountryRules<'_>,
    subject: &str,
    diagnostics: &mut Diagnostics,
) -> Option<String> {
    if candidates.len() <= 1 {
        return candidates.first().map(|h| (*h).to_string());
    }

    let english: Vec<&str> = candidates
        .iter()
        .copied()
        .filter(|h| h.trim().to_lowercase().ends_with("_en"))
        .collect();
    if english.len() == 1 {
        return Some(english[0].to_string());
    }

    if let Some(latin) = candidates.iter().find(|h| is_latin_suffixed(h, rules)) {
        return Some((*latin).to_string());
    }

    diagnostics.warning(
        subject,
        format!("Found only non-latin alphabet name columns at adm{level}"),
    );
    candidates.first().map(|h| (*h).to_string())
}

/// True for headers ending `_xx` where `xx` is not a non-Latin script language.
fn is_latin_suffixed(header: &str, rules: &CountryRules<'_>) -> bool {
    let chars: Vec<char> = header.trim().chars().collect();
    if chars.len() < 3 || chars[chars.len() - 3] != '_' {
        return false;
    }
    let language: String = chars[chars.len() - 2..].iter().collect();
    !rules.is_non_latin(&language)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_from_sheet_names() {
        let cases = [
            ("ADM1", Some(1)),
            ("afg_adm2", Some(2)),
            ("Admin 3 (2020)", Some(3)),
            ("adm4_2019", Some(4)),
            ("1_province", Some(1)),
            ("adm2020", None),
            ("Admin", None),
            ("adm9", None),
            ("adm0_adm1", Some(1)),
            ("Admin 0 - Admin 2", Some(2)),
            ("adm9_adm3", Some(3)),
        ];
        for (name, expected) in cases {
            assert_eq!(infer_level(name).map(AdminLevel::get), expected, "{name}");
        }
    }

    #[test]
    fn latin_suffix_check() {
        let non_latin = vec!["ar".to_string(), "ru".to_string()];
        let rules = CountryRules::new(None, &non_latin);
        assert!(is_latin_suffixed("ADM1_FR", &rules));
        assert!(!is_latin_suffixed("ADM1_AR", &rules));
        assert!(!is_latin_suffixed("ADM1NAME", &rules));
    }
}
