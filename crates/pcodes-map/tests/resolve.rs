//! Column resolution against realistic gazetteer header layouts.

use pcodes_config::{CountryRules, ProjectConfig};
use pcodes_map::{ResolveError, resolve_columns};
use pcodes_model::{AdminLevel, CountryCode, Diagnostics, Severity};

const SUBJECT: &str = "cod-ab-test";

fn headers(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

fn level(value: u8) -> AdminLevel {
    AdminLevel::new(value).unwrap()
}

fn warnings(diagnostics: &Diagnostics) -> Vec<String> {
    diagnostics
        .entries()
        .iter()
        .filter(|d| d.severity == Severity::Warning)
        .map(|d| d.message.clone())
        .collect()
}

#[test]
fn standard_cod_layout() {
    let h = headers(&[
        "ADM2_EN", "ADM2_PCODE", "ADM2_REF", "ADM1_EN", "ADM1_PCODE", "ADM0_EN", "ADM0_PCODE",
        "date", "validOn", "validTo",
    ]);
    let mut diagnostics = Diagnostics::new();
    let resolved =
        resolve_columns("afg_adm2", &h, &CountryRules::default(), SUBJECT, &mut diagnostics)
            .unwrap();

    assert_eq!(resolved.level, level(2));
    assert_eq!(resolved.code, "ADM2_PCODE");
    assert_eq!(resolved.name, "ADM2_EN");
    assert_eq!(resolved.parent.as_deref(), Some("ADM1_PCODE"));
    assert_eq!(resolved.date.as_deref(), Some("validOn"));
    assert!(diagnostics.is_empty());
}

#[test]
fn level_one_has_no_parent_column() {
    let h = headers(&["ADM1_EN", "ADM1_PCODE", "ADM0_PCODE", "validOn"]);
    let mut diagnostics = Diagnostics::new();
    let resolved =
        resolve_columns("ADM1", &h, &CountryRules::default(), SUBJECT, &mut diagnostics).unwrap();
    assert_eq!(resolved.parent, None);
    assert!(diagnostics.is_empty());
}

#[test]
fn english_name_preferred() {
    let h = headers(&["ADM1_PCODE", "ADM1_FR", "ADM1_EN", "ADM1_AR", "validOn"]);
    let mut diagnostics = Diagnostics::new();
    let resolved =
        resolve_columns("ADM1", &h, &CountryRules::default(), SUBJECT, &mut diagnostics).unwrap();
    assert_eq!(resolved.name, "ADM1_EN");
}

#[test]
fn first_latin_name_when_no_english() {
    let non_latin = vec!["ar".to_string()];
    let rules = CountryRules::new(None, &non_latin);
    let h = headers(&["ADM1_PCODE", "ADM1_AR", "ADM1_FR", "ADM1_ES", "validOn"]);
    let mut diagnostics = Diagnostics::new();
    let resolved = resolve_columns("ADM1", &h, &rules, SUBJECT, &mut diagnostics).unwrap();
    assert_eq!(resolved.name, "ADM1_FR");
    assert!(diagnostics.is_empty());
}

#[test]
fn only_non_latin_names_warns() {
    let non_latin = vec!["ar".to_string(), "ru".to_string()];
    let rules = CountryRules::new(None, &non_latin);
    let h = headers(&["ADM1_PCODE", "ADM1_AR", "ADM1_RU", "validOn"]);
    let mut diagnostics = Diagnostics::new();
    let resolved = resolve_columns("ADM1", &h, &rules, SUBJECT, &mut diagnostics).unwrap();
    assert_eq!(resolved.name, "ADM1_AR");
    assert_eq!(
        warnings(&diagnostics),
        vec!["Found only non-latin alphabet name columns at adm1"]
    );
}

#[test]
fn multiple_code_columns_without_pcode() {
    let h = headers(&["ADM1_CODE", "ADM1_OLDCODE", "ADM1_EN", "validOn"]);
    let mut diagnostics = Diagnostics::new();
    let resolved =
        resolve_columns("ADM1", &h, &CountryRules::default(), SUBJECT, &mut diagnostics).unwrap();
    assert_eq!(resolved.code, "ADM1_CODE");
    assert_eq!(
        warnings(&diagnostics),
        vec!["Found multiple code columns at adm1, using first"]
    );
}

#[test]
fn pcode_column_preferred_among_codes() {
    let h = headers(&["ADM1_CODE", "admin1Pcode", "admin1Name_en", "validOn"]);
    let mut diagnostics = Diagnostics::new();
    let resolved =
        resolve_columns("Admin1", &h, &CountryRules::default(), SUBJECT, &mut diagnostics)
            .unwrap();
    assert_eq!(resolved.code, "admin1Pcode");
    assert_eq!(resolved.name, "admin1Name_en");
    assert!(diagnostics.is_empty());
}

#[test]
fn sheet_without_level_is_rejected() {
    let h = headers(&["PCODE", "NAME"]);
    let mut diagnostics = Diagnostics::new();
    let err = resolve_columns("Admin", &h, &CountryRules::default(), SUBJECT, &mut diagnostics)
        .unwrap_err();
    assert_eq!(err.to_string(), "Could not determine admin level for Admin");
    assert!(diagnostics.is_empty());
}

#[test]
fn missing_code_and_name_columns() {
    let mut diagnostics = Diagnostics::new();
    let err = resolve_columns(
        "ADM2",
        &headers(&["NAME_2", "TYPE"]),
        &CountryRules::default(),
        SUBJECT,
        &mut diagnostics,
    )
    .unwrap_err();
    assert_eq!(err, ResolveError::NoCodeColumn { level: level(2) });
    assert_eq!(err.to_string(), "Can't find code header at adm2");

    let err = resolve_columns(
        "ADM2",
        &headers(&["ADM2_PCODE", "TYPE"]),
        &CountryRules::default(),
        SUBJECT,
        &mut diagnostics,
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "Can't find name header at adm2");
}

#[test]
fn missing_parent_and_date_are_warnings() {
    let h = headers(&["ADM3_PCODE", "ADM3_EN"]);
    let mut diagnostics = Diagnostics::new();
    let resolved =
        resolve_columns("ADM3", &h, &CountryRules::default(), SUBJECT, &mut diagnostics).unwrap();
    assert_eq!(resolved.parent, None);
    assert_eq!(resolved.date, None);
    assert_eq!(
        warnings(&diagnostics),
        vec![
            "Can't find parent code header at adm3",
            "Can't find date header at adm3, using dataset reference date",
        ]
    );
    assert_eq!(diagnostics.error_count(), 0);
}

#[test]
fn country_overrides_from_configuration() {
    let config = ProjectConfig::embedded().unwrap();

    let cmr = CountryCode::new("CMR").unwrap();
    let h = headers(&["ADM2_PCODE", "ADM2_EN", "ADM2_FR", "ADM1_PCODE", "validOn"]);
    let mut diagnostics = Diagnostics::new();
    let resolved =
        resolve_columns("ADM2", &h, &config.rules_for(&cmr), "cod-ab-cmr", &mut diagnostics)
            .unwrap();
    assert_eq!(resolved.name, "ADM2_FR");

    let arm = CountryCode::new("ARM").unwrap();
    let h = headers(&["ADM3_PCODE", "ADM3_EN", "ADM2_PCODE", "ADM1_PCODE", "validOn"]);
    let resolved =
        resolve_columns("ADM3", &h, &config.rules_for(&arm), "cod-ab-arm", &mut diagnostics)
            .unwrap();
    assert_eq!(resolved.parent.as_deref(), Some("ADM1_PCODE"));

    let egy = CountryCode::new("EGY").unwrap();
    let h = headers(&["ADM3_PCODE", "ADM3_EN", "ADM2_PCODE", "validOn"]);
    let err = resolve_columns("ADM3", &h, &config.rules_for(&egy), "cod-ab-egy", &mut diagnostics)
        .unwrap_err();
    assert_eq!(err, ResolveError::NoNameColumn { level: level(3) });
}
