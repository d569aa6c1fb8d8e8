//! Loading configuration files from disk.

use std::fs;

use pcodes_config::{ConfigError, CountryRegistry, ProjectConfig};
use pcodes_model::{CountryCode, CountryResolver};

const MINIMAL: &str = r#"
non_latin_alphabets = ["ar"]

[dataset]
name = "test-pcodes"
title = "Test"
source_prefix = "cod-ab-"

[catalog]
base_url = "http://localhost"

[download]
calls = 2
period_ms = 500
user_agent = "test"

[resources.all]
name = "all.csv"
description = "all"

[resources.adm_1_2]
name = "adm12.csv"
description = "adm12"

[resources.lengths]
name = "lengths.csv"
description = "lengths"

[resource_exceptions]
AFG = "afg_gazetteer.xlsx"

[[missing_units.AFG]]
admin_level = 1
code = "AF99"
name = "Extra"
parent_code = "AFG"
valid_from = "2020-01-01"
"#;

#[test]
fn loads_file_with_missing_units() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, MINIMAL).unwrap();

    let config = ProjectConfig::load(&path).unwrap();
    let afg = CountryCode::new("AFG").unwrap();
    assert_eq!(config.catalog.timeout_secs, 60);
    assert_eq!(config.resource_exception(&afg), Some("afg_gazetteer.xlsx"));
    let units = config.missing_units(&afg);
    assert_eq!(units.len(), 1);
    assert_eq!(units[0].code, "AF99");
    assert!(config.rules_for(&afg).is_non_latin("AR"));
    assert!(config.missing_units(&CountryCode::new("ARM").unwrap()).is_empty());
}

#[test]
fn zero_rate_limit_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, MINIMAL.replace("calls = 2", "calls = 0")).unwrap();

    let err = ProjectConfig::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { .. }));
}

#[test]
fn missing_file_reports_path() {
    let err = ProjectConfig::load(std::path::Path::new("/nonexistent/config.toml")).unwrap_err();
    assert!(err.to_string().contains("/nonexistent/config.toml"));
}

#[test]
fn registry_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("countries.csv");
    fs::write(&path, "iso3,iso2,name\nAFG,AF,Afghanistan\nMKD,MK,North Macedonia\n").unwrap();

    let registry = CountryRegistry::load(&path).unwrap();
    assert_eq!(registry.len(), 2);
    assert_eq!(registry.from_iso2("MK").unwrap().iso3.as_str(), "MKD");
}
