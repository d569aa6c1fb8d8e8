#![deny(unsafe_code)]

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use pcodes_model::{AdminLevel, CountryCode, ModelError, PcodeRecord};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigError, Result};

const EMBEDDED_CONFIG: &str = include_str!("../data/project_configuration.toml");
const EMBEDDED_CONFIG_NAME: &str = "<embedded>/project_configuration.toml";

/// Placeholder replaced by the admin level in name-header templates.
pub const LEVEL_PLACEHOLDER: &str = "{level}";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Two-letter language suffixes whose names are not written in Latin script.
    #[serde(default)]
    pub non_latin_alphabets: Vec<String>,
    pub dataset: DatasetSettings,
    pub catalog: CatalogSettings,
    pub download: DownloadSettings,
    pub resources: ResourceSettings,
    /// Country ISO3 -> exact gazetteer resource name.
    #[serde(default)]
    pub resource_exceptions: BTreeMap<String, String>,
    #[serde(default)]
    pub countries: BTreeMap<String, CountryOverride>,
    /// Country ISO3 -> units appended after the gazetteer is read.
    #[serde(default)]
    pub missing_units: BTreeMap<String, Vec<MissingUnit>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetSettings {
    pub name: String,
    pub title: String,
    /// Prefix of the per-country source dataset id, followed by the lower-case ISO3.
    pub source_prefix: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSettings {
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    60
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadSettings {
    /// Calls allowed per `period_ms`.
    pub calls: u32,
    pub period_ms: u64,
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceSettings {
    pub all: ResourceSpec,
    pub adm_1_2: ResourceSpec,
    pub lengths: ResourceSpec,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSpec {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub p_coded: bool,
}

/// Country-specific exceptions to the generic header and row rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryOverride {
    /// Name header for every level, `{level}` substituted.
    #[serde(default)]
    pub name_header: Option<String>,
    /// Literal codes that are not real units.
    #[serde(default)]
    pub ignored_codes: Vec<String>,
    #[serde(default)]
    pub skip_sheets: Vec<String>,
    #[serde(default)]
    pub skip_sheets_containing: Vec<String>,
    /// Keyed by admin level digit.
    #[serde(default)]
    pub levels: BTreeMap<String, LevelOverride>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelOverride {
    #[serde(default)]
    pub name_header: Option<String>,
    #[serde(default)]
    pub parent_level: Option<u8>,
    /// When false, names are kept in their original script.
    #[serde(default)]
    pub transliterate: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingUnit {
    pub admin_level: u8,
    pub code: String,
    #[serde(default)]
    pub name: Option<String>,
    pub parent_code: String,
    pub valid_from: String,
}

impl MissingUnit {
    pub fn to_record(&self, country: &CountryCode) -> std::result::Result<PcodeRecord, ModelError> {
        PcodeRecord::new(
            country.clone(),
            AdminLevel::new(self.admin_level)?,
            self.code.clone(),
            self.name.clone(),
            self.parent_code.clone(),
            self.valid_from.clone(),
        )
    }
}

impl ProjectConfig {
    /// The configuration shipped with the binary.
    pub fn embedded() -> Result<Self> {
        Self::from_toml_str(EMBEDDED_CONFIG, Path::new(EMBEDDED_CONFIG_NAME))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::io(path, source))?;
        Self::from_toml_str(&text, path)
    }

    pub fn from_toml_str(text: &str, origin: &Path) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|source| ConfigError::Toml {
            path: PathBuf::from(origin),
            source,
        })?;
        config.validate()?;
        debug!(
            origin = %origin.display(),
            countries = config.countries.len(),
            missing_units = config.missing_units.values().map(Vec::len).sum::<usize>(),
            "loaded project configuration"
        );
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.download.calls == 0 {
            return Err(ConfigError::invalid("download.calls must be at least 1"));
        }
        if self.download.period_ms == 0 {
            return Err(ConfigError::invalid("download.period_ms must be at least 1"));
        }
        let country_keys = self
            .countries
            .keys()
            .chain(self.resource_exceptions.keys())
            .chain(self.missing_units.keys());
        for key in country_keys {
            CountryCode::new(key.as_str())
                .map_err(|_| ConfigError::invalid(format!("invalid country key {key:?}")))?;
        }
        for (country, rules) in &self.countries {
            for (level, rule) in &rules.levels {
                parse_level_key(level).ok_or_else(|| {
                    ConfigError::invalid(format!("invalid admin level {level:?} for {country}"))
                })?;
                if let Some(parent) = rule.parent_level {
                    AdminLevel::new(parent).map_err(|_| {
                        ConfigError::invalid(format!(
                            "invalid parent level {parent} for {country} level {level}"
                        ))
                    })?;
                }
            }
        }
        for (country, units) in &self.missing_units {
            for unit in units {
                AdminLevel::new(unit.admin_level).map_err(|_| {
                    ConfigError::invalid(format!(
                        "invalid admin level {} for missing unit {} in {country}",
                        unit.admin_level, unit.code
                    ))
                })?;
            }
        }
        Ok(())
    }

    /// Catalog id of the boundary dataset for `country`.
    pub fn source_dataset_id(&self, country: &CountryCode) -> String {
        format!("{}{}", self.dataset.source_prefix, country.to_lowercase())
    }

    pub fn resource_exception(&self, country: &CountryCode) -> Option<&str> {
        self.resource_exceptions
            .get(country.as_str())
            .map(String::as_str)
    }

    pub fn missing_units(&self, country: &CountryCode) -> &[MissingUnit] {
        self.missing_units
            .get(country.as_str())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn rules_for(&self, country: &CountryCode) -> CountryRules<'_> {
        CountryRules::new(
            self.countries.get(country.as_str()),
            &self.non_latin_alphabets,
        )
    }
}

fn parse_level_key(key: &str) -> Option<AdminLevel> {
    key.trim().parse::<u8>().ok().and_then(|v| AdminLevel::new(v).ok())
}

/// Resolved view of the exceptions that apply to one country.
#[derive(Debug, Clone, Copy, Default)]
pub struct CountryRules<'a> {
    overrides: Option<&'a CountryOverride>,
    non_latin_alphabets: &'a [String],
}

impl<'a> CountryRules<'a> {
    pub fn new(overrides: Option<&'a CountryOverride>, non_latin_alphabets: &'a [String]) -> Self {
        Self {
            overrides,
            non_latin_alphabets,
        }
    }

    fn level(&self, level: AdminLevel) -> Option<&'a LevelOverride> {
        self.overrides?.levels.get(&level.to_string())
    }

    /// Forced name header for `level`, if any.
    pub fn name_header(&self, level: AdminLevel) -> Option<String> {
        if let Some(header) = self.level(level).and_then(|l| l.name_header.as_ref()) {
            return Some(header.clone());
        }
        self.overrides?
            .name_header
            .as_ref()
            .map(|template| template.replace(LEVEL_PLACEHOLDER, &level.to_string()))
    }

    /// Level whose codes the parent column holds.
    pub fn parent_level(&self, level: AdminLevel) -> Option<AdminLevel> {
        self.level(level)
            .and_then(|l| l.parent_level)
            .and_then(|p| AdminLevel::new(p).ok())
            .or_else(|| level.parent())
    }

    pub fn transliterate(&self, level: AdminLevel) -> bool {
        self.level(level)
            .and_then(|l| l.transliterate)
            .unwrap_or(true)
    }

    pub fn is_ignored_code(&self, code: &str) -> bool {
        self.overrides
            .is_some_and(|o| o.ignored_codes.iter().any(|c| c == code))
    }

    pub fn skips_sheet(&self, sheet: &str) -> bool {
        self.overrides.is_some_and(|o| {
            o.skip_sheets.iter().any(|s| s == sheet)
                || o.skip_sheets_containing.iter().any(|s| sheet.contains(s.as_str()))
        })
    }

    pub fn is_non_latin(&self, language: &str) -> bool {
        self.non_latin_alphabets
            .iter()
            .any(|code| code.eq_ignore_ascii_case(language))
    }
}
