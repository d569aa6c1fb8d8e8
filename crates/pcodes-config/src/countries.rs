//! Country reference data.
//!
//! The registry ships as an embedded CSV (`iso3,iso2,name`) and can be
//! replaced from a file with the same layout.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use pcodes_model::{CountryCode, CountryInfo, CountryResolver};
use serde::Deserialize;
use tracing::debug;

use crate::error::{ConfigError, Result};

const EMBEDDED_COUNTRIES: &str = include_str!("../data/countries.csv");

#[derive(Debug, Deserialize)]
struct CountryRow {
    iso3: String,
    iso2: String,
    name: String,
}

#[derive(Debug, Clone, Default)]
pub struct CountryRegistry {
    by_iso3: BTreeMap<String, CountryInfo>,
    iso2_to_iso3: BTreeMap<String, String>,
}

impl CountryRegistry {
    pub fn embedded() -> Result<Self> {
        Self::from_reader(EMBEDDED_COUNTRIES.as_bytes(), Path::new("<embedded>/countries.csv"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(|source| ConfigError::io(path, source))?;
        Self::from_reader(file, path)
    }

    fn from_reader<R: Read>(reader: R, origin: &Path) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let headers = reader
            .headers()
            .map_err(|e| csv_error(origin, &e))?
            .iter()
            .map(|h| h.trim_matches('\u{feff}').to_string())
            .collect::<Vec<_>>();
        reader.set_headers(csv::StringRecord::from(headers));

        let mut registry = Self::default();
        for row in reader.deserialize::<CountryRow>() {
            let row = row.map_err(|e| csv_error(origin, &e))?;
            let iso3 = CountryCode::new(row.iso3.as_str()).map_err(|e| ConfigError::Csv {
                path: PathBuf::from(origin),
                message: e.to_string(),
            })?;
            let iso2 = row.iso2.to_ascii_uppercase();
            registry
                .iso2_to_iso3
                .insert(iso2.clone(), iso3.as_str().to_string());
            registry.by_iso3.insert(
                iso3.as_str().to_string(),
                CountryInfo {
                    iso3,
                    iso2,
                    name: row.name,
                },
            );
        }
        debug!(
            origin = %origin.display(),
            countries = registry.by_iso3.len(),
            "loaded country registry"
        );
        Ok(registry)
    }

    /// All ISO3 codes in ascending order.
    pub fn codes(&self) -> Vec<CountryCode> {
        self.by_iso3.values().map(|info| info.iso3.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CountryInfo> {
        self.by_iso3.values()
    }

    pub fn len(&self) -> usize {
        self.by_iso3.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_iso3.is_empty()
    }
}

fn csv_error(path: &Path, error: &csv::Error) -> ConfigError {
    ConfigError::Csv {
        path: PathBuf::from(path),
        message: error.to_string(),
    }
}

impl CountryResolver for CountryRegistry {
    fn from_iso3(&self, code: &str) -> Option<CountryInfo> {
        self.by_iso3.get(&code.trim().to_ascii_uppercase()).cloned()
    }

    fn from_iso2(&self, code: &str) -> Option<CountryInfo> {
        let iso3 = self.iso2_to_iso3.get(&code.trim().to_ascii_uppercase())?;
        self.by_iso3.get(iso3).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_registry_resolves_both_code_kinds() {
        let registry = CountryRegistry::embedded().unwrap();
        assert!(registry.len() > 240);
        let afg = registry.from_iso3("afg").unwrap();
        assert_eq!(afg.iso2, "AF");
        assert_eq!(registry.from_iso2("AF").unwrap().iso3.as_str(), "AFG");
        assert!(registry.from_iso3("ZZZ").is_none());
        assert!(registry.from_iso3("XKX").is_some());
    }

    #[test]
    fn codes_are_sorted() {
        let registry = CountryRegistry::embedded().unwrap();
        let codes = registry.codes();
        assert_eq!(codes.first().map(CountryCode::as_str), Some("ABW"));
        assert!(codes.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn bom_in_header_is_ignored() {
        let data = "\u{feff}iso3,iso2,name\nARM,AM,Armenia\n";
        let registry =
            CountryRegistry::from_reader(data.as_bytes(), Path::new("test.csv")).unwrap();
        assert_eq!(registry.from_iso2("am").unwrap().name, "Armenia");
    }
}
