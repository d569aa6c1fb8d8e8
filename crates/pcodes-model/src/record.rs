use serde::{Deserialize, Serialize};

use crate::{AdminLevel, CountryCode, ModelError};

/// One administrative unit taken from a gazetteer sheet.
///
/// Records are built once by the row normalizer and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PcodeRecord {
    country: CountryCode,
    admin_level: AdminLevel,
    code: String,
    name: Option<String>,
    parent_code: String,
    valid_from: String,
}

impl PcodeRecord {
    pub fn new(
        country: CountryCode,
        admin_level: AdminLevel,
        code: impl Into<String>,
        name: Option<String>,
        parent_code: impl Into<String>,
        valid_from: impl Into<String>,
    ) -> Result<Self, ModelError> {
        let code = code.into();
        if code.trim().is_empty() {
            return Err(ModelError::EmptyCode);
        }
        Ok(Self {
            country,
            admin_level,
            code,
            name,
            parent_code: parent_code.into(),
            valid_from: valid_from.into(),
        })
    }

    pub fn country(&self) -> &CountryCode {
        &self.country
    }

    pub fn admin_level(&self) -> AdminLevel {
        self.admin_level
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn parent_code(&self) -> &str {
        &self.parent_code
    }

    pub fn valid_from(&self) -> &str {
        &self.valid_from
    }
}

/// Headers chosen for each role on one admin sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnResolution {
    pub level: AdminLevel,
    pub code: String,
    pub name: String,
    pub parent: Option<String>,
    pub date: Option<String>,
}

/// Per-country code-length statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PcodeLengthEntry {
    pub country: CountryCode,
    /// Length of the country prefix of the codes (2 or 3), if it could be resolved.
    pub country_code_length: Option<usize>,
    /// `|`-joined distinct length deltas for levels 1 through 5.
    pub admin_lengths: [Option<String>; 5],
}

impl PcodeLengthEntry {
    pub fn admin_length(&self, level: AdminLevel) -> Option<&str> {
        self.admin_lengths
            .get(usize::from(level.get()) - 1)
            .and_then(|value| value.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_rejects_blank_code() {
        let country = CountryCode::new("AFG").unwrap();
        let level = AdminLevel::new(1).unwrap();
        let result = PcodeRecord::new(country, level, "  ", None, "AFG", "2021-11-17");
        assert_eq!(result, Err(ModelError::EmptyCode));
    }

    #[test]
    fn record_serializes_with_plain_level() {
        let record = PcodeRecord::new(
            CountryCode::new("AFG").unwrap(),
            AdminLevel::new(2).unwrap(),
            "AF0101",
            Some("Kabul".to_string()),
            "AF01",
            "2021-11-17",
        )
        .unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["country"], "AFG");
        assert_eq!(json["admin_level"], 2);
        let round: PcodeRecord = serde_json::from_value(json).unwrap();
        assert_eq!(round, record);
    }
}
