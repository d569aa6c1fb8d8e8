#![deny(unsafe_code)]

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// ISO 3166-1 alpha-3 country code, stored upper-case.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CountryCode(String);

impl CountryCode {
    pub fn new(value: impl Into<String>) -> Result<Self, ModelError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.len() != 3 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ModelError::InvalidCountryCode(value));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lower-case form used in catalog dataset identifiers.
    pub fn to_lowercase(&self) -> String {
        self.0.to_ascii_lowercase()
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for CountryCode {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CountryCode> for String {
    fn from(code: CountryCode) -> Self {
        code.0
    }
}

/// Administrative level of a unit: 1 is the first sub-national tier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct AdminLevel(u8);

impl AdminLevel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 7;

    pub fn new(level: u8) -> Result<Self, ModelError> {
        if !(Self::MIN..=Self::MAX).contains(&level) {
            return Err(ModelError::InvalidAdminLevel(i64::from(level)));
        }
        Ok(Self(level))
    }

    pub fn from_digit(digit: char) -> Option<Self> {
        let value = digit.to_digit(10)?;
        u8::try_from(value).ok().and_then(|v| Self::new(v).ok())
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// The level directly above, or `None` at level 1.
    pub fn parent(self) -> Option<Self> {
        if self.0 > Self::MIN {
            Some(Self(self.0 - 1))
        } else {
            None
        }
    }
}

impl fmt::Display for AdminLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u8> for AdminLevel {
    type Error = ModelError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AdminLevel> for u8 {
    fn from(level: AdminLevel) -> Self {
        level.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn country_code_is_uppercased_and_trimmed() {
        let code = CountryCode::new(" afg ").unwrap();
        assert_eq!(code.as_str(), "AFG");
        assert_eq!(code.to_lowercase(), "afg");
    }

    #[test]
    fn country_code_rejects_bad_input() {
        assert!(CountryCode::new("AF").is_err());
        assert!(CountryCode::new("A1G").is_err());
        assert!(CountryCode::new("").is_err());
    }

    #[test]
    fn admin_level_bounds() {
        assert!(AdminLevel::new(0).is_err());
        assert!(AdminLevel::new(8).is_err());
        assert_eq!(AdminLevel::new(7).unwrap().get(), 7);
        assert_eq!(AdminLevel::from_digit('3').unwrap().get(), 3);
        assert!(AdminLevel::from_digit('9').is_none());
    }

    #[test]
    fn admin_level_parent() {
        assert_eq!(AdminLevel::new(1).unwrap().parent(), None);
        assert_eq!(
            AdminLevel::new(3).unwrap().parent(),
            Some(AdminLevel::new(2).unwrap())
        );
    }
}
