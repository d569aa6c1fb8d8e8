use crate::CountryCode;

/// Reference data for one country.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryInfo {
    pub iso3: CountryCode,
    pub iso2: String,
    pub name: String,
}

/// Looks up countries by their ISO codes.
pub trait CountryResolver {
    fn from_iso3(&self, code: &str) -> Option<CountryInfo>;
    fn from_iso2(&self, code: &str) -> Option<CountryInfo>;
}
