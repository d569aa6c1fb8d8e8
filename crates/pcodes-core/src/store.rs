use std::collections::BTreeMap;

use tracing::debug;

use pcodes_model::{CountryCode, PcodeRecord};

/// Records of every processed country, keyed by ISO3 code.
#[derive(Debug, Clone, Default)]
pub struct CountryPcodeStore {
    countries: BTreeMap<CountryCode, Vec<PcodeRecord>>,
}

impl CountryPcodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the list held for `country`.
    ///
    /// An empty pass leaves earlier data in place and returns `false`.
    pub fn replace_country(&mut self, country: &CountryCode, records: Vec<PcodeRecord>) -> bool {
        if records.is_empty() {
            debug!(%country, "no records produced, keeping previous data");
            return false;
        }
        self.countries.insert(country.clone(), records);
        true
    }

    /// Load previously published records, grouped by their country.
    pub fn seed(&mut self, records: impl IntoIterator<Item = PcodeRecord>) {
        for record in records {
            self.countries
                .entry(record.country().clone())
                .or_default()
                .push(record);
        }
    }

    pub fn get(&self, country: &CountryCode) -> Option<&[PcodeRecord]> {
        self.countries.get(country).map(Vec::as_slice)
    }

    pub fn contains(&self, country: &CountryCode) -> bool {
        self.countries.contains_key(country)
    }

    pub fn countries(&self) -> impl Iterator<Item = &CountryCode> {
        self.countries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CountryCode, &[PcodeRecord])> {
        self.countries
            .iter()
            .map(|(country, records)| (country, records.as_slice()))
    }

    pub fn record_count(&self) -> usize {
        self.countries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    pub fn all_records(&self) -> impl Iterator<Item = &PcodeRecord> {
        self.countries.values().flatten()
    }
}
