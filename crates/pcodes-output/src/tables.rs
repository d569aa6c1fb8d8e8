//! Assembly of the published tables from per-country results.

use std::cmp::Ordering;

use pcodes_model::{PcodeLengthEntry, PcodeRecord};

pub const PCODE_HEADERS: [&str; 6] = [
    "Location",
    "Admin Level",
    "P-Code",
    "Name",
    "Parent P-Code",
    "Valid from date",
];

pub const PCODE_HXL_TAGS: [&str; 6] = [
    "#country+code",
    "#geo+admin_level",
    "#adm+code",
    "#adm+name",
    "#adm+code+parent",
    "#date+start",
];

pub const LENGTH_HEADERS: [&str; 7] = [
    "Location",
    "Country Length",
    "Admin 1 Length",
    "Admin 2 Length",
    "Admin 3 Length",
    "Admin 4 Length",
    "Admin 5 Length",
];

pub const LENGTH_HXL_TAGS: [&str; 7] = [
    "#country+code",
    "#country+code+length",
    "#adm1+code+length",
    "#adm2+code+length",
    "#adm3+code+length",
    "#adm4+code+length",
    "#adm5+code+length",
];

/// Highest level kept in the admin 1-2 table.
const SUMMARY_MAX_LEVEL: u8 = 2;

/// Everything the catalog writer publishes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalTables {
    /// Every record, sorted by country, level and code.
    pub all: Vec<PcodeRecord>,
    pub adm_1_2: Vec<PcodeRecord>,
    pub lengths: Vec<PcodeLengthEntry>,
    /// Earliest non-empty validity date, the start of the dataset time period.
    pub start_date: Option<String>,
}

impl GlobalTables {
    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }
}

/// Order used by the published tables. The level compares as text.
pub fn compare_records(a: &PcodeRecord, b: &PcodeRecord) -> Ordering {
    a.country()
        .as_str()
        .cmp(b.country().as_str())
        .then_with(|| {
            a.admin_level()
                .to_string()
                .cmp(&b.admin_level().to_string())
        })
        .then_with(|| a.code().cmp(b.code()))
}

pub fn assemble<'a>(
    records: impl IntoIterator<Item = &'a PcodeRecord>,
    mut lengths: Vec<PcodeLengthEntry>,
) -> GlobalTables {
    let mut all: Vec<PcodeRecord> = records.into_iter().cloned().collect();
    all.sort_by(compare_records);

    let adm_1_2 = all
        .iter()
        .filter(|r| r.admin_level().get() <= SUMMARY_MAX_LEVEL)
        .cloned()
        .collect();

    lengths.sort_by(|a, b| a.country.cmp(&b.country));

    let start_date = all
        .iter()
        .map(PcodeRecord::valid_from)
        .filter(|date| !date.is_empty())
        .min()
        .map(str::to_string);

    GlobalTables {
        all,
        adm_1_2,
        lengths,
        start_date,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pcodes_model::{AdminLevel, CountryCode};

    fn record(country: &str, level: u8, code: &str, date: &str) -> PcodeRecord {
        PcodeRecord::new(
            CountryCode::new(country).unwrap(),
            AdminLevel::new(level).unwrap(),
            code,
            None,
            country,
            date,
        )
        .unwrap()
    }

    #[test]
    fn sorted_by_country_level_code() {
        let records = vec![
            record("ARM", 2, "AM0101", "2020-01-01"),
            record("AFG", 2, "AF0102", "2021-11-17"),
            record("AFG", 1, "AF02", "2021-11-17"),
            record("AFG", 1, "AF01", "2021-11-17"),
            record("ARM", 1, "AM01", "2019-05-01"),
            record("AFG", 3, "AF010101", ""),
        ];
        let tables = assemble(&records, Vec::new());
        let keys: Vec<&str> = tables.all.iter().map(PcodeRecord::code).collect();
        assert_eq!(
            keys,
            vec!["AF01", "AF02", "AF0102", "AF010101", "AM01", "AM0101"]
        );
        let summary: Vec<&str> = tables.adm_1_2.iter().map(PcodeRecord::code).collect();
        assert_eq!(summary, vec!["AF01", "AF02", "AF0102", "AM01", "AM0101"]);
        assert_eq!(tables.start_date.as_deref(), Some("2019-05-01"));
    }

    #[test]
    fn empty_input() {
        let records: Vec<PcodeRecord> = Vec::new();
        let tables = assemble(&records, Vec::new());
        assert!(tables.is_empty());
        assert_eq!(tables.start_date, None);
    }
}
