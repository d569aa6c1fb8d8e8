//! Code-length statistics per admin level.
//!
//! The length of a code is measured relative to its parent code, so the table
//! shows how many characters each level adds to the hierarchy.

use std::collections::BTreeSet;

use tracing::debug;

use pcodes_model::{AdminLevel, CountryCode, CountryResolver, PcodeLengthEntry, PcodeRecord};

/// Levels reported in the lengths table.
pub const LENGTH_LEVELS: usize = 5;

/// Length statistics for one country, `None` when it has no records.
///
/// The country prefix is read from the first record's code: its first three
/// characters as an ISO3 code, else its first two as an ISO2 code. An
/// unresolved prefix counts as zero characters.
pub fn pcode_lengths(
    country: &CountryCode,
    records: &[PcodeRecord],
    resolver: &dyn CountryResolver,
) -> Option<PcodeLengthEntry> {
    let first = records.first()?;
    let country_code_length = prefix_length(first.code(), resolver);
    let prefix = country_code_length.unwrap_or(0);

    let mut deltas: [BTreeSet<i64>; LENGTH_LEVELS] = Default::default();
    for record in records {
        let level = usize::from(record.admin_level().get());
        if level > LENGTH_LEVELS {
            continue;
        }
        let parent_length = if record.admin_level().get() == AdminLevel::MIN {
            prefix
        } else {
            record.parent_code().chars().count()
        };
        let delta = char_len(record.code()) - to_i64(parent_length);
        deltas[level - 1].insert(delta);
    }

    let admin_lengths = deltas.map(|set| {
        if set.is_empty() {
            None
        } else {
            Some(set.iter().map(i64::to_string).collect::<Vec<_>>().join("|"))
        }
    });
    debug!(%country, ?country_code_length, "computed code lengths");
    Some(PcodeLengthEntry {
        country: country.clone(),
        country_code_length,
        admin_lengths,
    })
}

fn prefix_length(code: &str, resolver: &dyn CountryResolver) -> Option<usize> {
    let iso3: String = code.chars().take(3).collect();
    if iso3.chars().count() == 3 && resolver.from_iso3(&iso3).is_some() {
        return Some(3);
    }
    let iso2: String = code.chars().take(2).collect();
    if iso2.chars().count() == 2 && resolver.from_iso2(&iso2).is_some() {
        return Some(2);
    }
    None
}

fn char_len(text: &str) -> i64 {
    to_i64(text.chars().count())
}

fn to_i64(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pcodes_model::CountryInfo;

    struct OneCountry;

    impl CountryResolver for OneCountry {
        fn from_iso3(&self, code: &str) -> Option<CountryInfo> {
            (code == "ARM").then(|| self.info())
        }

        fn from_iso2(&self, code: &str) -> Option<CountryInfo> {
            (code == "AM").then(|| self.info())
        }
    }

    impl OneCountry {
        fn info(&self) -> CountryInfo {
            CountryInfo {
                iso3: CountryCode::new("ARM").unwrap(),
                iso2: "AM".to_string(),
                name: "Armenia".to_string(),
            }
        }
    }

    fn record(country: &str, level: u8, code: &str, parent: &str) -> PcodeRecord {
        PcodeRecord::new(
            CountryCode::new(country).unwrap(),
            AdminLevel::new(level).unwrap(),
            code,
            None,
            parent,
            "2020-01-01",
        )
        .unwrap()
    }

    #[test]
    fn iso2_prefix() {
        let country = CountryCode::new("ARM").unwrap();
        let records = vec![
            record("ARM", 1, "AM01", "ARM"),
            record("ARM", 2, "AM0101", "AM01"),
            record("ARM", 2, "AM01002", "AM01"),
        ];
        let entry = pcode_lengths(&country, &records, &OneCountry).unwrap();
        assert_eq!(entry.country_code_length, Some(2));
        assert_eq!(entry.admin_lengths[0].as_deref(), Some("2"));
        assert_eq!(entry.admin_lengths[1].as_deref(), Some("2|3"));
        assert_eq!(entry.admin_lengths[2], None);
    }

    #[test]
    fn iso3_prefix_wins() {
        let country = CountryCode::new("ARM").unwrap();
        let records = vec![record("ARM", 1, "ARM001", "ARM")];
        let entry = pcode_lengths(&country, &records, &OneCountry).unwrap();
        assert_eq!(entry.country_code_length, Some(3));
        assert_eq!(entry.admin_lengths[0].as_deref(), Some("3"));
    }

    #[test]
    fn unresolved_prefix_counts_whole_code() {
        let country = CountryCode::new("XYZ").unwrap();
        let records = vec![record("XYZ", 1, "12", "XYZ"), record("XYZ", 2, "1201", "12")];
        let entry = pcode_lengths(&country, &records, &OneCountry).unwrap();
        assert_eq!(entry.country_code_length, None);
        assert_eq!(entry.admin_lengths[0].as_deref(), Some("2"));
        assert_eq!(entry.admin_lengths[1].as_deref(), Some("2"));
    }

    #[test]
    fn deltas_sort_numerically() {
        let country = CountryCode::new("ARM").unwrap();
        let records = vec![
            record("ARM", 1, "AM01", "ARM"),
            record("ARM", 2, "AM01000000001", "AM01"),
            record("ARM", 2, "AM0101", "AM01"),
            record("ARM", 2, "A1", "AM01"),
        ];
        let entry = pcode_lengths(&country, &records, &OneCountry).unwrap();
        assert_eq!(entry.admin_lengths[1].as_deref(), Some("-2|2|9"));
    }

    #[test]
    fn deep_levels_are_not_tabulated() {
        let country = CountryCode::new("ARM").unwrap();
        let records = vec![
            record("ARM", 1, "AM01", "ARM"),
            record("ARM", 6, "AM010101010101", "AM0101010101"),
        ];
        let entry = pcode_lengths(&country, &records, &OneCountry).unwrap();
        assert!(entry.admin_lengths[1..].iter().all(Option::is_none));
    }

    #[test]
    fn no_records_no_entry() {
        let country = CountryCode::new("ARM").unwrap();
        assert!(pcode_lengths(&country, &[], &OneCountry).is_none());
    }
}
