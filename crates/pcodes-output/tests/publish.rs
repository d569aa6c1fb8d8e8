//! Writing the published tables and reading them back for the next run.

use std::fs;

use pcodes_config::ProjectConfig;
use pcodes_model::{AdminLevel, CountryCode, PcodeLengthEntry, PcodeRecord};
use pcodes_output::{assemble, read_pcodes_csv, write_outputs};

fn record(level: u8, code: &str, name: Option<&str>, parent: &str, date: &str) -> PcodeRecord {
    PcodeRecord::new(
        CountryCode::new("AFG").unwrap(),
        AdminLevel::new(level).unwrap(),
        code,
        name.map(str::to_string),
        parent,
        date,
    )
    .unwrap()
}

fn sample_records() -> Vec<PcodeRecord> {
    vec![
        record(3, "AF010101", None, "AF0101", "2021-11-17"),
        record(2, "AF0101", Some("Kabul, City"), "AF01", "2021-11-17"),
        record(1, "AF01", Some("Kabul"), "AFG", "2014-10-01"),
    ]
}

fn lengths() -> Vec<PcodeLengthEntry> {
    vec![PcodeLengthEntry {
        country: CountryCode::new("AFG").unwrap(),
        country_code_length: Some(2),
        admin_lengths: [
            Some("2".to_string()),
            Some("2".to_string()),
            Some("2".to_string()),
            None,
            None,
        ],
    }]
}

fn read_text(path: &std::path::Path) -> String {
    let bytes = fs::read(path).unwrap();
    assert!(bytes.starts_with(b"\xEF\xBB\xBF"), "missing byte-order mark");
    String::from_utf8(bytes[3..].to_vec()).unwrap()
}

#[test]
fn writes_tables_with_hxl_rows() {
    let config = ProjectConfig::embedded().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let records = sample_records();
    let tables = assemble(&records, lengths());

    let files = write_outputs(dir.path(), &tables, &config).unwrap();
    assert!(files.iter().all(std::path::Path::exists));
    assert!(files.all.ends_with("global_pcodes.csv"));

    insta::assert_snapshot!(read_text(&files.adm_1_2).trim_end(), @r#"
    Location,Admin Level,P-Code,Name,Parent P-Code,Valid from date
    #country+code,#geo+admin_level,#adm+code,#adm+name,#adm+code+parent,#date+start
    AFG,1,AF01,Kabul,AFG,2014-10-01
    AFG,2,AF0101,"Kabul, City",AF01,2021-11-17
    "#);

    insta::assert_snapshot!(read_text(&files.lengths).trim_end(), @r"
    Location,Country Length,Admin 1 Length,Admin 2 Length,Admin 3 Length,Admin 4 Length,Admin 5 Length
    #country+code,#country+code+length,#adm1+code+length,#adm2+code+length,#adm3+code+length,#adm4+code+length,#adm5+code+length
    AFG,2,2,2,2,,
    ");

    let all = read_text(&files.all);
    assert_eq!(all.lines().count(), 5);
    assert!(all.lines().nth(4).unwrap().starts_with("AFG,3,AF010101,,AF0101"));
}

#[test]
fn metadata_carries_time_period_and_resources() {
    let config = ProjectConfig::embedded().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let records = sample_records();
    let files = write_outputs(dir.path(), &assemble(&records, lengths()), &config).unwrap();

    let metadata: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&files.metadata).unwrap()).unwrap();
    assert_eq!(metadata["name"], "global-pcodes");
    assert_eq!(metadata["dataset_date"], "[2014-10-01T00:00:00 TO *]");
    assert_eq!(metadata["ongoing"], true);
    assert_eq!(metadata["groups"][0]["name"], "world");
    let names: Vec<&str> = metadata["resources"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec![
            "global_pcodes.csv",
            "global_pcodes_adm_1_2.csv",
            "global_pcode_lengths.csv"
        ]
    );
    assert_eq!(metadata["resources"][2]["p_coded"], false);
}

#[test]
fn published_table_seeds_next_run() {
    let config = ProjectConfig::embedded().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let records = sample_records();
    let tables = assemble(&records, Vec::new());
    let files = write_outputs(dir.path(), &tables, &config).unwrap();

    let restored = read_pcodes_csv(&files.all).unwrap();
    assert_eq!(restored, tables.all);
    assert_eq!(restored[2].name(), None);
}

#[test]
fn unreadable_previous_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.csv");
    fs::write(&path, "Location,Admin Level\nAFG,1\n").unwrap();
    let error = read_pcodes_csv(&path).unwrap_err();
    assert!(error.to_string().contains("missing column P-Code"));

    fs::write(
        &path,
        "Location,Admin Level,P-Code,Name,Parent P-Code,Valid from date\nAFG,nine,AF01,Kabul,AFG,2020-01-01\n",
    )
    .unwrap();
    assert!(read_pcodes_csv(&path).is_err());
}
