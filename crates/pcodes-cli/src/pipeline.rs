//! Batch stages shared by the `run` command and its tests.
//!
//! 1. **Select**: resolve the requested countries against the registry
//! 2. **Seed**: load the previously published table, if any
//! 3. **Harvest**: run the aggregator for every selected country
//! 4. **Integrity**: parent checks and length statistics
//! 5. **Publish**: assemble and write the tables, then the errors file

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::{info, warn};

use pcodes_config::{CountryRegistry, ProjectConfig};
use pcodes_core::{Aggregator, CountryOutcome, CountryPcodeStore};
use pcodes_model::{CountryCode, CountryResolver, Diagnostic, Diagnostics, PcodeLengthEntry};
use pcodes_output::{OutputFiles, assemble, read_pcodes_csv, write_outputs};
use pcodes_validate::{check_parents, pcode_lengths};

use crate::types::CountrySummary;

/// Countries to process, in ISO3 order. An empty request means all of them.
pub fn select_countries(requested: &[String], registry: &CountryRegistry) -> Result<Vec<CountryCode>> {
    if requested.iter().all(|code| code.trim().is_empty()) {
        return Ok(registry.codes());
    }
    let mut selected = Vec::with_capacity(requested.len());
    for raw in requested.iter().filter(|code| !code.trim().is_empty()) {
        let Some(info) = registry.from_iso3(raw) else {
            bail!("unknown country code: {}", raw.trim());
        };
        selected.push(info.iso3);
    }
    selected.sort();
    selected.dedup();
    Ok(selected)
}

/// Store seeded from a previously published table.
pub fn load_previous(path: Option<&Path>) -> Result<CountryPcodeStore> {
    let mut store = CountryPcodeStore::new();
    if let Some(path) = path {
        let records = read_pcodes_csv(path)
            .with_context(|| format!("read previous table {}", path.display()))?;
        info!(path = %path.display(), records = records.len(), "seeded from previous table");
        store.seed(records);
    }
    Ok(store)
}

pub fn harvest(
    aggregator: &Aggregator<'_>,
    countries: &[CountryCode],
    resolver: &dyn CountryResolver,
    store: &mut CountryPcodeStore,
    diagnostics: &mut Diagnostics,
) -> Vec<CountrySummary> {
    countries
        .iter()
        .map(|country| {
            let outcome = aggregator.process_country(country, store, diagnostics);
            CountrySummary {
                country: country.clone(),
                name: resolver.from_iso3(country.as_str()).map(|info| info.name),
                outcome,
                missing_parents: Vec::new(),
            }
        })
        .collect()
}

#[derive(Debug, Default)]
pub struct IntegrityReport {
    pub missing_parents: BTreeMap<CountryCode, Vec<String>>,
    /// One entry per country in the store.
    pub lengths: Vec<PcodeLengthEntry>,
}

/// Parent checks for the countries processed in this run; length statistics
/// for every country in the store.
pub fn check_integrity(
    store: &CountryPcodeStore,
    summaries: &mut [CountrySummary],
    config: &ProjectConfig,
    resolver: &dyn CountryResolver,
    diagnostics: &mut Diagnostics,
) -> IntegrityReport {
    let mut report = IntegrityReport::default();
    for summary in summaries.iter_mut() {
        if !matches!(summary.outcome, CountryOutcome::Processed { .. }) {
            continue;
        }
        let Some(records) = store.get(&summary.country) else {
            continue;
        };
        let subject = config.source_dataset_id(&summary.country);
        let missing = check_parents(&summary.country, &subject, records, diagnostics);
        if !missing.is_empty() {
            report
                .missing_parents
                .insert(summary.country.clone(), missing.clone());
        }
        summary.missing_parents = missing;
    }
    report.lengths = store
        .iter()
        .filter_map(|(country, records)| pcode_lengths(country, records, resolver))
        .collect();
    report
}

/// Assemble and write the global tables unless `dry_run` is set.
pub fn publish(
    store: &CountryPcodeStore,
    lengths: Vec<PcodeLengthEntry>,
    output_dir: &Path,
    config: &ProjectConfig,
    dry_run: bool,
) -> Result<Option<OutputFiles>> {
    let tables = assemble(store.all_records(), lengths);
    if tables.is_empty() {
        warn!("no p-codes collected");
    }
    if dry_run {
        info!(records = tables.all.len(), "dry run, outputs not written");
        return Ok(None);
    }
    let files = write_outputs(output_dir, &tables, config)
        .with_context(|| format!("write outputs to {}", output_dir.display()))?;
    Ok(Some(files))
}

/// One diagnostic per line.
pub fn write_errors_file(path: &Path, diagnostics: &[Diagnostic]) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    let mut text = String::new();
    for diagnostic in diagnostics {
        text.push_str(&diagnostic.to_string());
        text.push('\n');
    }
    fs::write(path, text).with_context(|| format!("write {}", path.display()))
}
