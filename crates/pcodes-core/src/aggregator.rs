//! Per-country orchestration: dataset lookup, download, extraction and storage.

use tracing::{debug, info, info_span};

use pcodes_config::ProjectConfig;
use pcodes_ingest::{Catalog, Retriever, SpreadsheetOpener, filter_admin_sheets, find_gazetteer};
use pcodes_model::{CountryCode, Diagnostics};

use crate::gazetteer::extract_gazetteer;
use crate::store::CountryPcodeStore;

/// What processing one country produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountryOutcome {
    /// No boundary dataset with a COD level exists.
    NoDataset,
    NoGazetteer,
    /// The gazetteer could not be downloaded, opened, or had no admin sheets.
    Unreadable,
    Processed {
        records: usize,
        sheets_used: usize,
        sheets_discarded: usize,
    },
}

impl CountryOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            Self::NoDataset => "no dataset",
            Self::NoGazetteer => "no gazetteer",
            Self::Unreadable => "unreadable",
            Self::Processed { .. } => "processed",
        }
    }

    pub fn records(&self) -> usize {
        match self {
            Self::Processed { records, .. } => *records,
            _ => 0,
        }
    }
}

/// Drives the ingest, resolve and normalize stages for one country at a time.
pub struct Aggregator<'a> {
    catalog: &'a dyn Catalog,
    retriever: &'a dyn Retriever,
    opener: &'a dyn SpreadsheetOpener,
    config: &'a ProjectConfig,
}

impl<'a> Aggregator<'a> {
    pub fn new(
        catalog: &'a dyn Catalog,
        retriever: &'a dyn Retriever,
        opener: &'a dyn SpreadsheetOpener,
        config: &'a ProjectConfig,
    ) -> Self {
        Self {
            catalog,
            retriever,
            opener,
            config,
        }
    }

    /// Process `country` and store its records.
    ///
    /// Failures are reported to `diagnostics`; the store is only touched when
    /// the country produced at least one record.
    pub fn process_country(
        &self,
        country: &CountryCode,
        store: &mut CountryPcodeStore,
        diagnostics: &mut Diagnostics,
    ) -> CountryOutcome {
        let span = info_span!("country", country = %country);
        let _guard = span.enter();

        let dataset_id = self.config.source_dataset_id(country);
        let dataset = match self.catalog.read_dataset(&dataset_id) {
            Ok(Some(dataset)) if dataset.has_cod_level() => dataset,
            Ok(_) => {
                diagnostics.warning(dataset_id.as_str(), "Could not find dataset");
                return CountryOutcome::NoDataset;
            }
            Err(error) => {
                debug!(%dataset_id, %error, "catalog lookup failed");
                diagnostics.warning(dataset_id.as_str(), "Could not find dataset");
                return CountryOutcome::NoDataset;
            }
        };

        let Some(resource) =
            find_gazetteer(&dataset, self.config.resource_exception(country), diagnostics)
        else {
            return CountryOutcome::NoGazetteer;
        };

        let path = match self.retriever.download(&resource.url) {
            Ok(path) => path,
            Err(error) => {
                debug!(url = %resource.url, %error, "download failed");
                diagnostics.error(
                    dataset.name.as_str(),
                    format!("Could not download {}", resource.name),
                );
                return CountryOutcome::Unreadable;
            }
        };

        let workbook = filter_admin_sheets(
            self.opener.open(&path),
            &resource.name,
            &dataset.name,
            diagnostics,
        );
        if workbook.is_empty() {
            return CountryOutcome::Unreadable;
        }

        let reference_date = dataset.reference_start().unwrap_or_default();
        if reference_date.is_empty() {
            debug!(dataset = %dataset.name, "dataset has no reference period");
        }
        let rules = self.config.rules_for(country);
        let extraction = extract_gazetteer(
            &workbook,
            country,
            &reference_date,
            &dataset.name,
            &rules,
            diagnostics,
        );

        let mut records = extraction.records;
        for unit in self.config.missing_units(country) {
            match unit.to_record(country) {
                Ok(record) => records.push(record),
                Err(error) => debug!(code = %unit.code, %error, "invalid missing unit"),
            }
        }

        let count = records.len();
        store.replace_country(country, records);
        info!(
            records = count,
            sheets = extraction.sheets_used,
            discarded = extraction.sheets_discarded,
            "country processed"
        );
        CountryOutcome::Processed {
            records: count,
            sheets_used: extraction.sheets_used,
            sheets_discarded: extraction.sheets_discarded,
        }
    }
}
