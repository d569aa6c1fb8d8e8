use std::path::PathBuf;

use pcodes_core::{CountryOutcome, GazetteerExtraction};
use pcodes_model::{CountryCode, Diagnostic};
use pcodes_output::OutputFiles;

#[derive(Debug, Clone)]
pub struct CountrySummary {
    pub country: CountryCode,
    pub name: Option<String>,
    pub outcome: CountryOutcome,
    pub missing_parents: Vec<String>,
}

#[derive(Debug)]
pub struct RunResult {
    pub output_dir: PathBuf,
    /// `None` on a dry run.
    pub files: Option<OutputFiles>,
    pub countries: Vec<CountrySummary>,
    /// Sorted and deduplicated.
    pub diagnostics: Vec<Diagnostic>,
    pub total_records: usize,
    /// Countries whose rows came from the previous table only.
    pub carried_forward: usize,
    pub errors_file: Option<PathBuf>,
}

#[derive(Debug)]
pub struct InspectResult {
    pub country: CountryCode,
    pub workbook: PathBuf,
    pub reference_date: String,
    pub extraction: GazetteerExtraction,
    pub diagnostics: Vec<Diagnostic>,
}
