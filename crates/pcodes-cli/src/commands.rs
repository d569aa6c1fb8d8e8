use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::Local;
use tracing::{info, info_span};

use pcodes_cli::pipeline::{
    check_integrity, harvest, load_previous, publish, select_countries, write_errors_file,
};
use pcodes_cli::types::{InspectResult, RunResult};
use pcodes_config::{CountryRegistry, ProjectConfig};
use pcodes_core::{Aggregator, extract_gazetteer};
use pcodes_ingest::{
    CalamineOpener, Catalog, HdxCatalog, HttpRetriever, LocalCatalog, SpreadsheetOpener,
    filter_admin_sheets,
};
use pcodes_model::{CountryCode, Diagnostics};

use crate::cli::{InspectArgs, RunArgs};

pub fn load_config(path: Option<&Path>) -> Result<ProjectConfig> {
    match path {
        Some(path) => {
            ProjectConfig::load(path).with_context(|| format!("load {}", path.display()))
        }
        None => ProjectConfig::embedded().context("load built-in configuration"),
    }
}

pub fn run_harvest(args: &RunArgs, config_path: Option<&Path>) -> Result<RunResult> {
    let config = load_config(config_path)?;
    let registry = CountryRegistry::embedded().context("load country registry")?;
    let countries = select_countries(&args.countries, &registry)?;
    let span = info_span!("run", countries = countries.len());
    let _guard = span.enter();

    let catalog: Box<dyn Catalog> = match &args.catalog_dir {
        Some(dir) => Box::new(LocalCatalog::new(dir.clone())),
        None => Box::new(
            HdxCatalog::new(&config.catalog, &config.download.user_agent)
                .context("create catalog client")?,
        ),
    };
    let retriever = HttpRetriever::new(&config.download, args.saved_dir.clone())
        .context("create downloader")?
        .with_save(args.save)
        .with_use_saved(args.use_saved);
    let opener = CalamineOpener;
    let aggregator = Aggregator::new(catalog.as_ref(), &retriever, &opener, &config);

    let mut store = load_previous(args.previous.as_deref())?;
    let mut diagnostics = Diagnostics::new();
    let mut summaries = harvest(&aggregator, &countries, &registry, &mut store, &mut diagnostics);
    let integrity = check_integrity(&store, &mut summaries, &config, &registry, &mut diagnostics);

    let carried_forward = store
        .countries()
        .filter(|country| {
            !summaries
                .iter()
                .any(|s| &s.country == *country && s.outcome.records() > 0)
        })
        .count();
    let total_records = store.record_count();
    let files = publish(
        &store,
        integrity.lengths,
        &args.output_dir,
        &config,
        args.dry_run,
    )?;

    let sorted = diagnostics.sorted_unique();
    if let Some(path) = &args.errors_file {
        write_errors_file(path, &sorted)?;
    }
    info!(
        records = total_records,
        errors = diagnostics.error_count(),
        warnings = diagnostics.warning_count(),
        "run finished"
    );

    Ok(RunResult {
        output_dir: args.output_dir.clone(),
        files,
        countries: summaries,
        diagnostics: sorted,
        total_records,
        carried_forward,
        errors_file: args.errors_file.clone(),
    })
}

pub fn run_inspect(args: &InspectArgs, config_path: Option<&Path>) -> Result<InspectResult> {
    let config = load_config(config_path)?;
    let country = CountryCode::new(args.country.as_str())
        .with_context(|| format!("invalid country code {}", args.country))?;
    if !args.workbook.is_file() {
        bail!("workbook not found: {}", args.workbook.display());
    }
    let reference_date = args
        .reference_date
        .clone()
        .unwrap_or_else(|| Local::now().date_naive().format("%Y-%m-%d").to_string());

    let subject = config.source_dataset_id(&country);
    let resource = args
        .workbook
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| args.workbook.display().to_string());
    let mut diagnostics = Diagnostics::new();
    let workbook = filter_admin_sheets(
        CalamineOpener.open(&args.workbook),
        &resource,
        &subject,
        &mut diagnostics,
    );
    let rules = config.rules_for(&country);
    let extraction = extract_gazetteer(
        &workbook,
        &country,
        &reference_date,
        &subject,
        &rules,
        &mut diagnostics,
    );

    Ok(InspectResult {
        country,
        workbook: args.workbook.clone(),
        reference_date,
        extraction,
        diagnostics: diagnostics.sorted_unique(),
    })
}

pub fn run_countries(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let registry = CountryRegistry::embedded().context("load country registry")?;
    crate::summary::print_countries(&registry, &config);
    Ok(())
}
