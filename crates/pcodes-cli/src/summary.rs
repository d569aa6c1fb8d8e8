use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use pcodes_cli::types::{CountrySummary, InspectResult, RunResult};
use pcodes_config::{CountryOverride, CountryRegistry, ProjectConfig};
use pcodes_core::CountryOutcome;
use pcodes_model::{Diagnostic, PcodeRecord, Severity};

pub fn print_run_summary(result: &RunResult) {
    match &result.files {
        Some(files) => {
            println!("Output: {}", result.output_dir.display());
            for path in files.iter() {
                println!("  {}", path.display());
            }
        }
        None => println!("Dry run: no files written"),
    }
    if let Some(path) = &result.errors_file {
        println!("Errors file: {}", path.display());
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Country"),
        header_cell("Name"),
        header_cell("Outcome"),
        header_cell("Records"),
        header_cell("Sheets"),
        header_cell("Discarded"),
        header_cell("Missing parents"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Right);
    align_column(&mut table, 6, CellAlignment::Right);

    let mut processed = 0usize;
    for summary in &result.countries {
        if matches!(summary.outcome, CountryOutcome::Processed { .. }) {
            processed += 1;
        }
        table.add_row(country_row(summary));
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(format!(
            "{processed} processed, {} carried forward",
            result.carried_forward
        ))
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(result.total_records).add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
    ]);
    println!("{table}");
    print_diagnostics(&result.diagnostics);
}

fn country_row(summary: &CountrySummary) -> Vec<Cell> {
    let (records, sheets, discarded) = match summary.outcome {
        CountryOutcome::Processed {
            records,
            sheets_used,
            sheets_discarded,
        } => (
            Cell::new(records),
            Cell::new(sheets_used),
            count_cell(sheets_discarded, Color::Red),
        ),
        _ => (dim_cell("-"), dim_cell("-"), dim_cell("-")),
    };
    vec![
        Cell::new(summary.country.as_str())
            .fg(Color::Blue)
            .add_attribute(Attribute::Bold),
        Cell::new(summary.name.as_deref().unwrap_or("-")),
        outcome_cell(summary.outcome),
        records,
        sheets,
        discarded,
        count_cell(summary.missing_parents.len(), Color::Yellow),
    ]
}

pub fn print_inspect(result: &InspectResult) {
    println!("Workbook: {}", result.workbook.display());
    println!("Country: {}", result.country);
    println!("Reference date: {}", result.reference_date);
    println!(
        "Sheets used: {}, discarded: {}",
        result.extraction.sheets_used, result.extraction.sheets_discarded
    );
    print_records(&result.extraction.records);
    print_diagnostics(&result.diagnostics);
}

fn print_records(records: &[PcodeRecord]) {
    if records.is_empty() {
        println!("No p-codes extracted");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Level"),
        header_cell("P-Code"),
        header_cell("Name"),
        header_cell("Parent P-Code"),
        header_cell("Valid from"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Center);
    for record in records {
        table.add_row(vec![
            Cell::new(record.admin_level()),
            Cell::new(record.code()),
            match record.name() {
                Some(name) => Cell::new(name),
                None => dim_cell("-"),
            },
            Cell::new(record.parent_code()),
            Cell::new(record.valid_from()),
        ]);
    }
    println!("{table}");
}

fn print_diagnostics(diagnostics: &[Diagnostic]) {
    if diagnostics.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Severity"),
        header_cell("Subject"),
        header_cell("Message"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Center);
    for diagnostic in diagnostics {
        table.add_row(vec![
            severity_cell(diagnostic.severity),
            Cell::new(&diagnostic.subject),
            Cell::new(&diagnostic.message),
        ]);
    }
    println!();
    println!("Diagnostics:");
    println!("{table}");
}

pub fn print_countries(registry: &CountryRegistry, config: &ProjectConfig) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("ISO3"),
        header_cell("ISO2"),
        header_cell("Name"),
        header_cell("Exceptions"),
    ]);
    apply_table_style(&mut table);
    for info in registry.iter() {
        let code = info.iso3.as_str();
        let mut notes = Vec::new();
        if let Some(resource) = config.resource_exception(&info.iso3) {
            notes.push(format!("gazetteer {resource}"));
        }
        if let Some(overrides) = config.countries.get(code) {
            notes.extend(override_notes(overrides));
        }
        let units = config.missing_units(&info.iso3).len();
        if units > 0 {
            notes.push(format!("{units} added units"));
        }
        table.add_row(vec![
            Cell::new(code)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(&info.iso2),
            Cell::new(&info.name),
            if notes.is_empty() {
                dim_cell("-")
            } else {
                Cell::new(notes.join("; "))
            },
        ]);
    }
    println!("{table}");
}

fn override_notes(overrides: &CountryOverride) -> Vec<String> {
    let mut notes = Vec::new();
    if let Some(header) = &overrides.name_header {
        notes.push(format!("names from {header}"));
    }
    if !overrides.ignored_codes.is_empty() {
        notes.push(format!("ignores {}", overrides.ignored_codes.join(", ")));
    }
    for sheet in &overrides.skip_sheets {
        notes.push(format!("skips {sheet}"));
    }
    for part in &overrides.skip_sheets_containing {
        notes.push(format!("skips *{part}*"));
    }
    for (level, level_override) in &overrides.levels {
        if let Some(header) = &level_override.name_header {
            notes.push(format!("adm{level} names from {header}"));
        }
        if let Some(parent) = level_override.parent_level {
            notes.push(format!("adm{level} parent adm{parent}"));
        }
        if level_override.transliterate == Some(false) {
            notes.push(format!("adm{level} keeps script"));
        }
    }
    notes
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
    if table.column_count() >= 7 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Fixed(9)),
            ColumnConstraint::UpperBoundary(Width::Percentage(40)),
            ColumnConstraint::LowerBoundary(Width::Fixed(12)),
            ColumnConstraint::LowerBoundary(Width::Fixed(9)),
            ColumnConstraint::LowerBoundary(Width::Fixed(8)),
            ColumnConstraint::LowerBoundary(Width::Fixed(11)),
            ColumnConstraint::LowerBoundary(Width::Fixed(17)),
        ]);
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn outcome_cell(outcome: CountryOutcome) -> Cell {
    match outcome {
        CountryOutcome::Processed { .. } => Cell::new(outcome.label()).fg(Color::Green),
        CountryOutcome::NoDataset => dim_cell(outcome.label()),
        CountryOutcome::NoGazetteer => Cell::new(outcome.label()).fg(Color::Yellow),
        CountryOutcome::Unreadable => Cell::new(outcome.label()).fg(Color::Red),
    }
}

fn severity_cell(severity: Severity) -> Cell {
    match severity {
        Severity::Error => Cell::new("ERROR").fg(Color::Red),
        Severity::Warning => Cell::new("WARN").fg(Color::Yellow),
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
