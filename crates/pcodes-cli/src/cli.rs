//! CLI argument definitions for the p-code harvester.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "pcodes",
    version,
    about = "Harvest administrative p-codes from country gazetteers",
    long_about = "Harvest administrative p-codes from per-country boundary gazetteers.\n\n\
                  Produces the global p-code table, its admin 1-2 subset, the p-code\n\
                  length table and the dataset metadata describing them."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Project configuration file (default: the built-in configuration).
    #[arg(long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Harvest gazetteers and write the global tables.
    Run(RunArgs),

    /// Extract p-codes from a local gazetteer workbook.
    Inspect(InspectArgs),

    /// List known countries and their configured exceptions.
    Countries,
}

#[derive(Parser)]
pub struct RunArgs {
    /// ISO3 codes to process, comma separated (default: every known country).
    #[arg(long = "countries", value_name = "ISO3", value_delimiter = ',')]
    pub countries: Vec<String>,

    /// Directory receiving the tables and dataset.json.
    #[arg(long = "output-dir", value_name = "DIR", default_value = "output")]
    pub output_dir: PathBuf,

    /// Read dataset metadata from `dataset-<id>.json` files instead of the catalog.
    #[arg(long = "catalog-dir", value_name = "DIR")]
    pub catalog_dir: Option<PathBuf>,

    /// Directory of saved downloads.
    #[arg(long = "saved-dir", value_name = "DIR", default_value = "saved_data")]
    pub saved_dir: PathBuf,

    /// Keep downloaded gazetteers in the saved-data directory.
    #[arg(long = "save")]
    pub save: bool,

    /// Use gazetteers from the saved-data directory instead of downloading.
    #[arg(long = "use-saved", conflicts_with = "save")]
    pub use_saved: bool,

    /// Previously published global table; countries not reprocessed keep its rows.
    #[arg(long = "previous", value_name = "CSV")]
    pub previous: Option<PathBuf>,

    /// Write the sorted diagnostics to this file.
    #[arg(long = "errors-file", value_name = "FILE")]
    pub errors_file: Option<PathBuf>,

    /// Process and report without writing output files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct InspectArgs {
    /// Gazetteer workbook (.xlsx, .xls, .xlsb, .ods).
    #[arg(value_name = "WORKBOOK")]
    pub workbook: PathBuf,

    /// ISO3 code of the country the gazetteer belongs to.
    #[arg(long = "country", value_name = "ISO3")]
    pub country: String,

    /// Date used for rows without a validity date (default: today).
    #[arg(long = "reference-date", value_name = "YYYY-MM-DD")]
    pub reference_date: Option<String>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
