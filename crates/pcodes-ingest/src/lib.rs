//! Getting gazetteers in: catalog lookups, file retrieval, workbook parsing,
//! and the resource and sheet selection applied before column resolution.

pub mod catalog;
pub mod error;
pub mod filter;
pub mod locator;
pub mod retrieve;
pub mod workbook;

pub use catalog::{Catalog, Dataset, HdxCatalog, LocalCatalog, Resource, parse_period_start};
pub use error::{IngestError, Result};
pub use filter::{filter_admin_sheets, is_admin_sheet};
pub use locator::find_gazetteer;
pub use retrieve::{HttpRetriever, Retriever, Throttle, file_name_for};
pub use workbook::{CalamineOpener, ParseResult, SpreadsheetOpener, convert_cell, dedupe_headers};
