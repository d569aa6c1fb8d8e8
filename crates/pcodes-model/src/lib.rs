pub mod country;
pub mod diagnostics;
pub mod error;
pub mod ids;
pub mod record;
pub mod table;

pub use country::{CountryInfo, CountryResolver};
pub use diagnostics::{Diagnostic, Diagnostics, PCODES_PIPELINE, Severity};
pub use error::{ModelError, Result};
pub use ids::{AdminLevel, CountryCode};
pub use record::{ColumnResolution, PcodeLengthEntry, PcodeRecord};
pub use table::{CellValue, Sheet, Workbook, cell_in, excel_serial_to_datetime, format_numeric};
