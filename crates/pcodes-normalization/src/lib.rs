//! Row-level cleaning of gazetteer sheets: codes, names, dates, and the
//! per-sheet record extraction built on them.

#![deny(unsafe_code)]

pub mod code;
pub mod date;
pub mod extract;
pub mod name;

pub use code::{CodeCheck, clean_code, is_placeholder};
pub use date::resolve_date;
pub use extract::{SheetContext, SheetExtraction, extract_sheet};
pub use name::{is_uniform_case, normalize_name, title_case};
