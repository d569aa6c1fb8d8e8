//! Checks run over a country's accumulated records once every country has
//! been processed.

pub mod lengths;
pub mod parents;

pub use lengths::{LENGTH_LEVELS, pcode_lengths};
pub use parents::check_parents;
