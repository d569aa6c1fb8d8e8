//! Column resolution for gazetteer admin sheets.
//!
//! Gazetteers name their columns inconsistently (`ADM1_PCODE`, `admin1Pcode`,
//! `ADM1_EN`, `Name_1`, ...). This crate infers a sheet's admin level from its
//! name and picks one header per role using the rules in [`rules::HEADER_RULES`].

#![deny(unsafe_code)]

pub mod error;
pub mod resolver;
pub mod rules;

pub use error::ResolveError;
pub use resolver::{infer_level, resolve_columns};
pub use rules::{HEADER_RULES, HeaderRole, HeaderRule, Substitutions, match_role};
