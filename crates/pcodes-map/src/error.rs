//! Error types for column resolution.

use thiserror::Error;

use pcodes_model::AdminLevel;

/// Reasons a sheet cannot be read. `Display` is the diagnostic text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("Could not determine admin level for {sheet}")]
    NoLevel { sheet: String },

    #[error("Can't find code header at adm{level}")]
    NoCodeColumn { level: AdminLevel },

    #[error("Can't find name header at adm{level}")]
    NoNameColumn { level: AdminLevel },

    #[error("invalid header pattern {pattern}: {message}")]
    InvalidPattern { pattern: String, message: String },
}
