use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("invalid country code: {0:?}")]
    InvalidCountryCode(String),
    #[error("invalid admin level: {0} (expected 1-7)")]
    InvalidAdminLevel(i64),
    #[error("p-code must not be empty")]
    EmptyCode,
}

pub type Result<T> = std::result::Result<T, ModelError>;
