//! Error types for catalog access and retrieval.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("catalog returned HTTP {status} for {url}: {message}")]
    Http {
        url: String,
        status: u16,
        message: String,
    },

    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse dataset {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("saved file not found: {path}")]
    NotSaved { path: PathBuf },

    #[error("invalid rate limit: {calls} calls per {period_ms} ms")]
    RateLimit { calls: u32, period_ms: u64 },
}

impl IngestError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;
