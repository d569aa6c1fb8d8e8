//! Run-wide diagnostics sink.
//!
//! Every component reports problems here instead of failing; the batch driver
//! surfaces the collected entries at the end of the run.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Pipeline label attached to every harvester diagnostic.
pub const PCODES_PIPELINE: &str = "PCodes";

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => f.write_str("error"),
            Self::Warning => f.write_str("warning"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Diagnostic {
    pub pipeline: String,
    /// Dataset or resource the message is about.
    pub subject: String,
    pub message: String,
    pub severity: Severity,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}: {}", self.pipeline, self.subject, self.message)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, diagnostic: Diagnostic) {
        debug!(
            pipeline = %diagnostic.pipeline,
            subject = %diagnostic.subject,
            severity = %diagnostic.severity,
            "{}",
            diagnostic.message
        );
        self.entries.push(diagnostic);
    }

    pub fn error(&mut self, subject: impl Into<String>, message: impl Into<String>) {
        self.push(subject.into(), message.into(), Severity::Error);
    }

    pub fn warning(&mut self, subject: impl Into<String>, message: impl Into<String>) {
        self.push(subject.into(), message.into(), Severity::Warning);
    }

    /// Record that a value of `value_type` was expected but absent.
    pub fn missing_value(
        &mut self,
        subject: impl Into<String>,
        value_type: &str,
        value: impl fmt::Display,
    ) {
        self.push(
            subject.into(),
            format!("{value_type} {value} not found"),
            Severity::Error,
        );
    }

    fn push(&mut self, subject: String, message: String, severity: Severity) {
        self.report(Diagnostic {
            pipeline: PCODES_PIPELINE.to_string(),
            subject,
            message,
            severity,
        });
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    fn count(&self, severity: Severity) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.severity == severity)
            .count()
    }

    /// Entries deduplicated and sorted for end-of-run reporting.
    pub fn sorted_unique(&self) -> Vec<Diagnostic> {
        self.entries
            .iter()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Messages reported against `subject`, in report order.
    pub fn messages_for(&self, subject: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|entry| entry.subject == subject)
            .map(|entry| entry.message.as_str())
            .collect()
    }
}
