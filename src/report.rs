//! Per-request diagnostics.
//!
//! Each conversion collects the messages it emits (skipped symbols,
//! missing assets, overall outcomes) so callers and tests can inspect them
//! after the run. Entries are also surfaced through `tracing` the moment
//! they are recorded; nothing here is persisted.

use std::fmt;

use tracing::{error, info, warn};

/// Severity of one diagnostic entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// One recorded diagnostic.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
}

/// Ordered diagnostics for a single conversion request.
///
/// None of the entries are fatal; a request that produced only diagnostics
/// still runs to completion.
#[derive(Debug, Default)]
pub struct Report {
    entries: Vec<Diagnostic>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an informational entry (e.g. a skipped character).
    pub fn info(&mut self, message: impl Into<String>) {
        self.record(Severity::Info, message.into());
    }

    /// Record a warning (e.g. a missing asset).
    pub fn warn(&mut self, message: impl Into<String>) {
        self.record(Severity::Warning, message.into());
    }

    /// Record an error (e.g. an undecodable asset).
    pub fn error(&mut self, message: impl Into<String>) {
        self.record(Severity::Error, message.into());
    }

    fn record(&mut self, severity: Severity, message: String) {
        match severity {
            Severity::Info => info!("{}", message),
            Severity::Warning => warn!("{}", message),
            Severity::Error => error!("{}", message),
        }
        self.entries.push(Diagnostic { severity, message });
    }

    /// All entries in the order they were recorded.
    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    /// Number of entries with the given severity.
    pub fn count(&self, severity: Severity) -> usize {
        self.entries.iter().filter(|d| d.severity == severity).count()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// One-line summary for the end of a run, or `None` for a clean run.
    pub fn summary(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        Some(format!(
            "{} skipped, {} warning(s), {} error(s)",
            self.count(Severity::Info),
            self.count(Severity::Warning),
            self.count(Severity::Error)
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_keep_order() {
        let mut report = Report::new();
        report.info("first");
        report.warn("second");
        report.error("third");

        let messages: Vec<&str> = report.entries().iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_counts_by_severity() {
        let mut report = Report::new();
        report.info("a");
        report.info("b");
        report.warn("c");

        assert_eq!(report.count(Severity::Info), 2);
        assert_eq!(report.count(Severity::Warning), 1);
        assert_eq!(report.count(Severity::Error), 0);
    }

    #[test]
    fn test_summary_empty_report() {
        let report = Report::new();
        assert!(report.is_empty());
        assert!(report.summary().is_none());
    }

    #[test]
    fn test_summary_mentions_counts() {
        let mut report = Report::new();
        report.warn("missing");
        let summary = report.summary().unwrap();
        assert!(summary.contains("1 warning(s)"));
    }
}
