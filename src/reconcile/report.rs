use std::fmt;

use tracing::warn;

use crate::error::PassIssue;

/// What one pass did, plus every non-fatal problem it ran into.
#[derive(Debug, Default)]
pub struct PassReport {
    pub scanned: usize,
    pub admitted: usize,
    pub written: usize,
    pub renamed: usize,
    pub covers_embedded: usize,
    pub issues: Vec<PassIssue>,
}

impl PassReport {
    pub fn record(&mut self, issue: impl Into<PassIssue>) {
        let issue = issue.into();
        warn!(%issue, "track skipped");
        self.issues.push(issue);
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

impl fmt::Display for PassReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} scanned, {} admitted, {} written, {} renamed, {} covers embedded, {} issues",
            self.scanned,
            self.admitted,
            self.written,
            self.renamed,
            self.covers_embedded,
            self.issues.len()
        )
    }
}
