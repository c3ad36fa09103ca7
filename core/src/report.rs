//! Final reporting of a scan.

use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use chrono::{DateTime, Local};

use crate::aggregator::{ResultSet, Summary};

/// Receives the frozen results of a scan.
pub trait ReportSink {
    fn report(&self, results: &ResultSet, summary: &Summary) -> anyhow::Result<()>;
}

/// Writes `<address> - <status>` lines to a flat text file.
#[derive(Debug, Clone)]
pub struct TextFileReport {
    path: PathBuf,
    header: bool,
}

impl TextFileReport {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            header: true,
        }
    }

    /// Skips the timestamped header line.
    pub fn without_header(mut self) -> Self {
        self.header = false;
        self
    }
}

impl ReportSink for TextFileReport {
    fn report(&self, results: &ResultSet, _summary: &Summary) -> anyhow::Result<()> {
        let timestamp = self.header.then(Local::now);
        let text = render(results, timestamp);

        fs::write(&self.path, text)
            .with_context(|| format!("failed to write results to {}", self.path.display()))
    }
}

/// Renders the report body, optionally preceded by a header line.
pub fn render(results: &ResultSet, timestamp: Option<DateTime<Local>>) -> String {
    let mut out = String::new();

    if let Some(ts) = timestamp {
        let _ = writeln!(out, "Ping scan results - {}", ts.format("%Y-%m-%d %H:%M:%S"));
    }

    for (address, loss) in results.iter() {
        let _ = writeln!(out, "{address} - {}", loss.status());
    }

    out
}
