use std::time::Duration;

use colored::*;
use pinger_common::probe::Status;
use pinger_core::aggregator::{ResultSet, Summary};
use pinger_core::report::ReportSink;

use crate::terminal::{colors, print};

const KEY_WIDTH: usize = 8;

/// Prints the summary table of a finished scan.
pub struct ConsoleReport {
    elapsed: Duration,
}

impl ConsoleReport {
    pub fn new(elapsed: Duration) -> Self {
        Self { elapsed }
    }
}

impl ReportSink for ConsoleReport {
    fn report(&self, results: &ResultSet, summary: &Summary) -> anyhow::Result<()> {
        if results.is_empty() {
            print::header("no hosts probed", false);
            return Ok(());
        }

        print::header("scan summary", false);

        let rows: [(Status, usize); 3] = [
            (Status::Success, summary.success),
            (Status::Partial, summary.partial),
            (Status::Failed, summary.failed),
        ];
        for (status, count) in rows {
            let value: ColoredString = count.to_string().color(print::status_color(status)).bold();
            print::aligned_line(&status.to_string(), value, KEY_WIDTH);
        }
        print::aligned_line("Total", summary.total().to_string(), KEY_WIDTH);

        print::fat_separator();
        let total_time: ColoredString = format!("{:.2}s", self.elapsed.as_secs_f64()).bold().yellow();
        let output: ColoredString = format!("Scan complete: {} hosts probed in {}", summary.total(), total_time)
            .color(colors::TEXT_DEFAULT);
        print::centerln(&output.to_string());

        Ok(())
    }
}
