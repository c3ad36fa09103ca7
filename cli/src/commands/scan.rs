use std::sync::Arc;

use anyhow::Context;
use pinger_common::config::ProbeConfig;
use pinger_common::error::RangeError;
use pinger_core::diagnostics::{DiagnosticsSink, TracingSink};
use pinger_core::probe::SystemProber;
use pinger_core::report::{ReportSink, TextFileReport};
use pinger_core::scan::{ScanReport, expand, run_scan};
use pinger_core::scheduler::ProbeScheduler;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::commands::CommandLine;
use crate::terminal::{print, progress, summary::ConsoleReport};

pub async fn scan(cmd: &CommandLine) -> anyhow::Result<()> {
    let cfg = ProbeConfig::new(cmd.count, cmd.timeout, cmd.workers)
        .context("count, timeout and workers must be positive integers")?;

    let range = match expand(&cmd.ip_range) {
        Ok(range) => range,
        Err(e @ RangeError::Empty(_)) => return Err(e.into()),
        Err(e) => return Err(anyhow::Error::new(e).context("error parsing IP range")),
    };

    print::header("starting ping scan", cmd.quiet);
    info!(
        "Starting ping scan on {} IPs with {} workers...",
        range.host_count(),
        cfg.max_workers()
    );

    let cancel = CancellationToken::new();
    listen_for_interrupt(cancel.clone());

    let sink: Arc<dyn DiagnosticsSink> = Arc::new(TracingSink);
    let prober = Arc::new(SystemProber::new(Arc::clone(&sink)));
    let scheduler = ProbeScheduler::new(prober, cfg, sink);

    let bar = progress::start(range.host_count());
    let report: ScanReport = run_scan(&scheduler, range.hosts(), cancel, |completion| {
        if !cmd.quiet {
            print::result_line(completion.address, completion.loss());
        }
        bar.inc(1);
    })
    .await;
    progress::finish();

    if report.interrupted {
        warn!(
            "Scan interrupted, showing {} of {} hosts",
            report.results.len(),
            range.host_count()
        );
    }

    ConsoleReport::new(report.elapsed).report(&report.results, &report.summary)?;

    if let Some(path) = &cmd.output {
        match TextFileReport::new(path).report(&report.results, &report.summary) {
            Ok(()) => info!("Results saved to {}", path.display()),
            Err(e) => error!("{e:#}"),
        }
    }

    Ok(())
}

fn listen_for_interrupt(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping probes...");
            cancel.cancel();
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pinger_common::error::ConfigError;

    async fn scan_args(args: &[&str]) -> anyhow::Error {
        let cmd = CommandLine::try_parse_from(std::iter::once("pinger").chain(args.iter().copied())).unwrap();
        scan(&cmd).await.unwrap_err()
    }

    #[tokio::test]
    async fn non_positive_flags_fail_before_scanning() {
        let err = scan_args(&["10.0.0.0/30", "-w", "0"]).await;
        assert_eq!(err.to_string(), "count, timeout and workers must be positive integers");
        assert!(format!("{err:#}").contains("workers"));

        let err = scan_args(&["10.0.0.0/30", "-t", "-5"]).await;
        assert!(err.downcast_ref::<ConfigError>().is_some());
    }

    #[tokio::test]
    async fn empty_range_has_its_own_message() {
        let err = scan_args(&["10.0.0.1/32"]).await;
        assert_eq!(err.to_string(), "no valid hosts found in '10.0.0.1/32'");
        assert!(matches!(err.downcast_ref::<RangeError>(), Some(RangeError::Empty(_))));
    }

    #[tokio::test]
    async fn malformed_range_is_reported_as_parse_error() {
        let err = scan_args(&["10.0.0.5-10.0.0.1"]).await;
        assert_eq!(err.to_string(), "error parsing IP range");
        assert!(matches!(err.downcast_ref::<RangeError>(), Some(RangeError::Malformed(_))));

        let err = scan_args(&["not-an-address"]).await;
        assert_eq!(err.to_string(), "error parsing IP range");
    }
}
