#![cfg(test)]
use std::collections::BTreeMap;
use std::net::IpAddr;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use pinger_common::config::ProbeConfig;
use pinger_common::error::{ConfigError, RangeError};
use pinger_common::probe::Loss;
use pinger_core::aggregator::Summary;
use pinger_core::diagnostics::Diagnostic;
use pinger_core::probe::platform::Platform;
use pinger_core::probe::{Prober, SystemProber};
use pinger_core::report;
use pinger_core::scan::{self, ScanReport};
use pinger_core::scheduler::{Completion, ProbeScheduler};
use tokio_util::sync::CancellationToken;

use crate::util::{self, ReplayExecutor, TableProber, ip};

async fn scan_range(spec: &str, prober: Arc<dyn Prober>, cfg: ProbeConfig) -> ScanReport {
    let range = scan::expand(spec).unwrap();
    let scheduler = ProbeScheduler::new(prober, cfg, util::sink());
    scan::run_scan(&scheduler, range.hosts(), CancellationToken::new(), |_| {}).await
}

fn as_map(report: &ScanReport) -> BTreeMap<String, u8> {
    report
        .results
        .iter()
        .map(|(addr, loss)| (addr.to_string(), loss.percent()))
        .collect()
}

/// Three hosts, one per status.
#[tokio::test]
async fn dash_range_with_mixed_outcomes() {
    let prober = Arc::new(TableProber::new(&[
        ("192.168.1.1", 0),
        ("192.168.1.2", 50),
        ("192.168.1.3", 100),
    ]));
    let cfg = ProbeConfig::new(1, 1000, 20).unwrap();

    let report = scan_range("192.168.1.1-192.168.1.3", prober.clone(), cfg).await;

    assert_eq!(
        report.summary,
        Summary {
            success: 1,
            partial: 1,
            failed: 1
        }
    );
    let expected: BTreeMap<String, u8> = [
        ("192.168.1.1".to_string(), 0),
        ("192.168.1.2".to_string(), 50),
        ("192.168.1.3".to_string(), 100),
    ]
    .into_iter()
    .collect();
    assert_eq!(as_map(&report), expected);
    assert_eq!(prober.calls.load(Ordering::SeqCst), 3);
    assert!(!report.interrupted);
}

#[tokio::test]
async fn cidr_block_probes_only_usable_hosts() {
    let prober = Arc::new(TableProber::new(&[("10.0.0.1", 0), ("10.0.0.2", 0)]));
    let cfg = ProbeConfig::new(1, 1000, 4).unwrap();

    let report = scan_range("10.0.0.0/30", prober, cfg).await;

    let probed: Vec<IpAddr> = report.results.iter().map(|(addr, _)| addr).collect();
    assert_eq!(probed, vec![ip("10.0.0.1"), ip("10.0.0.2")]);
    assert_eq!(report.summary.success, 2);
}

#[tokio::test]
async fn summary_matches_results_for_larger_scan() {
    let prober = Arc::new(TableProber::new(&[("10.1.0.10", 0), ("10.1.0.20", 75)]));
    let cfg = ProbeConfig::new(1, 1000, 7).unwrap();

    let report = scan_range("10.1.0.0/24", prober, cfg).await;

    assert_eq!(report.results.len(), 254);
    assert_eq!(report.summary.total(), report.results.len());
    assert_eq!(report.summary, report.results.summary());
    assert_eq!(report.summary.success, 1);
    assert_eq!(report.summary.partial, 1);
    assert_eq!(report.summary.failed, 252);
}

/// Real argv building and output parsing, canned process output.
#[tokio::test]
async fn system_prober_parses_replayed_reports() {
    let executor = ReplayExecutor::new(&[
        (
            "172.16.0.1",
            "4 packets transmitted, 4 received, 0% packet loss, time 3004ms",
        ),
        (
            "172.16.0.2",
            "4 packets transmitted, 1 received, 75% packet loss, time 3004ms",
        ),
        ("172.16.0.3", "ping: connect: Network is unreachable"),
    ]);
    let sink = util::sink();
    let prober = Arc::new(SystemProber::with_executor(executor, Platform::Unix, sink.clone()));
    let cfg = ProbeConfig::new(4, 1000, 2).unwrap();
    let scheduler = ProbeScheduler::new(prober, cfg, sink.clone());

    let range = scan::expand("172.16.0.1-172.16.0.4").unwrap();
    let report = scan::run_scan(&scheduler, range.hosts(), CancellationToken::new(), |_| {}).await;

    assert_eq!(report.results.get(&ip("172.16.0.1")), Some(Loss::NONE));
    assert_eq!(report.results.get(&ip("172.16.0.2")), Loss::new(75));
    assert_eq!(report.results.get(&ip("172.16.0.3")), Some(Loss::TOTAL));
    assert_eq!(report.results.get(&ip("172.16.0.4")), Some(Loss::TOTAL));

    let events = sink.events();
    let issued = events
        .iter()
        .filter(|e| matches!(e, Diagnostic::CommandIssued { .. }))
        .count();
    assert_eq!(issued, 4);
    assert!(events.iter().any(|e| matches!(
        e,
        Diagnostic::UnparsableOutput { address, .. } if *address == ip("172.16.0.3")
    )));
    assert!(events.iter().any(|e| matches!(
        e,
        Diagnostic::ProbeFailed { address, .. } if *address == ip("172.16.0.4")
    )));
}

#[tokio::test]
async fn faulting_probes_are_isolated() {
    struct Explosive;

    #[async_trait]
    impl Prober for Explosive {
        async fn probe(&self, addr: IpAddr, _config: &ProbeConfig) -> Loss {
            if addr == ip("10.9.0.3") {
                panic!("probe defect");
            }
            Loss::NONE
        }
    }

    let sink = util::sink();
    let cfg = ProbeConfig::new(1, 1000, 2).unwrap();
    let scheduler = ProbeScheduler::new(Arc::new(Explosive), cfg, sink.clone());

    let range = scan::expand("10.9.0.1-10.9.0.6").unwrap();
    let mut seen: Vec<Completion> = Vec::new();
    let report = scan::run_scan(&scheduler, range.hosts(), CancellationToken::new(), |c| {
        seen.push(c.clone())
    })
    .await;

    assert_eq!(seen.len(), 6);
    assert_eq!(report.results.len(), 6);
    assert_eq!(report.results.get(&ip("10.9.0.3")), Some(Loss::TOTAL));
    assert_eq!(report.summary.success, 5);
    assert_eq!(report.summary.failed, 1);
    assert!(sink
        .events()
        .iter()
        .any(|e| matches!(e, Diagnostic::TaskFault { detail, .. } if detail == "probe defect")));
}

#[tokio::test]
async fn interrupted_scan_keeps_completed_results() {
    struct StallsAfterTwo;

    #[async_trait]
    impl Prober for StallsAfterTwo {
        async fn probe(&self, addr: IpAddr, _config: &ProbeConfig) -> Loss {
            if addr == ip("10.2.0.1") || addr == ip("10.2.0.2") {
                return Loss::NONE;
            }
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Loss::NONE
        }
    }

    let cfg = ProbeConfig::new(1, 1000, 4).unwrap();
    let scheduler = ProbeScheduler::new(Arc::new(StallsAfterTwo), cfg, util::sink());
    let cancel = CancellationToken::new();
    let range = scan::expand("10.2.0.1-10.2.0.50").unwrap();

    let trigger = cancel.clone();
    let mut completed = 0;
    let report = scan::run_scan(&scheduler, range.hosts(), cancel, |_| {
        completed += 1;
        if completed == 2 {
            trigger.cancel();
        }
    })
    .await;

    assert!(report.interrupted);
    assert_eq!(report.results.len(), 2);
    assert_eq!(report.summary.success, 2);
}

#[test]
fn invalid_input_is_rejected_before_scanning() {
    assert!(matches!(
        ProbeConfig::new(0, 1000, 20),
        Err(ConfigError::NonPositive { field: "count", .. })
    ));
    assert!(matches!(
        ProbeConfig::new(4, -5, 20),
        Err(ConfigError::NonPositive { field: "timeout", .. })
    ));
    assert!(matches!(
        ProbeConfig::new(4, 1000, 0),
        Err(ConfigError::NonPositive { field: "workers", .. })
    ));

    assert!(matches!(scan::expand("10.0.0.5-10.0.0.1"), Err(RangeError::Malformed(_))));
    assert!(matches!(scan::expand("10.0.0.1-::1"), Err(RangeError::Malformed(_))));
    assert!(matches!(scan::expand("10.0.0.1/32"), Err(RangeError::Empty(_))));
}

#[tokio::test]
async fn report_file_reflects_scan() {
    let prober = Arc::new(TableProber::new(&[("192.168.1.1", 0), ("192.168.1.2", 50)]));
    let cfg = ProbeConfig::new(1, 1000, 3).unwrap();
    let report = scan_range("192.168.1.1-192.168.1.3", prober, cfg).await;

    let text = report::render(&report.results, None);
    assert_eq!(
        text,
        "192.168.1.1 - Success\n192.168.1.2 - Partial\n192.168.1.3 - Failed\n"
    );
}
