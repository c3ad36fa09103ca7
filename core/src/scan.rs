//! One end-to-end scan: expand, schedule, aggregate.

use std::net::IpAddr;
use std::time::{Duration, Instant};

use pinger_common::error::RangeError;
use pinger_common::network::range::AddressRange;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::aggregator::{ResultAggregator, ResultSet, Summary};
use crate::scheduler::{Completion, ProbeScheduler};

/// Everything a scan produced.
#[derive(Debug, Clone)]
pub struct ScanReport {
    pub results: ResultSet,
    pub summary: Summary,
    pub elapsed: Duration,
    /// Set when the scan was cancelled before every address was probed.
    pub interrupted: bool,
}

/// Parses a range specification and checks that it holds at least one host.
pub fn expand(spec: &str) -> Result<AddressRange, RangeError> {
    let range: AddressRange = spec.parse()?;

    if range.host_count() == 0 {
        return Err(RangeError::Empty(spec.trim().to_string()));
    }

    Ok(range)
}

/// Probes every address and folds the completions into a [`ScanReport`].
///
/// `on_completion` runs on the calling task for each completion as it
/// arrives, before it is aggregated.
pub async fn run_scan<I, F>(
    scheduler: &ProbeScheduler,
    addresses: I,
    cancel: CancellationToken,
    mut on_completion: F,
) -> ScanReport
where
    I: IntoIterator<Item = IpAddr>,
    I::IntoIter: Send + 'static,
    F: FnMut(&Completion),
{
    let start_time = Instant::now();
    let mut aggregator = ResultAggregator::new();

    debug!(
        workers = scheduler.config().max_workers(),
        count = scheduler.config().packet_count(),
        timeout_ms = scheduler.config().timeout_ms(),
        "Starting scan"
    );

    let mut completions = scheduler.run(addresses, cancel.clone());
    while let Some(completion) = completions.recv().await {
        on_completion(&completion);
        aggregator.accept(&completion);
    }

    let results = aggregator.finish();
    let summary = results.summary();
    let elapsed = start_time.elapsed();
    debug!(probed = results.len(), ?elapsed, "Scan finished");

    ScanReport {
        results,
        summary,
        elapsed,
        interrupted: cancel.is_cancelled(),
    }
}
