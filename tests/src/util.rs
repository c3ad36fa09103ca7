use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use pinger_common::config::ProbeConfig;
use pinger_common::probe::Loss;
use pinger_core::diagnostics::{Diagnostic, DiagnosticsSink};
use pinger_core::probe::executor::{Executor, InvokeError, Invocation};
use pinger_core::probe::Prober;

/// Answers from a fixed table; unknown addresses are unreachable.
#[derive(Default)]
pub struct TableProber {
    losses: HashMap<IpAddr, Loss>,
    pub calls: AtomicUsize,
}

impl TableProber {
    pub fn new(entries: &[(&str, u8)]) -> Self {
        let losses = entries
            .iter()
            .map(|(addr, loss)| (addr.parse().unwrap(), Loss::new(*loss).unwrap()))
            .collect();
        Self {
            losses,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Prober for TableProber {
    async fn probe(&self, addr: IpAddr, _config: &ProbeConfig) -> Loss {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.losses.get(&addr).copied().unwrap_or(Loss::TOTAL)
    }
}

/// Plays back canned `ping` reports keyed by the last argv element.
pub struct ReplayExecutor {
    reports: HashMap<String, &'static str>,
}

impl ReplayExecutor {
    pub fn new(reports: &[(&str, &'static str)]) -> Self {
        Self {
            reports: reports.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        }
    }
}

#[async_trait]
impl Executor for ReplayExecutor {
    async fn invoke(&self, argv: &[String], timeout: Duration) -> Result<Invocation, InvokeError> {
        let target = argv.last().ok_or(InvokeError::EmptyCommand)?;
        match self.reports.get(target) {
            Some(report) => Ok(Invocation {
                output: report.to_string(),
                exit_code: Some(0),
            }),
            None => Err(InvokeError::Timeout(timeout)),
        }
    }
}

#[derive(Default)]
pub struct RecordingSink(Mutex<Vec<Diagnostic>>);

impl RecordingSink {
    pub fn events(&self) -> Vec<Diagnostic> {
        self.0.lock().unwrap().clone()
    }
}

impl DiagnosticsSink for RecordingSink {
    fn record(&self, diagnostic: Diagnostic) {
        self.0.lock().unwrap().push(diagnostic);
    }
}

pub fn sink() -> Arc<RecordingSink> {
    Arc::new(RecordingSink::default())
}

pub fn ip(s: &str) -> IpAddr {
    s.parse().unwrap()
}
