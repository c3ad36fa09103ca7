//! A single reachability probe.
//!
//! [`Prober`] is the seam the scheduler works against. [`SystemProber`] is
//! the real implementation: it shells out to the platform `ping` through an
//! [`Executor`] and reduces whatever happens to a [`Loss`].

use std::net::IpAddr;
use std::sync::Arc;

use async_trait::async_trait;
use pinger_common::config::ProbeConfig;
use pinger_common::probe::Loss;

use crate::diagnostics::{Diagnostic, DiagnosticsSink};

pub mod executor;
pub mod platform;

use executor::{Executor, SystemExecutor};
use platform::Platform;

/// Probes one address.
///
/// Implementations never fail: anything that keeps a loss figure from being
/// measured is reported as [`Loss::TOTAL`].
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, addr: IpAddr, config: &ProbeConfig) -> Loss;
}

pub struct SystemProber<E = SystemExecutor> {
    executor: E,
    platform: Platform,
    sink: Arc<dyn DiagnosticsSink>,
}

impl SystemProber<SystemExecutor> {
    /// Probes with the `ping` tool of the running platform.
    pub fn new(sink: Arc<dyn DiagnosticsSink>) -> Self {
        Self::with_executor(SystemExecutor, Platform::current(), sink)
    }
}

impl<E: Executor> SystemProber<E> {
    pub fn with_executor(executor: E, platform: Platform, sink: Arc<dyn DiagnosticsSink>) -> Self {
        Self {
            executor,
            platform,
            sink,
        }
    }
}

#[async_trait]
impl<E: Executor> Prober for SystemProber<E> {
    async fn probe(&self, addr: IpAddr, config: &ProbeConfig) -> Loss {
        let argv: Vec<String> =
            platform::build_command(self.platform, addr, config.packet_count(), config.timeout_ms());

        self.sink.record(Diagnostic::CommandIssued {
            address: addr,
            argv: argv.clone(),
        });

        let invocation = match self.executor.invoke(&argv, config.probe_deadline()).await {
            Ok(invocation) => invocation,
            Err(e) => {
                self.sink.record(Diagnostic::ProbeFailed {
                    address: addr,
                    reason: e.to_string(),
                });
                return Loss::TOTAL;
            }
        };

        // A non-zero exit is fine as long as the report carries a figure;
        // `ping` exits with 1 when replies are missing.
        match platform::parse_loss(&invocation.output, self.platform) {
            Some(loss) => loss,
            None => {
                self.sink.record(Diagnostic::UnparsableOutput {
                    address: addr,
                    exit_code: invocation.exit_code,
                    output: invocation.output,
                });
                Loss::TOTAL
            }
        }
    }
}
