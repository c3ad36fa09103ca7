//! Structured events emitted while probing.
//!
//! The core never owns log storage. Whoever builds the scheduler decides where
//! events go by handing it a [`DiagnosticsSink`].

use std::net::IpAddr;

use tracing::{debug, error, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A probe command is about to run.
    CommandIssued { address: IpAddr, argv: Vec<String> },
    /// The probe ran but its output carried no loss figure.
    UnparsableOutput {
        address: IpAddr,
        exit_code: Option<i32>,
        output: String,
    },
    /// The probe could not run or ran past its deadline.
    ProbeFailed { address: IpAddr, reason: String },
    /// A probe task died unexpectedly.
    TaskFault { address: IpAddr, detail: String },
}

pub trait DiagnosticsSink: Send + Sync {
    fn record(&self, diagnostic: Diagnostic);
}

/// Forwards diagnostics to whatever `tracing` subscriber is installed.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticsSink for TracingSink {
    fn record(&self, diagnostic: Diagnostic) {
        match diagnostic {
            Diagnostic::CommandIssued { address, argv } => {
                debug!(%address, command = %argv.join(" "), "Running probe");
            }
            Diagnostic::UnparsableOutput {
                address,
                exit_code,
                output,
            } => {
                warn!(%address, ?exit_code, output = %output.trim(), "Could not find packet loss in probe output");
            }
            Diagnostic::ProbeFailed { address, reason } => {
                error!(%address, error = %reason, "Probe failed");
            }
            Diagnostic::TaskFault { address, detail } => {
                error!(%address, fault = %detail, "Probe task faulted");
            }
        }
    }
}
