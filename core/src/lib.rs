//! # Pinger Core
//!
//! Probing, scheduling and aggregation for a reachability scan.
//!
//! Data flows one way through the crate:
//! address range → [`scheduler::ProbeScheduler`] → [`aggregator::ResultAggregator`] → [`report::ReportSink`].
//!
//! Platform specifics (which tool to run, how to read its output) are kept in
//! [`probe::platform`] so everything else stays platform agnostic.

pub mod aggregator;
pub mod diagnostics;
pub mod probe;
pub mod report;
pub mod scan;
pub mod scheduler;
