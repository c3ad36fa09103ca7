use std::collections::BTreeMap;
use std::net::IpAddr;

use pinger_common::probe::{Loss, Status};

use crate::scheduler::Completion;

/// Loss per probed address.
///
/// Keyed by address so that iteration, and anything rendered from it, is the
/// same no matter in which order probes finished.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    entries: BTreeMap<IpAddr, Loss>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the loss for `address`, replacing any earlier value.
    pub fn record(&mut self, address: IpAddr, loss: Loss) -> Option<Loss> {
        self.entries.insert(address, loss)
    }

    pub fn get(&self, address: &IpAddr) -> Option<Loss> {
        self.entries.get(address).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in ascending address order.
    pub fn iter(&self) -> impl Iterator<Item = (IpAddr, Loss)> + '_ {
        self.entries.iter().map(|(addr, loss)| (*addr, *loss))
    }

    /// Counts every entry by status.
    pub fn summary(&self) -> Summary {
        self.entries
            .values()
            .fold(Summary::default(), |summary, loss| summary.with(loss.status()))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub success: usize,
    pub partial: usize,
    pub failed: usize,
}

impl Summary {
    pub fn total(&self) -> usize {
        self.success + self.partial + self.failed
    }

    fn with(mut self, status: Status) -> Self {
        match status {
            Status::Success => self.success += 1,
            Status::Partial => self.partial += 1,
            Status::Failed => self.failed += 1,
        }
        self
    }
}

/// Single writer of a scan's [`ResultSet`].
///
/// Completions are funnelled through one aggregator on the orchestrating
/// task; probe workers never touch the results directly.
#[derive(Debug, Default)]
pub struct ResultAggregator {
    results: ResultSet,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accept(&mut self, completion: &Completion) {
        self.results.record(completion.address, completion.loss());
    }

    pub fn summary(&self) -> Summary {
        self.results.summary()
    }

    pub fn results(&self) -> &ResultSet {
        &self.results
    }

    pub fn finish(self) -> ResultSet {
        self.results
    }
}
