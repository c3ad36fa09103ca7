//! Bounded concurrent dispatch of probes.
//!
//! The scheduler pulls addresses from a lazy iterator only when a worker slot
//! is free, so no more than `max_workers` addresses are ever held at once, no
//! matter how long the iterator is. Completions are handed out in the order
//! they finish.
//!
//! Each task moves from pending to running and ends either completed (the
//! prober returned a loss) or faulted (the task panicked). A faulted task is
//! reported as [`Loss::TOTAL`] and never takes the rest of the scan with it.

use std::any::Any;
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;

use pinger_common::config::ProbeConfig;
use pinger_common::probe::Loss;
use tokio::sync::mpsc;
use tokio::task::{self, JoinError, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::diagnostics::{Diagnostic, DiagnosticsSink};
use crate::probe::Prober;

/// How a probe task ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    Completed(Loss),
    /// The task panicked; holds the panic message.
    Faulted(String),
}

/// One finished probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub address: IpAddr,
    pub outcome: TaskOutcome,
}

impl Completion {
    /// Faulted tasks count as unreachable.
    pub fn loss(&self) -> Loss {
        match self.outcome {
            TaskOutcome::Completed(loss) => loss,
            TaskOutcome::Faulted(_) => Loss::TOTAL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SchedulerState {
    /// Addresses remain; free slots are refilled.
    Accepting,
    /// Addresses are exhausted; waiting for running tasks.
    Draining,
    /// Nothing left to run or wait for.
    Done,
}

pub struct ProbeScheduler {
    prober: Arc<dyn Prober>,
    config: ProbeConfig,
    sink: Arc<dyn DiagnosticsSink>,
}

impl ProbeScheduler {
    pub fn new(prober: Arc<dyn Prober>, config: ProbeConfig, sink: Arc<dyn DiagnosticsSink>) -> Self {
        Self {
            prober,
            config,
            sink,
        }
    }

    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// Starts probing `addresses` in the background.
    ///
    /// The returned channel yields one [`Completion`] per address and closes
    /// once every address has been probed. Cancelling `cancel` aborts running
    /// probes; completions that were already produced are still delivered.
    pub fn run<I>(&self, addresses: I, cancel: CancellationToken) -> mpsc::Receiver<Completion>
    where
        I: IntoIterator<Item = IpAddr>,
        I::IntoIter: Send + 'static,
    {
        let (tx, rx) = mpsc::channel(self.config.max_workers());

        let dispatcher = Dispatcher {
            prober: Arc::clone(&self.prober),
            config: self.config,
            sink: Arc::clone(&self.sink),
            tasks: JoinSet::new(),
            in_flight: HashMap::new(),
        };

        tokio::spawn(dispatcher.drive(addresses.into_iter(), tx, cancel));
        rx
    }
}

/// Owns the worker pool for the duration of one run.
struct Dispatcher {
    prober: Arc<dyn Prober>,
    config: ProbeConfig,
    sink: Arc<dyn DiagnosticsSink>,
    tasks: JoinSet<Loss>,
    in_flight: HashMap<task::Id, IpAddr>,
}

impl Dispatcher {
    async fn drive<I>(mut self, mut addresses: I, tx: mpsc::Sender<Completion>, cancel: CancellationToken)
    where
        I: Iterator<Item = IpAddr>,
    {
        let mut state = SchedulerState::Accepting;

        while state != SchedulerState::Done {
            if state == SchedulerState::Accepting {
                state = self.fill(&mut addresses);
            }

            if self.tasks.is_empty() {
                state = SchedulerState::Done;
                continue;
            }

            let joined = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    self.abort(&tx).await;
                    return;
                }
                joined = self.tasks.join_next_with_id() => joined,
            };

            let Some(joined) = joined else {
                continue;
            };

            if let Some(completion) = self.settle(joined) {
                if tx.send(completion).await.is_err() {
                    debug!("Completion receiver dropped, stopping probes");
                    self.tasks.abort_all();
                    return;
                }
            }
        }

        trace!("Scheduler finished");
    }

    /// Tops the pool up to `max_workers` running tasks.
    fn fill<I>(&mut self, addresses: &mut I) -> SchedulerState
    where
        I: Iterator<Item = IpAddr>,
    {
        while self.tasks.len() < self.config.max_workers() {
            match addresses.next() {
                Some(address) => self.spawn(address),
                None => return SchedulerState::Draining,
            }
        }
        SchedulerState::Accepting
    }

    fn spawn(&mut self, address: IpAddr) {
        let prober = Arc::clone(&self.prober);
        let config = self.config;

        let handle = self
            .tasks
            .spawn(async move { prober.probe(address, &config).await });
        self.in_flight.insert(handle.id(), address);
    }

    /// Maps a joined task back to its address.
    ///
    /// Returns `None` for tasks that were cancelled.
    fn settle(&mut self, joined: Result<(task::Id, Loss), JoinError>) -> Option<Completion> {
        match joined {
            Ok((id, loss)) => {
                let address = self.in_flight.remove(&id)?;
                Some(Completion {
                    address,
                    outcome: TaskOutcome::Completed(loss),
                })
            }
            Err(err) => {
                let address = self.in_flight.remove(&err.id())?;
                if err.is_cancelled() {
                    return None;
                }

                let detail = fault_message(err);
                self.sink.record(Diagnostic::TaskFault {
                    address,
                    detail: detail.clone(),
                });
                Some(Completion {
                    address,
                    outcome: TaskOutcome::Faulted(detail),
                })
            }
        }
    }

    /// Aborts running probes and forwards whatever had already finished.
    async fn abort(&mut self, tx: &mpsc::Sender<Completion>) {
        debug!(in_flight = self.tasks.len(), "Scan cancelled, aborting probes");
        self.tasks.abort_all();

        while let Some(joined) = self.tasks.join_next_with_id().await {
            if let Some(completion) = self.settle(joined) {
                if tx.send(completion).await.is_err() {
                    break;
                }
            }
        }
    }
}

fn fault_message(err: JoinError) -> String {
    if !err.is_panic() {
        return err.to_string();
    }

    let payload: Box<dyn Any + Send> = err.into_panic();
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "task panicked".to_string()
    }
}
