use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_PACKET_COUNT: i64 = 4;
pub const DEFAULT_TIMEOUT_MS: i64 = 1000;
pub const DEFAULT_WORKERS: i64 = 20;

/// Settings shared by every probe of a scan.
///
/// Values are validated once in [`ProbeConfig::new`]; every other part of the
/// workspace can rely on them being strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeConfig {
    packet_count: u32,
    timeout_ms: u64,
    max_workers: usize,
}

impl ProbeConfig {
    pub fn new(packet_count: i64, timeout_ms: i64, max_workers: i64) -> Result<Self, ConfigError> {
        Ok(Self {
            packet_count: positive("count", packet_count)?,
            timeout_ms: positive("timeout", timeout_ms)?,
            max_workers: positive("workers", max_workers)?,
        })
    }

    /// Echo requests sent per host.
    pub fn packet_count(&self) -> u32 {
        self.packet_count
    }

    /// Wait for each reply, in milliseconds.
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Upper bound on probes running at the same time.
    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// Longest a single probe may run before it counts as failed.
    ///
    /// One second of slack per packet on top of its reply timeout. Saturates
    /// for values too large to add up.
    pub fn probe_deadline(&self) -> Duration {
        let per_packet_ms: u64 = self.timeout_ms.saturating_add(1000);
        Duration::from_millis(u64::from(self.packet_count).saturating_mul(per_packet_ms))
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            packet_count: DEFAULT_PACKET_COUNT as u32,
            timeout_ms: DEFAULT_TIMEOUT_MS as u64,
            max_workers: DEFAULT_WORKERS as usize,
        }
    }
}

fn positive<T: TryFrom<i64>>(field: &'static str, value: i64) -> Result<T, ConfigError> {
    if value <= 0 {
        return Err(ConfigError::NonPositive { field, value });
    }
    T::try_from(value).map_err(|_| ConfigError::OutOfRange { field, value })
}
