//! Platform knowledge for the system `ping` tool.
//!
//! Both functions here are pure: one spells the command line, the other reads
//! the loss figure back out of the tool's report.

use std::net::IpAddr;
use std::sync::LazyLock;

use pinger_common::network::ip_version;
use pinger_common::probe::Loss;
use regex::Regex;

/// Matches `0% packet loss`, `33.3333% packet loss` and `0.0% packet loss`.
static UNIX_LOSS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+(?:\.\d+)?)% packet loss").expect("valid regex"));

/// Matches the `(25% loss)` summary of Windows `ping`.
static WINDOWS_LOSS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((\d+)% loss\)").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Timeouts in milliseconds, `-n` for the count.
    Windows,
    /// `ping -W` takes milliseconds, IPv6 goes through `ping6`.
    MacOs,
    /// Linux and the other unices: `ping -W` takes whole seconds.
    Unix,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else {
            Platform::Unix
        }
    }
}

/// Builds the argv for probing `addr`.
pub fn build_command(platform: Platform, addr: IpAddr, packet_count: u32, timeout_ms: u64) -> Vec<String> {
    let count: String = packet_count.to_string();
    let family: String = format!("-{}", ip_version(&addr));

    let argv: Vec<String> = match platform {
        Platform::Windows => vec![
            "ping".into(),
            "-n".into(),
            count,
            "-w".into(),
            timeout_ms.to_string(),
            family,
            addr.to_string(),
        ],
        Platform::MacOs if addr.is_ipv6() => {
            vec!["ping6".into(), "-c".into(), count, addr.to_string()]
        }
        Platform::MacOs => vec![
            "ping".into(),
            "-c".into(),
            count,
            "-W".into(),
            timeout_ms.to_string(),
            addr.to_string(),
        ],
        Platform::Unix => vec![
            "ping".into(),
            "-c".into(),
            count,
            "-W".into(),
            timeout_ms.div_ceil(1000).to_string(),
            family,
            addr.to_string(),
        ],
    };

    argv
}

/// Extracts the loss percentage from a ping report.
///
/// Fractional figures are rounded to the nearest percent, but never onto 0 or
/// 100 unless the report says exactly that. Returns `None` when no figure is
/// present or it is not a valid percentage.
pub fn parse_loss(output: &str, platform: Platform) -> Option<Loss> {
    let pattern: &Regex = match platform {
        Platform::Windows => &WINDOWS_LOSS,
        Platform::MacOs | Platform::Unix => &UNIX_LOSS,
    };

    let figure: f64 = pattern.captures(output)?.get(1)?.as_str().parse().ok()?;
    if !(0.0..=100.0).contains(&figure) {
        return None;
    }

    let percent: f64 = if figure > 0.0 && figure < 100.0 {
        figure.round().clamp(1.0, 99.0)
    } else {
        figure
    };

    Loss::new(percent as u8)
}
