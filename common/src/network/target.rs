//! # Range Specification Parsing
//!
//! Turns operator input into an [`AddressRange`].
//!
//! Supported formats:
//! * **Dash range**: "Start-End" (e.g., `192.168.1.1-192.168.1.50`, `fe80::1-fe80::ff`).
//! * **CIDR**: "Network/Prefix" (e.g., `192.168.1.0/24`).
//! * **Host**: a bare address, read as a one-address range (e.g., `10.0.0.7`).

use std::net::IpAddr;
use std::str::FromStr;

use ipnetwork::IpNetwork;

use crate::error::RangeError;
use crate::network::range::AddressRange;

impl FromStr for AddressRange {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if s.is_empty() {
            return Err(RangeError::Malformed("empty range specification".to_string()));
        }

        if let Some(range) = parse_host(s) {
            return Ok(range);
        }

        match s.split_once('-') {
            Some((start_str, end_str)) => parse_ip_range(start_str, end_str),
            None => parse_cidr_range(s),
        }
    }
}

/// Parses a single IP address.
fn parse_host(s: &str) -> Option<AddressRange> {
    s.parse::<IpAddr>()
        .ok()
        .map(|addr| AddressRange::Interval { start: addr, end: addr })
}

/// Parses both ends of a dash range.
///
/// Abbreviated ends such as `192.168.1.1-50` are rejected, each side must be
/// a complete address.
fn parse_ip_range(start_str: &str, end_str: &str) -> Result<AddressRange, RangeError> {
    let start_str = start_str.trim();
    let end_str = end_str.trim();

    let start_addr = start_str
        .parse::<IpAddr>()
        .map_err(|e| RangeError::Malformed(format!("invalid start IP '{start_str}': {e}")))?;

    let end_addr = end_str
        .parse::<IpAddr>()
        .map_err(|e| RangeError::Malformed(format!("invalid end IP '{end_str}': {e}")))?;

    AddressRange::interval(start_addr, end_addr)
}

/// Parses CIDR notation like "192.168.1.0/24".
fn parse_cidr_range(s: &str) -> Result<AddressRange, RangeError> {
    let network = s
        .parse::<IpNetwork>()
        .map_err(|e| RangeError::Malformed(format!("invalid network '{s}': {e}")))?;

    Ok(AddressRange::cidr(network))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
