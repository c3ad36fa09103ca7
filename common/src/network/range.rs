use std::fmt;
use std::iter::FusedIterator;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use ipnetwork::IpNetwork;

use crate::error::RangeError;

/// A set of hosts to probe, either an inclusive interval or a CIDR block.
///
/// Ranges never hold their addresses. Use [`AddressRange::hosts`] to walk them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressRange {
    /// Every address from `start` to `end`, both included.
    Interval { start: IpAddr, end: IpAddr },
    /// The usable hosts of a network.
    Cidr(IpNetwork),
}

impl AddressRange {
    /// Builds an interval, rejecting mixed families and inverted bounds.
    pub fn interval(start: IpAddr, end: IpAddr) -> Result<Self, RangeError> {
        match (start, end) {
            (IpAddr::V4(_), IpAddr::V4(_)) | (IpAddr::V6(_), IpAddr::V6(_)) => {}
            _ => {
                return Err(RangeError::Malformed(format!(
                    "{start} and {end} are not of the same address family"
                )));
            }
        }

        if to_u128(start) > to_u128(end) {
            return Err(RangeError::Malformed(format!(
                "start address {start} is greater than end address {end}"
            )));
        }

        Ok(Self::Interval { start, end })
    }

    pub fn cidr(network: IpNetwork) -> Self {
        Self::Cidr(network)
    }

    /// Lazily walks the hosts of the range in ascending order.
    pub fn hosts(&self) -> Hosts {
        match self.bounds() {
            Some((first, last)) => Hosts::new(first, last, self.is_ipv6()),
            None => Hosts::empty(self.is_ipv6()),
        }
    }

    /// Number of hosts [`AddressRange::hosts`] will yield, computed without walking them.
    pub fn host_count(&self) -> u128 {
        match self.bounds() {
            // A full IPv6 interval holds 2^128 hosts; saturate rather than wrap.
            Some((first, last)) => (last - first).saturating_add(1),
            None => 0,
        }
    }

    pub fn is_ipv6(&self) -> bool {
        match self {
            Self::Interval { start, .. } => start.is_ipv6(),
            Self::Cidr(network) => network.is_ipv6(),
        }
    }

    /// Numeric bounds of the usable hosts, `None` if there are none.
    fn bounds(&self) -> Option<(u128, u128)> {
        match self {
            Self::Interval { start, end } => {
                let (first, last) = (to_u128(*start), to_u128(*end));
                (first <= last).then_some((first, last))
            }
            Self::Cidr(network) => usable_bounds(network),
        }
    }
}

impl fmt::Display for AddressRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Interval { start, end } => write!(f, "{start}-{end}"),
            Self::Cidr(network) => write!(f, "{}/{}", network.network(), network.prefix()),
        }
    }
}

/// Computes the first and last usable host of a network.
///
/// IPv4 always drops the network and broadcast addresses, so `/31` and `/32`
/// blocks have no usable hosts. IPv6 drops the subnet-router anycast address
/// unless the block is a `/127` or `/128`.
fn usable_bounds(network: &IpNetwork) -> Option<(u128, u128)> {
    let bits: u8 = if network.is_ipv4() { 32 } else { 128 };
    let prefix: u8 = network.prefix();
    let host_bits: u32 = u32::from(bits - prefix);

    let addr: u128 = to_u128(network.ip());
    let host_mask: u128 = if host_bits == 0 { 0 } else { u128::MAX >> (128 - host_bits) };
    let first: u128 = addr & !host_mask;
    let last: u128 = first | host_mask;

    match (network, host_bits) {
        (IpNetwork::V4(_), 0 | 1) => None,
        (IpNetwork::V4(_), _) => Some((first + 1, last - 1)),
        (IpNetwork::V6(_), 0 | 1) => Some((first, last)),
        (IpNetwork::V6(_), _) => Some((first + 1, last)),
    }
}

fn to_u128(addr: IpAddr) -> u128 {
    match addr {
        IpAddr::V4(v4) => u128::from(u32::from(v4)),
        IpAddr::V6(v6) => u128::from(v6),
    }
}

/// Single pass iterator over the hosts of an [`AddressRange`].
#[derive(Debug, Clone)]
pub struct Hosts {
    next: u128,
    last: u128,
    ipv6: bool,
    exhausted: bool,
}

impl Hosts {
    fn new(first: u128, last: u128, ipv6: bool) -> Self {
        Self {
            next: first,
            last,
            ipv6,
            exhausted: first > last,
        }
    }

    fn empty(ipv6: bool) -> Self {
        Self {
            next: 0,
            last: 0,
            ipv6,
            exhausted: true,
        }
    }

    fn to_addr(&self, value: u128) -> IpAddr {
        if self.ipv6 {
            IpAddr::V6(Ipv6Addr::from(value))
        } else {
            // Bounds of an IPv4 range always fit in 32 bits.
            IpAddr::V4(Ipv4Addr::from(value as u32))
        }
    }
}

impl Iterator for Hosts {
    type Item = IpAddr;

    fn next(&mut self) -> Option<IpAddr> {
        if self.exhausted {
            return None;
        }

        let current: u128 = self.next;
        if current == self.last {
            self.exhausted = true;
        } else {
            self.next += 1;
        }

        Some(self.to_addr(current))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.exhausted {
            return (0, Some(0));
        }
        match usize::try_from(self.last - self.next).ok().and_then(|n| n.checked_add(1)) {
            Some(remaining) => (remaining, Some(remaining)),
            None => (usize::MAX, None),
        }
    }
}

impl FusedIterator for Hosts {}
