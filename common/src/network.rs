use std::net::IpAddr;

pub mod range;
pub mod target;

/// Returns the IP version number (4 or 6) of an address.
pub fn ip_version(addr: &IpAddr) -> u8 {
    match addr {
        IpAddr::V4(_) => 4,
        IpAddr::V6(_) => 6,
    }
}
