//! # Pinger Common
//!
//! Domain types shared by every crate in the workspace.
//!
//! * **[`network`]**: address ranges and the parsing of range specifications.
//! * **[`config`]**: validated probe settings.
//! * **[`probe`]**: packet loss and the status view derived from it.
//! * **[`error`]**: input errors surfaced before a scan starts.

pub mod config;
pub mod error;
pub mod network;
pub mod probe;
