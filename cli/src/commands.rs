pub mod scan;

use std::path::PathBuf;

use clap::Parser;
use pinger_common::config::{DEFAULT_PACKET_COUNT, DEFAULT_TIMEOUT_MS, DEFAULT_WORKERS};

#[derive(Parser, Debug)]
#[command(name = "pinger", version)]
#[command(about = "Ping multiple IP addresses concurrently.")]
pub struct CommandLine {
    /// IP range to scan: startIP-endIP, CIDR or a single address
    /// (e.g. 192.168.1.1-192.168.1.10 or 192.168.1.0/28).
    /// IPv4 /31 and /32 blocks hold no hosts; pass the bare address instead
    pub ip_range: String,

    /// Number of ping packets to send per host
    #[arg(short, long, default_value_t = DEFAULT_PACKET_COUNT, allow_negative_numbers = true)]
    pub count: i64,

    /// Timeout per ping in milliseconds
    #[arg(short, long, default_value_t = DEFAULT_TIMEOUT_MS, allow_negative_numbers = true)]
    pub timeout: i64,

    /// Number of concurrent workers
    #[arg(short, long, default_value_t = DEFAULT_WORKERS, allow_negative_numbers = true)]
    pub workers: i64,

    /// Output file to save results
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// File receiving the debug log
    #[arg(long, default_value = "ping_scan.log")]
    pub log_file: PathBuf,

    /// Do not write a log file
    #[arg(long)]
    pub no_log_file: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Only print the summary, not every host
    #[arg(short, long)]
    pub quiet: bool,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
