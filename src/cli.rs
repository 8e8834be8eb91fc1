use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

/// Probe a TCP port and measure connection latency
#[derive(Parser, Debug, Clone)]
#[command(name = "tcping", version, about, long_about = None)]
pub struct Cli {
    /// Host name or IP address to probe, optionally with a `:port` suffix
    pub host: String,

    /// Port to probe (1 - 65535), defaults to 80
    pub port: Option<String>,

    /// Number of probes to send, 0 keeps probing until interrupted
    #[arg(short, long)]
    pub count: Option<u64>,

    /// Timeout for each probe, in seconds
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// Time between probe starts, in milliseconds
    #[arg(short, long = "interval")]
    pub interval_ms: Option<u64>,

    /// Probe repeatedly and print statistics instead of a single open/closed check
    #[arg(short, long)]
    pub ping: bool,

    /// Do not print per-probe results
    #[arg(short, long)]
    pub quiet: bool,

    /// Print results as JSON lines
    #[arg(long)]
    pub json: bool,

    /// Keep probing until --count is reached, even when interrupted
    #[arg(long)]
    pub finish_count: bool,

    /// Log level: trace, debug, info, warn or error
    #[arg(long)]
    pub log_level: Option<String>,

    /// JSON config file
    #[arg(long, env = "TCPING_CONFIG")]
    pub config: Option<PathBuf>,

    /// Serve Prometheus metrics on this address while probing
    #[arg(long)]
    pub metrics_listen: Option<SocketAddr>,

    /// Record an RTT histogram in the exported metrics
    #[arg(long)]
    pub latency_history: bool,
}
