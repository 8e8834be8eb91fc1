use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::cli::Cli;
use crate::error::ConfigError;
use crate::util::{parse_host_port, parse_port};

pub const DEFAULT_PORT: u16 = 80;

/// When the scheduler looks at the cancellation signal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelPolicy {
    /// Counted and unbounded runs both stop early when cancelled.
    #[default]
    Always,
    /// Counted runs always issue every attempt.
    UnboundedOnly,
}

/// Parameters of one probe run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeConfig {
    /// Upper bound on a single connection attempt.
    pub timeout: Duration,
    /// Number of attempts; `0` runs until cancelled.
    pub count: u64,
    /// Nominal spacing between attempt start times.
    pub interval: Duration,
    pub cancel_policy: CancelPolicy,
}

impl ProbeConfig {
    pub fn new(timeout: Duration, count: u64) -> Self {
        Self {
            timeout,
            count,
            interval: Duration::from_millis(default_probe_interval_ms()),
            cancel_policy: CancelPolicy::default(),
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_cancel_policy(mut self, policy: CancelPolicy) -> Self {
        self.cancel_policy = policy;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    pub fn is_unbounded(&self) -> bool {
        self.count == 0
    }

    /// True once `issued` attempts exhaust a counted run.
    pub fn count_reached(&self, issued: u64) -> bool {
        !self.is_unbounded() && issued >= self.count
    }

    pub fn observes_cancel(&self) -> bool {
        match self.cancel_policy {
            CancelPolicy::Always => true,
            CancelPolicy::UnboundedOnly => self.is_unbounded(),
        }
    }
}

/// Optional JSON config file. Every field has a default, and command line
/// flags win over anything set here.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct FileConfig {
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default)]
    pub count: u64,
    #[serde(default = "default_probe_interval_ms")]
    pub probe_interval_ms: u64,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub cancel_policy: CancelPolicy,
    #[serde(default)]
    pub metrics_listen: Option<SocketAddr>,
    #[serde(default = "default_enable_latency_history")]
    pub enable_latency_history: bool,
}

fn default_timeout_ms() -> u64 {
    1000
}

fn default_probe_interval_ms() -> u64 {
    1000
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_enable_latency_history() -> bool {
    false
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            count: 0,
            probe_interval_ms: default_probe_interval_ms(),
            log_level: default_log_level(),
            cancel_policy: CancelPolicy::default(),
            metrics_listen: None,
            enable_latency_history: default_enable_latency_history(),
        }
    }
}

impl FileConfig {
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::ConfigRead {
                path: path.to_path_buf(),
                source,
            })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

pub fn parse_log_level(level: &str) -> Result<tracing::Level, ConfigError> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(tracing::Level::TRACE),
        "debug" => Ok(tracing::Level::DEBUG),
        "info" => Ok(tracing::Level::INFO),
        "warn" | "warning" => Ok(tracing::Level::WARN),
        "error" => Ok(tracing::Level::ERROR),
        _ => Err(ConfigError::InvalidLogLevel(level.to_string())),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// One attempt, reported as open or closed.
    Check,
    /// Repeated attempts followed by a summary.
    Ping,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Everything a run needs, merged from the command line and the config
/// file.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub probe: ProbeConfig,
    pub mode: Mode,
    pub quiet: bool,
    pub format: OutputFormat,
    pub log_level: tracing::Level,
    pub metrics_listen: Option<SocketAddr>,
    pub enable_latency_history: bool,
}

impl Settings {
    pub async fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let file = match &cli.config {
            Some(path) => FileConfig::load(path).await?,
            None => FileConfig::default(),
        };
        Self::merge(cli, file)
    }

    pub fn merge(cli: &Cli, file: FileConfig) -> Result<Self, ConfigError> {
        let (host, port) = match &cli.port {
            Some(port) => (cli.host.clone(), parse_port(port)?),
            None => parse_host_port(&cli.host, DEFAULT_PORT)?,
        };

        let timeout = match cli.timeout {
            Some(secs) => Duration::from_secs(secs),
            None => Duration::from_millis(file.timeout_ms),
        };
        let interval = Duration::from_millis(cli.interval_ms.unwrap_or(file.probe_interval_ms));
        let cancel_policy = if cli.finish_count {
            CancelPolicy::UnboundedOnly
        } else {
            file.cancel_policy
        };
        let probe = ProbeConfig::new(timeout, cli.count.unwrap_or(file.count))
            .with_interval(interval)
            .with_cancel_policy(cancel_policy);
        probe.validate()?;

        let log_level = parse_log_level(cli.log_level.as_deref().unwrap_or(file.log_level.as_str()))?;

        Ok(Self {
            host,
            port,
            probe,
            mode: if cli.ping { Mode::Ping } else { Mode::Check },
            quiet: cli.quiet,
            format: if cli.json {
                OutputFormat::Json
            } else {
                OutputFormat::Text
            },
            log_level,
            metrics_listen: cli.metrics_listen.or(file.metrics_listen),
            enable_latency_history: cli.latency_history || file.enable_latency_history,
        })
    }
}
