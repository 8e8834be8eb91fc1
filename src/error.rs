use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Problems detected before a probe run starts. The scheduler never sees
/// a target or config that produced one of these.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Argument [{0}] was not correct, <port> must be a positive integer in the range 1 - 65535")]
    InvalidPort(String),
    #[error("unknown host `{host}`: {source}")]
    ResolveFailed {
        host: String,
        #[source]
        source: io::Error,
    },
    #[error("unknown host `{0}`: no address found")]
    NoAddress(String),
    #[error("probe timeout must be greater than zero")]
    ZeroTimeout,
    #[error("Invalid log level: {0}. Valid levels are: trace, debug, info, warn, error")]
    InvalidLogLevel(String),
    #[error("config file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),
    #[error("failed to read config file {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config file {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ConfigError {
    /// True when the target host could not be turned into an address.
    pub fn is_unknown_host(&self) -> bool {
        matches!(self, Self::ResolveFailed { .. } | Self::NoAddress(_))
    }
}

/// Why a single connection attempt did not complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConnectFailure {
    #[error("connection refused")]
    Refused,
    #[error("timed out")]
    TimedOut,
    #[error("host unreachable")]
    Unreachable,
    #[error("{0}")]
    Other(io::ErrorKind),
}

impl From<&io::Error> for ConnectFailure {
    fn from(err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::ConnectionRefused => Self::Refused,
            io::ErrorKind::TimedOut => Self::TimedOut,
            io::ErrorKind::HostUnreachable | io::ErrorKind::NetworkUnreachable => {
                Self::Unreachable
            }
            kind => Self::Other(kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_io_errors() {
        let refused = io::Error::from(io::ErrorKind::ConnectionRefused);
        assert_eq!(ConnectFailure::from(&refused), ConnectFailure::Refused);

        let unreachable = io::Error::from(io::ErrorKind::NetworkUnreachable);
        assert_eq!(ConnectFailure::from(&unreachable), ConnectFailure::Unreachable);

        let reset = io::Error::from(io::ErrorKind::ConnectionReset);
        assert_eq!(
            ConnectFailure::from(&reset),
            ConnectFailure::Other(io::ErrorKind::ConnectionReset)
        );
    }

    #[test]
    fn unknown_host_errors_are_flagged() {
        assert!(ConfigError::NoAddress("nowhere".into()).is_unknown_host());
        assert!(!ConfigError::InvalidPort("0".into()).is_unknown_host());
        assert!(!ConfigError::ZeroTimeout.is_unknown_host());
    }
}
