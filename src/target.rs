use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::error::ConfigError;
use crate::util::resolve_host_to_ip;

/// A probe destination: the name the user gave, a validated port and the
/// address that name resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    host: String,
    port: u16,
    addr: IpAddr,
}

impl Target {
    pub fn new(host: impl Into<String>, port: u16, addr: IpAddr) -> Result<Self, ConfigError> {
        if port == 0 {
            return Err(ConfigError::InvalidPort(port.to_string()));
        }
        Ok(Self {
            host: host.into(),
            port,
            addr,
        })
    }

    /// Resolves `host` and builds the target from its first address.
    pub async fn resolve(host: &str, port: u16) -> Result<Self, ConfigError> {
        let addr = resolve_host_to_ip(host).await?;
        Self::new(host, port, addr)
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn addr(&self) -> IpAddr {
        self.addr
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.addr, self.port)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.addr {
            IpAddr::V6(_) if self.host.contains(':') => write!(f, "[{}]:{}", self.host, self.port),
            _ => write!(f, "{}:{}", self.host, self.port),
        }
    }
}
