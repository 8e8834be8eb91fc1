// Host/port parsing and name resolution used before a run starts.

use std::net::IpAddr;

use crate::error::ConfigError;

/// Splits an optional `:port` suffix off `s`.
///
/// IPv6 literals need brackets to carry a port (`[::1]:443`); a bare
/// literal such as `::1` is returned whole. A suffix that is clearly meant
/// as a port but is out of range is an error, not a fallback to the default.
pub fn parse_host_port(s: &str, default_port: u16) -> Result<(String, u16), ConfigError> {
    if let Some(rest) = s.strip_prefix('[') {
        if let Some((host, tail)) = rest.split_once(']') {
            let port = match tail {
                "" => default_port,
                _ => match tail.strip_prefix(':') {
                    Some(port) => parse_port(port)?,
                    None => return Err(ConfigError::InvalidPort(tail.to_string())),
                },
            };
            return Ok((host.to_string(), port));
        }
    }

    if let Some((host, port)) = s.rsplit_once(':') {
        if !host.contains(':') && !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) {
            return Ok((host.to_string(), parse_port(port)?));
        }
    }
    Ok((s.to_string(), default_port))
}

/// Parses a user supplied port, accepting only 1..=65535.
pub fn parse_port(s: &str) -> Result<u16, ConfigError> {
    match s.trim().parse::<u16>() {
        Ok(port) if port != 0 => Ok(port),
        _ => Err(ConfigError::InvalidPort(s.to_string())),
    }
}

pub async fn resolve_host_to_ip(host: &str) -> Result<IpAddr, ConfigError> {
    if let Ok(ip) = host.parse::<IpAddr>() {
        return Ok(ip);
    }

    let mut addrs = tokio::net::lookup_host((host, 0))
        .await
        .map_err(|source| ConfigError::ResolveFailed {
            host: host.to_string(),
            source,
        })?;
    addrs
        .next()
        .map(|addr| addr.ip())
        .ok_or_else(|| ConfigError::NoAddress(host.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv6Addr;

    #[test]
    fn host_port_suffix() {
        let split = |s: &str| parse_host_port(s, 80).unwrap();
        assert_eq!(split("example.com:443"), ("example.com".into(), 443));
        assert_eq!(split("example.com"), ("example.com".into(), 80));
        assert_eq!(split("10.0.0.1:22"), ("10.0.0.1".into(), 22));
        // not a port, keep it as part of the host
        assert_eq!(split("host:http"), ("host:http".into(), 80));
    }

    #[test]
    fn host_port_suffix_out_of_range() {
        for input in ["example.com:0", "example.com:99999"] {
            assert!(
                matches!(parse_host_port(input, 80), Err(ConfigError::InvalidPort(_))),
                "{input}"
            );
        }
    }

    #[test]
    fn ipv6_literals() {
        let split = |s: &str| parse_host_port(s, 80).unwrap();
        assert_eq!(split("::1"), ("::1".into(), 80));
        assert_eq!(split("[::1]:8443"), ("::1".into(), 8443));
        assert_eq!(split("[fe80::1]"), ("fe80::1".into(), 80));
    }

    #[test]
    fn ipv6_bad_port_suffix() {
        for input in ["[::1]:70000", "[::1]:abc", "[::1]:", "[::1]443"] {
            assert!(
                matches!(parse_host_port(input, 80), Err(ConfigError::InvalidPort(_))),
                "{input}"
            );
        }
    }

    #[test]
    fn port_range_is_enforced() {
        assert_eq!(parse_port("1").unwrap(), 1);
        assert_eq!(parse_port("65535").unwrap(), 65535);
        assert!(matches!(parse_port("0"), Err(ConfigError::InvalidPort(_))));
        assert!(matches!(parse_port("65536"), Err(ConfigError::InvalidPort(_))));
        assert!(matches!(parse_port("-4"), Err(ConfigError::InvalidPort(_))));
        assert!(matches!(parse_port("http"), Err(ConfigError::InvalidPort(_))));
    }

    #[tokio::test]
    async fn literal_addresses_skip_dns() {
        assert_eq!(
            resolve_host_to_ip("::1").await.unwrap(),
            IpAddr::V6(Ipv6Addr::LOCALHOST)
        );
        assert_eq!(
            resolve_host_to_ip("127.0.0.1").await.unwrap(),
            "127.0.0.1".parse::<IpAddr>().unwrap()
        );
    }
}
