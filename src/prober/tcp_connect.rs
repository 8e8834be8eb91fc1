use tokio::net::TcpStream;
use tokio::time::{Duration, Instant, timeout};
use tracing::trace;

use super::{ProbeSample, Prober};
use crate::error::ConnectFailure;
use crate::target::Target;

/// Times a plain TCP handshake. The stream is closed as soon as it is
/// established and nothing is written to it.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpConnectProber;

impl Prober for TcpConnectProber {
    async fn attempt(&self, target: &Target, limit: Duration) -> ProbeSample {
        let addr = target.socket_addr();
        let start = Instant::now();
        match timeout(limit, TcpStream::connect(addr)).await {
            Ok(Ok(conn)) => {
                let rtt = start.elapsed();
                drop(conn);
                ProbeSample::Connected { rtt }
            }
            Ok(Err(e)) => {
                trace!("tcp connect {} failed: {:?}", addr, e);
                ProbeSample::Failed {
                    reason: ConnectFailure::from(&e),
                }
            }
            Err(_) => ProbeSample::Failed {
                reason: ConnectFailure::TimedOut,
            },
        }
    }
}
