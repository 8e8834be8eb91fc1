use std::future::Future;
use std::time::Duration;

use crate::error::ConnectFailure;
use crate::target::Target;

pub mod tcp_connect;

pub use tcp_connect::TcpConnectProber;

/// Outcome of one connection attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeSample {
    Connected { rtt: Duration },
    Failed { reason: ConnectFailure },
}

impl ProbeSample {
    pub fn succeeded(&self) -> bool {
        matches!(self, Self::Connected { .. })
    }

    /// Round-trip time, only present for successful attempts.
    pub fn rtt(&self) -> Option<Duration> {
        match self {
            Self::Connected { rtt } => Some(*rtt),
            Self::Failed { .. } => None,
        }
    }
}

/// Makes a single bounded attempt against a target.
///
/// Failures are data: implementations report them through
/// [`ProbeSample::Failed`] and never panic or return early.
pub trait Prober {
    fn attempt(
        &self,
        target: &Target,
        timeout: Duration,
    ) -> impl Future<Output = ProbeSample> + Send;
}

impl<P: Prober + Sync> Prober for &P {
    async fn attempt(&self, target: &Target, timeout: Duration) -> ProbeSample {
        (**self).attempt(target, timeout).await
    }
}
