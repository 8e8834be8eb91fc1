//! TCP reachability probe: repeatedly times a TCP handshake against one
//! target and reports per-attempt results plus loss and RTT statistics.

pub mod cancel;
pub mod cli;
pub mod config;
pub mod error;
pub mod event;
pub mod metrics;
pub mod output;
pub mod prober;
pub mod scheduler;
pub mod session;
pub mod summary;
pub mod target;
pub mod util;

pub use cancel::{CancelHandle, CancelSignal, cancellation};
pub use config::{CancelPolicy, ProbeConfig};
pub use error::{ConfigError, ConnectFailure};
pub use event::{EventSink, ProbeEvent};
pub use prober::{ProbeSample, Prober, TcpConnectProber};
pub use scheduler::Scheduler;
pub use session::Session;
pub use summary::{RttStats, Summary, summarize};
pub use target::Target;
