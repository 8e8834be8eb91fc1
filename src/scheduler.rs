use tokio::time::{Instant, sleep_until};
use tracing::{debug, info};

use crate::cancel::CancelSignal;
use crate::config::ProbeConfig;
use crate::error::ConfigError;
use crate::event::{EventSink, ProbeEvent};
use crate::prober::{ProbeSample, Prober};
use crate::session::Session;
use crate::summary::{Summary, summarize};
use crate::target::Target;

/// Drives a [`Prober`] one attempt at a time, pacing attempt starts
/// `config.interval` apart.
pub struct Scheduler<P> {
    prober: P,
    config: ProbeConfig,
}

impl<P: Prober> Scheduler<P> {
    pub fn new(prober: P, config: ProbeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { prober, config })
    }

    /// Probes `target` until the configured count is reached or `cancel`
    /// fires, then summarizes the run.
    ///
    /// Cancellation is only looked at between attempts. An attempt in
    /// flight always runs to completion or to its timeout.
    pub async fn run<S>(&self, target: &Target, mut cancel: CancelSignal, sink: &mut S) -> Summary
    where
        S: EventSink + ?Sized,
    {
        let mut session = Session::new();
        info!(
            "probing {} ({}) count={} timeout={:?} interval={:?}",
            target,
            target.addr(),
            self.config.count,
            self.config.timeout,
            self.config.interval
        );

        loop {
            if self.config.count_reached(session.attempts_issued()) {
                break;
            }
            if self.config.observes_cancel() && cancel.is_cancelled() {
                info!("probing {} cancelled after {} attempts", target, session.attempts_issued());
                break;
            }

            let started = Instant::now();
            let sample = self.prober.attempt(target, self.config.timeout).await;
            let elapsed = started.elapsed();

            session.record(&sample);
            match sample {
                ProbeSample::Connected { rtt } => {
                    debug!("tcp connect {} success: {:?}", target, rtt)
                }
                ProbeSample::Failed { reason } => {
                    debug!("tcp connect {} failed after {:?}: {}", target, elapsed, reason)
                }
            }
            sink.on_attempt(&ProbeEvent {
                seq: session.attempts_issued(),
                target,
                sample,
            });

            // nothing left to pace once the last counted attempt is done
            if !self.config.count_reached(session.attempts_issued()) {
                self.pace(started, &mut cancel).await;
            }
        }

        let summary = summarize(&session);
        info!(
            "probing {} finished: {} transmitted, {} received",
            target, summary.transmitted, summary.received
        );
        summary
    }

    // Waits until `interval` after `started`; an attempt that already took
    // longer is followed immediately.
    async fn pace(&self, started: Instant, cancel: &mut CancelSignal) {
        let next = started + self.config.interval;
        if self.config.observes_cancel() {
            tokio::select! {
                _ = sleep_until(next) => {}
                _ = cancel.cancelled() => {}
            }
        } else {
            sleep_until(next).await;
        }
    }
}
