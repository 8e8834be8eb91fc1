use crate::prober::ProbeSample;
use crate::target::Target;

/// Emitted once per attempt, in attempt order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeEvent<'a> {
    /// 1-based attempt number.
    pub seq: u64,
    pub target: &'a Target,
    pub sample: ProbeSample,
}

/// Receives per-attempt events from the scheduler.
pub trait EventSink {
    fn on_attempt(&mut self, event: &ProbeEvent<'_>);
}

impl<F> EventSink for F
where
    F: FnMut(&ProbeEvent<'_>),
{
    fn on_attempt(&mut self, event: &ProbeEvent<'_>) {
        self(event)
    }
}
