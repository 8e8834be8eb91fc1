use std::time::Duration;

use crate::prober::ProbeSample;

/// Running tally of one probe run. Only grows.
#[derive(Debug, Default, Clone)]
pub struct Session {
    attempts_issued: u64,
    attempts_succeeded: u64,
    rtts: Vec<Duration>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, sample: &ProbeSample) {
        self.attempts_issued += 1;
        if let Some(rtt) = sample.rtt() {
            self.attempts_succeeded += 1;
            self.rtts.push(rtt);
        }
    }

    pub fn attempts_issued(&self) -> u64 {
        self.attempts_issued
    }

    pub fn attempts_succeeded(&self) -> u64 {
        self.attempts_succeeded
    }

    /// Round-trip times of successful attempts, in attempt order.
    pub fn rtts(&self) -> &[Duration] {
        &self.rtts
    }
}
