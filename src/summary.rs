use std::time::Duration;

use crate::session::Session;

/// Final report of a finished run.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub transmitted: u64,
    pub received: u64,
    /// `None` when nothing was transmitted.
    pub loss_percent: Option<f64>,
    /// `None` when nothing was received.
    pub rtt: Option<RttStats>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RttStats {
    pub min: Duration,
    /// Median of the successful samples, reported in the `avg` slot.
    pub avg: Duration,
    pub max: Duration,
}

pub fn summarize(session: &Session) -> Summary {
    let transmitted = session.attempts_issued();
    let received = session.attempts_succeeded();
    Summary {
        transmitted,
        received,
        loss_percent: loss_percent(transmitted, received),
        rtt: rtt_stats(session.rtts()),
    }
}

/// `100 - received*100/transmitted` in integer arithmetic, so partial
/// percentages truncate (1 of 3 received reports 67%, not 66.7%).
pub fn loss_percent(transmitted: u64, received: u64) -> Option<f64> {
    if transmitted == 0 {
        return None;
    }
    let received_pct = received.saturating_mul(100) / transmitted;
    Some(100u64.saturating_sub(received_pct) as f64)
}

fn rtt_stats(rtts: &[Duration]) -> Option<RttStats> {
    let mut sorted = rtts.to_vec();
    sorted.sort_unstable();
    let (&min, &max) = (sorted.first()?, sorted.last()?);
    Some(RttStats {
        min,
        avg: median(&sorted),
        max,
    })
}

// `sorted` must be non-empty and ascending.
fn median(sorted: &[Duration]) -> Duration {
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        let (lo, hi) = (sorted[mid - 1], sorted[mid]);
        lo + (hi - lo) / 2
    }
}
