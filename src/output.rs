//! Rendering of probe results, either as classic ping-style text or as
//! one JSON object per line.

use std::io::{self, Write};
use std::net::IpAddr;
use std::time::Duration;

use serde::Serialize;
use tracing::warn;

use crate::config::OutputFormat;
use crate::event::{EventSink, ProbeEvent};
use crate::prober::ProbeSample;
use crate::summary::Summary;
use crate::target::Target;

pub struct Renderer<W> {
    out: W,
    format: OutputFormat,
    quiet: bool,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Record<'a> {
    Start {
        program: &'a str,
        host: &'a str,
        port: u16,
        address: IpAddr,
    },
    Attempt {
        seq: u64,
        host: &'a str,
        port: u16,
        address: IpAddr,
        success: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        rtt_ms: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    Check {
        host: &'a str,
        port: u16,
        address: IpAddr,
        open: bool,
    },
    Summary {
        host: &'a str,
        port: u16,
        transmitted: u64,
        received: u64,
        loss_percent: Option<f64>,
        rtt_min_ms: Option<f64>,
        rtt_avg_ms: Option<f64>,
        rtt_max_ms: Option<f64>,
    },
}

fn millis(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

impl<W: Write> Renderer<W> {
    pub fn new(out: W, format: OutputFormat, quiet: bool) -> Self {
        Self { out, format, quiet }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn header(&mut self, program: &str, target: &Target) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => {
                writeln!(self.out, "{} {} ({})", program, target.host(), target.addr())
            }
            OutputFormat::Json => self.json(&Record::Start {
                program,
                host: target.host(),
                port: target.port(),
                address: target.addr(),
            }),
        }
    }

    pub fn attempt(&mut self, event: &ProbeEvent<'_>) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let target = event.target;
        match self.format {
            OutputFormat::Text => match event.sample {
                ProbeSample::Connected { rtt } => {
                    writeln!(self.out, "Connected to {}, RTT={:.3} ms", target, millis(rtt))
                }
                ProbeSample::Failed { reason } => writeln!(
                    self.out,
                    "Failed to connect to {} on port {}: {}",
                    target.host(),
                    target.port(),
                    reason
                ),
            },
            OutputFormat::Json => self.json(&Record::Attempt {
                seq: event.seq,
                host: target.host(),
                port: target.port(),
                address: target.addr(),
                success: event.sample.succeeded(),
                rtt_ms: event.sample.rtt().map(millis),
                error: match event.sample {
                    ProbeSample::Failed { reason } => Some(reason.to_string()),
                    ProbeSample::Connected { .. } => None,
                },
            }),
        }
    }

    /// Single-shot result. Quiet mode leaves the exit code as the only signal.
    pub fn check(&mut self, target: &Target, open: bool) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        match self.format {
            OutputFormat::Text => writeln!(
                self.out,
                "{} port {} {}.",
                target.host(),
                target.port(),
                if open { "open" } else { "closed" }
            ),
            OutputFormat::Json => self.json(&Record::Check {
                host: target.host(),
                port: target.port(),
                address: target.addr(),
                open,
            }),
        }
    }

    pub fn summary(&mut self, target: &Target, summary: &Summary) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => {
                let loss = match summary.loss_percent {
                    Some(loss) => format!("{:.1}%", loss),
                    None => "n/a".to_string(),
                };
                let rtt = match &summary.rtt {
                    Some(rtt) => format!(
                        "{:.3}/{:.3}/{:.3}",
                        millis(rtt.min),
                        millis(rtt.avg),
                        millis(rtt.max)
                    ),
                    None => "-/-/-".to_string(),
                };
                writeln!(self.out, "\n--- {} tcping statistic ---", target.host())?;
                writeln!(
                    self.out,
                    "{} packets transmitted, {} packets received, {} packet loss",
                    summary.transmitted, summary.received, loss
                )?;
                writeln!(self.out, "round-trip min/avg/max = {} ms", rtt)
            }
            OutputFormat::Json => self.json(&Record::Summary {
                host: target.host(),
                port: target.port(),
                transmitted: summary.transmitted,
                received: summary.received,
                loss_percent: summary.loss_percent,
                rtt_min_ms: summary.rtt.map(|r| millis(r.min)),
                rtt_avg_ms: summary.rtt.map(|r| millis(r.avg)),
                rtt_max_ms: summary.rtt.map(|r| millis(r.max)),
            }),
        }
    }

    fn json(&mut self, record: &Record<'_>) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, record)?;
        writeln!(self.out)
    }
}

impl<W: Write> EventSink for Renderer<W> {
    fn on_attempt(&mut self, event: &ProbeEvent<'_>) {
        if let Err(e) = self.attempt(event).and_then(|_| self.out.flush()) {
            warn!("failed to write probe result: {}", e);
        }
    }
}
