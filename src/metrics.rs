use std::net::SocketAddr;

use prometheus::{
    Encoder, GaugeVec, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};
use warp::Filter;
use warp::http::StatusCode;
use warp::Reply;
use tracing::{error, info};

use crate::event::{EventSink, ProbeEvent};
use crate::prober::ProbeSample;

const RTT_BUCKETS_MS: [f64; 14] = [
    0.05, 0.1, 0.2, 0.5, 1.0, 2.0, 5.0, 10.0, 20.0, 50.0, 100.0, 250.0, 500.0, 1000.0,
];

/// Live view of the current run for a Prometheus scrape.
#[derive(Clone)]
pub struct ProbeMetrics {
    registry: Registry,
    rtt_current: GaugeVec,
    attempts: IntCounterVec,
    // only registered when latency history is enabled
    rtt_history: Option<HistogramVec>,
}

impl ProbeMetrics {
    pub fn new(enable_latency_history: bool) -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let rtt_current = GaugeVec::new(
            Opts::new(
                "tcping_rtt_milliseconds_current",
                "Round-trip time of the latest successful probe in milliseconds",
            ),
            &["target"],
        )?;
        registry.register(Box::new(rtt_current.clone()))?;

        let attempts = IntCounterVec::new(
            Opts::new("tcping_attempts_total", "Total number of probe attempts"),
            &["target", "result"],
        )?;
        registry.register(Box::new(attempts.clone()))?;

        let rtt_history = if enable_latency_history {
            let hist = HistogramVec::new(
                HistogramOpts::new("tcping_rtt_milliseconds", "Probe round-trip time in milliseconds")
                    .buckets(RTT_BUCKETS_MS.to_vec()),
                &["target"],
            )?;
            registry.register(Box::new(hist.clone()))?;
            Some(hist)
        } else {
            None
        };

        Ok(Self {
            registry,
            rtt_current,
            attempts,
            rtt_history,
        })
    }

    pub fn observe(&self, event: &ProbeEvent<'_>) {
        let target = event.target.to_string();
        match event.sample {
            ProbeSample::Connected { rtt } => {
                let rtt_ms = rtt.as_secs_f64() * 1000.0;
                self.attempts
                    .with_label_values(&[target.as_str(), "success"])
                    .inc();
                self.rtt_current
                    .with_label_values(&[target.as_str()])
                    .set(rtt_ms);
                if let Some(hist) = &self.rtt_history {
                    hist.with_label_values(&[target.as_str()]).observe(rtt_ms);
                }
            }
            ProbeSample::Failed { .. } => {
                self.attempts
                    .with_label_values(&[target.as_str(), "failure"])
                    .inc();
            }
        }
    }

    /// Text exposition of everything in the registry.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buf = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buf)?;
        String::from_utf8(buf).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }

    /// Serves `/metrics` on `addr` until the process exits.
    pub async fn serve(self, addr: SocketAddr) {
        info!("serving metrics on http://{}/metrics", addr);
        let metrics_route = warp::path!("metrics").map(move || match self.render() {
            Ok(body) => {
                warp::reply::with_header(body, "Content-Type", TextEncoder::new().format_type())
                    .into_response()
            }
            Err(e) => {
                error!("failed to encode metrics: {:?}", e);
                warp::reply::with_status(String::new(), StatusCode::INTERNAL_SERVER_ERROR)
                    .into_response()
            }
        });

        warp::serve(metrics_route).run(addr).await;
    }
}

impl EventSink for ProbeMetrics {
    fn on_attempt(&mut self, event: &ProbeEvent<'_>) {
        self.observe(event);
    }
}
