use std::time::Duration;

use tcping::{
    CancelSignal, ConnectFailure, ProbeConfig, ProbeEvent, ProbeSample, Scheduler, Target,
    TcpConnectProber, cancellation,
};
use tokio::net::TcpListener;

async fn listener() -> (TcpListener, Target) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let target = Target::resolve("127.0.0.1", port).await.unwrap();
    (listener, target)
}

#[tokio::test]
async fn probes_open_loopback_port() {
    let (listener, target) = listener().await;
    tokio::spawn(async move {
        while let Ok((conn, _)) = listener.accept().await {
            drop(conn);
        }
    });

    let config = ProbeConfig::new(Duration::from_secs(2), 3).with_interval(Duration::from_millis(20));
    let scheduler = Scheduler::new(TcpConnectProber, config).unwrap();
    let mut events = Vec::new();

    let summary = scheduler
        .run(&target, CancelSignal::never(), &mut |e: &ProbeEvent<'_>| {
            events.push((e.seq, e.target.port(), e.sample))
        })
        .await;

    assert_eq!(summary.transmitted, 3);
    assert_eq!(summary.received, 3);
    assert_eq!(summary.loss_percent, Some(0.0));
    let rtt = summary.rtt.expect("rtt stats for successful run");
    assert!(rtt.min <= rtt.avg && rtt.avg <= rtt.max);
    assert!(rtt.max < Duration::from_secs(2));

    assert_eq!(events.len(), 3);
    for (i, (seq, port, sample)) in events.iter().enumerate() {
        assert_eq!(*seq, i as u64 + 1);
        assert_eq!(*port, target.port());
        assert!(sample.succeeded());
    }
}

#[tokio::test]
async fn closed_port_reports_full_loss() {
    let (listener, target) = listener().await;
    drop(listener);

    let config = ProbeConfig::new(Duration::from_secs(2), 2).with_interval(Duration::from_millis(10));
    let scheduler = Scheduler::new(TcpConnectProber, config).unwrap();
    let mut samples = Vec::new();

    let summary = scheduler
        .run(&target, CancelSignal::never(), &mut |e: &ProbeEvent<'_>| {
            samples.push(e.sample)
        })
        .await;

    assert_eq!(summary.transmitted, 2);
    assert_eq!(summary.received, 0);
    assert_eq!(summary.loss_percent, Some(100.0));
    assert_eq!(summary.rtt, None);
    assert!(samples.iter().all(|s| *s
        == ProbeSample::Failed {
            reason: ConnectFailure::Refused
        }));
}

#[tokio::test]
async fn unbounded_run_stops_when_cancelled() {
    let (listener, target) = listener().await;
    tokio::spawn(async move {
        while let Ok((conn, _)) = listener.accept().await {
            drop(conn);
        }
    });

    let (handle, signal) = cancellation();
    let config = ProbeConfig::new(Duration::from_secs(2), 0).with_interval(Duration::from_millis(10));
    let scheduler = Scheduler::new(TcpConnectProber, config).unwrap();
    let mut seen = 0u64;

    let summary = scheduler
        .run(&target, signal, &mut |_: &ProbeEvent<'_>| {
            seen += 1;
            if seen == 4 {
                handle.cancel();
            }
        })
        .await;

    assert_eq!(summary.transmitted, 4);
    assert_eq!(seen, 4);
}
