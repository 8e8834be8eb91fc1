//! Cooperative cancellation shared between the probe loop and whoever
//! wants to stop it (normally the Ctrl-C handler).

use std::sync::Arc;

use tokio::sync::watch;

/// Setting side. Cloneable, and cancelling more than once is harmless.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    tx: Arc<watch::Sender<bool>>,
}

/// Observing side, polled by the scheduler between attempts.
#[derive(Debug, Clone)]
pub struct CancelSignal {
    rx: watch::Receiver<bool>,
}

pub fn cancellation() -> (CancelHandle, CancelSignal) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx: Arc::new(tx) }, CancelSignal { rx })
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

impl CancelSignal {
    /// A signal that never fires.
    pub fn never() -> Self {
        let (_, signal) = cancellation();
        signal
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once cancellation has been requested. If every handle is
    /// dropped without cancelling, this never resolves.
    pub async fn cancelled(&mut self) {
        let fired = self.rx.wait_for(|cancelled| *cancelled).await.is_ok();
        if !fired {
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{Duration, timeout};

    #[test]
    fn cancel_is_idempotent() {
        let (handle, signal) = cancellation();
        assert!(!signal.is_cancelled());
        handle.cancel();
        handle.cancel();
        assert!(signal.is_cancelled());
        assert!(signal.clone().is_cancelled());
    }

    #[tokio::test]
    async fn cancelled_wakes_waiter() {
        let (handle, mut signal) = cancellation();
        let waiter = tokio::spawn(async move {
            signal.cancelled().await;
            signal.is_cancelled()
        });
        handle.clone().cancel();
        assert!(waiter.await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn never_does_not_resolve() {
        let mut signal = CancelSignal::never();
        assert!(!signal.is_cancelled());
        let waited = timeout(Duration::from_secs(60), signal.cancelled()).await;
        assert!(waited.is_err());
    }
}
