//! Backend status polling.
//!
//! Probes the gateway's health endpoint on a fixed interval while a view
//! depending on backend state is active, and publishes connectivity over a
//! watch channel. Connectivity decides only whether placeholder data is
//! shown; it never fails an operation by itself.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use vectordeck_gateway::Gateway;

/// Default probe interval.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Read side of the backend status poller.
#[derive(Debug, Clone)]
pub struct BackendStatus {
    rx: watch::Receiver<bool>,
}

impl BackendStatus {
    /// Latest known connectivity.
    pub fn is_connected(&self) -> bool {
        *self.rx.borrow()
    }

    /// Wait until the connectivity value changes.
    pub async fn changed(&mut self) -> bool {
        if self.rx.changed().await.is_err() {
            // Poller gone; the last value stands.
            return *self.rx.borrow();
        }
        *self.rx.borrow()
    }
}

/// Probe the backend once.
pub async fn probe_once(gateway: &dyn Gateway) -> bool {
    gateway.health_check().await.is_ok()
}

/// Spawn a poller that probes immediately and then on every interval tick
/// until the token is cancelled or every status handle is dropped.
pub fn spawn_status_poller(
    gateway: Arc<dyn Gateway>,
    interval: Duration,
    cancel: CancellationToken,
) -> BackendStatus {
    let (tx, rx) = watch::channel(false);

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::debug!("Status poller stopped");
                    break;
                }
                _ = ticker.tick() => {
                    let connected = probe_once(&*gateway).await;
                    if tx.send(connected).is_err() {
                        break;
                    }
                }
            }
        }
    });

    BackendStatus { rx }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vectordeck_gateway::providers::MockGateway;

    #[tokio::test]
    async fn test_probe_once_reflects_reachability() {
        let gateway = MockGateway::new();
        assert!(probe_once(&gateway).await);

        gateway.set_unreachable(true).await;
        assert!(!probe_once(&gateway).await);
    }

    #[tokio::test]
    async fn test_poller_flips_on_outage() {
        let gateway = Arc::new(MockGateway::new());
        let cancel = CancellationToken::new();
        let mut status = spawn_status_poller(
            gateway.clone(),
            Duration::from_millis(10),
            cancel.clone(),
        );

        assert!(status.changed().await);

        gateway.set_unreachable(true).await;
        let mut connected = status.is_connected();
        for _ in 0..10 {
            if !connected {
                break;
            }
            connected = status.changed().await;
        }
        assert!(!connected);

        cancel.cancel();
    }
}
