//! Status command handler.

use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use tokio_util::sync::CancellationToken;
use vectordeck_console::{probe_once, spawn_status_poller};
use vectordeck_core::{config::AppConfig, AppResult};
use vectordeck_gateway::Gateway;

/// Backend connectivity
#[derive(Args, Debug)]
pub struct StatusCommand {
    /// Keep polling and print every connectivity change
    #[arg(long)]
    pub watch: bool,
}

impl StatusCommand {
    pub async fn execute(&self, config: &AppConfig, gateway: Arc<dyn Gateway>) -> AppResult<()> {
        if !self.watch {
            let connected = probe_once(&*gateway).await;
            println!("{}", describe(connected));
            return Ok(());
        }

        let cancel = CancellationToken::new();
        let mut status = spawn_status_poller(
            gateway,
            Duration::from_secs(config.poll_interval_secs),
            cancel.clone(),
        );

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    cancel.cancel();
                    break;
                }
                connected = status.changed() => {
                    println!("{}", describe(connected));
                }
            }
        }
        Ok(())
    }
}

fn describe(connected: bool) -> &'static str {
    if connected {
        "connected"
    } else {
        "unreachable (placeholder mode)"
    }
}
