//! Countdown signal delivery task

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::state::{AppState, CountdownSignal};

/// Background task that applies countdown callbacks to the session, one at a time
pub async fn countdown_signal_task(state: Arc<AppState>, mut signal_rx: mpsc::UnboundedReceiver<CountdownSignal>) {
    info!("Starting countdown signal task");

    while let Some(signal) = signal_rx.recv().await {
        debug!("Countdown signal received: {:?}", signal);

        if let Err(e) = state.dispatch_signal(signal) {
            error!("Failed to apply countdown signal: {}", e);
        }
    }

    info!("Countdown signal channel closed, stopping task");
}
