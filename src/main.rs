//! Timefighter - a timed tapping game behind a local HTTP control surface
//!
//! This is the main entry point for the timefighter host.

use std::sync::Arc;
use tokio::{net::TcpListener, sync::mpsc};
use tracing::info;

use timefighter::{
    config::Config,
    state::AppState,
    api::create_router,
    tasks::countdown_signal_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("timefighter={},tower_http=info", config.log_level()))
        .init();

    let game_config = config.game_config();

    info!("Starting timefighter v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, round={:?}, tick={:?}",
          config.host, config.port, game_config.total_duration, game_config.tick_interval);

    // Create application state with an idle session
    let (signal_tx, signal_rx) = mpsc::unbounded_channel();
    let state = Arc::new(AppState::new(config.port, config.host.clone(), game_config, signal_tx));

    // Deliver countdown callbacks to the session
    let signal_state = Arc::clone(&state);
    tokio::spawn(async move {
        countdown_signal_task(signal_state, signal_rx).await;
    });

    let app = create_router(Arc::clone(&state));

    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /tap      - Tap the button");
    info!("  POST /suspend  - Stop the clock and keep a snapshot");
    info!("  POST /resume   - Continue from a snapshot or start over");
    info!("  GET  /status   - Current score, time left and round state");
    info!("  GET  /events   - Server-sent score, time and game-over notifications");
    info!("  GET  /about    - About text");
    info!("  GET  /health   - Health check");

    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        result = shutdown_signal() => {
            result?;
            info!("Shutdown signal received");
        }
    }

    // Stop the clock so no tick lands while the process exits
    if let Err(e) = state.suspend() {
        tracing::warn!("Failed to suspend session on shutdown: {}", e);
    }

    info!("Server shutdown complete");
    Ok(())
}
