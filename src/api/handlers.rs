//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
};
use futures::stream::{self, Stream};
use tokio::sync::broadcast::error::RecvError;
use tracing::{error, info, warn};

use crate::state::{AppState, Snapshot};
use super::responses::{
    AboutResponse, ApiResponse, HealthResponse, StatusResponse, SuspendResponse, TimingInfo,
};

/// Handle POST /tap - Count a tap, starting the round on the first one
pub async fn tap_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    match state.tap() {
        Ok(game) => Ok(Json(ApiResponse::from_status(game))),
        Err(e) => {
            error!("Failed to record tap: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /suspend - Stop the clock and keep a snapshot for resume
pub async fn suspend_handler(State(state): State<Arc<AppState>>) -> Result<Json<SuspendResponse>, StatusCode> {
    match state.suspend() {
        Ok(snapshot) => {
            info!("Suspend endpoint called");
            Ok(Json(SuspendResponse::new(snapshot)))
        }
        Err(e) => {
            error!("Failed to suspend session: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /resume - Continue from the given or kept snapshot, or start over
pub async fn resume_handler(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Snapshot>, JsonRejection>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let snapshot = match body {
        Ok(Json(snapshot)) => Some(snapshot),
        Err(JsonRejection::MissingJsonContentType(_)) => None,
        Err(rejection) => {
            warn!("Rejected resume snapshot: {}", rejection);
            return Err(StatusCode::BAD_REQUEST);
        }
    };

    match state.resume(snapshot) {
        Ok(game) => {
            info!("Resume endpoint called - score={}, time_left={}s", game.score, game.time_left_seconds);
            Ok(Json(ApiResponse::from_status(game)))
        }
        Err(e) => {
            error!("Failed to resume session: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /status - Return the current session and host status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let saved_snapshot = match state.get_saved_snapshot() {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to get saved snapshot: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        game: state.get_status(),
        saved_snapshot,
        timing: TimingInfo {
            total_duration_ms: duration_ms(state.game_config.total_duration),
            tick_interval_ms: duration_ms(state.game_config.tick_interval),
        },
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /events - Stream session notifications as server-sent events
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, serde_json::Error>>> {
    let events_rx = state.subscribe_events();

    let events = stream::unfold(events_rx, |mut events_rx| async move {
        loop {
            match events_rx.recv().await {
                Ok(event) => {
                    let item = serde_json::to_string(&event)
                        .map(|data| Event::default().event(event.name()).data(data));
                    return Some((item, events_rx));
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Event stream lagging, skipped {} notifications", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}

/// Handle GET /about - About dialog text
pub async fn about_handler() -> Json<AboutResponse> {
    Json(AboutResponse::new())
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

fn duration_ms(duration: std::time::Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
