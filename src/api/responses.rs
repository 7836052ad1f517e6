//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{GameEvent, GameStatus, Snapshot};

/// API response structure for game action endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub game: GameStatus,
}

impl ApiResponse {
    fn new(status: String, message: String, game: GameStatus) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            game,
        }
    }

    /// Create a response describing the current round
    pub fn from_status(game: GameStatus) -> Self {
        let status = if game.is_running() { "running" } else { "idle" };
        let message = GameEvent::ScoreChanged { score: game.score }.to_string();
        Self::new(status.to_string(), message, game)
    }
}

/// Response to a suspend request, carrying the snapshot the host keeps
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuspendResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub snapshot: Option<Snapshot>,
}

impl SuspendResponse {
    pub fn new(snapshot: Option<Snapshot>) -> Self {
        let (status, message) = match snapshot {
            Some(s) => (
                "suspended",
                format!("Saved score {} with {}s left", s.score, s.time_left_seconds),
            ),
            None => ("idle", "No round in progress".to_string()),
        };
        Self {
            status: status.to_string(),
            message,
            timestamp: Utc::now(),
            snapshot,
        }
    }
}

/// Round timing as configured at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingInfo {
    pub total_duration_ms: u64,
    pub tick_interval_ms: u64,
}

/// Status response with session and host information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub game: GameStatus,
    pub saved_snapshot: Option<Snapshot>,
    pub timing: TimingInfo,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Text for the about dialog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AboutResponse {
    pub title: String,
    pub message: String,
}

impl AboutResponse {
    pub(crate) fn new() -> Self {
        Self {
            title: format!("About Timefighter {}", env!("CARGO_PKG_VERSION")),
            message: "Tap as many times as you can before the clock runs out. \
                      The round starts with your first tap."
                .to_string(),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
