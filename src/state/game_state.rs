//! Game status, run state and snapshot structures

use serde::{Deserialize, Serialize};

/// Where a play-through currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Idle,
    Running,
    Finished,
}

/// Minimal data needed to resume a suspended session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub score: u32,
    pub time_left_seconds: u32,
}

impl Snapshot {
    pub fn new(score: u32, time_left_seconds: u32) -> Self {
        Self {
            score,
            time_left_seconds,
        }
    }
}

/// Observable state of the session, published after every change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStatus {
    pub score: u32,
    pub time_left_seconds: u32,
    pub state: RunState,
}

impl GameStatus {
    /// Status of a fresh session waiting for its first tap
    pub fn idle(total_seconds: u32) -> Self {
        Self {
            score: 0,
            time_left_seconds: total_seconds,
            state: RunState::Idle,
        }
    }

    /// Check if the countdown is in progress
    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    /// The score and remaining time as a resumable snapshot
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.score, self.time_left_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_uses_named_fields_on_the_wire() {
        let json = serde_json::to_value(Snapshot::new(7, 45)).unwrap();
        assert_eq!(json, serde_json::json!({ "score": 7, "time_left_seconds": 45 }));

        let status = GameStatus {
            score: 7,
            time_left_seconds: 45,
            state: RunState::Running,
        };
        let json = serde_json::to_value(status).unwrap();
        assert_eq!(json["state"], "running");
        assert_eq!(status.snapshot(), Snapshot::new(7, 45));
    }

    #[test]
    fn idle_status_starts_with_full_clock() {
        let status = GameStatus::idle(60);
        assert_eq!(status.score, 0);
        assert_eq!(status.time_left_seconds, 60);
        assert!(!status.is_running());
    }
}
