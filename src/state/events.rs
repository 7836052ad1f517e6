//! Notifications emitted by the game session for the presentation layer

use std::fmt;

use serde::{Deserialize, Serialize};

/// A change the view should render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    ScoreChanged { score: u32 },
    TimeChanged { seconds_left: u32 },
    GameOver { final_score: u32 },
}

impl GameEvent {
    /// Short event name, used as the SSE event field
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::ScoreChanged { .. } => "score_changed",
            GameEvent::TimeChanged { .. } => "time_changed",
            GameEvent::GameOver { .. } => "game_over",
        }
    }
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameEvent::ScoreChanged { score } => write!(f, "Your Score: {}", score),
            GameEvent::TimeChanged { seconds_left } => write!(f, "Time Left: {}", seconds_left),
            GameEvent::GameOver { final_score } => {
                write!(f, "Time's up! Your score was: {}", final_score)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_tagged_by_type() {
        let json = serde_json::to_value(GameEvent::GameOver { final_score: 3 }).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "game_over", "final_score": 3 }));
        assert_eq!(GameEvent::TimeChanged { seconds_left: 2 }.name(), "time_changed");
    }

    #[test]
    fn display_matches_view_text() {
        assert_eq!(GameEvent::ScoreChanged { score: 4 }.to_string(), "Your Score: 4");
        assert_eq!(GameEvent::TimeChanged { seconds_left: 59 }.to_string(), "Time Left: 59");
        assert_eq!(
            GameEvent::GameOver { final_score: 12 }.to_string(),
            "Time's up! Your score was: 12"
        );
    }
}
