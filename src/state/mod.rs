//! State management module
//! 
//! This module contains the game session state machine, its notifications,
//! and the host-side state shared with the HTTP layer.

pub mod app_state;
pub mod events;
pub mod game_session;
pub mod game_state;

// Re-export main types
pub use app_state::AppState;
pub use events::GameEvent;
pub use game_session::{CountdownSignal, GameSession};
pub use game_state::{GameStatus, RunState, Snapshot};
