//! Timefighter - a timed tapping game behind a local HTTP control surface
//!
//! The core is the game session state machine and its countdown; the HTTP
//! layer is a thin presentation host that forwards taps and lifecycle hooks.

pub mod config;
pub mod state;
pub mod api;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::{Config, GameConfig};
pub use state::{AppState, GameEvent, GameSession, GameStatus, RunState, Snapshot};
pub use tasks::Countdown;
pub use api::create_router;
pub use utils::signals::shutdown_signal;
