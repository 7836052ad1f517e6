//! Background tasks module
//! 
//! This module contains the countdown primitive and the task that feeds its
//! callbacks back into the game session.

pub mod countdown;
pub mod countdown_signals;

// Re-export main types and functions
pub use countdown::{Countdown, CountdownPhase};
pub use countdown_signals::countdown_signal_task;
