//! Host-side application state shared by the HTTP layer and background tasks

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, mpsc, watch};
use tracing::{info, warn};

use crate::config::GameConfig;
use super::{CountdownSignal, GameEvent, GameSession, GameStatus, Snapshot};

/// Application state that owns the game session and the host's snapshot slot
#[derive(Debug)]
pub struct AppState {
    /// The session; taps and countdown signals both go through this lock
    pub session: Arc<Mutex<GameSession>>,
    pub game_config: GameConfig,
    /// Snapshot kept across a suspend/resume cycle
    pub saved_snapshot: Arc<Mutex<Option<Snapshot>>>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Session notifications, subscribable without taking the session lock
    pub event_tx: broadcast::Sender<GameEvent>,
    /// Latest published session status
    pub status_rx: watch::Receiver<GameStatus>,
}

impl AppState {
    /// Create the state with an idle session whose countdown signals go to `signal_tx`
    pub fn new(
        port: u16,
        host: String,
        game_config: GameConfig,
        signal_tx: mpsc::UnboundedSender<CountdownSignal>,
    ) -> Self {
        let session = GameSession::new(game_config, signal_tx);
        let event_tx = session.event_sender();
        let status_rx = session.watch_status();

        Self {
            session: Arc::new(Mutex::new(session)),
            game_config,
            saved_snapshot: Arc::new(Mutex::new(None)),
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            event_tx,
            status_rx,
        }
    }

    /// Run an operation on the locked session and record it as the last action
    pub fn with_session<T, F>(&self, action: &str, op: F) -> Result<T, String>
    where
        F: FnOnce(&mut GameSession) -> T,
    {
        let mut session = self.session.lock()
            .map_err(|e| format!("Failed to lock game session: {}", e))?;

        let result = op(&mut *session);
        drop(session); // Release the lock early

        self.record_action(action);
        Ok(result)
    }

    /// Forward a tap from the view
    pub fn tap(&self) -> Result<GameStatus, String> {
        self.with_session("tap", |session| {
            session.on_tap_button_pressed();
            session.status()
        })
    }

    /// Suspend the session and keep its snapshot for the next resume.
    ///
    /// The snapshot slot is only touched while the session lock is held, so a
    /// racing resume sees either the old slot and session or both updated.
    pub fn suspend(&self) -> Result<Option<Snapshot>, String> {
        let snapshot = self.with_session("suspend", |session| -> Result<Option<Snapshot>, String> {
            let mut saved = self.saved_snapshot.lock()
                .map_err(|e| format!("Failed to lock saved snapshot: {}", e))?;
            let snapshot = session.on_suspend_requested();
            *saved = snapshot;
            Ok(snapshot)
        })??;

        match snapshot {
            Some(s) => info!("Saving score: {} & time left: {}", s.score, s.time_left_seconds),
            None => info!("No round in progress, nothing to save"),
        }
        Ok(snapshot)
    }

    /// Resume from an explicit snapshot, the kept one, or start over if neither exists
    pub fn resume(&self, snapshot: Option<Snapshot>) -> Result<GameStatus, String> {
        self.with_session("resume", |session| -> Result<GameStatus, String> {
            let kept = self.saved_snapshot.lock()
                .map_err(|e| format!("Failed to lock saved snapshot: {}", e))?
                .take();
            let snapshot = snapshot.or(kept);

            if snapshot.is_none() {
                info!("No snapshot to resume from, resetting session");
            }

            session.on_resume_with_snapshot(snapshot);
            Ok(session.status())
        })?
    }

    /// Deliver a countdown callback to the session
    pub fn dispatch_signal(&self, signal: CountdownSignal) -> Result<(), String> {
        let mut session = self.session.lock()
            .map_err(|e| format!("Failed to lock game session: {}", e))?;
        session.handle_signal(signal);
        Ok(())
    }

    /// Latest published session status
    pub fn get_status(&self) -> GameStatus {
        *self.status_rx.borrow()
    }

    /// Snapshot currently kept for resume, if any
    pub fn get_saved_snapshot(&self) -> Result<Option<Snapshot>, String> {
        self.saved_snapshot.lock()
            .map(|saved| *saved)
            .map_err(|e| format!("Failed to lock saved snapshot: {}", e))
    }

    /// Subscribe to session notifications
    pub fn subscribe_events(&self) -> broadcast::Receiver<GameEvent> {
        self.event_tx.subscribe()
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }

    fn record_action(&self, action: &str) {
        match self.last_action.lock() {
            Ok(mut last_action) => *last_action = Some(action.to_string()),
            Err(e) => warn!("Failed to record last action: {}", e),
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }
}
