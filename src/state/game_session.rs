//! Game session state machine

use std::time::Duration;
use tokio::sync::{broadcast, mpsc, watch};
use tracing::{debug, info, warn};

use crate::{config::GameConfig, tasks::Countdown};
use super::{GameEvent, GameStatus, RunState, Snapshot};

/// Countdown callback, tagged with the run that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownSignal {
    Tick { run: u64, remaining: Duration },
    Finish { run: u64 },
}

/// Score, clock and run state of one player's play-through.
///
/// The session owns at most one running [`Countdown`]. Countdown callbacks
/// are delivered back through [`GameSession::handle_signal`]; signals from a
/// run that has since been cancelled or replaced are ignored.
#[derive(Debug)]
pub struct GameSession {
    config: GameConfig,
    score: u32,
    time_left_seconds: u32,
    state: RunState,
    /// Round stopped by `suspend`, waiting for `resume` or `reset`
    suspended: bool,
    countdown: Countdown,
    /// Id of the countdown run whose signals are accepted
    run: u64,
    signal_tx: mpsc::UnboundedSender<CountdownSignal>,
    event_tx: broadcast::Sender<GameEvent>,
    status_tx: watch::Sender<GameStatus>,
}

impl GameSession {
    /// Create an idle session; countdown callbacks are sent to `signal_tx`
    pub fn new(config: GameConfig, signal_tx: mpsc::UnboundedSender<CountdownSignal>) -> Self {
        let (event_tx, _) = broadcast::channel(100);
        let (status_tx, _) = watch::channel(GameStatus::idle(config.total_seconds()));

        let mut session = Self {
            config,
            score: 0,
            time_left_seconds: config.total_seconds(),
            state: RunState::Idle,
            suspended: false,
            countdown: Countdown::new(),
            run: 0,
            signal_tx,
            event_tx,
            status_tx,
        };
        session.reset();
        session
    }

    /// Back to a fresh idle round without starting the clock
    pub fn reset(&mut self) {
        self.discard_countdown();

        self.score = 0;
        self.time_left_seconds = self.config.total_seconds();
        self.state = RunState::Idle;
        self.suspended = false;
        debug!("Session reset, {}s on the clock", self.time_left_seconds);

        self.emit(GameEvent::ScoreChanged { score: self.score });
        self.emit(GameEvent::TimeChanged { seconds_left: self.time_left_seconds });
        self.publish_status();
    }

    /// Count a tap; the first tap of a round starts the countdown
    pub fn record_tap(&mut self) {
        if self.state == RunState::Finished {
            debug!("Tap dropped, round already finished");
            return;
        }
        if self.suspended {
            debug!("Tap dropped, round is suspended");
            return;
        }

        self.score = self.score.saturating_add(1);
        self.emit(GameEvent::ScoreChanged { score: self.score });

        if self.state == RunState::Idle {
            info!("First tap, starting a {}s round", self.time_left_seconds);
            self.state = RunState::Running;
            self.start_countdown(self.config.total_duration);
        }

        self.publish_status();
    }

    /// Stop the clock and capture what is needed to continue later
    pub fn suspend(&mut self) -> Snapshot {
        self.discard_countdown();
        self.suspended = self.state == RunState::Running;

        let snapshot = self.status().snapshot();
        info!(
            "Suspending session: score={}, time_left={}s",
            snapshot.score, snapshot.time_left_seconds
        );
        snapshot
    }

    /// Continue a suspended round from its snapshot
    pub fn resume(&mut self, snapshot: Snapshot) {
        self.discard_countdown();

        let total_seconds = self.config.total_seconds();
        let time_left = snapshot.time_left_seconds.min(total_seconds);
        if time_left != snapshot.time_left_seconds {
            warn!(
                "Snapshot time left {}s exceeds round length, clamping to {}s",
                snapshot.time_left_seconds, total_seconds
            );
        }

        self.score = snapshot.score;
        self.time_left_seconds = time_left;
        self.state = RunState::Running;
        self.suspended = false;
        info!("Resuming session: score={}, time_left={}s", self.score, time_left);

        self.emit(GameEvent::ScoreChanged { score: self.score });
        self.emit(GameEvent::TimeChanged { seconds_left: time_left });
        self.start_countdown(Duration::from_secs(u64::from(time_left)));
        self.publish_status();
    }

    /// Apply a countdown callback if it belongs to the active run
    pub fn handle_signal(&mut self, signal: CountdownSignal) {
        let run = match signal {
            CountdownSignal::Tick { run, .. } | CountdownSignal::Finish { run } => run,
        };
        if run != self.run || self.state != RunState::Running {
            debug!("Ignoring stale countdown signal {:?} (active run {})", signal, self.run);
            return;
        }

        match signal {
            CountdownSignal::Tick { remaining, .. } => self.on_countdown_tick(remaining),
            CountdownSignal::Finish { .. } => self.on_countdown_finish(),
        }
    }

    fn on_countdown_tick(&mut self, remaining: Duration) {
        let seconds = u32::try_from(remaining.as_secs()).unwrap_or(u32::MAX);
        self.time_left_seconds = seconds.min(self.time_left_seconds);

        self.emit(GameEvent::TimeChanged { seconds_left: self.time_left_seconds });
        self.publish_status();
    }

    fn on_countdown_finish(&mut self) {
        self.state = RunState::Finished;
        info!("Game over, final score: {}", self.score);

        self.emit(GameEvent::GameOver { final_score: self.score });
        self.publish_status();
        self.reset();
    }

    /// The player pressed the tap button
    pub fn on_tap_button_pressed(&mut self) {
        self.record_tap();
    }

    /// The host is about to tear down the view.
    ///
    /// Returns a snapshot only for a round in progress; an idle round has
    /// nothing to resume.
    pub fn on_suspend_requested(&mut self) -> Option<Snapshot> {
        let was_running = self.state == RunState::Running;
        let snapshot = self.suspend();
        was_running.then_some(snapshot)
    }

    /// The host recreated the view, with whatever snapshot it kept
    pub fn on_resume_with_snapshot(&mut self, snapshot: Option<Snapshot>) {
        match snapshot {
            Some(snapshot) => self.resume(snapshot),
            None => self.reset(),
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn time_left_seconds(&self) -> u32 {
        self.time_left_seconds
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Current status as seen by the view
    pub fn status(&self) -> GameStatus {
        GameStatus {
            score: self.score,
            time_left_seconds: self.time_left_seconds,
            state: self.state,
        }
    }

    /// Check if a running round is stopped waiting for resume
    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    /// Check if a countdown run is currently active
    pub fn has_active_countdown(&self) -> bool {
        self.countdown.is_running()
    }

    /// Sender used to subscribe to notifications without holding the session
    pub fn event_sender(&self) -> broadcast::Sender<GameEvent> {
        self.event_tx.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<GameEvent> {
        self.event_tx.subscribe()
    }

    pub fn watch_status(&self) -> watch::Receiver<GameStatus> {
        self.status_tx.subscribe()
    }

    fn start_countdown(&mut self, total: Duration) {
        self.run = self.run.wrapping_add(1);
        let run = self.run;
        let tick_tx = self.signal_tx.clone();
        let finish_tx = self.signal_tx.clone();

        self.countdown.start(
            total,
            self.config.tick_interval,
            move |remaining| {
                if tick_tx.send(CountdownSignal::Tick { run, remaining }).is_err() {
                    warn!("Countdown tick dropped, signal receiver closed");
                }
            },
            move || {
                if finish_tx.send(CountdownSignal::Finish { run }).is_err() {
                    warn!("Countdown finish dropped, signal receiver closed");
                }
            },
        );
    }

    /// Cancel the active run and stop accepting its queued signals
    fn discard_countdown(&mut self) {
        self.countdown.cancel();
        self.run = self.run.wrapping_add(1);
    }

    fn emit(&self, event: GameEvent) {
        debug!("{}", event);
        if self.event_tx.send(event).is_err() {
            debug!("No listeners for {} notification", event.name());
        }
    }

    fn publish_status(&self) {
        self.status_tx.send_replace(self.status());
    }
}
