//! Cancellable countdown driven by the tokio timer

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};
use tokio::{
    task::JoinHandle,
    time::{sleep_until, Instant},
};
use tracing::debug;

/// Lifecycle of a single countdown run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownPhase {
    Idle,
    Running,
    Finished,
    Cancelled,
}

/// Fires a tick at every interval boundary and a finish at the deadline.
///
/// Each `start` creates a fresh run with its own phase cell and task, so a
/// cancelled or finished run can never deliver callbacks into a later one.
/// Callbacks are invoked while the run's phase lock is held, which makes
/// `cancel` synchronous: once it returns, no callback of that run executes.
/// Callbacks therefore must not call back into the same `Countdown`.
#[derive(Debug)]
pub struct Countdown {
    phase: Arc<Mutex<CountdownPhase>>,
    handle: Option<JoinHandle<()>>,
}

impl Countdown {
    /// Create a countdown that has not been started
    pub fn new() -> Self {
        Self {
            phase: Arc::new(Mutex::new(CountdownPhase::Idle)),
            handle: None,
        }
    }

    /// Start a new run, discarding whatever run was active before.
    ///
    /// `on_tick` receives the remaining time at each boundary, ending with
    /// `Duration::ZERO` right before `on_finish` fires.
    pub fn start<T, F>(&mut self, total: Duration, interval: Duration, mut on_tick: T, on_finish: F)
    where
        T: FnMut(Duration) + Send + 'static,
        F: FnOnce() + Send + 'static,
    {
        self.cancel();

        let phase = Arc::new(Mutex::new(CountdownPhase::Running));
        self.phase = Arc::clone(&phase);
        let started_at = Instant::now();

        debug!("Countdown started: total={:?}, interval={:?}", total, interval);

        self.handle = Some(tokio::spawn(async move {
            let mut elapsed = Duration::ZERO;
            loop {
                elapsed = next_boundary(elapsed, interval, total);
                sleep_until(started_at + elapsed).await;

                let remaining = total.saturating_sub(elapsed);
                let mut current = lock(&phase);
                if *current != CountdownPhase::Running {
                    return;
                }

                on_tick(remaining);

                if remaining.is_zero() {
                    *current = CountdownPhase::Finished;
                    debug!("Countdown finished after {:?}", total);
                    on_finish();
                    return;
                }
            }
        }));
    }

    /// Stop the active run. Safe to call repeatedly and after a natural finish.
    pub fn cancel(&mut self) {
        {
            let mut current = lock(&self.phase);
            if *current == CountdownPhase::Running {
                *current = CountdownPhase::Cancelled;
                debug!("Countdown cancelled");
            }
        }

        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    /// Current phase of the latest run
    pub fn phase(&self) -> CountdownPhase {
        *lock(&self.phase)
    }

    /// Check if the latest run is still counting down
    pub fn is_running(&self) -> bool {
        self.phase() == CountdownPhase::Running
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Next wake-up offset from the start; the deadline always gets its own boundary.
fn next_boundary(elapsed: Duration, interval: Duration, total: Duration) -> Duration {
    if interval.is_zero() {
        return total;
    }
    elapsed.saturating_add(interval).min(total)
}

fn lock(phase: &Mutex<CountdownPhase>) -> MutexGuard<'_, CountdownPhase> {
    phase.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[derive(Debug, PartialEq, Eq)]
    enum Call {
        Tick(u128),
        Finish,
    }

    fn start_recording(countdown: &mut Countdown, total_ms: u64, interval_ms: u64) -> mpsc::UnboundedReceiver<Call> {
        let (tx, rx) = mpsc::unbounded_channel();
        let finish_tx = tx.clone();
        countdown.start(
            Duration::from_millis(total_ms),
            Duration::from_millis(interval_ms),
            move |remaining| {
                let _ = tx.send(Call::Tick(remaining.as_millis()));
            },
            move || {
                let _ = finish_tx.send(Call::Finish);
            },
        );
        rx
    }

    async fn drain(rx: &mut mpsc::UnboundedReceiver<Call>) -> Vec<Call> {
        let mut calls = Vec::new();
        while let Some(call) = rx.recv().await {
            calls.push(call);
        }
        calls
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_down_then_finishes_exactly_once() {
        let mut countdown = Countdown::new();
        assert_eq!(countdown.phase(), CountdownPhase::Idle);

        let mut rx = start_recording(&mut countdown, 5000, 1000);
        assert!(countdown.is_running());

        let calls = drain(&mut rx).await;
        assert_eq!(
            calls,
            vec![
                Call::Tick(4000),
                Call::Tick(3000),
                Call::Tick(2000),
                Call::Tick(1000),
                Call::Tick(0),
                Call::Finish,
            ]
        );
        assert_eq!(countdown.phase(), CountdownPhase::Finished);
    }

    #[tokio::test(start_paused = true)]
    async fn leftover_shorter_than_interval_still_finishes_at_deadline() {
        let started = Instant::now();
        let mut countdown = Countdown::new();
        let mut rx = start_recording(&mut countdown, 2500, 1000);

        let mut calls = Vec::new();
        while let Some(call) = rx.recv().await {
            let done = call == Call::Finish;
            calls.push(call);
            if done {
                assert_eq!(started.elapsed(), Duration::from_millis(2500));
            }
        }

        assert_eq!(
            calls,
            vec![Call::Tick(1500), Call::Tick(500), Call::Tick(0), Call::Finish]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_further_callbacks() {
        let mut countdown = Countdown::new();
        let mut rx = start_recording(&mut countdown, 5000, 1000);

        assert_eq!(rx.recv().await, Some(Call::Tick(4000)));

        countdown.cancel();
        countdown.cancel();
        assert_eq!(countdown.phase(), CountdownPhase::Cancelled);

        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_after_finish_is_a_no_op() {
        let mut countdown = Countdown::new();
        let mut rx = start_recording(&mut countdown, 2000, 1000);
        let calls = drain(&mut rx).await;
        assert_eq!(calls.last(), Some(&Call::Finish));

        countdown.cancel();
        countdown.cancel();
        assert_eq!(countdown.phase(), CountdownPhase::Finished);
    }

    #[tokio::test(start_paused = true)]
    async fn restart_never_delivers_ticks_from_the_previous_run() {
        let mut countdown = Countdown::new();
        let mut first = start_recording(&mut countdown, 5000, 1000);
        assert_eq!(first.recv().await, Some(Call::Tick(4000)));

        let mut second = start_recording(&mut countdown, 3000, 1000);
        assert_eq!(first.recv().await, None);

        let calls = drain(&mut second).await;
        assert_eq!(
            calls,
            vec![Call::Tick(2000), Call::Tick(1000), Call::Tick(0), Call::Finish]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn zero_interval_wakes_only_at_the_deadline() {
        let mut countdown = Countdown::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let finish_tx = tx.clone();
        countdown.start(
            Duration::from_secs(3),
            Duration::ZERO,
            move |remaining| {
                let _ = tx.send(Call::Tick(remaining.as_millis()));
            },
            move || {
                let _ = finish_tx.send(Call::Finish);
            },
        );

        let calls = drain(&mut rx).await;
        assert_eq!(calls, vec![Call::Tick(0), Call::Finish]);
    }

    #[test]
    fn boundaries_clamp_to_the_deadline() {
        let second = Duration::from_secs(1);
        let total = Duration::from_millis(2500);
        assert_eq!(next_boundary(Duration::ZERO, second, total), second);
        assert_eq!(next_boundary(Duration::from_secs(2), second, total), total);
        assert_eq!(next_boundary(Duration::ZERO, Duration::ZERO, total), total);
    }
}
