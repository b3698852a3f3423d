use std::{sync::Arc, time::Duration};

use anyhow::{bail, Result};
use serde::Serialize;
use tokio::{
    sync::Mutex,
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

use crate::events::{AppEvent, EventBus};
use crate::{log_info, log_warn};

use super::{StartOutcome, TickOutcome, TimerState};

const ENABLE_LOGS: bool = true;

/// Called once each time the countdown reaches zero.
pub trait ExpiryHandler: Send + Sync {
    fn timer_expired(&self);
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TimerSnapshot {
    pub state: TimerState,
    pub running: bool,
    pub display: String,
}

impl From<&TimerState> for TimerSnapshot {
    fn from(state: &TimerState) -> Self {
        Self {
            state: state.clone(),
            running: state.is_running(),
            display: state.display(),
        }
    }
}

struct TimerInner {
    state: TimerState,
    /// Bumped whenever a ticker is started or stopped; a ticker whose
    /// generation no longer matches must not touch the state.
    generation: u64,
}

struct Ticker {
    handle: JoinHandle<()>,
    cancel_token: CancellationToken,
}

#[derive(Clone)]
pub struct TimerController {
    inner: Arc<Mutex<TimerInner>>,
    ticker: Arc<Mutex<Option<Ticker>>>,
    events: EventBus,
    on_expired: Arc<dyn ExpiryHandler>,
    tick_interval: Duration,
}

impl TimerController {
    pub fn new(
        configured_seconds: u64,
        events: EventBus,
        on_expired: Arc<dyn ExpiryHandler>,
    ) -> Self {
        Self {
            inner: Arc::new(Mutex::new(TimerInner {
                state: TimerState::new(configured_seconds),
                generation: 0,
            })),
            ticker: Arc::new(Mutex::new(None)),
            events,
            on_expired,
            tick_interval: Duration::from_secs(1),
        }
    }

    pub async fn get_state(&self) -> TimerState {
        self.inner.lock().await.state.clone()
    }

    pub async fn get_snapshot(&self) -> TimerSnapshot {
        TimerSnapshot::from(&self.inner.lock().await.state)
    }

    pub async fn start(&self) -> TimerSnapshot {
        let (outcome, snapshot, generation) = {
            let mut guard = self.inner.lock().await;
            let outcome = guard.state.start();
            if outcome != StartOutcome::AlreadyRunning {
                guard.generation = guard.generation.wrapping_add(1);
            }
            (outcome, TimerSnapshot::from(&guard.state), guard.generation)
        };

        self.after_start(outcome, &snapshot, generation).await;
        snapshot
    }

    pub async fn pause(&self) -> TimerSnapshot {
        let (was_running, snapshot) = {
            let mut guard = self.inner.lock().await;
            let was_running = guard.state.pause();
            if was_running {
                guard.generation = guard.generation.wrapping_add(1);
            }
            (was_running, TimerSnapshot::from(&guard.state))
        };

        if was_running {
            self.after_pause(&snapshot).await;
        }
        snapshot
    }

    /// Start/pause button. Pause or start is decided under one lock, and
    /// starting with nothing on the clock is refused.
    pub async fn toggle(&self) -> Result<TimerSnapshot> {
        let mut guard = self.inner.lock().await;

        if guard.state.pause() {
            guard.generation = guard.generation.wrapping_add(1);
            let snapshot = TimerSnapshot::from(&guard.state);
            drop(guard);
            self.after_pause(&snapshot).await;
            return Ok(snapshot);
        }

        if guard.state.remaining_seconds == 0 {
            bail!("set a duration before starting");
        }
        let outcome = guard.state.start();
        guard.generation = guard.generation.wrapping_add(1);
        let snapshot = TimerSnapshot::from(&guard.state);
        let generation = guard.generation;
        drop(guard);

        self.after_start(outcome, &snapshot, generation).await;
        Ok(snapshot)
    }

    async fn after_start(&self, outcome: StartOutcome, snapshot: &TimerSnapshot, generation: u64) {
        match outcome {
            StartOutcome::Started => {
                log_info!("Timer started with {} remaining", snapshot.display);
                self.spawn_ticker(generation).await;
                self.emit_changed(snapshot);
            }
            StartOutcome::AlreadyRunning => {
                log_warn!("Timer start requested while already running");
            }
            StartOutcome::Expired => {
                log_info!("Timer started with nothing on the clock; expiring immediately");
                self.cancel_ticker().await;
                self.emit_changed(snapshot);
                self.events.emit(AppEvent::TimerExpired);
                self.on_expired.timer_expired();
            }
        }
    }

    async fn after_pause(&self, snapshot: &TimerSnapshot) {
        self.cancel_ticker().await;
        log_info!("Timer paused at {}", snapshot.display);
        self.emit_changed(snapshot);
    }

    pub async fn reset(&self) -> TimerSnapshot {
        let snapshot = {
            let mut guard = self.inner.lock().await;
            guard.state.reset();
            guard.generation = guard.generation.wrapping_add(1);
            TimerSnapshot::from(&guard.state)
        };
        self.cancel_ticker().await;
        log_info!("Timer reset to {}", snapshot.display);
        self.emit_changed(&snapshot);
        snapshot
    }

    pub async fn set_minutes(&self, minutes: u64) -> Result<TimerSnapshot> {
        let snapshot = {
            let mut guard = self.inner.lock().await;
            guard.state.set_minutes(minutes)?;
            TimerSnapshot::from(&guard.state)
        };
        self.emit_changed(&snapshot);
        Ok(snapshot)
    }

    pub async fn set_seconds(&self, seconds: u64) -> Result<TimerSnapshot> {
        let snapshot = {
            let mut guard = self.inner.lock().await;
            guard.state.set_seconds(seconds)?;
            TimerSnapshot::from(&guard.state)
        };
        self.emit_changed(&snapshot);
        Ok(snapshot)
    }

    /// Stops the ticker and waits for it to finish.
    pub async fn shutdown(&self) {
        if let Some(ticker) = self.ticker.lock().await.take() {
            ticker.cancel_token.cancel();
            let _ = ticker.handle.await;
        }
    }

    async fn spawn_ticker(&self, generation: u64) {
        let mut ticker_guard = self.ticker.lock().await;
        if let Some(previous) = ticker_guard.take() {
            previous.cancel_token.cancel();
        }

        let cancel_token = CancellationToken::new();
        let token = cancel_token.clone();
        let inner = self.inner.clone();
        let events = self.events.clone();
        let on_expired = self.on_expired.clone();
        let tick_interval = self.tick_interval;

        let handle = tokio::spawn(async move {
            // First tick lands one full period after the start, not immediately.
            let mut interval = time::interval_at(Instant::now() + tick_interval, tick_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = interval.tick() => {}
                }

                let (outcome, snapshot) = {
                    let mut guard = inner.lock().await;
                    if guard.generation != generation {
                        break;
                    }
                    let outcome = guard.state.tick();
                    (outcome, TimerSnapshot::from(&guard.state))
                };

                match outcome {
                    TickOutcome::Ignored => break,
                    TickOutcome::Counting => {
                        events.emit(AppEvent::TimerChanged { snapshot });
                    }
                    TickOutcome::Expired => {
                        log_info!("Timer expired");
                        events.emit(AppEvent::TimerChanged { snapshot });
                        events.emit(AppEvent::TimerExpired);
                        on_expired.timer_expired();
                        break;
                    }
                }
            }
        });

        *ticker_guard = Some(Ticker {
            handle,
            cancel_token,
        });
    }

    async fn cancel_ticker(&self) {
        if let Some(ticker) = self.ticker.lock().await.take() {
            ticker.cancel_token.cancel();
        }
    }

    fn emit_changed(&self, snapshot: &TimerSnapshot) {
        self.events.emit(AppEvent::TimerChanged {
            snapshot: snapshot.clone(),
        });
    }
}
