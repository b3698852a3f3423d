use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum TimerStatus {
    Idle,
    Running,
    Paused,
    Finished,
}

impl Default for TimerStatus {
    fn default() -> Self {
        TimerStatus::Idle
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    AlreadyRunning,
    /// Started with nothing left on the clock; the countdown is over at once.
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Tick arrived after the timer was paused or reset.
    Ignored,
    Counting,
    Expired,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    pub status: TimerStatus,
    pub configured_seconds: u64,
    pub remaining_seconds: u64,
}

impl TimerState {
    pub fn new(configured_seconds: u64) -> Self {
        Self {
            status: TimerStatus::Idle,
            configured_seconds,
            remaining_seconds: configured_seconds,
        }
    }

    pub fn is_running(&self) -> bool {
        self.status == TimerStatus::Running
    }

    pub fn start(&mut self) -> StartOutcome {
        if self.is_running() {
            return StartOutcome::AlreadyRunning;
        }
        if self.remaining_seconds == 0 {
            self.status = TimerStatus::Finished;
            return StartOutcome::Expired;
        }
        self.status = TimerStatus::Running;
        StartOutcome::Started
    }

    /// Returns whether the timer was running.
    pub fn pause(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.status = TimerStatus::Paused;
        true
    }

    /// One elapsed second.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.is_running() {
            return TickOutcome::Ignored;
        }
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            self.status = TimerStatus::Finished;
            TickOutcome::Expired
        } else {
            TickOutcome::Counting
        }
    }

    pub fn reset(&mut self) {
        self.remaining_seconds = self.configured_seconds;
        self.status = TimerStatus::Idle;
    }

    /// Keeps the seconds part of the current remaining time.
    pub fn set_minutes(&mut self, minutes: u64) -> Result<()> {
        self.ensure_editable()?;
        let seconds = minutes
            .checked_mul(60)
            .and_then(|total| total.checked_add(self.remaining_seconds % 60))
            .with_context(|| format!("{minutes} minutes is too long"))?;
        self.arm(seconds);
        Ok(())
    }

    /// Keeps the whole minutes of the current remaining time.
    pub fn set_seconds(&mut self, seconds: u64) -> Result<()> {
        self.ensure_editable()?;
        let total = (self.remaining_seconds / 60 * 60)
            .checked_add(seconds)
            .with_context(|| format!("{seconds} seconds is too long"))?;
        self.arm(total);
        Ok(())
    }

    pub fn display(&self) -> String {
        format_time(self.remaining_seconds)
    }

    fn ensure_editable(&self) -> Result<()> {
        if self.is_running() {
            bail!("cannot change the duration while the timer is running");
        }
        Ok(())
    }

    fn arm(&mut self, seconds: u64) {
        self.configured_seconds = seconds;
        self.remaining_seconds = seconds;
        self.status = TimerStatus::Idle;
    }
}

/// `m:ss`, minutes unpadded.
pub fn format_time(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_down_to_expiry() {
        let mut state = TimerState::new(5);
        assert_eq!(state.start(), StartOutcome::Started);

        for expected in (1..5).rev() {
            assert_eq!(state.tick(), TickOutcome::Counting);
            assert_eq!(state.remaining_seconds, expected);
        }
        assert_eq!(state.tick(), TickOutcome::Expired);
        assert_eq!(state.remaining_seconds, 0);
        assert!(!state.is_running());
        assert_eq!(state.status, TimerStatus::Finished);

        assert_eq!(state.tick(), TickOutcome::Ignored);
        assert_eq!(state.remaining_seconds, 0);
    }

    #[test]
    fn every_duration_expires_after_exactly_that_many_ticks() {
        for duration in 1..=180 {
            let mut state = TimerState::new(duration);
            state.start();
            let expiries = (0..duration)
                .map(|_| state.tick())
                .filter(|outcome| *outcome == TickOutcome::Expired)
                .count();
            assert_eq!(expiries, 1, "duration {duration}");
            assert!(!state.is_running());
            assert_eq!(state.remaining_seconds, 0);
        }
    }

    #[test]
    fn starting_at_zero_expires_immediately() {
        let mut state = TimerState::new(0);
        assert_eq!(state.start(), StartOutcome::Expired);
        assert!(!state.is_running());
    }

    #[test]
    fn start_while_running_is_reported() {
        let mut state = TimerState::new(3);
        state.start();
        assert_eq!(state.start(), StartOutcome::AlreadyRunning);
    }

    #[test]
    fn paused_timer_ignores_ticks() {
        let mut state = TimerState::new(10);
        state.start();
        state.tick();
        assert!(state.pause());
        assert_eq!(state.tick(), TickOutcome::Ignored);
        assert_eq!(state.remaining_seconds, 9);
        assert!(!state.pause());
    }

    #[test]
    fn reset_restores_configured_duration_from_any_state() {
        let mut running = TimerState::new(30);
        running.start();
        running.tick();

        let mut paused = running.clone();
        paused.pause();

        let mut finished = TimerState::new(1);
        finished.start();
        finished.tick();

        for mut state in [running, paused, finished, TimerState::new(0)] {
            state.reset();
            assert_eq!(state.remaining_seconds, state.configured_seconds);
            assert!(!state.is_running());
            assert_eq!(state.status, TimerStatus::Idle);
        }
    }

    #[test]
    fn set_minutes_keeps_remaining_seconds() {
        let mut state = TimerState::new(10);
        state.set_minutes(2).unwrap();
        assert_eq!(state.configured_seconds, 130);
        assert_eq!(state.remaining_seconds, 130);
    }

    #[test]
    fn set_seconds_keeps_whole_minutes() {
        let mut state = TimerState::new(130);
        state.set_seconds(45).unwrap();
        assert_eq!(state.configured_seconds, 165);
        assert_eq!(state.remaining_seconds, 165);
    }

    #[test]
    fn editing_while_paused_uses_remaining_time() {
        let mut state = TimerState::new(125);
        state.start();
        for _ in 0..10 {
            state.tick();
        }
        state.pause();
        // 115 remaining: 1 minute 55 seconds
        state.set_minutes(3).unwrap();
        assert_eq!(state.remaining_seconds, 235);
        assert_eq!(state.status, TimerStatus::Idle);
    }

    #[test]
    fn editing_while_running_is_rejected() {
        let mut state = TimerState::new(60);
        state.start();
        assert!(state.set_minutes(5).is_err());
        assert!(state.set_seconds(5).is_err());
        assert_eq!(state.configured_seconds, 60);
        assert_eq!(state.remaining_seconds, 60);
    }

    #[test]
    fn overflowing_minutes_are_rejected() {
        let mut state = TimerState::new(0);
        assert!(state.set_minutes(u64::MAX).is_err());
        assert_eq!(state.configured_seconds, 0);
    }

    #[test]
    fn formats_minutes_and_padded_seconds() {
        assert_eq!(format_time(0), "0:00");
        assert_eq!(format_time(9), "0:09");
        assert_eq!(format_time(130), "2:10");
        assert_eq!(format_time(3600), "60:00");
    }
}
