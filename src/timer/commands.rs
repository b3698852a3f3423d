use crate::{
    capture::CreatureSource,
    timer::TimerSnapshot,
    AppState,
};

pub async fn get_timer_state<S: CreatureSource>(state: &AppState<S>) -> TimerSnapshot {
    state.timer.get_snapshot().await
}

/// Start/pause button. Starting needs something on the clock.
pub async fn toggle_timer<S: CreatureSource>(state: &AppState<S>) -> Result<TimerSnapshot, String> {
    state.timer.toggle().await.map_err(|e| e.to_string())
}

/// Back to the configured duration; also forgets the last catch and error.
pub async fn reset_timer<S: CreatureSource>(state: &AppState<S>) -> TimerSnapshot {
    let snapshot = state.timer.reset().await;
    state.capture.clear().await;
    snapshot
}

pub async fn set_timer_minutes<S: CreatureSource>(
    state: &AppState<S>,
    minutes: u64,
) -> Result<TimerSnapshot, String> {
    state
        .timer
        .set_minutes(minutes)
        .await
        .map_err(|e| e.to_string())
}

pub async fn set_timer_seconds<S: CreatureSource>(
    state: &AppState<S>,
    seconds: u64,
) -> Result<TimerSnapshot, String> {
    state
        .timer
        .set_seconds(seconds)
        .await
        .map_err(|e| e.to_string())
}
