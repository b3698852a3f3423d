use crate::{
    capture::{CaptureSnapshot, CreatureSource},
    AppState,
};

pub async fn get_capture_state<S: CreatureSource>(state: &AppState<S>) -> CaptureSnapshot {
    state.capture.get_snapshot().await
}

/// Starts another capture after a failed one. The outcome arrives as a
/// capture event.
pub async fn retry_capture<S: CreatureSource>(state: &AppState<S>) -> Result<(), String> {
    let snapshot = state.capture.get_snapshot().await;
    if !snapshot.can_retry() {
        return Err("there is no failed capture to retry".into());
    }
    state.capture.spawn_capture();
    Ok(())
}
