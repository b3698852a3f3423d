pub mod commands;
pub mod controller;
pub mod state;

pub use controller::{ExpiryHandler, TimerController, TimerSnapshot};
pub use state::{format_time, StartOutcome, TickOutcome, TimerState, TimerStatus};
