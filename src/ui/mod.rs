//! Terminal front end: one thread polls the keyboard and redraws, the tokio
//! runtime runs the ticker and captures.

pub mod input;
pub mod view;

use std::{io, time::Duration};

use anyhow::{Context, Result};
use log::debug;
use ratatui::{
    backend::CrosstermBackend,
    crossterm::{
        event::{self, Event, KeyEventKind},
        execute,
        terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    },
    Terminal,
};
use tokio::{runtime::Runtime, sync::broadcast::error::TryRecvError};

use crate::{
    capture::{commands as capture_commands, CreatureSource},
    gallery::commands as gallery_commands,
    timer::commands as timer_commands,
    AppState,
};

use input::{Action, InputState, KeyContext};
use view::ViewModel;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub fn run<S: CreatureSource>(runtime: &Runtime, state: &AppState<S>) -> Result<()> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let result = event_loop(&mut terminal, runtime, state);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

fn event_loop<S: CreatureSource>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    runtime: &Runtime,
    state: &AppState<S>,
) -> Result<()> {
    let mut input = InputState::default();
    let mut events = state.subscribe();

    loop {
        // Events only tell us something changed; the frame reads fresh snapshots.
        loop {
            match events.try_recv() {
                Ok(event) => debug!("ui saw {}", event.name()),
                Err(TryRecvError::Lagged(skipped)) => debug!("ui skipped {skipped} events"),
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }

        let model = runtime.block_on(view_model(state));
        terminal.draw(|f| view::render(f, &model, &input))?;

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        let ctx = KeyContext {
            running: model.timer.running,
            gallery_open: model.gallery.open,
            can_retry: model.capture.can_retry(),
        };
        match input.handle_key(key, ctx) {
            Action::Quit => return Ok(()),
            action => {
                if let Err(message) = runtime.block_on(apply(state, action)) {
                    input.notice = Some(message);
                }
            }
        }
    }
}

async fn view_model<S: CreatureSource>(state: &AppState<S>) -> ViewModel {
    ViewModel {
        timer: timer_commands::get_timer_state(state).await,
        capture: capture_commands::get_capture_state(state).await,
        gallery: gallery_commands::get_gallery(state).await,
    }
}

async fn apply<S: CreatureSource>(state: &AppState<S>, action: Action) -> Result<(), String> {
    match action {
        Action::None | Action::Quit => {}
        Action::ToggleTimer => {
            timer_commands::toggle_timer(state).await?;
        }
        Action::Reset => {
            timer_commands::reset_timer(state).await;
        }
        Action::SetMinutes(minutes) => {
            timer_commands::set_timer_minutes(state, minutes).await?;
        }
        Action::SetSeconds(seconds) => {
            timer_commands::set_timer_seconds(state, seconds).await?;
        }
        Action::OpenGallery => gallery_commands::open_gallery(state),
        Action::CloseGallery => gallery_commands::close_gallery(state),
        Action::Retry => capture_commands::retry_capture(state).await?,
    }
    Ok(())
}
