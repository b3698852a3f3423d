pub mod capture;
pub mod cli;
pub mod collection;
pub mod events;
pub mod gallery;
pub mod models;
pub mod settings;
pub mod timer;
pub mod ui;
pub mod utils;

use std::{path::Path, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::broadcast;

use capture::{CaptureService, CreatureSource, PokeApiClient};
use cli::{Args, Commands};
use collection::{CollectionBackend, CollectionStore, JsonFileBackend};
use events::{AppEvent, EventBus};
use gallery::{GallerySnapshot, GalleryView};
use settings::{Settings, SettingsStore};
use timer::TimerController;

/// Everything the UI surface talks to, owned by the top-level process.
pub struct AppState<S = PokeApiClient> {
    pub(crate) timer: TimerController,
    pub(crate) capture: CaptureService<S>,
    pub(crate) gallery: GalleryView,
    pub(crate) events: EventBus,
}

impl<S: CreatureSource> AppState<S> {
    /// Loads the stored collection and wires the timer's expiry to the
    /// capture step.
    pub fn new(configured_seconds: u64, source: S, backend: Arc<dyn CollectionBackend>) -> Self {
        let events = EventBus::new();
        let collection = CollectionStore::load_all(backend);
        let capture = CaptureService::new(source, collection, events.clone());
        let timer = TimerController::new(
            configured_seconds,
            events.clone(),
            Arc::new(capture.clone()),
        );

        Self {
            timer,
            capture,
            gallery: GalleryView::new(),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.events.subscribe()
    }

    pub async fn shutdown(&self) {
        self.timer.shutdown().await;
    }
}

pub fn run() {
    if let Err(err) = try_run() {
        eprintln!("pokefocus: {err:#}");
        std::process::exit(1);
    }
}

fn try_run() -> Result<()> {
    let args = Args::parse();
    let data_dir = cli::resolve_data_dir(args.data_dir);
    utils::logging::init(&data_dir);

    log::info!("PokeFocus starting up (data dir {})...", data_dir.display());

    let settings = SettingsStore::new(&data_dir)?.settings().clone();

    match args.command.unwrap_or_default() {
        Commands::Timer {
            minutes,
            seconds,
            api_base_url,
        } => {
            let settings = Settings {
                api_base_url: api_base_url.unwrap_or(settings.api_base_url),
                initial_minutes: minutes.unwrap_or(settings.initial_minutes),
                initial_seconds: seconds.unwrap_or(settings.initial_seconds),
                ..settings
            };
            run_timer(&data_dir, &settings)
        }
        Commands::Gallery => print_gallery(&data_dir, &settings),
    }
}

fn run_timer(data_dir: &Path, settings: &Settings) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    let source = PokeApiClient::new(settings.api_base_url.clone())?;
    let backend = Arc::new(JsonFileBackend::new(data_dir, &settings.collection_key));
    let state = AppState::new(settings.initial_duration_seconds(), source, backend);

    let result = ui::run(&runtime, &state);
    runtime.block_on(state.shutdown());
    log::info!("PokeFocus shutting down");
    result
}

fn print_gallery(data_dir: &Path, settings: &Settings) -> Result<()> {
    let backend = Arc::new(JsonFileBackend::new(data_dir, &settings.collection_key));
    let store = CollectionStore::load_all(backend);
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .context("failed to start async runtime")?;
    let records = runtime.block_on(store.records());

    let snapshot = GallerySnapshot::project(true, &records);
    if snapshot.entries.is_empty() {
        println!("{}", ui::view::EMPTY_GALLERY_MESSAGE);
        return Ok(());
    }
    for record in &snapshot.entries {
        println!("{}", ui::view::gallery_line(record));
    }
    Ok(())
}
