use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Local;
use rand::Rng;
use serde::Serialize;
use tokio::sync::Mutex;

use crate::{
    collection::CollectionStore,
    events::{AppEvent, EventBus},
    models::{
        creature::{MAX_CREATURE_ID, MIN_CREATURE_ID},
        CapturedRecord,
    },
    timer::ExpiryHandler,
};
use crate::{log_error, log_info, log_warn};

use super::{client::REQUEST_TIMEOUT, CreatureSource};

const ENABLE_LOGS: bool = true;

/// What the user sees when a capture fails, whatever the cause.
pub const FETCH_FAILURE_MESSAGE: &str = "Failed to catch a Pokémon";

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CaptureSnapshot {
    pub loading: bool,
    pub error: Option<String>,
    pub current: Option<CapturedRecord>,
}

impl CaptureSnapshot {
    pub fn can_retry(&self) -> bool {
        self.error.is_some() && !self.loading
    }
}

/// Fetches a random creature and files it into the collection.
pub struct CaptureService<S> {
    source: Arc<S>,
    collection: CollectionStore,
    state: Arc<Mutex<CaptureSnapshot>>,
    events: EventBus,
}

impl<S> Clone for CaptureService<S> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            collection: self.collection.clone(),
            state: self.state.clone(),
            events: self.events.clone(),
        }
    }
}

impl<S: CreatureSource> CaptureService<S> {
    pub fn new(source: S, collection: CollectionStore, events: EventBus) -> Self {
        Self {
            source: Arc::new(source),
            collection,
            state: Arc::new(Mutex::new(CaptureSnapshot::default())),
            events,
        }
    }

    pub fn collection(&self) -> &CollectionStore {
        &self.collection
    }

    pub async fn get_snapshot(&self) -> CaptureSnapshot {
        self.state.lock().await.clone()
    }

    /// Catches one creature with an id drawn uniformly from the first 151.
    pub async fn capture(&self) -> Option<CapturedRecord> {
        self.capture_id(pick_id()).await
    }

    /// Returns the stored record, or `None` when the capture failed or another
    /// one was already in flight.
    pub async fn capture_id(&self, id: u32) -> Option<CapturedRecord> {
        {
            let mut guard = self.state.lock().await;
            if guard.loading {
                log_warn!("Capture of #{id} skipped; another capture is in flight");
                return None;
            }
            guard.loading = true;
            guard.error = None;
        }

        log_info!("Catching #{id}");
        self.events.emit(AppEvent::CaptureStarted { id });

        let result = self.fetch_and_store(id).await;

        let mut guard = self.state.lock().await;
        guard.loading = false;
        match result {
            Ok(record) => {
                log_info!("Caught {}", record.label());
                guard.current = Some(record.clone());
                drop(guard);
                self.events.emit(AppEvent::CaptureSucceeded {
                    record: record.clone(),
                });
                Some(record)
            }
            Err(err) => {
                log_error!("Capture of #{id} failed: {err:#}");
                guard.error = Some(FETCH_FAILURE_MESSAGE.to_string());
                drop(guard);
                self.events.emit(AppEvent::CaptureFailed {
                    message: FETCH_FAILURE_MESSAGE.to_string(),
                });
                None
            }
        }
    }

    /// Forgets the displayed record and error. An in-flight capture still
    /// lands when it completes.
    pub async fn clear(&self) {
        let mut guard = self.state.lock().await;
        guard.current = None;
        guard.error = None;
    }

    /// Runs a capture on the runtime without waiting for it.
    pub fn spawn_capture(&self) {
        let service = self.clone();
        tokio::spawn(async move {
            service.capture().await;
        });
    }

    async fn fetch_and_store(&self, id: u32) -> Result<CapturedRecord> {
        // A source that never answers must still end in a retryable failure.
        let response = tokio::time::timeout(REQUEST_TIMEOUT, self.source.fetch(id))
            .await
            .with_context(|| format!("no answer for #{id} within {REQUEST_TIMEOUT:?}"))??;
        let record = response.into_record(today());
        self.collection.append(record.clone()).await?;
        Ok(record)
    }
}

impl<S: CreatureSource> ExpiryHandler for CaptureService<S> {
    fn timer_expired(&self) {
        self.spawn_capture();
    }
}

fn pick_id() -> u32 {
    rand::thread_rng().gen_range(MIN_CREATURE_ID..=MAX_CREATURE_ID)
}

pub fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}
