use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::Mutex;

use crate::models::CapturedRecord;
use crate::{log_info, log_warn};

use super::CollectionBackend;

const ENABLE_LOGS: bool = true;

/// The caught collection in insertion order, mirrored to a backend on every
/// append. Records are never edited or removed once stored.
#[derive(Clone)]
pub struct CollectionStore {
    records: Arc<Mutex<Vec<CapturedRecord>>>,
    backend: Arc<dyn CollectionBackend>,
}

impl CollectionStore {
    /// Reads the persisted collection. A missing or unreadable collection
    /// starts empty; the failure is only logged.
    pub fn load_all(backend: Arc<dyn CollectionBackend>) -> Self {
        let records = match backend.load() {
            Ok(Some(records)) => {
                log_info!("Loaded {} caught records", records.len());
                records
            }
            Ok(None) => {
                log_info!("No stored collection yet; starting empty");
                Vec::new()
            }
            Err(err) => {
                log_warn!("Stored collection unreadable, starting empty: {err:#}");
                Vec::new()
            }
        };

        Self {
            records: Arc::new(Mutex::new(records)),
            backend,
        }
    }

    /// Adds `record` at the end and persists the whole collection. On a
    /// persistence error nothing changes in memory either.
    ///
    /// The write runs on the blocking pool; the lock stays held across it so
    /// appends land on disk in the order they land in memory.
    pub async fn append(&self, record: CapturedRecord) -> Result<usize> {
        let mut guard = self.records.lock().await;
        let mut next = guard.clone();
        next.push(record);
        let next = tokio::task::spawn_blocking({
            let backend = Arc::clone(&self.backend);
            move || backend.save(&next).map(|()| next)
        })
        .await
        .context("collection save worker join failed")?
        .context("failed to persist caught collection")?;
        *guard = next;
        Ok(guard.len())
    }

    pub async fn records(&self) -> Vec<CapturedRecord> {
        self.records.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use anyhow::bail;

    use super::*;
    use crate::collection::{JsonFileBackend, MemoryBackend};

    fn record(id: u32) -> CapturedRecord {
        CapturedRecord {
            id,
            name: format!("creature-{id}"),
            categories: vec!["normal".into()],
            image_ref: String::new(),
            captured_on: "2026-10-18".into(),
        }
    }

    struct FailingBackend;

    impl CollectionBackend for FailingBackend {
        fn load(&self) -> Result<Option<Vec<CapturedRecord>>> {
            Ok(None)
        }

        fn save(&self, _records: &[CapturedRecord]) -> Result<()> {
            bail!("disk full")
        }
    }

    #[tokio::test]
    async fn append_grows_by_one_and_persists() {
        let backend = Arc::new(MemoryBackend::new());
        let store = CollectionStore::load_all(backend.clone());
        assert!(store.is_empty().await);

        for (expected, id) in [25, 1, 25].into_iter().enumerate() {
            let before = store.records().await;
            let len = store.append(record(id)).await.unwrap();
            assert_eq!(len, expected + 1);
            let after = store.records().await;
            assert_eq!(&after[..before.len()], &before[..]);
            assert_eq!(after.last(), Some(&record(id)));
        }

        let reloaded = CollectionStore::load_all(backend);
        assert_eq!(reloaded.records().await, store.records().await);
    }

    #[tokio::test]
    async fn unparseable_storage_starts_empty() {
        let store = CollectionStore::load_all(Arc::new(MemoryBackend::with_raw("not json")));
        assert_eq!(store.len().await, 0);

        store.append(record(3)).await.unwrap();
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn failed_save_leaves_collection_untouched() {
        let store = CollectionStore::load_all(Arc::new(FailingBackend));
        assert!(store.append(record(9)).await.is_err());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn null_image_in_storage_keeps_the_whole_collection() {
        let raw = r#"[
            {"id":7,"name":"squirtle","types":["water"],"image":null,"captureDate":"2026-10-17"},
            {"id":1,"name":"bulbasaur","types":["grass"],"image":"b.png","captureDate":"2026-10-18"}
        ]"#;
        let store = CollectionStore::load_all(Arc::new(MemoryBackend::with_raw(raw)));
        let records = store.records().await;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].image_ref, "");
        assert_eq!(records[1].image_ref, "b.png");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn concurrent_appends_all_reach_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let backend = Arc::new(JsonFileBackend::new(dir.path(), "collection"));
        let store = CollectionStore::load_all(backend.clone());

        let tasks: Vec<_> = (1..=20)
            .map(|id| {
                let store = store.clone();
                tokio::spawn(async move { store.append(record(id)).await })
            })
            .collect();
        let mut lens = Vec::new();
        for task in tasks {
            lens.push(task.await.unwrap().unwrap());
        }
        lens.sort_unstable();
        assert_eq!(lens, (1..=20).collect::<Vec<usize>>());

        let on_disk = backend.load().unwrap().unwrap();
        assert_eq!(on_disk, store.records().await);
        assert_eq!(on_disk.len(), 20);
    }
}
