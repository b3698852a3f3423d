use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use serde::Serialize;

use crate::models::CapturedRecord;

/// The collection ordered by id. Equal ids keep their catch order.
pub fn sorted_by_id(records: &[CapturedRecord]) -> Vec<CapturedRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by_key(|record| record.id);
    sorted
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GallerySnapshot {
    pub open: bool,
    pub entries: Vec<CapturedRecord>,
}

impl GallerySnapshot {
    pub fn project(open: bool, records: &[CapturedRecord]) -> Self {
        Self {
            open,
            entries: sorted_by_id(records),
        }
    }
}

/// Open/closed flag of the gallery overlay.
#[derive(Clone, Default)]
pub struct GalleryView {
    open: Arc<AtomicBool>,
}

impl GalleryView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    pub fn set_open(&self, open: bool) {
        self.open.store(open, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u32, captured_on: &str) -> CapturedRecord {
        CapturedRecord {
            id,
            name: format!("creature-{id}"),
            categories: Vec::new(),
            image_ref: String::new(),
            captured_on: captured_on.into(),
        }
    }

    #[test]
    fn sorts_ascending_and_keeps_duplicates_in_catch_order() {
        let records = vec![
            record(25, "first"),
            record(1, "second"),
            record(150, "third"),
            record(25, "fourth"),
            record(7, "fifth"),
        ];

        let sorted = sorted_by_id(&records);
        let order: Vec<(u32, &str)> = sorted
            .iter()
            .map(|r| (r.id, r.captured_on.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![(1, "second"), (7, "fifth"), (25, "first"), (25, "fourth"), (150, "third")]
        );
    }

    #[test]
    fn projection_is_an_idempotent_permutation() {
        let records: Vec<_> = [42, 3, 99, 3, 1, 151, 42]
            .into_iter()
            .map(|id| record(id, "d"))
            .collect();

        let once = sorted_by_id(&records);
        assert_eq!(sorted_by_id(&once), once);
        assert_eq!(once.len(), records.len());
        for record in &records {
            let expected = records.iter().filter(|r| *r == record).count();
            assert_eq!(once.iter().filter(|r| *r == record).count(), expected);
        }
        assert!(once.windows(2).all(|pair| pair[0].id <= pair[1].id));
    }

    #[test]
    fn projection_leaves_input_alone() {
        let records = vec![record(9, "a"), record(2, "b")];
        let snapshot = GallerySnapshot::project(true, &records);
        assert_eq!(snapshot.entries[0].id, 2);
        assert_eq!(records[0].id, 9);
    }

    #[test]
    fn open_flag_starts_closed() {
        let view = GalleryView::new();
        assert!(!view.is_open());
        view.set_open(true);
        assert!(view.clone().is_open());
        view.set_open(false);
        assert!(!view.is_open());
    }
}
