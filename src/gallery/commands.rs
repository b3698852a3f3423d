use crate::{
    capture::CreatureSource,
    events::AppEvent,
    gallery::GallerySnapshot,
    AppState,
};

pub async fn get_gallery<S: CreatureSource>(state: &AppState<S>) -> GallerySnapshot {
    let records = state.capture.collection().records().await;
    GallerySnapshot::project(state.gallery.is_open(), &records)
}

pub fn open_gallery<S: CreatureSource>(state: &AppState<S>) {
    set_gallery_open(state, true);
}

pub fn close_gallery<S: CreatureSource>(state: &AppState<S>) {
    set_gallery_open(state, false);
}

fn set_gallery_open<S: CreatureSource>(state: &AppState<S>, open: bool) {
    if state.gallery.is_open() != open {
        state.gallery.set_open(open);
        state.events.emit(AppEvent::GalleryToggled { open });
    }
}
