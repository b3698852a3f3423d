pub mod backend;
pub mod store;

pub use backend::{CollectionBackend, JsonFileBackend, MemoryBackend};
pub use store::CollectionStore;
