pub mod commands;
pub mod view;

pub use view::{sorted_by_id, GallerySnapshot, GalleryView};
