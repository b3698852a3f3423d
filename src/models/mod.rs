pub mod creature;

pub use creature::CapturedRecord;
