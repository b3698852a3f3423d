use serde::{Deserialize, Deserializer, Serialize};

/// Lowest and highest ids handed out by the capture step (generation one).
pub const MIN_CREATURE_ID: u32 = 1;
pub const MAX_CREATURE_ID: u32 = 151;

/// A creature caught when the countdown ran out.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CapturedRecord {
    pub id: u32,
    pub name: String,
    #[serde(rename = "types")]
    pub categories: Vec<String>,
    /// Empty when the creature has no sprite.
    #[serde(rename = "image", default, deserialize_with = "null_as_empty")]
    pub image_ref: String,
    #[serde(rename = "captureDate", default)]
    pub captured_on: String,
}

impl CapturedRecord {
    /// `No.025 pikachu`
    pub fn label(&self) -> String {
        format!("No.{:03} {}", self.id, self.name)
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}
