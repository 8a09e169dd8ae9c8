pub mod enums;
pub mod memo;
pub mod todo;
pub mod user;

pub use enums::{Category, Priority, TodoStatus};

use chrono::Utc;
use rand::{distributions::Alphanumeric, Rng};

/// Serializes a tag list for the TEXT `tags` column.
pub fn encode_tags(tags: &[String]) -> String {
    serde_json::to_string(tags).unwrap_or_else(|_| "[]".to_string())
}

/// Reads the `tags` column; malformed values read as no tags.
pub fn decode_tags(raw: &str) -> Vec<String> {
    serde_json::from_str(raw).unwrap_or_default()
}

/// Trims names, drops blanks and repeats, keeping first-seen order.
pub fn merge_tags<'a>(groups: impl IntoIterator<Item = &'a [String]>) -> Vec<String> {
    let mut merged: Vec<String> = Vec::new();
    for group in groups {
        for tag in group {
            let tag = tag.trim();
            if !tag.is_empty() && !merged.iter().any(|t| t == tag) {
                merged.push(tag.to_string());
            }
        }
    }
    merged
}

/// Row id in the `memo_<millis>_<suffix>` shape clients already send.
pub fn new_id(prefix: &str) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(8)
        .map(char::from)
        .collect();
    format!("{}_{}_{}", prefix, Utc::now().timestamp_millis(), suffix.to_lowercase())
}
