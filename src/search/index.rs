use std::cmp::Ordering;
use std::collections::HashMap;

use tokio::sync::RwLock;

struct IndexEntry {
    user_id: i32,
    embedding: Vec<f32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredMemo {
    pub id: String,
    pub similarity: f32,
}

/// Process-local `memo id -> embedding` map. Every entry remembers its
/// owner so lookups never cross users.
#[derive(Default)]
pub struct VectorIndex {
    entries: RwLock<HashMap<String, IndexEntry>>,
}

impl VectorIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, id: &str, user_id: i32, embedding: Vec<f32>) {
        self.entries
            .write()
            .await
            .insert(id.to_string(), IndexEntry { user_id, embedding });
    }

    pub async fn remove(&self, id: &str) -> bool {
        self.entries.write().await.remove(id).is_some()
    }

    pub async fn clear_user(&self, user_id: i32) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, e| e.user_id != user_id);
        before - entries.len()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    pub async fn len_for_user(&self, user_id: i32) -> usize {
        self.entries
            .read()
            .await
            .values()
            .filter(|e| e.user_id == user_id)
            .count()
    }

    /// Linear scan over the caller's entries, best match first.
    pub async fn search(&self, user_id: i32, query: &[f32], limit: usize) -> Vec<ScoredMemo> {
        let entries = self.entries.read().await;
        let mut results: Vec<ScoredMemo> = entries
            .iter()
            .filter(|(_, e)| e.user_id == user_id)
            .map(|(id, e)| ScoredMemo {
                id: id.clone(),
                similarity: cosine_similarity(query, &e.embedding),
            })
            .collect();
        results.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });
        results.truncate(limit);
        results
    }
}

/// Cosine similarity; mismatched lengths and zero vectors score 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let mut dot = 0f32;
    let mut norm_a = 0f32;
    let mut norm_b = 0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}
