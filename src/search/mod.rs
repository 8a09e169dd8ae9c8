//! Semantic memo search: an [`Embedder`] plus the in-memory [`VectorIndex`].

pub mod embedder;
pub mod index;

use std::sync::Arc;

use log::{debug, info, warn};
use sea_orm::{DatabaseConnection, DbErr, EntityTrait};

use crate::config::AppConfig;
use crate::entity::memo;

pub use embedder::{Embedder, EmbeddingError, HashingEmbedder, RemoteEmbedder};
pub use index::{cosine_similarity, ScoredMemo, VectorIndex};

pub struct SearchService {
    index: VectorIndex,
    embedder: Arc<dyn Embedder>,
}

impl SearchService {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            index: VectorIndex::new(),
            embedder,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        let embedder: Arc<dyn Embedder> = match &config.embedding_url {
            Some(url) => {
                info!("using remote embeddings at {} ({})", url, config.embedding_model);
                Arc::new(RemoteEmbedder::new(
                    url,
                    config.embedding_model.clone(),
                    config.embedding_api_key.clone(),
                ))
            }
            None => {
                info!(
                    "EMBEDDING_URL not set, using hashing embeddings ({} dims)",
                    config.embedding_dimensions
                );
                Arc::new(HashingEmbedder::new(config.embedding_dimensions))
            }
        };
        Self::new(embedder)
    }

    pub async fn index_memo(&self, user_id: i32, id: &str, content: &str) -> Result<(), EmbeddingError> {
        let embedding = self.embedder.embed(content).await?;
        self.index.insert(id, user_id, embedding).await;
        debug!("indexed memo {}", id);
        Ok(())
    }

    /// Indexes non-blank content and drops blank memos from the index.
    /// Embedding failures are logged; the memo write they follow still stands.
    pub async fn sync_memo(&self, user_id: i32, id: &str, content: &str) {
        if content.trim().is_empty() {
            self.remove_memo(id).await;
            return;
        }
        if let Err(e) = self.index_memo(user_id, id, content).await {
            warn!("indexing memo {} failed: {}", id, e);
        }
    }

    pub async fn remove_memo(&self, id: &str) {
        if self.index.remove(id).await {
            debug!("removed memo {} from index", id);
        }
    }

    pub async fn clear_user(&self, user_id: i32) -> usize {
        self.index.clear_user(user_id).await
    }

    pub async fn search(
        &self,
        user_id: i32,
        query: &str,
        limit: usize,
    ) -> Result<Vec<ScoredMemo>, EmbeddingError> {
        if self.index.len_for_user(user_id).await == 0 {
            return Ok(Vec::new());
        }
        let query_embedding = self.embedder.embed(query).await?;
        Ok(self.index.search(user_id, &query_embedding, limit).await)
    }

    pub async fn len(&self) -> usize {
        self.index.len().await
    }

    pub async fn is_empty(&self) -> bool {
        self.index.is_empty().await
    }

    /// Indexes every stored memo; used once at startup.
    pub async fn warm_up(&self, db: &DatabaseConnection) -> Result<usize, DbErr> {
        let memos = memo::Entity::find().all(db).await?;
        let mut indexed = 0;
        for m in memos.iter().filter(|m| !m.content.trim().is_empty()) {
            match self.index_memo(m.user_id, &m.id, &m.content).await {
                Ok(()) => indexed += 1,
                Err(e) => warn!("warm-up indexing of memo {} failed: {}", m.id, e),
            }
        }
        info!("vector index warmed up with {} memos", indexed);
        Ok(indexed)
    }
}
