use async_trait::async_trait;

use crate::error::RagResult;
use crate::models::{Embedding, EmbeddingModel};

/// Trait for embedding generation providers
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate the embedding for a single text
    async fn embed(&self, model: EmbeddingModel, text: &str) -> RagResult<Embedding>;
}
