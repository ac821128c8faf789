use std::sync::Arc;

use tracing::{debug, info};

use crate::completion::{CompletionProvider, CompletionStream};
use crate::config::RagOptions;
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, RagResult};
use crate::index::VectorIndex;
use crate::models::{ChatMessage, RetrievalQuery};
use crate::prompt::build_conversation;

/// The retrieval-augmented chat pipeline.
///
/// Embeds the last message, retrieves the nearest professors, appends them to
/// that message and opens a streamed completion. The three upstream calls run
/// strictly in sequence and none is retried.
#[derive(Clone)]
pub struct RagService {
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndex>,
    completion: Arc<dyn CompletionProvider>,
    options: Arc<RagOptions>,
}

impl RagService {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        index: Arc<dyn VectorIndex>,
        completion: Arc<dyn CompletionProvider>,
    ) -> Self {
        Self {
            embedder,
            index,
            completion,
            options: Arc::new(RagOptions::default()),
        }
    }

    pub fn with_options(mut self, options: RagOptions) -> Self {
        self.options = Arc::new(options);
        self
    }

    pub fn options(&self) -> &RagOptions {
        &self.options
    }

    /// Run the pipeline up to the point where the completion starts streaming.
    ///
    /// Every error returned here happens before any response byte is sent.
    pub async fn chat_stream(&self, messages: Vec<ChatMessage>) -> RagResult<CompletionStream> {
        let last = messages.last().ok_or_else(|| {
            RagError::InvalidInput("conversation must contain at least one message".to_string())
        })?;
        if last.content.trim().is_empty() {
            return Err(RagError::InvalidInput(
                "last message content must not be blank".to_string(),
            ));
        }

        info!(messages = messages.len(), "Handling chat request");

        let embedding = self
            .embedder
            .embed(self.options.embedding_model, &last.content)
            .await?;
        debug!(dimension = embedding.dimension(), "Embedded last message");

        let matches = self
            .index
            .query(RetrievalQuery::new(
                embedding.values,
                self.options.result_count,
            ))
            .await?;
        debug!(matches = matches.len(), "Retrieved professor matches");

        let conversation = build_conversation(&self.options.system_prompt, messages, &matches)?;

        self.completion
            .stream(&self.options.completion_model, conversation)
            .await
    }
}
