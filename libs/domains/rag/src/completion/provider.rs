use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;

use crate::error::RagResult;
use crate::models::ChatMessage;

/// Ordered text fragments of one streamed completion.
///
/// Ends after the last fragment. An `Err` item is a mid-stream fault and is
/// always the final item.
pub type CompletionStream = Pin<Box<dyn Stream<Item = RagResult<String>> + Send>>;

/// Trait for streaming chat-completion providers
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Open a streamed completion for `messages`.
    ///
    /// Resolves once the upstream has accepted the request; failures to get
    /// that far are returned here rather than through the stream.
    async fn stream(&self, model: &str, messages: Vec<ChatMessage>)
    -> RagResult<CompletionStream>;
}
