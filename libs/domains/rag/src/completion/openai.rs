use async_openai::Client;
use async_openai::config::OpenAIConfig as ClientConfig;
use async_openai::error::OpenAIError;
use async_openai::types::{
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs, CreateChatCompletionStreamResponse,
};
use async_stream::stream;
use async_trait::async_trait;
use futures::StreamExt;

use super::{CompletionProvider, CompletionStream};
use crate::config::OpenAIConfig;
use crate::error::{RagError, RagResult};
use crate::models::{ChatMessage, MessageRole};

/// OpenAI chat-completions provider in streaming mode
pub struct OpenAICompletionProvider {
    client: Client<ClientConfig>,
}

impl OpenAICompletionProvider {
    pub fn new(config: OpenAIConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Reuse an existing connection pool
    pub fn with_client(http: reqwest::Client, config: OpenAIConfig) -> Self {
        let client_config = ClientConfig::new()
            .with_api_key(config.api_key)
            .with_api_base(config.base_url);
        Self {
            client: Client::with_config(client_config).with_http_client(http),
        }
    }
}

fn to_request_message(message: ChatMessage) -> Result<ChatCompletionRequestMessage, OpenAIError> {
    let request_message = match message.role {
        MessageRole::System => ChatCompletionRequestSystemMessageArgs::default()
            .content(message.content)
            .build()?
            .into(),
        MessageRole::User => ChatCompletionRequestUserMessageArgs::default()
            .content(message.content)
            .build()?
            .into(),
        MessageRole::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
            .content(message.content)
            .build()?
            .into(),
    };
    Ok(request_message)
}

/// Text carried by the first choice of a chunk, if any
fn chunk_text(chunk: CreateChatCompletionStreamResponse) -> Option<String> {
    chunk
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.delta.content)
        .filter(|content| !content.is_empty())
}

#[async_trait]
impl CompletionProvider for OpenAICompletionProvider {
    async fn stream(
        &self,
        model: &str,
        messages: Vec<ChatMessage>,
    ) -> RagResult<CompletionStream> {
        let message_count = messages.len();
        let messages = messages
            .into_iter()
            .map(to_request_message)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| RagError::Completion(format!("invalid request: {}", e)))?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(model)
            .messages(messages)
            .build()
            .map_err(|e| RagError::Completion(format!("invalid request: {}", e)))?;

        let mut upstream = self
            .client
            .chat()
            .create_stream(request)
            .await
            .map_err(|e| RagError::Completion(format!("request failed: {}", e)))?;

        // Connection and status failures arrive as the first item
        let first = match upstream.next().await {
            Some(Err(e)) => {
                return Err(RagError::Completion(format!("stream rejected: {}", e)));
            }
            first => first,
        };

        tracing::debug!(model, messages = message_count, "Completion stream opened");

        Ok(Box::pin(stream! {
            let mut next = first;
            while let Some(item) = next {
                match item {
                    Ok(chunk) => {
                        if let Some(text) = chunk_text(chunk) {
                            yield Ok(text);
                        }
                    }
                    Err(e) => {
                        yield Err(RagError::StreamInterrupted(e.to_string()));
                        return;
                    }
                }
                next = upstream.next().await;
            }
        }))
    }
}
