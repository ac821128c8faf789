use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::EmbeddingProvider;
use crate::config::OpenAIConfig;
use crate::error::{RagError, RagResult};
use crate::models::{Embedding, EmbeddingModel};

/// OpenAI embeddings provider
pub struct OpenAIEmbeddingProvider {
    client: Client,
    config: OpenAIConfig,
}

impl OpenAIEmbeddingProvider {
    pub fn new(config: OpenAIConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    /// Reuse an existing connection pool
    pub fn with_client(client: Client, config: OpenAIConfig) -> Self {
        Self { client, config }
    }
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
    encoding_format: &'static str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[async_trait]
impl EmbeddingProvider for OpenAIEmbeddingProvider {
    async fn embed(&self, model: EmbeddingModel, text: &str) -> RagResult<Embedding> {
        let request = EmbeddingRequest {
            model: model.model_name(),
            input: text,
            encoding_format: "float",
        };

        let response = self
            .client
            .post(format!("{}/embeddings", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| RagError::Embedding(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(RagError::Embedding(format!(
                "OpenAI API error ({}): {}",
                status, error_text
            )));
        }

        let embedding_response: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| RagError::Embedding(format!("invalid response body: {}", e)))?;

        let values = embedding_response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| RagError::Embedding("No embedding returned".to_string()))?;

        tracing::debug!(model = %model, dimension = values.len(), "Embedding generated");

        Ok(Embedding::new(values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn provider(server: &mockito::ServerGuard) -> OpenAIEmbeddingProvider {
        OpenAIEmbeddingProvider::new(
            OpenAIConfig::new("sk-test".to_string()).with_base_url(server.url()),
        )
    }

    #[tokio::test]
    async fn test_embed_sends_model_and_float_format() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/embeddings")
            .match_header("authorization", "Bearer sk-test")
            .match_body(Matcher::Json(json!({
                "model": "text-embedding-3-small",
                "input": "Who teaches database systems?",
                "encoding_format": "float"
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "object": "list",
                    "data": [{"object": "embedding", "index": 0, "embedding": [0.1, -0.2, 0.3]}],
                    "model": "text-embedding-3-small",
                    "usage": {"prompt_tokens": 6, "total_tokens": 6}
                })
                .to_string(),
            )
            .create_async()
            .await;

        let embedding = provider(&server)
            .embed(EmbeddingModel::TextEmbedding3Small, "Who teaches database systems?")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(embedding.values, vec![0.1, -0.2, 0.3]);
        assert_eq!(embedding.dimension(), 3);
    }

    #[tokio::test]
    async fn test_embed_non_success_status_is_embedding_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/embeddings")
            .with_status(401)
            .with_body(r#"{"error":{"message":"Incorrect API key provided"}}"#)
            .create_async()
            .await;

        let err = provider(&server)
            .embed(EmbeddingModel::TextEmbedding3Small, "hello")
            .await
            .unwrap_err();

        assert!(matches!(err, RagError::Embedding(ref msg) if msg.contains("401")));
    }

    #[tokio::test]
    async fn test_embed_empty_data_is_embedding_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/embeddings")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"data":[]}"#)
            .create_async()
            .await;

        let err = provider(&server)
            .embed(EmbeddingModel::TextEmbedding3Small, "hello")
            .await
            .unwrap_err();

        assert!(matches!(err, RagError::Embedding(_)));
    }
}
