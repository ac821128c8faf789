//! Professor RAG Domain Library
//!
//! Retrieval-augmented chat over a vector index of professor reviews. The
//! caller's last message is embedded, the nearest professors are looked up,
//! their metadata is appended to that message, and the model's reply is
//! streamed straight back as plain text.
//!
//! # Architecture
//!
//! ```text
//!                 POST /api/chat
//!                       │
//!              ┌────────▼────────┐
//!              │   RagService    │  ← validation, prompt assembly
//!              └────────┬────────┘
//!      ┌────────────────┼─────────────────┐
//! ┌────▼──────────┐ ┌───▼──────────┐ ┌────▼───────────────┐
//! │ Embedding     │ │ VectorIndex  │ │ CompletionProvider │
//! │ Provider      │ │  (trait)     │ │  (trait)           │
//! └────┬──────────┘ └───┬──────────┘ └────┬───────────────┘
//!      │            ┌───┴─────────┐       │
//! ┌────▼──────┐ ┌───▼─────┐ ┌─────▼──┐ ┌──▼─────────────┐
//! │ OpenAI    │ │Pinecone │ │ Qdrant │ │ OpenAI stream  │
//! └───────────┘ └─────────┘ └────────┘ └──┬─────────────┘
//!                                         │
//!                                  relay::relay_body → response body
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_rag::{
//!     OpenAIConfig, OpenAICompletionProvider, OpenAIEmbeddingProvider, PineconeConfig,
//!     PineconeIndex, RagOptions, RagService,
//! };
//! use core_config::FromEnv;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let openai = OpenAIConfig::from_env()?;
//! let index = PineconeIndex::connect(PineconeConfig::from_env()?).await?;
//!
//! let service = RagService::new(
//!     Arc::new(OpenAIEmbeddingProvider::new(openai.clone())),
//!     Arc::new(index),
//!     Arc::new(OpenAICompletionProvider::new(openai)),
//! )
//! .with_options(RagOptions::from_env()?);
//!
//! let app = axum::Router::new().nest("/api/chat", domain_rag::handlers::router(service));
//! # Ok(())
//! # }
//! ```

pub mod completion;
pub mod config;
pub mod embedding;
pub mod error;
pub mod handlers;
pub mod index;
pub mod models;
pub mod prompt;
pub mod relay;
pub mod service;

// Re-export commonly used types
pub use completion::{CompletionProvider, CompletionStream, OpenAICompletionProvider};
pub use config::{OpenAIConfig, PineconeConfig, QdrantConfig, RagOptions, vector_backend_from_env};
pub use embedding::{EmbeddingProvider, OpenAIEmbeddingProvider};
pub use error::{RagError, RagResult};
pub use handlers::ApiDoc;
pub use index::{PineconeIndex, QdrantIndex, VectorIndex};
pub use models::{
    ChatMessage, Embedding, EmbeddingModel, MatchMetadata, MessageRole, RetrievalMatch,
    RetrievalQuery, VectorBackend,
};
pub use service::RagService;
