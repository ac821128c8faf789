//! Application state management.
//!
//! Builds the upstream clients once at startup and shares them across
//! requests as immutable `Arc` handles.

use std::sync::Arc;

use domain_rag::{
    OpenAICompletionProvider, OpenAIEmbeddingProvider, PineconeIndex, QdrantIndex, RagService,
    VectorIndex,
};
use tracing::info;

use crate::config::{Config, IndexConfig};

/// Shared application state.
///
/// Cloning is cheap: the service only holds `Arc`s.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub rag: RagService,
}

impl AppState {
    pub async fn new(config: Config) -> eyre::Result<Self> {
        // One connection pool for every OpenAI and Pinecone call
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| eyre::eyre!("Failed to build HTTP client: {}", e))?;

        let index: Arc<dyn VectorIndex> = match config.index.clone() {
            IndexConfig::Pinecone(pinecone) => {
                info!("Using Pinecone index '{}'", pinecone.index_name);
                Arc::new(PineconeIndex::connect_with_client(http.clone(), pinecone).await?)
            }
            IndexConfig::Qdrant(qdrant) => {
                info!("Using Qdrant collection '{}' at {}", qdrant.collection, qdrant.url);
                Arc::new(QdrantIndex::new(qdrant)?)
            }
        };

        let rag = RagService::new(
            Arc::new(OpenAIEmbeddingProvider::with_client(
                http.clone(),
                config.openai.clone(),
            )),
            index,
            Arc::new(OpenAICompletionProvider::with_client(
                http,
                config.openai.clone(),
            )),
        )
        .with_options(config.rag.clone());

        Ok(Self { config, rag })
    }
}
