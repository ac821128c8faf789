use core_config::{app_info, server::ServerConfig, AppInfo, FromEnv};
use domain_rag::{
    vector_backend_from_env, OpenAIConfig, PineconeConfig, QdrantConfig, RagOptions,
    VectorBackend,
};

// Re-export Environment for use in other modules
pub use core_config::Environment;

/// Vector index selected by `VECTOR_BACKEND`
#[derive(Clone, Debug)]
pub enum IndexConfig {
    Pinecone(PineconeConfig),
    Qdrant(QdrantConfig),
}

impl IndexConfig {
    pub fn from_env() -> eyre::Result<Self> {
        Ok(match vector_backend_from_env()? {
            VectorBackend::Pinecone => IndexConfig::Pinecone(PineconeConfig::from_env()?),
            VectorBackend::Qdrant => IndexConfig::Qdrant(QdrantConfig::from_env()?),
        })
    }
}

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub server: ServerConfig,
    pub environment: Environment,
    pub openai: OpenAIConfig,
    pub index: IndexConfig,
    pub rag: RagOptions,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?; // Uses defaults: HOST=0.0.0.0, PORT=8080
        let openai = OpenAIConfig::from_env()?; // Required - will fail if not set
        let index = IndexConfig::from_env()?;
        let rag = RagOptions::from_env()?;

        Ok(Self {
            app: app_info!(),
            server,
            environment,
            openai,
            index,
            rag,
        })
    }
}
