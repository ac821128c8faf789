//! Environment-driven configuration for the chat pipeline and its upstreams.

use core_config::{ConfigError, FromEnv, env_optional, env_or_default, env_parse_or, env_required};

use crate::models::{EmbeddingModel, VectorBackend};
use crate::prompt::DEFAULT_SYSTEM_PROMPT;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_PINECONE_CONTROL_URL: &str = "https://api.pinecone.io";
pub const DEFAULT_COMPLETION_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_RESULT_COUNT: u32 = 5;

/// OpenAI credentials shared by the embedding and completion providers
#[derive(Clone)]
pub struct OpenAIConfig {
    pub api_key: String,
    pub base_url: String,
}

impl OpenAIConfig {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }
}

impl std::fmt::Debug for OpenAIConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAIConfig")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl FromEnv for OpenAIConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let api_key = env_required("OPENAI_API_KEY")?;
        let base_url = env_or_default("OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL);
        Ok(Self::new(api_key).with_base_url(base_url))
    }
}

/// Pinecone index location and credentials
#[derive(Clone)]
pub struct PineconeConfig {
    pub api_key: String,
    pub index_name: String,
    pub namespace: String,
    /// Data-plane host. When unset it is resolved from `index_name`.
    pub index_host: Option<String>,
    pub control_url: String,
}

impl PineconeConfig {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            index_name: "rag".to_string(),
            namespace: "ns1".to_string(),
            index_host: None,
            control_url: DEFAULT_PINECONE_CONTROL_URL.to_string(),
        }
    }

    pub fn with_index(mut self, index_name: String) -> Self {
        self.index_name = index_name;
        self
    }

    pub fn with_namespace(mut self, namespace: String) -> Self {
        self.namespace = namespace;
        self
    }

    pub fn with_index_host(mut self, host: String) -> Self {
        self.index_host = Some(host);
        self
    }

    pub fn with_control_url(mut self, control_url: String) -> Self {
        self.control_url = control_url.trim_end_matches('/').to_string();
        self
    }
}

impl std::fmt::Debug for PineconeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PineconeConfig")
            .field("api_key", &"***")
            .field("index_name", &self.index_name)
            .field("namespace", &self.namespace)
            .field("index_host", &self.index_host)
            .field("control_url", &self.control_url)
            .finish()
    }
}

impl FromEnv for PineconeConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::new(env_required("PINECONE_API_KEY")?)
            .with_index(env_or_default("PINECONE_INDEX", "rag"))
            .with_namespace(env_or_default("PINECONE_NAMESPACE", "ns1"))
            .with_control_url(env_or_default(
                "PINECONE_CONTROL_URL",
                DEFAULT_PINECONE_CONTROL_URL,
            ));

        if let Some(host) = env_optional("PINECONE_INDEX_HOST") {
            config = config.with_index_host(host);
        }

        Ok(config)
    }
}

/// Qdrant connection configuration
#[derive(Debug, Clone)]
pub struct QdrantConfig {
    pub url: String,
    pub api_key: Option<String>,
    pub collection: String,
    pub timeout_secs: u64,
}

impl QdrantConfig {
    pub fn new(url: String) -> Self {
        Self {
            url,
            api_key: None,
            collection: "professors".to_string(),
            timeout_secs: 30,
        }
    }

    pub fn with_api_key(mut self, api_key: String) -> Self {
        self.api_key = Some(api_key);
        self
    }

    pub fn with_collection(mut self, collection: String) -> Self {
        self.collection = collection;
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for QdrantConfig {
    fn default() -> Self {
        Self::new("http://localhost:6334".to_string())
    }
}

impl FromEnv for QdrantConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::new(env_or_default("QDRANT_URL", "http://localhost:6334"))
            .with_collection(env_or_default("QDRANT_COLLECTION", "professors"))
            .with_timeout(env_parse_or("QDRANT_TIMEOUT_SECS", 30)?);

        if let Some(api_key) = env_optional("QDRANT_API_KEY") {
            config = config.with_api_key(api_key);
        }

        Ok(config)
    }
}

/// Per-request pipeline settings
#[derive(Debug, Clone)]
pub struct RagOptions {
    /// Number of nearest neighbours requested from the index
    pub result_count: u32,
    pub system_prompt: String,
    pub embedding_model: EmbeddingModel,
    pub completion_model: String,
}

impl RagOptions {
    pub fn with_result_count(mut self, result_count: u32) -> Self {
        self.result_count = result_count;
        self
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    pub fn with_completion_model(mut self, model: impl Into<String>) -> Self {
        self.completion_model = model.into();
        self
    }
}

impl Default for RagOptions {
    fn default() -> Self {
        Self {
            result_count: DEFAULT_RESULT_COUNT,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            embedding_model: EmbeddingModel::default(),
            completion_model: DEFAULT_COMPLETION_MODEL.to_string(),
        }
    }
}

impl FromEnv for RagOptions {
    fn from_env() -> Result<Self, ConfigError> {
        let result_count: u32 = env_parse_or("RAG_RESULT_COUNT", DEFAULT_RESULT_COUNT)?;
        if result_count == 0 {
            return Err(ConfigError::ParseError {
                key: "RAG_RESULT_COUNT".to_string(),
                details: "must be greater than zero".to_string(),
            });
        }

        Ok(Self {
            result_count,
            system_prompt: env_optional("RAG_SYSTEM_PROMPT")
                .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
            embedding_model: env_parse_or("EMBEDDING_MODEL", EmbeddingModel::default())?,
            completion_model: env_or_default("COMPLETION_MODEL", DEFAULT_COMPLETION_MODEL),
        })
    }
}

/// Selects the retrieval backend from `VECTOR_BACKEND`
pub fn vector_backend_from_env() -> Result<VectorBackend, ConfigError> {
    env_parse_or("VECTOR_BACKEND", VectorBackend::default())
}
