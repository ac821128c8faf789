use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use strum::{Display, EnumString};
use utoipa::ToSchema;

/// Author of a conversation turn
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

/// One turn of a chat conversation.
///
/// The request body of `POST /api/chat` is an array of these, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ChatMessage {
    pub role: MessageRole,
    #[schema(example = "Who teaches database systems?")]
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }
}

/// Dense vector produced by the embedding service
#[derive(Debug, Clone, PartialEq)]
pub struct Embedding {
    pub values: Vec<f32>,
}

impl Embedding {
    pub fn new(values: Vec<f32>) -> Self {
        Self { values }
    }

    pub fn dimension(&self) -> usize {
        self.values.len()
    }
}

/// Metadata stored alongside each professor vector
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchMetadata {
    #[serde(default, deserialize_with = "lenient_text")]
    pub subject: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub stars: Option<f64>,
}

/// Strings verbatim, numbers as their text, anything else absent
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Numbers, or strings holding a number; anything else absent
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// One nearest-neighbour hit, in the order the index returned it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalMatch {
    /// Professor identifier (the record id in the index)
    pub id: String,
    #[serde(default)]
    pub score: Option<f32>,
    #[serde(default)]
    pub metadata: MatchMetadata,
}

impl RetrievalMatch {
    pub fn new(id: impl Into<String>, subject: impl Into<String>, stars: f64) -> Self {
        Self {
            id: id.into(),
            score: None,
            metadata: MatchMetadata {
                subject: Some(subject.into()),
                stars: Some(stars),
            },
        }
    }
}

/// Nearest-neighbour query against the vector index
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievalQuery {
    pub vector: Vec<f32>,
    pub top_k: u32,
}

impl RetrievalQuery {
    pub fn new(vector: Vec<f32>, top_k: u32) -> Self {
        Self { vector, top_k }
    }
}

/// OpenAI embedding model selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
pub enum EmbeddingModel {
    /// text-embedding-3-small (1536 dimensions)
    #[default]
    #[strum(serialize = "text-embedding-3-small")]
    TextEmbedding3Small,
    /// text-embedding-3-large (3072 dimensions)
    #[strum(serialize = "text-embedding-3-large")]
    TextEmbedding3Large,
    /// text-embedding-ada-002 (1536 dimensions, legacy)
    #[strum(serialize = "text-embedding-ada-002")]
    TextEmbeddingAda002,
}

impl EmbeddingModel {
    pub fn dimension(&self) -> u32 {
        match self {
            EmbeddingModel::TextEmbedding3Small => 1536,
            EmbeddingModel::TextEmbedding3Large => 3072,
            EmbeddingModel::TextEmbeddingAda002 => 1536,
        }
    }

    pub fn model_name(&self) -> &'static str {
        match self {
            EmbeddingModel::TextEmbedding3Small => "text-embedding-3-small",
            EmbeddingModel::TextEmbedding3Large => "text-embedding-3-large",
            EmbeddingModel::TextEmbeddingAda002 => "text-embedding-ada-002",
        }
    }
}

/// Which vector database backs retrieval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum VectorBackend {
    #[default]
    Pinecone,
    Qdrant,
}
