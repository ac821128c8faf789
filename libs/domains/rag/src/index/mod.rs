mod pinecone;
mod qdrant;
mod repository;

pub use pinecone::PineconeIndex;
pub use qdrant::QdrantIndex;
pub use repository::VectorIndex;

#[cfg(test)]
pub use repository::MockVectorIndex;
