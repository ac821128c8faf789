use async_trait::async_trait;

use crate::error::RagResult;
use crate::models::{RetrievalMatch, RetrievalQuery};

/// Nearest-neighbour lookup over the professor index.
///
/// Implementations return matches in the index's own ranking order and
/// apply no re-ranking, filtering or dedup.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VectorIndex: Send + Sync {
    async fn query(&self, query: RetrievalQuery) -> RagResult<Vec<RetrievalMatch>>;
}
