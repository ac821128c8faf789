use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    PointId, ScoredPoint, SearchPointsBuilder, Value as QdrantValue, point_id::PointIdOptions,
    value::Kind,
};
use tracing::{debug, info};

use super::VectorIndex;
use crate::config::QdrantConfig;
use crate::error::{RagError, RagResult};
use crate::models::{MatchMetadata, RetrievalMatch, RetrievalQuery};

/// Payload keys checked, in order, for the professor identifier
const ID_KEYS: [&str; 2] = ["id", "professor"];

/// Qdrant-backed index: one collection whose payload carries the metadata
pub struct QdrantIndex {
    client: Qdrant,
    collection: String,
}

impl QdrantIndex {
    pub fn new(config: QdrantConfig) -> RagResult<Self> {
        let mut builder = Qdrant::from_url(&config.url);

        if let Some(api_key) = config.api_key {
            builder = builder.api_key(api_key);
        }

        builder = builder.timeout(Duration::from_secs(config.timeout_secs));

        let client = builder
            .build()
            .map_err(|e| RagError::Config(format!("Failed to build Qdrant client: {}", e)))?;

        info!(url = %config.url, collection = %config.collection, "Qdrant index configured");

        Ok(Self::from_client(client, config.collection))
    }

    pub fn from_client(client: Qdrant, collection: String) -> Self {
        Self { client, collection }
    }
}

fn payload_string(payload: &HashMap<String, QdrantValue>, key: &str) -> Option<String> {
    match payload.get(key)?.kind.as_ref()? {
        Kind::StringValue(s) => Some(s.clone()),
        Kind::IntegerValue(i) => Some(i.to_string()),
        _ => None,
    }
}

fn payload_number(payload: &HashMap<String, QdrantValue>, key: &str) -> Option<f64> {
    match payload.get(key)?.kind.as_ref()? {
        Kind::DoubleValue(f) => Some(*f),
        Kind::IntegerValue(i) => Some(*i as f64),
        Kind::StringValue(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn point_id_to_string(point_id: &PointId) -> Option<String> {
    match point_id.point_id_options.as_ref()? {
        PointIdOptions::Uuid(uuid) => Some(uuid.clone()),
        PointIdOptions::Num(num) => Some(num.to_string()),
    }
}

fn scored_point_to_match(point: ScoredPoint) -> RagResult<RetrievalMatch> {
    let id = ID_KEYS
        .iter()
        .find_map(|key| payload_string(&point.payload, key))
        .or_else(|| point.id.as_ref().and_then(point_id_to_string))
        .ok_or_else(|| RagError::Retrieval("Qdrant point has no identifier".to_string()))?;

    Ok(RetrievalMatch {
        id,
        score: Some(point.score),
        metadata: MatchMetadata {
            subject: payload_string(&point.payload, "subject"),
            stars: payload_number(&point.payload, "stars"),
        },
    })
}

#[async_trait]
impl VectorIndex for QdrantIndex {
    async fn query(&self, query: RetrievalQuery) -> RagResult<Vec<RetrievalMatch>> {
        let builder = SearchPointsBuilder::new(&self.collection, query.vector, query.top_k as u64)
            .with_payload(true);

        let response = self.client.search_points(builder).await?;

        debug!(matches = response.result.len(), "Qdrant search complete");

        response
            .result
            .into_iter()
            .map(scored_point_to_match)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(id: PointId, payload: Vec<(&str, QdrantValue)>, score: f32) -> ScoredPoint {
        ScoredPoint {
            id: Some(id),
            payload: payload
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
            score,
            ..Default::default()
        }
    }

    #[test]
    fn test_payload_id_takes_precedence_over_point_id() {
        let p = point(
            PointId::from(7u64),
            vec![
                ("professor", QdrantValue::from("Dr. Alice Chen")),
                ("subject", QdrantValue::from("Database Systems")),
                ("stars", QdrantValue::from(5i64)),
            ],
            0.9,
        );

        let m = scored_point_to_match(p).unwrap();
        assert_eq!(m.id, "Dr. Alice Chen");
        assert_eq!(m.score, Some(0.9));
        assert_eq!(m.metadata.subject.as_deref(), Some("Database Systems"));
        assert_eq!(m.metadata.stars, Some(5.0));
    }

    #[test]
    fn test_falls_back_to_point_id() {
        let p = point(
            PointId::from("6f1b2a8e-3c1d-4a43-9d3e-0b1f4c2e9a77".to_string()),
            vec![("stars", QdrantValue::from(3.5f64))],
            0.5,
        );

        let m = scored_point_to_match(p).unwrap();
        assert_eq!(m.id, "6f1b2a8e-3c1d-4a43-9d3e-0b1f4c2e9a77");
        assert_eq!(m.metadata.subject, None);
        assert_eq!(m.metadata.stars, Some(3.5));
    }

    #[test]
    fn test_point_without_any_id_is_retrieval_error() {
        let p = ScoredPoint::default();
        assert!(matches!(
            scored_point_to_match(p),
            Err(RagError::Retrieval(_))
        ));
    }

    #[tokio::test]
    async fn test_new_builds_client_from_config() {
        let config = QdrantConfig::default().with_collection("professors".to_string());
        let index = QdrantIndex::new(config).unwrap();
        assert_eq!(index.collection, "professors");
    }
}
