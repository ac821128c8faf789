use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::VectorIndex;
use crate::config::PineconeConfig;
use crate::error::{RagError, RagResult};
use crate::models::{RetrievalMatch, RetrievalQuery};

const API_VERSION: &str = "2025-01";

/// Pinecone-backed index over the REST data plane.
///
/// Queries always target one namespace of one index. The data-plane host
/// is resolved once in [`PineconeIndex::connect`].
pub struct PineconeIndex {
    client: Client,
    api_key: String,
    namespace: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct DescribeIndexResponse {
    host: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    namespace: &'a str,
    vector: &'a [f32],
    top_k: u32,
    include_metadata: bool,
    include_values: bool,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<RetrievalMatch>,
}

impl PineconeIndex {
    /// Connect to the configured index, looking up its host through the
    /// control plane unless one is configured explicitly.
    pub async fn connect(config: PineconeConfig) -> RagResult<Self> {
        Self::connect_with_client(Client::new(), config).await
    }

    pub async fn connect_with_client(client: Client, config: PineconeConfig) -> RagResult<Self> {
        let host = match config.index_host {
            Some(host) => host,
            None => describe_index_host(&client, &config).await?,
        };
        let base_url = normalize_host(&host);

        info!(
            index = %config.index_name,
            namespace = %config.namespace,
            host = %base_url,
            "Connected to Pinecone index"
        );

        Ok(Self {
            client,
            api_key: config.api_key,
            namespace: config.namespace,
            base_url,
        })
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("Api-Key", &self.api_key)
            .header("X-Pinecone-API-Version", API_VERSION)
    }
}

async fn describe_index_host(client: &Client, config: &PineconeConfig) -> RagResult<String> {
    let response = client
        .get(format!("{}/indexes/{}", config.control_url, config.index_name))
        .header("Api-Key", &config.api_key)
        .header("X-Pinecone-API-Version", API_VERSION)
        .send()
        .await
        .map_err(|e| RagError::Retrieval(format!("index lookup failed: {}", e)))?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        return Err(RagError::Retrieval(format!(
            "Pinecone index '{}' lookup failed ({}): {}",
            config.index_name, status, error_text
        )));
    }

    let described: DescribeIndexResponse = response
        .json()
        .await
        .map_err(|e| RagError::Retrieval(format!("invalid index description: {}", e)))?;

    Ok(described.host)
}

/// Pinecone reports bare hostnames; local emulators and tests use full URLs.
fn normalize_host(host: &str) -> String {
    let host = host.trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{}", host)
    }
}

#[async_trait]
impl VectorIndex for PineconeIndex {
    async fn query(&self, query: RetrievalQuery) -> RagResult<Vec<RetrievalMatch>> {
        let request = QueryRequest {
            namespace: &self.namespace,
            vector: &query.vector,
            top_k: query.top_k,
            include_metadata: true,
            include_values: false,
        };

        let response = self
            .authorized(self.client.post(format!("{}/query", self.base_url)))
            .json(&request)
            .send()
            .await
            .map_err(|e| RagError::Retrieval(format!("query failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(RagError::Retrieval(format!(
                "Pinecone API error ({}): {}",
                status, error_text
            )));
        }

        let body: QueryResponse = response
            .json()
            .await
            .map_err(|e| RagError::Retrieval(format!("invalid query response: {}", e)))?;

        debug!(matches = body.matches.len(), "Pinecone query complete");

        Ok(body.matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn config(server: &mockito::ServerGuard) -> PineconeConfig {
        PineconeConfig::new("pc-key".to_string()).with_control_url(server.url())
    }

    #[test]
    fn test_normalize_host() {
        assert_eq!(
            normalize_host("rag-abc123.svc.aped-4627-b74a.pinecone.io"),
            "https://rag-abc123.svc.aped-4627-b74a.pinecone.io"
        );
        assert_eq!(normalize_host("http://localhost:5081/"), "http://localhost:5081");
    }

    #[tokio::test]
    async fn test_connect_resolves_host_from_control_plane() {
        let mut server = mockito::Server::new_async().await;
        let describe = server
            .mock("GET", "/indexes/rag")
            .match_header("api-key", "pc-key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({"name": "rag", "dimension": 1536, "host": server.url()}).to_string())
            .create_async()
            .await;
        let query = server
            .mock("POST", "/query")
            .match_header("api-key", "pc-key")
            .match_body(Matcher::Json(json!({
                "namespace": "ns1",
                "vector": [0.5, 0.25],
                "topK": 5,
                "includeMetadata": true,
                "includeValues": false
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "matches": [
                        {"id": "Dr. Alice Chen", "score": 0.91, "metadata": {"subject": "Database Systems", "stars": 5}},
                        {"id": "Dr. Bob Patel", "score": 0.87, "metadata": {"subject": "Distributed Systems", "stars": 4.5, "review": "Great"}}
                    ],
                    "namespace": "ns1"
                })
                .to_string(),
            )
            .create_async()
            .await;

        let index = PineconeIndex::connect(config(&server)).await.unwrap();
        let matches = index
            .query(RetrievalQuery::new(vec![0.5, 0.25], 5))
            .await
            .unwrap();

        describe.assert_async().await;
        query.assert_async().await;
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].id, "Dr. Alice Chen");
        assert_eq!(matches[0].metadata.stars, Some(5.0));
        assert_eq!(matches[1].metadata.subject.as_deref(), Some("Distributed Systems"));
    }

    #[tokio::test]
    async fn test_query_accepts_loosely_typed_metadata() {
        let mut server = mockito::Server::new_async().await;
        let _query = server
            .mock("POST", "/query")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "matches": [
                        {"id": "Dr. Alice Chen", "metadata": {"subject": 101, "stars": "4.5"}},
                        {"id": "Dr. Bob Patel", "metadata": {"subject": ["Networks"], "stars": "n/a"}}
                    ]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let index = PineconeIndex::connect(config(&server).with_index_host(server.url()))
            .await
            .unwrap();
        let matches = index
            .query(RetrievalQuery::new(vec![0.5], 5))
            .await
            .unwrap();

        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].metadata.subject.as_deref(), Some("101"));
        assert_eq!(matches[0].metadata.stars, Some(4.5));
        assert_eq!(matches[1].metadata.subject, None);
        assert_eq!(matches[1].metadata.stars, None);
    }

    #[tokio::test]
    async fn test_explicit_host_skips_control_plane() {
        let mut server = mockito::Server::new_async().await;
        let describe = server
            .mock("GET", Matcher::Any)
            .expect(0)
            .create_async()
            .await;
        let _query = server
            .mock("POST", "/query")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"matches": []}"#)
            .create_async()
            .await;

        let config = config(&server).with_index_host(server.url());
        let index = PineconeIndex::connect(config).await.unwrap();
        let matches = index.query(RetrievalQuery::new(vec![1.0], 3)).await.unwrap();

        describe.assert_async().await;
        assert!(matches.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_index_fails_to_connect() {
        let mut server = mockito::Server::new_async().await;
        let _describe = server
            .mock("GET", "/indexes/rag")
            .with_status(404)
            .with_body(r#"{"error":{"code":"NOT_FOUND"}}"#)
            .create_async()
            .await;

        let result = PineconeIndex::connect(config(&server)).await;
        assert!(matches!(result, Err(RagError::Retrieval(ref msg)) if msg.contains("404")));
    }

    #[tokio::test]
    async fn test_query_error_status_is_retrieval_error() {
        let mut server = mockito::Server::new_async().await;
        let _query = server
            .mock("POST", "/query")
            .with_status(500)
            .with_body("upstream exploded")
            .create_async()
            .await;

        let index = PineconeIndex::connect(config(&server).with_index_host(server.url()))
            .await
            .unwrap();
        let err = index
            .query(RetrievalQuery::new(vec![1.0], 5))
            .await
            .unwrap_err();

        assert!(matches!(err, RagError::Retrieval(ref msg) if msg.contains("upstream exploded")));
    }
}
