use axum::{
    Json, Router,
    body::Body,
    extract::{State, rejection::JsonRejection},
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
    routing::post,
};
use axum_helpers::ErrorResponse;
use utoipa::OpenApi;

use crate::error::RagResult;
use crate::models::{ChatMessage, MessageRole};
use crate::relay::relay_body;
use crate::service::RagService;

/// OpenAPI documentation for the chat API
#[derive(OpenApi)]
#[openapi(
    paths(chat),
    components(schemas(ChatMessage, MessageRole, ErrorResponse)),
    tags(
        (name = "chat", description = "Retrieval-augmented professor recommendations")
    )
)]
pub struct ApiDoc;

/// Create the chat router
pub fn router(service: RagService) -> Router {
    Router::new().route("/", post(chat)).with_state(service)
}

/// Stream a professor recommendation for a conversation.
///
/// The body is raw generated text delivered in chunks as the model produces
/// it. Errors detected before the first chunk come back as JSON; a failure
/// after that aborts the connection.
#[utoipa::path(
    post,
    path = "",
    tag = "chat",
    request_body(content = Vec<ChatMessage>, description = "Conversation, oldest message first"),
    responses(
        (status = 200, description = "Streamed completion text", content_type = "text/plain", body = String),
        (status = 400, description = "Empty or malformed conversation", body = ErrorResponse),
        (status = 502, description = "Embedding, retrieval or completion upstream failed", body = ErrorResponse)
    )
)]
pub async fn chat(
    State(service): State<RagService>,
    payload: Result<Json<Vec<ChatMessage>>, JsonRejection>,
) -> RagResult<Response> {
    let Json(messages) = payload?;

    let completion = service.chat_stream(messages).await?;

    let mut response = Body::from_stream(relay_body(completion)).into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert("x-accel-buffering", HeaderValue::from_static("no"));

    Ok(response)
}
