use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    components(
        schemas(axum_helpers::ErrorResponse)
    ),
    info(
        title = "Professor RAG API",
        version = "0.1.0",
        description = "Streams professor recommendations grounded in a vector index of student reviews"
    ),
    servers(
        (url = "/api", description = "API base path")
    ),
    nest(
        (path = "/chat", api = domain_rag::ApiDoc)
    )
)]
pub struct ApiDoc;
