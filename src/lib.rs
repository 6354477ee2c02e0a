pub mod api;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod services;
pub mod utils;

use crate::services::transfer::TransferService;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Multipart framing allowance on top of the payload ceiling
const MULTIPART_OVERHEAD: usize = 1024 * 1024;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::handlers::upload::upload_file,
        api::handlers::health::health,
    ),
    components(
        schemas(
            api::handlers::upload::UploadForm,
            api::handlers::upload::UploadResponse,
            api::handlers::health::HealthResponse,
            models::FileDetails,
        )
    ),
    tags(
        (name = "upload", description = "CSV upload to object storage"),
        (name = "system", description = "Service status")
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<TransferService>,
}

pub fn create_app(state: AppState) -> Router {
    let body_limit = usize::try_from(state.service.config().bucket_size_limit_bytes)
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/", get(api::handlers::upload::upload_form))
        .route(
            "/upload",
            post(api::handlers::upload::upload_file).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route("/health", get(api::handlers::health::health))
        .with_state(state)
}
