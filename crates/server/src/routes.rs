use std::sync::Arc;

use axum::{
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;
use service::swift_code::{repository::SwiftCodeRepository, SwiftCodeService};

use crate::openapi::ApiDoc;

pub mod swift_codes;

/// Record manager shared by all handlers, over whichever store the process runs with.
pub type DynSwiftCodeService = SwiftCodeService<dyn SwiftCodeRepository>;

#[derive(Clone)]
pub struct ServerState {
    pub swift_codes: Arc<DynSwiftCodeService>,
}

impl ServerState {
    pub fn new(repo: Arc<dyn SwiftCodeRepository>) -> Self {
        Self { swift_codes: Arc::new(SwiftCodeService::new(repo)) }
    }
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the full application router.
///
/// Code routes are served under `/v1/codes` and, for older clients, `/v1/swift-codes`.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let codes = Router::new()
        .route("/", post(swift_codes::create))
        .route("/country/:country_iso2", get(swift_codes::list_by_country))
        .route("/:swift_code", get(swift_codes::get).delete(swift_codes::delete));

    Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .nest("/v1/codes", codes.clone())
        .nest("/v1/swift-codes", codes)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 5xx at ERROR
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
