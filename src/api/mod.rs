//! REST API layer: route handlers, DTOs, OpenAPI document and router
//! composition.
//!
//! Resource endpoints are mounted under `/api/v1`; system endpoints at the
//! root.

pub mod dto;
pub mod handlers;

use axum::Router;
use utoipa::OpenApi;

use crate::app_state::AppState;

/// OpenAPI document for the REST surface.
#[derive(Debug, OpenApi)]
#[openapi(
    info(title = "skirmish-gateway", description = "Session inspection API"),
    paths(
        handlers::system::health_handler,
        handlers::session::list_sessions,
        handlers::session::get_session,
    ),
    components(schemas(
        handlers::system::HealthResponse,
        dto::SessionListResponse,
        dto::SessionDetailResponse,
        crate::domain::SessionSummary,
        crate::domain::Piece,
        crate::domain::PieceKind,
        crate::domain::Side,
        crate::error::ErrorResponse,
        crate::error::ErrorBody,
    )),
    tags(
        (name = "System", description = "Health"),
        (name = "Sessions", description = "Read-only session inspection"),
    )
)]
pub struct ApiDoc;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    let router = Router::new()
        .nest("/api/v1", handlers::routes())
        .merge(handlers::system::routes());

    #[cfg(feature = "swagger-ui")]
    let router = router.merge(
        utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
            .url("/api-docs/openapi.json", ApiDoc::openapi()),
    );

    router
}
