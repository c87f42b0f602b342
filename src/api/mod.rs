//! REST API layer: route handlers, DTOs, and router composition.
//!
//! All endpoints are mounted under `/api/v1`.

pub mod dto;
pub mod handlers;

use axum::Router;
use utoipa::OpenApi;

use crate::app_state::AppState;

/// OpenAPI document covering every REST endpoint.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "estate-gateway",
        description = "Residential community management console API: visitor reconciliation, announcements, and feedback."
    ),
    paths(
        handlers::visitor::register_visitor,
        handlers::visitor::list_visitors,
        handlers::visitor::visitor_stats,
        handlers::visitor::get_visitor,
        handlers::visitor::scan_visitor,
        handlers::announcement::create_announcement,
        handlers::announcement::list_announcements,
        handlers::announcement::get_announcement,
        handlers::announcement::update_announcement,
        handlers::announcement::delete_announcement,
        handlers::feedback::submit_feedback,
        handlers::feedback::list_feedback,
        handlers::system::health_handler,
    ),
    tags(
        (name = "Visitors", description = "Visitor registration, scans, and statistics"),
        (name = "Announcements", description = "Community announcement board"),
        (name = "Feedback", description = "Resident feedback and ratings"),
        (name = "System", description = "Health and service metadata"),
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
