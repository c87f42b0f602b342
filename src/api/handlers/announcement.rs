//! Announcement board endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{
    AnnouncementDto, AnnouncementListResponse, AnnouncementRequest, PaginationParams, paginate,
};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, GatewayError};
use crate::service::announcement_service::AnnouncementInput;

/// `POST /announcements` — Post an announcement.
///
/// # Errors
///
/// Returns [`GatewayError`] on validation failure.
#[utoipa::path(
    post,
    path = "/api/v1/announcements",
    tag = "Announcements",
    summary = "Post an announcement",
    request_body = AnnouncementRequest,
    responses(
        (status = 201, description = "Announcement posted", body = AnnouncementDto),
        (status = 400, description = "Invalid request", body = ErrorResponse),
    )
)]
pub async fn create_announcement(
    State(state): State<AppState>,
    Json(req): Json<AnnouncementRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let view = state
        .announcement_service
        .create(AnnouncementInput {
            title: req.title,
            body: req.body,
            posted_by: req.posted_by,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(AnnouncementDto::from(view))))
}

/// `GET /announcements` — Newest-first announcement listing.
///
/// # Errors
///
/// Returns [`GatewayError`] on a persistence failure.
#[utoipa::path(
    get,
    path = "/api/v1/announcements",
    tag = "Announcements",
    summary = "List announcements",
    params(PaginationParams),
    responses(
        (status = 200, description = "Paginated announcement list", body = AnnouncementListResponse),
    )
)]
pub async fn list_announcements(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<impl IntoResponse, GatewayError> {
    let views = state.announcement_service.list(None).await?;
    let dtos: Vec<AnnouncementDto> = views.into_iter().map(AnnouncementDto::from).collect();
    let (page, meta) = paginate(dtos, &params);
    Ok(Json(AnnouncementListResponse {
        data: page,
        pagination: meta,
    }))
}

/// `GET /announcements/:id` — Single announcement.
///
/// # Errors
///
/// Returns [`GatewayError::DocumentNotFound`] for an unknown id.
#[utoipa::path(
    get,
    path = "/api/v1/announcements/{id}",
    tag = "Announcements",
    summary = "Get an announcement",
    params(
        ("id" = String, Path, description = "Announcement identifier"),
    ),
    responses(
        (status = 200, description = "Announcement", body = AnnouncementDto),
        (status = 404, description = "Announcement not found", body = ErrorResponse),
    )
)]
pub async fn get_announcement(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, GatewayError> {
    let view = state.announcement_service.get(&id).await?;
    Ok(Json(AnnouncementDto::from(view)))
}

/// `PUT /announcements/:id` — Edit an announcement in place.
///
/// # Errors
///
/// Returns [`GatewayError::DocumentNotFound`] for an unknown id.
#[utoipa::path(
    put,
    path = "/api/v1/announcements/{id}",
    tag = "Announcements",
    summary = "Update an announcement",
    request_body = AnnouncementRequest,
    params(
        ("id" = String, Path, description = "Announcement identifier"),
    ),
    responses(
        (status = 200, description = "Updated announcement", body = AnnouncementDto),
        (status = 404, description = "Announcement not found", body = ErrorResponse),
    )
)]
pub async fn update_announcement(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AnnouncementRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let view = state
        .announcement_service
        .update(
            &id,
            AnnouncementInput {
                title: req.title,
                body: req.body,
                posted_by: req.posted_by,
            },
        )
        .await?;
    Ok(Json(AnnouncementDto::from(view)))
}

/// `DELETE /announcements/:id` — Remove an announcement.
///
/// # Errors
///
/// Returns [`GatewayError::DocumentNotFound`] for an unknown id.
#[utoipa::path(
    delete,
    path = "/api/v1/announcements/{id}",
    tag = "Announcements",
    summary = "Delete an announcement",
    params(
        ("id" = String, Path, description = "Announcement identifier"),
    ),
    responses(
        (status = 204, description = "Announcement deleted"),
        (status = 404, description = "Announcement not found", body = ErrorResponse),
    )
)]
pub async fn delete_announcement(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, GatewayError> {
    state.announcement_service.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Announcement routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/announcements",
            post(create_announcement).get(list_announcements),
        )
        .route(
            "/announcements/{id}",
            get(get_announcement)
                .put(update_announcement)
                .delete(delete_announcement),
        )
}
