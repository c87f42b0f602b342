//! Resident feedback endpoints.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::dto::{
    FeedbackDto, FeedbackListResponse, FeedbackSummaryDto, PaginationParams,
    SubmitFeedbackRequest, paginate,
};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, GatewayError};
use crate::service::feedback_service::NewFeedback;

/// `POST /feedback` — Submit a rating with an optional comment.
///
/// # Errors
///
/// Returns [`GatewayError`] when the rating is outside 1..=5.
#[utoipa::path(
    post,
    path = "/api/v1/feedback",
    tag = "Feedback",
    summary = "Submit feedback",
    request_body = SubmitFeedbackRequest,
    responses(
        (status = 201, description = "Feedback recorded", body = FeedbackDto),
        (status = 400, description = "Invalid request", body = ErrorResponse),
    )
)]
pub async fn submit_feedback(
    State(state): State<AppState>,
    Json(req): Json<SubmitFeedbackRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let view = state
        .feedback_service
        .submit(NewFeedback {
            rating: req.rating,
            comment: req.comment,
            submitted_by: req.submitted_by,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(FeedbackDto::from(view))))
}

/// `GET /feedback` — Newest-first feedback listing with an aggregate summary.
///
/// # Errors
///
/// Returns [`GatewayError`] on a persistence failure.
#[utoipa::path(
    get,
    path = "/api/v1/feedback",
    tag = "Feedback",
    summary = "List feedback",
    description = "Returns submitted feedback plus a summary. Entries whose stored rating is malformed render as rating 0 and are excluded from the average.",
    params(PaginationParams),
    responses(
        (status = 200, description = "Paginated feedback list", body = FeedbackListResponse),
    )
)]
pub async fn list_feedback(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<impl IntoResponse, GatewayError> {
    let (views, summary) = state.feedback_service.list(None).await?;
    let summary = FeedbackSummaryDto::from(summary);
    let dtos: Vec<FeedbackDto> = views.into_iter().map(FeedbackDto::from).collect();
    let (page, meta) = paginate(dtos, &params);
    Ok(Json(FeedbackListResponse {
        data: page,
        summary,
        pagination: meta,
    }))
}

/// Feedback routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/feedback", post(submit_feedback).get(list_feedback))
}
