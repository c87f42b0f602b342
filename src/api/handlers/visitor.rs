//! Visitor endpoints: registration, gate scans, reconciled listings, and
//! dashboard statistics.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{Datelike, Utc};

use crate::api::dto::{
    PaginationParams, RegisterVisitorRequest, ScanRequest, StatsParams, StatsResponse, VisitorDto,
    VisitorListParams, VisitorListResponse, paginate,
};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, GatewayError};
use crate::service::visitor_service::NewVisitor;

/// `POST /visitors` — Register a visit invitation.
///
/// # Errors
///
/// Returns [`GatewayError`] on validation failure.
#[utoipa::path(
    post,
    path = "/api/v1/visitors",
    tag = "Visitors",
    summary = "Register a visit invitation",
    description = "Creates a visitor QR issuance. The visit date accepts D/M/YYYY, YYYY-MM-DD, or RFC 3339.",
    request_body = RegisterVisitorRequest,
    responses(
        (status = 201, description = "Visitor registered", body = VisitorDto),
        (status = 400, description = "Invalid request", body = ErrorResponse),
    )
)]
pub async fn register_visitor(
    State(state): State<AppState>,
    Json(req): Json<RegisterVisitorRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let view = state
        .visitor_service
        .register(NewVisitor {
            first_name: req.first_name,
            last_name: req.last_name,
            contact: req.contact,
            purpose: req.purpose,
            visit_date: req.visit_date,
            created_by: req.created_by,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(VisitorDto::from(view))))
}

/// `GET /visitors` — Reconciled visitor listing with derived statuses.
///
/// # Errors
///
/// Returns [`GatewayError`] when the fetch cycle fails; the console keeps
/// its previously rendered listing in that case.
#[utoipa::path(
    get,
    path = "/api/v1/visitors",
    tag = "Visitors",
    summary = "List reconciled visitors",
    description = "Joins issuances with scan logs, derives each record's status, and returns a paginated page stamped with the fetch cycle's data epoch.",
    params(VisitorListParams),
    responses(
        (status = 200, description = "Paginated visitor list", body = VisitorListResponse),
    )
)]
pub async fn list_visitors(
    State(state): State<AppState>,
    Query(params): Query<VisitorListParams>,
) -> Result<impl IntoResponse, GatewayError> {
    let snapshot = state.visitor_service.snapshot(Utc::now()).await?;

    let filtered: Vec<VisitorDto> = snapshot
        .visitors
        .iter()
        .filter(|view| params.status.is_none_or(|wanted| view.status == wanted))
        .cloned()
        .map(VisitorDto::from)
        .collect();

    let pagination = PaginationParams {
        page: params.page,
        per_page: params.per_page,
    };
    let (page, meta) = paginate(filtered, &pagination);

    Ok(Json(VisitorListResponse::new(&snapshot, page, meta)))
}

/// `GET /visitors/stats` — Dashboard statistics.
///
/// # Errors
///
/// Returns [`GatewayError`] when the fetch cycle fails.
#[utoipa::path(
    get,
    path = "/api/v1/visitors/stats",
    tag = "Visitors",
    summary = "Visitor statistics",
    description = "Weekly day-of-week traffic, per-month counts for the selected year, and the current-month-to-date count.",
    params(StatsParams),
    responses(
        (status = 200, description = "Aggregated statistics", body = StatsResponse),
    )
)]
pub async fn visitor_stats(
    State(state): State<AppState>,
    Query(params): Query<StatsParams>,
) -> Result<impl IntoResponse, GatewayError> {
    let now = Utc::now();
    let year = params.year.unwrap_or_else(|| now.year());
    let stats = state.visitor_service.statistics(now, year).await?;
    Ok(Json(StatsResponse::from(stats)))
}

/// `GET /visitors/:id` — Single reconciled visitor record.
///
/// # Errors
///
/// Returns [`GatewayError::IssuanceNotFound`] for an unknown QR code.
#[utoipa::path(
    get,
    path = "/api/v1/visitors/{id}",
    tag = "Visitors",
    summary = "Get a reconciled visitor",
    params(
        ("id" = String, Path, description = "Issuance (QR code) identifier"),
    ),
    responses(
        (status = 200, description = "Reconciled visitor record", body = VisitorDto),
        (status = 404, description = "Issuance not found", body = ErrorResponse),
    )
)]
pub async fn get_visitor(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, GatewayError> {
    let view = state.visitor_service.get_visitor(&id, Utc::now()).await?;
    Ok(Json(VisitorDto::from(view)))
}

/// `POST /visitors/:id/scan` — Record a gate scan.
///
/// # Errors
///
/// Returns [`GatewayError::IssuanceNotFound`] for an unknown QR code or
/// [`GatewayError::AlreadyScanned`] for a repeat scan.
#[utoipa::path(
    post,
    path = "/api/v1/visitors/{id}/scan",
    tag = "Visitors",
    summary = "Record a gate scan",
    description = "Validates the QR code against its issuance and records the scan. A QR code can be scanned once.",
    params(
        ("id" = String, Path, description = "Issuance (QR code) identifier"),
    ),
    request_body = ScanRequest,
    responses(
        (status = 201, description = "Scan recorded", body = VisitorDto),
        (status = 404, description = "Issuance not found", body = ErrorResponse),
        (status = 409, description = "Already scanned", body = ErrorResponse),
    )
)]
pub async fn scan_visitor(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ScanRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let view = state.visitor_service.record_scan(&id, &req.guard_id).await?;
    Ok((StatusCode::CREATED, Json(VisitorDto::from(view))))
}

/// Visitor routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/visitors", post(register_visitor).get(list_visitors))
        .route("/visitors/stats", get(visitor_stats))
        .route("/visitors/{id}", get(get_visitor))
        .route("/visitors/{id}/scan", post(scan_visitor))
}
