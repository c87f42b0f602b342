//! Visitor-related DTOs: registration, scans, listings, and statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::common_dto::PaginationMeta;
use crate::domain::{VisitStatus, VisitorStatistics};
use crate::service::visitor_service::{VisitorSnapshot, VisitorView};

/// Request body for `POST /visitors`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterVisitorRequest {
    /// Visitor's first name.
    pub first_name: String,
    /// Visitor's last name.
    pub last_name: String,
    /// Contact number.
    #[serde(default)]
    pub contact: Option<String>,
    /// Purpose of the visit.
    #[serde(default)]
    pub purpose: Option<String>,
    /// Intended visit day (`D/M/YYYY`, `YYYY-MM-DD`, or RFC 3339).
    #[serde(default)]
    pub visit_date: Option<String>,
    /// Identifier of the issuing user.
    pub created_by: String,
}

/// Request body for `POST /visitors/{id}/scan`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ScanRequest {
    /// Identifier of the scanning guard.
    pub guard_id: String,
}

/// A reconciled visitor record with derived status.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VisitorDto {
    /// Issuance identifier (the QR code ID).
    pub id: String,
    /// Visitor's first name.
    pub first_name: String,
    /// Visitor's last name.
    pub last_name: String,
    /// Contact number, if provided.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    /// Purpose of the visit, if provided.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    /// Canonical visit instant; absent when unknown.
    pub visit_date: Option<DateTime<Utc>>,
    /// `true` when a visit date was recorded but could not be parsed.
    pub visit_date_invalid: bool,
    /// Identifier of the issuing user.
    pub created_by: String,
    /// Resolved display name of the issuing user.
    pub created_by_name: String,
    /// Record creation instant, when known.
    pub created_at: Option<DateTime<Utc>>,
    /// Identifier of the scanning guard, if scanned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scanned_by: Option<String>,
    /// Resolved display name of the scanning guard, if scanned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scanned_by_name: Option<String>,
    /// Scan instant, if scanned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scanned_at: Option<DateTime<Utc>>,
    /// Derived lifecycle status.
    pub status: VisitStatus,
}

impl From<VisitorView> for VisitorDto {
    fn from(view: VisitorView) -> Self {
        Self {
            id: view.id,
            first_name: view.first_name,
            last_name: view.last_name,
            contact: view.contact,
            purpose: view.purpose,
            visit_date: view.visit_date,
            visit_date_invalid: view.visit_date_invalid,
            created_by: view.created_by,
            created_by_name: view.created_by_name,
            created_at: view.created_at,
            scanned_by: view.scanned_by,
            scanned_by_name: view.scanned_by_name,
            scanned_at: view.scanned_at,
            status: view.status,
        }
    }
}

/// Query parameters for `GET /visitors`.
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct VisitorListParams {
    /// Page number (1-indexed). Defaults to 1.
    #[serde(default = "default_page")]
    pub page: u32,
    /// Items per page (max 100). Defaults to 20.
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    /// Optional status filter applied after reconciliation.
    #[serde(default)]
    pub status: Option<VisitStatus>,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    20
}

/// Paginated list response for `GET /visitors`.
#[derive(Debug, Serialize, ToSchema)]
pub struct VisitorListResponse {
    /// Data epoch of the fetch cycle that produced this listing. Clients
    /// discard responses older than the newest epoch they have seen.
    pub epoch: u64,
    /// Reference instant statuses were derived against.
    pub generated_at: DateTime<Utc>,
    /// Reconciled visitor records.
    pub data: Vec<VisitorDto>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}

impl VisitorListResponse {
    /// Builds the response from a snapshot's already-paginated slice.
    #[must_use]
    pub fn new(snapshot: &VisitorSnapshot, data: Vec<VisitorDto>, pagination: PaginationMeta) -> Self {
        Self {
            epoch: snapshot.epoch,
            generated_at: snapshot.generated_at,
            data,
            pagination,
        }
    }
}

/// Query parameters for `GET /visitors/stats`.
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct StatsParams {
    /// Year for the monthly view. Defaults to the current year.
    #[serde(default)]
    pub year: Option<i32>,
}

/// Dashboard statistics response.
#[derive(Debug, Serialize, ToSchema)]
pub struct StatsResponse {
    /// Year the monthly view was computed for.
    pub selected_year: i32,
    /// Day-of-week counters for the current week, Monday first.
    pub weekly: Vec<u64>,
    /// Month counters for `selected_year`, January first.
    pub monthly: Vec<u64>,
    /// Sum of `monthly`.
    pub total_for_year: u64,
    /// Visits in the current calendar month.
    pub current_month: u64,
}

impl From<VisitorStatistics> for StatsResponse {
    fn from(stats: VisitorStatistics) -> Self {
        Self {
            selected_year: stats.selected_year,
            weekly: stats.weekly.to_vec(),
            monthly: stats.monthly.to_vec(),
            total_for_year: stats.total_for_year,
            current_month: stats.current_month,
        }
    }
}
