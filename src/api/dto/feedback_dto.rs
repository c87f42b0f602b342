//! Feedback DTOs: submission, listing, and the rating summary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::common_dto::PaginationMeta;
use crate::service::feedback_service::{FeedbackSummary, FeedbackView};

/// Request body for `POST /feedback`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SubmitFeedbackRequest {
    /// Rating from 1 to 5.
    pub rating: u8,
    /// Free-form comment.
    #[serde(default)]
    pub comment: Option<String>,
    /// Identifier of the submitting resident.
    pub submitted_by: String,
}

/// A feedback entry.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FeedbackDto {
    /// Document identifier.
    pub id: String,
    /// Rating from 1 to 5; 0 when the stored value was malformed.
    pub rating: u8,
    /// Free-form comment, if provided.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Identifier of the submitting resident.
    pub submitted_by: String,
    /// Submission timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<FeedbackView> for FeedbackDto {
    fn from(view: FeedbackView) -> Self {
        Self {
            id: view.id,
            rating: view.rating,
            comment: view.comment,
            submitted_by: view.submitted_by,
            created_at: view.created_at,
        }
    }
}

/// Aggregate rating figures.
#[derive(Debug, Serialize, ToSchema)]
pub struct FeedbackSummaryDto {
    /// Number of feedback entries.
    pub count: usize,
    /// Mean of the valid ratings, when any exist.
    pub average_rating: Option<f64>,
}

impl From<FeedbackSummary> for FeedbackSummaryDto {
    fn from(summary: FeedbackSummary) -> Self {
        Self {
            count: summary.count,
            average_rating: summary.average_rating,
        }
    }
}

/// List response for `GET /feedback`.
#[derive(Debug, Serialize, ToSchema)]
pub struct FeedbackListResponse {
    /// Feedback entries, newest first.
    pub data: Vec<FeedbackDto>,
    /// Rating summary over the listed entries.
    pub summary: FeedbackSummaryDto,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}
