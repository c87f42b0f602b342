//! Visitor lifecycle status derivation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::records::ReconciledVisitor;

/// Tri-state lifecycle label for a reconciled visitor record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum VisitStatus {
    /// The visitor's QR code was scanned at the gate.
    Scanned,
    /// Not yet scanned; the visit day is today or in the future.
    Upcoming,
    /// Not scanned and the visit day has passed, or the date is unknown.
    Pending,
}

impl VisitStatus {
    /// Returns the status as a lowercase static string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Scanned => "scanned",
            Self::Upcoming => "upcoming",
            Self::Pending => "pending",
        }
    }
}

/// Derives the lifecycle status of a reconciled record.
///
/// Rules, first match wins:
/// 1. A scan log exists — `Scanned`. A scan is authoritative ground truth
///    and overrides any date-based inference, including an invalid or
///    missing visit date.
/// 2. The visit date is known and its calendar day is on or after
///    `reference_now`'s calendar day — `Upcoming`.
/// 3. Otherwise — `Pending`.
///
/// `reference_now` is injected rather than read from the system clock so
/// the rules are testable against fixed instants.
#[must_use]
pub fn derive_status(record: &ReconciledVisitor, reference_now: DateTime<Utc>) -> VisitStatus {
    if record.scan.is_some() {
        return VisitStatus::Scanned;
    }
    match record.issuance.visit_date.instant() {
        Some(visit) if visit.date_naive() >= reference_now.date_naive() => VisitStatus::Upcoming,
        _ => VisitStatus::Pending,
    }
}
