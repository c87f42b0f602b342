//! Typed visitor entities extracted from untyped store documents.
//!
//! The document store hands back loosely-shaped JSON. All defensive field
//! extraction happens once here, at the boundary: every accessor tolerates
//! an absent or wrongly-typed field and defaults instead of failing, so one
//! malformed record can never abort rendering of the rest of a collection.

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::dates::{ParsedDate, parse_date};

/// A visitor pre-registration record, created when a resident or staff
/// member generates a visit invitation. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitorIssuance {
    /// Opaque unique identifier assigned by the store; scan logs reference
    /// it as `qrCodeId`.
    pub id: String,
    /// Visitor's first name.
    pub first_name: String,
    /// Visitor's last name.
    pub last_name: String,
    /// Contact number, if provided.
    pub contact: Option<String>,
    /// Purpose of the visit, if provided.
    pub purpose: Option<String>,
    /// Intended visit day. No time-of-day guarantee.
    pub visit_date: ParsedDate,
    /// Identifier of the issuing user.
    pub created_by: String,
    /// Record creation instant.
    pub created_at: ParsedDate,
}

impl VisitorIssuance {
    /// Extracts an issuance from a raw store document.
    #[must_use]
    pub fn from_document(id: &str, data: &Value) -> Self {
        Self {
            id: id.to_string(),
            first_name: str_field(data, "firstName"),
            last_name: str_field(data, "lastName"),
            contact: opt_str_field(data, "contact"),
            purpose: opt_str_field(data, "purpose"),
            visit_date: parse_date(data.get("visitDate")),
            created_by: str_field(data, "createdBy"),
            created_at: parse_date(data.get("createdAt")),
        }
    }
}

/// A gate-scan record, created when a guard validates a visitor's QR code.
/// Related to [`VisitorIssuance`] by foreign key only; zero-or-one per
/// issuance in the expected case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitorScanLog {
    /// Foreign key referencing [`VisitorIssuance::id`].
    pub qr_code_id: String,
    /// Identifier of the scanning guard.
    pub scanned_by_guard: String,
    /// Instant of the scan.
    pub scan_timestamp: ParsedDate,
}

impl VisitorScanLog {
    /// Extracts a scan log from a raw store document.
    #[must_use]
    pub fn from_document(data: &Value) -> Self {
        Self {
            qr_code_id: str_field(data, "qrCodeId"),
            scanned_by_guard: str_field(data, "scannedByGuard"),
            scan_timestamp: parse_date(data.get("scanTimestamp")),
        }
    }
}

/// Scan details attached to a reconciled record. Present if and only if a
/// scan log exists for the issuance — an unscanned visitor carries no
/// placeholder values that could be mistaken for "scanned at epoch zero".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanInfo {
    /// Guard who performed the scan.
    pub scanned_by: String,
    /// When the scan happened.
    pub scanned_at: ParsedDate,
}

/// The merged view of an issuance and its optional scan log. Derived on
/// every fetch cycle, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciledVisitor {
    /// The underlying issuance.
    pub issuance: VisitorIssuance,
    /// Scan details, if the visitor has been scanned at the gate.
    pub scan: Option<ScanInfo>,
}

impl ReconciledVisitor {
    /// The instant used for date-bucketed aggregation: the visit date when
    /// known, otherwise the creation instant (documented fallback). `None`
    /// means the record is skipped by the aggregator but still listed.
    #[must_use]
    pub fn resolved_visit_instant(&self) -> Option<DateTime<Utc>> {
        self.issuance
            .visit_date
            .instant()
            .or_else(|| self.issuance.created_at.instant())
    }
}

/// Extracts a string field, defaulting to empty on absence or wrong type.
fn str_field(data: &Value, key: &str) -> String {
    data.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Extracts an optional string field; absent, non-string, or empty values
/// all become `None`.
fn opt_str_field(data: &Value, key: &str) -> Option<String> {
    data.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}
