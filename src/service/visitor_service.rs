//! Visitor service: registration, gate scans, reconciled snapshots, and
//! dashboard statistics.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::domain::dates::ParsedDate;
use crate::domain::identity::UNKNOWN_IDENTITY;
use crate::domain::{
    ConsoleEvent, EventBus, IdentityCache, ReconciledVisitor, VisitStatus, VisitorIssuance,
    VisitorScanLog, VisitorStatistics, aggregate, derive_status, parse_date_str, reconcile,
};
use crate::error::GatewayError;
use crate::persistence::{DocumentStore, ListQuery};

/// Collection holding visitor QR issuance documents.
pub const ISSUANCES_COLLECTION: &str = "visitor_qrcodes";
/// Collection holding gate scan-log documents.
pub const SCAN_LOGS_COLLECTION: &str = "visitor_logs";
/// Collection holding resident/staff identity documents.
pub const USERS_COLLECTION: &str = "users";
/// Collection holding guard identity documents.
pub const GUARDS_COLLECTION: &str = "guards";

/// Input for registering a visit invitation.
#[derive(Debug, Clone)]
pub struct NewVisitor {
    /// Visitor's first name.
    pub first_name: String,
    /// Visitor's last name.
    pub last_name: String,
    /// Contact number, if provided.
    pub contact: Option<String>,
    /// Purpose of the visit, if provided.
    pub purpose: Option<String>,
    /// Intended visit day, in any accepted string shape.
    pub visit_date: Option<String>,
    /// Identifier of the issuing user.
    pub created_by: String,
}

/// A reconciled visitor record with resolved display names and derived
/// status, ready for the presentation boundary.
#[derive(Debug, Clone)]
pub struct VisitorView {
    /// Issuance identifier (the QR code ID).
    pub id: String,
    /// Visitor's first name.
    pub first_name: String,
    /// Visitor's last name.
    pub last_name: String,
    /// Contact number, if provided.
    pub contact: Option<String>,
    /// Purpose of the visit, if provided.
    pub purpose: Option<String>,
    /// Canonical visit instant, when the recorded date parsed.
    pub visit_date: Option<DateTime<Utc>>,
    /// `true` when a visit date was recorded but could not be parsed; the
    /// console renders such records as "Invalid date".
    pub visit_date_invalid: bool,
    /// Identifier of the issuing user.
    pub created_by: String,
    /// Resolved display name of the issuing user.
    pub created_by_name: String,
    /// Record creation instant, when known.
    pub created_at: Option<DateTime<Utc>>,
    /// Identifier of the scanning guard, if scanned.
    pub scanned_by: Option<String>,
    /// Resolved display name of the scanning guard, if scanned.
    pub scanned_by_name: Option<String>,
    /// Scan instant, if scanned and the timestamp parsed.
    pub scanned_at: Option<DateTime<Utc>>,
    /// Derived lifecycle status.
    pub status: VisitStatus,
}

/// One fetch-reconcile-derive cycle's result.
///
/// `epoch` increases monotonically per cycle; a consumer holding results
/// from epoch N discards any later-arriving snapshot with epoch < N, which
/// makes the last-cycle-wins race of rapid refreshes detectable instead of
/// silent.
#[derive(Debug, Clone)]
pub struct VisitorSnapshot {
    /// Data epoch of this cycle.
    pub epoch: u64,
    /// Reference instant the statuses were derived against.
    pub generated_at: DateTime<Utc>,
    /// Reconciled, labeled visitor records.
    pub visitors: Vec<VisitorView>,
}

/// Orchestration layer for all visitor operations.
///
/// Owns the document store handle, the event bus, and the per-process
/// identity caches. Every mutation follows the pattern: validate → write
/// document → emit event → return.
#[derive(Debug)]
pub struct VisitorService {
    store: Arc<DocumentStore>,
    event_bus: EventBus,
    users: IdentityCache,
    guards: IdentityCache,
    epoch: AtomicU64,
}

impl VisitorService {
    /// Creates a new `VisitorService`.
    #[must_use]
    pub fn new(store: Arc<DocumentStore>, event_bus: EventBus) -> Self {
        Self {
            store,
            event_bus,
            users: IdentityCache::new(),
            guards: IdentityCache::new(),
            epoch: AtomicU64::new(0),
        }
    }

    /// Returns a reference to the inner [`EventBus`].
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Returns the epoch of the most recently started fetch cycle.
    #[must_use]
    pub fn current_epoch(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }

    /// Registers a visit invitation, creating an issuance document.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] for empty names or an
    /// unparseable visit date, or a persistence error from the store.
    pub async fn register(&self, new: NewVisitor) -> Result<VisitorView, GatewayError> {
        if new.first_name.trim().is_empty() {
            return Err(GatewayError::InvalidRequest(
                "first_name must not be empty".to_string(),
            ));
        }
        if new.last_name.trim().is_empty() {
            return Err(GatewayError::InvalidRequest(
                "last_name must not be empty".to_string(),
            ));
        }
        if let Some(raw) = new.visit_date.as_deref()
            && parse_date_str(raw) == ParsedDate::Invalid
        {
            return Err(GatewayError::InvalidRequest(format!(
                "unparseable visit_date: {raw}"
            )));
        }

        let data = json!({
            "firstName": new.first_name.trim(),
            "lastName": new.last_name.trim(),
            "contact": new.contact,
            "purpose": new.purpose,
            "visitDate": new.visit_date,
            "createdBy": new.created_by,
            "createdAt": Utc::now().to_rfc3339(),
        });
        let doc = self.store.create_document(ISSUANCES_COLLECTION, data).await?;
        let issuance = VisitorIssuance::from_document(&doc.id, &doc.data);

        let _ = self.event_bus.publish(ConsoleEvent::VisitorRegistered {
            qr_code_id: issuance.id.clone(),
            visitor_name: format!("{} {}", issuance.first_name, issuance.last_name),
            visit_date: issuance.visit_date.instant(),
            timestamp: Utc::now(),
        });

        tracing::info!(qr_code_id = %issuance.id, "visitor registered");
        let record = ReconciledVisitor {
            issuance,
            scan: None,
        };
        Ok(self.view_of(&record, Utc::now()).await)
    }

    /// Records a gate scan against an issued QR code.
    ///
    /// The duplicate check is read-then-insert, so the 409 rejection is
    /// best-effort under concurrent scans of the same code; if two slip
    /// through, reconciliation's last-write-wins collapses the extra log.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::IssuanceNotFound`] for an unknown QR code,
    /// [`GatewayError::AlreadyScanned`] for a repeat scan, or a
    /// persistence error from the store.
    pub async fn record_scan(
        &self,
        qr_code_id: &str,
        guard_id: &str,
    ) -> Result<VisitorView, GatewayError> {
        let issuance_doc = self
            .store
            .get_document(ISSUANCES_COLLECTION, qr_code_id)
            .await?
            .ok_or_else(|| GatewayError::IssuanceNotFound(qr_code_id.to_string()))?;

        let existing = self
            .store
            .list_documents(
                SCAN_LOGS_COLLECTION,
                &ListQuery::default().with_filter("qrCodeId", qr_code_id).with_limit(1),
            )
            .await?;
        if !existing.is_empty() {
            return Err(GatewayError::AlreadyScanned(qr_code_id.to_string()));
        }

        let now = Utc::now();
        let data = json!({
            "qrCodeId": qr_code_id,
            "scannedByGuard": guard_id,
            "scanTimestamp": now.to_rfc3339(),
        });
        let log_doc = self.store.create_document(SCAN_LOGS_COLLECTION, data).await?;

        let _ = self.event_bus.publish(ConsoleEvent::VisitorScanned {
            qr_code_id: qr_code_id.to_string(),
            scanned_by: guard_id.to_string(),
            timestamp: now,
        });

        tracing::info!(qr_code_id, guard_id, "visitor scanned at gate");

        let issuance = VisitorIssuance::from_document(&issuance_doc.id, &issuance_doc.data);
        let log = VisitorScanLog::from_document(&log_doc.data);
        let reconciled = reconcile(vec![issuance], &[log]);
        match reconciled.into_iter().next() {
            Some(record) => Ok(self.view_of(&record, now).await),
            None => Err(GatewayError::Internal(
                "reconciliation dropped a record".to_string(),
            )),
        }
    }

    /// Fetches both collections and produces a reconciled, status-labeled
    /// snapshot stamped with a fresh data epoch.
    ///
    /// # Errors
    ///
    /// Propagates a single persistence error when either fetch fails; the
    /// caller keeps rendering its prior snapshot in that case.
    pub async fn snapshot(
        &self,
        reference_now: DateTime<Utc>,
    ) -> Result<VisitorSnapshot, GatewayError> {
        let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        let records = self.fetch_reconciled().await?;

        let mut visitors = Vec::with_capacity(records.len());
        for record in &records {
            visitors.push(self.view_of(record, reference_now).await);
        }

        Ok(VisitorSnapshot {
            epoch,
            generated_at: reference_now,
            visitors,
        })
    }

    /// Fetches a single reconciled visitor by QR code id.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::IssuanceNotFound`] for an unknown id, or a
    /// persistence error from the store.
    pub async fn get_visitor(
        &self,
        qr_code_id: &str,
        reference_now: DateTime<Utc>,
    ) -> Result<VisitorView, GatewayError> {
        let doc = self
            .store
            .get_document(ISSUANCES_COLLECTION, qr_code_id)
            .await?
            .ok_or_else(|| GatewayError::IssuanceNotFound(qr_code_id.to_string()))?;
        let issuance = VisitorIssuance::from_document(&doc.id, &doc.data);

        let logs = self
            .store
            .list_documents(
                SCAN_LOGS_COLLECTION,
                &ListQuery::default().with_filter("qrCodeId", qr_code_id),
            )
            .await?;
        let logs: Vec<VisitorScanLog> = logs
            .iter()
            .map(|doc| VisitorScanLog::from_document(&doc.data))
            .collect();

        let reconciled = reconcile(vec![issuance], &logs);
        match reconciled.into_iter().next() {
            Some(record) => Ok(self.view_of(&record, reference_now).await),
            None => Err(GatewayError::Internal(
                "reconciliation dropped a record".to_string(),
            )),
        }
    }

    /// Computes dashboard statistics over all reconciled records.
    ///
    /// # Errors
    ///
    /// Propagates a persistence error when either fetch fails.
    pub async fn statistics(
        &self,
        reference_now: DateTime<Utc>,
        selected_year: i32,
    ) -> Result<VisitorStatistics, GatewayError> {
        let records = self.fetch_reconciled().await?;
        Ok(aggregate(&records, reference_now, selected_year))
    }

    /// One fetch-and-join cycle over the two visitor collections.
    async fn fetch_reconciled(&self) -> Result<Vec<ReconciledVisitor>, GatewayError> {
        let issuance_docs = self
            .store
            .list_documents(ISSUANCES_COLLECTION, &ListQuery::default())
            .await?;
        let log_docs = self
            .store
            .list_documents(SCAN_LOGS_COLLECTION, &ListQuery::default())
            .await?;

        let issuances: Vec<VisitorIssuance> = issuance_docs
            .iter()
            .map(|doc| VisitorIssuance::from_document(&doc.id, &doc.data))
            .collect();
        let logs: Vec<VisitorScanLog> = log_docs
            .iter()
            .map(|doc| VisitorScanLog::from_document(&doc.data))
            .collect();

        Ok(reconcile(issuances, &logs))
    }

    /// Builds the presentation view: derived status plus resolved names.
    async fn view_of(
        &self,
        record: &ReconciledVisitor,
        reference_now: DateTime<Utc>,
    ) -> VisitorView {
        let status = derive_status(record, reference_now);
        let created_by_name = self
            .resolve(&self.users, USERS_COLLECTION, &record.issuance.created_by)
            .await;
        let scanned_by_name = match &record.scan {
            Some(scan) => Some(self.resolve(&self.guards, GUARDS_COLLECTION, &scan.scanned_by).await),
            None => None,
        };

        VisitorView {
            id: record.issuance.id.clone(),
            first_name: record.issuance.first_name.clone(),
            last_name: record.issuance.last_name.clone(),
            contact: record.issuance.contact.clone(),
            purpose: record.issuance.purpose.clone(),
            visit_date: record.issuance.visit_date.instant(),
            visit_date_invalid: record.issuance.visit_date == ParsedDate::Invalid,
            created_by: record.issuance.created_by.clone(),
            created_by_name,
            created_at: record.issuance.created_at.instant(),
            scanned_by: record.scan.as_ref().map(|s| s.scanned_by.clone()),
            scanned_by_name,
            scanned_at: record.scan.as_ref().and_then(|s| s.scanned_at.instant()),
            status,
        }
    }

    /// Resolves a display name through a cache, fetching and memoizing on
    /// miss. Unresolvable identities memoize as `"Unknown"` so they are
    /// not re-fetched every cycle.
    async fn resolve(&self, cache: &IdentityCache, collection: &str, id: &str) -> String {
        if id.is_empty() {
            return UNKNOWN_IDENTITY.to_string();
        }
        if let Some(name) = cache.get(id).await {
            return name;
        }
        let name = match self.store.get_document(collection, id).await {
            Ok(Some(doc)) => display_name(&doc.data),
            Ok(None) => UNKNOWN_IDENTITY.to_string(),
            Err(e) => {
                // Name resolution is cosmetic; a store hiccup here must not
                // fail the whole snapshot. Do not memoize so the next cycle
                // retries.
                tracing::warn!(collection, id, error = %e, "identity lookup failed");
                return UNKNOWN_IDENTITY.to_string();
            }
        };
        cache.insert(id, name.clone()).await;
        name
    }
}

/// Pulls a display name out of an identity document, trying the shapes the
/// original console stored: a `name` field, a `displayName` field, or
/// separate first/last names.
fn display_name(data: &serde_json::Value) -> String {
    let direct = data
        .get("name")
        .or_else(|| data.get("displayName"))
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty());
    if let Some(name) = direct {
        return name.to_string();
    }
    let first = data.get("firstName").and_then(|v| v.as_str()).unwrap_or_default();
    let last = data.get("lastName").and_then(|v| v.as_str()).unwrap_or_default();
    let combined = format!("{first} {last}");
    let combined = combined.trim();
    if combined.is_empty() {
        UNKNOWN_IDENTITY.to_string()
    } else {
        combined.to_string()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    fn make_service() -> VisitorService {
        let store = Arc::new(DocumentStore::Memory(MemoryStore::new()));
        VisitorService::new(store, EventBus::new(1000))
    }

    fn new_visitor(first: &str, visit_date: Option<&str>) -> NewVisitor {
        NewVisitor {
            first_name: first.to_string(),
            last_name: "Cruz".to_string(),
            contact: None,
            purpose: Some("visit".to_string()),
            visit_date: visit_date.map(ToString::to_string),
            created_by: "user-1".to_string(),
        }
    }

    fn reference_now() -> DateTime<Utc> {
        "2025-06-01T12:00:00Z".parse().unwrap_or_default()
    }

    #[tokio::test]
    async fn register_rejects_empty_name() {
        let service = make_service();
        let result = service.register(new_visitor("  ", None)).await;
        assert!(matches!(result, Err(GatewayError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn register_rejects_garbage_visit_date() {
        let service = make_service();
        let result = service.register(new_visitor("Ana", Some("soonish"))).await;
        assert!(matches!(result, Err(GatewayError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn register_emits_event_and_returns_view() {
        let service = make_service();
        let mut rx = service.event_bus().subscribe();

        let view = service
            .register(new_visitor("Ana", Some("1/6/2099")))
            .await
            .unwrap_or_else(|_| panic!("register failed"));
        assert!(!view.id.is_empty());
        assert_eq!(view.status, VisitStatus::Upcoming);

        let event = rx.recv().await;
        let Ok(event) = event else {
            panic!("expected event");
        };
        assert_eq!(event.event_type_str(), "visitor_registered");
    }

    #[tokio::test]
    async fn scan_unknown_qr_code_is_not_found() {
        let service = make_service();
        let result = service.record_scan("ghost", "guard-1").await;
        assert!(matches!(result, Err(GatewayError::IssuanceNotFound(_))));
    }

    #[tokio::test]
    async fn second_scan_conflicts() {
        let service = make_service();
        let view = service
            .register(new_visitor("Ana", None))
            .await
            .unwrap_or_else(|_| panic!("register failed"));

        let first = service.record_scan(&view.id, "guard-1").await;
        assert!(first.is_ok());

        let second = service.record_scan(&view.id, "guard-2").await;
        assert!(matches!(second, Err(GatewayError::AlreadyScanned(_))));
    }

    #[tokio::test]
    async fn scan_then_status_overrides_future_visit_date() {
        let service = make_service();
        let registered_a = service
            .register(new_visitor("Ana", Some("1/6/2025")))
            .await
            .unwrap_or_else(|_| panic!("register failed"));
        let _registered_b = service
            .register(new_visitor("Ben", Some("1/6/2099")))
            .await
            .unwrap_or_else(|_| panic!("register failed"));

        let scanned = service
            .record_scan(&registered_a.id, "guard-1")
            .await
            .unwrap_or_else(|_| panic!("scan failed"));
        assert_eq!(scanned.status, VisitStatus::Scanned);
        assert!(scanned.scanned_at.is_some());

        let snapshot = service
            .snapshot(reference_now())
            .await
            .unwrap_or_else(|_| panic!("snapshot failed"));
        assert_eq!(snapshot.visitors.len(), 2);
        for view in &snapshot.visitors {
            match view.first_name.as_str() {
                "Ana" => assert_eq!(view.status, VisitStatus::Scanned),
                "Ben" => assert_eq!(view.status, VisitStatus::Upcoming),
                other => panic!("unexpected visitor {other}"),
            }
        }
    }

    #[tokio::test]
    async fn snapshot_epochs_increase_monotonically() {
        let service = make_service();
        let first = service
            .snapshot(reference_now())
            .await
            .unwrap_or_else(|_| panic!("snapshot failed"));
        let second = service
            .snapshot(reference_now())
            .await
            .unwrap_or_else(|_| panic!("snapshot failed"));
        assert!(second.epoch > first.epoch);
        assert_eq!(service.current_epoch(), second.epoch);
    }

    #[tokio::test]
    async fn unknown_creator_resolves_to_unknown_and_is_cached() {
        let service = make_service();
        let view = service
            .register(new_visitor("Ana", None))
            .await
            .unwrap_or_else(|_| panic!("register failed"));
        assert_eq!(view.created_by_name, UNKNOWN_IDENTITY);
        assert_eq!(service.users.get("user-1").await.as_deref(), Some(UNKNOWN_IDENTITY));
    }

    #[tokio::test]
    async fn statistics_total_matches_monthly_sum() {
        let service = make_service();
        for date in ["23/5/2025", "1/6/2025", "2/6/2025"] {
            let _ = service.register(new_visitor("Ana", Some(date))).await;
        }
        let stats = service
            .statistics(reference_now(), 2025)
            .await
            .unwrap_or_else(|_| panic!("statistics failed"));
        assert_eq!(stats.total_for_year, stats.monthly.iter().sum::<u64>());
        assert_eq!(stats.total_for_year, 3);
    }

    #[test]
    fn display_name_prefers_direct_fields() {
        assert_eq!(display_name(&json!({"name": "Dana"})), "Dana");
        assert_eq!(display_name(&json!({"displayName": "Dana L"})), "Dana L");
        assert_eq!(
            display_name(&json!({"firstName": "Dana", "lastName": "Lim"})),
            "Dana Lim"
        );
        assert_eq!(display_name(&json!({})), UNKNOWN_IDENTITY);
    }
}
