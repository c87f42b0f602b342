//! Domain layer: the visitor reconciliation core and the event system.
//!
//! This module contains the pure, synchronous heart of the gateway — date
//! normalization, issuance/scan-log reconciliation, lifecycle status
//! derivation, and dashboard aggregation — plus the identity cache and the
//! event bus for broadcasting state changes. Everything here operates on
//! already-materialized in-memory collections and never suspends except
//! for cache locking.

pub mod dates;
pub mod event;
pub mod event_bus;
pub mod identity;
pub mod reconcile;
pub mod records;
pub mod stats;
pub mod status;

pub use dates::{ParsedDate, parse_date, parse_date_str};
pub use event::ConsoleEvent;
pub use event_bus::EventBus;
pub use identity::IdentityCache;
pub use reconcile::reconcile;
pub use records::{ReconciledVisitor, ScanInfo, VisitorIssuance, VisitorScanLog};
pub use stats::{VisitorStatistics, aggregate};
pub use status::{VisitStatus, derive_status};
