//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::domain::EventBus;
use crate::service::{AnnouncementService, FeedbackService, VisitorService};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Visitor registration, scans, and reconciliation.
    pub visitor_service: Arc<VisitorService>,
    /// Announcement board operations.
    pub announcement_service: Arc<AnnouncementService>,
    /// Feedback submissions and rating summary.
    pub feedback_service: Arc<FeedbackService>,
    /// Event bus for WebSocket subscriptions.
    pub event_bus: EventBus,
}
