//! Domain events reflecting console state mutations.
//!
//! Every write through a service emits a [`ConsoleEvent`] through the
//! [`super::EventBus`]. Events are broadcast to WebSocket subscribers so
//! open dashboards can refresh without polling.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Domain event emitted after every state mutation.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum ConsoleEvent {
    /// Emitted when a visit invitation is issued.
    VisitorRegistered {
        /// Issuance identifier (the visitor's QR code ID).
        qr_code_id: String,
        /// Full visitor name.
        visitor_name: String,
        /// Intended visit instant, when it parsed.
        visit_date: Option<DateTime<Utc>>,
        /// Emission timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted when a guard scans a visitor's QR code at the gate.
    VisitorScanned {
        /// Issuance identifier that was scanned.
        qr_code_id: String,
        /// Identifier of the scanning guard.
        scanned_by: String,
        /// Scan timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted when an announcement is posted.
    AnnouncementPosted {
        /// Announcement document identifier.
        id: String,
        /// Announcement title.
        title: String,
        /// Emission timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted when an announcement is edited.
    AnnouncementUpdated {
        /// Announcement document identifier.
        id: String,
        /// Emission timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted when an announcement is deleted.
    AnnouncementRemoved {
        /// Announcement document identifier.
        id: String,
        /// Emission timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted when a resident submits feedback.
    FeedbackSubmitted {
        /// Feedback document identifier.
        id: String,
        /// Rating from 1 to 5.
        rating: u8,
        /// Emission timestamp.
        timestamp: DateTime<Utc>,
    },
}

impl ConsoleEvent {
    /// Returns the subscription topic this event belongs to.
    #[must_use]
    pub const fn topic(&self) -> &'static str {
        match self {
            Self::VisitorRegistered { .. } | Self::VisitorScanned { .. } => "visitors",
            Self::AnnouncementPosted { .. }
            | Self::AnnouncementUpdated { .. }
            | Self::AnnouncementRemoved { .. } => "announcements",
            Self::FeedbackSubmitted { .. } => "feedback",
        }
    }

    /// Returns the event type as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::VisitorRegistered { .. } => "visitor_registered",
            Self::VisitorScanned { .. } => "visitor_scanned",
            Self::AnnouncementPosted { .. } => "announcement_posted",
            Self::AnnouncementUpdated { .. } => "announcement_updated",
            Self::AnnouncementRemoved { .. } => "announcement_removed",
            Self::FeedbackSubmitted { .. } => "feedback_submitted",
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn visitor_events_share_the_visitors_topic() {
        let registered = ConsoleEvent::VisitorRegistered {
            qr_code_id: "q-1".to_string(),
            visitor_name: "Ana Cruz".to_string(),
            visit_date: None,
            timestamp: Utc::now(),
        };
        let scanned = ConsoleEvent::VisitorScanned {
            qr_code_id: "q-1".to_string(),
            scanned_by: "guard-1".to_string(),
            timestamp: Utc::now(),
        };
        assert_eq!(registered.topic(), "visitors");
        assert_eq!(scanned.topic(), "visitors");
        assert_eq!(scanned.event_type_str(), "visitor_scanned");
    }

    #[test]
    fn events_serialize_with_type_tag() {
        let event = ConsoleEvent::FeedbackSubmitted {
            id: "f-1".to_string(),
            rating: 4,
            timestamp: Utc::now(),
        };
        let json = serde_json::to_string(&event).unwrap_or_default();
        assert!(json.contains("feedback_submitted"));
        assert!(json.contains("\"rating\":4"));
    }
}
