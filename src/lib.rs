//! # estate-gateway
//!
//! REST API and WebSocket gateway for a residential community management
//! console: visitor QR registration and gate scans, community
//! announcements, and resident feedback.
//!
//! The core of the service is visitor-record reconciliation — joining
//! issued QR codes with gate scan logs, deriving each visit's status,
//! and aggregating traffic statistics for the dashboard.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── WS Handler (ws/)
//!     │
//!     ├── VisitorService / AnnouncementService / FeedbackService (service/)
//!     ├── EventBus (domain/)
//!     │
//!     ├── Reconciliation, status derivation, aggregation (domain/)
//!     │
//!     └── DocumentStore (persistence/: PostgreSQL or in-memory)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
pub mod ws;
