//! WebSocket layer: connection handling, message routing, subscriptions.
//!
//! The WebSocket endpoint at `/ws` pushes console events (visitor
//! registrations and scans, announcement changes, feedback submissions)
//! to subscribed clients in real time.

pub mod connection;
pub mod handler;
pub mod messages;
pub mod subscription;
