//! REST endpoint handlers organized by resource.

pub mod announcement;
pub mod feedback;
pub mod system;
pub mod visitor;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(visitor::routes())
        .merge(announcement::routes())
        .merge(feedback::routes())
}
