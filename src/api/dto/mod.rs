//! Data Transfer Objects for REST request/response serialization.
//!
//! All timestamps serialize as RFC 3339 strings; display formatting beyond
//! the canonical instant is left to the console.

pub mod announcement_dto;
pub mod common_dto;
pub mod feedback_dto;
pub mod visitor_dto;

pub use announcement_dto::*;
pub use common_dto::*;
pub use feedback_dto::*;
pub use visitor_dto::*;
