//! Service layer: orchestration of store access, domain logic, and events.

pub mod announcement_service;
pub mod feedback_service;
pub mod visitor_service;

pub use announcement_service::AnnouncementService;
pub use feedback_service::FeedbackService;
pub use visitor_service::VisitorService;
