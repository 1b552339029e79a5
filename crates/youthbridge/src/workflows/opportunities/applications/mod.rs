//! Application intake against donor listings.
//!
//! Submissions pass through the eligibility gate (active listing, then
//! deadline, verification, duplicate, and capacity) before anything is
//! stored. Donors adjudicate the applications on their own listings.

pub mod domain;
pub mod eligibility;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Application, ApplicationDetail, ApplicationId, ApplicationStatus, ApplicationSubmission,
    ApplicationView, AttachmentUpload, DonorApplicationView, StatusUpdate,
};
pub use eligibility::{admit, IntakeDecision, IntakeSnapshot, RefusalReason};
pub use repository::ApplicationRepository;
pub use router::application_router;
pub use service::{ApplicationError, ApplicationService};
