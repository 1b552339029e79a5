//! Identity verification: document uploads, the admin review queue, field
//! agent assignment and visits, and the admin youth search.

pub mod assignment;
pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use assignment::{select_field_agent, AgentMatch, MatchBasis};
pub use domain::{
    CaseView, Document, DocumentAction, DocumentKind, DocumentMeta, DocumentUpload, FieldVisit,
    ReviewRequest, ReviewVerdict, ScheduleRequest, ScheduledVisit, StoredDocument, Verification,
    VerificationId, VerificationStatus, VisitId, VisitRequest, YouthSearchFilters, YouthSearchHit,
};
pub use repository::{DocumentRepository, VerificationRepository, VisitRepository};
pub use router::verification_router;
pub use service::{DocumentPolicy, DocumentViolation, VerificationError, VerificationService};
