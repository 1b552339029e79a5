//! Donor-posted opportunities and the application intake that gates them.

pub mod applications;
pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{
    NewOpportunity, Opportunity, OpportunityFilters, OpportunityId, OpportunityUpdate,
    OpportunityView,
};
pub use repository::OpportunityRepository;
pub use router::opportunity_router;
pub use service::{OpportunityError, OpportunityService};
