//! User directory: registration, profiles, and the paginated admin listing.
//!
//! Registering a youth also opens their verification case, so the rest of the
//! platform can assume exactly one case per youth.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{
    DirectoryEntry, NewUser, PaginationLimits, ProfileUpdate, RegisteredUser, SortOrder, UserId,
    UserListQuery, UserPage, UserRecord, UserRole, UserSortKey, UserSummary, YouthCategory,
    YouthSummary,
};
pub use repository::UserRepository;
pub use router::directory_router;
pub use service::{DirectoryError, DirectoryService};
