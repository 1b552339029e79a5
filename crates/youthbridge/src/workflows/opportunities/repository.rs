use super::domain::{Opportunity, OpportunityId};
use crate::workflows::repository::RepositoryError;

/// Storage abstraction for donor listings.
pub trait OpportunityRepository: Send + Sync {
    fn insert(&self, opportunity: Opportunity) -> Result<Opportunity, RepositoryError>;
    fn update(&self, opportunity: Opportunity) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &OpportunityId) -> Result<Option<Opportunity>, RepositoryError>;
    fn remove(&self, id: &OpportunityId) -> Result<(), RepositoryError>;
    fn list(&self) -> Result<Vec<Opportunity>, RepositoryError>;
}
