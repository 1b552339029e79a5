use super::domain::{Application, ApplicationId};
use crate::workflows::directory::domain::UserId;
use crate::workflows::opportunities::domain::OpportunityId;
use crate::workflows::repository::RepositoryError;

/// Storage abstraction for applications.
///
/// `insert` must reject a second application for the same
/// `(youth, opportunity)` pair with [`RepositoryError::Conflict`]. The gate
/// checks first, but the store is the final guard.
pub trait ApplicationRepository: Send + Sync {
    fn insert(&self, application: Application) -> Result<Application, RepositoryError>;
    fn update(&self, application: Application) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError>;
    fn find_for_pair(
        &self,
        youth: &UserId,
        opportunity: &OpportunityId,
    ) -> Result<Option<Application>, RepositoryError>;
    fn list_for_youth(&self, youth: &UserId) -> Result<Vec<Application>, RepositoryError>;
    fn list_for_opportunity(
        &self,
        opportunity: &OpportunityId,
    ) -> Result<Vec<Application>, RepositoryError>;
    fn count_for_opportunity(
        &self,
        opportunity: &OpportunityId,
    ) -> Result<usize, RepositoryError>;
}
