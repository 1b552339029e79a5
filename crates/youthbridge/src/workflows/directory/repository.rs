use super::domain::{UserId, UserRecord};
use crate::workflows::repository::RepositoryError;

/// Storage abstraction for directory records.
///
/// `insert` must reject a second record with the same (normalized) email with
/// [`RepositoryError::Conflict`].
pub trait UserRepository: Send + Sync {
    fn insert(&self, record: UserRecord) -> Result<UserRecord, RepositoryError>;
    fn update(&self, record: UserRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &UserId) -> Result<Option<UserRecord>, RepositoryError>;
    fn fetch_by_email(&self, email: &str) -> Result<Option<UserRecord>, RepositoryError>;
    fn list(&self) -> Result<Vec<UserRecord>, RepositoryError>;
}
