use super::domain::{
    Document, DocumentId, DocumentKind, FieldVisit, Verification, VerificationId,
};
use crate::workflows::directory::domain::UserId;
use crate::workflows::repository::RepositoryError;

/// Storage abstraction for verification cases.
///
/// `insert` must reject a second case for the same youth with
/// [`RepositoryError::Conflict`].
pub trait VerificationRepository: Send + Sync {
    fn insert(&self, verification: Verification) -> Result<Verification, RepositoryError>;
    fn update(&self, verification: Verification) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &VerificationId) -> Result<Option<Verification>, RepositoryError>;
    fn fetch_by_user(&self, user: &UserId) -> Result<Option<Verification>, RepositoryError>;
    fn list(&self) -> Result<Vec<Verification>, RepositoryError>;
}

/// Storage abstraction for uploaded documents.
pub trait DocumentRepository: Send + Sync {
    fn insert(&self, document: Document) -> Result<Document, RepositoryError>;
    fn update(&self, document: Document) -> Result<(), RepositoryError>;
    fn find_by_kind(
        &self,
        user: &UserId,
        kind: DocumentKind,
    ) -> Result<Option<Document>, RepositoryError>;
    fn list_for_user(&self, user: &UserId) -> Result<Vec<Document>, RepositoryError>;
    fn fetch(&self, id: &DocumentId) -> Result<Option<Document>, RepositoryError>;
}

/// Storage abstraction for field visit records.
pub trait VisitRepository: Send + Sync {
    fn insert(&self, visit: FieldVisit) -> Result<FieldVisit, RepositoryError>;
    fn list_for_verification(
        &self,
        id: &VerificationId,
    ) -> Result<Vec<FieldVisit>, RepositoryError>;
}
