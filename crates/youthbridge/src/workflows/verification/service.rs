use std::sync::Arc;

use chrono::Utc;
use url::Url;

use super::assignment::select_field_agent;
use super::domain::{
    next_document_id, next_visit_id, CaseView, Document, DocumentAction, DocumentUpload,
    FieldVisit, ReviewRequest, ScheduleRequest, ScheduledVisit, StoredDocument, Verification,
    VerificationId, VerificationStatus, VisitRequest, YouthSearchFilters, YouthSearchHit,
};
use super::repository::{DocumentRepository, VerificationRepository, VisitRepository};
use crate::workflows::directory::domain::{UserId, UserRecord, UserRole};
use crate::workflows::directory::repository::UserRepository;
use crate::workflows::repository::RepositoryError;

/// Validation dials for document uploads.
#[derive(Debug, Clone, Copy)]
pub struct DocumentPolicy {
    pub max_document_bytes: u64,
}

impl Default for DocumentPolicy {
    fn default() -> Self {
        Self {
            max_document_bytes: 5 * 1024 * 1024,
        }
    }
}

/// Service composing the directory, case, document, and visit stores.
pub struct VerificationService<U, V, D, F> {
    users: Arc<U>,
    verifications: Arc<V>,
    documents: Arc<D>,
    visits: Arc<F>,
    policy: DocumentPolicy,
}

impl<U, V, D, F> VerificationService<U, V, D, F>
where
    U: UserRepository + 'static,
    V: VerificationRepository + 'static,
    D: DocumentRepository + 'static,
    F: VisitRepository + 'static,
{
    pub fn new(
        users: Arc<U>,
        verifications: Arc<V>,
        documents: Arc<D>,
        visits: Arc<F>,
        policy: DocumentPolicy,
    ) -> Self {
        Self {
            users,
            verifications,
            documents,
            visits,
            policy,
        }
    }

    /// Store an identity document. A re-upload of the same kind replaces the
    /// previous document in place, keeping its id.
    pub fn upload_document(
        &self,
        user_id: &UserId,
        upload: DocumentUpload,
    ) -> Result<StoredDocument, VerificationError> {
        self.fetch_user(user_id)?;
        self.validate_upload(&upload)?;

        let now = Utc::now();
        if let Some(mut existing) = self.documents.find_by_kind(user_id, upload.kind)? {
            existing.file_name = upload.file_name;
            existing.file_url = upload.file_url;
            existing.mime_type = upload.mime_type;
            existing.size_bytes = upload.size_bytes;
            existing.uploaded_at = now;
            self.documents.update(existing.clone())?;
            return Ok(StoredDocument {
                document: existing,
                action: DocumentAction::Replaced,
            });
        }

        let document = Document {
            id: next_document_id(),
            user_id: user_id.clone(),
            kind: upload.kind,
            file_name: upload.file_name,
            file_url: upload.file_url,
            mime_type: upload.mime_type,
            size_bytes: upload.size_bytes,
            uploaded_at: now,
        };
        let stored = self.documents.insert(document)?;
        Ok(StoredDocument {
            document: stored,
            action: DocumentAction::Created,
        })
    }

    /// A user's documents, newest first.
    pub fn documents_for(&self, user_id: &UserId) -> Result<Vec<Document>, VerificationError> {
        self.fetch_user(user_id)?;
        let mut documents = self.documents.list_for_user(user_id)?;
        documents.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
        Ok(documents)
    }

    /// The youth's own verification case, when one exists.
    pub fn case_for_user(&self, user_id: &UserId) -> Result<Option<CaseView>, VerificationError> {
        self.fetch_user(user_id)?;
        match self.verifications.fetch_by_user(user_id)? {
            Some(verification) => Ok(Some(self.case_view(verification)?)),
            None => Ok(None),
        }
    }

    /// All PENDING cases, newest first, for the admin review queue.
    pub fn pending_cases(&self) -> Result<Vec<CaseView>, VerificationError> {
        let mut pending: Vec<Verification> = self
            .verifications
            .list()?
            .into_iter()
            .filter(|verification| verification.status == VerificationStatus::Pending)
            .collect();
        pending.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        pending
            .into_iter()
            .map(|verification| self.case_view(verification))
            .collect()
    }

    /// Record an admin verdict on a case.
    pub fn review(
        &self,
        verification_id: &VerificationId,
        request: ReviewRequest,
    ) -> Result<CaseView, VerificationError> {
        let mut verification = self.fetch_case(verification_id)?;
        self.require_role(&request.admin_id, UserRole::Admin)?;

        verification.status = request.verdict.status();
        verification.admin_id = Some(request.admin_id);
        verification.admin_notes = request.notes;
        if verification.status == VerificationStatus::Verified {
            verification.verified_at = Some(Utc::now());
        }

        self.verifications.update(verification.clone())?;
        self.case_view(verification)
    }

    /// Put a specific field agent on a case and move it under review.
    pub fn assign_agent(
        &self,
        verification_id: &VerificationId,
        agent_id: &UserId,
    ) -> Result<CaseView, VerificationError> {
        let mut verification = self.fetch_case(verification_id)?;
        self.require_role(agent_id, UserRole::FieldAgent)?;

        verification.field_agent_id = Some(agent_id.clone());
        verification.status = VerificationStatus::UnderReview;
        self.verifications.update(verification.clone())?;
        self.case_view(verification)
    }

    /// Every case assigned to the agent, newest first.
    pub fn agent_worklist(&self, agent_id: &UserId) -> Result<Vec<CaseView>, VerificationError> {
        self.require_role(agent_id, UserRole::FieldAgent)?;

        let mut cases: Vec<Verification> = self
            .verifications
            .list()?
            .into_iter()
            .filter(|verification| verification.field_agent_id.as_ref() == Some(agent_id))
            .collect();
        cases.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        cases
            .into_iter()
            .map(|verification| self.case_view(verification))
            .collect()
    }

    /// An agent logs a visit they carried out.
    pub fn record_visit(&self, request: VisitRequest) -> Result<FieldVisit, VerificationError> {
        self.require_role(&request.field_agent_id, UserRole::FieldAgent)?;
        self.fetch_case(&request.verification_id)?;
        validate_photos(&request.photos)?;

        let visit = FieldVisit {
            id: next_visit_id(),
            verification_id: request.verification_id,
            field_agent_id: request.field_agent_id,
            visit_date: request.visit_date,
            notes: request.notes,
            photos: request.photos,
        };
        Ok(self.visits.insert(visit)?)
    }

    /// Admin-side scheduling: pick an agent by the youth's location, assign
    /// them, and create the visit in one operation.
    pub fn schedule_visit(
        &self,
        request: ScheduleRequest,
    ) -> Result<ScheduledVisit, VerificationError> {
        let mut verification = self.fetch_case(&request.verification_id)?;
        let youth = self.fetch_user(&verification.user_id)?;
        validate_photos(&request.photos)?;

        let roster = self.users.list()?;
        let selected =
            select_field_agent(&youth, &roster).ok_or(VerificationError::NoAgentAvailable)?;

        verification.field_agent_id = Some(selected.agent.id.clone());
        verification.status = VerificationStatus::UnderReview;
        self.verifications.update(verification.clone())?;

        let visit = FieldVisit {
            id: next_visit_id(),
            verification_id: verification.id,
            field_agent_id: selected.agent.id.clone(),
            visit_date: request.visit_date,
            notes: request.notes,
            photos: request.photos,
        };
        let visit = self.visits.insert(visit)?;

        Ok(ScheduledVisit {
            visit,
            assigned_agent: selected.agent.summary(),
            matched_on: selected.basis.label(),
        })
    }

    /// An agent closes out field verification; the case becomes VERIFIED.
    pub fn complete(
        &self,
        verification_id: &VerificationId,
        agent_id: &UserId,
        notes: Option<String>,
    ) -> Result<CaseView, VerificationError> {
        let mut verification = self.fetch_case(verification_id)?;
        self.require_role(agent_id, UserRole::FieldAgent)?;

        verification.status = VerificationStatus::Verified;
        verification.field_notes = notes;
        verification.verified_at = Some(Utc::now());
        self.verifications.update(verification.clone())?;
        self.case_view(verification)
    }

    /// Admin search across the youth population.
    pub fn search_youth(
        &self,
        filters: YouthSearchFilters,
    ) -> Result<Vec<YouthSearchHit>, VerificationError> {
        let mut youths: Vec<UserRecord> = self
            .users
            .list()?
            .into_iter()
            .filter(|record| record.role == UserRole::Youth)
            .filter(|record| matches_filters(record, &filters))
            .collect();
        youths.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let mut hits = Vec::with_capacity(youths.len());
        for youth in youths {
            let verification = self
                .verifications
                .fetch_by_user(&youth.id)?
                .map(|verification| verification.status);

            if let Some(wanted) = filters.status {
                if verification != Some(wanted) {
                    continue;
                }
            }

            let documents = self
                .documents
                .list_for_user(&youth.id)?
                .iter()
                .map(Document::meta)
                .collect();

            hits.push(YouthSearchHit {
                youth: youth.youth_summary(),
                verification,
                documents,
            });
        }
        Ok(hits)
    }

    fn case_view(&self, verification: Verification) -> Result<CaseView, VerificationError> {
        let youth = self.fetch_user(&verification.user_id)?;
        let documents = self
            .documents
            .list_for_user(&youth.id)?
            .iter()
            .map(Document::meta)
            .collect();

        let mut visits = self.visits.list_for_verification(&verification.id)?;
        visits.sort_by(|a, b| b.visit_date.cmp(&a.visit_date));

        let admin = self.optional_summary(verification.admin_id.as_ref())?;
        let field_agent = self.optional_summary(verification.field_agent_id.as_ref())?;

        Ok(CaseView {
            verification,
            youth: youth.youth_summary(),
            documents,
            visits,
            admin,
            field_agent,
        })
    }

    fn optional_summary(
        &self,
        id: Option<&UserId>,
    ) -> Result<Option<crate::workflows::directory::domain::UserSummary>, VerificationError> {
        match id {
            Some(id) => Ok(self.users.fetch(id)?.map(|record| record.summary())),
            None => Ok(None),
        }
    }

    fn fetch_user(&self, id: &UserId) -> Result<UserRecord, VerificationError> {
        self.users.fetch(id)?.ok_or(VerificationError::UserNotFound)
    }

    fn fetch_case(&self, id: &VerificationId) -> Result<Verification, VerificationError> {
        self.verifications
            .fetch(id)?
            .ok_or(VerificationError::CaseNotFound)
    }

    fn require_role(&self, id: &UserId, role: UserRole) -> Result<UserRecord, VerificationError> {
        let record = self.fetch_user(id)?;
        if record.role != role {
            return Err(match role {
                UserRole::Admin => VerificationError::NotAnAdmin(record.id.0),
                _ => VerificationError::NotAFieldAgent(record.id.0),
            });
        }
        Ok(record)
    }

    fn validate_upload(&self, upload: &DocumentUpload) -> Result<(), DocumentViolation> {
        if !upload.kind.is_identity() {
            return Err(DocumentViolation::UnsupportedKind(upload.kind.label()));
        }
        if upload.file_name.trim().is_empty() {
            return Err(DocumentViolation::EmptyFileName);
        }
        validate_http_url(&upload.file_url)
            .map_err(|_| DocumentViolation::InvalidUrl(upload.file_url.clone()))?;
        if let Some(mime_type) = upload.mime_type.as_deref() {
            mime_type
                .parse::<mime::Mime>()
                .map_err(|_| DocumentViolation::InvalidMimeType(mime_type.to_string()))?;
        }
        match upload.size_bytes {
            Some(0) => Err(DocumentViolation::EmptySize),
            Some(found) if found > self.policy.max_document_bytes => {
                Err(DocumentViolation::Oversized {
                    max: self.policy.max_document_bytes,
                    found,
                })
            }
            _ => Ok(()),
        }
    }
}

fn validate_photos(photos: &[String]) -> Result<(), VerificationError> {
    for photo in photos {
        validate_http_url(photo)
            .map_err(|_| VerificationError::InvalidPhotoUrl(photo.clone()))?;
    }
    Ok(())
}

fn validate_http_url(raw: &str) -> Result<(), ()> {
    let parsed = Url::parse(raw).map_err(|_| ())?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        _ => Err(()),
    }
}

/// Category is exact; country is a case-insensitive substring; the camp
/// filter matches camp OR community, also case-insensitively.
fn matches_filters(record: &UserRecord, filters: &YouthSearchFilters) -> bool {
    if let Some(category) = filters.category {
        if record.category != Some(category) {
            return false;
        }
    }

    if let Some(country) = filters.country.as_deref() {
        if !contains_ci(record.country.as_deref(), country) {
            return false;
        }
    }

    if let Some(camp) = filters.camp.as_deref() {
        if !contains_ci(record.camp.as_deref(), camp)
            && !contains_ci(record.community.as_deref(), camp)
        {
            return false;
        }
    }

    true
}

fn contains_ci(haystack: Option<&str>, needle: &str) -> bool {
    match haystack {
        Some(value) => value.to_lowercase().contains(&needle.to_lowercase()),
        None => false,
    }
}

/// Validation errors raised for document uploads.
#[derive(Debug, thiserror::Error)]
pub enum DocumentViolation {
    #[error("document kind {0} cannot be uploaded for identity review")]
    UnsupportedKind(&'static str),
    #[error("file name is required")]
    EmptyFileName,
    #[error("file URL is not valid: {0}")]
    InvalidUrl(String),
    #[error("mime type is not valid: {0}")]
    InvalidMimeType(String),
    #[error("document size must be positive")]
    EmptySize,
    #[error("document exceeds the upload limit (max {max} bytes, found {found})")]
    Oversized { max: u64, found: u64 },
}

/// Error raised by the verification service.
#[derive(Debug, thiserror::Error)]
pub enum VerificationError {
    #[error("verification case not found")]
    CaseNotFound,
    #[error("user not found")]
    UserNotFound,
    #[error("user {0} does not hold the FIELD_AGENT role")]
    NotAFieldAgent(String),
    #[error("user {0} does not hold the ADMIN role")]
    NotAnAdmin(String),
    #[error("no field agents available in the youth's camp or country to schedule the visit")]
    NoAgentAvailable,
    #[error("photo URL is not valid: {0}")]
    InvalidPhotoUrl(String),
    #[error(transparent)]
    Document(#[from] DocumentViolation),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
