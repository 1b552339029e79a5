use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::directory::domain::{UserId, UserSummary, YouthSummary};

/// Identifier wrapper for verification cases.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VerificationId(pub String);

/// Identifier wrapper for uploaded documents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(pub String);

/// Identifier wrapper for field visits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VisitId(pub String);

static VERIFICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static DOCUMENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static VISIT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

pub(crate) fn next_verification_id() -> VerificationId {
    let id = VERIFICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    VerificationId(format!("ver-{id:06}"))
}

pub(crate) fn next_document_id() -> DocumentId {
    let id = DOCUMENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    DocumentId(format!("doc-{id:06}"))
}

pub(crate) fn next_visit_id() -> VisitId {
    let id = VISIT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    VisitId(format!("visit-{id:06}"))
}

/// Lifecycle of a verification case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationStatus {
    Pending,
    UnderReview,
    Verified,
    Rejected,
}

impl VerificationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::UnderReview => "UNDER_REVIEW",
            Self::Verified => "VERIFIED",
            Self::Rejected => "REJECTED",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Some(Self::Pending),
            "UNDER_REVIEW" => Some(Self::UnderReview),
            "VERIFIED" => Some(Self::Verified),
            "REJECTED" => Some(Self::Rejected),
            _ => None,
        }
    }
}

/// Statuses an admin may set during review. PENDING cannot be re-entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewVerdict {
    Verified,
    Rejected,
    UnderReview,
}

impl ReviewVerdict {
    pub const fn status(self) -> VerificationStatus {
        match self {
            Self::Verified => VerificationStatus::Verified,
            Self::Rejected => VerificationStatus::Rejected,
            Self::UnderReview => VerificationStatus::UnderReview,
        }
    }
}

/// One verification case per youth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verification {
    pub id: VerificationId,
    pub user_id: UserId,
    pub status: VerificationStatus,
    pub admin_id: Option<UserId>,
    pub field_agent_id: Option<UserId>,
    pub admin_notes: Option<String>,
    pub field_notes: Option<String>,
    pub verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Document kinds. The three identity kinds are replace-on-reupload; generic
/// attachments accumulate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentKind {
    Id,
    Transcript,
    RecommendationLetter,
    Attachment,
}

impl DocumentKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Id => "ID",
            Self::Transcript => "TRANSCRIPT",
            Self::RecommendationLetter => "RECOMMENDATION_LETTER",
            Self::Attachment => "ATTACHMENT",
        }
    }

    /// Kinds accepted by the verification upload endpoint.
    pub const fn is_identity(self) -> bool {
        !matches!(self, Self::Attachment)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub user_id: UserId,
    pub kind: DocumentKind,
    pub file_name: String,
    pub file_url: String,
    pub mime_type: Option<String>,
    pub size_bytes: Option<u64>,
    pub uploaded_at: DateTime<Utc>,
}

impl Document {
    pub fn meta(&self) -> DocumentMeta {
        DocumentMeta {
            id: self.id.clone(),
            kind: self.kind,
            file_name: self.file_name.clone(),
            file_url: self.file_url.clone(),
            uploaded_at: self.uploaded_at,
        }
    }
}

/// Compact document view embedded in case and search payloads.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentMeta {
    pub id: DocumentId,
    pub kind: DocumentKind,
    pub file_name: String,
    pub file_url: String,
    pub uploaded_at: DateTime<Utc>,
}

/// Upload payload for identity documents.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentUpload {
    pub kind: DocumentKind,
    pub file_name: String,
    pub file_url: String,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub size_bytes: Option<u64>,
}

/// Whether an upload created a fresh document or replaced the previous one
/// of the same kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentAction {
    Created,
    Replaced,
}

/// Upload result echoed to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct StoredDocument {
    pub document: Document,
    pub action: DocumentAction,
}

/// Record of a field agent visiting a youth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldVisit {
    pub id: VisitId,
    pub verification_id: VerificationId,
    pub field_agent_id: UserId,
    pub visit_date: DateTime<Utc>,
    pub notes: Option<String>,
    pub photos: Vec<String>,
}

/// Admin review payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewRequest {
    pub admin_id: UserId,
    pub verdict: ReviewVerdict,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Payload for an agent recording a visit they carried out.
#[derive(Debug, Clone, Deserialize)]
pub struct VisitRequest {
    pub field_agent_id: UserId,
    pub verification_id: VerificationId,
    pub visit_date: DateTime<Utc>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub photos: Vec<String>,
}

/// Payload for admin-side scheduling; the service picks the agent.
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleRequest {
    pub verification_id: VerificationId,
    pub visit_date: DateTime<Utc>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub photos: Vec<String>,
}

/// Result of auto-scheduling: the visit plus the agent that was chosen.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduledVisit {
    pub visit: FieldVisit,
    pub assigned_agent: UserSummary,
    pub matched_on: &'static str,
}

/// A verification case joined with its youth, documents, and visits.
#[derive(Debug, Clone, Serialize)]
pub struct CaseView {
    pub verification: Verification,
    pub youth: YouthSummary,
    pub documents: Vec<DocumentMeta>,
    pub visits: Vec<FieldVisit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin: Option<UserSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_agent: Option<UserSummary>,
}

/// Admin search filters over the youth population.
#[derive(Debug, Clone, Default)]
pub struct YouthSearchFilters {
    pub category: Option<crate::workflows::directory::domain::YouthCategory>,
    pub country: Option<String>,
    pub camp: Option<String>,
    pub status: Option<VerificationStatus>,
}

/// One youth search result.
#[derive(Debug, Clone, Serialize)]
pub struct YouthSearchHit {
    pub youth: YouthSummary,
    pub verification: Option<VerificationStatus>,
    pub documents: Vec<DocumentMeta>,
}
