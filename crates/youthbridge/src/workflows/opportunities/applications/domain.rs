use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::directory::domain::{UserId, UserSummary, YouthSummary};
use crate::workflows::opportunities::domain::{Opportunity, OpportunityId};
use crate::workflows::verification::domain::VerificationStatus;

/// Identifier wrapper for submitted applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

/// Lifecycle of an application as the donor works through it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    Pending,
    UnderReview,
    Selected,
    Rejected,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::UnderReview => "UNDER_REVIEW",
            Self::Selected => "SELECTED",
            Self::Rejected => "REJECTED",
        }
    }
}

/// A youth's submission against an opportunity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub youth_id: UserId,
    pub opportunity_id: OpportunityId,
    pub cover_letter: Option<String>,
    pub additional_info: Option<String>,
    pub status: ApplicationStatus,
    pub submitted_at: DateTime<Utc>,
}

/// Intake payload. Attached documents are stored on the youth's document
/// list as generic attachments.
#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationSubmission {
    pub youth_id: UserId,
    pub opportunity_id: OpportunityId,
    #[serde(default)]
    pub cover_letter: Option<String>,
    #[serde(default)]
    pub additional_info: Option<String>,
    #[serde(default)]
    pub documents: Vec<AttachmentUpload>,
}

/// Descriptor for a file attached during intake.
#[derive(Debug, Clone, Deserialize)]
pub struct AttachmentUpload {
    pub file_name: String,
    pub file_url: String,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub size_bytes: Option<u64>,
}

/// Donor adjudication payload.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusUpdate {
    pub donor_id: UserId,
    pub status: ApplicationStatus,
}

/// Youth-facing view: the application with the listing and its donor.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationView {
    pub application: Application,
    pub opportunity: Opportunity,
    pub donor: UserSummary,
}

/// Donor-facing view: the application with the youth and their
/// verification status.
#[derive(Debug, Clone, Serialize)]
pub struct DonorApplicationView {
    pub application: Application,
    pub youth: YouthSummary,
    pub verification: Option<VerificationStatus>,
}

/// Full view used for single-application reads and adjudication responses.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationDetail {
    pub application: Application,
    pub opportunity: Opportunity,
    pub donor: UserSummary,
    pub youth: YouthSummary,
}
