use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;

use super::domain::{
    Application, ApplicationDetail, ApplicationId, ApplicationStatus, ApplicationSubmission,
    ApplicationView, DonorApplicationView,
};
use super::eligibility::{admit, IntakeDecision, IntakeSnapshot, RefusalReason};
use super::repository::ApplicationRepository;
use crate::workflows::directory::domain::{UserId, UserRecord};
use crate::workflows::directory::repository::UserRepository;
use crate::workflows::opportunities::domain::{Opportunity, OpportunityId};
use crate::workflows::opportunities::repository::OpportunityRepository;
use crate::workflows::repository::RepositoryError;
use crate::workflows::verification::domain::{next_document_id, Document, DocumentKind};
use crate::workflows::verification::repository::{DocumentRepository, VerificationRepository};

static APPLICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_application_id() -> ApplicationId {
    let id = APPLICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ApplicationId(format!("app-{id:06}"))
}

/// Service composing the gate, the application store, and the surrounding
/// directory/verification/opportunity stores.
pub struct ApplicationService<A, O, V, U, D> {
    applications: Arc<A>,
    opportunities: Arc<O>,
    verifications: Arc<V>,
    users: Arc<U>,
    documents: Arc<D>,
}

impl<A, O, V, U, D> ApplicationService<A, O, V, U, D>
where
    A: ApplicationRepository + 'static,
    O: OpportunityRepository + 'static,
    V: VerificationRepository + 'static,
    U: UserRepository + 'static,
    D: DocumentRepository + 'static,
{
    pub fn new(
        applications: Arc<A>,
        opportunities: Arc<O>,
        verifications: Arc<V>,
        users: Arc<U>,
        documents: Arc<D>,
    ) -> Self {
        Self {
            applications,
            opportunities,
            verifications,
            users,
            documents,
        }
    }

    /// Run the eligibility gate and store the application when it passes.
    pub fn submit(
        &self,
        submission: ApplicationSubmission,
    ) -> Result<ApplicationView, ApplicationError> {
        let opportunity = self.fetch_opportunity(&submission.opportunity_id)?;
        let youth = self
            .users
            .fetch(&submission.youth_id)?
            .ok_or(ApplicationError::YouthNotFound)?;

        let verification = self.verifications.fetch_by_user(&youth.id)?;
        let already_applied = self
            .applications
            .find_for_pair(&youth.id, &opportunity.id)?
            .is_some();
        let submitted_count = self.applications.count_for_opportunity(&opportunity.id)?;

        let snapshot = IntakeSnapshot {
            opportunity: &opportunity,
            verification: verification.as_ref(),
            already_applied,
            submitted_count,
            now: Utc::now(),
        };
        if let IntakeDecision::Refused(reason) = admit(&snapshot) {
            return Err(ApplicationError::Refused(reason));
        }

        let application = Application {
            id: next_application_id(),
            youth_id: youth.id.clone(),
            opportunity_id: opportunity.id.clone(),
            cover_letter: submission.cover_letter,
            additional_info: submission.additional_info,
            status: ApplicationStatus::Pending,
            submitted_at: Utc::now(),
        };
        let stored = self.applications.insert(application).map_err(|err| match err {
            RepositoryError::Conflict => ApplicationError::Refused(RefusalReason::AlreadyApplied),
            other => ApplicationError::Repository(other),
        })?;

        // Attached files land on the youth's document list; unlike identity
        // uploads they accumulate rather than replace.
        for attachment in submission.documents {
            let document = Document {
                id: next_document_id(),
                user_id: youth.id.clone(),
                kind: DocumentKind::Attachment,
                file_name: attachment.file_name,
                file_url: attachment.file_url,
                mime_type: attachment.mime_type,
                size_bytes: attachment.size_bytes,
                uploaded_at: Utc::now(),
            };
            self.documents.insert(document)?;
        }

        let donor = self.fetch_user(&opportunity.donor_id)?;
        Ok(ApplicationView {
            application: stored,
            donor: donor.summary(),
            opportunity,
        })
    }

    /// A youth's own applications, newest first, with each listing and its
    /// donor.
    pub fn applications_for_youth(
        &self,
        youth_id: &UserId,
    ) -> Result<Vec<ApplicationView>, ApplicationError> {
        let mut applications = self.applications.list_for_youth(youth_id)?;
        applications.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));

        let mut views = Vec::with_capacity(applications.len());
        for application in applications {
            let opportunity = self.fetch_opportunity(&application.opportunity_id)?;
            let donor = self.fetch_user(&opportunity.donor_id)?;
            views.push(ApplicationView {
                application,
                donor: donor.summary(),
                opportunity,
            });
        }
        Ok(views)
    }

    /// Applications received on a listing; only the posting donor may look.
    pub fn applications_for_opportunity(
        &self,
        opportunity_id: &OpportunityId,
        donor_id: &UserId,
    ) -> Result<Vec<DonorApplicationView>, ApplicationError> {
        let opportunity = self.fetch_opportunity(opportunity_id)?;
        if &opportunity.donor_id != donor_id {
            return Err(ApplicationError::NotOwner);
        }

        let mut applications = self.applications.list_for_opportunity(opportunity_id)?;
        applications.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));

        let mut views = Vec::with_capacity(applications.len());
        for application in applications {
            let youth = self.fetch_user(&application.youth_id)?;
            let verification = self
                .verifications
                .fetch_by_user(&youth.id)?
                .map(|verification| verification.status);
            views.push(DonorApplicationView {
                application,
                youth: youth.youth_summary(),
                verification,
            });
        }
        Ok(views)
    }

    /// Donor adjudication, ownership-guarded through the listing.
    pub fn update_status(
        &self,
        application_id: &ApplicationId,
        donor_id: &UserId,
        status: ApplicationStatus,
    ) -> Result<ApplicationDetail, ApplicationError> {
        let mut application = self.fetch_application(application_id)?;
        let opportunity = self.fetch_opportunity(&application.opportunity_id)?;
        if &opportunity.donor_id != donor_id {
            return Err(ApplicationError::NotOwner);
        }

        application.status = status;
        self.applications.update(application.clone())?;
        self.detail(application, opportunity)
    }

    /// Fetch one application; visible to the applying youth and the
    /// listing's donor only.
    pub fn get(
        &self,
        application_id: &ApplicationId,
        requester_id: &UserId,
    ) -> Result<ApplicationDetail, ApplicationError> {
        let application = self.fetch_application(application_id)?;
        let opportunity = self.fetch_opportunity(&application.opportunity_id)?;
        if &application.youth_id != requester_id && &opportunity.donor_id != requester_id {
            return Err(ApplicationError::Forbidden);
        }
        self.detail(application, opportunity)
    }

    fn detail(
        &self,
        application: Application,
        opportunity: Opportunity,
    ) -> Result<ApplicationDetail, ApplicationError> {
        let donor = self.fetch_user(&opportunity.donor_id)?;
        let youth = self.fetch_user(&application.youth_id)?;
        Ok(ApplicationDetail {
            application,
            donor: donor.summary(),
            youth: youth.youth_summary(),
            opportunity,
        })
    }

    fn fetch_opportunity(&self, id: &OpportunityId) -> Result<Opportunity, ApplicationError> {
        self.opportunities
            .fetch(id)?
            .ok_or(ApplicationError::OpportunityNotFound)
    }

    fn fetch_application(&self, id: &ApplicationId) -> Result<Application, ApplicationError> {
        self.applications
            .fetch(id)?
            .ok_or(ApplicationError::ApplicationNotFound)
    }

    fn fetch_user(&self, id: &UserId) -> Result<UserRecord, ApplicationError> {
        self.users.fetch(id)?.ok_or(ApplicationError::YouthNotFound)
    }
}

/// Error raised by the application service.
#[derive(Debug, thiserror::Error)]
pub enum ApplicationError {
    #[error("opportunity not found")]
    OpportunityNotFound,
    #[error("application not found")]
    ApplicationNotFound,
    #[error("user not found")]
    YouthNotFound,
    #[error("only the posting donor may act on these applications")]
    NotOwner,
    #[error("you may only view your own applications")]
    Forbidden,
    #[error("{}", .0.summary())]
    Refused(RefusalReason),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
