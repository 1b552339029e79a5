use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use crate::workflows::directory::domain::{UserId, UserRecord, UserRole, YouthCategory};
use crate::workflows::directory::repository::UserRepository;
use crate::workflows::opportunities::applications::domain::{
    Application, ApplicationId, ApplicationSubmission,
};
use crate::workflows::opportunities::applications::repository::ApplicationRepository;
use crate::workflows::opportunities::applications::service::ApplicationService;
use crate::workflows::opportunities::domain::{Opportunity, OpportunityId};
use crate::workflows::opportunities::repository::OpportunityRepository;
use crate::workflows::repository::RepositoryError;
use crate::workflows::verification::domain::{
    next_verification_id, Document, DocumentId, DocumentKind, Verification, VerificationId,
    VerificationStatus,
};
use crate::workflows::verification::repository::{DocumentRepository, VerificationRepository};

#[derive(Default)]
pub(super) struct MemoryUsers {
    records: Mutex<HashMap<UserId, UserRecord>>,
}

impl MemoryUsers {
    pub(super) fn seed(&self, record: UserRecord) {
        self.records
            .lock()
            .expect("user mutex poisoned")
            .insert(record.id.clone(), record);
    }
}

impl UserRepository for MemoryUsers {
    fn insert(&self, record: UserRecord) -> Result<UserRecord, RepositoryError> {
        self.records
            .lock()
            .expect("user mutex poisoned")
            .insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: UserRecord) -> Result<(), RepositoryError> {
        self.records
            .lock()
            .expect("user mutex poisoned")
            .insert(record.id.clone(), record);
        Ok(())
    }

    fn fetch(&self, id: &UserId) -> Result<Option<UserRecord>, RepositoryError> {
        Ok(self
            .records
            .lock()
            .expect("user mutex poisoned")
            .get(id)
            .cloned())
    }

    fn fetch_by_email(&self, email: &str) -> Result<Option<UserRecord>, RepositoryError> {
        Ok(self
            .records
            .lock()
            .expect("user mutex poisoned")
            .values()
            .find(|record| record.email == email)
            .cloned())
    }

    fn list(&self) -> Result<Vec<UserRecord>, RepositoryError> {
        Ok(self
            .records
            .lock()
            .expect("user mutex poisoned")
            .values()
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub(super) struct MemoryVerifications {
    records: Mutex<HashMap<VerificationId, Verification>>,
}

impl MemoryVerifications {
    pub(super) fn seed(&self, verification: Verification) {
        self.records
            .lock()
            .expect("verification mutex poisoned")
            .insert(verification.id.clone(), verification);
    }
}

impl VerificationRepository for MemoryVerifications {
    fn insert(&self, verification: Verification) -> Result<Verification, RepositoryError> {
        self.records
            .lock()
            .expect("verification mutex poisoned")
            .insert(verification.id.clone(), verification.clone());
        Ok(verification)
    }

    fn update(&self, verification: Verification) -> Result<(), RepositoryError> {
        self.records
            .lock()
            .expect("verification mutex poisoned")
            .insert(verification.id.clone(), verification);
        Ok(())
    }

    fn fetch(&self, id: &VerificationId) -> Result<Option<Verification>, RepositoryError> {
        Ok(self
            .records
            .lock()
            .expect("verification mutex poisoned")
            .get(id)
            .cloned())
    }

    fn fetch_by_user(&self, user: &UserId) -> Result<Option<Verification>, RepositoryError> {
        Ok(self
            .records
            .lock()
            .expect("verification mutex poisoned")
            .values()
            .find(|verification| &verification.user_id == user)
            .cloned())
    }

    fn list(&self) -> Result<Vec<Verification>, RepositoryError> {
        Ok(self
            .records
            .lock()
            .expect("verification mutex poisoned")
            .values()
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub(super) struct MemoryDocuments {
    records: Mutex<HashMap<DocumentId, Document>>,
}

impl DocumentRepository for MemoryDocuments {
    fn insert(&self, document: Document) -> Result<Document, RepositoryError> {
        self.records
            .lock()
            .expect("document mutex poisoned")
            .insert(document.id.clone(), document.clone());
        Ok(document)
    }

    fn update(&self, document: Document) -> Result<(), RepositoryError> {
        self.records
            .lock()
            .expect("document mutex poisoned")
            .insert(document.id.clone(), document);
        Ok(())
    }

    fn find_by_kind(
        &self,
        user: &UserId,
        kind: DocumentKind,
    ) -> Result<Option<Document>, RepositoryError> {
        Ok(self
            .records
            .lock()
            .expect("document mutex poisoned")
            .values()
            .find(|document| &document.user_id == user && document.kind == kind)
            .cloned())
    }

    fn list_for_user(&self, user: &UserId) -> Result<Vec<Document>, RepositoryError> {
        Ok(self
            .records
            .lock()
            .expect("document mutex poisoned")
            .values()
            .filter(|document| &document.user_id == user)
            .cloned()
            .collect())
    }

    fn fetch(&self, id: &DocumentId) -> Result<Option<Document>, RepositoryError> {
        Ok(self
            .records
            .lock()
            .expect("document mutex poisoned")
            .get(id)
            .cloned())
    }
}

#[derive(Default)]
pub(super) struct MemoryOpportunities {
    records: Mutex<HashMap<OpportunityId, Opportunity>>,
}

impl MemoryOpportunities {
    pub(super) fn seed(&self, opportunity: Opportunity) {
        self.records
            .lock()
            .expect("opportunity mutex poisoned")
            .insert(opportunity.id.clone(), opportunity);
    }
}

impl OpportunityRepository for MemoryOpportunities {
    fn insert(&self, opportunity: Opportunity) -> Result<Opportunity, RepositoryError> {
        self.records
            .lock()
            .expect("opportunity mutex poisoned")
            .insert(opportunity.id.clone(), opportunity.clone());
        Ok(opportunity)
    }

    fn update(&self, opportunity: Opportunity) -> Result<(), RepositoryError> {
        self.records
            .lock()
            .expect("opportunity mutex poisoned")
            .insert(opportunity.id.clone(), opportunity);
        Ok(())
    }

    fn fetch(&self, id: &OpportunityId) -> Result<Option<Opportunity>, RepositoryError> {
        Ok(self
            .records
            .lock()
            .expect("opportunity mutex poisoned")
            .get(id)
            .cloned())
    }

    fn remove(&self, id: &OpportunityId) -> Result<(), RepositoryError> {
        self.records
            .lock()
            .expect("opportunity mutex poisoned")
            .remove(id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    fn list(&self) -> Result<Vec<Opportunity>, RepositoryError> {
        Ok(self
            .records
            .lock()
            .expect("opportunity mutex poisoned")
            .values()
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub(super) struct MemoryApplications {
    records: Mutex<HashMap<ApplicationId, Application>>,
}

impl ApplicationRepository for MemoryApplications {
    fn insert(&self, application: Application) -> Result<Application, RepositoryError> {
        let mut guard = self.records.lock().expect("application mutex poisoned");
        let duplicate = guard.values().any(|existing| {
            existing.youth_id == application.youth_id
                && existing.opportunity_id == application.opportunity_id
        });
        if duplicate || guard.contains_key(&application.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(application.id.clone(), application.clone());
        Ok(application)
    }

    fn update(&self, application: Application) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("application mutex poisoned");
        if guard.contains_key(&application.id) {
            guard.insert(application.id.clone(), application);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        Ok(self
            .records
            .lock()
            .expect("application mutex poisoned")
            .get(id)
            .cloned())
    }

    fn find_for_pair(
        &self,
        youth: &UserId,
        opportunity: &OpportunityId,
    ) -> Result<Option<Application>, RepositoryError> {
        Ok(self
            .records
            .lock()
            .expect("application mutex poisoned")
            .values()
            .find(|application| {
                &application.youth_id == youth && &application.opportunity_id == opportunity
            })
            .cloned())
    }

    fn list_for_youth(&self, youth: &UserId) -> Result<Vec<Application>, RepositoryError> {
        Ok(self
            .records
            .lock()
            .expect("application mutex poisoned")
            .values()
            .filter(|application| &application.youth_id == youth)
            .cloned()
            .collect())
    }

    fn list_for_opportunity(
        &self,
        opportunity: &OpportunityId,
    ) -> Result<Vec<Application>, RepositoryError> {
        Ok(self
            .records
            .lock()
            .expect("application mutex poisoned")
            .values()
            .filter(|application| &application.opportunity_id == opportunity)
            .cloned()
            .collect())
    }

    fn count_for_opportunity(
        &self,
        opportunity: &OpportunityId,
    ) -> Result<usize, RepositoryError> {
        Ok(self.list_for_opportunity(opportunity)?.len())
    }
}

pub(super) type TestService = ApplicationService<
    MemoryApplications,
    MemoryOpportunities,
    MemoryVerifications,
    MemoryUsers,
    MemoryDocuments,
>;

pub(super) struct Fixture {
    pub(super) service: Arc<TestService>,
    pub(super) users: Arc<MemoryUsers>,
    pub(super) verifications: Arc<MemoryVerifications>,
    pub(super) documents: Arc<MemoryDocuments>,
    pub(super) opportunities: Arc<MemoryOpportunities>,
    pub(super) applications: Arc<MemoryApplications>,
}

pub(super) fn fixture() -> Fixture {
    let users = Arc::new(MemoryUsers::default());
    let verifications = Arc::new(MemoryVerifications::default());
    let documents = Arc::new(MemoryDocuments::default());
    let opportunities = Arc::new(MemoryOpportunities::default());
    let applications = Arc::new(MemoryApplications::default());
    let service = Arc::new(ApplicationService::new(
        applications.clone(),
        opportunities.clone(),
        verifications.clone(),
        users.clone(),
        documents.clone(),
    ));
    Fixture {
        service,
        users,
        verifications,
        documents,
        opportunities,
        applications,
    }
}

pub(super) fn moment(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 4, day, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn user(id: &str, role: UserRole) -> UserRecord {
    UserRecord {
        id: UserId(id.to_string()),
        email: format!("{id}@example.org"),
        first_name: "Test".to_string(),
        last_name: "User".to_string(),
        phone: None,
        role,
        category: Some(YouthCategory::Refugee),
        country: Some("Kenya".to_string()),
        camp: Some("Kakuma".to_string()),
        community: None,
        date_of_birth: None,
        gender: None,
        organization_name: None,
        organization_type: None,
        created_at: moment(1),
        updated_at: moment(1),
    }
}

pub(super) fn verification_with_status(youth_id: &str, status: VerificationStatus) -> Verification {
    Verification {
        id: next_verification_id(),
        user_id: UserId(youth_id.to_string()),
        status,
        admin_id: None,
        field_agent_id: None,
        admin_notes: None,
        field_notes: None,
        verified_at: match status {
            VerificationStatus::Verified => Some(moment(2)),
            _ => None,
        },
        created_at: moment(1),
    }
}

pub(super) fn listing(id: &str, donor: &str) -> Opportunity {
    Opportunity {
        id: OpportunityId(id.to_string()),
        donor_id: UserId(donor.to_string()),
        title: "Vocational training cohort".to_string(),
        description: "Six-month vocational program with stipend".to_string(),
        requirements: None,
        application_link: None,
        categories: Vec::new(),
        countries: Vec::new(),
        deadline: Some(Utc::now() + Duration::days(30)),
        max_applicants: Some(2),
        is_active: true,
        created_at: moment(1),
    }
}

/// Seed a donor, a verified youth, and an open listing.
pub(super) fn seeded(fixture: &Fixture) {
    fixture.users.seed(user("donor-1", UserRole::Donor));
    fixture.users.seed(user("youth-1", UserRole::Youth));
    fixture
        .verifications
        .seed(verification_with_status("youth-1", VerificationStatus::Verified));
    fixture.opportunities.seed(listing("opp-1", "donor-1"));
}

pub(super) fn submission(youth: &str, opportunity: &str) -> ApplicationSubmission {
    ApplicationSubmission {
        youth_id: UserId(youth.to_string()),
        opportunity_id: OpportunityId(opportunity.to_string()),
        cover_letter: Some("I would like to join the program.".to_string()),
        additional_info: None,
        documents: Vec::new(),
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
