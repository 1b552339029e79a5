use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::workflows::directory::domain::{UserId, UserRecord, UserRole, YouthCategory};
use crate::workflows::directory::repository::UserRepository;
use crate::workflows::repository::RepositoryError;
use crate::workflows::verification::domain::{
    next_verification_id, Document, DocumentId, DocumentKind, DocumentUpload, FieldVisit,
    Verification, VerificationId, VerificationStatus, VisitId,
};
use crate::workflows::verification::repository::{
    DocumentRepository, VerificationRepository, VisitRepository,
};
use crate::workflows::verification::service::{DocumentPolicy, VerificationService};

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
        let mut guard = self.records.lock().expect("user mutex poisoned");
        if guard.values().any(|existing| existing.email == record.email) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
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
        let guard = self.records.lock().expect("user mutex poisoned");
        let mut records: Vec<UserRecord> = guard.values().cloned().collect();
        // Roster order matters for assignment; key order stands in for it.
        records.sort_by(|a, b| a.id.0.cmp(&b.id.0));
        Ok(records)
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
        let mut guard = self.records.lock().expect("verification mutex poisoned");
        if guard
            .values()
            .any(|existing| existing.user_id == verification.user_id)
        {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(verification.id.clone(), verification.clone());
        Ok(verification)
    }

    fn update(&self, verification: Verification) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("verification mutex poisoned");
        if guard.contains_key(&verification.id) {
            guard.insert(verification.id.clone(), verification);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
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
        let mut guard = self.records.lock().expect("document mutex poisoned");
        if guard.contains_key(&document.id) {
            guard.insert(document.id.clone(), document);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
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
pub(super) struct MemoryVisits {
    records: Mutex<Vec<FieldVisit>>,
}

impl VisitRepository for MemoryVisits {
    fn insert(&self, visit: FieldVisit) -> Result<FieldVisit, RepositoryError> {
        self.records
            .lock()
            .expect("visit mutex poisoned")
            .push(visit.clone());
        Ok(visit)
    }

    fn list_for_verification(
        &self,
        id: &VerificationId,
    ) -> Result<Vec<FieldVisit>, RepositoryError> {
        Ok(self
            .records
            .lock()
            .expect("visit mutex poisoned")
            .iter()
            .filter(|visit| &visit.verification_id == id)
            .cloned()
            .collect())
    }
}

pub(super) type TestService =
    VerificationService<MemoryUsers, MemoryVerifications, MemoryDocuments, MemoryVisits>;

pub(super) struct Fixture {
    pub(super) service: Arc<TestService>,
    pub(super) users: Arc<MemoryUsers>,
    pub(super) verifications: Arc<MemoryVerifications>,
    pub(super) documents: Arc<MemoryDocuments>,
    pub(super) visits: Arc<MemoryVisits>,
}

pub(super) fn fixture() -> Fixture {
    let users = Arc::new(MemoryUsers::default());
    let verifications = Arc::new(MemoryVerifications::default());
    let documents = Arc::new(MemoryDocuments::default());
    let visits = Arc::new(MemoryVisits::default());
    let service = Arc::new(VerificationService::new(
        users.clone(),
        verifications.clone(),
        documents.clone(),
        visits.clone(),
        DocumentPolicy::default(),
    ));
    Fixture {
        service,
        users,
        verifications,
        documents,
        visits,
    }
}

pub(super) fn created_at(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, day, 9, 0, 0)
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
        category: None,
        country: None,
        camp: None,
        community: None,
        date_of_birth: None,
        gender: None,
        organization_name: None,
        organization_type: None,
        created_at: created_at(1),
        updated_at: created_at(1),
    }
}

pub(super) fn youth(id: &str) -> UserRecord {
    let mut record = user(id, UserRole::Youth);
    record.category = Some(YouthCategory::Refugee);
    record.country = Some("Kenya".to_string());
    record.camp = Some("Kakuma".to_string());
    record
}

pub(super) fn agent(id: &str, camp: Option<&str>, country: Option<&str>) -> UserRecord {
    let mut record = user(id, UserRole::FieldAgent);
    record.camp = camp.map(str::to_string);
    record.country = country.map(str::to_string);
    record
}

pub(super) fn admin(id: &str) -> UserRecord {
    user(id, UserRole::Admin)
}

pub(super) fn case_for(youth_id: &str) -> Verification {
    Verification {
        id: next_verification_id(),
        user_id: UserId(youth_id.to_string()),
        status: VerificationStatus::Pending,
        admin_id: None,
        field_agent_id: None,
        admin_notes: None,
        field_notes: None,
        verified_at: None,
        created_at: created_at(2),
    }
}

pub(super) fn upload(kind: DocumentKind) -> DocumentUpload {
    DocumentUpload {
        kind,
        file_name: "national-id.pdf".to_string(),
        file_url: "https://files.example.org/docs/national-id.pdf".to_string(),
        mime_type: Some("application/pdf".to_string()),
        size_bytes: Some(128 * 1024),
    }
}

pub(super) fn seeded_case(fixture: &Fixture, youth_id: &str) -> Verification {
    fixture.users.seed(youth(youth_id));
    let case = case_for(youth_id);
    fixture.verifications.seed(case.clone());
    case
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn visit_id_set(visits: &[FieldVisit]) -> Vec<VisitId> {
    visits.iter().map(|visit| visit.id.clone()).collect()
}
