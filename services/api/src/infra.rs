use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use youthbridge::config::LimitsConfig;
use youthbridge::workflows::directory::domain::{PaginationLimits, UserId, UserRecord};
use youthbridge::workflows::directory::repository::UserRepository;
use youthbridge::workflows::directory::service::DirectoryService;
use youthbridge::workflows::opportunities::applications::domain::{Application, ApplicationId};
use youthbridge::workflows::opportunities::applications::repository::ApplicationRepository;
use youthbridge::workflows::opportunities::applications::service::ApplicationService;
use youthbridge::workflows::opportunities::domain::{Opportunity, OpportunityId};
use youthbridge::workflows::opportunities::repository::OpportunityRepository;
use youthbridge::workflows::opportunities::service::OpportunityService;
use youthbridge::workflows::repository::RepositoryError;
use youthbridge::workflows::verification::domain::{
    Document, DocumentId, DocumentKind, FieldVisit, Verification, VerificationId,
};
use youthbridge::workflows::verification::repository::{
    DocumentRepository, VerificationRepository, VisitRepository,
};
use youthbridge::workflows::verification::service::{DocumentPolicy, VerificationService};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default)]
pub(crate) struct InMemoryUsers {
    records: Mutex<Vec<UserRecord>>,
}

impl UserRepository for InMemoryUsers {
    fn insert(&self, record: UserRecord) -> Result<UserRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("user mutex poisoned");
        if guard.iter().any(|existing| existing.email == record.email) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(record.clone());
        Ok(record)
    }

    fn update(&self, record: UserRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("user mutex poisoned");
        match guard.iter_mut().find(|existing| existing.id == record.id) {
            Some(existing) => {
                *existing = record;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, id: &UserId) -> Result<Option<UserRecord>, RepositoryError> {
        Ok(self
            .records
            .lock()
            .expect("user mutex poisoned")
            .iter()
            .find(|record| &record.id == id)
            .cloned())
    }

    fn fetch_by_email(&self, email: &str) -> Result<Option<UserRecord>, RepositoryError> {
        Ok(self
            .records
            .lock()
            .expect("user mutex poisoned")
            .iter()
            .find(|record| record.email == email)
            .cloned())
    }

    fn list(&self) -> Result<Vec<UserRecord>, RepositoryError> {
        Ok(self.records.lock().expect("user mutex poisoned").clone())
    }
}

#[derive(Default)]
pub(crate) struct InMemoryVerifications {
    records: Mutex<HashMap<VerificationId, Verification>>,
}

impl VerificationRepository for InMemoryVerifications {
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
pub(crate) struct InMemoryDocuments {
    records: Mutex<HashMap<DocumentId, Document>>,
}

impl DocumentRepository for InMemoryDocuments {
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
pub(crate) struct InMemoryVisits {
    records: Mutex<Vec<FieldVisit>>,
}

impl VisitRepository for InMemoryVisits {
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

#[derive(Default)]
pub(crate) struct InMemoryOpportunities {
    records: Mutex<HashMap<OpportunityId, Opportunity>>,
}

impl OpportunityRepository for InMemoryOpportunities {
    fn insert(&self, opportunity: Opportunity) -> Result<Opportunity, RepositoryError> {
        self.records
            .lock()
            .expect("opportunity mutex poisoned")
            .insert(opportunity.id.clone(), opportunity.clone());
        Ok(opportunity)
    }

    fn update(&self, opportunity: Opportunity) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("opportunity mutex poisoned");
        if guard.contains_key(&opportunity.id) {
            guard.insert(opportunity.id.clone(), opportunity);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
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
pub(crate) struct InMemoryApplications {
    records: Mutex<HashMap<ApplicationId, Application>>,
}

impl ApplicationRepository for InMemoryApplications {
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

pub(crate) type Directory = DirectoryService<InMemoryUsers, InMemoryVerifications>;
pub(crate) type Verifications =
    VerificationService<InMemoryUsers, InMemoryVerifications, InMemoryDocuments, InMemoryVisits>;
pub(crate) type Opportunities = OpportunityService<InMemoryOpportunities, InMemoryUsers>;
pub(crate) type Applications = ApplicationService<
    InMemoryApplications,
    InMemoryOpportunities,
    InMemoryVerifications,
    InMemoryUsers,
    InMemoryDocuments,
>;

/// Every workflow service wired over one shared set of in-memory stores.
pub(crate) struct PlatformServices {
    pub(crate) directory: Arc<Directory>,
    pub(crate) verification: Arc<Verifications>,
    pub(crate) opportunities: Arc<Opportunities>,
    pub(crate) applications: Arc<Applications>,
}

pub(crate) fn build_services(limits: &LimitsConfig) -> PlatformServices {
    let users = Arc::new(InMemoryUsers::default());
    let verifications = Arc::new(InMemoryVerifications::default());
    let documents = Arc::new(InMemoryDocuments::default());
    let visits = Arc::new(InMemoryVisits::default());
    let opportunities = Arc::new(InMemoryOpportunities::default());
    let applications = Arc::new(InMemoryApplications::default());

    let pagination = PaginationLimits {
        default_page_size: limits.default_page_size,
        max_page_size: limits.max_page_size,
    };
    let policy = DocumentPolicy {
        max_document_bytes: limits.max_document_bytes,
    };

    PlatformServices {
        directory: Arc::new(DirectoryService::new(
            users.clone(),
            verifications.clone(),
            pagination,
        )),
        verification: Arc::new(VerificationService::new(
            users.clone(),
            verifications.clone(),
            documents.clone(),
            visits.clone(),
            policy,
        )),
        opportunities: Arc::new(OpportunityService::new(opportunities.clone(), users.clone())),
        applications: Arc::new(ApplicationService::new(
            applications,
            opportunities,
            verifications,
            users,
            documents,
        )),
    }
}
