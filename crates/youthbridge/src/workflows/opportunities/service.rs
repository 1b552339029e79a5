use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;

use super::domain::{
    NewOpportunity, Opportunity, OpportunityFilters, OpportunityId, OpportunityUpdate,
    OpportunityView,
};
use super::repository::OpportunityRepository;
use crate::workflows::directory::domain::{UserId, UserRole};
use crate::workflows::directory::repository::UserRepository;
use crate::workflows::repository::RepositoryError;

static OPPORTUNITY_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_opportunity_id() -> OpportunityId {
    let id = OPPORTUNITY_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    OpportunityId(format!("opp-{id:06}"))
}

/// Service for donor listings: creation, browsing, and ownership-guarded
/// updates.
pub struct OpportunityService<O, U> {
    opportunities: Arc<O>,
    users: Arc<U>,
}

impl<O, U> OpportunityService<O, U>
where
    O: OpportunityRepository + 'static,
    U: UserRepository + 'static,
{
    pub fn new(opportunities: Arc<O>, users: Arc<U>) -> Self {
        Self {
            opportunities,
            users,
        }
    }

    pub fn create(&self, new: NewOpportunity) -> Result<Opportunity, OpportunityError> {
        let donor = self
            .users
            .fetch(&new.donor_id)?
            .ok_or(OpportunityError::DonorNotFound)?;
        if donor.role != UserRole::Donor {
            return Err(OpportunityError::NotADonor(donor.id.0));
        }
        if new.title.trim().is_empty() {
            return Err(OpportunityError::EmptyTitle);
        }
        if new.description.trim().is_empty() {
            return Err(OpportunityError::EmptyDescription);
        }

        let opportunity = Opportunity {
            id: next_opportunity_id(),
            donor_id: new.donor_id,
            title: new.title.trim().to_string(),
            description: new.description,
            requirements: new.requirements,
            application_link: new.application_link,
            categories: new.categories,
            countries: new.countries,
            deadline: new.deadline,
            max_applicants: new.max_applicants,
            is_active: true,
            created_at: Utc::now(),
        };

        Ok(self.opportunities.insert(opportunity)?)
    }

    /// Browse listings, newest first.
    pub fn list(&self, filters: OpportunityFilters) -> Result<Vec<Opportunity>, OpportunityError> {
        let mut listings: Vec<Opportunity> = self
            .opportunities
            .list()?
            .into_iter()
            .filter(|listing| {
                filters
                    .category
                    .map_or(true, |category| listing.accepts_category(category))
            })
            .filter(|listing| {
                filters
                    .country
                    .as_deref()
                    .map_or(true, |country| listing.accepts_country(country))
            })
            .filter(|listing| filters.active.map_or(true, |flag| listing.is_active == flag))
            .filter(|listing| {
                filters
                    .donor_id
                    .as_ref()
                    .map_or(true, |donor| &listing.donor_id == donor)
            })
            .collect();
        listings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(listings)
    }

    pub fn get(&self, id: &OpportunityId) -> Result<OpportunityView, OpportunityError> {
        let opportunity = self.fetch(id)?;
        let donor = self
            .users
            .fetch(&opportunity.donor_id)?
            .ok_or(OpportunityError::DonorNotFound)?;
        Ok(OpportunityView {
            opportunity,
            donor: donor.summary(),
        })
    }

    pub fn update(
        &self,
        id: &OpportunityId,
        donor_id: &UserId,
        update: OpportunityUpdate,
    ) -> Result<Opportunity, OpportunityError> {
        let mut opportunity = self.owned_by(id, donor_id)?;

        if let Some(title) = update.title {
            if title.trim().is_empty() {
                return Err(OpportunityError::EmptyTitle);
            }
            opportunity.title = title.trim().to_string();
        }
        if let Some(description) = update.description {
            if description.trim().is_empty() {
                return Err(OpportunityError::EmptyDescription);
            }
            opportunity.description = description;
        }
        if let Some(requirements) = update.requirements {
            opportunity.requirements = Some(requirements);
        }
        if let Some(application_link) = update.application_link {
            opportunity.application_link = Some(application_link);
        }
        if let Some(categories) = update.categories {
            opportunity.categories = categories;
        }
        if let Some(countries) = update.countries {
            opportunity.countries = countries;
        }
        if let Some(deadline) = update.deadline {
            opportunity.deadline = Some(deadline);
        }
        if let Some(max_applicants) = update.max_applicants {
            opportunity.max_applicants = Some(max_applicants);
        }
        if let Some(is_active) = update.is_active {
            opportunity.is_active = is_active;
        }

        self.opportunities.update(opportunity.clone())?;
        Ok(opportunity)
    }

    pub fn delete(&self, id: &OpportunityId, donor_id: &UserId) -> Result<(), OpportunityError> {
        self.owned_by(id, donor_id)?;
        self.opportunities.remove(id)?;
        Ok(())
    }

    fn fetch(&self, id: &OpportunityId) -> Result<Opportunity, OpportunityError> {
        self.opportunities
            .fetch(id)?
            .ok_or(OpportunityError::NotFound)
    }

    fn owned_by(
        &self,
        id: &OpportunityId,
        donor_id: &UserId,
    ) -> Result<Opportunity, OpportunityError> {
        let opportunity = self.fetch(id)?;
        if &opportunity.donor_id != donor_id {
            return Err(OpportunityError::NotOwner);
        }
        Ok(opportunity)
    }
}

/// Error raised by the opportunity service.
#[derive(Debug, thiserror::Error)]
pub enum OpportunityError {
    #[error("opportunity not found")]
    NotFound,
    #[error("donor not found")]
    DonorNotFound,
    #[error("user {0} does not hold the DONOR role")]
    NotADonor(String),
    #[error("only the posting donor may modify this opportunity")]
    NotOwner,
    #[error("title is required")]
    EmptyTitle,
    #[error("description is required")]
    EmptyDescription,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
