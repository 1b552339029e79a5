use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;

use super::domain::{
    DirectoryEntry, NewUser, PaginationLimits, ProfileUpdate, RegisteredUser, SortOrder, UserId,
    UserListQuery, UserPage, UserRecord, UserRole, UserSortKey,
};
use super::repository::UserRepository;
use crate::workflows::repository::RepositoryError;
use crate::workflows::verification::domain::{next_verification_id, Verification, VerificationStatus};
use crate::workflows::verification::repository::VerificationRepository;

static USER_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_user_id() -> UserId {
    let id = USER_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    UserId(format!("user-{id:06}"))
}

/// Service for registration, profiles, and the admin listing.
pub struct DirectoryService<U, V> {
    users: Arc<U>,
    verifications: Arc<V>,
    pagination: PaginationLimits,
}

impl<U, V> DirectoryService<U, V>
where
    U: UserRepository + 'static,
    V: VerificationRepository + 'static,
{
    pub fn new(users: Arc<U>, verifications: Arc<V>, pagination: PaginationLimits) -> Self {
        Self {
            users,
            verifications,
            pagination,
        }
    }

    /// Register a user. Youths get a PENDING verification case opened in the
    /// same operation.
    pub fn register(&self, new_user: NewUser) -> Result<RegisteredUser, DirectoryError> {
        let email = normalize_email(&new_user.email)?;

        if self.users.fetch_by_email(&email)?.is_some() {
            return Err(DirectoryError::EmailTaken(email));
        }

        let now = Utc::now();
        let record = UserRecord {
            id: next_user_id(),
            email: email.clone(),
            first_name: new_user.first_name.trim().to_string(),
            last_name: new_user.last_name.trim().to_string(),
            phone: new_user.phone,
            role: new_user.role,
            category: new_user.category,
            country: new_user.country,
            camp: new_user.camp,
            community: new_user.community,
            date_of_birth: new_user.date_of_birth,
            gender: new_user.gender,
            organization_name: new_user.organization_name,
            organization_type: new_user.organization_type,
            created_at: now,
            updated_at: now,
        };

        let stored = self.users.insert(record).map_err(|err| match err {
            RepositoryError::Conflict => DirectoryError::EmailTaken(email),
            other => DirectoryError::Repository(other),
        })?;

        let verification_id = if stored.role == UserRole::Youth {
            let verification = Verification {
                id: next_verification_id(),
                user_id: stored.id.clone(),
                status: VerificationStatus::Pending,
                admin_id: None,
                field_agent_id: None,
                admin_notes: None,
                field_notes: None,
                verified_at: None,
                created_at: now,
            };
            Some(self.verifications.insert(verification)?.id)
        } else {
            None
        };

        Ok(RegisteredUser {
            user: stored,
            verification_id,
        })
    }

    pub fn profile(&self, id: &UserId) -> Result<UserRecord, DirectoryError> {
        self.users.fetch(id)?.ok_or(DirectoryError::UserNotFound)
    }

    /// Apply a partial update and bump `updated_at`.
    pub fn update_profile(
        &self,
        id: &UserId,
        update: ProfileUpdate,
    ) -> Result<UserRecord, DirectoryError> {
        let mut record = self.profile(id)?;

        if let Some(first_name) = update.first_name {
            record.first_name = first_name.trim().to_string();
        }
        if let Some(last_name) = update.last_name {
            record.last_name = last_name.trim().to_string();
        }
        if let Some(phone) = update.phone {
            record.phone = Some(phone);
        }
        if let Some(category) = update.category {
            record.category = Some(category);
        }
        if let Some(country) = update.country {
            record.country = Some(country);
        }
        if let Some(camp) = update.camp {
            record.camp = Some(camp);
        }
        if let Some(community) = update.community {
            record.community = Some(community);
        }
        if let Some(date_of_birth) = update.date_of_birth {
            record.date_of_birth = Some(date_of_birth);
        }
        if let Some(gender) = update.gender {
            record.gender = Some(gender);
        }
        if let Some(organization_name) = update.organization_name {
            record.organization_name = Some(organization_name);
        }
        if let Some(organization_type) = update.organization_type {
            record.organization_type = Some(organization_type);
        }
        record.updated_at = Utc::now();

        self.users.update(record.clone())?;
        Ok(record)
    }

    /// Paginated, sortable listing with verification status per row.
    pub fn list_users(&self, query: UserListQuery) -> Result<UserPage, DirectoryError> {
        let page = query.page.filter(|value| *value > 0).unwrap_or(1);
        let limit = query
            .limit
            .filter(|value| *value > 0)
            .unwrap_or(self.pagination.default_page_size)
            .min(self.pagination.max_page_size);

        let mut records: Vec<UserRecord> = self
            .users
            .list()?
            .into_iter()
            .filter(|record| query.role.map_or(true, |role| record.role == role))
            .collect();

        sort_records(&mut records, query.sort, query.order);

        let total = records.len();
        let offset = (page as usize - 1).saturating_mul(limit as usize);
        let items = records
            .into_iter()
            .skip(offset)
            .take(limit as usize)
            .map(|record| self.entry_for(record))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(UserPage {
            total,
            page,
            limit,
            items,
        })
    }

    fn entry_for(&self, record: UserRecord) -> Result<DirectoryEntry, DirectoryError> {
        let verification = self
            .verifications
            .fetch_by_user(&record.id)?
            .map(|verification| verification.status);

        Ok(DirectoryEntry {
            id: record.id,
            email: record.email,
            first_name: record.first_name,
            last_name: record.last_name,
            role: record.role,
            category: record.category,
            country: record.country,
            camp: record.camp,
            created_at: record.created_at,
            verification,
        })
    }
}

fn sort_records(records: &mut [UserRecord], key: UserSortKey, order: SortOrder) {
    records.sort_by(|a, b| {
        let ordering = match key {
            UserSortKey::CreatedAt => a.created_at.cmp(&b.created_at),
            UserSortKey::Email => a.email.cmp(&b.email),
            UserSortKey::FirstName => a.first_name.cmp(&b.first_name),
            UserSortKey::LastName => a.last_name.cmp(&b.last_name),
            UserSortKey::Country => a.country.cmp(&b.country),
        };
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

fn normalize_email(raw: &str) -> Result<String, DirectoryError> {
    let email = raw.trim().to_ascii_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(email),
        _ => Err(DirectoryError::InvalidEmail),
    }
}

/// Error raised by the directory service.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("a user with email {0} is already registered")]
    EmailTaken(String),
    #[error("email address is not valid")]
    InvalidEmail,
    #[error("user not found")]
    UserNotFound,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
