use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::verification::domain::VerificationStatus;

/// Identifier wrapper for directory users.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

/// Platform roles. Youths are the verified beneficiaries; field agents and
/// admins drive verification; donors post opportunities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Youth,
    Donor,
    Admin,
    FieldAgent,
}

impl UserRole {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Youth => "YOUTH",
            Self::Donor => "DONOR",
            Self::Admin => "ADMIN",
            Self::FieldAgent => "FIELD_AGENT",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "YOUTH" => Some(Self::Youth),
            "DONOR" => Some(Self::Donor),
            "ADMIN" => Some(Self::Admin),
            "FIELD_AGENT" => Some(Self::FieldAgent),
            _ => None,
        }
    }
}

/// Beneficiary categories recognized across verification and targeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum YouthCategory {
    Refugee,
    Idp,
    Vulnerable,
    Pwd,
}

impl YouthCategory {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Refugee => "REFUGEE",
            Self::Idp => "IDP",
            Self::Vulnerable => "VULNERABLE",
            Self::Pwd => "PWD",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "REFUGEE" => Some(Self::Refugee),
            "IDP" => Some(Self::Idp),
            "VULNERABLE" => Some(Self::Vulnerable),
            "PWD" => Some(Self::Pwd),
            _ => None,
        }
    }
}

/// Full directory record for a registered user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub role: UserRole,
    pub category: Option<YouthCategory>,
    pub country: Option<String>,
    pub camp: Option<String>,
    pub community: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub organization_name: Option<String>,
    pub organization_type: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRecord {
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id.clone(),
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            organization_name: self.organization_name.clone(),
        }
    }

    pub fn youth_summary(&self) -> YouthSummary {
        YouthSummary {
            id: self.id.clone(),
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            category: self.category,
            country: self.country.clone(),
            camp: self.camp.clone(),
            community: self.community.clone(),
        }
    }
}

/// Compact identity view used wherever a counterparty is echoed back.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserSummary {
    pub id: UserId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_name: Option<String>,
}

/// Youth-facing view carrying category and location data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YouthSummary {
    pub id: UserId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub category: Option<YouthCategory>,
    pub country: Option<String>,
    pub camp: Option<String>,
    pub community: Option<String>,
}

/// Registration payload.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub role: UserRole,
    #[serde(default)]
    pub category: Option<YouthCategory>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub camp: Option<String>,
    #[serde(default)]
    pub community: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub organization_name: Option<String>,
    #[serde(default)]
    pub organization_type: Option<String>,
}

/// Partial profile update; absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub category: Option<YouthCategory>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub camp: Option<String>,
    #[serde(default)]
    pub community: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub organization_name: Option<String>,
    #[serde(default)]
    pub organization_type: Option<String>,
}

/// Registration result; youths come back with their opened verification case.
#[derive(Debug, Clone, Serialize)]
pub struct RegisteredUser {
    pub user: UserRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_id: Option<crate::workflows::verification::domain::VerificationId>,
}

/// Sort keys accepted by the directory listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UserSortKey {
    #[default]
    CreatedAt,
    Email,
    FirstName,
    LastName,
    Country,
}

impl UserSortKey {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "created_at" | "createdat" => Some(Self::CreatedAt),
            "email" => Some(Self::Email),
            "first_name" | "firstname" => Some(Self::FirstName),
            "last_name" | "lastname" => Some(Self::LastName),
            "country" => Some(Self::Country),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }
}

/// Normalized listing query. Page numbers are one-based.
#[derive(Debug, Clone, Default)]
pub struct UserListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub sort: UserSortKey,
    pub order: SortOrder,
    pub role: Option<UserRole>,
}

/// Paging dials handed to the directory service by configuration.
#[derive(Debug, Clone, Copy)]
pub struct PaginationLimits {
    pub default_page_size: u32,
    pub max_page_size: u32,
}

impl Default for PaginationLimits {
    fn default() -> Self {
        Self {
            default_page_size: 20,
            max_page_size: 100,
        }
    }
}

/// One row of the admin listing: profile basics plus verification status.
#[derive(Debug, Clone, Serialize)]
pub struct DirectoryEntry {
    pub id: UserId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub category: Option<YouthCategory>,
    pub country: Option<String>,
    pub camp: Option<String>,
    pub created_at: DateTime<Utc>,
    pub verification: Option<VerificationStatus>,
}

/// Paginated listing response.
#[derive(Debug, Clone, Serialize)]
pub struct UserPage {
    pub total: usize,
    pub page: u32,
    pub limit: u32,
    pub items: Vec<DirectoryEntry>,
}
