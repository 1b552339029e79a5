use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::directory::domain::{UserId, UserSummary, YouthCategory};

/// Identifier wrapper for donor listings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OpportunityId(pub String);

/// A donor-posted listing youths can apply to.
///
/// Empty `categories`/`countries` lists mean the listing is open to every
/// category or country.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opportunity {
    pub id: OpportunityId,
    pub donor_id: UserId,
    pub title: String,
    pub description: String,
    pub requirements: Option<String>,
    pub application_link: Option<String>,
    pub categories: Vec<YouthCategory>,
    pub countries: Vec<String>,
    pub deadline: Option<DateTime<Utc>>,
    pub max_applicants: Option<u32>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Opportunity {
    pub fn accepts_category(&self, category: YouthCategory) -> bool {
        self.categories.is_empty() || self.categories.contains(&category)
    }

    pub fn accepts_country(&self, country: &str) -> bool {
        self.countries.is_empty()
            || self
                .countries
                .iter()
                .any(|listed| listed.eq_ignore_ascii_case(country))
    }
}

/// Creation payload.
#[derive(Debug, Clone, Deserialize)]
pub struct NewOpportunity {
    pub donor_id: UserId,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub requirements: Option<String>,
    #[serde(default)]
    pub application_link: Option<String>,
    #[serde(default)]
    pub categories: Vec<YouthCategory>,
    #[serde(default)]
    pub countries: Vec<String>,
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    pub max_applicants: Option<u32>,
}

/// Partial update; absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OpportunityUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub requirements: Option<String>,
    #[serde(default)]
    pub application_link: Option<String>,
    #[serde(default)]
    pub categories: Option<Vec<YouthCategory>>,
    #[serde(default)]
    pub countries: Option<Vec<String>>,
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    pub max_applicants: Option<u32>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// Browse filters. All are optional and combined conjunctively.
#[derive(Debug, Clone, Default)]
pub struct OpportunityFilters {
    pub category: Option<YouthCategory>,
    pub country: Option<String>,
    pub active: Option<bool>,
    pub donor_id: Option<UserId>,
}

/// A listing joined with its donor's summary.
#[derive(Debug, Clone, Serialize)]
pub struct OpportunityView {
    pub opportunity: Opportunity,
    pub donor: UserSummary,
}
