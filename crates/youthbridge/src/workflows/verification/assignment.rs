//! Field-agent selection for verification visits.
//!
//! Agents are matched to a youth by location: an agent stationed in the
//! youth's camp (or in the youth's community, treated as an alternate camp
//! name) is preferred; otherwise the first agent covering the youth's
//! country is taken. Roster order breaks ties.

use serde::Serialize;

use crate::workflows::directory::domain::{UserRecord, UserRole};

/// Which location field produced the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchBasis {
    Camp,
    Community,
    Country,
}

impl MatchBasis {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Camp => "camp",
            Self::Community => "community",
            Self::Country => "country",
        }
    }
}

/// A selected agent together with the basis of the match.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentMatch {
    pub agent: UserRecord,
    pub basis: MatchBasis,
}

/// Pick a field agent for the youth, or `None` when nobody covers their
/// camp, community, or country.
pub fn select_field_agent(youth: &UserRecord, roster: &[UserRecord]) -> Option<AgentMatch> {
    let agents = || {
        roster
            .iter()
            .filter(|candidate| candidate.role == UserRole::FieldAgent)
    };

    if youth.camp.is_some() || youth.community.is_some() {
        for agent in agents() {
            if let Some(basis) = camp_match(youth, agent) {
                return Some(AgentMatch {
                    agent: agent.clone(),
                    basis,
                });
            }
        }
    }

    if let Some(country) = youth.country.as_deref() {
        for agent in agents() {
            if agent.country.as_deref() == Some(country) {
                return Some(AgentMatch {
                    agent: agent.clone(),
                    basis: MatchBasis::Country,
                });
            }
        }
    }

    None
}

fn camp_match(youth: &UserRecord, agent: &UserRecord) -> Option<MatchBasis> {
    let station = agent.camp.as_deref()?;
    if youth.camp.as_deref() == Some(station) {
        return Some(MatchBasis::Camp);
    }
    if youth.community.as_deref() == Some(station) {
        return Some(MatchBasis::Community);
    }
    None
}
