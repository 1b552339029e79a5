//! The application-eligibility gate.
//!
//! The checks run in a fixed order and the first failure wins: listing
//! active, deadline open, youth verified, no duplicate, capacity free. The
//! gate is pure over a snapshot so the rules can be exercised without any
//! storage behind them.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::workflows::opportunities::domain::Opportunity;
use crate::workflows::verification::domain::{Verification, VerificationStatus};

/// Everything the gate needs to know, gathered by the service.
#[derive(Debug)]
pub struct IntakeSnapshot<'a> {
    pub opportunity: &'a Opportunity,
    pub verification: Option<&'a Verification>,
    pub already_applied: bool,
    pub submitted_count: usize,
    pub now: DateTime<Utc>,
}

/// Gate outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum IntakeDecision {
    Admitted,
    Refused(RefusalReason),
}

/// Enumerates the reasons a submission is turned away, in the order the
/// gate checks them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "reason")]
pub enum RefusalReason {
    ListingInactive,
    DeadlinePassed { deadline: DateTime<Utc> },
    YouthNotVerified { status: Option<VerificationStatus> },
    AlreadyApplied,
    CapacityReached { max_applicants: u32 },
}

impl RefusalReason {
    pub fn summary(&self) -> String {
        match self {
            RefusalReason::ListingInactive => "this opportunity is no longer active".to_string(),
            RefusalReason::DeadlinePassed { deadline } => {
                format!(
                    "the deadline for this opportunity passed on {}",
                    deadline.format("%Y-%m-%d")
                )
            }
            RefusalReason::YouthNotVerified { status } => match status {
                Some(status) => format!(
                    "you must be verified before applying (current status: {})",
                    status.label()
                ),
                None => "you must be verified before applying".to_string(),
            },
            RefusalReason::AlreadyApplied => {
                "you have already applied to this opportunity".to_string()
            }
            RefusalReason::CapacityReached { max_applicants } => format!(
                "this opportunity has reached its maximum of {max_applicants} applicants"
            ),
        }
    }
}

/// Run the gate over a snapshot.
pub fn admit(snapshot: &IntakeSnapshot<'_>) -> IntakeDecision {
    let opportunity = snapshot.opportunity;

    if !opportunity.is_active {
        return IntakeDecision::Refused(RefusalReason::ListingInactive);
    }

    if let Some(deadline) = opportunity.deadline {
        if snapshot.now >= deadline {
            return IntakeDecision::Refused(RefusalReason::DeadlinePassed { deadline });
        }
    }

    let verified = snapshot
        .verification
        .map(|verification| verification.status == VerificationStatus::Verified)
        .unwrap_or(false);
    if !verified {
        return IntakeDecision::Refused(RefusalReason::YouthNotVerified {
            status: snapshot.verification.map(|verification| verification.status),
        });
    }

    if snapshot.already_applied {
        return IntakeDecision::Refused(RefusalReason::AlreadyApplied);
    }

    if let Some(max_applicants) = opportunity.max_applicants {
        if snapshot.submitted_count >= max_applicants as usize {
            return IntakeDecision::Refused(RefusalReason::CapacityReached { max_applicants });
        }
    }

    IntakeDecision::Admitted
}
