//! Bulk youth onboarding from CSV roster exports.
//!
//! Camp management systems hand over rosters as CSV; each usable row is
//! registered as a YOUTH through the directory service, which also opens the
//! PENDING verification case. Rows with unusable emails and rows already
//! present in the directory are skipped and counted, never fatal.

mod parser;

use std::io::Read;
use std::path::Path;

use serde::Serialize;

use crate::workflows::directory::domain::NewUser;
use crate::workflows::directory::repository::UserRepository;
use crate::workflows::directory::service::{DirectoryError, DirectoryService};
use crate::workflows::verification::repository::VerificationRepository;

#[derive(Debug)]
pub enum RosterImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Directory(DirectoryError),
}

impl std::fmt::Display for RosterImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterImportError::Io(err) => write!(f, "failed to read roster export: {}", err),
            RosterImportError::Csv(err) => write!(f, "invalid roster CSV data: {}", err),
            RosterImportError::Directory(err) => {
                write!(f, "could not register roster row: {}", err)
            }
        }
    }
}

impl std::error::Error for RosterImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RosterImportError::Io(err) => Some(err),
            RosterImportError::Csv(err) => Some(err),
            RosterImportError::Directory(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for RosterImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for RosterImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Counts reported back after an import run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RosterImportSummary {
    pub imported: usize,
    pub skipped_invalid: usize,
    pub skipped_existing: usize,
}

pub struct RosterImporter;

impl RosterImporter {
    pub fn from_path<P, U, V>(
        path: P,
        directory: &DirectoryService<U, V>,
    ) -> Result<RosterImportSummary, RosterImportError>
    where
        P: AsRef<Path>,
        U: UserRepository + 'static,
        V: VerificationRepository + 'static,
    {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, directory)
    }

    pub fn from_reader<R, U, V>(
        reader: R,
        directory: &DirectoryService<U, V>,
    ) -> Result<RosterImportSummary, RosterImportError>
    where
        R: Read,
        U: UserRepository + 'static,
        V: VerificationRepository + 'static,
    {
        let mut summary = RosterImportSummary::default();

        for row in parser::parse_rows(reader)? {
            let Some(new_user) = row.into_new_user() else {
                summary.skipped_invalid += 1;
                continue;
            };

            match directory.register(new_user) {
                Ok(_) => summary.imported += 1,
                Err(DirectoryError::EmailTaken(_)) => summary.skipped_existing += 1,
                Err(DirectoryError::InvalidEmail) => summary.skipped_invalid += 1,
                Err(other) => return Err(RosterImportError::Directory(other)),
            }
        }

        Ok(summary)
    }
}

impl parser::RosterRow {
    fn into_new_user(self) -> Option<NewUser> {
        let email = self.email?;
        Some(NewUser {
            email,
            first_name: self.first_name.unwrap_or_default(),
            last_name: self.last_name.unwrap_or_default(),
            phone: None,
            role: crate::workflows::directory::domain::UserRole::Youth,
            category: self.category,
            country: self.country,
            camp: self.camp,
            community: self.community,
            date_of_birth: None,
            gender: None,
            organization_name: None,
            organization_type: None,
        })
    }
}
