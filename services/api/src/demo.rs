use crate::infra::{build_services, PlatformServices};
use chrono::{Duration, Utc};
use clap::Args;
use std::io::Cursor;
use std::path::PathBuf;
use youthbridge::config::LimitsConfig;
use youthbridge::error::AppError;
use youthbridge::workflows::directory::domain::{NewUser, UserRole};
use youthbridge::workflows::intake::{RosterImporter, RosterImportSummary};
use youthbridge::workflows::opportunities::applications::domain::{
    ApplicationStatus, ApplicationSubmission,
};
use youthbridge::workflows::opportunities::applications::service::ApplicationError;
use youthbridge::workflows::opportunities::domain::NewOpportunity;
use youthbridge::workflows::verification::domain::{
    DocumentKind, DocumentUpload, ScheduleRequest, VerificationStatus, YouthSearchFilters,
};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Optional roster CSV used to onboard youths; a bundled sample is used
    /// when omitted.
    #[arg(long)]
    pub(crate) roster_csv: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct RosterImportArgs {
    /// Path to the roster CSV export
    #[arg(long)]
    pub(crate) file: PathBuf,
}

const SAMPLE_ROSTER: &str = "Email,First Name,Last Name,Category,Country,Camp,Community\n\
awa.deng@example.org,Awa,Deng,REFUGEE,Kenya,Kakuma,\n\
leila.hassan@example.org,Leila,Hassan,PWD,Kenya,Kakuma,Zone 3\n\
samuel.okot@example.org,Samuel,Okot,IDP,Kenya,Kakuma,\n";

pub(crate) fn run_roster_import(args: RosterImportArgs) -> Result<(), AppError> {
    let services = build_services(&LimitsConfig::default());
    let summary = RosterImporter::from_path(&args.file, &services.directory)?;
    render_roster_summary(&summary);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let services = build_services(&LimitsConfig::default());

    println!("YouthBridge platform demo");

    let admin = services.directory.register(staff(
        "grace.admin@example.org",
        "Grace",
        UserRole::Admin,
    ))?;
    let mut agent_profile = staff("peter.agent@example.org", "Peter", UserRole::FieldAgent);
    agent_profile.camp = Some("Kakuma".to_string());
    services.directory.register(agent_profile)?;
    let mut donor_profile = staff("fund@horizon.example.org", "Nadia", UserRole::Donor);
    donor_profile.organization_name = Some("Horizon Foundation".to_string());
    let donor = services.directory.register(donor_profile)?;

    let summary = match args.roster_csv {
        Some(path) => RosterImporter::from_path(path, &services.directory)?,
        None => RosterImporter::from_reader(Cursor::new(SAMPLE_ROSTER), &services.directory)?,
    };
    render_roster_summary(&summary);

    let pending = services.verification.pending_cases()?;
    println!("\nVerification queue: {} pending case(s)", pending.len());
    let Some(case) = pending.first().cloned() else {
        println!("nothing to verify; demo ends early");
        return Ok(());
    };
    let youth_id = case.youth.id.clone();

    services.verification.upload_document(
        &youth_id,
        document_upload(DocumentKind::Id, "national-id.pdf"),
    )?;
    services.verification.upload_document(
        &youth_id,
        document_upload(DocumentKind::Transcript, "transcript.pdf"),
    )?;
    println!(
        "- {} {} uploaded identity documents",
        case.youth.first_name, case.youth.last_name
    );

    let scheduled = services.verification.schedule_visit(ScheduleRequest {
        verification_id: case.verification.id.clone(),
        visit_date: Utc::now() + Duration::days(3),
        notes: Some("confirm identity and residence".to_string()),
        photos: Vec::new(),
    })?;
    println!(
        "- visit scheduled with {} {} (matched on {})",
        scheduled.assigned_agent.first_name, scheduled.assigned_agent.last_name,
        scheduled.matched_on
    );

    let completed = services.verification.complete(
        &case.verification.id,
        &scheduled.visit.field_agent_id,
        Some("identity confirmed in person".to_string()),
    )?;
    println!(
        "- case {} is now {}",
        completed.verification.id.0,
        completed.verification.status.label()
    );

    let listing = services.opportunities.create(NewOpportunity {
        donor_id: donor.user.id.clone(),
        title: "Digital skills scholarship".to_string(),
        description: "Twelve-week coding bootcamp with mentorship and a stipend".to_string(),
        requirements: Some("Basic literacy".to_string()),
        application_link: None,
        categories: Vec::new(),
        countries: vec!["Kenya".to_string()],
        deadline: Some(Utc::now() + Duration::days(30)),
        max_applicants: Some(25),
    })?;
    println!("\nDonor posted: {} ({})", listing.title, listing.id.0);

    let view = services.applications.submit(ApplicationSubmission {
        youth_id: youth_id.clone(),
        opportunity_id: listing.id.clone(),
        cover_letter: Some("I would like to join the bootcamp.".to_string()),
        additional_info: None,
        documents: Vec::new(),
    })?;
    println!(
        "- application {} submitted ({})",
        view.application.id.0,
        view.application.status.label()
    );

    match services.applications.submit(ApplicationSubmission {
        youth_id: youth_id.clone(),
        opportunity_id: listing.id.clone(),
        cover_letter: None,
        additional_info: None,
        documents: Vec::new(),
    }) {
        Err(ApplicationError::Refused(reason)) => {
            println!("- gate refused a second attempt: {}", reason.summary());
        }
        Err(other) => return Err(other.into()),
        Ok(_) => println!("- unexpected: duplicate application was admitted"),
    }

    let detail = services.applications.update_status(
        &view.application.id,
        &donor.user.id,
        ApplicationStatus::Selected,
    )?;
    println!(
        "- donor selected {} {} for the cohort",
        detail.youth.first_name, detail.youth.last_name
    );

    let verified = services.verification.search_youth(YouthSearchFilters {
        status: Some(VerificationStatus::Verified),
        ..YouthSearchFilters::default()
    })?;
    println!(
        "\nDirectory now holds {} verified youth(s); admin account {} can review the rest.",
        verified.len(),
        admin.user.email
    );

    Ok(())
}

fn render_roster_summary(summary: &RosterImportSummary) {
    println!(
        "Roster import: {} registered, {} invalid row(s) skipped, {} already present",
        summary.imported, summary.skipped_invalid, summary.skipped_existing
    );
}

fn staff(email: &str, first_name: &str, role: UserRole) -> NewUser {
    NewUser {
        email: email.to_string(),
        first_name: first_name.to_string(),
        last_name: "Demo".to_string(),
        phone: None,
        role,
        category: None,
        country: Some("Kenya".to_string()),
        camp: None,
        community: None,
        date_of_birth: None,
        gender: None,
        organization_name: None,
        organization_type: None,
    }
}

fn document_upload(kind: DocumentKind, file_name: &str) -> DocumentUpload {
    let mime_type = mime_guess::from_path(file_name)
        .first_raw()
        .map(str::to_string);
    DocumentUpload {
        kind,
        file_name: file_name.to_string(),
        file_url: format!("https://files.youthbridge.example.org/{file_name}"),
        mime_type,
        size_bytes: Some(256 * 1024),
    }
}
