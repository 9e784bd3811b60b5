use crate::infra::file_backed_service;
use clap::Args;
use std::io::Write;
use std::sync::Arc;
use ta_portal::config::AppConfig;
use ta_portal::error::AppError;
use ta_portal::workflows::postings::applications::{
    export_roster, Application, DocumentPolicy, DocumentRef, FixedDecisionPrompt,
    MemoryStateStore, PortalService, ReviewAction, ServiceError, SubmissionPayload,
};
use ta_portal::workflows::postings::PostingId;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Run the intake rules of the resume-optional posting round
    #[arg(long)]
    pub(crate) resume_optional: bool,
}

#[derive(Args, Debug)]
pub(crate) struct RosterArgs {
    /// Posting identifier to export (defaults to the stored professor selection)
    #[arg(long)]
    pub(crate) posting: Option<String>,
}

pub(crate) fn run_roster(args: RosterArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = file_backed_service(&config, false);

    let posting_id = match args.posting {
        Some(raw) => PostingId(raw),
        None => service.selected_posting(),
    };
    let posting = service
        .posting(&posting_id)
        .ok_or(AppError::Workflow(ServiceError::UnknownPosting {
            id: posting_id,
        }))?;

    let csv = export_roster(&posting, &service.applications())?;
    std::io::stdout().write_all(&csv)?;
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let policy = DocumentPolicy {
        resume_required: !args.resume_optional,
    };
    let service = PortalService::new(
        Arc::new(MemoryStateStore::default()),
        Arc::new(FixedDecisionPrompt::accepting()),
        policy,
    );

    println!("TA posting portal demo");
    println!("\nOpen postings:");
    for posting in service.postings() {
        println!(
            "  - {} | {} | {} | {}",
            posting.course_code, posting.title, posting.professor, posting.class_time
        );
    }

    let posting_id = service
        .postings()
        .first()
        .map(|posting| posting.id.clone())
        .expect("seed catalog is never empty");

    println!("\nStudent submits an application for {}:", posting_id);
    let payload = SubmissionPayload {
        resume: Some(DocumentRef::new("r1.pdf", "application/pdf")),
        transcript: None,
        note: Some("Ran the Wednesday tutorial section last term.".to_string()),
    };
    let (_, record) = service.submit_or_update(&posting_id, payload)?;
    print_record(&record);

    println!("\nProfessor shortlists the applicant:");
    let record = service
        .advance_status(&record.id, ReviewAction::Interview)?
        .expect("record exists");
    print_record(&record);

    println!("\nStudent withdraws:");
    let withdrawn = service.withdraw(&record.id)?.expect("record exists");
    print_record(&withdrawn);

    println!("\nStudent applies again with a new resume:");
    let retry = SubmissionPayload {
        resume: Some(DocumentRef::new("r2.pdf", "application/pdf")),
        transcript: None,
        note: None,
    };
    let (_, second) = service.submit_or_update(&posting_id, retry)?;
    print_record(&second);

    println!("\nFinal application list (newest first):");
    for record in service.applications() {
        println!(
            "  - {} | {} | {}",
            record.id,
            record.course_title,
            record.status.label()
        );
    }

    let posting = service.posting(&posting_id).expect("posting exists");
    let csv = export_roster(&posting, &service.applications())?;
    println!("\nRoster export for {}:", posting.course_code);
    print!("{}", String::from_utf8_lossy(&csv));

    Ok(())
}

fn print_record(record: &Application) {
    println!(
        "  {} | status: {} | resume: {}",
        record.id,
        record.status.label(),
        record
            .resume
            .as_ref()
            .map(|doc| doc.name.as_str())
            .unwrap_or("(none)")
    );
    println!("  next step: {}", record.next_step);
}
