use super::domain::Application;
use crate::workflows::postings::domain::Posting;

#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("failed to encode roster csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to finalize roster csv: {0}")]
    Finish(std::io::Error),
}

/// Render a posting's applications as CSV for the professor view.
/// Rows keep the ledger order (newest first); withdrawn applications
/// are included so the export matches what the professor sees.
pub fn export_roster(posting: &Posting, records: &[Application]) -> Result<Vec<u8>, RosterError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record([
        "application_id",
        "course_code",
        "status",
        "submitted_at",
        "resume",
        "transcript",
        "note",
    ])?;

    for record in records.iter().filter(|app| app.posting_id == posting.id) {
        let submitted_at = record.submitted_at.to_rfc3339();
        writer.write_record([
            record.id.0.as_str(),
            posting.course_code.as_str(),
            record.status.label(),
            submitted_at.as_str(),
            record
                .resume
                .as_ref()
                .map(|doc| doc.name.as_str())
                .unwrap_or(""),
            record
                .transcript
                .as_ref()
                .map(|doc| doc.name.as_str())
                .unwrap_or(""),
            record.note.as_deref().unwrap_or(""),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|err| RosterError::Finish(err.into_error()))
}
