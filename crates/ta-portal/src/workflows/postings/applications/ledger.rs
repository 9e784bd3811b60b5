use chrono::{DateTime, Utc};
use tracing::{error, warn};

use super::documents::{validate_submission, DocumentPolicy, ValidationError};
use super::domain::{
    Application, ApplicationId, ApplicationStatus, ReviewAction, SubmissionRequest,
};
use crate::workflows::postings::domain::PostingId;

/// Faults that indicate misuse of the ledger API rather than bad user
/// input. They are reported to the diagnostic channel and never shown
/// to the student.
#[derive(Debug, thiserror::Error)]
pub enum InvariantViolation {
    #[error("application {id} is '{status}' and cannot be deleted; only withdrawn applications may be removed", status = .status.label())]
    DeleteActiveRecord {
        id: ApplicationId,
        status: ApplicationStatus,
    },
    #[error("posting {posting_id} holds {count} active applications; expected at most one")]
    DuplicateActive { posting_id: PostingId, count: usize },
}

/// How an intake request landed in the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Created,
    Updated,
}

impl SubmitOutcome {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
        }
    }
}

/// The session's application list, newest first.
///
/// Every mutating operation either applies completely or leaves the
/// list untouched; validation always runs before the first write.
#[derive(Debug, Default)]
pub struct ApplicationLedger {
    records: Vec<Application>,
}

impl ApplicationLedger {
    pub fn new(records: Vec<Application>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Application] {
        &self.records
    }

    pub fn into_records(self) -> Vec<Application> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &ApplicationId) -> Option<&Application> {
        self.records.iter().find(|app| app.id == *id)
    }

    /// The single non-withdrawn application for a posting, if any.
    ///
    /// The one-active-per-posting invariant is preserved by
    /// `submit_or_update`; if a duplicate is detected anyway it is
    /// reported as a logic fault and the newest record wins.
    pub fn find_active(&self, posting_id: &PostingId) -> Option<&Application> {
        let mut matches = self
            .records
            .iter()
            .filter(|app| app.posting_id == *posting_id && app.status.is_active());

        let newest = matches.next()?;
        let extras = matches.count();
        if extras > 0 {
            let violation = InvariantViolation::DuplicateActive {
                posting_id: posting_id.clone(),
                count: extras + 1,
            };
            error!("{violation}");
        }
        Some(newest)
    }

    /// Create a fresh application, or fold the payload into the active
    /// one for the same posting.
    ///
    /// An update merges field by field: a document replaces the stored
    /// one only when explicitly provided, a note only when non-empty.
    /// The merged result is re-validated before commit, and the
    /// identifier, submission timestamp, and status never change.
    pub fn submit_or_update(
        &mut self,
        request: SubmissionRequest,
        policy: DocumentPolicy,
        new_id: ApplicationId,
        now: DateTime<Utc>,
    ) -> Result<(SubmitOutcome, Application), ValidationError> {
        let SubmissionRequest {
            posting_id,
            course_title,
            payload,
        } = request;

        let existing = self
            .records
            .iter()
            .position(|app| app.posting_id == posting_id && app.status.is_active());

        match existing {
            None => {
                validate_submission(payload.resume.as_ref(), payload.transcript.as_ref(), policy)?;

                let record = Application {
                    id: new_id,
                    posting_id,
                    course_title,
                    status: ApplicationStatus::Submitted,
                    resume: payload.resume,
                    transcript: payload.transcript,
                    note: normalize_note(payload.note),
                    next_step: ApplicationStatus::Submitted.next_step().to_string(),
                    submitted_at: now,
                };
                self.records.insert(0, record.clone());
                Ok((SubmitOutcome::Created, record))
            }
            Some(index) => {
                let current = &self.records[index];
                let resume = payload.resume.or_else(|| current.resume.clone());
                let transcript = payload.transcript.or_else(|| current.transcript.clone());
                let note = match normalize_note(payload.note) {
                    Some(note) => Some(note),
                    None => current.note.clone(),
                };

                validate_submission(resume.as_ref(), transcript.as_ref(), policy)?;

                let record = &mut self.records[index];
                record.resume = resume;
                record.transcript = transcript;
                record.note = note;
                Ok((SubmitOutcome::Updated, record.clone()))
            }
        }
    }

    /// Student-initiated withdrawal. Unknown ids and records already in
    /// a terminal status are left untouched.
    pub fn withdraw(&mut self, id: &ApplicationId) -> Option<Application> {
        let record = self.records.iter_mut().find(|app| app.id == *id)?;
        if record.status.is_terminal() {
            return None;
        }

        record.status = ApplicationStatus::Withdrawn;
        record.next_step = ApplicationStatus::Withdrawn.next_step().to_string();
        Some(record.clone())
    }

    /// Permanently remove a withdrawn application. Unknown ids are a
    /// no-op; deleting any other status is an invariant violation and
    /// the list stays unchanged.
    pub fn delete_withdrawn(&mut self, id: &ApplicationId) -> Result<bool, InvariantViolation> {
        let Some(index) = self.records.iter().position(|app| app.id == *id) else {
            return Ok(false);
        };

        let status = self.records[index].status;
        if status != ApplicationStatus::Withdrawn {
            return Err(InvariantViolation::DeleteActiveRecord {
                id: id.clone(),
                status,
            });
        }

        self.records.remove(index);
        Ok(true)
    }

    /// Professor review action: set the status and its default
    /// next-step guidance. Any reviewable status may be set at any
    /// time; there is no forward-only ordering. Unknown ids and
    /// withdrawn records are left untouched.
    pub fn advance_status(
        &mut self,
        id: &ApplicationId,
        action: ReviewAction,
    ) -> Option<Application> {
        let record = self.records.iter_mut().find(|app| app.id == *id)?;
        if record.status == ApplicationStatus::Withdrawn {
            warn!(application_id = %record.id, "review action ignored for withdrawn application");
            return None;
        }

        let status = action.status();
        record.status = status;
        record.next_step = status.next_step().to_string();
        Some(record.clone())
    }
}

fn normalize_note(note: Option<String>) -> Option<String> {
    note.filter(|text| !text.trim().is_empty())
}
