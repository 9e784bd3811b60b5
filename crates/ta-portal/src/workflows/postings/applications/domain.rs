use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::documents::{DefaultDocuments, DocumentRef};
use crate::workflows::postings::domain::PostingId;

/// Identifier wrapper for submitted applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Status tracked throughout the application review pipeline.
///
/// Professors may set any reviewable status in any order; the pipeline
/// is a vocabulary, not an enforced progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Submitted,
    Reviewed,
    Interview,
    Accepted,
    Rejected,
    Withdrawn,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::Reviewed => "reviewed",
            Self::Interview => "interview",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Withdrawn => "withdrawn",
        }
    }

    /// An application counts toward the one-active-per-posting rule
    /// unless the student has withdrawn it.
    pub const fn is_active(self) -> bool {
        !matches!(self, Self::Withdrawn)
    }

    /// Statuses the student can no longer withdraw from.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Accepted | Self::Rejected | Self::Withdrawn)
    }

    /// Default guidance surfaced alongside the status.
    pub const fn next_step(self) -> &'static str {
        match self {
            Self::Submitted => "Application received. The course staff will review it shortly.",
            Self::Reviewed => "Your application has been reviewed. Watch for an interview invitation.",
            Self::Interview => {
                "You have been shortlisted. The professor will contact you to schedule an interview."
            }
            Self::Accepted => "Congratulations! Check your university email for the offer details.",
            Self::Rejected => "This position has been filled. Thank you for applying.",
            Self::Withdrawn => "You withdrew this application. Submit again if you change your mind.",
        }
    }
}

/// Status changes a professor may apply during review.
///
/// `Submitted` and `Withdrawn` are deliberately unrepresentable here:
/// the former only arises from intake, the latter only from the student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewAction {
    Reviewed,
    Interview,
    Accepted,
    Rejected,
}

impl ReviewAction {
    pub const fn status(self) -> ApplicationStatus {
        match self {
            Self::Reviewed => ApplicationStatus::Reviewed,
            Self::Interview => ApplicationStatus::Interview,
            Self::Accepted => ApplicationStatus::Accepted,
            Self::Rejected => ApplicationStatus::Rejected,
        }
    }
}

/// A student's submission against one posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub posting_id: PostingId,
    pub course_title: String,
    pub status: ApplicationStatus,
    pub resume: Option<DocumentRef>,
    pub transcript: Option<DocumentRef>,
    pub note: Option<String>,
    pub next_step: String,
    pub submitted_at: DateTime<Utc>,
}

/// The literal form payload a student hands to intake.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    #[serde(default)]
    pub resume: Option<DocumentRef>,
    #[serde(default)]
    pub transcript: Option<DocumentRef>,
    #[serde(default)]
    pub note: Option<String>,
}

impl SubmissionPayload {
    /// Fill absent documents from the student's saved defaults.
    pub fn with_defaults(mut self, defaults: &DefaultDocuments) -> Self {
        if self.resume.is_none() {
            self.resume = defaults.resume.clone();
        }
        if self.transcript.is_none() {
            self.transcript = defaults.transcript.clone();
        }
        self
    }
}

/// Intake request routed to the ledger: which posting, shown under
/// which denormalized title, carrying which payload.
#[derive(Debug, Clone)]
pub struct SubmissionRequest {
    pub posting_id: PostingId,
    pub course_title: String,
    pub payload: SubmissionPayload,
}
