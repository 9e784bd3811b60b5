use serde::{Deserialize, Serialize};

/// Platform-neutral reference to an uploaded file. Only the declared
/// name and media type are ever inspected; file contents never enter
/// the system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRef {
    pub name: String,
    pub media_type: String,
}

impl DocumentRef {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
        }
    }

    /// PDF by declared media type, or by case-insensitive `.pdf` suffix
    /// when the browser reported no useful type.
    pub fn is_pdf(&self) -> bool {
        self.media_type
            .eq_ignore_ascii_case(mime::APPLICATION_PDF.as_ref())
            || self.name.to_ascii_lowercase().ends_with(".pdf")
    }
}

/// True when a document reference is present and qualifies as a PDF.
pub fn is_acceptable_document(file: Option<&DocumentRef>) -> bool {
    file.map(DocumentRef::is_pdf).unwrap_or(false)
}

/// Intake dial: whether a posting round demands a resume up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentPolicy {
    pub resume_required: bool,
}

impl Default for DocumentPolicy {
    fn default() -> Self {
        Self {
            resume_required: true,
        }
    }
}

/// Rejections raised before any state is touched. The message text is
/// surfaced to the student verbatim.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("a resume is required before this application can be submitted")]
    ResumeRequired,
    #[error("resume '{name}' must be a PDF document")]
    ResumeNotPdf { name: String },
    #[error("transcript '{name}' must be a PDF document")]
    TranscriptNotPdf { name: String },
}

/// Decide whether a submission's documents are acceptable as a whole.
/// Pure and total; callers mutate nothing on rejection.
pub fn validate_submission(
    resume: Option<&DocumentRef>,
    transcript: Option<&DocumentRef>,
    policy: DocumentPolicy,
) -> Result<(), ValidationError> {
    match resume {
        None if policy.resume_required => return Err(ValidationError::ResumeRequired),
        Some(doc) if !doc.is_pdf() => {
            return Err(ValidationError::ResumeNotPdf {
                name: doc.name.clone(),
            })
        }
        _ => {}
    }

    if let Some(doc) = transcript {
        if !doc.is_pdf() {
            return Err(ValidationError::TranscriptNotPdf {
                name: doc.name.clone(),
            });
        }
    }

    Ok(())
}

/// Student-chosen document references reused across submissions without
/// re-uploading.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultDocuments {
    pub resume: Option<DocumentRef>,
    pub transcript: Option<DocumentRef>,
}

/// Outcome of the synchronous "save this as your default?" decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveDecision {
    pub accepted: bool,
}

/// Seam for the confirmation dialog. The decision is a plain return
/// value so the core stays testable without a UI; whatever asks the
/// user blocks its own event handling, not this crate.
pub trait DefaultDocumentPrompt: Send + Sync {
    fn confirm_save(&self, document: &DocumentRef) -> SaveDecision;
}

/// Prompt that always answers the same way. Non-interactive surfaces
/// (server, demo, tests) use it in place of a dialog.
#[derive(Debug, Clone, Copy)]
pub struct FixedDecisionPrompt {
    accept: bool,
}

impl FixedDecisionPrompt {
    pub const fn accepting() -> Self {
        Self { accept: true }
    }

    pub const fn declining() -> Self {
        Self { accept: false }
    }
}

impl DefaultDocumentPrompt for FixedDecisionPrompt {
    fn confirm_save(&self, _document: &DocumentRef) -> SaveDecision {
        SaveDecision {
            accepted: self.accept,
        }
    }
}
