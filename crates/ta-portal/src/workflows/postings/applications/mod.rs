//! Application intake, review, and persistence for TA postings.
//!
//! Two collaborating pieces: the document validator decides whether a
//! submission's file references are acceptable, and the application
//! ledger keeps the (student, posting) relationship honest, at most
//! one non-withdrawn application per posting. The service facade wires
//! both to a key/value store and the save-as-default decision seam.

pub mod documents;
pub mod domain;
pub mod ledger;
pub mod roster;
pub mod router;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use documents::{
    is_acceptable_document, validate_submission, DefaultDocumentPrompt, DefaultDocuments,
    DocumentPolicy, DocumentRef, FixedDecisionPrompt, SaveDecision, ValidationError,
};
pub use domain::{
    Application, ApplicationId, ApplicationStatus, ReviewAction, SubmissionPayload,
    SubmissionRequest,
};
pub use ledger::{ApplicationLedger, InvariantViolation, SubmitOutcome};
pub use roster::{export_roster, RosterError};
pub use router::portal_router;
pub use service::{PortalService, ServiceError};
pub use store::{
    JsonFileStore, MemoryStateStore, StateStore, StoreError, APPLICATIONS_KEY,
    SELECTED_POSTING_KEY,
};
