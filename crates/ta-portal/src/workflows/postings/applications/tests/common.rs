use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::workflows::postings::applications::documents::{
    DefaultDocumentPrompt, DocumentPolicy, DocumentRef, SaveDecision,
};
use crate::workflows::postings::applications::domain::SubmissionPayload;
use crate::workflows::postings::applications::service::PortalService;
use crate::workflows::postings::applications::store::{
    MemoryStateStore, StateStore, StoreError, APPLICATIONS_KEY,
};
use crate::workflows::postings::applications::Application;
use crate::workflows::postings::domain::PostingId;

pub(super) fn csc209() -> PostingId {
    PostingId("p-csc209".to_string())
}

pub(super) fn csc263() -> PostingId {
    PostingId("p-csc263".to_string())
}

pub(super) fn pdf_resume() -> DocumentRef {
    DocumentRef::new("resume.pdf", "application/pdf")
}

pub(super) fn pdf_resume_v2() -> DocumentRef {
    DocumentRef::new("resume-v2.pdf", "application/pdf")
}

pub(super) fn word_resume() -> DocumentRef {
    DocumentRef::new("resume.docx", "application/msword")
}

pub(super) fn uppercase_transcript() -> DocumentRef {
    DocumentRef::new("Transcript.PDF", "application/octet-stream")
}

pub(super) fn scanned_transcript() -> DocumentRef {
    DocumentRef::new("transcript.png", "image/png")
}

pub(super) fn payload() -> SubmissionPayload {
    SubmissionPayload {
        resume: Some(pdf_resume()),
        transcript: None,
        note: Some("Held this tutorial section last year.".to_string()),
    }
}

pub(super) fn required_policy() -> DocumentPolicy {
    DocumentPolicy {
        resume_required: true,
    }
}

pub(super) fn optional_policy() -> DocumentPolicy {
    DocumentPolicy {
        resume_required: false,
    }
}

/// Prompt double that records every document it was asked about.
#[derive(Default)]
pub(super) struct RecordingPrompt {
    accept: bool,
    seen: Mutex<Vec<DocumentRef>>,
}

impl RecordingPrompt {
    pub(super) fn accepting() -> Self {
        Self {
            accept: true,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn declining() -> Self {
        Self {
            accept: false,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn seen(&self) -> Vec<DocumentRef> {
        self.seen.lock().expect("prompt mutex poisoned").clone()
    }
}

impl DefaultDocumentPrompt for RecordingPrompt {
    fn confirm_save(&self, document: &DocumentRef) -> SaveDecision {
        self.seen
            .lock()
            .expect("prompt mutex poisoned")
            .push(document.clone());
        SaveDecision {
            accepted: self.accept,
        }
    }
}

/// Store whose writes always fail, for exercising failure paths.
pub(super) struct FailingStore;

impl StateStore for FailingStore {
    fn load_applications(&self) -> Vec<Application> {
        Vec::new()
    }

    fn save_applications(&self, _records: &[Application]) -> Result<(), StoreError> {
        Err(StoreError::Io {
            key: APPLICATIONS_KEY,
            source: std::io::Error::other("store offline"),
        })
    }

    fn load_selected_posting(&self) -> Option<PostingId> {
        None
    }

    fn save_selected_posting(&self, _posting_id: &PostingId) -> Result<(), StoreError> {
        Err(StoreError::Io {
            key: APPLICATIONS_KEY,
            source: std::io::Error::other("store offline"),
        })
    }
}

pub(super) fn build_service() -> (
    PortalService<MemoryStateStore, RecordingPrompt>,
    Arc<MemoryStateStore>,
    Arc<RecordingPrompt>,
) {
    let store = Arc::new(MemoryStateStore::default());
    let prompt = Arc::new(RecordingPrompt::declining());
    let service = PortalService::new(store.clone(), prompt.clone(), required_policy());
    (service, store, prompt)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
