use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use tracing::{debug, error};

use super::documents::{
    DefaultDocumentPrompt, DefaultDocuments, DocumentPolicy, DocumentRef, ValidationError,
};
use super::domain::{
    Application, ApplicationId, ReviewAction, SubmissionPayload, SubmissionRequest,
};
use super::ledger::{ApplicationLedger, InvariantViolation, SubmitOutcome};
use super::store::{StateStore, StoreError};
use crate::workflows::postings::catalog::PostingCatalog;
use crate::workflows::postings::domain::{Posting, PostingId};

/// Facade composing the seed catalog, document policy, state store, and
/// the save-as-default decision seam. One instance serves one session;
/// every operation runs to completion before the next is handled.
pub struct PortalService<S, P> {
    catalog: Mutex<PostingCatalog>,
    policy: DocumentPolicy,
    store: Arc<S>,
    prompt: Arc<P>,
    defaults: Mutex<DefaultDocuments>,
}

static APPLICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_application_id() -> ApplicationId {
    let id = APPLICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ApplicationId(format!("app-{id:06}"))
}

/// Error raised by the portal service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
    #[error("no posting with id {id} exists")]
    UnknownPosting { id: PostingId },
    #[error("posting {id} is closed to new applications")]
    PostingClosed { id: PostingId },
}

impl<S, P> PortalService<S, P>
where
    S: StateStore + 'static,
    P: DefaultDocumentPrompt + 'static,
{
    pub fn new(store: Arc<S>, prompt: Arc<P>, policy: DocumentPolicy) -> Self {
        Self {
            catalog: Mutex::new(PostingCatalog::seed()),
            policy,
            store,
            prompt,
            defaults: Mutex::new(DefaultDocuments::default()),
        }
    }

    pub fn policy(&self) -> DocumentPolicy {
        self.policy
    }

    pub fn postings(&self) -> Vec<Posting> {
        self.catalog
            .lock()
            .expect("catalog mutex poisoned")
            .postings()
            .to_vec()
    }

    pub fn posting(&self, id: &PostingId) -> Option<Posting> {
        self.catalog
            .lock()
            .expect("catalog mutex poisoned")
            .get(id)
            .cloned()
    }

    /// The session's application list, newest first.
    pub fn applications(&self) -> Vec<Application> {
        self.store.load_applications()
    }

    pub fn find_active(&self, posting_id: &PostingId) -> Option<Application> {
        let ledger = ApplicationLedger::new(self.store.load_applications());
        ledger.find_active(posting_id).cloned()
    }

    /// Submit a new application for a posting, or fold the payload into
    /// the active one. Absent documents are filled from the student's
    /// saved defaults before validation; freshly provided documents are
    /// offered to the save-as-default prompt after a successful commit.
    pub fn submit_or_update(
        &self,
        posting_id: &PostingId,
        payload: SubmissionPayload,
    ) -> Result<(SubmitOutcome, Application), ServiceError> {
        let posting = self
            .posting(posting_id)
            .ok_or_else(|| ServiceError::UnknownPosting {
                id: posting_id.clone(),
            })?;

        let mut ledger = ApplicationLedger::new(self.store.load_applications());

        if posting.closed && ledger.find_active(posting_id).is_none() {
            return Err(ServiceError::PostingClosed {
                id: posting_id.clone(),
            });
        }

        let fresh_documents: Vec<DocumentRef> = payload
            .resume
            .iter()
            .chain(payload.transcript.iter())
            .cloned()
            .collect();

        let merged = {
            let defaults = self.defaults.lock().expect("defaults mutex poisoned");
            payload.with_defaults(&defaults)
        };

        let request = SubmissionRequest {
            posting_id: posting_id.clone(),
            course_title: posting.title.clone(),
            payload: merged,
        };

        let (outcome, record) =
            ledger.submit_or_update(request, self.policy, next_application_id(), Utc::now())?;
        self.store.save_applications(ledger.records())?;

        self.offer_defaults(&fresh_documents, &record);

        Ok((outcome, record))
    }

    /// Withdraw the student's application. Unknown ids and terminal
    /// statuses leave the list untouched and report no failure.
    pub fn withdraw(&self, id: &ApplicationId) -> Result<Option<Application>, ServiceError> {
        let mut ledger = ApplicationLedger::new(self.store.load_applications());
        match ledger.withdraw(id) {
            Some(record) => {
                self.store.save_applications(ledger.records())?;
                Ok(Some(record))
            }
            None => {
                debug!(application_id = %id, "withdrawal skipped, record missing or terminal");
                Ok(None)
            }
        }
    }

    /// Permanently delete a withdrawn application. A non-withdrawn
    /// target is a programming fault: it is reported to the diagnostic
    /// channel and the list stays unchanged.
    pub fn delete_withdrawn(&self, id: &ApplicationId) -> Result<bool, ServiceError> {
        let mut ledger = ApplicationLedger::new(self.store.load_applications());
        match ledger.delete_withdrawn(id) {
            Ok(true) => {
                self.store.save_applications(ledger.records())?;
                Ok(true)
            }
            Ok(false) => {
                debug!(application_id = %id, "deletion skipped, record missing");
                Ok(false)
            }
            Err(violation) => {
                error!("{violation}");
                Err(ServiceError::Invariant(violation))
            }
        }
    }

    /// Apply a professor review action. Unknown ids and withdrawn
    /// records are a defensive no-op.
    pub fn advance_status(
        &self,
        id: &ApplicationId,
        action: ReviewAction,
    ) -> Result<Option<Application>, ServiceError> {
        let mut ledger = ApplicationLedger::new(self.store.load_applications());
        match ledger.advance_status(id, action) {
            Some(record) => {
                self.store.save_applications(ledger.records())?;
                Ok(Some(record))
            }
            None => {
                debug!(application_id = %id, "review action skipped, record missing or withdrawn");
                Ok(None)
            }
        }
    }

    /// Flip a posting's closed flag (professor-controlled).
    pub fn set_posting_closed(
        &self,
        id: &PostingId,
        closed: bool,
    ) -> Result<Posting, ServiceError> {
        let mut catalog = self.catalog.lock().expect("catalog mutex poisoned");
        catalog
            .set_closed(id, closed)
            .cloned()
            .ok_or_else(|| ServiceError::UnknownPosting { id: id.clone() })
    }

    /// The posting currently selected in the professor view. A missing,
    /// corrupt, or stale stored selection falls back to the first seed
    /// posting.
    pub fn selected_posting(&self) -> PostingId {
        let catalog = self.catalog.lock().expect("catalog mutex poisoned");
        self.store
            .load_selected_posting()
            .filter(|id| catalog.get(id).is_some())
            .unwrap_or_else(|| catalog.first_posting_id())
    }

    pub fn select_posting(&self, id: &PostingId) -> Result<(), ServiceError> {
        if self.posting(id).is_none() {
            return Err(ServiceError::UnknownPosting { id: id.clone() });
        }
        self.store.save_selected_posting(id)?;
        Ok(())
    }

    pub fn default_documents(&self) -> DefaultDocuments {
        self.defaults
            .lock()
            .expect("defaults mutex poisoned")
            .clone()
    }

    /// Offer each freshly uploaded document to the save-as-default
    /// prompt. Runs only after a successful commit; a declined prompt
    /// changes nothing.
    fn offer_defaults(&self, fresh: &[DocumentRef], record: &Application) {
        if fresh.is_empty() {
            return;
        }

        let mut defaults = self.defaults.lock().expect("defaults mutex poisoned");
        for document in fresh {
            let slot = if record.resume.as_ref() == Some(document) {
                &mut defaults.resume
            } else if record.transcript.as_ref() == Some(document) {
                &mut defaults.transcript
            } else {
                continue;
            };

            if slot.as_ref() == Some(document) {
                continue;
            }
            if self.prompt.confirm_save(document).accepted {
                *slot = Some(document.clone());
            }
        }
    }
}
