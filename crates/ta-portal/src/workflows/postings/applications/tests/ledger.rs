use chrono::{DateTime, TimeZone, Utc};

use super::common::*;
use crate::workflows::postings::applications::domain::{
    Application, ApplicationId, ApplicationStatus, ReviewAction, SubmissionPayload,
    SubmissionRequest,
};
use crate::workflows::postings::applications::ledger::{
    ApplicationLedger, InvariantViolation, SubmitOutcome,
};
use crate::workflows::postings::applications::ValidationError;
use crate::workflows::postings::domain::PostingId;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 9, 30, 0).single().expect("valid timestamp")
}

fn later() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 16, 14, 0, 0).single().expect("valid timestamp")
}

fn app_id(n: u32) -> ApplicationId {
    ApplicationId(format!("app-{n:06}"))
}

fn request(posting_id: PostingId, payload: SubmissionPayload) -> SubmissionRequest {
    SubmissionRequest {
        posting_id,
        course_title: "Software Tools and Systems Programming".to_string(),
        payload,
    }
}

fn submitted(ledger: &mut ApplicationLedger, posting_id: PostingId, n: u32) -> Application {
    let (outcome, record) = ledger
        .submit_or_update(request(posting_id, payload()), required_policy(), app_id(n), now())
        .expect("valid submission");
    assert_eq!(outcome, SubmitOutcome::Created);
    record
}

#[test]
fn first_submission_creates_submitted_record() {
    let mut ledger = ApplicationLedger::default();
    let record = submitted(&mut ledger, csc209(), 1);

    assert_eq!(record.status, ApplicationStatus::Submitted);
    assert_eq!(record.next_step, ApplicationStatus::Submitted.next_step());
    assert_eq!(record.submitted_at, now());
    assert_eq!(ledger.len(), 1);
}

#[test]
fn newest_submission_sits_first() {
    let mut ledger = ApplicationLedger::default();
    submitted(&mut ledger, csc209(), 1);
    submitted(&mut ledger, csc263(), 2);

    assert_eq!(ledger.records()[0].posting_id, csc263());
    assert_eq!(ledger.records()[1].posting_id, csc209());
}

#[test]
fn resubmission_updates_in_place() {
    let mut ledger = ApplicationLedger::default();
    let original = submitted(&mut ledger, csc209(), 1);

    let update = SubmissionPayload {
        resume: Some(pdf_resume_v2()),
        transcript: None,
        note: None,
    };
    let (outcome, merged) = ledger
        .submit_or_update(request(csc209(), update), required_policy(), app_id(2), later())
        .expect("update accepted");

    assert_eq!(outcome, SubmitOutcome::Updated);
    assert_eq!(merged.id, original.id);
    assert_eq!(merged.submitted_at, original.submitted_at);
    assert_eq!(merged.status, ApplicationStatus::Submitted);
    assert_eq!(merged.resume, Some(pdf_resume_v2()));
    assert_eq!(merged.note, original.note, "empty note keeps the old one");
    assert_eq!(ledger.len(), 1, "update must not grow the list");
}

#[test]
fn update_keeps_documents_not_resupplied() {
    let mut ledger = ApplicationLedger::default();
    let initial = SubmissionPayload {
        resume: Some(pdf_resume()),
        transcript: Some(uppercase_transcript()),
        note: None,
    };
    ledger
        .submit_or_update(request(csc209(), initial), required_policy(), app_id(1), now())
        .expect("valid submission");

    let note_only = SubmissionPayload {
        resume: None,
        transcript: None,
        note: Some("Added availability for Friday labs.".to_string()),
    };
    let (_, merged) = ledger
        .submit_or_update(request(csc209(), note_only), required_policy(), app_id(2), later())
        .expect("note-only update accepted");

    assert_eq!(merged.resume, Some(pdf_resume()));
    assert_eq!(merged.transcript, Some(uppercase_transcript()));
    assert_eq!(merged.note.as_deref(), Some("Added availability for Friday labs."));
}

#[test]
fn rejected_update_leaves_record_untouched() {
    let mut ledger = ApplicationLedger::default();
    let original = submitted(&mut ledger, csc209(), 1);

    let bad_update = SubmissionPayload {
        resume: None,
        transcript: Some(scanned_transcript()),
        note: Some("please ignore".to_string()),
    };
    match ledger.submit_or_update(request(csc209(), bad_update), required_policy(), app_id(2), later())
    {
        Err(ValidationError::TranscriptNotPdf { .. }) => {}
        other => panic!("expected transcript rejection, got {other:?}"),
    }

    assert_eq!(ledger.records(), std::slice::from_ref(&original));
}

#[test]
fn rejected_submission_mutates_nothing() {
    let mut ledger = ApplicationLedger::default();
    let bare = SubmissionPayload::default();

    match ledger.submit_or_update(request(csc209(), bare), required_policy(), app_id(1), now()) {
        Err(ValidationError::ResumeRequired) => {}
        other => panic!("expected resume-required rejection, got {other:?}"),
    }
    assert!(ledger.is_empty());
}

#[test]
fn withdraw_sets_status_and_fixed_message() {
    let mut ledger = ApplicationLedger::default();
    let record = submitted(&mut ledger, csc209(), 1);

    let withdrawn = ledger.withdraw(&record.id).expect("withdrawal applies");
    assert_eq!(withdrawn.status, ApplicationStatus::Withdrawn);
    assert_eq!(withdrawn.next_step, ApplicationStatus::Withdrawn.next_step());

    assert!(ledger.withdraw(&app_id(99)).is_none(), "unknown id is a no-op");
    assert!(
        ledger.withdraw(&record.id).is_none(),
        "withdrawn is terminal for the student"
    );
}

#[test]
fn accepted_application_cannot_be_withdrawn() {
    let mut ledger = ApplicationLedger::default();
    let record = submitted(&mut ledger, csc209(), 1);
    ledger
        .advance_status(&record.id, ReviewAction::Accepted)
        .expect("review applies");

    assert!(ledger.withdraw(&record.id).is_none());
    assert_eq!(
        ledger.get(&record.id).expect("record kept").status,
        ApplicationStatus::Accepted
    );
}

#[test]
fn withdraw_then_resubmit_creates_fresh_record() {
    let mut ledger = ApplicationLedger::default();
    let first = submitted(&mut ledger, csc209(), 1);
    ledger.withdraw(&first.id).expect("withdrawal applies");

    let (outcome, second) = ledger
        .submit_or_update(request(csc209(), payload()), required_policy(), app_id(2), later())
        .expect("fresh submission accepted");

    assert_eq!(outcome, SubmitOutcome::Created);
    assert_ne!(second.id, first.id, "withdrawn records are never revived");
    assert_eq!(ledger.len(), 2);
    assert_eq!(
        ledger.get(&first.id).expect("old record kept").status,
        ApplicationStatus::Withdrawn
    );
}

#[test]
fn at_most_one_active_record_per_posting() {
    let mut ledger = ApplicationLedger::default();
    let first = submitted(&mut ledger, csc209(), 1);
    ledger.withdraw(&first.id).expect("withdrawal applies");
    let second_payload = SubmissionPayload {
        resume: Some(pdf_resume_v2()),
        transcript: None,
        note: None,
    };
    ledger
        .submit_or_update(
            request(csc209(), second_payload),
            required_policy(),
            app_id(2),
            later(),
        )
        .expect("fresh submission accepted");
    ledger
        .submit_or_update(request(csc209(), payload()), required_policy(), app_id(3), later())
        .expect("resubmission folds into the active record");

    let active: Vec<_> = ledger
        .records()
        .iter()
        .filter(|app| app.posting_id == csc209() && app.status.is_active())
        .collect();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, app_id(2));
    assert_eq!(ledger.find_active(&csc209()).expect("active exists").id, app_id(2));
}

#[test]
fn find_active_returns_newest_when_invariant_already_broken() {
    let mut ledger = ApplicationLedger::default();
    let older = submitted(&mut ledger, csc209(), 1);
    // Plant a duplicate directly; the API itself never produces one.
    let mut duplicate = older.clone();
    duplicate.id = app_id(2);
    let mut records = ledger.into_records();
    records.insert(0, duplicate);
    let ledger = ApplicationLedger::new(records);

    assert_eq!(ledger.find_active(&csc209()).expect("active exists").id, app_id(2));
}

#[test]
fn delete_refuses_non_withdrawn_records() {
    let mut ledger = ApplicationLedger::default();
    let record = submitted(&mut ledger, csc209(), 1);

    match ledger.delete_withdrawn(&record.id) {
        Err(InvariantViolation::DeleteActiveRecord { status, .. }) => {
            assert_eq!(status, ApplicationStatus::Submitted);
        }
        other => panic!("expected invariant violation, got {other:?}"),
    }
    assert_eq!(ledger.len(), 1, "refused deletion leaves the list unchanged");
}

#[test]
fn delete_removes_withdrawn_records_only() {
    let mut ledger = ApplicationLedger::default();
    let record = submitted(&mut ledger, csc209(), 1);
    ledger.withdraw(&record.id).expect("withdrawal applies");

    assert!(ledger.delete_withdrawn(&record.id).expect("deletion applies"));
    assert!(ledger.is_empty());

    assert!(
        !ledger.delete_withdrawn(&record.id).expect("missing id is a no-op"),
        "second delete reports nothing removed"
    );
}

#[test]
fn review_actions_set_status_and_guidance() {
    let mut ledger = ApplicationLedger::default();
    let record = submitted(&mut ledger, csc209(), 1);

    let updated = ledger
        .advance_status(&record.id, ReviewAction::Interview)
        .expect("review applies");
    assert_eq!(updated.status, ApplicationStatus::Interview);
    assert_eq!(updated.next_step, ApplicationStatus::Interview.next_step());
}

#[test]
fn review_order_is_unconstrained() {
    let mut ledger = ApplicationLedger::default();
    let record = submitted(&mut ledger, csc209(), 1);

    // Straight to a decision, then back again: the pipeline is a
    // vocabulary, not an enforced progression.
    ledger
        .advance_status(&record.id, ReviewAction::Accepted)
        .expect("jump ahead applies");
    let rewound = ledger
        .advance_status(&record.id, ReviewAction::Reviewed)
        .expect("backward move applies");
    assert_eq!(rewound.status, ApplicationStatus::Reviewed);
}

#[test]
fn review_skips_withdrawn_and_unknown_records() {
    let mut ledger = ApplicationLedger::default();
    let record = submitted(&mut ledger, csc209(), 1);
    ledger.withdraw(&record.id).expect("withdrawal applies");

    assert!(ledger.advance_status(&record.id, ReviewAction::Reviewed).is_none());
    assert!(ledger.advance_status(&app_id(42), ReviewAction::Reviewed).is_none());
    assert_eq!(
        ledger.get(&record.id).expect("record kept").status,
        ApplicationStatus::Withdrawn
    );
}
