// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

//! Integration tests for the deposit lifecycle.
//!
//! Walks deposits through the states the engine drives them through,
//! using only the public data model.

use ds_core::{
    Deposit, DepositStatus, DepositSubmission, ParsedState, Submission, SubmissionFile, WakeUp,
};

fn submission() -> Submission {
    Submission {
        id: "sub-1".to_string(),
        version: 3,
        submitted: true,
        metadata: [("title".to_string(), "On Deposits".to_string())].into(),
        files: vec![SubmissionFile {
            name: "paper.pdf".to_string(),
            location: Some("file:///data/paper.pdf".to_string()),
            mime_type: Some("application/pdf".to_string()),
        }],
        repositories: vec!["repo-1".to_string(), "repo-2".to_string()],
        aggregated_deposit_status: None,
    }
}

// =============================================================================
// Happy path
// =============================================================================

#[test]
fn deposit_goes_from_unsubmitted_to_accepted() {
    let mut deposit = Deposit::new("dep-1", "sub-1", "repo-1");
    assert!(deposit.is_dirty());

    deposit.mark_submitted("/inbox/dep-1/statement.json");
    assert!(deposit.is_awaiting_confirmation());
    assert!(!deposit.is_dirty());
    assert!(deposit.status_ref_consistent());

    let state = ParsedState::from_term("http://dspace.org/state/archived");
    deposit.mark_terminal(state.to_deposit_status().unwrap());

    assert_eq!(deposit.status, Some(DepositStatus::Accepted));
    assert!(deposit.is_terminal());
    assert_eq!(
        deposit.status_ref.as_deref(),
        Some("/inbox/dep-1/statement.json")
    );
}

#[test]
fn in_progress_state_keeps_deposit_waiting() {
    let mut deposit = Deposit::new("dep-1", "sub-1", "repo-1");
    deposit.mark_submitted("ref");

    let state = ParsedState::from_term("inreview");
    assert_eq!(state.to_deposit_status(), None);
    assert!(deposit.is_awaiting_confirmation());
}

// =============================================================================
// Failure and retry
// =============================================================================

#[test]
fn failed_deposit_is_dirty_again_and_resubmittable() {
    let mut deposit = Deposit::new("dep-1", "sub-1", "repo-1");
    deposit.mark_submitted("first");
    deposit.mark_failed();

    assert!(deposit.is_dirty());
    assert!(deposit.status_ref.is_none());
    assert!(deposit.status_ref_consistent());

    deposit.mark_submitted("second");
    assert_eq!(deposit.id, "dep-1");
    assert_eq!(deposit.status_ref.as_deref(), Some("second"));
}

#[test]
fn deposit_survives_a_store_round_trip() {
    let mut deposit = Deposit::new("dep-1", "sub-1", "repo-1");
    deposit.mark_submitted("ref");

    let json = serde_json::to_string(&deposit).unwrap();
    assert!(json.contains("\"status\":\"submitted\""));
    let back: Deposit = serde_json::from_str(&json).unwrap();
    assert_eq!(back, deposit);
}

// =============================================================================
// Packaging model and wake-ups
// =============================================================================

#[test]
fn packaging_model_follows_the_submission() {
    let model = DepositSubmission::derive(&submission()).unwrap();
    assert_eq!(model.id, "sub-1");
    assert_eq!(model.manifest.len(), 1);
    assert_eq!(model.metadata["title"], "On Deposits");
}

#[test]
fn wake_ups_name_their_target() {
    let wake = WakeUp::parse(r#"{"type":"submission","id":"sub-1"}"#).unwrap();
    assert_eq!(wake, WakeUp::Submission("sub-1".to_string()));
    assert_eq!(wake.to_string(), "submission:sub-1");
    assert_eq!(
        WakeUp::parse(&wake.to_string()).unwrap(),
        WakeUp::Submission("sub-1".to_string())
    );
}
