//! Listener specs: `ds listen` reads wake-ups from stdin

use crate::prelude::*;

#[test]
fn listen_handles_each_line() {
    let temp = Project::configured();
    temp.deposit("dep-9", None, None);

    temp.ds()
        .args(&["listen"])
        .stdin("submission:sub-1\n{\"type\":\"deposit\",\"id\":\"dep-9\"}\n")
        .passes()
        .stdout_has("dispatched=2");

    // dep-9 already covers repo-1: the submission wake-up submits it, the
    // deposit wake-up then checks its status
    assert_eq!(temp.read_deposit("dep-9")["status"], "submitted");
    assert_eq!(temp.deposits().len(), 1);
}

#[test]
fn listen_skips_malformed_lines() {
    let temp = Project::configured();

    temp.ds()
        .args(&["listen"])
        .stdin("not a wake-up\nparcel:7\n\nsubmission:sub-1\n")
        .passes()
        .stderr_has("malformed wake-up")
        .stdout_has("dispatched=1");
}

#[test]
fn listen_survives_unknown_ids() {
    let temp = Project::configured();

    temp.ds()
        .args(&["listen"])
        .stdin("deposit:ghost\nsubmission:sub-1\n")
        .fails()
        .stdout_has("dispatched=1")
        .stdout_has("failed=1");
    assert_eq!(temp.deposits().len(), 1);
}

#[test]
fn listen_on_empty_input_succeeds() {
    let temp = Project::configured();

    temp.ds()
        .args(&["listen"])
        .stdin("")
        .passes()
        .stdout_has("candidates=0");
}
