//! Wake-up specs: `ds submission <id>` and `ds deposit <id>`

use crate::prelude::*;

#[test]
fn submission_wake_up_creates_and_submits_deposit() {
    let temp = Project::configured();

    temp.ds()
        .args(&["submission", "sub-1"])
        .passes()
        .stdout_has("candidates=1 dispatched=1 skipped=0 failed=0");

    let deposits = temp.deposits();
    assert_eq!(deposits.len(), 1);
    let deposit = &deposits[0];
    assert_eq!(deposit["status"], "submitted");
    assert_eq!(deposit["repository"], "repo-1");

    let id = deposit["id"].as_str().unwrap();
    let dir = temp.inbox().join(id);
    assert!(dir.join("sub-1.bundle.json").is_file());
    assert_eq!(
        deposit["status_ref"].as_str().unwrap(),
        dir.join("statement.json").display().to_string()
    );
}

#[test]
fn submission_wake_up_is_idempotent() {
    let temp = Project::configured();
    temp.ds().args(&["submission", "sub-1"]).passes();

    temp.ds()
        .args(&["submission", "sub-1"])
        .passes()
        .stdout_has("candidates=0");
    assert_eq!(temp.deposits().len(), 1);
}

#[test]
fn one_deposit_per_target_repository() {
    let temp = Project::configured();
    temp.repository("repo-2", PACKAGER);
    temp.submission("sub-1", &["repo-1", "repo-2"]);

    temp.ds()
        .args(&["--foreground", "submission", "sub-1"])
        .passes()
        .stdout_has("dispatched=2");
    assert_eq!(temp.deposits().len(), 2);
}

#[test]
fn dirty_deposit_wake_up_submits() {
    let temp = Project::configured();
    temp.deposit("dep-1", None, None);

    temp.ds().args(&["deposit", "dep-1"]).passes();

    assert_eq!(temp.read_deposit("dep-1")["status"], "submitted");
    assert!(temp.inbox().join("dep-1/sub-1.bundle.json").is_file());
}

#[test]
fn submitted_deposit_wake_up_records_final_state() {
    let temp = Project::configured();
    let statement = temp.statement("remote/dep-1.json", "http://dspace.org/state/archived");
    temp.deposit("dep-1", Some("submitted"), Some(&statement));

    temp.ds().args(&["deposit", "dep-1"]).passes();

    let deposit = temp.read_deposit("dep-1");
    assert_eq!(deposit["status"], "accepted");
    assert_eq!(deposit["status_ref"], statement.as_str());
}

#[test]
fn final_deposit_wake_up_changes_nothing() {
    let temp = Project::configured();
    temp.deposit("dep-1", Some("rejected"), Some("/nowhere/statement.json"));

    temp.ds()
        .args(&["deposit", "dep-1"])
        .passes()
        .stdout_has("skipped=1");
    assert_eq!(temp.read_deposit("dep-1")["status"], "rejected");
}

#[test]
fn unreachable_file_marks_deposit_failed() {
    let temp = Project::configured();
    std::fs::remove_file(temp.path().join("files/sub-1.txt")).unwrap();
    temp.deposit("dep-1", None, None);

    temp.ds()
        .args(&["deposit", "dep-1"])
        .fails()
        .stdout_has("failed=1");

    let deposit = temp.read_deposit("dep-1");
    assert_eq!(deposit["status"], "failed");
    assert!(deposit["status_ref"].is_null());
}

#[test]
fn synchronous_resolution_confirms_immediately() {
    let temp = Project::with_connection_extra("initial_state = \"archived\"");
    temp.file(
        "ds.toml",
        &format!(
            "{}\n[resolution]\nsynchronous = true\n",
            std::fs::read_to_string(temp.path().join("ds.toml")).unwrap()
        ),
    );
    temp.deposit("dep-1", None, None);

    temp.ds().args(&["deposit", "dep-1"]).passes();

    assert_eq!(temp.read_deposit("dep-1")["status"], "accepted");
}
